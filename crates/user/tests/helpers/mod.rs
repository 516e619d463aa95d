use std::{path::PathBuf, str::FromStr};

use repdesk_shared::{Metadata, user::Role};
use repdesk_user::RegisterInput;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<repdesk_shared::State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    repdesk_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(repdesk_shared::State::single(pool))
}

#[allow(dead_code)]
pub async fn create_user(
    command: &repdesk_user::Command,
    name: impl Into<String>,
    role: Role,
) -> anyhow::Result<String> {
    let name = name.into();
    let id = command
        .register(
            RegisterInput {
                email: format!("{name}@repdesk.localhost"),
                password: "my_password".to_owned(),
                full_name: name.replace('.', " "),
                role,
            },
            &Metadata::system(),
        )
        .await?;

    Ok(id)
}
