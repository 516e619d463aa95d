use std::{path::PathBuf, str::FromStr};

use repdesk_directory::{ClinicInput, Directory, DoctorInput};
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
    state: &repdesk_shared::State,
    name: &str,
    role: Role,
) -> anyhow::Result<String> {
    let command = repdesk_user::Command(state.clone());
    let id = command
        .register(
            RegisterInput {
                email: format!("{name}@repdesk.localhost"),
                password: "my_password".to_owned(),
                full_name: name.to_owned(),
                role,
            },
            &Metadata::system(),
        )
        .await?;

    Ok(id)
}

#[allow(dead_code)]
pub async fn create_clinic(directory: &Directory, name: &str) -> anyhow::Result<String> {
    Ok(directory
        .create_clinic(ClinicInput {
            name: name.to_owned(),
            city: Some("Lyon".to_owned()),
            ..Default::default()
        })
        .await?)
}

#[allow(dead_code)]
pub async fn create_doctor(
    directory: &Directory,
    name: &str,
    clinic_id: Option<String>,
) -> anyhow::Result<String> {
    Ok(directory
        .create_doctor(DoctorInput {
            full_name: name.to_owned(),
            specialty: Some("Cardiology".to_owned()),
            clinic_id,
            ..Default::default()
        })
        .await?)
}
