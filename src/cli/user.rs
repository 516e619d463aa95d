use clap::ValueEnum;
use repdesk_shared::{Metadata, user};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Role {
    SuperAdmin,
    Manager,
    Rep,
}

impl From<Role> for user::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::SuperAdmin => user::Role::SuperAdmin,
            Role::Manager => user::Role::Manager,
            Role::Rep => user::Role::Rep,
        }
    }
}

async fn state(config: &crate::config::Config) -> anyhow::Result<repdesk_shared::State> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;

    Ok(repdesk_shared::State::single(pool))
}

pub async fn create(
    config: crate::config::Config,
    email: String,
    password: String,
    full_name: String,
    role: Role,
) -> anyhow::Result<()> {
    let state = state(&config).await?;
    let command = repdesk_user::Command(state.clone());

    let id = command
        .register(
            repdesk_user::RegisterInput {
                email: email.to_owned(),
                password,
                full_name,
                role: role.into(),
            },
            &Metadata::system(),
        )
        .await?;

    tracing::info!(user_id = %id, email = %email, role = ?role, "user created");

    state.write_db.close().await;

    Ok(())
}

pub async fn set_role(
    config: crate::config::Config,
    email: String,
    role: Role,
) -> anyhow::Result<()> {
    let state = state(&config).await?;
    let command = repdesk_user::Command(state.clone());
    let query = repdesk_user::Query(state.read_db.clone());

    let Some(user) = query.find_by_email(&email).await? else {
        tracing::error!(email = %email, "user not found");
        anyhow::bail!("user {email} not found");
    };

    command
        .set_role(user.id, role.into(), &Metadata::system())
        .await?;

    tracing::info!(email = %email, role = ?role, "role updated");

    state.write_db.close().await;

    Ok(())
}
