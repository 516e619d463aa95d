use sqlx::migrate::MigrateDatabase;
use sqlx_migrator::{Migrate, Plan};

use crate::config::Config;

pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!(url = %config.database.url, "creating database");
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    let mut conn = pool.acquire().await?;
    repdesk_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);
    pool.close().await;

    tracing::info!("migrations applied");

    Ok(())
}

pub async fn reset(config: &Config) -> anyhow::Result<()> {
    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!(url = %config.database.url, "dropping database");
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    }

    migrate(config).await
}
