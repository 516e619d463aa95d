use anyhow::Result;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::routes::AppState;

pub async fn serve(
    config: crate::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("starting repdesk server");

    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    crate::migrate::migrate(&config).await?;

    // Write pool: 1 connection for every write and transaction.
    let write_pool = crate::db::create_write_pool(&config.database.url).await?;
    let read_pool =
        crate::db::create_read_pool(&config.database.url, config.database.max_connections)
            .await?;

    let state = AppState::new(
        config,
        repdesk_shared::State {
            read_db: read_pool.clone(),
            write_db: write_pool.clone(),
        },
    );

    ensure_root_user(&state).await?;

    let app = crate::routes::router(state)
        .layer(axum::middleware::from_fn(
            crate::middleware::cache_control_middleware,
        ))
        // Minify before compression.
        .layer(axum::middleware::map_response(
            crate::middleware::minify_html_middleware,
        ))
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("closing database pools");
    read_pool.close().await;
    write_pool.close().await;

    tracing::info!("graceful shutdown complete");

    Ok(())
}

/// Creates the configured root account as a super admin on first start.
async fn ensure_root_user(state: &AppState) -> Result<()> {
    let root = &state.config.root;

    if state.user_query.find_by_email(&root.email).await?.is_some() {
        return Ok(());
    }

    let id = state
        .user_command
        .register(
            repdesk_user::RegisterInput {
                email: root.email.to_owned(),
                password: root.password.to_owned(),
                full_name: root.full_name.to_owned(),
                role: repdesk_shared::user::Role::SuperAdmin,
            },
            &repdesk_shared::Metadata::system(),
        )
        .await?;

    tracing::info!(user_id = %id, email = %root.email, "root user created");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(err = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(err = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("received SIGTERM signal");
        },
    }

    tracing::info!("starting graceful shutdown");
}
