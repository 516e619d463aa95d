#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use repdesk::{
    AppState,
    config::{AppConfig, Config, DatabaseConfig, JwtConfig, ObservabilityConfig, RootConfig, ServerConfig},
};
use repdesk_shared::{Metadata, user::Role};
use repdesk_user::RegisterInput;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub app: AppState,
    _dir: TempDir,
}

pub fn config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            issuer: "repdesk".to_owned(),
            audience: "repdesk".to_owned(),
            expiration_days: 1,
        },
        root: RootConfig {
            email: "admin@repdesk.localhost".to_owned(),
            password: "root_password".to_owned(),
            full_name: "Administrator".to_owned(),
        },
        app: AppConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_string_lossy()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    repdesk_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let app = AppState::new(config(), repdesk_shared::State::single(pool));

    Ok(TestApp {
        router: repdesk::router(app.clone()),
        app,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn create_user(&self, name: &str, role: Role) -> anyhow::Result<String> {
        let id = self
            .app
            .user_command
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

    pub fn cookie(&self, user_id: &str) -> anyhow::Result<String> {
        let token = repdesk::auth::generate_token(&self.app.config.jwt, user_id.to_owned())?;

        Ok(format!("{}={token}", repdesk::auth::AUTH_COOKIE_NAME))
    }

    pub async fn get(&self, uri: &str, user_id: Option<&str>) -> anyhow::Result<Response<Body>> {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(user_id) = user_id {
            req = req.header(header::COOKIE, self.cookie(user_id)?);
        }

        Ok(self.router.clone().oneshot(req.body(Body::empty())?).await?)
    }

    pub async fn post(
        &self,
        uri: &str,
        user_id: Option<&str>,
        form: &[(&str, &str)],
    ) -> anyhow::Result<Response<Body>> {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(user_id) = user_id {
            req = req.header(header::COOKIE, self.cookie(user_id)?);
        }

        let body = serde_urlencoded::to_string(form)?;

        Ok(self.router.clone().oneshot(req.body(Body::from(body))?).await?)
    }
}

pub async fn body(response: Response<Body>) -> anyhow::Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();

    Ok(String::from_utf8(bytes.to_vec())?)
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
