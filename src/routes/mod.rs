use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post},
};
use sqlx::SqlitePool;

use crate::{routes::assets::AssetsService, template::Template};

mod assets;
mod assignments;
mod brands;
mod clinics;
mod dashboard;
mod doctors;
mod health;
mod login;
mod products;
mod representatives;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: repdesk_user::Command,
    pub user_query: repdesk_user::Query,
    pub directory: repdesk_directory::Directory,
    pub assignment_command: repdesk_assignment::Command,
    pub assignment_query: repdesk_assignment::Query,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: crate::config::Config, state: repdesk_shared::State) -> Self {
        Self {
            config,
            user_command: repdesk_user::Command(state.clone()),
            user_query: repdesk_user::Query(state.read_db.clone()),
            directory: repdesk_directory::Directory(state.clone()),
            assignment_command: repdesk_assignment::Command(state.clone()),
            assignment_query: repdesk_assignment::Query(state.read_db.clone()),
            pool: state.read_db,
        }
    }

    /// Calendar date in the configured timezone.
    pub fn today(&self) -> time::Date {
        crate::calendar::today(&self.config.app.timezone)
    }
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    template.not_found()
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/", get(dashboard::page))
        .route("/login", get(login::page).post(login::action))
        .route("/logout", post(login::logout))
        .route("/assignments", get(assignments::page))
        .route(
            "/assignments/new",
            get(assignments::create_page).post(assignments::create_action),
        )
        .route("/assignments/{id}/status", post(assignments::status_action))
        .route(
            "/assignments/series/{id}/delete",
            post(assignments::delete_series_action),
        )
        .route("/representatives", get(representatives::page))
        .route(
            "/representatives/new",
            get(representatives::create_page).post(representatives::create_action),
        )
        .route(
            "/representatives/{id}/edit",
            get(representatives::edit_page).post(representatives::edit_action),
        )
        .route(
            "/representatives/{id}/delete",
            post(representatives::delete_action),
        )
        .route("/doctors", get(doctors::page))
        .route(
            "/doctors/new",
            get(doctors::create_page).post(doctors::create_action),
        )
        .route(
            "/doctors/{id}/edit",
            get(doctors::edit_page).post(doctors::edit_action),
        )
        .route("/doctors/{id}/delete", post(doctors::delete_action))
        .route("/clinics", get(clinics::page))
        .route(
            "/clinics/new",
            get(clinics::create_page).post(clinics::create_action),
        )
        .route(
            "/clinics/{id}/edit",
            get(clinics::edit_page).post(clinics::edit_action),
        )
        .route("/clinics/{id}/delete", post(clinics::delete_action))
        .route("/products", get(products::page))
        .route(
            "/products/new",
            get(products::create_page).post(products::create_action),
        )
        .route(
            "/products/{id}/edit",
            get(products::edit_page).post(products::edit_action),
        )
        .route("/products/{id}/delete", post(products::delete_action))
        .route("/brands", get(brands::page))
        .route(
            "/brands/new",
            get(brands::create_page).post(brands::create_action),
        )
        .route(
            "/brands/{id}/edit",
            get(brands::edit_page).post(brands::edit_action),
        )
        .route("/brands/{id}/delete", post(brands::delete_action))
        .route("/users", get(users::page).post(users::create_action))
        .route("/users/{id}/role", post(users::role_action))
        .route("/users/{id}/suspend", post(users::suspend_action))
        .route("/users/{id}/activate", post(users::activate_action))
        .fallback(fallback)
        .nest_service("/static", AssetsService::new())
        .with_state(app_state)
}
