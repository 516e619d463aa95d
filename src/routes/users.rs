use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use repdesk_shared::{Metadata, user::Role};
use repdesk_user::{Account, RegisterInput, UserView};
use serde::Deserialize;
use strum::VariantArray;

use crate::{
    auth::AuthUser,
    guard_screen,
    navigation::{Nav, Screen},
    routes::AppState,
    template::{SelectOption, Template},
};

pub struct Row {
    pub user: UserView,
    pub roles: Vec<SelectOption>,
    pub is_self: bool,
}

#[derive(askama::Template)]
#[template(path = "users.html")]
pub struct ListTemplate {
    pub nav: Nav,
    pub rows: Vec<Row>,
    pub roles: Vec<SelectOption>,
    pub input: CreateInput,
    pub error_message: Option<String>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct CreateInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
}

fn role_options(selected: Role) -> Vec<SelectOption> {
    Role::VARIANTS
        .iter()
        .map(|r| SelectOption::new(r.to_string(), r.label(), *r == selected))
        .collect()
}

async fn render_list(
    template: &Template,
    app: &AppState,
    user: &Account,
    input: CreateInput,
    mut error_message: Option<String>,
) -> Response {
    let users = match app.user_query.list().await {
        Ok(users) => users,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list users");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    let rows = users
        .into_iter()
        .map(|u| Row {
            roles: role_options(u.role),
            is_self: u.id == user.id,
            user: u,
        })
        .collect();

    template.render(ListTemplate {
        nav: template.nav(user),
        rows,
        roles: role_options(input.role),
        input: CreateInput {
            password: String::new(),
            ..input
        },
        error_message,
    })
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Users, user, template);

    render_list(&template, &app, &user, CreateInput::default(), None).await
}

pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Form(input): Form<CreateInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Users, user, template);

    let result = app
        .user_command
        .register(
            RegisterInput {
                email: input.email.trim().to_owned(),
                password: input.password.to_owned(),
                full_name: input.full_name.to_owned(),
                role: input.role,
            },
            &Metadata::by(user.id.to_owned()),
        )
        .await;

    match result {
        Ok(_) => Redirect::to("/users").into_response(),
        Err(err) => render_list(&template, &app, &user, input, Some(err.user_message())).await,
    }
}

#[derive(Deserialize)]
pub struct RoleInput {
    pub role: Role,
}

pub async fn role_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
    Form(input): Form<RoleInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Users, user, template);

    let result = app
        .user_command
        .set_role(&id, input.role, &Metadata::by(user.id.to_owned()))
        .await;

    after_change(&template, &app, &user, result).await
}

pub async fn suspend_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    guard_screen!(Screen::Users, user, template);

    let result = app
        .user_command
        .suspend(&id, &Metadata::by(user.id.to_owned()))
        .await;

    after_change(&template, &app, &user, result).await
}

pub async fn activate_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    guard_screen!(Screen::Users, user, template);

    let result = app
        .user_command
        .activate(&id, &Metadata::by(user.id.to_owned()))
        .await;

    after_change(&template, &app, &user, result).await
}

async fn after_change(
    template: &Template,
    app: &AppState,
    user: &Account,
    result: repdesk_shared::Result<()>,
) -> Response {
    match result {
        Ok(_) => Redirect::to("/users").into_response(),
        Err(repdesk_shared::Error::NotFound(_)) => template.not_found(),
        Err(err) => {
            if matches!(err, repdesk_shared::Error::Unknown(_)) {
                tracing::error!(user = %user.id, err = %err, "failed to change user");
            }

            render_list(template, app, user, CreateInput::default(), Some(err.user_message()))
                .await
        }
    }
}

