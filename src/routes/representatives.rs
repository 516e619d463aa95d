use std::collections::HashMap;

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use repdesk_directory::{Representative, RepresentativeInput};
use repdesk_shared::user::Role;
use repdesk_user::{Account, UserView};
use serde::Deserialize;

use crate::{
    auth::AuthUser,
    guard_screen,
    navigation::{Nav, Screen},
    routes::AppState,
    template::{SelectOption, Template, filters},
    try_page_response,
};

pub struct Row {
    pub representative: Representative,
    pub manager_name: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "representatives.html")]
pub struct ListTemplate {
    pub nav: Nav,
    pub rows: Vec<Row>,
    pub managers: Vec<SelectOption>,
    pub error_message: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "representative-form.html")]
pub struct FormTemplate {
    pub nav: Nav,
    pub action: String,
    pub title: &'static str,
    pub input: RepresentativeInput,
    pub logins: Vec<SelectOption>,
    pub managers: Vec<SelectOption>,
    pub error_message: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct ListQuery {
    pub manager_id: Option<String>,
}

fn manager_options(users: &[UserView], selected: Option<&str>) -> Vec<SelectOption> {
    users
        .iter()
        .filter(|u| u.role.sees_all_assignments())
        .map(|u| {
            SelectOption::new(
                u.id.to_owned(),
                u.full_name.to_owned(),
                selected == Some(u.id.as_str()),
            )
        })
        .collect()
}

async fn render_list(
    template: &Template,
    app: &AppState,
    user: &Account,
    manager_id: Option<String>,
    mut error_message: Option<String>,
) -> Response {
    let representatives = match &manager_id {
        Some(manager_id) => app.directory.representatives_by_manager(manager_id).await,
        None => app.directory.list_representatives().await,
    };

    let representatives = match representatives {
        Ok(representatives) => representatives,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list representatives");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    let users = match app.user_query.list().await {
        Ok(users) => users,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list users");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    let names: HashMap<&str, &str> = users
        .iter()
        .map(|u| (u.id.as_str(), u.full_name.as_str()))
        .collect();

    let rows = representatives
        .into_iter()
        .map(|representative| Row {
            manager_name: representative
                .manager_id
                .as_deref()
                .and_then(|id| names.get(id))
                .map(|name| name.to_string()),
            representative,
        })
        .collect();

    template.render(ListTemplate {
        nav: template.nav(user),
        rows,
        managers: manager_options(&users, manager_id.as_deref()),
        error_message,
    })
}

async fn render_form(
    template: &Template,
    app: &AppState,
    user: &Account,
    action: String,
    title: &'static str,
    input: RepresentativeInput,
    error_message: Option<String>,
) -> Response {
    let users = try_page_response!(app.user_query.list(), template);

    let logins = users
        .iter()
        .filter(|u| u.role == Role::Rep)
        .map(|u| {
            SelectOption::new(
                u.id.to_owned(),
                format!("{} <{}>", u.full_name, u.email),
                input.user_id.as_deref() == Some(u.id.as_str()),
            )
        })
        .collect();

    template.render(FormTemplate {
        nav: template.nav(user),
        action,
        title,
        managers: manager_options(&users, input.manager_id.as_deref()),
        logins,
        input,
        error_message,
    })
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Query(input): Query<ListQuery>,
) -> impl IntoResponse {
    guard_screen!(Screen::Representatives, user, template);

    let manager_id = input.manager_id.filter(|v| !v.is_empty());

    render_list(&template, &app, &user, manager_id, None).await
}

pub async fn create_page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Representatives, user, template);

    let input = RepresentativeInput {
        manager_id: (user.role == Role::Manager).then(|| user.id.to_owned()),
        ..Default::default()
    };

    render_form(
        &template,
        &app,
        &user,
        "/representatives/new".to_owned(),
        "New representative",
        input,
        None,
    )
    .await
}

pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Form(input): Form<RepresentativeInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Representatives, user, template);

    match app.directory.create_representative(input.clone()).await {
        Ok(_) => Redirect::to("/representatives").into_response(),
        Err(err) => {
            render_form(
                &template,
                &app,
                &user,
                "/representatives/new".to_owned(),
                "New representative",
                input,
                Some(err.user_message()),
            )
            .await
        }
    }
}

pub async fn edit_page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    guard_screen!(Screen::Representatives, user, template);

    let representative =
        try_page_response!(opt: app.directory.find_representative(&id), template);

    render_form(
        &template,
        &app,
        &user,
        format!("/representatives/{id}/edit"),
        "Edit representative",
        RepresentativeInput {
            full_name: representative.full_name,
            email: representative.email,
            phone: representative.phone,
            territory: representative.territory,
            user_id: representative.user_id,
            manager_id: representative.manager_id,
        },
        None,
    )
    .await
}

pub async fn edit_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
    Form(input): Form<RepresentativeInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Representatives, user, template);

    match app.directory.update_representative(&id, input.clone()).await {
        Ok(_) => Redirect::to("/representatives").into_response(),
        Err(repdesk_shared::Error::NotFound(_)) => template.not_found(),
        Err(err) => {
            render_form(
                &template,
                &app,
                &user,
                format!("/representatives/{id}/edit"),
                "Edit representative",
                input,
                Some(err.user_message()),
            )
            .await
        }
    }
}

pub async fn delete_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    guard_screen!(Screen::Representatives, user, template);

    match app.directory.delete_representative(&id).await {
        Ok(_) => Redirect::to("/representatives").into_response(),
        Err(err) => render_list(&template, &app, &user, None, Some(err.user_message())).await,
    }
}
