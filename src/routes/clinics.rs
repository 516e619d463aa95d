use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use repdesk_directory::{Clinic, ClinicInput};
use repdesk_user::Account;

use crate::{
    auth::AuthUser,
    guard_screen,
    navigation::{Nav, Screen},
    routes::AppState,
    template::{Template, filters},
    try_page_response,
};

#[derive(askama::Template)]
#[template(path = "clinics.html")]
pub struct ListTemplate {
    pub nav: Nav,
    pub clinics: Vec<Clinic>,
    pub error_message: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "clinic-form.html")]
pub struct FormTemplate {
    pub nav: Nav,
    pub action: String,
    pub title: &'static str,
    pub input: ClinicInput,
    pub error_message: Option<String>,
}

async fn render_list(
    template: &Template,
    app: &AppState,
    user: &Account,
    mut error_message: Option<String>,
) -> Response {
    let clinics = match app.directory.list_clinics().await {
        Ok(clinics) => clinics,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list clinics");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    template.render(ListTemplate {
        nav: template.nav(user),
        clinics,
        error_message,
    })
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Clinics, user, template);

    render_list(&template, &app, &user, None).await
}

pub async fn create_page(template: Template, AuthUser(user): AuthUser) -> impl IntoResponse {
    guard_screen!(Screen::Clinics, user, template);

    template.render(FormTemplate {
        nav: template.nav(&user),
        action: "/clinics/new".to_owned(),
        title: "New clinic",
        input: ClinicInput::default(),
        error_message: None,
    })
}

pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Form(input): Form<ClinicInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Clinics, user, template);

    match app.directory.create_clinic(input.clone()).await {
        Ok(_) => Redirect::to("/clinics").into_response(),
        Err(err) => template.render(FormTemplate {
            nav: template.nav(&user),
            action: "/clinics/new".to_owned(),
            title: "New clinic",
            input,
            error_message: Some(err.user_message()),
        }),
    }
}

pub async fn edit_page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    guard_screen!(Screen::Clinics, user, template);

    let clinic = try_page_response!(opt: app.directory.find_clinic(&id), template);

    template.render(FormTemplate {
        nav: template.nav(&user),
        action: format!("/clinics/{id}/edit"),
        title: "Edit clinic",
        input: ClinicInput {
            name: clinic.name,
            address: clinic.address,
            city: clinic.city,
            phone: clinic.phone,
        },
        error_message: None,
    })
}

pub async fn edit_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
    Form(input): Form<ClinicInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Clinics, user, template);

    match app.directory.update_clinic(&id, input.clone()).await {
        Ok(_) => Redirect::to("/clinics").into_response(),
        Err(repdesk_shared::Error::NotFound(_)) => template.not_found(),
        Err(err) => template.render(FormTemplate {
            nav: template.nav(&user),
            action: format!("/clinics/{id}/edit"),
            title: "Edit clinic",
            input,
            error_message: Some(err.user_message()),
        }),
    }
}

pub async fn delete_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    guard_screen!(Screen::Clinics, user, template);

    match app.directory.delete_clinic(&id).await {
        Ok(_) => Redirect::to("/clinics").into_response(),
        Err(err) => render_list(&template, &app, &user, Some(err.user_message())).await,
    }
}
