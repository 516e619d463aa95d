use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use repdesk_directory::{Doctor, DoctorInput};
use repdesk_user::Account;
use serde::Deserialize;

use crate::{
    auth::AuthUser,
    guard_screen,
    navigation::{Nav, Screen},
    routes::AppState,
    template::{SelectOption, Template, filters},
    try_page_response,
};

#[derive(askama::Template)]
#[template(path = "doctors.html")]
pub struct ListTemplate {
    pub nav: Nav,
    pub doctors: Vec<Doctor>,
    pub clinics: Vec<SelectOption>,
    pub error_message: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "doctor-form.html")]
pub struct FormTemplate {
    pub nav: Nav,
    pub action: String,
    pub title: &'static str,
    pub input: DoctorInput,
    pub clinics: Vec<SelectOption>,
    pub error_message: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct ListQuery {
    pub clinic_id: Option<String>,
}

async fn clinic_options(
    app: &AppState,
    selected: Option<&str>,
) -> repdesk_shared::Result<Vec<SelectOption>> {
    let clinics = app.directory.list_clinics().await?;

    Ok(clinics
        .into_iter()
        .map(|c| {
            let is_selected = selected == Some(c.id.as_str());
            SelectOption::new(c.id, c.name, is_selected)
        })
        .collect())
}

async fn render_list(
    template: &Template,
    app: &AppState,
    user: &Account,
    clinic_id: Option<String>,
    mut error_message: Option<String>,
) -> Response {
    let doctors = match &clinic_id {
        Some(clinic_id) => app.directory.doctors_by_clinic(clinic_id).await,
        None => app.directory.list_doctors().await,
    };

    let doctors = match doctors {
        Ok(doctors) => doctors,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list doctors");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    let clinics = match clinic_options(app, clinic_id.as_deref()).await {
        Ok(clinics) => clinics,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list clinics");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    template.render(ListTemplate {
        nav: template.nav(user),
        doctors,
        clinics,
        error_message,
    })
}

async fn render_form(
    template: &Template,
    app: &AppState,
    user: &Account,
    action: String,
    title: &'static str,
    input: DoctorInput,
    error_message: Option<String>,
) -> Response {
    let clinics = try_page_response!(clinic_options(app, input.clinic_id.as_deref()), template);

    template.render(FormTemplate {
        nav: template.nav(user),
        action,
        title,
        input,
        clinics,
        error_message,
    })
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Query(input): Query<ListQuery>,
) -> impl IntoResponse {
    guard_screen!(Screen::Doctors, user, template);

    let clinic_id = input.clinic_id.filter(|v| !v.is_empty());

    render_list(&template, &app, &user, clinic_id, None).await
}

pub async fn create_page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Doctors, user, template);

    render_form(
        &template,
        &app,
        &user,
        "/doctors/new".to_owned(),
        "New doctor",
        DoctorInput::default(),
        None,
    )
    .await
}

pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Form(input): Form<DoctorInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Doctors, user, template);

    match app.directory.create_doctor(input.clone()).await {
        Ok(_) => Redirect::to("/doctors").into_response(),
        Err(err) => {
            render_form(
                &template,
                &app,
                &user,
                "/doctors/new".to_owned(),
                "New doctor",
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
    guard_screen!(Screen::Doctors, user, template);

    let doctor = try_page_response!(opt: app.directory.find_doctor(&id), template);

    render_form(
        &template,
        &app,
        &user,
        format!("/doctors/{id}/edit"),
        "Edit doctor",
        DoctorInput {
            full_name: doctor.full_name,
            specialty: doctor.specialty,
            email: doctor.email,
            phone: doctor.phone,
            clinic_id: doctor.clinic_id,
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
    Form(input): Form<DoctorInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Doctors, user, template);

    match app.directory.update_doctor(&id, input.clone()).await {
        Ok(_) => Redirect::to("/doctors").into_response(),
        Err(repdesk_shared::Error::NotFound(_)) => template.not_found(),
        Err(err) => {
            render_form(
                &template,
                &app,
                &user,
                format!("/doctors/{id}/edit"),
                "Edit doctor",
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
    guard_screen!(Screen::Doctors, user, template);

    match app.directory.delete_doctor(&id).await {
        Ok(_) => Redirect::to("/doctors").into_response(),
        Err(err) => render_list(&template, &app, &user, None, Some(err.user_message())).await,
    }
}
