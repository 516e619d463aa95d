use std::str::FromStr;

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use repdesk_assignment::{
    AssignmentFilter, AssignmentForm, AssignmentView, PlanLength, Status,
    build_assignment_request, weekday_from_index,
};
use repdesk_shared::Metadata;
use repdesk_user::Account;
use serde::Deserialize;
use strum::VariantArray;

use crate::{
    auth::AuthUser,
    guard_screen,
    navigation::{Nav, Screen},
    routes::AppState,
    template::{SelectOption, Template, filters},
    try_page_response,
};

/// Which assignments the signed-in account may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scope {
    All,
    Representative(String),
    /// A rep login that no representative record points to yet.
    Nothing,
}

impl Scope {
    pub(crate) fn filter(&self, mut filter: AssignmentFilter) -> Option<AssignmentFilter> {
        match self {
            Scope::All => Some(filter),
            Scope::Representative(id) => {
                filter.representative_id = Some(id.to_owned());
                Some(filter)
            }
            Scope::Nothing => None,
        }
    }

    fn owns(&self, assignment: &AssignmentView) -> bool {
        match self {
            Scope::All => true,
            Scope::Representative(id) => &assignment.representative_id == id,
            Scope::Nothing => false,
        }
    }
}

pub(crate) async fn scope(app: &AppState, user: &Account) -> repdesk_shared::Result<Scope> {
    if user.role.sees_all_assignments() {
        return Ok(Scope::All);
    }

    let scope = match app.directory.representative_by_user(&user.id).await? {
        Some(representative) => Scope::Representative(representative.id),
        None => Scope::Nothing,
    };

    Ok(scope)
}

pub(crate) async fn list_in_scope(
    app: &AppState,
    user: &Account,
    filter: AssignmentFilter,
) -> repdesk_shared::Result<Vec<AssignmentView>> {
    match scope(app, user).await?.filter(filter) {
        Some(filter) => app.assignment_query.list(filter).await,
        None => Ok(vec![]),
    }
}

#[derive(askama::Template)]
#[template(path = "assignments.html")]
pub struct ListTemplate {
    pub nav: Nav,
    pub assignments: Vec<AssignmentView>,
    pub representatives: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub can_manage: bool,
    pub error_message: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct ListQuery {
    pub representative_id: Option<String>,
    pub series_id: Option<String>,
    pub status: Option<String>,
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Query(input): Query<ListQuery>,
) -> impl IntoResponse {
    guard_screen!(Screen::Assignments, user, template);

    render_list(&template, &app, &user, input, None).await
}

async fn render_list(
    template: &Template,
    app: &AppState,
    user: &Account,
    input: ListQuery,
    mut error_message: Option<String>,
) -> Response {
    let can_manage = user.role.sees_all_assignments();
    let status = input
        .status
        .as_deref()
        .and_then(|v| Status::from_str(v).ok());
    let representative_id = input.representative_id.filter(|v| !v.is_empty());

    let filter = AssignmentFilter {
        representative_id: representative_id.to_owned(),
        series_id: input.series_id.filter(|v| !v.is_empty()),
        status,
        ..Default::default()
    };

    let assignments = match list_in_scope(app, user, filter).await {
        Ok(assignments) => assignments,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list assignments");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    let representatives = if can_manage {
        match app.directory.list_representatives().await {
            Ok(representatives) => representatives
                .into_iter()
                .map(|r| {
                    let selected = representative_id.as_deref() == Some(r.id.as_str());
                    SelectOption::new(r.id, r.full_name, selected)
                })
                .collect(),
            Err(err) => {
                tracing::error!(user = %user.id, err = %err, "failed to list representatives");
                error_message = Some(err.user_message());
                vec![]
            }
        }
    } else {
        vec![]
    };

    let statuses = Status::VARIANTS
        .iter()
        .map(|s| SelectOption::new(s.to_string(), s.label(), Some(*s) == status))
        .collect();

    template.render(ListTemplate {
        nav: template.nav(user),
        assignments,
        representatives,
        statuses,
        can_manage,
        error_message,
    })
}

#[derive(askama::Template)]
#[template(path = "assignment-form.html")]
pub struct FormTemplate {
    pub nav: Nav,
    pub representatives: Vec<SelectOption>,
    pub doctors: Vec<SelectOption>,
    pub products: Vec<SelectOption>,
    pub weekdays: Vec<SelectOption>,
    pub plans: Vec<SelectOption>,
    pub note: String,
    pub error_message: Option<String>,
}

async fn form_template(
    app: &AppState,
    nav: Nav,
    form: &AssignmentForm,
    error_message: Option<String>,
) -> repdesk_shared::Result<FormTemplate> {
    let (representatives, doctors, products) = futures::future::join3(
        app.directory.list_representatives(),
        app.directory.list_doctors(),
        app.directory.list_products(),
    )
    .await;

    let representatives = representatives?
        .into_iter()
        .map(|r| {
            let selected = r.id == form.representative_id;
            SelectOption::new(r.id, r.full_name, selected)
        })
        .collect();

    let doctors = doctors?
        .into_iter()
        .map(|d| {
            let selected = form.doctor_ids.contains(&d.id);
            let label = match d.specialty {
                Some(specialty) => format!("{} ({specialty})", d.full_name),
                None => d.full_name,
            };
            SelectOption::new(d.id, label, selected)
        })
        .collect();

    let products = products?
        .into_iter()
        .map(|p| {
            let selected = form.product_ids.contains(&p.id);
            SelectOption::new(p.id, p.name, selected)
        })
        .collect();

    let weekdays = (0..7)
        .filter_map(|index| weekday_from_index(index).map(|weekday| (index, weekday)))
        .map(|(index, weekday)| {
            SelectOption::new(
                index.to_string(),
                weekday.to_string(),
                form.weekday == Some(index),
            )
        })
        .collect();

    let plans = PlanLength::VARIANTS
        .iter()
        .map(|plan| {
            let weeks = i64::from(plan.weeks());
            SelectOption::new(
                weeks.to_string(),
                plan.label(),
                form.repeat_count == Some(weeks),
            )
        })
        .collect();

    Ok(FormTemplate {
        nav,
        representatives,
        doctors,
        products,
        weekdays,
        plans,
        note: form.note.to_owned().unwrap_or_default(),
        error_message,
    })
}

pub async fn create_page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Assignments, user, template);

    if !user.role.sees_all_assignments() {
        return template.forbidden();
    }

    let form = AssignmentForm {
        weekday: Some(1),
        repeat_count: Some(4),
        ..Default::default()
    };

    let page = try_page_response!(
        form_template(&app, template.nav(&user), &form, None),
        template
    );

    template.render(page)
}

pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    axum_extra::extract::Form(form): axum_extra::extract::Form<AssignmentForm>,
) -> impl IntoResponse {
    guard_screen!(Screen::Assignments, user, template);

    if !user.role.sees_all_assignments() {
        return template.forbidden();
    }

    let error_message = match build_assignment_request(&form, app.today()) {
        Ok(request) => {
            match app
                .assignment_command
                .submit(&request, &Metadata::by(user.id.to_owned()))
                .await
            {
                Ok(_) => return Redirect::to("/assignments").into_response(),
                Err(err) => {
                    if matches!(
                        err,
                        repdesk_shared::Error::Unknown(_)
                            | repdesk_shared::Error::Server(_)
                            | repdesk_shared::Error::Malformed(_)
                    ) {
                        tracing::error!(user = %user.id, err = %err, "failed to submit assignment");
                    }
                    err.user_message()
                }
            }
        }
        Err(err) => err.to_string(),
    };

    let page = try_page_response!(
        form_template(&app, template.nav(&user), &form, Some(error_message)),
        template
    );

    template.render(page)
}

#[derive(Deserialize)]
pub struct StatusInput {
    pub status: String,
}

pub async fn status_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
    Form(input): Form<StatusInput>,
) -> Response {
    guard_screen!(Screen::Assignments, user, template);

    let Ok(status) = Status::from_str(&input.status) else {
        return Redirect::to("/assignments").into_response();
    };

    let assignment = try_page_response!(opt: app.assignment_query.find(&id), template);
    let scope = try_page_response!(scope(&app, &user), template);

    if !scope.owns(&assignment) {
        return template.forbidden();
    }

    try_page_response!(
        app.assignment_command
            .set_status(&id, status, &Metadata::by(user.id.to_owned())),
        template
    );

    Redirect::to("/assignments").into_response()
}

pub async fn delete_series_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((series_id,)): Path<(String,)>,
) -> Response {
    guard_screen!(Screen::Assignments, user, template);

    if !user.role.sees_all_assignments() {
        return template.forbidden();
    }

    let result = app
        .assignment_command
        .delete_series(&series_id, &Metadata::by(user.id.to_owned()))
        .await;

    match result {
        Ok(_) => Redirect::to("/assignments").into_response(),
        Err(repdesk_shared::Error::NotFound(_)) => template.not_found(),
        Err(repdesk_shared::Error::Forbidden) => template.forbidden(),
        Err(err @ repdesk_shared::Error::User(_)) => {
            render_list(&template, &app, &user, ListQuery::default(), Some(err.user_message()))
                .await
        }
        Err(err) => {
            tracing::error!(user = %user.id, series_id = %series_id, err = %err, "failed to delete assignment series");

            template.server_error()
        }
    }
}
