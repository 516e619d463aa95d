use axum::{extract::State, response::IntoResponse};
use repdesk_assignment::{AssignmentFilter, AssignmentView, Status};
use time::Duration;

use crate::{
    auth::AuthUser,
    guard_screen,
    navigation::{Nav, Screen},
    routes::{AppState, assignments::list_in_scope},
    template::{Template, filters},
};

const UPCOMING_DAYS: i64 = 14;

#[derive(askama::Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub upcoming: Vec<AssignmentView>,
    pub representatives: Option<i64>,
    pub doctors: Option<i64>,
    pub products: Option<i64>,
    pub error_message: Option<String>,
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Dashboard, user, template);

    let today = app.today();
    let filter = AssignmentFilter {
        from: Some(today),
        to: Some(today + Duration::days(UPCOMING_DAYS - 1)),
        status: Some(Status::Scheduled),
        ..Default::default()
    };

    let mut error_message = None;
    let upcoming = match list_in_scope(&app, &user, filter).await {
        Ok(upcoming) => upcoming,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list upcoming assignments");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    let (mut representatives, mut doctors, mut products) = (None, None, None);
    if Screen::Doctors.allows(user.role) {
        let (r, d, p) = futures::future::join3(
            app.directory.count_representatives(),
            app.directory.count_doctors(),
            app.directory.count_products(),
        )
        .await;

        match (r, d, p) {
            (Ok(r), Ok(d), Ok(p)) => {
                representatives = Some(r);
                doctors = Some(d);
                products = Some(p);
            }
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                tracing::error!(user = %user.id, err = %err, "failed to load directory totals");
                error_message = Some(err.user_message());
            }
        }
    }

    template.render(DashboardTemplate {
        nav: template.nav(&user),
        upcoming,
        representatives,
        doctors,
        products,
        error_message,
    })
}
