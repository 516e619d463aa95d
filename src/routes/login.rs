use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use repdesk_user::SignInInput;
use serde::Deserialize;

use crate::{
    auth::{build_cookie, removal_cookie},
    routes::AppState,
    template::{SERVER_ERROR_MESSAGE, Template},
};

#[derive(askama::Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error_message: Option<String>,
    pub email: String,
}

pub async fn page(template: Template) -> impl IntoResponse {
    template.render(LoginTemplate {
        error_message: None,
        email: String::new(),
    })
}

#[derive(Deserialize)]
pub struct ActionInput {
    pub email: String,
    pub password: String,
}

pub async fn action(
    template: Template,
    State(app): State<AppState>,
    jar: CookieJar,
    Form(input): Form<ActionInput>,
) -> impl IntoResponse {
    let account = match app
        .user_command
        .sign_in(SignInInput {
            email: input.email.to_owned(),
            password: input.password,
        })
        .await
    {
        Ok(account) => account,
        Err(e) => {
            return template
                .render(LoginTemplate {
                    error_message: Some(e.user_message()),
                    email: input.email,
                })
                .into_response();
        }
    };

    match build_cookie(&app.config.jwt, account.id) {
        Ok(cookie) => (jar.add(cookie), Redirect::to("/")).into_response(),
        Err(err) => {
            tracing::error!(err = %err, "failed to build session cookie");

            template
                .render(LoginTemplate {
                    error_message: Some(SERVER_ERROR_MESSAGE.to_owned()),
                    email: input.email,
                })
                .into_response()
        }
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(removal_cookie()), Redirect::to("/login"))
}
