use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use std::{collections::HashMap, convert::Infallible};

use crate::navigation::Nav;

pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong, please retry later";

pub(crate) mod filters {
    use time::{Date, Weekday, macros::format_description};

    #[askama::filter_fn]
    pub fn date(value: &Date, _values: &dyn askama::Values) -> askama::Result<String> {
        value
            .format(format_description!(
                "[weekday repr:short] [day] [month repr:short] [year]"
            ))
            .map_err(|e| askama::Error::Custom(Box::new(e)))
    }

    #[askama::filter_fn]
    pub fn weekday(value: &Weekday, _values: &dyn askama::Values) -> askama::Result<String> {
        Ok(value.to_string())
    }

    #[askama::filter_fn]
    pub fn opt(value: &Option<String>, _values: &dyn askama::Values) -> askama::Result<String> {
        Ok(value.to_owned().unwrap_or_default())
    }
}

/// `<option>`/checkbox entry with its selection state resolved server-side.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

pub struct Template {
    pub current_path: String,
}

impl Template {
    fn render_with_values<T: askama::Template>(
        &self,
        template: T,
    ) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert("current_path", Box::new(self.current_path.to_owned()));

        #[cfg(debug_assertions)]
        {
            values.insert("is_dev", Box::new(true));
        }
        #[cfg(not(debug_assertions))]
        {
            values.insert("is_dev", Box::new(false));
        }

        template.render_with_values(&values)
    }

    pub fn nav(&self, account: &repdesk_user::Account) -> Nav {
        Nav::new(account, &self.current_path)
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        match self.render_with_values(template) {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(err = %err, path = %self.current_path, "failed to render template");

                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE).into_response()
            }
        }
    }

    pub fn not_found(&self) -> Response {
        (StatusCode::NOT_FOUND, self.render(NotFoundTemplate)).into_response()
    }

    pub fn forbidden(&self) -> Response {
        (StatusCode::FORBIDDEN, self.render(ForbiddenTemplate)).into_response()
    }

    pub fn server_error(&self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.render(ServerTemplate)).into_response()
    }
}

impl FromRequestParts<crate::routes::AppState> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Template {
            current_path: parts.uri.path().to_owned(),
        })
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

#[derive(askama::Template)]
#[template(path = "403.html")]
pub struct ForbiddenTemplate;

#[derive(askama::Template)]
#[template(path = "500.html")]
pub struct ServerTemplate;

#[macro_export]
macro_rules! try_page_response {
    ($result:expr, $template:expr) => {
        match $result.await {
            Ok(r) => r,
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };

    (sync: $result:expr, $template:expr) => {
        match $result {
            Ok(r) => r,
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };

    (opt: $result:expr, $template:expr) => {
        match $result.await {
            Ok(Some(r)) => r,
            Ok(_) => return $template.not_found(),
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };
}

/// Returns 403 unless the screen is open to the signed-in role.
#[macro_export]
macro_rules! guard_screen {
    ($screen:expr, $user:expr, $template:expr) => {
        if !$screen.allows($user.role) {
            tracing::warn!(user_id = %$user.id, screen = ?$screen, "screen not allowed");

            return $template.forbidden();
        }
    };
}
