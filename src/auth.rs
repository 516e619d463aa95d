use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::JwtConfig, routes::AppState};

pub const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    sub: String,
}

pub fn generate_token(config: &JwtConfig, sub: String) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        aud: config.audience.to_owned(),
        exp: now + config.expiration_days * 24 * 60 * 60,
        iat: now,
        iss: config.issuer.to_owned(),
        sub,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Returns the user id carried by a valid token.
pub fn verify_token(config: &JwtConfig, token: &str) -> anyhow::Result<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[config.audience.to_owned()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims.sub)
}

pub fn build_cookie<'a>(config: &JwtConfig, sub: String) -> anyhow::Result<Cookie<'a>> {
    let token = generate_token(config, sub)?;

    Ok(Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build())
}

pub fn removal_cookie<'a>() -> Cookie<'a> {
    Cookie::build(AUTH_COOKIE_NAME).path("/").build()
}

/// Signed-in account. The row is re-read on every request so role changes
/// and suspensions apply to live sessions.
pub struct AuthUser(pub repdesk_user::Account);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;

        let token = jar
            .get(AUTH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_owned())
            .ok_or(Redirect::to("/login"))?;

        let user_id =
            verify_token(&state.config.jwt, &token).map_err(|_| Redirect::to("/login"))?;

        let Some(account) = state
            .user_query
            .find_session(user_id)
            .await
            .map_err(|e| {
                tracing::error!(err = %e, "failed to load session");
                Redirect::to("/login")
            })?
        else {
            return Err(Redirect::to("/login"));
        };

        Ok(AuthUser(account))
    }
}
