use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use repdesk_directory::{Brand, BrandInput};
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
#[template(path = "brands.html")]
pub struct ListTemplate {
    pub nav: Nav,
    pub brands: Vec<Brand>,
    pub error_message: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "brand-form.html")]
pub struct FormTemplate {
    pub nav: Nav,
    pub action: String,
    pub title: &'static str,
    pub input: BrandInput,
    pub error_message: Option<String>,
}

async fn render_list(
    template: &Template,
    app: &AppState,
    user: &Account,
    mut error_message: Option<String>,
) -> Response {
    let brands = match app.directory.list_brands().await {
        Ok(brands) => brands,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list brands");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    template.render(ListTemplate {
        nav: template.nav(user),
        brands,
        error_message,
    })
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Brands, user, template);

    render_list(&template, &app, &user, None).await
}

pub async fn create_page(template: Template, AuthUser(user): AuthUser) -> impl IntoResponse {
    guard_screen!(Screen::Brands, user, template);

    template.render(FormTemplate {
        nav: template.nav(&user),
        action: "/brands/new".to_owned(),
        title: "New brand",
        input: BrandInput::default(),
        error_message: None,
    })
}

pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Form(input): Form<BrandInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Brands, user, template);

    match app.directory.create_brand(input.clone()).await {
        Ok(_) => Redirect::to("/brands").into_response(),
        Err(err) => template.render(FormTemplate {
            nav: template.nav(&user),
            action: "/brands/new".to_owned(),
            title: "New brand",
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
    guard_screen!(Screen::Brands, user, template);

    let brand = try_page_response!(opt: app.directory.find_brand(&id), template);

    template.render(FormTemplate {
        nav: template.nav(&user),
        action: format!("/brands/{id}/edit"),
        title: "Edit brand",
        input: BrandInput {
            name: brand.name,
            description: brand.description,
        },
        error_message: None,
    })
}

pub async fn edit_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
    Form(input): Form<BrandInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Brands, user, template);

    match app.directory.update_brand(&id, input.clone()).await {
        Ok(_) => Redirect::to("/brands").into_response(),
        Err(repdesk_shared::Error::NotFound(_)) => template.not_found(),
        Err(err) => template.render(FormTemplate {
            nav: template.nav(&user),
            action: format!("/brands/{id}/edit"),
            title: "Edit brand",
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
    guard_screen!(Screen::Brands, user, template);

    match app.directory.delete_brand(&id).await {
        Ok(_) => Redirect::to("/brands").into_response(),
        Err(err) => render_list(&template, &app, &user, Some(err.user_message())).await,
    }
}
