use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use repdesk_directory::{Product, ProductInput};
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
#[template(path = "products.html")]
pub struct ListTemplate {
    pub nav: Nav,
    pub products: Vec<Product>,
    pub brands: Vec<SelectOption>,
    pub error_message: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "product-form.html")]
pub struct FormTemplate {
    pub nav: Nav,
    pub action: String,
    pub title: &'static str,
    pub input: ProductInput,
    pub brands: Vec<SelectOption>,
    pub error_message: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct ListQuery {
    pub brand_id: Option<String>,
}

async fn brand_options(
    app: &AppState,
    selected: Option<&str>,
) -> repdesk_shared::Result<Vec<SelectOption>> {
    let brands = app.directory.list_brands().await?;

    Ok(brands
        .into_iter()
        .map(|b| {
            let is_selected = selected == Some(b.id.as_str());
            SelectOption::new(b.id, b.name, is_selected)
        })
        .collect())
}

async fn render_list(
    template: &Template,
    app: &AppState,
    user: &Account,
    brand_id: Option<String>,
    mut error_message: Option<String>,
) -> Response {
    let products = match &brand_id {
        Some(brand_id) => app.directory.products_by_brand(brand_id).await,
        None => app.directory.list_products().await,
    };

    let products = match products {
        Ok(products) => products,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list products");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    let brands = match brand_options(app, brand_id.as_deref()).await {
        Ok(brands) => brands,
        Err(err) => {
            tracing::error!(user = %user.id, err = %err, "failed to list brands");
            error_message = Some(err.user_message());
            vec![]
        }
    };

    template.render(ListTemplate {
        nav: template.nav(user),
        products,
        brands,
        error_message,
    })
}

async fn render_form(
    template: &Template,
    app: &AppState,
    user: &Account,
    action: String,
    title: &'static str,
    input: ProductInput,
    error_message: Option<String>,
) -> Response {
    let brands = try_page_response!(brand_options(app, input.brand_id.as_deref()), template);

    template.render(FormTemplate {
        nav: template.nav(user),
        action,
        title,
        input,
        brands,
        error_message,
    })
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Query(input): Query<ListQuery>,
) -> impl IntoResponse {
    guard_screen!(Screen::Products, user, template);

    let brand_id = input.brand_id.filter(|v| !v.is_empty());

    render_list(&template, &app, &user, brand_id, None).await
}

pub async fn create_page(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> impl IntoResponse {
    guard_screen!(Screen::Products, user, template);

    render_form(
        &template,
        &app,
        &user,
        "/products/new".to_owned(),
        "New product",
        ProductInput::default(),
        None,
    )
    .await
}

pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Form(input): Form<ProductInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Products, user, template);

    match app.directory.create_product(input.clone()).await {
        Ok(_) => Redirect::to("/products").into_response(),
        Err(err) => {
            render_form(
                &template,
                &app,
                &user,
                "/products/new".to_owned(),
                "New product",
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
    guard_screen!(Screen::Products, user, template);

    let product = try_page_response!(opt: app.directory.find_product(&id), template);

    render_form(
        &template,
        &app,
        &user,
        format!("/products/{id}/edit"),
        "Edit product",
        ProductInput {
            name: product.name,
            description: product.description,
            brand_id: product.brand_id,
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
    Form(input): Form<ProductInput>,
) -> impl IntoResponse {
    guard_screen!(Screen::Products, user, template);

    match app.directory.update_product(&id, input.clone()).await {
        Ok(_) => Redirect::to("/products").into_response(),
        Err(repdesk_shared::Error::NotFound(_)) => template.not_found(),
        Err(err) => {
            render_form(
                &template,
                &app,
                &user,
                format!("/products/{id}/edit"),
                "Edit product",
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
    guard_screen!(Screen::Products, user, template);

    match app.directory.delete_product(&id).await {
        Ok(_) => Redirect::to("/products").into_response(),
        Err(err) => render_list(&template, &app, &user, None, Some(err.user_message())).await,
    }
}
