use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    response::{Html, Redirect},
};
use serde::Serialize;
use tracing::info;

use crate::db::{DbProduct, NewQuote};
use crate::{ShowroomError, router::ShowroomState, views};

#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub brand: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<ProductView>,
}

/// GET /
pub async fn home() -> Result<Html<String>, ShowroomError> {
    Ok(Html(views::home_page()?))
}

/// GET /products-page
pub async fn products_page() -> Result<Html<String>, ShowroomError> {
    Ok(Html(views::products_page()?))
}

/// GET /admin -> always to the login form.
pub async fn admin_gate() -> Redirect {
    Redirect::to("/login")
}

/// GET /api/products -> every product as JSON.
pub async fn api_products(
    State(state): State<ShowroomState>,
) -> Result<Json<ProductList>, ShowroomError> {
    let products = state
        .db
        .list_products()
        .await?
        .into_iter()
        .map(|p: DbProduct| ProductView {
            image_url: state.storage.public_url(&p.image),
            id: p.id,
            brand: p.brand,
            name: p.name,
            description: p.description,
            image: p.image,
        })
        .collect();
    Ok(Json(ProductList { products }))
}

/// GET /product/{id}
pub async fn product_detail(
    State(state): State<ShowroomState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, ShowroomError> {
    let product = state
        .db
        .get_product(id)
        .await?
        .ok_or(ShowroomError::NotFound)?;
    let image_url = state.storage.public_url(&product.image);
    Ok(Html(views::product_detail_page(&product, &image_url)?))
}

/// GET /quote
pub async fn quote_form() -> Result<Html<String>, ShowroomError> {
    Ok(Html(views::quote_page()?))
}

/// POST /quote -> store the request and go back home. A form missing any of
/// `name`, `phone` or `message` is a 400.
pub async fn submit_quote(
    State(state): State<ShowroomState>,
    form: Result<Form<NewQuote>, FormRejection>,
) -> Result<Redirect, ShowroomError> {
    let Form(quote) = form.map_err(|rejection| ShowroomError::BadRequest(rejection.body_text()))?;
    let id = state.db.insert_quote(quote).await?;
    info!(quote_id = id, "quote request received");
    Ok(Redirect::to("/"))
}
