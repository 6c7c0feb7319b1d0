//! Server-rendered HTML pages.
//!
//! Templates live in `templates/*.hbs` and are compiled into the binary.
//! Handlebars HTML-escapes every `{{value}}`, so row and request data can be
//! passed through as-is.

use axum::http::StatusCode;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;
use std::sync::LazyLock;

use crate::db::{DbProduct, DbQuote};
use crate::error::ShowroomError;

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    build_registry().expect("FATAL: built-in page templates failed to register")
});

const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("../../templates/header.hbs")),
    ("footer", include_str!("../../templates/footer.hbs")),
];

const PAGES: &[(&str, &str)] = &[
    ("home", include_str!("../../templates/home.hbs")),
    ("products", include_str!("../../templates/products.hbs")),
    ("quote", include_str!("../../templates/quote.hbs")),
    ("product_detail", include_str!("../../templates/product_detail.hbs")),
    ("login", include_str!("../../templates/login.hbs")),
    ("dashboard", include_str!("../../templates/dashboard.hbs")),
    ("add_product", include_str!("../../templates/add_product.hbs")),
    ("edit_product", include_str!("../../templates/edit_product.hbs")),
    ("not_found", include_str!("../../templates/not_found.hbs")),
    ("error", include_str!("../../templates/error.hbs")),
];

fn build_registry() -> Result<Handlebars<'static>, ShowroomError> {
    let mut engine = Handlebars::new();
    for (name, source) in PARTIALS {
        engine.register_partial(name, *source)?;
    }
    for (name, source) in PAGES {
        engine.register_template_string(name, *source)?;
    }
    Ok(engine)
}

/// Compile the templates now instead of on the first request.
pub fn init() {
    LazyLock::force(&TEMPLATES);
}

fn render<T: Serialize>(name: &str, data: &T) -> Result<String, ShowroomError> {
    Ok(TEMPLATES.render(name, data)?)
}

#[derive(Serialize)]
struct QuoteRow<'a> {
    received: String,
    name: &'a str,
    phone: &'a str,
    message: &'a str,
}

pub fn home_page() -> Result<String, ShowroomError> {
    render("home", &json!({}))
}

pub fn products_page() -> Result<String, ShowroomError> {
    render("products", &json!({}))
}

pub fn quote_page() -> Result<String, ShowroomError> {
    render("quote", &json!({}))
}

pub fn product_detail_page(product: &DbProduct, image_url: &str) -> Result<String, ShowroomError> {
    render(
        "product_detail",
        &json!({
            "title": format!("{} {}", product.brand, product.name),
            "product": product,
            "image_url": image_url,
        }),
    )
}

pub fn login_page(error: Option<&str>) -> Result<String, ShowroomError> {
    render("login", &json!({ "error": error }))
}

pub fn dashboard_page(
    username: &str,
    quotes: &[DbQuote],
    products: &[DbProduct],
) -> Result<String, ShowroomError> {
    let quote_rows: Vec<QuoteRow> = quotes
        .iter()
        .map(|q| QuoteRow {
            received: q.created_at.format("%Y-%m-%d %H:%M").to_string(),
            name: &q.name,
            phone: &q.phone,
            message: &q.message,
        })
        .collect();
    render(
        "dashboard",
        &json!({
            "username": username,
            "products": products,
            "quotes": quote_rows,
            "quote_count": quotes.len(),
        }),
    )
}

pub fn add_product_page() -> Result<String, ShowroomError> {
    render("add_product", &json!({}))
}

pub fn edit_product_page(product: &DbProduct, image_url: &str) -> Result<String, ShowroomError> {
    render(
        "edit_product",
        &json!({ "product": product, "image_url": image_url }),
    )
}

/// Infallible so error responses can always be produced; falls back to
/// plain text if rendering itself fails.
pub fn not_found_page() -> String {
    render("not_found", &json!({})).unwrap_or_else(|_| "Not Found".to_string())
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    render(
        "error",
        &json!({ "code": status.as_u16(), "title": reason, "message": message }),
    )
    .unwrap_or_else(|_| format!("{} {}: {}", status.as_u16(), reason, message))
}
