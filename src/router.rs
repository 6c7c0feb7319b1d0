use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::api::SupabaseStorage;
use crate::db::ShowroomStorage;
use crate::handlers::{admin, auth, public};
use crate::views;

#[derive(Clone)]
pub struct ShowroomState {
    pub db: ShowroomStorage,
    pub storage: SupabaseStorage,
    pub key: Key,
    pub insecure_cookie: bool,
    pub max_upload_bytes: usize,
}

impl ShowroomState {
    pub fn new(
        db: ShowroomStorage,
        storage: SupabaseStorage,
        key: Key,
        insecure_cookie: bool,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            db,
            storage,
            key,
            insecure_cookie,
            max_upload_bytes,
        }
    }
}

impl FromRef<ShowroomState> for Key {
    fn from_ref(state: &ShowroomState) -> Self {
        state.key.clone()
    }
}

pub fn showroom_router(state: ShowroomState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(public::home))
        .route("/products-page", get(public::products_page))
        .route("/api/products", get(public::api_products))
        .route("/product/{id}", get(public::product_detail))
        .route("/quote", get(public::quote_form).post(public::submit_quote))
        .route("/admin", get(public::admin_gate))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(admin::dashboard))
        .route(
            "/add-product",
            get(admin::add_product_form).post(admin::add_product),
        )
        .route(
            "/edit-product/{id}",
            get(admin::edit_product_form).post(admin::edit_product),
        )
        .route("/delete-product/{id}", post(admin::delete_product))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(views::not_found_page()))
}
