use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use tracing::info;

use crate::api::storage_api::generate_filename;
use crate::db::{NewProduct, ProductUpdate};
use crate::middleware::{AdminSession, ImageUpload, ProductForm};
use crate::{ShowroomError, router::ShowroomState, views};

/// GET /dashboard -> quotes and products for the signed-in admin.
pub async fn dashboard(
    session: AdminSession,
    State(state): State<ShowroomState>,
) -> Result<Html<String>, ShowroomError> {
    let quotes = state.db.list_quotes().await?;
    let products = state.db.list_products().await?;
    Ok(Html(views::dashboard_page(
        &session.username,
        &quotes,
        &products,
    )?))
}

/// GET /add-product
pub async fn add_product_form(_session: AdminSession) -> Result<Html<String>, ShowroomError> {
    Ok(Html(views::add_product_page()?))
}

/// POST /add-product -> upload the image, then insert the row.
pub async fn add_product(
    _session: AdminSession,
    State(state): State<ShowroomState>,
    form: ProductForm,
) -> Result<Redirect, ShowroomError> {
    let upload = form
        .image
        .ok_or_else(|| ShowroomError::BadRequest("an image file is required".to_string()))?;
    let image = store_image(&state, upload).await?;

    let id = state
        .db
        .insert_product(NewProduct {
            brand: form.brand,
            name: form.name,
            description: form.description,
            image,
        })
        .await?;
    info!(product_id = id, "product created");
    Ok(Redirect::to("/dashboard"))
}

/// GET /edit-product/{id}
pub async fn edit_product_form(
    _session: AdminSession,
    State(state): State<ShowroomState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, ShowroomError> {
    let product = state
        .db
        .get_product(id)
        .await?
        .ok_or(ShowroomError::NotFound)?;
    let image_url = state.storage.public_url(&product.image);
    Ok(Html(views::edit_product_page(&product, &image_url)?))
}

/// POST /edit-product/{id} -> update fields; replace the image only when a
/// new file was chosen.
pub async fn edit_product(
    _session: AdminSession,
    State(state): State<ShowroomState>,
    Path(id): Path<i64>,
    form: ProductForm,
) -> Result<Redirect, ShowroomError> {
    if state.db.get_product(id).await?.is_none() {
        return Err(ShowroomError::NotFound);
    }

    let image = match form.image {
        Some(upload) => Some(store_image(&state, upload).await?),
        None => None,
    };

    let found = state
        .db
        .update_product(
            id,
            ProductUpdate {
                brand: form.brand,
                name: form.name,
                description: form.description,
                image,
            },
        )
        .await?;
    if !found {
        return Err(ShowroomError::NotFound);
    }
    info!(product_id = id, "product updated");
    Ok(Redirect::to("/dashboard"))
}

/// POST /delete-product/{id}
pub async fn delete_product(
    _session: AdminSession,
    State(state): State<ShowroomState>,
    Path(id): Path<i64>,
) -> Result<Redirect, ShowroomError> {
    if !state.db.delete_product(id).await? {
        return Err(ShowroomError::NotFound);
    }
    info!(product_id = id, "product deleted");
    Ok(Redirect::to("/dashboard"))
}

/// Upload under a fresh name and return that name for the `image` column.
async fn store_image(state: &ShowroomState, upload: ImageUpload) -> Result<String, ShowroomError> {
    let filename = generate_filename(&upload.file_name);
    state
        .storage
        .upload(&filename, upload.bytes, upload.content_type.as_deref())
        .await?;
    Ok(filename)
}
