use axum::{
    extract::{FromRequest, Multipart, Request},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::ShowroomError;

/// An uploaded file from the `image` field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Multipart product form shared by the add and edit handlers.
///
/// `brand`, `name` and `description` are required. `image` is `None` when the
/// field is absent or the browser sent an empty file part (no file chosen).
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub brand: String,
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        parse_product_form(multipart)
            .await
            .map_err(IntoResponse::into_response)
    }
}

async fn parse_product_form(mut multipart: Multipart) -> Result<ProductForm, ShowroomError> {
    let mut brand = None;
    let mut name = None;
    let mut description = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "brand" => brand = Some(field.text().await?),
            "name" => name = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                if !file_name.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            other => debug!(field = other, "ignoring unknown product form field"),
        }
    }

    Ok(ProductForm {
        brand: required(brand, "brand")?,
        name: required(name, "name")?,
        description: required(description, "description")?,
        image,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, ShowroomError> {
    value.ok_or_else(|| ShowroomError::BadRequest(format!("missing form field `{field}`")))
}
