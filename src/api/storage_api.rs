use crate::error::ShowroomError;
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Thin client for the Supabase Storage upload endpoint.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: Url,
    key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(
        base_url: &Url,
        key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Result<Self, ShowroomError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("showroom/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.clone(),
            key: key.into(),
            bucket: bucket.into(),
        })
    }

    /// Upload `bytes` to `{bucket}/{filename}`. Any non-2xx answer is an error;
    /// there is no retry.
    pub async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), ShowroomError> {
        let url = self.object_url(&["storage", "v1", "object", &self.bucket, filename])?;
        let size = bytes.len();

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .header(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(filename, status = %status, "object storage upload rejected");
            return Err(ShowroomError::StorageStatus { status, body });
        }

        info!(filename, size, bucket = %self.bucket, "uploaded product image");
        Ok(())
    }

    /// Public URL for a stored image. Values that are already absolute URLs
    /// pass through unchanged.
    pub fn public_url(&self, image: &str) -> String {
        if image.starts_with("http") {
            return image.to_string();
        }
        self.object_url(&["storage", "v1", "object", "public", &self.bucket, image])
            .map(String::from)
            .unwrap_or_else(|_| {
                format!(
                    "{}/storage/v1/object/public/{}/{}",
                    self.base_url.as_str().trim_end_matches('/'),
                    self.bucket,
                    image
                )
            })
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment.
    fn object_url(&self, segments: &[&str]) -> Result<Url, ShowroomError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Random object name that keeps the extension of the uploaded file.
///
/// Only the leading ASCII alphanumeric run of the extension is kept, so the
/// name never carries URL syntax (`?`, `#`, `/`) into the object key.
pub fn generate_filename(original: &str) -> String {
    let ext: String = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.chars().take_while(char::is_ascii_alphanumeric).collect())
        .unwrap_or_default();
    if ext.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), ext)
    }
}
