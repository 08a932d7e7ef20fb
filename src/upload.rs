//! File Upload Client
//!
//! Thin consumer of the server's HTTP upload endpoint. The returned
//! descriptor is what a `file_message` frame carries; validation and
//! progress reporting live with the caller. Failures are surfaced once
//! and never retried.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::protocol::FileDescriptor;

const UPLOAD_PATH: &str = "/api/upload/";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Client for `POST /api/upload/`
pub struct UploadClient {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
}

/// Errors from the upload endpoint
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upload rejected with status {0}")]
    Rejected(StatusCode),
}

impl UploadClient {
    /// Create a client for the given HTTP base URL, e.g. `http://host`
    ///
    /// The CSRF token, when present, is sent on every request the way the
    /// server's form middleware expects.
    pub fn new(base_url: impl Into<String>, csrf_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            csrf_token,
        }
    }

    /// Upload one file and return the server's descriptor
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<FileDescriptor, UploadError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let mut request = self.client.post(self.upload_url()).multipart(form);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(UploadError::Rejected(response.status()));
        }

        Ok(response.json().await?)
    }

    fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, UPLOAD_PATH)
    }
}
