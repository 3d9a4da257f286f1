//! Buildpacks service (v2).

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::client::params::{ApiRequest, Parameters};
use crate::client::ClientInner;
use crate::models::BuildpackResource;
use crate::{Error, Result};

/// Service for buildpack operations.
pub struct BuildpacksService {
    inner: Arc<ClientInner>,
}

/// Uploads the bits of a buildpack as a zip archive.
#[derive(Clone, Default)]
pub struct UploadBuildpackRequest {
    /// Buildpack GUID
    pub buildpack_id: String,
    /// File name reported to the server; must end in `.zip`
    pub filename: String,
    /// Archive contents
    pub bits: Vec<u8>,
}

impl UploadBuildpackRequest {
    /// Upload `bits` as `filename` to the buildpack with the given GUID.
    pub fn new(buildpack_id: impl Into<String>, filename: impl Into<String>, bits: Vec<u8>) -> Self {
        Self {
            buildpack_id: buildpack_id.into(),
            filename: filename.into(),
            bits,
        }
    }
}

impl ApiRequest for UploadBuildpackRequest {
    fn parameters(&self, params: &mut Parameters) {
        params.path("buildpack_id", &self.buildpack_id);
    }

    fn validate(&self) -> Result<()> {
        if !self.filename.ends_with(".zip") {
            return Err(Error::Validation(format!(
                "buildpack filename must end in .zip: {:?}",
                self.filename
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for UploadBuildpackRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadBuildpackRequest")
            .field("buildpack_id", &self.buildpack_id)
            .field("filename", &self.filename)
            .field("bits", &format_args!("{} bytes", self.bits.len()))
            .finish()
    }
}

impl BuildpacksService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Replace the buildpack's bits.
    pub async fn upload(&self, mut request: UploadBuildpackRequest) -> Result<BuildpackResource> {
        let bits = std::mem::take(&mut request.bits);
        let part = Part::bytes(bits)
            .file_name(request.filename.clone())
            .mime_str("application/zip")
            .map_err(|e| Error::Validation(format!("invalid upload content type: {e}")))?;
        let form = Form::new().part("buildpack", part);

        self.inner
            .execute_multipart(
                Method::PUT,
                "/v2/buildpacks/{buildpack_id}/bits",
                &request,
                form,
            )
            .await
    }
}
