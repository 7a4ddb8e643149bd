// File management over the `/v2/files` endpoints.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use langflow_types::{Error, UserFile};

use crate::client::LangflowClient;

/// Handle for server-side file storage: upload, list, delete.
#[derive(Clone)]
pub struct Files {
    client: LangflowClient,
}

impl Files {
    pub(crate) fn new(client: LangflowClient) -> Self {
        Self { client }
    }

    /// Upload raw bytes under the given filename.
    ///
    /// Content type defaults to `application/octet-stream`. The server may
    /// rename the file on name collision; the returned record carries the
    /// name it actually stored.
    pub async fn upload(
        &self,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<UserFile, Error> {
        self.upload_with_content_type(filename, bytes, "application/octet-stream")
            .await
    }

    /// Upload raw bytes with an explicit content type.
    pub async fn upload_with_content_type(
        &self,
        filename: impl Into<String>,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UserFile, Error> {
        let part = Part::bytes(bytes)
            .file_name(filename.into())
            .mime_str(content_type)
            .map_err(|e| Error::configuration(format!("invalid content type: {e}")))?;
        let form = Form::new().part("file", part);
        let json = self.client.post_multipart("/v2/files", form).await?;
        serde_json::from_value(json)
            .map_err(|e| Error::decode(format!("unexpected upload response: {e}")))
    }

    /// Upload a file from the local filesystem, using its file name.
    pub async fn upload_path(&self, path: impl AsRef<Path>) -> Result<UserFile, Error> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::configuration(format!("path has no usable file name: {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::configuration(format!("failed to read {}: {e}", path.display())))?;
        self.upload(filename, bytes).await
    }

    /// List all files stored for the authenticated user.
    pub async fn list(&self) -> Result<Vec<UserFile>, Error> {
        let json = self.client.get_json("/v2/files", &[]).await?;
        serde_json::from_value(json)
            .map_err(|e| Error::decode(format!("unexpected file list response: {e}")))
    }

    /// Delete a file by its server-assigned id.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.client.delete(&format!("/v2/files/{id}")).await
    }
}
