//! HTTP file backend
//!
//! Every operation is a `POST {base}/files` carrying
//! `{operation, path, content?, newPath?}`; the reply is
//! `{success, message, content?, files?}`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::kernel::services::ports::{BackendError, BackendFuture, FileBackend};
use crate::models::{path, DirEntry};

#[derive(Debug, Serialize)]
struct FileRequest<'a> {
    operation: &'static str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(rename = "newPath", skip_serializing_if = "Option::is_none")]
    new_path: Option<&'a str>,
}

impl<'a> FileRequest<'a> {
    fn new(operation: &'static str, path: &'a str) -> Self {
        Self {
            operation,
            path,
            content: None,
            new_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    files: Option<Vec<FileInfo>>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    name: String,
    #[serde(rename = "isDir", default)]
    is_dir: bool,
}

impl FileResponse {
    fn into_result(self) -> Result<Self, BackendError> {
        if self.success {
            Ok(self)
        } else if self.message.trim().is_empty() {
            Err(BackendError::Application("request failed".to_string()))
        } else {
            Err(BackendError::Application(self.message))
        }
    }
}

pub struct HttpFileBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFileBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoint: files_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, request: FileRequest<'_>) -> Result<FileResponse, BackendError> {
        tracing::debug!(operation = request.operation, path = request.path, "backend request");
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(format!("request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(BackendError::Transport(format!("HTTP {}", resp.status())));
        }
        let body = resp
            .json::<FileResponse>()
            .await
            .map_err(|e| BackendError::Transport(format!("parse error: {e}")))?;
        body.into_result()
    }
}

fn files_endpoint(base_url: &str) -> String {
    format!("{}/files", base_url.trim().trim_end_matches('/'))
}

/// Listing entries as the tree consumes them. Backends may report a full
/// path in `name`; only the last segment is kept.
fn into_entries(files: Option<Vec<FileInfo>>) -> Vec<DirEntry> {
    files
        .unwrap_or_default()
        .into_iter()
        .map(|f| DirEntry {
            name: path::file_name(&path::normalize(&f.name)).to_string(),
            is_dir: f.is_dir,
        })
        .collect()
}

impl FileBackend for HttpFileBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    fn list_directory<'a>(&'a self, dir: &'a str) -> BackendFuture<'a, Vec<DirEntry>> {
        Box::pin(async move {
            let resp = self.call(FileRequest::new("list", dir)).await?;
            Ok(into_entries(resp.files))
        })
    }

    fn read_file<'a>(&'a self, file: &'a str) -> BackendFuture<'a, String> {
        Box::pin(async move {
            let resp = self.call(FileRequest::new("read", file)).await?;
            Ok(resp.content.unwrap_or_default())
        })
    }

    fn write_file<'a>(&'a self, file: &'a str, content: String) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = FileRequest {
                content: Some(&content),
                ..FileRequest::new("write", file)
            };
            self.call(request).await.map(|_| ())
        })
    }

    fn rename_file<'a>(&'a self, from: &'a str, to: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = FileRequest {
                new_path: Some(to),
                ..FileRequest::new("rename", from)
            };
            self.call(request).await.map(|_| ())
        })
    }

    fn delete_file<'a>(&'a self, file: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move { self.call(FileRequest::new("delete", file)).await.map(|_| ()) })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/http.rs"]
mod tests;
