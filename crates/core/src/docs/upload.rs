//! The `upload_docs` command.

use std::path::{Path, PathBuf};

use tracing::{instrument, warn};

use super::DocsUploader;
use crate::config::{DocsConfig, UploadDocsConfig};
use crate::errors::DocsError;

/// Uploads the html build output.
#[derive(Debug)]
pub struct UploadDocsCommand<U> {
    uploader: U,
    html_dir: PathBuf,
}

/// `upload_docs.upload_dir` if configured, otherwise `<docs.build_dir>/html`.
pub fn resolve_upload_dir(root: &Path, docs: &DocsConfig, upload: &UploadDocsConfig) -> PathBuf {
    match &upload.upload_dir {
        Some(dir) => root.join(dir),
        None => root.join(&docs.build_dir).join("html"),
    }
}

impl<U: DocsUploader> UploadDocsCommand<U> {
    pub fn new(uploader: U, html_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploader,
            html_dir: html_dir.into(),
        }
    }

    pub fn html_dir(&self) -> &Path {
        &self.html_dir
    }

    #[instrument(skip_all, fields(html_dir = %self.html_dir.display()))]
    pub async fn run(&self) -> Result<(), DocsError> {
        if !self.html_dir.is_dir() {
            warn!("html output directory does not exist; run build-docs first");
        }
        self.uploader.upload(&self.html_dir).await
    }
}
