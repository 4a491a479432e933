//! Host surfaces that receive print documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;
use thiserror::Error;

use super::GeneratedDocument;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The host would not open a new view. Callers fall back to a download.
    #[error("print view blocked: {0}")]
    Blocked(String),
    #[error("failed to write document: {0}")]
    Io(#[source] std::io::Error),
}

/// Where print documents go: a view that prints them, or a download.
pub trait PrintSurface {
    /// Open a new view of the document. The document prints itself once loaded.
    fn open_view(&self, document: &GeneratedDocument) -> Result<(), SurfaceError>;

    /// Offer the document as a file. Returns its location relative to the download directory.
    fn offer_download(&self, document: &GeneratedDocument) -> Result<String, SurfaceError>;
}

/// A surface that never opens views and saves every document into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySurface {
    dir: PathBuf,
}

impl DirectorySurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PrintSurface for DirectorySurface {
    fn open_view(&self, _document: &GeneratedDocument) -> Result<(), SurfaceError> {
        Err(SurfaceError::Blocked("surface has no viewer".to_string()))
    }

    fn offer_download(&self, document: &GeneratedDocument) -> Result<String, SurfaceError> {
        fs::create_dir_all(&self.dir).map_err(SurfaceError::Io)?;
        let path = self.dir.join(&document.filename);
        fs::write(&path, &document.bytes).map_err(SurfaceError::Io)?;
        log::info!("Saved download {}", path.display());
        Ok(document.filename.clone())
    }
}

/// Opens print documents with a desktop opener command such as `xdg-open`.
///
/// View files live in a private temporary directory that is removed with the surface.
pub struct DesktopSurface {
    opener: String,
    views: TempDir,
    downloads: DirectorySurface,
}

impl DesktopSurface {
    pub fn new(opener: impl Into<String>, download_dir: impl Into<PathBuf>) -> Result<Self, SurfaceError> {
        let views = tempfile::Builder::new()
            .prefix("pr-print-")
            .tempdir()
            .map_err(SurfaceError::Io)?;
        Ok(Self {
            opener: opener.into(),
            views,
            downloads: DirectorySurface::new(download_dir),
        })
    }
}

impl PrintSurface for DesktopSurface {
    fn open_view(&self, document: &GeneratedDocument) -> Result<(), SurfaceError> {
        let path = self.views.path().join(&document.filename);
        fs::write(&path, &document.bytes).map_err(SurfaceError::Io)?;

        let status = Command::new(&self.opener)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                log::warn!("Could not launch '{}': {}", self.opener, e);
                SurfaceError::Blocked(format!("'{}' could not be launched", self.opener))
            })?;

        if !status.success() {
            log::warn!("'{}' exited with {}", self.opener, status);
            return Err(SurfaceError::Blocked(format!(
                "'{}' exited with {}",
                self.opener, status
            )));
        }
        Ok(())
    }

    fn offer_download(&self, document: &GeneratedDocument) -> Result<String, SurfaceError> {
        self.downloads.offer_download(document)
    }
}
