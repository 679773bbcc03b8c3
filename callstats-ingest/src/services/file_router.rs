//! File lifecycle routing: inbox → archive | error
//!
//! Every move is a single `rename` inside the root folder, so a file is never
//! visible in two locations. Staging writes to a hidden temporary name in the
//! inbox first; a half-written upload never appears under its real name.

use callstats_common::config::FolderLayout;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where a report file currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Inbox,
    Archive,
    Error,
}

#[derive(Debug, Error)]
#[error("Could not {action} {filename}: {source}")]
pub struct RouterError {
    pub action: &'static str,
    pub filename: String,
    #[source]
    pub source: std::io::Error,
}

/// Moves report files between the inbox, archive and error folders
#[derive(Debug, Clone)]
pub struct FileRouter {
    inbox: PathBuf,
    archive: PathBuf,
    error: PathBuf,
}

impl FileRouter {
    pub fn new(layout: &FolderLayout) -> Self {
        Self {
            inbox: layout.inbox.clone(),
            archive: layout.archive.clone(),
            error: layout.error.clone(),
        }
    }

    fn dir(&self, location: Location) -> &Path {
        match location {
            Location::Inbox => &self.inbox,
            Location::Archive => &self.archive,
            Location::Error => &self.error,
        }
    }

    pub fn path_of(&self, location: Location, filename: &str) -> PathBuf {
        self.dir(location).join(filename)
    }

    /// Write uploaded bytes into the inbox under `filename`
    pub async fn stage(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, RouterError> {
        let partial = self.inbox.join(format!(".{}.partial", filename));
        let target = self.path_of(Location::Inbox, filename);

        let err = |source| RouterError {
            action: "stage",
            filename: filename.to_string(),
            source,
        };

        tokio::fs::write(&partial, bytes).await.map_err(err)?;
        if let Err(source) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err(source));
        }

        tracing::debug!(filename, path = %target.display(), "Staged upload in inbox");
        Ok(target)
    }

    /// inbox → archive
    pub async fn to_archive(&self, filename: &str) -> Result<PathBuf, RouterError> {
        self.relocate(filename, Location::Inbox, Location::Archive).await
    }

    /// inbox → error
    pub async fn to_error(&self, filename: &str) -> Result<PathBuf, RouterError> {
        self.relocate(filename, Location::Inbox, Location::Error).await
    }

    /// Atomic rename between two locations
    pub async fn relocate(
        &self,
        filename: &str,
        from: Location,
        to: Location,
    ) -> Result<PathBuf, RouterError> {
        let source_path = self.path_of(from, filename);
        let target_path = self.path_of(to, filename);

        tokio::fs::rename(&source_path, &target_path)
            .await
            .map_err(|source| RouterError {
                action: match to {
                    Location::Archive => "archive",
                    Location::Error => "move to error",
                    Location::Inbox => "return to inbox",
                },
                filename: filename.to_string(),
                source,
            })?;

        tracing::info!(filename, from = ?from, to = ?to, "Moved report file");
        Ok(target_path)
    }

    /// Every location currently holding `filename` as a regular file
    pub async fn locate(&self, filename: &str) -> Vec<Location> {
        let mut found = Vec::new();
        for location in [Location::Inbox, Location::Archive, Location::Error] {
            match tokio::fs::metadata(self.path_of(location, filename)).await {
                Ok(meta) if meta.is_file() => found.push(location),
                _ => {}
            }
        }
        found
    }
}

/// Reduce an uploaded filename to a safe single path component
///
/// Keeps the last path segment, maps whitespace to `_`, drops anything
/// outside `[A-Za-z0-9._-]` and strips leading dots. May return "".
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}
