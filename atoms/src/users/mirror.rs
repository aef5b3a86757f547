use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use super::model::User;

pub const DEFAULT_MIRROR_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize user: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to move {from} into place: {source}")]
    Rename {
        from: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Write-only JSON snapshots of user records, one file per user.
///
/// The service never reads these back. A failed write is logged and
/// otherwise ignored.
#[derive(Debug, Clone)]
pub struct UserMirror {
    dir: PathBuf,
    timeout: Duration,
}

impl UserMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timeout: DEFAULT_MIRROR_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("user_{}.json", user_id))
    }

    /// Writes `user` as pretty-printed JSON, replacing any previous snapshot.
    ///
    /// The snapshot is written to a sibling temp file and renamed over the
    /// target, so a reader only ever sees a complete document.
    pub async fn write(&self, user: &User) -> Result<PathBuf, MirrorError> {
        tokio::time::timeout(self.timeout, self.write_file(user))
            .await
            .map_err(|_| MirrorError::TimedOut(self.timeout))?
    }

    async fn write_file(&self, user: &User) -> Result<PathBuf, MirrorError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| MirrorError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path_for(&user.id);
        let tmp = self
            .dir
            .join(format!(".user_{}.{}.tmp", user.id, Uuid::new_v4().simple()));
        let data = serde_json::to_vec_pretty(user)?;

        if let Err(source) = tokio::fs::write(&tmp, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(MirrorError::Write { path: tmp, source });
        }
        if let Err(source) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(MirrorError::Rename { from: tmp, source });
        }
        Ok(path)
    }

    /// Best-effort variant of [`write`](Self::write): logs the outcome and never fails.
    pub async fn record(&self, user: &User) {
        match self.write(user).await {
            Ok(path) => tracing::info!("User saved to persistent storage: {}", path.display()),
            Err(e) => tracing::error!(user_id = %user.id, "Failed to save user to file: {}", e),
        }
    }
}
