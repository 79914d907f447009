use anyhow::{anyhow, Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::entity::{AppError, UserRecord};

/// Users kept as newline-delimited JSON in a flat file.
///
/// No index: lookups scan the file. Writers are serialized so that the
/// duplicate check and the append happen as one step.
pub struct UserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in file order; a missing file is an empty store
    pub async fn load_all(&self) -> Result<Vec<UserRecord>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    anyhow!("Malformed user record on line {}: {}", index + 1, e)
                })
            })
            .collect()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|user| user.email == email))
    }

    /// Append `user` unless the email is taken
    pub async fn insert(&self, user: &UserRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::UserExists.into());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(user)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!("Stored user {} in {}", user.id, self.path.display());

        Ok(())
    }
}
