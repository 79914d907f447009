use anyhow::{Context, Result};
use log::debug;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::DemoState;

/// Demo state per client session id
pub type DemoSessions = HashMap<String, DemoState>;

/// JSON file holding every session's last saved [`DemoState`]. Last write wins.
#[derive(Debug, Clone)]
pub struct DemoStore {
    path: PathBuf,
}

impl DemoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means no sessions yet.
    pub async fn load(&self) -> Result<DemoSessions> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No demo state at {}, starting fresh", self.path.display());
                return Ok(DemoSessions::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        serde_json::from_slice(&raw)
            .with_context(|| format!("Malformed demo state in {}", self.path.display()))
    }

    pub async fn save(&self, sessions: &DemoSessions) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(sessions)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TokenCatalog;

    #[tokio::test]
    async fn missing_file_loads_no_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let store = DemoStore::new(dir.path().join("demo.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saved_state_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = DemoStore::new(dir.path().join("nested").join("demo.json"));
        let catalog = TokenCatalog::builtin().unwrap();

        let mut state = DemoState::default();
        state.enter();
        state
            .wallet_mut()
            .unwrap()
            .buy(&catalog.all()[0], 25.0)
            .unwrap();
        let mut sessions = DemoSessions::new();
        sessions.insert("a".to_string(), state.clone());
        sessions.insert("b".to_string(), DemoState::default());
        store.save(&sessions).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["a"], state);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(DemoStore::new(path).load().await.is_err());
    }
}
