//! Persisted login state: the access/refresh credential pair.
//!
//! The pair lives at `$TRADEBOOK_HOME/.secrets/token.json` (0600 on unix) and is cleared on
//! logout or when the backend refuses a refresh.

use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An access/refresh token pair as issued by the backend's token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    access: String,
    refresh: String,
}

impl Session {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    pub fn access(&self) -> &str {
        &self.access
    }

    pub fn refresh(&self) -> &str {
        &self.refresh
    }

    /// Loads the session from `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path).await
    }

    /// Loads the session if the file exists, otherwise `None`.
    pub async fn load_if_present(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(Self::load(path).await?))
    }

    /// Saves the session to `path` with restrictive permissions.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        utils::write(path, content).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions)
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    /// Deletes the stored session. Not an error if there is nothing stored.
    pub async fn clear(path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Unable to remove session at {}", path.display()))
            }
        }
    }
}
