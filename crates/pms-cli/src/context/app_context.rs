use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use pms_client::ChangeRequestClient;
use pms_config::PmsConfig;
use pms_db::service::PmsService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: PmsService,
    pub config: PmsConfig,
    pub project_root: PathBuf,
    as_user: Option<String>,
}

impl AppContext {
    /// Open the local store under `project_root` using the storage settings.
    pub async fn init(
        project_root: PathBuf,
        config: PmsConfig,
        as_user: Option<String>,
    ) -> anyhow::Result<Self> {
        let db_path = storage_path(&project_root, &config.storage.db_path);
        if !config.storage.is_in_memory() {
            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let trail_dir = config
            .storage
            .trail_dir()
            .map(|dir| storage_path(&project_root, &dir.to_string_lossy()));

        let service = PmsService::new_local(&db_path.to_string_lossy(), trail_dir)
            .await
            .context("failed to initialize pms-db service")?;

        Ok(Self {
            service,
            config,
            project_root,
            as_user: as_user.filter(|user| !user.trim().is_empty()),
        })
    }

    /// The acting user: `--as` first, then `general.user_id`.
    pub fn actor(&self) -> anyhow::Result<&str> {
        if let Some(user) = &self.as_user {
            return Ok(user);
        }
        if self.config.general.has_user() {
            return Ok(&self.config.general.user_id);
        }
        anyhow::bail!("no acting user: pass --as <user> or set PMS_GENERAL__USER_ID")
    }

    /// Vessel for new requests: the explicit value, then `general.vessel_id`.
    pub fn vessel<'a>(&'a self, explicit: Option<&'a str>) -> anyhow::Result<&'a str> {
        match explicit.filter(|v| !v.trim().is_empty()) {
            Some(vessel) => Ok(vessel),
            None if !self.config.general.vessel_id.is_empty() => Ok(&self.config.general.vessel_id),
            None => anyhow::bail!("no vessel: pass --vessel or set PMS_GENERAL__VESSEL_ID"),
        }
    }

    /// Client for the configured server.
    pub fn client(&self) -> anyhow::Result<ChangeRequestClient> {
        let api = self.config.require_api()?;
        let token = api.has_token().then(|| api.token.clone());
        ChangeRequestClient::new(
            api.base_url_trimmed(),
            Duration::from_secs(api.timeout_secs),
            token,
        )
        .context("failed to build change-request API client")
    }
}

/// Resolve a configured storage path against the project root.
fn storage_path(project_root: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if configured == ":memory:" || path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::storage_path;

    #[test]
    fn relative_paths_land_under_project_root() {
        assert_eq!(
            storage_path(Path::new("/work/ship"), ".pms/pms.db"),
            Path::new("/work/ship/.pms/pms.db")
        );
    }

    #[test]
    fn absolute_and_memory_paths_are_kept() {
        assert_eq!(
            storage_path(Path::new("/work/ship"), "/var/lib/pms.db"),
            Path::new("/var/lib/pms.db")
        );
        assert_eq!(storage_path(Path::new("/work/ship"), ":memory:"), Path::new(":memory:"));
    }
}
