//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Vessel that new change requests are raised against.
    #[serde(default)]
    pub vessel_id: String,

    /// Acting user, recorded as requester, reviewer and commenter.
    #[serde(default)]
    pub user_id: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            vessel_id: String::new(),
            user_id: String::new(),
            default_limit: default_limit(),
        }
    }
}

impl GeneralConfig {
    /// Whether an acting user is known.
    #[must_use]
    pub fn has_user(&self) -> bool {
        !self.user_id.is_empty()
    }
}
