// Wipe epoch value object

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIPE_EPOCH: &str = "wipe_1";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WipeEpoch(pub String);

impl WipeEpoch {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WipeEpoch {
    fn default() -> Self {
        Self(DEFAULT_WIPE_EPOCH.to_string())
    }
}

impl From<&str> for WipeEpoch {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl fmt::Display for WipeEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
