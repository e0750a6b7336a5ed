// Steam identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

const PROFILE_PREFIX: &str = "76561";
const PROFILE_LEN: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(String);

impl SteamId {
    /// Accepts any non-empty run of ASCII digits, which is what the upstream
    /// notifier embeds in profile links and bracketed blocks.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Search-side check: a 64-bit community id is 17 digits starting with `76561`.
pub fn is_profile_steam_id(raw: &str) -> bool {
    raw.len() == PROFILE_LEN
        && raw.starts_with(PROFILE_PREFIX)
        && raw.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_digits_only() {
        assert_eq!(
            SteamId::parse(" 76561198000000001 ").map(SteamId::into_inner),
            Some("76561198000000001".to_string())
        );
        assert!(SteamId::parse("").is_none());
        assert!(SteamId::parse("7656abc").is_none());
    }

    #[test]
    fn profile_pattern_requires_prefix_and_length() {
        assert!(is_profile_steam_id("76561198000000001"));
        assert!(!is_profile_steam_id("76561198"));
        assert!(!is_profile_steam_id("12345678901234567"));
        assert!(!is_profile_steam_id("7656119800000000x"));
    }
}
