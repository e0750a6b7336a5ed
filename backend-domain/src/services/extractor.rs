use std::sync::LazyLock;

use regex::Regex;

use crate::value_objects::SteamId;

/// Display name used wherever a party could not be identified.
pub const UNKNOWN_NAME: &str = "Unknown";

static PROFILE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(https?://steamcommunity\.com/profiles/(\d+)/?\)")
        .expect("profile link pattern")
});

static BRACKETED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("bracketed id pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub steam_id: Option<SteamId>,
}

impl Entity {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steam_id: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_NAME
    }
}

/// Pulls a player name and optional Steam id out of a raw field value.
///
/// Conventions, first match wins:
/// 1. `[name](https://steamcommunity.com/profiles/<digits>)`
/// 2. name on the first line with a `[<digits>]` line below it
/// 3. the trimmed value as a plain name
///
/// Empty or missing input yields `None`; callers render that as [`UNKNOWN_NAME`].
pub fn extract_entity(raw: Option<&str>) -> Option<Entity> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = PROFILE_LINK.captures(value) {
        let name = caps[1].trim();
        if !name.is_empty() {
            return Some(Entity {
                name: name.to_string(),
                steam_id: SteamId::parse(&caps[2]),
            });
        }
    }

    if let Some(caps) = BRACKETED_ID.captures(value) {
        let name = value.lines().next().unwrap_or("").trim();
        if name.is_empty() {
            return None;
        }
        return Some(Entity {
            name: name.to_string(),
            steam_id: SteamId::parse(&caps[1]),
        });
    }

    Some(Entity::named(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steam(raw: &str) -> Option<SteamId> {
        SteamId::parse(raw)
    }

    #[test]
    fn markdown_link_yields_label_and_profile_digits() {
        for name in ["sloppywet", "Dr. Bean", "xX_killer_Xx", "名前"] {
            let raw = format!("[{}](https://steamcommunity.com/profiles/76561199090623011)", name);
            let entity = extract_entity(Some(&raw)).expect("entity");
            assert_eq!(entity.name, name);
            assert_eq!(entity.steam_id, steam("76561199090623011"));
        }
    }

    #[test]
    fn bracketed_block_uses_first_line_as_name() {
        let entity = extract_entity(Some("Bob\n[76561198000000001]\n[Steam Profile]"))
            .expect("entity");
        assert_eq!(entity.name, "Bob");
        assert_eq!(entity.steam_id, steam("76561198000000001"));
    }

    #[test]
    fn plain_text_has_no_steam_id() {
        let entity = extract_entity(Some("  Survivor  ")).expect("entity");
        assert_eq!(entity, Entity::named("Survivor"));
    }

    #[test]
    fn empty_input_is_unidentified() {
        assert!(extract_entity(None).is_none());
        assert!(extract_entity(Some("   ")).is_none());
    }

    #[test]
    fn only_the_exact_placeholder_is_unknown() {
        assert!(extract_entity(Some("Unknown")).expect("entity").is_unknown());
        assert!(!extract_entity(Some("unknown")).expect("entity").is_unknown());
        assert!(!extract_entity(Some("UNKNOWN")).expect("entity").is_unknown());
    }
}
