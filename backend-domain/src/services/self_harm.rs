use crate::entities::KillEvent;
use crate::value_objects::Distance;

const SELF_HARM_MARKERS: [&str; 4] = ["suicide", "fall", "environment", "self-inflicted"];

pub fn weapon_is_self_harm(weapon: &str) -> bool {
    let weapon = weapon.to_lowercase();
    SELF_HARM_MARKERS.iter().any(|marker| weapon.contains(marker))
}

/// Shared self-inflicted predicate. Every leaderboard uses this one function:
/// kill views exclude what it accepts and the respawn view counts exactly that.
pub fn is_self_inflicted(event: &KillEvent) -> bool {
    if event.killer_name == event.victim_name {
        return true;
    }
    if let (Some(killer), Some(victim)) = (&event.killer_steam_id, &event.victim_steam_id) {
        if killer == victim {
            return true;
        }
    }
    event.distance == Distance::Suicide || weapon_is_self_harm(&event.weapon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::SteamId;

    fn event(killer: &str, victim: &str, weapon: &str, distance: Distance) -> KillEvent {
        KillEvent {
            id: "id".to_string(),
            killer_name: killer.to_string(),
            victim_name: victim.to_string(),
            weapon: weapon.to_string(),
            distance,
            killer_steam_id: None,
            victim_steam_id: None,
            wipe_epoch: "wipe_1".to_string(),
            occurred_at: 0,
        }
    }

    #[test]
    fn names_steam_ids_and_markers_all_count() {
        assert!(is_self_inflicted(&event("Bob", "Bob", "AKM", Distance::Meters(3))));
        assert!(is_self_inflicted(&event("Alice", "Bob", "Fall Damage", Distance::Meters(0))));
        assert!(is_self_inflicted(&event("Alice", "Bob", "Self-inflicted", Distance::Suicide)));
        assert!(!is_self_inflicted(&event("bob", "Bob", "AKM", Distance::Meters(3))));

        let mut same_id = event("OldName", "NewName", "M4A1", Distance::Meters(10));
        same_id.killer_steam_id = SteamId::parse("76561198000000001");
        same_id.victim_steam_id = SteamId::parse("76561198000000001");
        assert!(is_self_inflicted(&same_id));
    }
}
