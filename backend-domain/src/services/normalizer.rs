// Builds a complete kill candidate from a translated kill report

use std::sync::LazyLock;

use regex::Regex;

use crate::services::extractor::Entity;
use crate::services::translator::KillReport;
use crate::value_objects::Distance;

/// Killer name the upstream tool uses for self-deaths.
pub const SUICIDE_SENTINEL: &str = "Suicide";
pub const SELF_INFLICTED_WEAPON: &str = "Self-inflicted";
pub const UNKNOWN_WEAPON: &str = "Unknown";

static WEAPON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)\bwith\s+\[([^\]]+)\]", r"(?i)Weapon:[ \t]*([^\r\n]+)"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("weapon pattern"))
        .collect()
});

static DISTANCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bfrom\s+\[(\d+(?:\.\d+)?)\]\s*meters?",
        r"(?i)Distance:\s*(\d+(?:\.\d+)?)",
        r"(?i)\bat\s+(\d+(?:\.\d+)?)\s*m",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("distance pattern"))
    .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub struct KillCandidate {
    pub killer: Entity,
    pub victim: Entity,
    pub weapon: String,
    pub distance: Distance,
    pub occurred_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillRejection {
    UnidentifiedKiller,
    UnidentifiedVictim,
}

impl KillRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            KillRejection::UnidentifiedKiller => "killer could not be identified",
            KillRejection::UnidentifiedVictim => "victim could not be identified",
        }
    }
}

pub fn normalize_kill(report: KillReport) -> Result<KillCandidate, KillRejection> {
    let victim = report
        .victim
        .filter(|entity| !entity.is_unknown())
        .ok_or(KillRejection::UnidentifiedVictim)?;
    let mut killer = report
        .killer
        .filter(|entity| !entity.is_unknown())
        .ok_or(KillRejection::UnidentifiedKiller)?;

    if killer.name == SUICIDE_SENTINEL && victim.steam_id.is_some() {
        killer = victim.clone();
    }

    let details = report.details.as_deref().unwrap_or("");
    let weapon = first_capture(&WEAPON_PATTERNS, details)
        .or_else(|| report.weapon.as_deref().map(str::trim).filter(|w| !w.is_empty()).map(ToString::to_string));
    let distance = first_capture(&DISTANCE_PATTERNS, details)
        .and_then(|raw| raw.parse::<f64>().ok())
        .map(Distance::from_meters)
        .or_else(|| report.distance.as_deref().map(Distance::parse));

    let self_inflicted = killer.name == victim.name
        || killer.name == SUICIDE_SENTINEL
        || matches!(
            (&killer.steam_id, &victim.steam_id),
            (Some(k), Some(v)) if k == v
        );

    let weapon = weapon.unwrap_or_else(|| {
        if self_inflicted {
            SELF_INFLICTED_WEAPON.to_string()
        } else {
            UNKNOWN_WEAPON.to_string()
        }
    });
    let distance = distance.unwrap_or(if self_inflicted {
        Distance::Suicide
    } else {
        Distance::Meters(0)
    });

    Ok(KillCandidate {
        killer,
        victim,
        weapon,
        distance,
        occurred_at: report.occurred_at,
    })
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::extractor::extract_entity;
    use crate::value_objects::SteamId;

    fn report(killer: &str, victim: &str, details: Option<&str>) -> KillReport {
        KillReport {
            killer: extract_entity(Some(killer)),
            victim: extract_entity(Some(victim)),
            details: details.map(ToString::to_string),
            weapon: None,
            distance: None,
            occurred_at: 1_000,
        }
    }

    #[test]
    fn details_blob_yields_weapon_and_distance() {
        let candidate = normalize_kill(report(
            "Alice\n[76561198000000002]",
            "Bob\n[76561198000000001]",
            Some("Alice killed Bob with [AKM] from [349.5] meters"),
        ))
        .expect("candidate");
        assert_eq!(candidate.killer.name, "Alice");
        assert_eq!(candidate.victim.name, "Bob");
        assert_eq!(candidate.weapon, "AKM");
        assert_eq!(candidate.distance, Distance::Meters(350));
        assert_eq!(candidate.killer.steam_id, SteamId::parse("76561198000000002"));
    }

    #[test]
    fn first_matching_pattern_wins() {
        let candidate = normalize_kill(report(
            "Alice",
            "Bob",
            Some("with [Mosin] at 80m\nWeapon: SVD\nDistance: 500"),
        ))
        .expect("candidate");
        assert_eq!(candidate.weapon, "Mosin");
        assert_eq!(candidate.distance, Distance::Meters(500));

        let candidate = normalize_kill(report("Alice", "Bob", Some("Weapon: SVD\nshot at 81.4 m")))
            .expect("candidate");
        assert_eq!(candidate.weapon, "SVD");
        assert_eq!(candidate.distance, Distance::Meters(81));
    }

    #[test]
    fn explicit_fields_back_up_the_details_blob() {
        let mut input = report("Alice", "Bob", Some("no usable text"));
        input.weapon = Some("CR-75".to_string());
        input.distance = Some("12.6m".to_string());
        let candidate = normalize_kill(input).expect("candidate");
        assert_eq!(candidate.weapon, "CR-75");
        assert_eq!(candidate.distance, Distance::Meters(13));
    }

    #[test]
    fn suicide_sentinel_is_attributed_to_the_victim() {
        let candidate = normalize_kill(report("Suicide", "Bob\n[76561198000000001]", Some("")))
            .expect("candidate");
        assert_eq!(candidate.killer, candidate.victim);
        assert_eq!(candidate.weapon, SELF_INFLICTED_WEAPON);
        assert_eq!(candidate.distance, Distance::Suicide);
    }

    #[test]
    fn sentinel_without_victim_id_still_defaults_as_self_inflicted() {
        let candidate = normalize_kill(report("Suicide", "Bob", None)).expect("candidate");
        assert_eq!(candidate.killer.name, SUICIDE_SENTINEL);
        assert_eq!(candidate.weapon, SELF_INFLICTED_WEAPON);
        assert_eq!(candidate.distance, Distance::Suicide);
    }

    #[test]
    fn pvp_defaults_are_unknown_and_zero() {
        let candidate = normalize_kill(report("Alice", "Bob", None)).expect("candidate");
        assert_eq!(candidate.weapon, UNKNOWN_WEAPON);
        assert_eq!(candidate.distance, Distance::Meters(0));
    }

    #[test]
    fn unidentified_parties_are_rejected() {
        let mut input = report("Alice", "Bob", None);
        input.victim = None;
        assert_eq!(normalize_kill(input), Err(KillRejection::UnidentifiedVictim));
        assert_eq!(
            normalize_kill(report("Unknown", "Bob", None)),
            Err(KillRejection::UnidentifiedKiller)
        );
    }
}
