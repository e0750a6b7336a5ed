use std::collections::{BTreeMap, BTreeSet};

use backend_domain::{millis_to_rfc3339, IntegrityReport};

use crate::{AppError, AppState};

/// Looks for repeated kill tuples and kills whose killer lost their Steam id
/// even though the name belongs to a tracked identity.
pub async fn check_integrity(state: &AppState) -> Result<IntegrityReport, AppError> {
    let wipe = state.wipe();
    let events = state.kill_repo.fetch_kill_events(wipe).await?;
    let identities = state.identity_repo.fetch_identities(wipe).await?;

    let mut issues = Vec::new();

    let mut tuples = BTreeMap::new();
    for event in &events {
        let key = event.dedup_key();
        *tuples
            .entry((
                key.occurred_at,
                key.killer_name,
                key.victim_name,
                key.weapon,
                key.distance,
            ))
            .or_insert(0u64) += 1;
    }
    for ((at, killer, victim, weapon, distance), count) in tuples {
        if count > 1 {
            issues.push(format!(
                "duplicate kill {} -> {} ({}, {}) at {} stored {} times",
                killer,
                victim,
                weapon,
                distance,
                millis_to_rfc3339(at),
                count
            ));
        }
    }

    let mut unlinked = BTreeSet::new();
    for event in events.iter().filter(|e| e.killer_steam_id.is_none()) {
        if let Some(identity) = identities
            .iter()
            .find(|identity| identity.answers_to(&event.killer_name))
        {
            unlinked.insert((event.killer_name.clone(), identity.steam_id.to_string()));
        }
    }
    for (name, steam_id) in unlinked {
        issues.push(format!(
            "kills by '{}' lack a Steam ID but the name belongs to {}",
            name, steam_id
        ));
    }

    Ok(IntegrityReport {
        consistent: issues.is_empty(),
        issues,
    })
}
