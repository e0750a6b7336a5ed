use crate::entities::EmbedField;
use crate::value_objects::EventKind;

/// Title keyword rules in precedence order. Several keywords can appear in one
/// title ("Player Killed Player"), so the first rule that matches decides.
const TITLE_RULES: &[(&[&str], EventKind)] = &[
    (&["killed player"], EventKind::AdminKillIgnored),
    (&["joined"], EventKind::PlayerJoined),
    (&["server fps"], EventKind::ServerFps),
    (&["restart"], EventKind::ServerRestart),
    (&["shutdown"], EventKind::ServerShutdown),
    (&["startup"], EventKind::ServerStartup),
    (&["kill", "eliminated", "death report"], EventKind::KillReport),
];

pub fn classify_title(title: &str) -> EventKind {
    let title = title.to_lowercase();
    TITLE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|(_, kind)| *kind)
        .unwrap_or(EventKind::Unrecognized)
}

/// Heuristic for unrecognized titles whose fields still look like a kill report.
pub fn looks_like_kill_fields(fields: &[EmbedField]) -> bool {
    fields.iter().any(|field| {
        let name = field.name.to_lowercase();
        name.contains("player") || name.contains("victim") || name.contains("killer")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_kill_wins_over_generic_kill() {
        assert_eq!(classify_title("Admin Killed Player"), EventKind::AdminKillIgnored);
        assert_eq!(classify_title("Kill / Death Report:"), EventKind::KillReport);
        assert_eq!(classify_title("Player Eliminated"), EventKind::KillReport);
    }

    #[test]
    fn precedence_follows_rule_order() {
        assert_eq!(classify_title("Player Joined"), EventKind::PlayerJoined);
        assert_eq!(classify_title("SERVER FPS"), EventKind::ServerFps);
        assert_eq!(classify_title("Scheduled restart after shutdown"), EventKind::ServerRestart);
        assert_eq!(classify_title("Server Shutdown"), EventKind::ServerShutdown);
        assert_eq!(classify_title("Server Startup"), EventKind::ServerStartup);
        assert_eq!(classify_title("Weather update"), EventKind::Unrecognized);
        assert_eq!(classify_title(""), EventKind::Unrecognized);
    }

    #[test]
    fn kill_like_fields_are_flagged() {
        let fields = vec![EmbedField {
            name: "Victim".to_string(),
            value: "Bob".to_string(),
        }];
        assert!(looks_like_kill_fields(&fields));
        assert!(!looks_like_kill_fields(&[]));
    }
}
