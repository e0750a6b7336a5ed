// Inbound webhook payload shapes
// Both the embed notification and the flat `{event, ...}` form

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("Event type is required")]
    MissingEventType,
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Embed {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_fields")]
    pub fields: Vec<EmbedField>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub timestamp: Option<String>,
}

impl Embed {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Value of the first field whose name matches any of `names` exactly.
    pub fn field(&self, names: &[&str]) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| names.contains(&field.name.as_str()))
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbedField {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlatEvent {
    pub event: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub killer: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub victim: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub weapon: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub distance: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub killer_steam_id: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub victim_steam_id: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub player: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub steam_id: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub weather: Option<String>,
    pub fps: Option<f64>,
    pub player_count: Option<f64>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub uptime: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone)]
pub enum WebhookPayload {
    Embed(Embed),
    Flat(FlatEvent),
}

impl WebhookPayload {
    /// Picks the payload shape. Only the first embed of a notification is
    /// meaningful; an object carrying neither embeds nor an event name is rejected.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut map) = value else {
            return Err(PayloadError::NotAnObject);
        };

        if let Some(Value::Array(embeds)) = map.remove("embeds") {
            if let Some(first) = embeds.into_iter().next() {
                let embed: Embed = serde_json::from_value(first)
                    .map_err(|err| PayloadError::Malformed(err.to_string()))?;
                return Ok(WebhookPayload::Embed(embed));
            }
        }

        match map.get("event") {
            Some(Value::String(event)) if !event.trim().is_empty() => {}
            _ => return Err(PayloadError::MissingEventType),
        }
        let flat: FlatEvent = serde_json::from_value(Value::Object(map))
            .map_err(|err| PayloadError::Malformed(err.to_string()))?;
        Ok(WebhookPayload::Flat(flat))
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(value).filter(|s| !s.trim().is_empty()))
}

/// A missing, null or non-list `fields` reads as no fields; entries that are
/// not objects are skipped.
fn lenient_fields<'de, D>(deserializer: D) -> Result<Vec<EmbedField>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embeds_take_precedence_over_flat_event() {
        let payload = WebhookPayload::from_value(json!({
            "event": "player_joined",
            "embeds": [{"title": "Server FPS", "fields": [{"name": "Average", "value": 58}]}]
        }))
        .expect("payload");
        match payload {
            WebhookPayload::Embed(embed) => {
                assert_eq!(embed.title(), "Server FPS");
                assert_eq!(embed.field(&["Average", "FPS"]), Some("58"));
            }
            WebhookPayload::Flat(_) => panic!("expected embed payload"),
        }
    }

    #[test]
    fn flat_event_accepts_numeric_steam_ids() {
        let payload = WebhookPayload::from_value(json!({
            "event": "kill_any_player",
            "killer": "Alice",
            "victim": "Bob",
            "weapon": "M4A1",
            "killerSteamId": 76561198000000002u64,
        }))
        .expect("payload");
        let WebhookPayload::Flat(flat) = payload else {
            panic!("expected flat payload");
        };
        assert_eq!(flat.killer_steam_id.as_deref(), Some("76561198000000002"));
        assert!(flat.victim_steam_id.is_none());
    }

    #[test]
    fn missing_event_type_is_rejected() {
        assert_eq!(
            WebhookPayload::from_value(json!({"embeds": []})).unwrap_err(),
            PayloadError::MissingEventType
        );
        assert_eq!(
            WebhookPayload::from_value(json!({"foo": 1})).unwrap_err(),
            PayloadError::MissingEventType
        );
        assert_eq!(
            WebhookPayload::from_value(json!([1, 2])).unwrap_err(),
            PayloadError::NotAnObject
        );
    }

    #[test]
    fn loosely_typed_embed_still_parses() {
        let payload = WebhookPayload::from_value(json!({
            "embeds": [{"title": "Server Startup", "fields": null, "timestamp": 1714564800}]
        }))
        .expect("payload");
        let WebhookPayload::Embed(embed) = payload else {
            panic!("expected embed payload");
        };
        assert_eq!(embed.title(), "Server Startup");
        assert!(embed.fields.is_empty());
        assert_eq!(embed.timestamp.as_deref(), Some("1714564800"));

        let payload = WebhookPayload::from_value(json!({
            "embeds": [{
                "title": null,
                "fields": [7, {"name": "Players", "value": "3/30"}]
            }]
        }))
        .expect("payload");
        let WebhookPayload::Embed(embed) = payload else {
            panic!("expected embed payload");
        };
        assert_eq!(embed.title(), "");
        assert_eq!(embed.field(&["Players"]), Some("3/30"));
    }
}
