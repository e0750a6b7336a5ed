use std::io::Read;

use anyhow::Result;
use axum::http::HeaderMap;
use flate2::read::GzDecoder;
use serde_json::Value;

use backend_domain::{PayloadError, RuntimeConfig, WebhookPayload};

/// Admin routes require `Authorization: Bearer <admin_token>`. Without a
/// configured token nothing is authorized.
pub fn authorize_admin(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    match &config.admin_token {
        Some(admin_token) => extract_bearer(headers)
            .map(|v| v == *admin_token)
            .unwrap_or(false),
        None => false,
    }
}

/// JSON body, gunzipped first when the sender says so.
pub fn decode_body(headers: &HeaderMap, body: &[u8]) -> Result<Value> {
    let content = maybe_gunzip(headers, body)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn parse_webhook(value: Value) -> Result<WebhookPayload, PayloadError> {
    WebhookPayload::from_value(value)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("") == "gzip" {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use axum::http::HeaderValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn config_with_token(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            admin_token: token.map(ToString::to_string),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn admin_gate_needs_a_configured_matching_token() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer s3cret"));

        assert!(authorize_admin(&config_with_token(Some("s3cret")), &headers));
        assert!(!authorize_admin(&config_with_token(Some("other")), &headers));
        assert!(!authorize_admin(&config_with_token(None), &headers));
        assert!(!authorize_admin(&config_with_token(Some("s3cret")), &HeaderMap::new()));
    }

    #[test]
    fn gzip_bodies_are_inflated() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"event":"player_joined"}"#).expect("write");
        let body = encoder.finish().expect("finish");

        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));
        let value = decode_body(&headers, &body).expect("decode");
        assert_eq!(value["event"], "player_joined");
    }

    #[test]
    fn payload_without_event_type_is_rejected() {
        let err = parse_webhook(serde_json::json!({"foo": 1})).expect_err("reject");
        assert_eq!(err, PayloadError::MissingEventType);
    }
}
