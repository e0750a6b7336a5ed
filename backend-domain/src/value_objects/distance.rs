use std::fmt;

use serde::{Deserialize, Serialize};

/// Whole-meter kill distance, or one of the two sentinels the feed displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Distance {
    Meters(u32),
    Suicide,
    Unknown,
}

impl Distance {
    pub fn from_meters(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Distance::Meters(0);
        }
        Distance::Meters(value.round().min(u32::MAX as f64) as u32)
    }

    /// Lenient parse of stored or upstream text: `"350m"`, `"350.6 m"`, `"350"`,
    /// `"Suicide"`, `"Unknown"`. Anything without a leading number is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("suicide") {
            return Distance::Suicide;
        }
        let numeric: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        match numeric.parse::<f64>() {
            Ok(value) => Distance::from_meters(value),
            Err(_) => Distance::Unknown,
        }
    }

    pub fn meters(&self) -> u32 {
        match self {
            Distance::Meters(m) => *m,
            _ => 0,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Distance::Meters(_))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Meters(m) => write!(f, "{}m", m),
            Distance::Suicide => f.write_str("Suicide"),
            Distance::Unknown => f.write_str("Unknown"),
        }
    }
}

impl From<Distance> for String {
    fn from(value: Distance) -> Self {
        value.to_string()
    }
}

impl From<String> for Distance {
    fn from(value: String) -> Self {
        Distance::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rounds_to_whole_meters() {
        assert_eq!(Distance::parse("350m"), Distance::Meters(350));
        assert_eq!(Distance::parse("349.6 m"), Distance::Meters(350));
        assert_eq!(Distance::parse("12"), Distance::Meters(12));
        assert_eq!(Distance::parse("0m"), Distance::Meters(0));
    }

    #[test]
    fn parse_keeps_sentinels() {
        assert_eq!(Distance::parse("Suicide"), Distance::Suicide);
        assert_eq!(Distance::parse("Unknown"), Distance::Unknown);
        assert_eq!(Distance::parse(""), Distance::Unknown);
        assert_eq!(Distance::Suicide.to_string(), "Suicide");
        assert_eq!(Distance::Meters(41).to_string(), "41m");
    }
}
