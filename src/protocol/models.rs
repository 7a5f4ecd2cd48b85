//! License payload structs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// License type assumed when the payload omits `type`.
pub const DEFAULT_LICENSE_TYPE: &str = "standard";

/// Licensee assumed when the payload omits `issuedTo`.
pub const DEFAULT_ISSUED_TO: &str = "Unknown";

/// Payload as it appears inside the token, before required-field checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePayload {
    /// Bound machine fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    /// Expiry, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// License type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,
    /// Licensee name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_to: Option<String>,
    /// Issuance time, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
}

/// Decoded license payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicensePayload {
    /// Fingerprint of the machine this license is bound to.
    pub machine_id: String,

    /// End of the active period.
    pub expires_at: DateTime<Utc>,

    /// License type (e.g. "standard").
    #[serde(rename = "type")]
    pub license_type: String,

    /// Licensee name.
    pub issued_to: String,

    /// Issuance time, if the issuer recorded one.
    pub issued_at: Option<DateTime<Utc>>,
}

impl LicensePayload {
    /// Wire form with timestamps in ISO-8601 millisecond precision.
    pub fn to_wire(&self) -> WirePayload {
        WirePayload {
            machine_id: Some(self.machine_id.clone()),
            expires_at: Some(format_timestamp(&self.expires_at)),
            license_type: Some(self.license_type.clone()),
            issued_to: Some(self.issued_to.clone()),
            issued_at: self.issued_at.as_ref().map(format_timestamp),
        }
    }
}

/// Format a timestamp the way the issuer writes them: `2020-01-01T00:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 date-time.
///
/// Accepts RFC 3339 with any offset, a naive date-time (taken as UTC),
/// or a bare date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_zulu() {
        let ts = parse_timestamp("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_millis_and_offset() {
        let ts = parse_timestamp("2025-06-30T23:59:59.000+03:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 30, 20, 59, 59).unwrap());
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        let midnight = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-12-31T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2025-12-31"), Some(midnight));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2019-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_wire_payload_field_names() {
        let payload = LicensePayload {
            machine_id: "AAAA-AAAA-AAAA-AAAA".to_string(),
            expires_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            license_type: "standard".to_string(),
            issued_to: "Acme".to_string(),
            issued_at: None,
        };
        let json = serde_json::to_value(payload.to_wire()).unwrap();
        assert_eq!(json["machineId"], "AAAA-AAAA-AAAA-AAAA");
        assert_eq!(json["expiresAt"], "2020-01-01T00:00:00.000Z");
        assert_eq!(json["type"], "standard");
        assert_eq!(json["issuedTo"], "Acme");
        assert!(json.get("issuedAt").is_none());
    }
}
