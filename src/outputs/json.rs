//! JSON payload for the dashboard collaborator.
//!
//! The payload mirrors what the dashboard's findings endpoint serves:
//!
//! ```text
//! {
//!   "findings": [ ...recent findings, newest first... ],
//!   "stats": { "totalFound": 42, "sourcesMonitored": 51, ... },
//!   "lastUpdated": "2026-10-19T06:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Finding, Statistics};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingsPayload<'a> {
    pub findings: &'a [Finding],
    pub stats: &'a Statistics,
    pub last_updated: DateTime<Utc>,
}

/// Serialize the payload as pretty-printed JSON.
pub fn render(
    findings: &[Finding],
    stats: &Statistics,
    last_updated: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&FindingsPayload {
        findings,
        stats,
        last_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FindingStatus;
    use chrono::TimeZone;

    #[test]
    fn test_payload_shape() {
        let finding = Finding {
            id: "ohio_0123456789abcdef".to_string(),
            reference_number: Some("BID-55".to_string()),
            title: "Health Plan Services".to_string(),
            region: "Ohio".to_string(),
            source: "Ohio Procurement".to_string(),
            url: "https://procure.ohio.gov/".to_string(),
            found_date: "2026-10-18T00:00:00+00:00".to_string(),
            keywords: vec!["health plan".to_string()],
            status: FindingStatus::Active,
            description: String::new(),
        };
        let stats = Statistics::fresh(51);
        let updated = Utc.with_ymd_and_hms(2026, 10, 19, 6, 0, 0).unwrap();

        let json = render(std::slice::from_ref(&finding), &stats, updated).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["findings"][0]["referenceNumber"], "BID-55");
        assert_eq!(value["stats"]["sourcesMonitored"], 51);
        assert_eq!(value["lastUpdated"], "2026-10-19T06:00:00Z");
    }
}
