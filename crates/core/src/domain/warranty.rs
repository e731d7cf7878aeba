use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Coverage status as reported by the backend. The client never derives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarrantyStatus {
    Active,
    Expired,
    Inactive,
}

impl WarrantyStatus {
    pub const ALL: [WarrantyStatus; 3] = [Self::Active, Self::Expired, Self::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Inactive => "Inactive",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

impl fmt::Display for WarrantyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyRecord {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub serial_number: String,
    #[serde(default)]
    pub warranty_start_date: Option<String>,
    #[serde(default)]
    pub warranty_end_date: Option<String>,
    #[serde(default)]
    pub windows_key: Option<String>,
    #[serde(default)]
    pub nic_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passcode: Option<String>,
    #[serde(default)]
    pub warranty_status: Option<WarrantyStatus>,
}

/// Body of the admin create/update endpoints. Empty strings mean "not set",
/// matching what the dashboard form submits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyPayload {
    pub serial_number: String,
    pub warranty_start_date: String,
    pub warranty_end_date: String,
    pub windows_key: String,
    pub nic_number: String,
    pub passcode: String,
}

/// Parses the timestamp shapes the backend emits: RFC 3339 or a bare `YYYY-MM-DD`
/// (taken as midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
