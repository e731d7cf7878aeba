//! Helpers behind the admin warranty directory: list filtering, status
//! counts and the create/edit form.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::warranty::{WarrantyPayload, WarrantyRecord, WarrantyStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(WarrantyStatus),
}

impl StatusFilter {
    /// Accepts the dashboard's select values: `all` or a status name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        WarrantyStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
            .map(Self::Only)
    }

    fn admits(&self, status: Option<WarrantyStatus>) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => status == Some(*expected),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarrantyQuery {
    pub status: StatusFilter,
    pub search: String,
}

impl WarrantyQuery {
    pub fn matches(&self, record: &WarrantyRecord) -> bool {
        if !self.status.admits(record.warranty_status) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        record.serial_number.to_lowercase().contains(&needle)
            || record
                .nic_number
                .as_deref()
                .map(|nic| nic.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

/// Records admitted by `query`, in their original order.
pub fn filter_warranties<'a>(
    records: &'a [WarrantyRecord],
    query: &WarrantyQuery,
) -> Vec<&'a WarrantyRecord> {
    records.iter().filter(|record| query.matches(record)).collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WarrantyStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub inactive: usize,
}

impl WarrantyStats {
    pub fn from_records(records: &[WarrantyRecord]) -> Self {
        records.iter().fold(
            Self { total: records.len(), ..Self::default() },
            |mut stats, record| {
                match record.warranty_status {
                    Some(WarrantyStatus::Active) => stats.active += 1,
                    Some(WarrantyStatus::Expired) => stats.expired += 1,
                    Some(WarrantyStatus::Inactive) => stats.inactive += 1,
                    None => {}
                }
                stats
            },
        )
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WarrantyFormError {
    #[error("Serial number is required")]
    MissingSerial,
    #[error("{field} must be a date in YYYY-MM-DD form")]
    InvalidDate { field: &'static str },
}

/// Editable warranty fields as the form holds them. Dates are `YYYY-MM-DD`
/// or empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarrantyForm {
    pub serial_number: String,
    pub warranty_start_date: String,
    pub warranty_end_date: String,
    pub windows_key: String,
    pub nic_number: String,
    pub passcode: String,
}

impl WarrantyForm {
    /// Prefills the form for editing. The passcode is never echoed back.
    pub fn from_record(record: &WarrantyRecord) -> Self {
        Self {
            serial_number: record.serial_number.clone(),
            warranty_start_date: date_input(record.warranty_start_date.as_deref()),
            warranty_end_date: date_input(record.warranty_end_date.as_deref()),
            windows_key: record.windows_key.clone().unwrap_or_default(),
            nic_number: record.nic_number.clone().unwrap_or_default(),
            passcode: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), WarrantyFormError> {
        if self.serial_number.trim().is_empty() {
            return Err(WarrantyFormError::MissingSerial);
        }
        iso_midnight("warranty_start_date", &self.warranty_start_date)?;
        iso_midnight("warranty_end_date", &self.warranty_end_date)?;
        Ok(())
    }

    pub fn to_payload(&self) -> Result<WarrantyPayload, WarrantyFormError> {
        self.validate()?;

        Ok(WarrantyPayload {
            serial_number: self.serial_number.trim().to_string(),
            warranty_start_date: iso_midnight("warranty_start_date", &self.warranty_start_date)?,
            warranty_end_date: iso_midnight("warranty_end_date", &self.warranty_end_date)?,
            windows_key: self.windows_key.trim().to_string(),
            nic_number: self.nic_number.trim().to_string(),
            passcode: self.passcode.clone(),
        })
    }
}

fn date_input(raw: Option<&str>) -> String {
    raw.map(str::trim).and_then(|value| value.get(..10)).unwrap_or_default().to_string()
}

fn iso_midnight(field: &'static str, raw: &str) -> Result<String, WarrantyFormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")))
        .map_err(|_| WarrantyFormError::InvalidDate { field })
}
