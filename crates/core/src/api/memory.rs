use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::api::wire::DEFAULT_VERIFY_FAILURE;
use crate::api::{
    ApiError, OrderReceipt, StorefrontApi, WarrantyCheckOutcome, WarrantyVerifyOutcome,
};
use crate::domain::order::OrderRequest;
use crate::domain::warranty::{parse_timestamp, WarrantyPayload, WarrantyRecord, WarrantyStatus};

/// In-process backend with the storefront's observable behaviour. Records are
/// keyed by id; serial numbers are unique.
#[derive(Default)]
pub struct InMemoryStorefrontApi {
    warranties: RwLock<HashMap<String, WarrantyRecord>>,
    orders: RwLock<Vec<OrderRequest>>,
    failures: Mutex<VecDeque<ApiError>>,
    requests: AtomicUsize,
}

impl InMemoryStorefrontApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_warranties(records: impl IntoIterator<Item = WarrantyRecord>) -> Self {
        let api = Self::new();
        {
            let mut warranties = api.warranties.write().await;
            for mut record in records {
                let id = record.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                record.id = Some(id.clone());
                warranties.insert(id, record);
            }
        }
        api
    }

    /// Queues an error returned by the next call instead of its normal answer.
    pub async fn fail_next(&self, error: ApiError) {
        self.failures.lock().await.push_back(error);
    }

    pub async fn orders(&self) -> Vec<OrderRequest> {
        self.orders.read().await.clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn begin_request(&self) -> Result<(), ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().await.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn find_by_serial(&self, serial_number: &str) -> Option<WarrantyRecord> {
        self.warranties
            .read()
            .await
            .values()
            .find(|record| record.serial_number == serial_number)
            .cloned()
    }
}

/// Coverage status as the backend reports it. A pinned status on the record
/// wins; otherwise coverage is active between the start and end dates.
pub fn derive_status(record: &WarrantyRecord, now: DateTime<Utc>) -> WarrantyStatus {
    if let Some(status) = record.warranty_status {
        return status;
    }

    let start = record.warranty_start_date.as_deref().and_then(parse_timestamp);
    let end = record.warranty_end_date.as_deref().and_then(parse_timestamp);

    match (start, end) {
        (Some(start), _) if start > now => WarrantyStatus::Inactive,
        (None, _) => WarrantyStatus::Inactive,
        (Some(_), Some(end)) if end < now => WarrantyStatus::Expired,
        (Some(_), _) => WarrantyStatus::Active,
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn record_from_payload(id: String, payload: &WarrantyPayload) -> WarrantyRecord {
    WarrantyRecord {
        id: Some(id),
        serial_number: payload.serial_number.trim().to_string(),
        warranty_start_date: non_empty(&payload.warranty_start_date),
        warranty_end_date: non_empty(&payload.warranty_end_date),
        windows_key: non_empty(&payload.windows_key),
        nic_number: non_empty(&payload.nic_number),
        passcode: non_empty(&payload.passcode),
        warranty_status: None,
    }
}

fn public_view(record: &WarrantyRecord, now: DateTime<Utc>) -> WarrantyRecord {
    WarrantyRecord {
        passcode: None,
        warranty_status: Some(derive_status(record, now)),
        ..record.clone()
    }
}

#[async_trait]
impl StorefrontApi for InMemoryStorefrontApi {
    async fn check_warranty(
        &self,
        serial_number: &str,
    ) -> Result<WarrantyCheckOutcome, ApiError> {
        self.begin_request().await?;
        let serial_number = serial_number.trim();

        let Some(record) = self.find_by_serial(serial_number).await else {
            return Ok(WarrantyCheckOutcome::NotFound);
        };

        match derive_status(&record, Utc::now()) {
            WarrantyStatus::Inactive => Ok(WarrantyCheckOutcome::Inactive {
                message: Some(format!(
                    "Warranty is not active for serial number {serial_number}"
                )),
            }),
            status => Ok(WarrantyCheckOutcome::PasscodeRequired { status: Some(status) }),
        }
    }

    async fn verify_warranty(
        &self,
        serial_number: &str,
        passcode: &str,
    ) -> Result<WarrantyVerifyOutcome, ApiError> {
        self.begin_request().await?;

        let record = self.find_by_serial(serial_number.trim()).await;
        match record {
            Some(record) if record.passcode.as_deref() == Some(passcode.trim()) => {
                Ok(WarrantyVerifyOutcome::Verified(public_view(&record, Utc::now())))
            }
            Some(_) => Ok(WarrantyVerifyOutcome::Rejected {
                message: Some(DEFAULT_VERIFY_FAILURE.to_string()),
            }),
            None => Ok(WarrantyVerifyOutcome::Rejected {
                message: Some("Warranty not found".to_string()),
            }),
        }
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        self.begin_request().await?;

        let mut orders = self.orders.write().await;
        orders.push(order.clone());
        Ok(OrderReceipt {
            order_id: Some(format!("ORD-{:04}", orders.len())),
            message: Some("Order placed successfully".to_string()),
        })
    }

    async fn list_warranties(&self) -> Result<Vec<WarrantyRecord>, ApiError> {
        self.begin_request().await?;

        let now = Utc::now();
        let mut records: Vec<WarrantyRecord> = self
            .warranties
            .read()
            .await
            .values()
            .map(|record| WarrantyRecord {
                warranty_status: Some(derive_status(record, now)),
                ..record.clone()
            })
            .collect();
        records.sort_by(|left, right| left.serial_number.cmp(&right.serial_number));
        Ok(records)
    }

    async fn create_warranty(&self, payload: &WarrantyPayload) -> Result<(), ApiError> {
        self.begin_request().await?;

        let serial_number = payload.serial_number.trim();
        if serial_number.is_empty() {
            return Err(ApiError::Rejected("Serial number is required".to_string()));
        }

        let mut warranties = self.warranties.write().await;
        if warranties.values().any(|record| record.serial_number == serial_number) {
            return Err(ApiError::Rejected("Serial number already exists".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        warranties.insert(id.clone(), record_from_payload(id, payload));
        Ok(())
    }

    async fn update_warranty(&self, id: &str, payload: &WarrantyPayload) -> Result<(), ApiError> {
        self.begin_request().await?;

        let mut warranties = self.warranties.write().await;
        if !warranties.contains_key(id) {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Warranty not found".to_string()),
            });
        }

        let serial_taken = warranties.iter().any(|(other_id, record)| {
            other_id != id && record.serial_number == payload.serial_number.trim()
        });
        if serial_taken {
            return Err(ApiError::Rejected("Serial number already exists".to_string()));
        }

        warranties.insert(id.to_string(), record_from_payload(id.to_string(), payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{derive_status, InMemoryStorefrontApi};
    use crate::api::{ApiError, StorefrontApi, WarrantyCheckOutcome, WarrantyVerifyOutcome};
    use crate::domain::warranty::{WarrantyPayload, WarrantyRecord, WarrantyStatus};

    fn record(serial: &str, start_offset_days: i64, end_offset_days: i64) -> WarrantyRecord {
        let now = Utc::now();
        WarrantyRecord {
            id: None,
            serial_number: serial.to_string(),
            warranty_start_date: Some((now + Duration::days(start_offset_days)).to_rfc3339()),
            warranty_end_date: Some((now + Duration::days(end_offset_days)).to_rfc3339()),
            windows_key: Some("WIN-KEY".to_string()),
            nic_number: Some("NIC-1".to_string()),
            passcode: Some("1234".to_string()),
            warranty_status: None,
        }
    }

    #[test]
    fn status_follows_coverage_window() {
        let now = Utc::now();
        assert_eq!(derive_status(&record("a", -10, 10), now), WarrantyStatus::Active);
        assert_eq!(derive_status(&record("b", -30, -1), now), WarrantyStatus::Expired);
        assert_eq!(derive_status(&record("c", 5, 100), now), WarrantyStatus::Inactive);

        let unstarted = WarrantyRecord { warranty_start_date: None, ..record("d", 0, 10) };
        assert_eq!(derive_status(&unstarted, now), WarrantyStatus::Inactive);

        let pinned = WarrantyRecord {
            warranty_status: Some(WarrantyStatus::Inactive),
            ..record("e", -1, 9)
        };
        assert_eq!(derive_status(&pinned, now), WarrantyStatus::Inactive);
    }

    #[tokio::test]
    async fn check_and_verify_follow_record_state() {
        let api = InMemoryStorefrontApi::with_warranties([
            record("SNI-ACTIVE", -10, 10),
            record("SNI-LATER", 3, 30),
        ])
        .await;

        assert_eq!(
            api.check_warranty(" SNI-ACTIVE ").await,
            Ok(WarrantyCheckOutcome::PasscodeRequired { status: Some(WarrantyStatus::Active) })
        );
        assert_eq!(api.check_warranty("SNI-NONE").await, Ok(WarrantyCheckOutcome::NotFound));
        assert!(matches!(
            api.check_warranty("SNI-LATER").await,
            Ok(WarrantyCheckOutcome::Inactive { message: Some(_) })
        ));

        let verified = api.verify_warranty("SNI-ACTIVE", "1234").await;
        let Ok(WarrantyVerifyOutcome::Verified(record)) = verified else {
            panic!("expected verification, got {verified:?}");
        };
        assert_eq!(record.passcode, None, "passcode never leaves the backend");

        assert!(matches!(
            api.verify_warranty("SNI-ACTIVE", "9999").await,
            Ok(WarrantyVerifyOutcome::Rejected { .. })
        ));
        assert_eq!(api.request_count(), 5);
    }

    #[tokio::test]
    async fn injected_failures_are_returned_once() {
        let api = InMemoryStorefrontApi::new();
        api.fail_next(ApiError::Transport("connection reset".to_string())).await;

        assert_eq!(
            api.check_warranty("SNI-1").await,
            Err(ApiError::Transport("connection reset".to_string()))
        );
        assert_eq!(api.check_warranty("SNI-1").await, Ok(WarrantyCheckOutcome::NotFound));
    }

    #[tokio::test]
    async fn admin_create_rejects_duplicate_serial_and_update_requires_known_id() {
        let api = InMemoryStorefrontApi::new();
        let payload = WarrantyPayload {
            serial_number: "SNI-NEW".to_string(),
            warranty_start_date: "2024-01-01T00:00:00.000Z".to_string(),
            ..WarrantyPayload::default()
        };

        api.create_warranty(&payload).await.expect("first create succeeds");
        assert_eq!(
            api.create_warranty(&payload).await,
            Err(ApiError::Rejected("Serial number already exists".to_string()))
        );

        let listed = api.list_warranties().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].windows_key, None);
        let id = listed[0].id.clone().expect("assigned id");

        let renamed = WarrantyPayload { nic_number: "NIC-77".to_string(), ..payload };
        api.update_warranty(&id, &renamed).await.expect("update succeeds");
        let listed = api.list_warranties().await.expect("list");
        assert_eq!(listed[0].nic_number.as_deref(), Some("NIC-77"));

        assert!(matches!(
            api.update_warranty("missing", &renamed).await,
            Err(ApiError::Status { status: 404, .. })
        ));
    }
    #[tokio::test]
    async fn update_rejects_a_serial_owned_by_another_record() {
        let api = InMemoryStorefrontApi::new();
        for serial in ["SNI-A", "SNI-B"] {
            let payload =
                WarrantyPayload { serial_number: serial.to_string(), ..WarrantyPayload::default() };
            api.create_warranty(&payload).await.expect("create");
        }

        let listed = api.list_warranties().await.expect("list");
        let id_of_b = listed
            .iter()
            .find(|record| record.serial_number == "SNI-B")
            .and_then(|record| record.id.clone())
            .expect("SNI-B has an id");

        let clash = WarrantyPayload { serial_number: "SNI-A".to_string(), ..Default::default() };
        assert_eq!(
            api.update_warranty(&id_of_b, &clash).await,
            Err(ApiError::Rejected("Serial number already exists".to_string()))
        );
        assert!(matches!(
            api.update_warranty("missing", &clash).await,
            Err(ApiError::Status { status: 404, .. })
        ));
    }
}
