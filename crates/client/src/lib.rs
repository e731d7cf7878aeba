//! `reqwest` adapter for the storefront backend.
//!
//! Transport failures become [`ApiError::Transport`]; every answered request is
//! handed, status and raw body, to the decoders in `storefront_core::api::wire`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use storefront_core::api::wire::{self, CheckRequest, VerifyRequest};
use storefront_core::api::{
    ApiError, OrderReceipt, StorefrontApi, WarrantyCheckOutcome, WarrantyVerifyOutcome,
    ORDERS_PATH, WARRANTIES_PATH, WARRANTY_CHECK_PATH, WARRANTY_VERIFY_PATH,
};
use storefront_core::config::ApiConfig;
use storefront_core::domain::order::OrderRequest;
use storefront_core::domain::warranty::{WarrantyPayload, WarrantyRecord};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url `{0}`: expected an http:// or https:// origin")]
    InvalidBaseUrl(String),
    #[error("http client could not be built: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
    admin_token: Option<SecretString>,
}

impl HttpStorefrontApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url, admin_token: None })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        let api = Self::new(config.resolved_base_url(), Duration::from_secs(config.timeout_secs))?;
        Ok(match config.admin_token.clone() {
            Some(token) if config.has_admin_token() => api.with_admin_token(token),
            _ => api,
        })
    }

    pub fn with_admin_token(mut self, token: SecretString) -> Self {
        self.admin_token = Some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/api/warranties/{id}` with the id escaped as a single path segment.
    fn record_url(&self, id: &str) -> Result<Url, ApiError> {
        let invalid = || ApiError::Transport(format!("no request url for warranty `{id}`"));
        let mut url = Url::parse(&self.url(WARRANTIES_PATH)).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.admin_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(u16, Vec<u8>), ApiError> {
        self.send(path, self.client.post(self.url(path)).json(body)).await
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<(u16, Vec<u8>), ApiError> {
        let response = request.send().await.map_err(|error| {
            warn!(event_name = "api.request_failed", path, error = %error, "request not delivered");
            ApiError::Transport(error.to_string())
        })?;
        read_body(path, response).await
    }
}

async fn read_body(path: &str, response: Response) -> Result<(u16, Vec<u8>), ApiError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(|error| ApiError::Transport(error.to_string()))?;
    debug!(event_name = "api.response_received", path, status, bytes = body.len(), "response");
    Ok((status, body.to_vec()))
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn check_warranty(
        &self,
        serial_number: &str,
    ) -> Result<WarrantyCheckOutcome, ApiError> {
        let body = CheckRequest { serial_number: serial_number.to_string() };
        let (status, bytes) = self.post_json(WARRANTY_CHECK_PATH, &body).await?;
        wire::decode_check(status, &bytes)
    }

    async fn verify_warranty(
        &self,
        serial_number: &str,
        passcode: &str,
    ) -> Result<WarrantyVerifyOutcome, ApiError> {
        let body = VerifyRequest {
            serial_number: serial_number.to_string(),
            passcode: passcode.to_string(),
        };
        let (status, bytes) = self.post_json(WARRANTY_VERIFY_PATH, &body).await?;
        wire::decode_verify(status, &bytes)
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        let (status, bytes) = self.post_json(ORDERS_PATH, order).await?;
        wire::decode_order(status, &bytes)
    }

    async fn list_warranties(&self) -> Result<Vec<WarrantyRecord>, ApiError> {
        let request = self.authorized(self.client.get(self.url(WARRANTIES_PATH)));
        let (status, bytes) = self.send(WARRANTIES_PATH, request).await?;
        wire::decode_warranty_list(status, &bytes)
    }

    async fn create_warranty(&self, payload: &WarrantyPayload) -> Result<(), ApiError> {
        let request = self.authorized(self.client.post(self.url(WARRANTIES_PATH)).json(payload));
        let (status, bytes) = self.send(WARRANTIES_PATH, request).await?;
        wire::decode_save(status, &bytes)
    }

    async fn update_warranty(&self, id: &str, payload: &WarrantyPayload) -> Result<(), ApiError> {
        let url = self.record_url(id)?;
        let path = url.path().to_string();
        let request = self.authorized(self.client.put(url).json(payload));
        let (status, bytes) = self.send(&path, request).await?;
        wire::decode_save(status, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use storefront_core::config::{ApiConfig, ApiEnvironment};

    use super::{ClientError, HttpStorefrontApi};

    #[test]
    fn base_url_must_be_http() {
        let error = HttpStorefrontApi::new("localhost:5000", Duration::from_secs(5));
        assert!(matches!(error, Err(ClientError::InvalidBaseUrl(_))));
    }

    #[test]
    fn from_config_uses_environment_endpoint() {
        let config = ApiConfig {
            environment: ApiEnvironment::Production,
            base_url: None,
            timeout_secs: 10,
            admin_token: None,
        };

        let api = HttpStorefrontApi::from_config(&config).expect("client should build");
        assert_eq!(api.base_url(), "https://snibackend-production.up.railway.app");
        assert!(api.admin_token.is_none());
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let api = HttpStorefrontApi::new("http://127.0.0.1:9/", Duration::from_secs(5))
            .expect("client should build");
        assert_eq!(api.url("/api/orders"), "http://127.0.0.1:9/api/orders");
    }

    #[test]
    fn record_ids_stay_inside_one_path_segment() {
        let api = HttpStorefrontApi::new("http://127.0.0.1:9", Duration::from_secs(5))
            .expect("client should build");

        let plain = api.record_url("w-2").expect("record url");
        assert_eq!(plain.as_str(), "http://127.0.0.1:9/api/warranties/w-2");

        let hostile = api.record_url("a/b?c#d").expect("record url");
        assert_eq!(hostile.path(), "/api/warranties/a%2Fb%3Fc%23d");
        assert_eq!(hostile.query(), None);
    }
}
