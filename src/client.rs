use std::fmt;

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::{ENV_API_KEY, StoreConfig};
use crate::endpoints::StoreEndpoint;
use crate::error::{Error, Result, StoreError};
use crate::gateway::Gateway;
use crate::payroll::employee::{self, Employee, EmployeeDraft};
use crate::repository::RecordId;

/// Asks the store to answer inserts, updates and deletes with the affected rows.
const PREFER_REPRESENTATION: &str = "return=representation";

#[derive(Clone)]
/// Authenticated client for the hosted data store.
pub struct Client {
    http: reqwest::Client,
    config: StoreConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Client {
    /// Builds a client carrying the project key on every request.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let invalid_key = |e: header::InvalidHeaderValue| Error::Config {
            variable: ENV_API_KEY,
            reason: e.to_string(),
        };

        let mut api_key = header::HeaderValue::from_str(&config.api_key).map_err(invalid_key)?;
        api_key.set_sensitive(true);
        let mut bearer = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(invalid_key)?;
        bearer.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert("Prefer", header::HeaderValue::from_static(PREFER_REPRESENTATION));

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { http, config })
    }

    /// Builds a client from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn build_request(&self, method: Method, endpoint: &StoreEndpoint) -> Result<RequestBuilder> {
        let url = endpoint.to_url(&self.config.url)?;
        Ok(self.http.request(method, url))
    }

    /// Perform a `GET` request against the store.
    #[instrument(skip(self))]
    pub async fn get<R: DeserializeOwned>(&self, endpoint: &StoreEndpoint) -> Result<R> {
        trace!(%endpoint, "making GET request");
        let response = self.build_request(Method::GET, endpoint)?.send().await?;
        Self::handle_response(response).await
    }

    /// Perform a `POST` request against the store.
    #[instrument(skip(self, data))]
    pub async fn post<R: DeserializeOwned, T: Serialize + ?Sized>(
        &self,
        endpoint: &StoreEndpoint,
        data: &T,
    ) -> Result<R> {
        trace!(%endpoint, "making POST request");
        let response = self
            .build_request(Method::POST, endpoint)?
            .json(data)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Perform a `PATCH` request against the store.
    #[instrument(skip(self, data))]
    pub async fn patch<R: DeserializeOwned, T: Serialize + ?Sized>(
        &self,
        endpoint: &StoreEndpoint,
        data: &T,
    ) -> Result<R> {
        trace!(%endpoint, "making PATCH request");
        let response = self
            .build_request(Method::PATCH, endpoint)?
            .json(data)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Perform a `DELETE` request against the store.
    #[instrument(skip(self))]
    pub async fn delete<R: DeserializeOwned>(&self, endpoint: &StoreEndpoint) -> Result<R> {
        trace!(%endpoint, "making DELETE request");
        let response = self.build_request(Method::DELETE, endpoint)?.send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(response))]
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().await?;
        debug!(%url, %status, bytes = text.len(), "store response");
        trace!("Response text:\n{}", text);

        if status.is_success() {
            // A representation request that touched nothing may answer with no body.
            let body = if text.trim().is_empty() || status == StatusCode::NO_CONTENT {
                "[]"
            } else {
                text.as_str()
            };
            return serde_json::from_str(body).map_err(|e| {
                error!(
                    "Deserialization error: {}, response text around that position: {}",
                    e,
                    text.chars().skip(e.column().saturating_sub(30)).take(100).collect::<String>()
                );
                Error::DeserializationError {
                    source: e,
                    body: Some(text.clone()),
                }
            });
        }

        let store = serde_json::from_str::<StoreError>(&text).unwrap_or_else(|_| {
            let reason = status.canonical_reason().unwrap_or("unexpected status");
            StoreError::new(if text.trim().is_empty() {
                format!("{} {reason}", status.as_u16())
            } else {
                text.clone()
            })
        });
        error!(
            %url,
            %status,
            code = ?store.code,
            message = %store.message,
            "store rejected the request"
        );
        Err(Error::persistence(store, Some(url), Some(status)))
    }

    /// Access the employees table.
    #[must_use]
    pub fn employees(&self) -> EmployeesApi<'_> {
        EmployeesApi { client: self }
    }
}

/// API handler for the employees table.
#[derive(Debug, Clone, Copy)]
pub struct EmployeesApi<'a> {
    client: &'a Client,
}

impl Gateway<Employee> for EmployeesApi<'_> {
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee> {
        employee::create(self.client, draft).await
    }

    async fn list(&self) -> Result<Vec<Employee>> {
        employee::list(self.client).await
    }

    async fn update(&self, id: RecordId, draft: &EmployeeDraft) -> Result<Employee> {
        employee::update(self.client, id, draft).await
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        employee::delete(self.client, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_key() {
        let config = StoreConfig::new("https://demo.supabase.co", "very-secret").unwrap();
        let client = Client::new(config).unwrap();
        assert!(!format!("{client:?}").contains("very-secret"));
    }

    #[test]
    fn keys_that_cannot_be_headers_are_config_errors() {
        let config = StoreConfig::new("https://demo.supabase.co", "bad\nkey").unwrap();
        let err = Client::new(config).unwrap_err();
        assert!(matches!(err, Error::Config { variable: ENV_API_KEY, .. }));
    }
}
