use crate::core::config::REGISTRY_URL;
use crate::core::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;
use std::env;

/*-------------------------------------------------------------------------------------------------
  Registry API
-------------------------------------------------------------------------------------------------*/

/// Interface to the IP allocation registry. The production implementation is
/// [RegistryClient]; tests substitute a double.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// The sorted IPv4 resources (CIDR prefixes or `start-end` ranges)
    /// attributed to a country on the given date, or `None` when the registry
    /// has no data for that country.
    async fn ipv4_resources(&self, country_code: &str, date: NaiveDate)
        -> Result<Option<Vec<String>>>;
}

/*-------------------------------------------------------------------------------------------------
  Registry Client
-------------------------------------------------------------------------------------------------*/

/// A client for the RIPEstat `country-resource-list` API.
///
/// The [RegistryClient::new] method sources the endpoint URL from the
/// `COUNTRYPREFIXSYNC_REGISTRY_URL` environment variable when set and uses the
/// default RIPEstat endpoint when it is not set.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    url: String,
    http_client: reqwest::Client,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self {
            url: REGISTRY_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }
}

impl RegistryClient {
    pub fn new() -> Self {
        Self {
            url: get_env_var("COUNTRYPREFIXSYNC_REGISTRY_URL", REGISTRY_URL.to_string()),
            ..RegistryClient::default()
        }
    }

    /// Create a client for a specific endpoint URL.
    pub fn with_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..RegistryClient::default()
        }
    }

    /// Get the registry endpoint URL used by this client.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn ipv4_resources(
        &self,
        country_code: &str,
        date: NaiveDate,
    ) -> Result<Option<Vec<String>>> {
        let date = date.format("%Y-%m-%d").to_string();
        info!(
            "Get IPv4 resources; GET {} resource={} time={}",
            self.url, country_code, date
        );

        let response = self
            .http_client
            .get(&self.url)
            .query(&[("resource", country_code), ("time", date.as_str())])
            .send()
            .await?;

        // Registry unavailability is recoverable per country.
        if !response.status().is_success() {
            warn!(
                "Registry request for {} failed: HTTP {}",
                country_code,
                response.status()
            );
            return Ok(None);
        }

        let body: JsonCountryResources = response.json().await?;
        match body.data.resources.ipv4 {
            Some(resources) if !resources.is_empty() => {
                let mut resources = resources;
                // Registry ordering is not trusted; sort for determinism.
                resources.sort_unstable();
                Ok(Some(resources))
            }
            _ => Ok(None),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  JSON Data Structures
-------------------------------------------------------------------------------------------------*/

#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
pub struct JsonCountryResources {
    #[serde(default)]
    pub data: JsonData,
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
pub struct JsonData {
    #[serde(default)]
    pub resources: JsonResources,
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
pub struct JsonResources {
    #[serde(default)]
    pub ipv4: Option<Vec<String>>,
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get an environment variable value or return a default value.
fn get_env_var(env_var: &str, default: String) -> String {
    env::var(env_var)
        .ok()
        .inspect(|value| info!("Using {}: {}", env_var, value))
        .unwrap_or(default)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
