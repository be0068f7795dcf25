use crate::core::config::COUNTRY_CODES;
use crate::core::errors::Result;
use crate::core::prefix_list::{apply_entries, PrefixListApi};
use crate::core::ranges::parse_resource;
use crate::core::registry::RegistryApi;
use chrono::NaiveDate;
use ipnetwork::Ipv4Network;
use log::{error, info};

/*-------------------------------------------------------------------------------------------------
  Sync Request and Response
-------------------------------------------------------------------------------------------------*/

/// The invocation input: the target managed prefix list's ID and its
/// human-readable name. Both are required; validation happens in
/// [SyncRequest::validate], before any external call.
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub prefix_list_id: Option<String>,
    pub prefix_list_name: Option<String>,
}

/// The invocation output: an HTTP-style status code and a human-readable
/// body. Per-country outcomes are observable only via logs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SyncResponse {
    pub status_code: u16,
    pub body: String,
}

/// A [SyncRequest] whose required fields are present.
#[derive(Debug, Clone)]
pub struct ValidSyncRequest {
    pub prefix_list_id: String,
    pub prefix_list_name: String,
}

impl SyncRequest {
    /// Validate the request, producing the 400-equivalent failure response
    /// when either required field is missing.
    pub fn validate(&self) -> std::result::Result<ValidSyncRequest, SyncResponse> {
        match (&self.prefix_list_id, &self.prefix_list_name) {
            (Some(prefix_list_id), Some(prefix_list_name)) => Ok(ValidSyncRequest {
                prefix_list_id: prefix_list_id.clone(),
                prefix_list_name: prefix_list_name.clone(),
            }),
            _ => Err(SyncResponse {
                status_code: 400,
                body: "Prefix List ID or Name is missing in the input.".to_string(),
            }),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Sync Workflow
-------------------------------------------------------------------------------------------------*/

/// Run the full sync workflow: validate the request, then process the
/// configured countries in order. Countries without registry data are logged
/// and skipped; an unclassified provider error aborts the run.
pub async fn handle<R: RegistryApi, P: PrefixListApi>(
    request: &SyncRequest,
    registry: &R,
    prefix_lists: &P,
    date: NaiveDate,
) -> Result<SyncResponse> {
    let request = match request.validate() {
        Ok(request) => request,
        Err(response) => return Ok(response),
    };

    run(&request, registry, prefix_lists, date).await
}

/// Process each configured country: fetch its IPv4 resources, build the entry
/// batch, and apply it to the prefix list with a freshly read version token.
pub async fn run<R: RegistryApi, P: PrefixListApi>(
    request: &ValidSyncRequest,
    registry: &R,
    prefix_lists: &P,
    date: NaiveDate,
) -> Result<SyncResponse> {
    for country_code in COUNTRY_CODES {
        let resources = match registry.ipv4_resources(country_code, date).await {
            Ok(Some(resources)) => resources,
            Ok(None) => {
                info!(
                    "No IPv4 resources found for country code {:?} and date {}; moving to the next country",
                    country_code, date
                );
                continue;
            }
            Err(registry_error) => {
                error!(
                    "Registry lookup for country code {:?} failed: {}; moving to the next country",
                    country_code, registry_error
                );
                continue;
            }
        };

        let entries = build_entry_batch(&resources)?;
        info!(
            "Country {}: {} resources expanded to {} prefix list entries",
            country_code,
            resources.len(),
            entries.len()
        );

        // Fresh version read per country: a prior country's modification is
        // visible to this one.
        let current_version = prefix_lists
            .current_version(&request.prefix_list_id)
            .await?;

        apply_entries(
            prefix_lists,
            &request.prefix_list_id,
            current_version,
            &entries,
        )
        .await?;
    }

    Ok(SyncResponse {
        status_code: 200,
        body: format!(
            "Prefix List '{}' updated with new prefixes for countries: {}.",
            request.prefix_list_name,
            COUNTRY_CODES.join(", ")
        ),
    })
}

/// Build the entry batch for one country: CIDR resources pass through
/// unchanged; `start-end` ranges expand to `/32` blocks.
fn build_entry_batch(resources: &[String]) -> Result<Vec<Ipv4Network>> {
    let mut entries = Vec::new();
    for resource in resources {
        entries.extend(parse_resource(resource)?);
    }
    Ok(entries)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
