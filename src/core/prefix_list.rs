use crate::core::config::{MAX_BATCH_SIZE, MAX_SPLIT_DEPTH, MAX_WORKERS};
use crate::core::errors::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::operation::modify_managed_prefix_list::ModifyManagedPrefixListError;
use aws_sdk_ec2::types::AddPrefixListEntry;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use ipnetwork::Ipv4Network;
use log::{info, warn};
use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Modify Errors
-------------------------------------------------------------------------------------------------*/

/// EC2 reports the over-limit condition as an `InvalidParameterValue` error
/// carrying this message text.
const ENTRY_LIMIT_MESSAGE: &str = "cannot contain more than 100 entry additions or removals";

/// Outcome taxonomy for a managed prefix list modification. Provider error
/// codes and message text are matched once, in [Ec2PrefixLists]; everything
/// downstream dispatches on these variants.
#[derive(Debug)]
pub enum ModifyError {
    /// The modification is invalid as a whole: entries already present or the
    /// list's maximum capacity would be exceeded. Treated as a benign skip.
    ModificationInvalid(String),

    /// The call carried more entry additions than the provider accepts in a
    /// single modification. Recoverable by batch splitting.
    EntryLimitExceeded(String),

    /// Any other provider failure, including optimistic-concurrency
    /// mismatches. Not handled locally.
    Other(Error),
}

impl fmt::Display for ModifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifyError::ModificationInvalid(message) => {
                write!(f, "Invalid prefix list modification: {}", message)
            }
            ModifyError::EntryLimitExceeded(message) => {
                write!(f, "Entry limit exceeded: {}", message)
            }
            ModifyError::Other(error) => write!(f, "Prefix list modification failed: {}", error),
        }
    }
}

impl std::error::Error for ModifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModifyError::Other(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Prefix List API
-------------------------------------------------------------------------------------------------*/

/// Interface to the cloud provider's managed prefix list operations. The
/// production implementation is [Ec2PrefixLists]; tests substitute a double.
#[async_trait]
pub trait PrefixListApi: Send + Sync {
    /// The list's current version token, fetched fresh. Required for the
    /// optimistic-concurrency check on every modification.
    async fn current_version(&self, prefix_list_id: &str) -> Result<i64>;

    /// Add entries to the list in a single modification call, presenting the
    /// expected current version.
    async fn add_entries(
        &self,
        prefix_list_id: &str,
        current_version: i64,
        entries: &[Ipv4Network],
    ) -> std::result::Result<(), ModifyError>;
}

/*-------------------------------------------------------------------------------------------------
  EC2 Prefix List Client
-------------------------------------------------------------------------------------------------*/

/// [PrefixListApi] implementation backed by the AWS EC2 API.
#[derive(Debug, Clone)]
pub struct Ec2PrefixLists {
    client: aws_sdk_ec2::Client,
}

impl Ec2PrefixLists {
    /// Create a client from the default AWS configuration (environment,
    /// shared config files, instance metadata).
    pub async fn new() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_ec2::Client::new(&config),
        }
    }

    /// Create a client from an explicitly constructed EC2 client.
    pub fn with_client(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PrefixListApi for Ec2PrefixLists {
    async fn current_version(&self, prefix_list_id: &str) -> Result<i64> {
        let output = self
            .client
            .describe_managed_prefix_lists()
            .prefix_list_ids(prefix_list_id)
            .send()
            .await?;

        output
            .prefix_lists()
            .first()
            .and_then(|prefix_list| prefix_list.version())
            .ok_or_else(|| format!("No managed prefix list found with ID {:?}", prefix_list_id).into())
    }

    async fn add_entries(
        &self,
        prefix_list_id: &str,
        current_version: i64,
        entries: &[Ipv4Network],
    ) -> std::result::Result<(), ModifyError> {
        let add_entries: Vec<AddPrefixListEntry> = entries
            .iter()
            .map(|entry| AddPrefixListEntry::builder().cidr(entry.to_string()).build())
            .collect::<std::result::Result<_, _>>()
            .map_err(|error| ModifyError::Other(Box::new(error)))?;

        self.client
            .modify_managed_prefix_list()
            .prefix_list_id(prefix_list_id)
            .current_version(current_version)
            .set_add_entries(Some(add_entries))
            .send()
            .await
            .map(|_| ())
            .map_err(classify_modify_error)
    }
}

/// Translate an EC2 modification error into the [ModifyError] taxonomy. The
/// provider's error codes and message text are matched here and nowhere else.
fn classify_modify_error(error: SdkError<ModifyManagedPrefixListError>) -> ModifyError {
    let message = error.message().unwrap_or_default().to_string();
    match error.code() {
        Some("InvalidPrefixListModification") => ModifyError::ModificationInvalid(message),
        Some("InvalidParameterValue") if message.contains(ENTRY_LIMIT_MESSAGE) => {
            ModifyError::EntryLimitExceeded(message)
        }
        _ => ModifyError::Other(Box::new(error)),
    }
}

/*-------------------------------------------------------------------------------------------------
  Batch Application
-------------------------------------------------------------------------------------------------*/

/// Apply an entry batch to a managed prefix list, handling the provider's
/// error taxonomy:
///
/// - [ModifyError::ModificationInvalid] (entries already present, capacity
///   exceeded) is logged and treated as a successful skip.
/// - [ModifyError::EntryLimitExceeded] splits the batch into
///   [MAX_BATCH_SIZE]-sized sub-batches submitted concurrently (at most
///   [MAX_WORKERS] in flight), all reusing the caller's version token. The
///   split recurses with the same policy, bounded by [MAX_SPLIT_DEPTH].
/// - Any other provider error propagates to the caller.
///
/// All sub-batches run to completion before a sub-batch failure surfaces. A
/// sub-batch that commits bumps the live version, so a sibling holding the now
/// stale token can fail the optimistic-concurrency check; that failure is
/// reported, not retried.
pub async fn apply_entries<A: PrefixListApi>(
    api: &A,
    prefix_list_id: &str,
    current_version: i64,
    entries: &[Ipv4Network],
) -> Result<()> {
    apply_batch(api, prefix_list_id, current_version, entries, 0).await
}

fn apply_batch<'a, A: PrefixListApi>(
    api: &'a A,
    prefix_list_id: &'a str,
    current_version: i64,
    entries: &'a [Ipv4Network],
    depth: u32,
) -> BoxFuture<'a, Result<()>> {
    async move {
        match api
            .add_entries(prefix_list_id, current_version, entries)
            .await
        {
            Ok(()) => {
                info!(
                    "Added {} entries to prefix list {} at version {}",
                    entries.len(),
                    prefix_list_id,
                    current_version
                );
                Ok(())
            }
            Err(ModifyError::ModificationInvalid(message)) => {
                warn!("Skipped updating prefix list {}: {}", prefix_list_id, message);
                Ok(())
            }
            Err(ModifyError::EntryLimitExceeded(message)) => {
                if depth >= MAX_SPLIT_DEPTH {
                    return Err(format!(
                        "Batch split depth limit ({}) reached for prefix list {}: {}",
                        MAX_SPLIT_DEPTH, prefix_list_id, message
                    )
                    .into());
                }

                info!(
                    "Batch of {} entries exceeds the per-call limit; splitting into {}-entry sub-batches",
                    entries.len(),
                    MAX_BATCH_SIZE
                );

                let results: Vec<Result<()>> = stream::iter(
                    entries.chunks(MAX_BATCH_SIZE).map(|sub_batch| {
                        apply_batch(api, prefix_list_id, current_version, sub_batch, depth + 1)
                    }),
                )
                .buffer_unordered(MAX_WORKERS)
                .collect()
                .await;

                // Every sub-batch runs to completion; the first failure wins.
                results.into_iter().collect::<Result<Vec<()>>>().map(|_| ())
            }
            Err(ModifyError::Other(error)) => Err(error),
        }
    }
    .boxed()
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ranges::expand_range;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;
    use test_log::test;

    /*-------------------------------------------------------------------------
      Prefix List API Double
    -------------------------------------------------------------------------*/

    enum MockMode {
        /// Accept batches up to MAX_BATCH_SIZE; reject larger ones with the
        /// over-limit error.
        EnforceLimit,
        /// Reject every batch with the over-limit error.
        AlwaysOverLimit,
        /// Reject every batch as an invalid modification.
        ModificationInvalid,
        /// Fail every batch with an unclassified error.
        OtherError,
    }

    struct MockPrefixLists {
        version: i64,
        mode: MockMode,
        calls: Mutex<Vec<(i64, usize)>>,
    }

    impl MockPrefixLists {
        fn new(mode: MockMode) -> Self {
            Self {
                version: 7,
                mode,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(i64, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PrefixListApi for MockPrefixLists {
        async fn current_version(&self, _prefix_list_id: &str) -> Result<i64> {
            Ok(self.version)
        }

        async fn add_entries(
            &self,
            _prefix_list_id: &str,
            current_version: i64,
            entries: &[Ipv4Network],
        ) -> std::result::Result<(), ModifyError> {
            self.calls
                .lock()
                .unwrap()
                .push((current_version, entries.len()));

            match self.mode {
                MockMode::EnforceLimit if entries.len() > MAX_BATCH_SIZE => {
                    Err(ModifyError::EntryLimitExceeded(format!(
                        "The request {}",
                        ENTRY_LIMIT_MESSAGE
                    )))
                }
                MockMode::EnforceLimit => Ok(()),
                MockMode::AlwaysOverLimit => Err(ModifyError::EntryLimitExceeded(format!(
                    "The request {}",
                    ENTRY_LIMIT_MESSAGE
                ))),
                MockMode::ModificationInvalid => Err(ModifyError::ModificationInvalid(
                    "The prefix list already contains the specified entries".to_string(),
                )),
                MockMode::OtherError => Err(ModifyError::Other(
                    "The prefix list has a different current version".into(),
                )),
            }
        }
    }

    fn entry_batch(count: u32) -> Vec<Ipv4Network> {
        let start = Ipv4Addr::new(10, 0, 0, 0);
        let end = Ipv4Addr::from(u32::from(start) + count - 1);
        expand_range(start, end)
    }

    /*-------------------------------------------------------------------------
      Test Batch Application
    -------------------------------------------------------------------------*/

    #[test(tokio::test)]
    async fn test_small_batch_single_call() {
        let api = MockPrefixLists::new(MockMode::EnforceLimit);
        let entries = entry_batch(40);

        apply_entries(&api, "pl-123", 7, &entries).await.unwrap();

        assert_eq!(api.calls(), vec![(7, 40)]);
    }

    #[test(tokio::test)]
    async fn test_full_batch_single_call() {
        let api = MockPrefixLists::new(MockMode::EnforceLimit);
        let entries = entry_batch(MAX_BATCH_SIZE as u32);

        apply_entries(&api, "pl-123", 7, &entries).await.unwrap();

        assert_eq!(api.calls(), vec![(7, MAX_BATCH_SIZE)]);
    }

    #[test(tokio::test)]
    async fn test_oversize_batch_splits_into_sub_batches() {
        let api = MockPrefixLists::new(MockMode::EnforceLimit);
        let entries = entry_batch(250);

        apply_entries(&api, "pl-123", 7, &entries).await.unwrap();

        let calls = api.calls();

        // One rejected top-level call followed by exactly three sub-batches
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], (7, 250));

        let mut sub_batch_sizes: Vec<usize> =
            calls[1..].iter().map(|(_, size)| *size).collect();
        sub_batch_sizes.sort_unstable();
        assert_eq!(sub_batch_sizes, vec![50, 100, 100]);

        // Every sub-batch reuses the version token of the original call
        assert!(calls.iter().all(|(version, _)| *version == 7));
    }

    #[test(tokio::test)]
    async fn test_invalid_modification_is_skipped() {
        let api = MockPrefixLists::new(MockMode::ModificationInvalid);
        let entries = entry_batch(10);

        let result = apply_entries(&api, "pl-123", 7, &entries).await;

        assert!(result.is_ok());
        assert_eq!(api.calls().len(), 1);
    }

    #[test(tokio::test)]
    async fn test_other_error_propagates() {
        let api = MockPrefixLists::new(MockMode::OtherError);
        let entries = entry_batch(10);

        let result = apply_entries(&api, "pl-123", 7, &entries).await;

        assert!(result.is_err());
        assert_eq!(api.calls().len(), 1);
    }

    #[test(tokio::test)]
    async fn test_split_depth_guard_terminates() {
        let api = MockPrefixLists::new(MockMode::AlwaysOverLimit);
        let entries = entry_batch(250);

        let result = apply_entries(&api, "pl-123", 7, &entries).await;

        assert!(result.is_err());
        // The guard bounds the recursion: one top-level call plus three
        // single-chunk resubmissions per remaining depth level
        assert!(api.calls().len() <= 1 + 3 * MAX_SPLIT_DEPTH as usize);
    }
}
