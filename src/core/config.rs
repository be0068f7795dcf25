/*-------------------------------------------------------------------------------------------------
  Configuration
-------------------------------------------------------------------------------------------------*/

/// Country codes whose IPv4 allocations are synced into the managed prefix
/// list. Deploy-time constant; not part of the invocation input.
pub const COUNTRY_CODES: [&str; 8] = ["RU", "UA", "CN", "KP", "IR", "IQ", "TR", "TW"];

/// RIPEstat country-resource-list endpoint.
pub const REGISTRY_URL: &str = "https://stat.ripe.net/data/country-resource-list/data.json";

/// Maximum entry additions EC2 accepts in a single ModifyManagedPrefixList
/// call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Worker-pool bound for concurrent sub-batch submissions.
pub const MAX_WORKERS: usize = 10;

/// Recursion bound for batch splitting. The provider accepts
/// MAX_BATCH_SIZE-sized batches, so one split level suffices; the guard stops
/// runaway recursion if the limit is reported inconsistently.
pub const MAX_SPLIT_DEPTH: u32 = 4;
