//! Keep an AWS managed prefix list in sync with the IPv4 ranges a fixed set
//! of countries currently advertises, as reported by the RIPEstat
//! country-resource-list API.
//!
//! The [handle] function runs the whole workflow against injectable
//! [RegistryApi] and [PrefixListApi] implementations; the binary wires it to
//! [RegistryClient] and [Ec2PrefixLists].

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

mod core;

pub use crate::core::config::{COUNTRY_CODES, MAX_BATCH_SIZE, MAX_WORKERS, REGISTRY_URL};
pub use crate::core::errors::{Error, Result};
pub use crate::core::prefix_list::{
    apply_entries, Ec2PrefixLists, ModifyError, PrefixListApi,
};
pub use crate::core::ranges::{expand_range, parse_resource};
pub use crate::core::registry::{RegistryApi, RegistryClient};
pub use crate::core::sync::{handle, run, SyncRequest, SyncResponse, ValidSyncRequest};
