/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod config;
pub mod errors;
pub mod prefix_list;
pub mod ranges;
pub mod registry;
pub mod sync;
