use crate::core::errors::Result;
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/*-------------------------------------------------------------------------------------------------
  IPv4 Range Expansion
-------------------------------------------------------------------------------------------------*/

/// Expand an inclusive IPv4 address range into the ordered sequence of
/// single-address (`/32`) prefixes covering it.
///
/// The caller is responsible for `start <= end`; a reversed range yields an
/// empty sequence. Large ranges produce large sequences (a full /16 range
/// expands to 65536 entries) - downstream batch splitting absorbs the volume.
///
/// ```
/// use std::net::Ipv4Addr;
///
/// let blocks = countryprefixsync::expand_range(
///     Ipv4Addr::new(203, 0, 113, 0),
///     Ipv4Addr::new(203, 0, 113, 2),
/// );
/// let blocks: Vec<String> = blocks.iter().map(|block| block.to_string()).collect();
/// assert_eq!(blocks, ["203.0.113.0/32", "203.0.113.1/32", "203.0.113.2/32"]);
/// ```
pub fn expand_range(start: Ipv4Addr, end: Ipv4Addr) -> Vec<Ipv4Network> {
    (u32::from(start)..=u32::from(end))
        .map(|address| {
            Ipv4Network::new(Ipv4Addr::from(address), 32)
                .expect("a /32 prefix is always a valid IPv4 network")
        })
        .collect()
}

/*-------------------------------------------------------------------------------------------------
  Registry Resource Parsing
-------------------------------------------------------------------------------------------------*/

/// Parse a registry IPv4 resource string into prefix list entries.
///
/// The registry reports resources in a mixed format: either a CIDR prefix
/// (`198.51.100.0/24`) or an inclusive address range (`203.0.113.5-203.0.113.7`).
/// CIDR resources pass through unchanged; ranges are expanded to `/32` blocks.
/// Malformed resources fail fast so an invalid entry never reaches the cloud
/// API.
pub fn parse_resource(resource: &str) -> Result<Vec<Ipv4Network>> {
    match resource.split_once('-') {
        Some((start, end)) => {
            let start: Ipv4Addr = start
                .trim()
                .parse()
                .map_err(|error| format!("Invalid range start in {:?}: {}", resource, error))?;
            let end: Ipv4Addr = end
                .trim()
                .parse()
                .map_err(|error| format!("Invalid range end in {:?}: {}", resource, error))?;
            Ok(expand_range(start, end))
        }
        None => {
            let prefix: Ipv4Network = resource
                .parse()
                .map_err(|error| format!("Invalid CIDR resource {:?}: {}", resource, error))?;
            Ok(vec![prefix])
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
