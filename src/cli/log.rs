use crate::cli::Args;
use countryprefixsync::Result;

/*-------------------------------------------------------------------------------------------------
  Logging Configuration
-------------------------------------------------------------------------------------------------*/

/// Initialize stderr logging at the verbosity requested on the command line.
pub fn init(args: &Args) -> Result<()> {
    stderrlog::new()
        .verbosity(args.verbose.log_level_filter())
        .init()?;
    Ok(())
}
