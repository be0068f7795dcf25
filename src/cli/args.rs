use clap::Parser;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about="Sync country IPv4 ranges from RIPEstat into an AWS managed prefix list.", long_about = None)]
pub struct Args {
    /// ID of the target managed prefix list (e.g. pl-0123456789abcdef0)
    #[arg(short = 'l', long = "prefix-list-id")]
    pub prefix_list_id: Option<String>,

    /// Display name of the target managed prefix list
    #[arg(short = 'n', long = "prefix-list-name")]
    pub prefix_list_name: Option<String>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}
