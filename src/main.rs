use chrono::Utc;
use clap::Parser;
use countryprefixsync::{Ec2PrefixLists, RegistryClient, SyncRequest};
use std::process::ExitCode;

mod cli;

/*-------------------------------------------------------------------------------------------------
  Main
-------------------------------------------------------------------------------------------------*/

#[tokio::main]
async fn main() -> countryprefixsync::Result<ExitCode> {
    let args = cli::Args::parse();
    cli::log::init(&args)?;

    let request = SyncRequest {
        prefix_list_id: args.prefix_list_id,
        prefix_list_name: args.prefix_list_name,
    };

    // Validate before constructing any client so the missing-input failure
    // makes no external calls, including AWS credential resolution.
    let response = match request.validate() {
        Err(response) => response,
        Ok(request) => {
            let registry = RegistryClient::new();
            let prefix_lists = Ec2PrefixLists::new().await;
            let date = Utc::now().date_naive();
            countryprefixsync::run(&request, &registry, &prefix_lists, date).await?
        }
    };

    println!("{}", response.body);

    if response.status_code == 200 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
