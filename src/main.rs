use clap::Parser;
use sales_report_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::HashPassword(args) => cli::hash_password::run(args),
    }
}
