use clap::Parser;
use scout_app::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scout_app::run(Cli::parse()).await
}
