use clap::Parser;
use plaza_client::app::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    app::init_tracing();
    app::run(cli).await
}
