use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use spelunk::{IgnoreOptions, RendererOptions, ServeOptions, SpelunkOptions, run_main};
use spelunk_error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "spelunk",
    about = "spelunk: look inside a running application's component graph and draw it",
    version
)]
pub struct Cli {
    /// JSON snapshot of the component registry
    #[arg(long, value_name = "FILE")]
    registry: PathBuf,

    #[command(flatten)]
    serve: ServeOptions,

    #[command(flatten)]
    renderer: RendererOptions,

    #[command(flatten)]
    ignore: IgnoreOptions,
}

pub async fn run(args: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let opts = SpelunkOptions {
        registry: args.registry,
        serve: args.serve,
        renderer: args.renderer,
        ignore: args.ignore,
    };

    if let Err(e) = run_main(&opts).await {
        eprintln!("Error: {e}");
        tracing::error!(error = %e, "execution failed");
        return Err(e);
    }
    Ok(())
}

#[tokio::main]
pub async fn main() -> Result<()> {
    let args = Cli::parse();
    run(args).await
}
