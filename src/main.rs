use clap::Parser;
use kira_breakpoint::cli::Cli;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    tracing::info!(
        parallel = cfg!(feature = "mt"),
        "kira-breakpoint {}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();
    cli.dispatch()
}
