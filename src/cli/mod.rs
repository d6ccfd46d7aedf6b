use clap::{Parser, Subcommand};

mod classify;
mod common;
mod scan;
mod validate;

#[derive(Parser, Debug)]
#[command(name = "kira-breakpoint", version, about = "Kira Breakpoint CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan every DIA breakpoint pair and rank them
    Scan(scan::ScanArgs),
    /// Report categories and indices for one DIA breakpoint pair
    Classify(classify::ClassifyArgs),
    /// Load the input and write load statistics and the density grid
    Validate(validate::ValidateArgs),
}

impl Cli {
    pub fn dispatch(self) -> anyhow::Result<()> {
        match self.command {
            Command::Scan(args) => scan::handle(args),
            Command::Classify(args) => classify::handle(args),
            Command::Validate(args) => validate::handle(args),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/mod.rs"]
mod tests;
