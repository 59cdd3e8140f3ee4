use anyhow::Context;
use aq_preprocessor::cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("preprocessing run aborted")?;
    Ok(())
}
