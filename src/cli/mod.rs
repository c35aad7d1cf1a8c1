//! Command line interface for the release packager.

mod args;

pub use args::Args;

use crate::{
    error::Result,
    packager::{Pipeline, PlatformTarget, SystemRunner, Timestamp},
};

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let args = Args::parse_args();
    let settings = args.settings()?;
    let platform = PlatformTarget::host()?;

    let mut pipeline = Pipeline::new(&settings, &SystemRunner, platform);
    let artifact = pipeline.run(Timestamp::now()).await?;

    println!("Packaged to {}", artifact.path().display());
    Ok(())
}
