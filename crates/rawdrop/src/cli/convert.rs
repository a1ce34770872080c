//! The `rawdrop convert` command for one-off conversions.

use clap::Args;
use rawdrop_core::{Config, OutputWriter, Rawdrop};
use std::path::PathBuf;
use std::time::Instant;

use super::options::ConversionArgs;
use super::types::StatusFormat;

/// Arguments for the `convert` command.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Raw file to convert
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub conversion: ConversionArgs,

    /// Status line format
    #[arg(short, long, value_enum, default_value_t = StatusFormat::Text)]
    pub format: StatusFormat,
}

/// Execute the convert command.
pub async fn execute(args: ConvertArgs, mut config: Config) -> anyhow::Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Not a file: {}", args.input.display());
    }

    args.conversion.apply(&mut config);
    config.apply_env_overrides()?;
    let rawdrop = Rawdrop::new(config)?;

    let start = Instant::now();
    let outcome = rawdrop.convert(&args.input).await;
    let elapsed = start.elapsed();

    let mut writer = OutputWriter::new(std::io::stdout(), args.format.into());
    writer.write_outcome(&outcome)?;
    eprintln!("Finished in {:.2}s", elapsed.as_secs_f64());

    if outcome.is_failed() {
        anyhow::bail!("Conversion failed: {}", args.input.display());
    }
    Ok(())
}
