//! The `rawdrop watch` command.

use clap::Args;
use rawdrop_core::{Config, OutputWriter, Rawdrop};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use super::options::ConversionArgs;
use super::types::StatusFormat;

/// Arguments for the `watch` command.
#[derive(Args, Debug, Default)]
pub struct WatchArgs {
    /// Directory (or single raw file) to watch; defaults to `watch.root` from config
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub conversion: ConversionArgs,

    /// Seconds to sleep between scans
    #[arg(short = 'i', long)]
    pub poll_interval: Option<u64>,

    /// Scan once, convert, and exit
    #[arg(long)]
    pub run_once: bool,

    /// Number of files converted concurrently
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Status line format
    #[arg(short, long, value_enum, default_value_t = StatusFormat::Text)]
    pub format: StatusFormat,
}

impl WatchArgs {
    /// Layer CLI flags, then `RAWDROP_*` environment variables, over `config`.
    pub fn resolve(&self, mut config: Config) -> anyhow::Result<Config> {
        self.apply(&mut config);
        config.apply_env_overrides()?;
        config.check()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.watch.root = Some(root.clone());
        }
        self.conversion.apply(config);
        if let Some(interval) = self.poll_interval {
            config.watch.poll_interval_secs = interval;
        }
        if self.run_once {
            config.watch.run_once = true;
        }
        if let Some(parallel) = self.parallel {
            config.watch.parallel_workers = parallel;
        }
    }
}

/// Execute the watch command.
pub async fn execute(args: WatchArgs, config: Config) -> anyhow::Result<()> {
    let config = args.resolve(config)?;
    let rawdrop = Rawdrop::new(config)?;
    let watcher = rawdrop.watcher()?;

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    let mut writer = OutputWriter::new(std::io::stdout(), args.format.into());
    let summary = watcher
        .run(cancel, |outcome| {
            if let Err(e) = writer.write_outcome(outcome) {
                tracing::warn!("Failed to write status line: {e}");
            }
        })
        .await;

    writer.write_summary(&summary)?;
    eprintln!("Watched for {:.1}s", summary.elapsed.as_secs_f64());
    Ok(())
}

/// Exit status after a second Ctrl-C (128 + SIGINT).
const FORCED_EXIT_CODE: i32 = 130;

/// First Ctrl-C cancels `token`; a second one exits without waiting.
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        match handle_interrupts(token, tokio::signal::ctrl_c).await {
            Ok(()) => std::process::exit(FORCED_EXIT_CODE),
            Err(e) => tracing::error!("Cannot listen for Ctrl-C: {e}"),
        }
    });
}

/// Cancel `token` on the first interrupt and return on the second.
async fn handle_interrupts<F, Fut>(token: CancellationToken, mut next_interrupt: F) -> io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    next_interrupt().await?;
    eprintln!("Shutting down; waiting for running conversions to finish (Ctrl-C again to force)...");
    token.cancel();

    next_interrupt().await?;
    eprintln!("Interrupted again, exiting now");
    Ok(())
}
