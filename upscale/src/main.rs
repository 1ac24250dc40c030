mod args;
mod config;
mod image_io;
mod upscaler;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use common::CancelToken;

use crate::args::Args;
use crate::config::UpscaleConfig;
use crate::upscaler::{Upscaler, output_path_for};

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // logging may not be initialized yet
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = UpscaleConfig::resolve(&args)?;
    common::log_setup::setup_logging(&config.log_level, &config.log_dir, "upscale")?;
    tracing::debug!("Resolved config: {:?}", config);

    if args.inputs.len() > 1 && args.output.is_some() {
        bail!(
            "{} inputs given but --output takes a single file; use --output-dir",
            args.inputs.len()
        );
    }

    let cancel = CancelToken::new();
    if let Some(seconds) = args.timeout {
        let watchdog = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(seconds));
            tracing::warn!("Timeout of {}s reached, canceling", seconds);
            watchdog.cancel();
        });
    }

    let upscaler = Upscaler::new(&config);
    let scale = upscaler.model().scale();

    let mut failed = 0;
    for input in &args.inputs {
        let output = match &args.output {
            Some(output) => output.clone(),
            None => output_path_for(input, args.output_dir.as_deref(), scale),
        };

        if let Err(err) = upscaler.upscale_file(input, &output, &cancel) {
            let canceled = err
                .downcast_ref::<tiler::TileError>()
                .is_some_and(tiler::TileError::is_canceled);
            if canceled {
                bail!("Canceled while processing {}", input.display());
            }
            tracing::error!("{:#}", err);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed", failed, args.inputs.len());
    }
    Ok(())
}
