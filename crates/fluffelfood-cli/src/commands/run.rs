//! Main autosplitter command.

use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use fluffelfood::display::{address_lines, run_status_lines};
use fluffelfood::{
    Autosplitter, AutosplitterConfig, MemoryReader, OffsetsCollection, ProcessHandle, RunLog,
    StateSampler, TickOutcome, TimerClient, verify_binary,
};
use tracing::{debug, error, info, warn};

use super::{attach, offsets_for, resolve_mode};
use crate::RunArgs;
use crate::shutdown::ShutdownSignal;
use crate::status_view::StatusView;

/// Run the autosplitter until the final stop, Ctrl+C or the game exits
pub fn run(args: RunArgs) -> Result<()> {
    let shutdown = ShutdownSignal::install()?;
    info!("fluffelfood {}", env!("CARGO_PKG_VERSION"));

    let offsets = offsets_for(&args.target)?;
    let process = attach(args.target.pid, &args.target.binary)?;

    if args.skip_verify {
        debug!("Skipping game binary verification");
    } else {
        verify(&process, &offsets)?;
    }

    let mut builder = AutosplitterConfig::builder()
        .poll_interval(Duration::from_millis(args.interval_ms))
        .socket_path(&args.socket)
        .resolve_mode(resolve_mode(&args.target));
    builder = if args.no_log {
        builder.no_run_log()
    } else {
        builder.run_log_path(&args.log)
    };
    let config = builder.build();

    let reader = MemoryReader::new(&process);
    println!("Initialize memory addresses...");
    let mut sampler = StateSampler::resolve(reader, &offsets, config.resolve_mode);
    for line in address_lines(sampler.table()) {
        println!("{}", line);
    }
    if !sampler.table().is_complete() {
        warn!(
            "Unresolved fields read as 0: {:?}",
            sampler.table().unresolved()
        );
    }

    let mut client = TimerClient::connect(&config.socket_path)
        .context("Is Fluffelwatch running? Use --socket to point at its socket")?;

    let run_log = match &config.run_log_path {
        Some(path) => Some(
            RunLog::create(path)
                .with_context(|| format!("Cannot create run log {}", path.display()))?,
        ),
        None => None,
    };

    let mut autosplitter = Autosplitter::new(config);
    if let Some(log) = run_log {
        autosplitter = autosplitter.with_run_log(log);
    }

    println!("Starting autosplitter... Press Ctrl+C to exit.");
    println!();

    let mut view = StatusView::new(stdout());
    let mut last_label = "";
    let result = autosplitter.run_with(
        &mut sampler,
        &mut client,
        shutdown.as_atomic(),
        |snapshot, outcome| {
            if let TickOutcome::Sent(detection) | TickOutcome::Finished(detection) = outcome
                && !detection.label().is_empty()
            {
                last_label = detection.label();
            }

            let lines: Vec<String> = run_status_lines(snapshot, last_label)
                .iter()
                .map(ToString::to_string)
                .collect();
            if let Err(e) = view.draw(&lines) {
                warn!("Cannot draw status: {}", e);
            }

            let alive = process.is_alive();
            if !alive {
                warn!("Game process {} exited", process.pid);
            }
            alive
        },
    );

    client.disconnect();
    if let Err(e) = &result {
        error!("Autosplitter stopped: {}", e);
    }
    result?;

    if autosplitter.is_finished() {
        info!("Run complete");
    }
    Ok(())
}

fn verify(process: &ProcessHandle, offsets: &OffsetsCollection) -> Result<()> {
    let Some(exe) = &process.exe_path else {
        bail!(
            "Cannot read the executable of process {}; use --skip-verify to run anyway",
            process.pid
        );
    };

    verify_binary(exe, offsets).with_context(|| {
        format!(
            "{} does not match offsets {}; use --skip-verify to run anyway",
            exe.display(),
            offsets.version
        )
    })?;
    debug!("Game binary {} matches offsets {}", exe.display(), offsets.version);
    Ok(())
}
