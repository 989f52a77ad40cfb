//! Live view of the game state, without a timer connection.

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use fluffelfood::display::status_lines;
use fluffelfood::{MemoryReader, StateSampler, StateSnapshot, TransitionDetector};
use tracing::warn;

use super::{attach, offsets_for, resolve_mode};
use crate::TargetArgs;
use crate::shutdown::ShutdownSignal;
use crate::status_view::StatusView;

pub fn run(target: &TargetArgs, interval_ms: u64) -> Result<()> {
    let shutdown = ShutdownSignal::install()?;
    let offsets = offsets_for(target)?;
    let process = attach(target.pid, &target.binary)?;

    let reader = MemoryReader::new(&process);
    let mut sampler = StateSampler::resolve(reader, &offsets, resolve_mode(target));
    let detector = TransitionDetector::new();

    println!("Watching process {}... Press Ctrl+C to exit.", process.pid);
    println!();

    let mut view = StatusView::new(stdout());
    let mut previous = StateSnapshot::default();
    let mut last_label = "";

    while !shutdown.is_shutdown() {
        if !process.is_alive() {
            warn!("Game process {} exited", process.pid);
            break;
        }

        let snapshot = sampler.sample(previous.carry);
        let detection = detector.detect(&previous, &snapshot);
        if !detection.label().is_empty() {
            last_label = detection.label();
        }

        let mut lines: Vec<String> = status_lines(&snapshot)
            .iter()
            .map(ToString::to_string)
            .collect();
        let failed = sampler.failed_fields();
        lines.push(if failed.is_empty() {
            String::new()
        } else {
            format!("Unreadable:   {:?}", failed)
        });
        lines.push(format!("Last event:   {}", last_label));

        view.draw(&lines)?;

        previous = snapshot.with_carry(detection.carry);
        if shutdown.wait(Duration::from_millis(interval_ms)) {
            break;
        }
    }

    Ok(())
}
