//! Polling loop of the autosplitter

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::{debug, info, warn};

use crate::autosplitter::Autosplitter;
use crate::error::Result;
use crate::game::{Detection, StateSampler, StateSnapshot, TransitionEvent, icons_for};
use crate::process::ReadMemory;
use crate::protocol::{Control, TimerClient, icon_mask_from};

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snapshot equal to the baseline, nothing sent
    Unchanged,
    /// State sent to the timer
    Sent(Detection),
    /// Final stop sent; the run is over
    Finished(Detection),
}

/// Retained control after an event, `None` to keep the current one
fn control_for(event: TransitionEvent) -> Option<Control> {
    match event {
        TransitionEvent::Start => Some(Control::Start),
        TransitionEvent::LoadingBegin => Some(Control::Pause),
        TransitionEvent::LoadingEnd => Some(Control::CONTINUE),
        TransitionEvent::FinalStop => Some(Control::Stop),
        TransitionEvent::FinalSequenceMarker
        | TransitionEvent::MissionSplit { .. }
        | TransitionEvent::None => None,
    }
}

impl Autosplitter {
    /// Sample once and send to the timer if anything changed
    pub fn tick<R, W>(
        &mut self,
        sampler: &mut StateSampler<R>,
        client: &mut TimerClient<W>,
    ) -> Result<TickOutcome>
    where
        R: ReadMemory,
        W: Write,
    {
        let snapshot = sampler.sample(self.baseline.carry);
        self.tick_with(snapshot, client)
    }

    /// Process an already sampled snapshot
    ///
    /// The carried flags always come from the baseline, whatever `snapshot`
    /// holds.
    pub fn tick_with<W: Write>(
        &mut self,
        snapshot: StateSnapshot,
        client: &mut TimerClient<W>,
    ) -> Result<TickOutcome> {
        let snapshot = snapshot.with_carry(self.baseline.carry);
        if snapshot == self.baseline {
            return Ok(TickOutcome::Unchanged);
        }

        let detection = self.detector.detect(&self.baseline, &snapshot);
        let control = control_for(detection.event).unwrap_or(client.state().control);
        let icons = icons_for(&snapshot);
        let icon_mask = icon_mask_from(icons.iter().map(|i| u32::from(i.index())));

        // The client keeps its retained state until the send succeeds
        client.send(control, u32::from(snapshot.mission), icon_mask)?;

        self.baseline = snapshot.with_carry(detection.carry);

        if detection.event != TransitionEvent::None {
            info!("{}", detection.label());
            debug!("Matched rule {:?} at {:?}", detection.rule, snapshot);
            self.last_label = detection.label();
        }

        self.record(detection);

        if detection.event.is_terminal() {
            self.finished = true;
            return Ok(TickOutcome::Finished(detection));
        }
        Ok(TickOutcome::Sent(detection))
    }

    fn record(&mut self, detection: Detection) {
        let Some(log) = self.run_log.as_mut() else {
            return;
        };

        if detection.event == TransitionEvent::Start {
            log.start();
        }
        if let Err(e) = log.record(detection.label()) {
            warn!("Failed to write run log {}: {}", log.path().display(), e);
        }
    }

    /// Poll until the final stop or until `shutdown` is set
    pub fn run<R, W>(
        &mut self,
        sampler: &mut StateSampler<R>,
        client: &mut TimerClient<W>,
        shutdown: &AtomicBool,
    ) -> Result<()>
    where
        R: ReadMemory,
        W: Write,
    {
        self.run_with(sampler, client, shutdown, |_, _| true)
    }

    /// Like [`run`](Self::run), calling `observe` after every tick
    ///
    /// Polling stops early when `observe` returns `false`.
    pub fn run_with<R, W, F>(
        &mut self,
        sampler: &mut StateSampler<R>,
        client: &mut TimerClient<W>,
        shutdown: &AtomicBool,
        mut observe: F,
    ) -> Result<()>
    where
        R: ReadMemory,
        W: Write,
        F: FnMut(&StateSnapshot, &TickOutcome) -> bool,
    {
        info!(
            "Starting autosplitter loop ({} ms interval)",
            self.config.poll_interval.as_millis()
        );

        while !shutdown.load(Ordering::SeqCst) {
            let snapshot = sampler.sample(self.baseline.carry);
            let outcome = self.tick_with(snapshot, client)?;

            if !observe(&snapshot, &outcome) {
                debug!("Stopped by observer");
                break;
            }
            if matches!(outcome, TickOutcome::Finished(_)) {
                info!("Run finished");
                break;
            }

            thread::sleep(self.config.poll_interval);
        }

        Ok(())
    }
}
