//! Loading sequence scheduler.
//!
//! This module binds the ghost driver to the phase timeline and to a clock. It is the piece that
//! decides when the next ghost step is due, restarts the movement loop on every phase change, and
//! tears everything down once the sequence is over.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::info;

use crate::{
    driver::{default_starts, Driver, StepOutcome, AGENT_COUNT},
    grid::Grid,
    phase::{Phase, PhaseTimings},
};

/// Something that happened during a [`Loader::update`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderEvent {
    /// The sequence entered a new phase.
    PhaseChanged(Phase),
    /// The ghosts took one step.
    Ticked([StepOutcome; AGENT_COUNT]),
    /// The sequence ended and the driver was stopped.
    Finished,
}

/// Running loading sequence.
///
/// The loader never sleeps; its owner calls [`Loader::update`] with the current instant as often
/// as it likes and the loader works out whether a phase boundary was crossed or a ghost step is
/// due. At most one step is ever pending.
#[derive(Debug)]
pub struct Loader<R> {
    /// Ghost driver.
    driver: Driver<R>,
    /// Phase boundaries and tick intervals.
    timings: PhaseTimings,
    /// Instant the sequence was mounted at.
    started: Instant,
    /// Instant the next ghost step is due at, if one is scheduled.
    next_tick: Option<Instant>,
    /// Phase seen during the last update.
    phase: Phase,
}

impl<R: Rng> Loader<R> {
    /// Mounts a loading sequence on `grid` with ghosts on their default starting cells.
    pub fn mount(grid: Grid, timings: PhaseTimings, rng: R, now: Instant) -> Self {
        let starts = default_starts(&grid);
        Self::with_driver(Driver::new(grid, starts, rng), timings, now)
    }

    /// Mounts a loading sequence around an existing driver.
    pub fn with_driver(driver: Driver<R>, timings: PhaseTimings, now: Instant) -> Self {
        info!(
            done_in_ms = timings.done_at().as_millis(),
            "loading sequence mounted"
        );

        Self {
            driver,
            timings,
            started: now,
            next_tick: now.checked_add(timings.first_tick),
            phase: Phase::Maze,
        }
    }

    /// Brings the sequence up to date with `now`.
    ///
    /// A phase change restarts the movement loop: every ghost gets a new goal and the next step is
    /// scheduled after the first-tick delay. Reaching [`Phase::Done`] stops the driver for good.
    /// Otherwise, if a step is due, the ghosts take it and the next one is scheduled with the
    /// interval of the current phase, provided the driver is still alive.
    pub fn update(&mut self, now: Instant) -> Vec<LoaderEvent> {
        let mut events = Vec::new();
        let phase = self.timings.phase_at(self.elapsed(now));

        if phase != self.phase {
            info!(from = self.phase.name(), to = phase.name(), "phase changed");
            self.phase = phase;
            events.push(LoaderEvent::PhaseChanged(phase));

            if phase == Phase::Done {
                self.teardown();
                events.push(LoaderEvent::Finished);
                return events;
            }

            self.driver.retarget_all();
            self.next_tick = now.checked_add(self.timings.first_tick);
        }

        if !self.next_tick.is_some_and(|due| now >= due) {
            return events;
        }

        if let Some(outcomes) = self.driver.tick() {
            events.push(LoaderEvent::Ticked(outcomes));
        }
        self.next_tick = if self.driver.is_alive() {
            now.checked_add(self.timings.tick_interval(phase))
        } else {
            None
        };

        events
    }

    /// Stops the ghosts and cancels any pending step.
    pub fn teardown(&mut self) {
        self.driver.stop();
        self.next_tick = None;
    }

    /// Time since the sequence was mounted.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Phase seen during the last update.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the sequence has ended or been torn down.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        !self.driver.is_alive()
    }

    /// Instant the next ghost step is due at.
    #[must_use]
    pub const fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Ghost driver.
    #[must_use]
    pub const fn driver(&self) -> &Driver<R> {
        &self.driver
    }

    /// Timings of the sequence.
    #[must_use]
    pub const fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    /// Index of the highlighted brick dot at `now`.
    #[must_use]
    pub fn active_dot(&self, now: Instant) -> usize {
        self.timings.active_dot(self.elapsed(now))
    }

    /// Curtain retraction at `now`, in thousandths.
    #[must_use]
    pub fn curtain_permille(&self, now: Instant) -> u16 {
        self.timings.curtain_permille(self.elapsed(now))
    }
}
