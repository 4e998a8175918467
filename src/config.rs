//! Command-line configuration.
//!
//! This module defines the options the binary accepts and turns them into the timings and random
//! source the rest of the crate works with.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng as _};

use crate::{phase::PhaseTimings, roulette::RouletteTimings};

/// Runtime configuration of the loading screen.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(version, about)]
pub struct Config {
    /// Number of maze columns.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(10..))]
    pub cols: u16,
    /// Number of maze rows.
    #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(u16).range(10..))]
    pub rows: u16,
    /// Milliseconds between ghost steps outside the fright phase.
    #[arg(long, default_value_t = 160)]
    pub tick_ms: u64,
    /// Milliseconds between ghost steps during the fright phase.
    #[arg(long, default_value_t = 50)]
    pub fright_tick_ms: u64,
    /// Length of the maze phase in milliseconds.
    #[arg(long, default_value_t = 1200)]
    pub maze_ms: u64,
    /// Length of the fright phase in milliseconds.
    #[arg(long, default_value_t = 900)]
    pub fright_ms: u64,
    /// Seed for the random source, for repeatable runs.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Title revealed once the loading sequence ends; "\n" breaks lines.
    #[arg(long, default_value = "GHOST\nMAZE STUDIO")]
    pub title: String,
    /// File to write logs to. Nothing is logged without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from([env!("CARGO_PKG_NAME")])
    }
}

impl Config {
    /// Number of maze columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        usize::from(self.cols)
    }

    /// Number of maze rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        usize::from(self.rows)
    }

    /// Phase timings with the configured overrides applied.
    #[must_use]
    pub fn timings(&self) -> PhaseTimings {
        PhaseTimings {
            maze: Duration::from_millis(self.maze_ms),
            fright: Duration::from_millis(self.fright_ms),
            normal_tick: Duration::from_millis(self.tick_ms),
            fright_tick: Duration::from_millis(self.fright_tick_ms),
            ..PhaseTimings::default()
        }
    }

    /// Roulette timings used for the title.
    ///
    /// The title spins a little longer and slower than the roulette's own defaults, and the second
    /// slot settles slightly later.
    #[must_use]
    pub fn roulette_timings() -> RouletteTimings {
        RouletteTimings {
            duration: Duration::from_millis(3300),
            tick_min: Duration::from_millis(85),
            tick_max: Duration::from_millis(460),
            stop_fractions: [0.62, 0.82, 1.0],
            ..RouletteTimings::default()
        }
    }

    /// Title with literal `\n` sequences turned into line breaks.
    #[must_use]
    pub fn title_text(&self) -> String {
        self.title.replace("\\n", "\n")
    }

    /// Random source, seeded when a seed was given.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}
