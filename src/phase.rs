//! Loading sequence timeline.
//!
//! This module holds the stages the loading screen goes through and the timings that decide when
//! each stage starts, how fast the ghosts move in it, and how the brick dots and curtains animate.

use std::time::Duration;

/// Number of brick dots cycling in the loading hole.
pub const DOT_COUNT: usize = 3;

/// Stage of the loading sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Ghosts chase their goals at normal speed.
    Maze,
    /// Ghosts turn white and speed up.
    Fright,
    /// The maze is hidden and the curtains retract over the page.
    Reveal,
    /// The loading sequence is over and torn down.
    Done,
}

impl Phase {
    /// Whether the ghosts are drawn white instead of their own colour.
    #[must_use]
    pub const fn ghosts_are_white(self) -> bool {
        !matches!(self, Self::Maze)
    }

    /// Whether the maze itself is visible.
    #[must_use]
    pub const fn maze_visible(self) -> bool {
        matches!(self, Self::Maze | Self::Fright)
    }

    /// Human-readable name of the phase, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Maze => "maze",
            Self::Fright => "fright",
            Self::Reveal => "reveal",
            Self::Done => "done",
        }
    }
}

/// Timings of the loading sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Length of the maze phase.
    pub maze: Duration,
    /// Length of the fright phase.
    pub fright: Duration,
    /// Pause between the end of the fright phase and the reveal.
    pub reveal_delay: Duration,
    /// Time the curtains take to retract.
    pub curtain: Duration,
    /// Extra time the overlay stays up after the curtains are gone.
    pub hide_slack: Duration,
    /// Delay between ghost steps outside the fright phase.
    pub normal_tick: Duration,
    /// Delay between ghost steps during the fright phase.
    pub fright_tick: Duration,
    /// Delay before the first ghost step after the movement loop (re)starts.
    pub first_tick: Duration,
    /// Time each brick dot stays highlighted.
    pub dot_period: Duration,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            maze: Duration::from_millis(1200),
            fright: Duration::from_millis(900),
            reveal_delay: Duration::from_millis(110),
            curtain: Duration::from_millis(400),
            hide_slack: Duration::from_millis(120),
            normal_tick: Duration::from_millis(160),
            fright_tick: Duration::from_millis(50),
            first_tick: Duration::from_millis(60),
            dot_period: Duration::from_millis(220),
        }
    }
}

impl PhaseTimings {
    /// Elapsed time at which the fright phase starts.
    #[must_use]
    pub const fn fright_at(&self) -> Duration {
        self.maze
    }

    /// Elapsed time at which the reveal phase starts.
    #[must_use]
    pub const fn reveal_at(&self) -> Duration {
        self.maze
            .saturating_add(self.fright)
            .saturating_add(self.reveal_delay)
    }

    /// Elapsed time at which the sequence is over.
    #[must_use]
    pub const fn done_at(&self) -> Duration {
        self.reveal_at()
            .saturating_add(self.curtain)
            .saturating_add(self.hide_slack)
    }

    /// Returns the phase the sequence is in after `elapsed` time.
    #[must_use]
    pub fn phase_at(&self, elapsed: Duration) -> Phase {
        if elapsed < self.fright_at() {
            Phase::Maze
        } else if elapsed < self.reveal_at() {
            Phase::Fright
        } else if elapsed < self.done_at() {
            Phase::Reveal
        } else {
            Phase::Done
        }
    }

    /// Delay between ghost steps in the given phase.
    #[must_use]
    pub const fn tick_interval(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Fright => self.fright_tick,
            Phase::Maze | Phase::Reveal | Phase::Done => self.normal_tick,
        }
    }

    /// Index of the highlighted brick dot after `elapsed` time.
    #[must_use]
    pub fn active_dot(&self, elapsed: Duration) -> usize {
        let period = self.dot_period.as_millis();
        if period == 0 {
            return 0;
        }

        usize::try_from(elapsed.as_millis() / period % 3).unwrap_or(0)
    }

    /// How far the curtains have retracted, in thousandths.
    ///
    /// This is `0` until the reveal starts and saturates at `1000` once the curtain time has
    /// passed.
    #[must_use]
    pub fn curtain_permille(&self, elapsed: Duration) -> u16 {
        let Some(since) = elapsed.checked_sub(self.reveal_at()) else {
            return 0;
        };
        let total = self.curtain.as_millis();
        if total == 0 {
            return 1000;
        }

        u16::try_from((since.as_millis() * 1000 / total).min(1000)).unwrap_or(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shorthand for a duration in milliseconds.
    const fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_default_boundaries() {
        let timings = PhaseTimings::default();

        assert_eq!(timings.fright_at(), ms(1200));
        assert_eq!(timings.reveal_at(), ms(2210));
        assert_eq!(timings.done_at(), ms(2730));
    }

    #[test]
    fn test_phase_at() {
        let timings = PhaseTimings::default();

        assert_eq!(timings.phase_at(ms(0)), Phase::Maze);
        assert_eq!(timings.phase_at(ms(1199)), Phase::Maze);
        assert_eq!(timings.phase_at(ms(1200)), Phase::Fright);
        assert_eq!(timings.phase_at(ms(2209)), Phase::Fright);
        assert_eq!(timings.phase_at(ms(2210)), Phase::Reveal);
        assert_eq!(timings.phase_at(ms(2729)), Phase::Reveal);
        assert_eq!(timings.phase_at(ms(2730)), Phase::Done);
        assert_eq!(timings.phase_at(ms(60_000)), Phase::Done);
    }

    #[test]
    fn test_tick_interval_per_phase() {
        let timings = PhaseTimings::default();

        assert_eq!(timings.tick_interval(Phase::Maze), ms(160));
        assert_eq!(timings.tick_interval(Phase::Fright), ms(50));
        assert_eq!(timings.tick_interval(Phase::Reveal), ms(160));
    }

    #[test]
    fn test_active_dot_cycles() {
        let timings = PhaseTimings::default();

        assert_eq!(timings.active_dot(ms(0)), 0);
        assert_eq!(timings.active_dot(ms(219)), 0);
        assert_eq!(timings.active_dot(ms(220)), 1);
        assert_eq!(timings.active_dot(ms(440)), 2);
        assert_eq!(timings.active_dot(ms(660)), 0);
    }

    #[test]
    fn test_active_dot_with_zero_period() {
        let timings = PhaseTimings {
            dot_period: Duration::ZERO,
            ..PhaseTimings::default()
        };

        assert_eq!(timings.active_dot(ms(1234)), 0);
    }

    #[test]
    fn test_curtain_permille() {
        let timings = PhaseTimings::default();

        assert_eq!(timings.curtain_permille(ms(1000)), 0);
        assert_eq!(timings.curtain_permille(ms(2210)), 0);
        assert_eq!(timings.curtain_permille(ms(2410)), 500);
        assert_eq!(timings.curtain_permille(ms(2610)), 1000);
        assert_eq!(timings.curtain_permille(ms(9000)), 1000);
    }

    #[test]
    fn test_phase_flags() {
        assert!(!Phase::Maze.ghosts_are_white(), "maze ghosts keep their colour");
        assert!(Phase::Fright.ghosts_are_white(), "fright ghosts are white");
        assert!(Phase::Fright.maze_visible(), "maze shows during fright");
        assert!(!Phase::Reveal.maze_visible(), "maze hides during reveal");
        assert_eq!(Phase::Reveal.name(), "reveal");
    }
}
