//! Core application state and logic for the loading screen.

use std::time::Instant;

use color_eyre::eyre::Result;
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use ratatui::DefaultTerminal;
use tracing::info;

use crate::{
    config::Config,
    events,
    loader::{Loader, LoaderEvent},
    maze::generate_maze,
    roulette::Roulette,
    types::Screen,
    ui,
};

/// Application state container for the loading screen.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the loading sequence and title, and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It starts off `false` and is set
    /// to `true` when the user quits.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Configuration the application was started with.
    pub(crate) config: Config,
    /// Random source for the title roulette and for seeding each loader.
    pub(crate) rng: StdRng,
    /// Running or finished loading sequence.
    ///
    /// This field is replaced with a freshly mounted sequence, on a freshly generated maze, each
    /// time the user replays the intro.
    pub(crate) loader: Loader<StdRng>,
    /// Title roulette.
    ///
    /// The roulette starts spinning together with the loading sequence, so it is already moving
    /// when the curtains reveal the title.
    pub(crate) roulette: Roulette,
    /// Instant the roulette started spinning at.
    pub(crate) roulette_started: Instant,
    /// Instant the next roulette tick is due at, if it is still spinning.
    pub(crate) roulette_due: Option<Instant>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl App {
    /// Creates a new instance of the App structure and mounts the loading sequence.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::new_at(config, Instant::now())
    }

    /// Creates a new instance of the App structure as if started at `now`.
    pub(crate) fn new_at(config: Config, now: Instant) -> Self {
        let mut rng = config.rng();
        let loader = mount_loader(&config, &mut rng, now);
        let roulette = spin_roulette(&config, &mut rng);
        let roulette_due = now.checked_add(roulette.first_delay());

        Self {
            exit: false,
            screen: Screen::Loading,
            config,
            rng,
            loader,
            roulette,
            roulette_started: now,
            roulette_due,
        }
    }

    /// Runs the main loop of the application.
    ///
    /// This function draws a frame, handles user input and advances the animations. The loop
    /// continues until the exit condition is `true`, after which the function returns to the call
    /// site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Advances the loading sequence and the title roulette to `now`.
    pub(crate) fn update(&mut self, now: Instant) {
        if self.screen == Screen::Loading {
            let finished = self
                .loader
                .update(now)
                .contains(&LoaderEvent::Finished);
            if finished {
                self.start_title();
            }
        }

        if self.roulette_due.is_some_and(|due| now >= due) {
            let elapsed = now.saturating_duration_since(self.roulette_started);
            self.roulette_due = self
                .roulette
                .tick(elapsed, &mut self.rng)
                .and_then(|delay| now.checked_add(delay));
        }
    }

    /// Switches to the title screen, leaving the roulette where it is.
    pub(crate) fn start_title(&mut self) {
        self.screen = Screen::Title;
        info!(spinning = self.roulette.is_spinning(), "title revealed");
    }

    /// Tears down the running sequence and jumps straight to the title.
    pub(crate) fn skip(&mut self) {
        if self.screen == Screen::Loading {
            self.loader.teardown();
            self.start_title();
        }
    }

    /// Mounts a new loading sequence on a new maze and restarts the roulette with it.
    pub(crate) fn replay(&mut self, now: Instant) {
        self.loader.teardown();
        self.loader = mount_loader(&self.config, &mut self.rng, now);
        self.roulette = spin_roulette(&self.config, &mut self.rng);
        self.roulette_started = now;
        self.roulette_due = now.checked_add(self.roulette.first_delay());
        self.screen = Screen::Loading;
        info!("loading sequence replayed");
    }
}

/// Generates a maze and mounts a loading sequence on it.
fn mount_loader(config: &Config, rng: &mut StdRng, now: Instant) -> Loader<StdRng> {
    Loader::mount(
        generate_maze(config.columns(), config.row_count()),
        config.timings(),
        StdRng::seed_from_u64(rng.gen()),
        now,
    )
}

/// Builds the title roulette for a new run.
fn spin_roulette(config: &Config, rng: &mut StdRng) -> Roulette {
    Roulette::new(&config.title_text(), Config::roulette_timings(), rng)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::phase::Phase;

    /// Seeded configuration for repeatable runs.
    fn config() -> Config {
        Config {
            seed: Some(3),
            ..Config::default()
        }
    }

    /// Shorthand for an instant some milliseconds after `base`.
    fn at(base: Instant, ms: u64) -> Instant {
        base.checked_add(Duration::from_millis(ms))
            .expect("instant should not overflow")
    }

    #[test]
    fn test_starts_on_loading_screen() {
        let app = App::new_at(config(), Instant::now());

        assert_eq!(app.screen, Screen::Loading);
        assert!(!app.exit, "app should not exit right away");
        assert_eq!(app.loader.phase(), Phase::Maze);
    }

    #[test]
    fn test_sequence_ends_on_title() {
        let start = Instant::now();
        let mut app = App::new_at(config(), start);

        for ms in (0..3000).step_by(10) {
            app.update(at(start, ms));
        }

        assert_eq!(app.screen, Screen::Title);
        assert!(app.loader.is_finished(), "loader should be torn down");
        assert!(app.roulette_due.is_some(), "roulette should be spinning");
    }

    #[test]
    fn test_roulette_settles_on_title() {
        let start = Instant::now();
        let mut app = App::new_at(config(), start);
        app.skip();

        for ms in (0..4000).step_by(10) {
            app.update(at(start, ms));
        }

        assert!(!app.roulette.is_spinning(), "roulette should have stopped");
        assert_eq!(app.roulette_due, None);
        assert_eq!(app.roulette.slots(), app.roulette.finals());
    }

    #[test]
    fn test_skip_tears_down_loader() {
        let start = Instant::now();
        let mut app = App::new_at(config(), start);

        app.skip();

        assert_eq!(app.screen, Screen::Title);
        assert!(app.loader.is_finished(), "skipped loader should be stopped");
    }

    #[test]
    fn test_replay_mounts_new_sequence() {
        let start = Instant::now();
        let mut app = App::new_at(config(), start);
        app.skip();

        app.replay(at(start, 500));

        assert_eq!(app.screen, Screen::Loading);
        assert!(!app.loader.is_finished(), "replayed loader should be alive");
        assert_eq!(app.loader.phase(), Phase::Maze);
        assert_eq!(app.roulette_started, at(start, 500));
        assert_eq!(app.roulette_due, Some(at(start, 585)));
        assert!(app.roulette.is_spinning(), "replay restarts the roulette");
    }

    #[test]
    fn test_roulette_spins_under_loader() {
        let start = Instant::now();
        let mut app = App::new_at(config(), start);

        for ms in (0..1000).step_by(10) {
            app.update(at(start, ms));
        }

        assert_eq!(app.screen, Screen::Loading);
        assert!(app.roulette.is_spinning(), "roulette should still be spinning");
        assert!(
            app.roulette_due.is_some_and(|due| due > at(start, 990)),
            "roulette ticks should keep being scheduled while loading"
        );
    }

    #[test]
    fn test_reveal_roulette_carries_into_title() {
        let start = Instant::now();
        let mut app = App::new_at(config(), start);
        let mut revealed: Option<Roulette> = None;

        for ms in (0..3000).step_by(10) {
            app.update(at(start, ms));
            if app.screen == Screen::Title {
                break;
            }
            if app.loader.phase() == Phase::Reveal {
                revealed = Some(app.roulette.clone());
            }
        }

        let revealed = revealed.expect("the reveal phase should have been seen");
        assert!(revealed.is_spinning(), "roulette should spin during the reveal");
        assert_eq!(app.screen, Screen::Title);
        assert_eq!(app.roulette_started, start, "title keeps the roulette from mount");
        assert_eq!(app.roulette.finals(), revealed.finals());
        assert_eq!(app.roulette.chars(), revealed.chars());
    }
}
