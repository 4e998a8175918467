//! This crate contains the library behind the ghostmaze loading screen.
//!
//! The loading screen draws a corridor maze and lets three ghosts chase goals through it with a
//! breadth-first pathfinder. The ghosts turn white and speed up after a while, the maze is then
//! hidden, two curtains retract over the title, and a roulette highlights a few of its letters.
//!
//! The pure parts, the [`Grid`], the maze generator, the pathfinder and the [`Driver`], are usable
//! on their own without a terminal.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
pub mod config;
pub mod driver;
mod events;
pub mod grid;
pub mod loader;
pub mod logging;
pub mod maze;
pub mod pathfinding;
pub mod phase;
pub mod roulette;
mod types;
mod ui;

pub use app::App;
pub use config::Config;
pub use driver::Driver;
pub use grid::{Cell, Grid};
pub use maze::generate_maze;
pub use pathfinding::{find_path, pick_nearest_open_cell};
