//! Type definitions for the application state and navigation.

use ratatui::style::Color;

/// Enumeration of available application screens.
///
/// This enumeration holds information about what is currently on screen. It is used to determine
/// what to render and how to react to the clock and to user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Loading sequence with the maze and the ghosts.
    Loading,
    /// Title revealed once the loading sequence is over.
    Title,
}

/// Accent colours shared by the ghosts and the roulette slots.
///
/// The first ghost and the first roulette slot are yellow, the second blue and the third purple.
pub(crate) const ACCENTS: [Color; 3] = [
    Color::Rgb(0xfa, 0xcc, 0x15),
    Color::Rgb(0x25, 0x63, 0xeb),
    Color::Rgb(0xa8, 0x55, 0xf7),
];

/// Colour of the loading overlay and of the curtains.
pub(crate) const CURTAIN: Color = Color::Rgb(0x20, 0x22, 0x2b);

/// Returns the accent colour for a ghost or roulette slot.
pub(crate) fn accent(slot: usize) -> Color {
    ACCENTS.get(slot).copied().unwrap_or(Color::White)
}
