//! User interface rendering functions for the loading sequence and the title.

use std::time::Instant;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::{
    grid::{Cell, Grid},
    phase::{Phase, DOT_COUNT},
    roulette::Roulette,
    types::{accent, Screen, CURTAIN},
    App,
};

/// Width of the wall-free hole in the middle of the maze.
const HOLE_WIDTH: usize = 13;

/// Height of the wall-free hole in the middle of the maze.
const HOLE_HEIGHT: usize = 5;

/// Text shown in the hole below the brick dots.
const LOADING_TEXT: &str = "LOADING";

/// Colour of the maze walls and the highlighted brick dot.
const WALL: Color = Color::Rgb(0xeb, 0xeb, 0xeb);

/// Colour of the brick dots that are not highlighted.
const DIM_DOT: Color = Color::Rgb(0x4a, 0x4c, 0x55);

/// Area in the middle of the maze where walls are not drawn.
///
/// The hole holds three brick dots on its second row and the loading text on its fourth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LoadingHole {
    /// Leftmost column of the hole.
    pub(crate) x: usize,
    /// Topmost row of the hole.
    pub(crate) y: usize,
    /// Width of the hole in cells.
    pub(crate) width: usize,
    /// Height of the hole in cells.
    pub(crate) height: usize,
}

impl LoadingHole {
    /// Places the hole around the centre of the grid.
    pub(crate) const fn centered(grid: &Grid) -> Self {
        Self {
            x: (grid.cols() / 2).saturating_sub(HOLE_WIDTH / 2),
            y: (grid.rows() / 2).saturating_sub(HOLE_HEIGHT / 2),
            width: HOLE_WIDTH,
            height: HOLE_HEIGHT,
        }
    }

    /// Checks whether a cell lies inside the hole.
    pub(crate) const fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x
            && cell.x < self.x + self.width
            && cell.y >= self.y
            && cell.y < self.y + self.height
    }

    /// Cells of the brick dots, left to right.
    pub(crate) fn dots(&self) -> [Cell; DOT_COUNT] {
        let left = self.x + (self.width - DOT_COUNT) / 2;
        let row = self.y + 1;

        [0, 1, 2].map(|offset| Cell::new(left + offset, row))
    }

    /// Row the loading text is written on.
    pub(crate) const fn text_row(&self) -> usize {
        self.y + 3
    }
}

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from layout lookups or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    draw_at(app, frame, Instant::now())
}

/// Renders the application as it looks at `now`.
///
/// # Errors
///
/// This function may return errors from layout lookups or data conversion failures.
pub(crate) fn draw_at(app: &App, frame: &mut Frame, now: Instant) -> Result<()> {
    match app.screen {
        Screen::Loading => {
            let phase = app.loader.timings().phase_at(app.loader.elapsed(now));
            if phase.maze_visible() {
                loading(app, frame, now, phase)?;
            } else {
                title(&app.roulette, frame)?;
                curtains(frame, app.loader.curtain_permille(now))?;
            }
        }
        Screen::Title => title(&app.roulette, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Splits the frame into a content area and a one-line hint area at the bottom.
///
/// The hint is rendered right away as a block with a top border, centred under content of the
/// given width.
fn with_hint(frame: &mut Frame, width: u16, hint: &str, style: Style) -> Result<Rect> {
    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(frame.area());

    let content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get content area from layout")?;
    let hint_full_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get hint area from layout")?;

    let hint_area = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(width.max(u16::try_from(hint.len())?)),
        Constraint::Min(1),
    ])
    .split(hint_full_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get centered hint area from horizontal layout")?;

    let hint_block = Block::bordered()
        .title(hint.to_owned())
        .title_alignment(Alignment::Center)
        .style(style)
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);

    frame.render_widget(hint_block, hint_area);

    Ok(content_area)
}

/// Centres an area of the given size inside `outer`.
fn centered(outer: Rect, width: u16, height: u16) -> Result<Rect> {
    let rows = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(height),
        Constraint::Min(1),
    ])
    .split(outer);
    let row = rows
        .get(1)
        .copied()
        .ok_or_eyre("failed to get middle row from layout")?;

    Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(width),
        Constraint::Min(1),
    ])
    .split(row)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get middle column from layout")
}

/// Transforms grid cells to canvas coordinates.
///
/// Column `i` of `n` maps to `i - (n - 1) / 2` and row `i` of `n` maps to `(n - 1) / 2 - i`, so
/// that a canvas spanning `[-(n - 1) / 2, (n - 1) / 2]` on both axes puts every cell on exactly one
/// terminal cell.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn grid_to_canvas_coords(cells: &[Cell], grid: &Grid) -> Result<Vec<(f64, f64)>> {
    let (half_width, half_height) = canvas_half_extent(grid)?;

    cells
        .iter()
        .map(|cell| {
            let screen_x = f64::from(u16::try_from(cell.x)?) - half_width;
            let screen_y = half_height - f64::from(u16::try_from(cell.y)?);

            Ok((screen_x, screen_y))
        })
        .collect()
}

/// Half the canvas extent on each axis, `(n - 1) / 2`.
fn canvas_half_extent(grid: &Grid) -> Result<(f64, f64)> {
    let cols = f64::from(u16::try_from(grid.cols())?);
    let rows = f64::from(u16::try_from(grid.rows())?);

    Ok(((cols - 1.) / 2., (rows - 1.) / 2.))
}

/// Builds a canvas layer drawing `coords` in `color`.
fn layer(
    coords: &[(f64, f64)],
    color: Color,
    half_extent: (f64, f64),
) -> Canvas<'_, impl Fn(&mut ratatui::widgets::canvas::Context<'_>) + '_> {
    let (half_width, half_height) = half_extent;

    Canvas::default()
        .x_bounds([-half_width, half_width])
        .y_bounds([-half_height, half_height])
        .marker(Marker::Block)
        .background_color(CURTAIN)
        .paint(move |ctx| {
            ctx.draw(&Points { coords, color });
        })
}

/// Renders the loading screen with the maze, the brick dots and the ghosts.
///
/// Walls inside the central hole are left out so the dots and the loading text have room. Ghosts
/// wear their accent colours during the maze phase and turn white afterwards.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations or layout lookups.
pub(crate) fn loading(app: &App, frame: &mut Frame, now: Instant, phase: Phase) -> Result<()> {
    clear(frame);
    frame.render_widget(Block::default().style(Style::default().bg(CURTAIN)), frame.area());

    let grid = app.loader.driver().grid();
    let hole = LoadingHole::centered(grid);
    let cols = u16::try_from(grid.cols())?;
    let rows = u16::try_from(grid.rows())?;

    let content_area = with_hint(
        frame,
        cols,
        "(s) skip / (r) replay / (q) quit",
        Style::default().fg(DIM_DOT).bg(CURTAIN),
    )?;
    let space = centered(content_area, cols, rows)?;
    let half_extent = canvas_half_extent(grid)?;

    let walls: Vec<Cell> = grid
        .wall_cells()
        .into_iter()
        .filter(|cell| !hole.contains(*cell))
        .collect();
    let wall_coords = grid_to_canvas_coords(&walls, grid)?;
    frame.render_widget(layer(&wall_coords, WALL, half_extent), space);

    let active = app.loader.active_dot(now);
    for (idx, dot) in hole.dots().into_iter().enumerate() {
        let color = if idx == active { WALL } else { DIM_DOT };
        let coords = grid_to_canvas_coords(&[dot], grid)?;
        frame.render_widget(layer(&coords, color, half_extent), space);
    }

    let text_area = Rect {
        x: space.x + u16::try_from(hole.x)?,
        y: space.y + u16::try_from(hole.text_row())?,
        width: u16::try_from(hole.width)?,
        height: 1,
    }
    .intersection(space);
    let text = Line::styled(
        LOADING_TEXT,
        Style::default()
            .fg(WALL)
            .bg(CURTAIN)
            .add_modifier(Modifier::BOLD),
    )
    .centered();
    frame.render_widget(text, text_area);

    for (idx, position) in app.loader.driver().positions().into_iter().enumerate() {
        let color = if phase.ghosts_are_white() {
            Color::White
        } else {
            accent(idx)
        };
        let coords = grid_to_canvas_coords(&[position], grid)?;
        frame.render_widget(layer(&coords, color, half_extent), space);
    }

    Ok(())
}

/// Splits the roulette title into styled lines.
///
/// Characters held by a roulette slot are drawn bold in that slot's accent colour.
pub(crate) fn title_lines(roulette: &Roulette) -> Vec<Line<'static>> {
    let plain = Style::default().fg(Color::White);
    let mut lines = Vec::new();
    let mut spans = Vec::new();

    for (idx, symbol) in roulette.chars().iter().enumerate() {
        if *symbol == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }

        let style = roulette.slot_at(idx).map_or(plain, |slot| {
            Style::default()
                .fg(accent(slot))
                .add_modifier(Modifier::BOLD)
        });
        spans.push(Span::styled(symbol.to_string(), style));
    }
    lines.push(Line::from(spans));

    lines
}

/// Renders the title screen with the roulette highlight.
///
/// # Errors
///
/// This function may return errors from data conversion failures or layout lookups.
pub(crate) fn title(roulette: &Roulette, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let lines = title_lines(roulette);
    let width = lines.iter().map(Line::width).max().unwrap_or(0);
    let width = u16::try_from(width)?.saturating_add(4);
    let height = u16::try_from(lines.len())?.saturating_add(2);

    let content_area = with_hint(
        frame,
        width,
        "(r) replay / (q) quit",
        Style::default().fg(Color::Green),
    )?;
    let space = centered(content_area, width, height)?;

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Green));
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);

    frame.render_widget(paragraph, space);

    Ok(())
}

/// Renders the two curtains retracting over the title.
///
/// Each curtain covers half of the frame at first and shrinks towards its edge as `permille`
/// grows to `1000`.
///
/// # Errors
///
/// This function may return errors from data conversion failures.
pub(crate) fn curtains(frame: &mut Frame, permille: u16) -> Result<()> {
    let area = frame.area();
    let remaining = 1000 - i32::from(permille.min(1000));
    let top_half = area.height / 2;
    let bottom_half = area.height - top_half;

    let top = u16::try_from(rounded_div::i32(i32::from(top_half) * remaining, 1000))?;
    let bottom = u16::try_from(rounded_div::i32(i32::from(bottom_half) * remaining, 1000))?;

    let curtain = Block::default().style(Style::default().bg(CURTAIN));
    frame.render_widget(
        curtain.clone(),
        Rect {
            height: top,
            ..area
        },
    );
    frame.render_widget(
        curtain,
        Rect {
            y: area.y + area.height - bottom,
            height: bottom,
            ..area
        },
    );

    Ok(())
}
