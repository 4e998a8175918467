//! Goal-cycling driver module.
//!
//! This module keeps three ghosts moving through a maze. Each ghost walks one cell per tick along
//! the shortest path to its goal and draws a new goal near one of a handful of anchor points once
//! the current one is reached or turns out to be unreachable.

use rand::{seq::SliceRandom as _, Rng};
use tracing::{debug, info};

use crate::{
    grid::{Cell, Grid},
    pathfinding::{find_path, pick_nearest_open_cell},
};

/// Number of ghosts the driver animates.
pub const AGENT_COUNT: usize = 3;

/// Number of anchor points goals are drawn from.
pub const ANCHOR_COUNT: usize = 7;

/// Position and goal of a single ghost.
///
/// The driver owns one of these per ghost and hands it to [`step_agent`], which keeps the movement
/// rule independent of any scheduling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Agent {
    /// Cell the ghost currently stands on.
    pub position: Cell,
    /// Cell the ghost is walking towards.
    pub goal: Cell,
}

impl Agent {
    /// Creates a ghost standing on `position` and heading to `goal`.
    #[must_use]
    pub const fn new(position: Cell, goal: Cell) -> Self {
        Self { position, goal }
    }
}

/// Result of advancing one ghost by one tick.
///
/// Both [`StepOutcome::Arrived`] and [`StepOutcome::Unreachable`] leave the ghost where it was and
/// give it a fresh goal; they are only told apart for callers that care.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The ghost stepped onto the contained cell.
    Moved(Cell),
    /// The ghost already stood on its goal and was given the contained new goal.
    Arrived(Cell),
    /// The goal could not be reached and was replaced by the contained new goal.
    Unreachable(Cell),
}

/// Returns the anchor points goals are drawn from.
///
/// These are the four cells two steps in from each corner, the hub, and two interior points at a
/// quarter and three quarters of the grid. Coordinates saturate at zero on tiny grids.
#[must_use]
pub const fn anchor_points(cols: usize, rows: usize) -> [Cell; ANCHOR_COUNT] {
    let right = cols.saturating_sub(3);
    let bottom = rows.saturating_sub(3);

    [
        Cell::new(2, 2),
        Cell::new(right, 2),
        Cell::new(2, bottom),
        Cell::new(right, bottom),
        Cell::new(cols / 2, rows / 2),
        Cell::new(cols * 25 / 100, rows * 33 / 100),
        Cell::new(cols * 75 / 100, rows * 66 / 100),
    ]
}

/// Returns the starting cells of the three ghosts.
///
/// The ghosts start on the open cells nearest to the top-left, top-right and bottom-right anchors.
#[must_use]
pub fn default_starts(grid: &Grid) -> [Cell; AGENT_COUNT] {
    let right = grid.cols().saturating_sub(3);
    let bottom = grid.rows().saturating_sub(3);

    [
        Cell::new(2, 2),
        Cell::new(right, 2),
        Cell::new(right, bottom),
    ]
    .map(|near| pick_nearest_open_cell(grid, Some(near)))
}

/// Draws a new goal.
///
/// One of the anchors is chosen uniformly at random and resolved to the nearest open cell. An empty
/// anchor list resolves to the first open cell of the grid.
pub fn pick_goal<R: Rng + ?Sized>(grid: &Grid, anchors: &[Cell], rng: &mut R) -> Cell {
    let anchor = anchors.choose(rng).copied();
    pick_nearest_open_cell(grid, anchor)
}

/// Advances a single ghost by one tick.
///
/// When the path to the goal has more than one cell, the ghost moves to the second cell of that
/// path. Otherwise it stays put and receives a new goal from [`pick_goal`].
pub fn step_agent<R: Rng + ?Sized>(
    grid: &Grid,
    agent: &mut Agent,
    anchors: &[Cell],
    rng: &mut R,
) -> StepOutcome {
    let path = find_path(grid, agent.position, agent.goal);
    if let Some(next) = path.get(1).copied() {
        agent.position = next;
        return StepOutcome::Moved(next);
    }

    let arrived = agent.position == agent.goal;
    let goal = pick_goal(grid, anchors, rng);
    agent.goal = goal;

    if arrived {
        StepOutcome::Arrived(goal)
    } else {
        StepOutcome::Unreachable(goal)
    }
}

/// Tick driver for the three ghosts.
///
/// The driver owns the maze, the ghost records and the random source. It does not keep time itself;
/// whoever schedules the ticks calls [`Driver::tick`] and checks [`Driver::is_alive`] before
/// scheduling the next one. Once [`Driver::stop`] has been called, no further tick has any effect.
#[derive(Debug)]
pub struct Driver<R> {
    /// Maze the ghosts walk in. Never modified after construction.
    grid: Grid,
    /// Per-ghost position and goal.
    agents: [Agent; AGENT_COUNT],
    /// Candidate goal locations.
    anchors: [Cell; ANCHOR_COUNT],
    /// Source of randomness for goal selection.
    rng: R,
    /// Whether the driver still accepts ticks.
    alive: bool,
    /// Number of ticks processed so far.
    ticks: u64,
}

impl<R: Rng> Driver<R> {
    /// Creates a driver with ghosts on `starts`, each heading to a freshly drawn goal.
    pub fn new(grid: Grid, starts: [Cell; AGENT_COUNT], mut rng: R) -> Self {
        let anchors = anchor_points(grid.cols(), grid.rows());
        let agents = starts.map(|position| Agent::new(position, pick_goal(&grid, &anchors, &mut rng)));

        Self::with_agents(grid, agents, rng)
    }

    /// Creates a driver from explicit ghost records.
    pub fn with_agents(grid: Grid, agents: [Agent; AGENT_COUNT], rng: R) -> Self {
        let anchors = anchor_points(grid.cols(), grid.rows());
        info!(
            cols = grid.cols(),
            rows = grid.rows(),
            "ghost driver started"
        );

        Self {
            grid,
            agents,
            anchors,
            rng,
            alive: true,
            ticks: 0,
        }
    }

    /// Advances every ghost by one step.
    ///
    /// Returns the outcome for each ghost, or `None` if the driver has been stopped.
    pub fn tick(&mut self) -> Option<[StepOutcome; AGENT_COUNT]> {
        if !self.alive {
            return None;
        }

        let Self {
            grid,
            agents,
            anchors,
            rng,
            ..
        } = self;
        let outcomes = agents
            .each_mut()
            .map(|agent| step_agent(grid, agent, anchors, rng));
        self.ticks += 1;

        for (idx, outcome) in outcomes.iter().enumerate() {
            match outcome {
                StepOutcome::Moved(_) => {}
                StepOutcome::Arrived(goal) => {
                    debug!(ghost = idx, %goal, "ghost arrived");
                }
                StepOutcome::Unreachable(goal) => {
                    debug!(ghost = idx, %goal, "ghost goal unreachable");
                }
            }
        }

        Some(outcomes)
    }

    /// Gives every ghost a freshly drawn goal without moving it.
    pub fn retarget_all(&mut self) {
        for agent in &mut self.agents {
            agent.goal = pick_goal(&self.grid, &self.anchors, &mut self.rng);
        }
        debug!("ghosts retargeted");
    }

    /// Stops the driver. Further ticks are ignored.
    pub fn stop(&mut self) {
        if self.alive {
            info!(ticks = self.ticks, "ghost driver stopped");
        }
        self.alive = false;
    }

    /// Whether the driver still accepts ticks.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current cell of every ghost.
    #[must_use]
    pub fn positions(&self) -> [Cell; AGENT_COUNT] {
        self.agents.map(|agent| agent.position)
    }

    /// Ghost records, in driver order.
    #[must_use]
    pub const fn agents(&self) -> &[Agent; AGENT_COUNT] {
        &self.agents
    }

    /// Maze the ghosts walk in.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}
