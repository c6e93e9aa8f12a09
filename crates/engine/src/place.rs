use tetrecs_core::{resolve_lines, CoreError, GameSnapshot, GameState, Grid, LineClear, Piece};

/// Why no plan could be made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    NotPlayable,
    NoActive,
    NoFit,
    /// Snapshot cells do not form a grid
    Malformed,
}

impl PlanError {
    pub fn code(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "not_playable",
            PlanError::NoActive => "no_active",
            PlanError::NoFit => "no_fit",
            PlanError::Malformed => "malformed_snapshot",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "game is not playable",
            PlanError::NoActive => "no current piece",
            PlanError::NoFit => "no orientation fits anywhere on the grid",
            PlanError::Malformed => "snapshot cells do not form a grid",
        }
    }
}

/// Why a plan could not be carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    NotPlayable,
    NoActive,
    Rejected(CoreError),
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::NoActive => "no_active",
            PlaceError::Rejected(e) => e.code(),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoActive => "no current piece",
            PlaceError::Rejected(_) => "placement rejected by the game",
        }
    }
}

/// A placement to carry out: optional swap, quarter turns clockwise, then a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacePlan {
    pub swap: bool,
    pub rotations: u8,
    pub x: i32,
    pub y: i32,
    /// Lines the placement would clear
    pub lines: u32,
    /// Cells the placement would clear
    pub cells: usize,
    /// Occupied cells touching the piece after placement
    pub contacts: u32,
}

impl PlacePlan {
    fn rank(&self) -> (u32, usize, u32, bool) {
        // Prefer not swapping when everything else is equal.
        (self.lines, self.cells, self.contacts, !self.swap)
    }
}

fn contacts(grid: &Grid, piece: &Piece, x: i32, y: i32) -> u32 {
    let blocks = piece.blocks();
    let (left, top) = (x - 1, y - 1);
    let own = |gx: i32, gy: i32| {
        blocks
            .iter()
            .any(|&(dx, dy)| left + dx as i32 == gx && top + dy as i32 == gy)
    };

    let mut n = 0;
    for &(dx, dy) in &blocks {
        let (gx, gy) = (left + dx as i32, top + dy as i32);
        for (nx, ny) in [(gx - 1, gy), (gx + 1, gy), (gx, gy - 1), (gx, gy + 1)] {
            if own(nx, ny) {
                continue;
            }
            match grid.get(nx, ny) {
                // Walls count as contact.
                None => n += 1,
                Some(v) if v != 0 => n += 1,
                Some(_) => {}
            }
        }
    }
    n
}

fn simulate(grid: &Grid, piece: &Piece, x: i32, y: i32) -> Option<LineClear> {
    let mut scratch = grid.clone();
    if !scratch.play(piece, x, y) {
        return None;
    }
    Some(resolve_lines(&mut scratch))
}

fn search(grid: &Grid, piece: Piece, swap: bool, best: &mut Option<PlacePlan>) {
    let mut oriented = piece;
    for rotations in 0..4u8 {
        // Centers one cell outside the grid still fit pieces with empty edges.
        for y in -1..=grid.rows() as i32 {
            for x in -1..=grid.cols() as i32 {
                let Some(clear) = simulate(grid, &oriented, x, y) else {
                    continue;
                };
                let plan = PlacePlan {
                    swap,
                    rotations,
                    x,
                    y,
                    lines: clear.lines,
                    cells: clear.cell_count(),
                    contacts: contacts(grid, &oriented, x, y),
                };
                if best.map_or(true, |b| plan.rank() > b.rank()) {
                    *best = Some(plan);
                }
            }
        }
        oriented.rotate(1);
    }
}

fn plan_for(grid: &Grid, current: Piece, following: Option<Piece>) -> Result<PlacePlan, PlanError> {
    let mut best = None;
    search(grid, current, false, &mut best);
    if let Some(following) = following {
        search(grid, following, true, &mut best);
    }
    best.ok_or(PlanError::NoFit)
}

/// Find the best placement for the current piece, or the following one after a swap
pub fn plan_placement(state: &GameState) -> Result<PlacePlan, PlanError> {
    if !state.is_running() {
        return Err(PlanError::NotPlayable);
    }
    let Some(current) = state.current_piece().copied() else {
        return Err(PlanError::NoActive);
    };
    plan_for(state.grid(), current, state.following_piece().copied())
}

/// Same as [`plan_placement`], for callers that only see snapshots
pub fn plan_from_snapshot(snapshot: &GameSnapshot) -> Result<PlacePlan, PlanError> {
    if !snapshot.playable() {
        return Err(PlanError::NotPlayable);
    }
    let grid = snapshot.grid().ok_or(PlanError::Malformed)?;
    let Some(current) = snapshot.current_piece() else {
        return Err(PlanError::NoActive);
    };
    plan_for(&grid, current, snapshot.following_piece())
}

/// Carry out a plan against the game
pub fn apply_place(state: &mut GameState, plan: PlacePlan) -> Result<LineClear, PlaceError> {
    if !state.is_running() {
        return Err(PlaceError::NotPlayable);
    }
    if plan.swap && !state.swap_current_piece() {
        return Err(PlaceError::NoActive);
    }
    for _ in 0..plan.rotations {
        if !state.rotate_current_piece() {
            return Err(PlaceError::NoActive);
        }
    }
    state
        .block_clicked(plan.x, plan.y)
        .map_err(PlaceError::Rejected)
}
