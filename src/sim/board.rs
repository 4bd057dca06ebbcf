//! Board model: an 18x18 grid of static cells
//!
//! Cells are a flat array of tagged variants. Holes cover a 2x2 block, so
//! hole records live in a small arena and the four footprint cells store the
//! same [`HoleId`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::geometry::Aabb;
use crate::consts::*;
use crate::{cell_center, grid_position};

/// A wall tile. Non-grey walls recolor balls that bounce off them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub center: Vec2,
    pub color: Color,
    pub bounds: Aabb,
}

impl Wall {
    pub fn new(center: Vec2, color: Color) -> Self {
        Self {
            center,
            color,
            bounds: Aabb::from_center(center, Vec2::splat(TILE_HALF_SIZE)),
        }
    }
}

/// Which way a restricted wall runs. The wall is thin across this direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Runs top to bottom; thin on x
    Vertical,
    /// Runs left to right; thin on y
    Horizontal,
}

/// A wall that only blocks balls of other colors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestrictedWall {
    pub wall: Wall,
    pub orientation: Orientation,
}

impl RestrictedWall {
    pub fn new(center: Vec2, color: Color, orientation: Orientation) -> Self {
        let mut wall = Wall::new(center, color);
        let inset = match orientation {
            Orientation::Vertical => Vec2::new(RESTRICTED_WALL_INSET, 0.0),
            Orientation::Horizontal => Vec2::new(0.0, RESTRICTED_WALL_INSET),
        };
        wall.bounds = wall.bounds.inset(inset);
        Self { wall, orientation }
    }

    /// Balls of the wall's own color and grey balls pass straight through
    pub fn lets_through(&self, ball_color: Color) -> bool {
        ball_color == self.wall.color || ball_color.is_neutral()
    }
}

/// A capture hole, centered on the shared corner of its 2x2 footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub center: Vec2,
    pub color: Color,
}

impl Hole {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, Vec2::splat(HOLE_HALF_SIZE))
    }
}

/// Index into the board's hole arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoleId(pub usize);

/// Entry point for balls fed from the conveyor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub center: Vec2,
}

/// Static content of one grid square
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall(Wall),
    RestrictedWall(RestrictedWall),
    Hole(HoleId),
    Spawner(Spawner),
}

/// A non-empty cell next to (or under) a ball, with its distance to the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub row: usize,
    pub col: usize,
    pub distance: f32,
}

/// The fixed-size playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
    holes: Vec<Hole>,
    spawners: Vec<Spawner>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// An all-empty board
    pub fn empty() -> Self {
        Self {
            cells: vec![Cell::Empty; BOARD_SIZE * BOARD_SIZE],
            holes: Vec::new(),
            spawners: Vec::new(),
        }
    }

    #[inline]
    fn index(row: usize, col: usize) -> Option<usize> {
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(row * BOARD_SIZE + col)
    }

    /// Cell at (row, col); out-of-bounds reads as empty
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        Self::index(row, col)
            .map(|i| self.cells[i])
            .unwrap_or(Cell::Empty)
    }

    /// Cell containing a world position
    pub fn cell_at(&self, pos: Vec2) -> Cell {
        grid_position(pos)
            .map(|(row, col)| self.cell(row, col))
            .unwrap_or(Cell::Empty)
    }

    /// Overwrite a cell. Returns false when (row, col) is off the board.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn place_wall(&mut self, row: usize, col: usize, color: Color) -> bool {
        self.set(row, col, Cell::Wall(Wall::new(cell_center(row, col), color)))
    }

    pub fn place_restricted_wall(
        &mut self,
        row: usize,
        col: usize,
        color: Color,
        orientation: Orientation,
    ) -> bool {
        let wall = RestrictedWall::new(cell_center(row, col), color, orientation);
        self.set(row, col, Cell::RestrictedWall(wall))
    }

    pub fn place_spawner(&mut self, row: usize, col: usize) -> bool {
        let spawner = Spawner {
            center: cell_center(row, col),
        };
        if self.set(row, col, Cell::Spawner(spawner)) {
            self.spawners.push(spawner);
            true
        } else {
            false
        }
    }

    /// Place a hole whose top-left footprint cell is (row, col)
    ///
    /// Returns the hole id and how many footprint cells fell inside the board.
    pub fn place_hole(&mut self, row: usize, col: usize, color: Color) -> (HoleId, usize) {
        let id = HoleId(self.holes.len());
        let center = cell_center(row, col) + Vec2::splat(CELL_SIZE / 2.0);
        self.holes.push(Hole { center, color });
        let placed = [(row, col), (row, col + 1), (row + 1, col), (row + 1, col + 1)]
            .into_iter()
            .filter(|&(r, c)| self.set(r, c, Cell::Hole(id)))
            .count();
        (id, placed)
    }

    pub fn hole(&self, id: HoleId) -> Option<&Hole> {
        self.holes.get(id.0)
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    /// Spawners in layout (row-major) order
    pub fn spawners(&self) -> &[Spawner] {
        &self.spawners
    }

    /// Reference point used to order a cell by distance
    fn anchor(&self, cell: &Cell) -> Option<Vec2> {
        match cell {
            Cell::Empty => None,
            Cell::Wall(w) => Some(w.center),
            Cell::RestrictedWall(r) => Some(r.wall.center),
            Cell::Hole(id) => self.hole(*id).map(|h| h.center),
            Cell::Spawner(s) => Some(s.center),
        }
    }

    /// Non-empty cells around a position, nearest first
    ///
    /// Candidates are the cells above, below, left, right and the cell itself,
    /// in that order; equal distances keep that order. A hole reached through
    /// several footprint cells is listed once. Off-board positions have no
    /// neighbors.
    pub fn neighbors(&self, pos: Vec2) -> Vec<Neighbor> {
        let mut out: Vec<Neighbor> = Vec::with_capacity(5);
        let Some((row, col)) = grid_position(pos) else {
            return out;
        };

        let candidates = [
            row.checked_sub(1).map(|r| (r, col)),
            (row + 1 < BOARD_SIZE).then_some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            (col + 1 < BOARD_SIZE).then_some((row, col + 1)),
            Some((row, col)),
        ];

        let mut seen_holes: Vec<HoleId> = Vec::with_capacity(2);
        for (r, c) in candidates.into_iter().flatten() {
            let cell = self.cell(r, c);
            if let Cell::Hole(id) = cell {
                if seen_holes.contains(&id) {
                    continue;
                }
                seen_holes.push(id);
            }
            if let Some(anchor) = self.anchor(&cell) {
                out.push(Neighbor {
                    row: r,
                    col: c,
                    distance: pos.distance(anchor),
                });
            }
        }

        // Stable sort keeps candidate order on ties
        out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        out
    }
}
