use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::animal::AnimalId;
use crate::vegetation::Vegetation;

/// Grid coordinate. Plain data, compared and hashed by value; bounds are
/// the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Static terrain. Obstacles never move, block animal placement, and keep
/// their cell's vegetation from growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Obstacle {
    River,
    Rock,
}

impl Obstacle {
    /// Rivers can be fished from an adjacent cell; rocks cannot.
    pub fn fishable(self) -> bool {
        matches!(self, Obstacle::River)
    }
}

/// What a single occupancy cell may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Animal(AnimalId),
    Obstacle(Obstacle),
}

/// One buffer of the double-buffered world: an occupancy grid (at most one
/// occupant per cell) and a parallel vegetation grid. The engine owns two
/// of these and swaps them each tick.
pub struct Field {
    depth: usize,
    width: usize,
    cells: Vec<Option<Occupant>>,
    vegetation: Vec<Vegetation>,
}

impl Field {
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            depth,
            width,
            cells: vec![None; depth * width],
            vegetation: vec![Vegetation::new(); depth * width],
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, loc: Location) -> usize {
        debug_assert!(loc.row < self.depth && loc.col < self.width);
        loc.row * self.width + loc.col
    }

    pub fn object_at(&self, loc: Location) -> Option<Occupant> {
        self.cells[self.index(loc)]
    }

    pub fn is_free(&self, loc: Location) -> bool {
        self.object_at(loc).is_none()
    }

    /// Unconditional overwrite; callers are responsible for not stacking
    /// occupants they still care about.
    pub fn place(&mut self, occupant: Occupant, loc: Location) {
        let idx = self.index(loc);
        self.cells[idx] = Some(occupant);
    }

    /// Empties the occupancy grid. Vegetation is untouched.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// In-bounds Moore neighborhood of `loc`, freshly shuffled on every
    /// call so repeated scans carry no directional bias.
    pub fn adjacent_locations(&self, loc: Location, rng: &mut impl Rng) -> Vec<Location> {
        let mut neighbors = Vec::with_capacity(8);
        for row_offset in -1i64..=1 {
            let row = loc.row as i64 + row_offset;
            if row < 0 || row >= self.depth as i64 {
                continue;
            }
            for col_offset in -1i64..=1 {
                if row_offset == 0 && col_offset == 0 {
                    continue;
                }
                let col = loc.col as i64 + col_offset;
                if col < 0 || col >= self.width as i64 {
                    continue;
                }
                neighbors.push(Location::new(row as usize, col as usize));
            }
        }
        neighbors.shuffle(rng);
        neighbors
    }

    /// First unoccupied neighbor in shuffled order, falling back to `loc`
    /// itself if every neighbor is taken.
    pub fn adjacent_free(&self, loc: Location, rng: &mut impl Rng) -> Option<Location> {
        for neighbor in self.adjacent_locations(loc, rng) {
            if self.is_free(neighbor) {
                return Some(neighbor);
            }
        }
        if self.is_free(loc) {
            Some(loc)
        } else {
            None
        }
    }

    /// Consumes the vegetation at `loc` if mature; returns the nutrition
    /// gained (zero for an immature cell).
    pub fn harvest_vegetation(&mut self, loc: Location) -> i32 {
        let idx = self.index(loc);
        self.vegetation[idx].harvest()
    }

    pub fn vegetation_mature(&self, loc: Location) -> bool {
        self.vegetation[self.index(loc)].is_mature()
    }

    pub fn vegetation_level(&self, loc: Location) -> u32 {
        self.vegetation[self.index(loc)].level()
    }

    /// One growth step for every cell not covered by an obstacle.
    pub fn grow_vegetation(&mut self) {
        for idx in 0..self.cells.len() {
            if !matches!(self.cells[idx], Some(Occupant::Obstacle(_))) {
                self.vegetation[idx].grow();
            }
        }
    }

    /// Carries growth levels over from the other buffer. The write buffer
    /// is constructed mature, so skipping this would silently reset every
    /// harvest at the swap.
    pub fn copy_vegetation_from(&mut self, other: &Field) {
        assert_eq!(
            (self.depth, self.width),
            (other.depth, other.width),
            "field buffers must share dimensions"
        );
        for (cell, source) in self.vegetation.iter_mut().zip(&other.vegetation) {
            cell.set_level(source.level());
        }
    }

    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.depth).flat_map(move |row| (0..self.width).map(move |col| Location::new(row, col)))
    }
}
