use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::field::{Field, Location, Obstacle, Occupant};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read obstacle map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("obstacle map has no cells")]
    Empty,
}

/// Static obstacle layout parsed from a character grid: `'R'` is river,
/// `'P'` is rock, anything else is free terrain. The layout is stamped
/// onto the write field every tick, since that buffer starts cleared.
#[derive(Debug, Clone)]
pub struct ObstacleMap {
    depth: usize,
    width: usize,
    cells: Vec<Option<Obstacle>>,
}

impl ObstacleMap {
    /// A layout with no obstacles at all, used when no map is configured
    /// or the configured one cannot be read.
    pub fn open_terrain(depth: usize, width: usize) -> Self {
        Self {
            depth,
            width,
            cells: vec![None; depth * width],
        }
    }

    /// Parses a character grid. The first row fixes the width; shorter
    /// rows are padded with free terrain and longer rows are truncated.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = text.lines().collect();
        let depth = lines.len();
        let width = lines.first().map(|line| line.chars().count()).unwrap_or(0);
        if depth == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = vec![None; depth * width];
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().take(width).enumerate() {
                cells[row * width + col] = match ch {
                    'R' => Some(Obstacle::River),
                    'P' => Some(Obstacle::Rock),
                    _ => None,
                };
            }
        }
        Ok(Self { depth, width, cells })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn obstacle_at(&self, loc: Location) -> Option<Obstacle> {
        if loc.row < self.depth && loc.col < self.width {
            self.cells[loc.row * self.width + loc.col]
        } else {
            None
        }
    }

    /// Writes every obstacle into the field, clipped to the overlap of the
    /// two grids.
    pub fn stamp(&self, field: &mut Field) {
        let depth = self.depth.min(field.depth());
        let width = self.width.min(field.width());
        for row in 0..depth {
            for col in 0..width {
                if let Some(obstacle) = self.cells[row * self.width + col] {
                    field.place(Occupant::Obstacle(obstacle), Location::new(row, col));
                }
            }
        }
    }
}
