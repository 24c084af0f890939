//! Generic grid for per-cell site data

use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, GRID_SIZE};

/// Generic 2D grid covering a whole site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// Grid with the dimensions of a site
    pub fn site() -> Self {
        Self::new(GRID_SIZE as usize, GRID_SIZE as usize)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            Some(&self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            Some(&mut self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    #[inline]
    pub fn at(&self, cell: Cell) -> Option<&T> {
        self.get(cell.x as usize, cell.y as usize)
    }

    #[inline]
    pub fn set_at(&mut self, cell: Cell, value: T) {
        self.set(cell.x as usize, cell.y as usize, value);
    }
}

impl Grid<bool> {
    /// Number of cells set to `true`
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}
