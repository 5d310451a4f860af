use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::ToIndex;
use crate::{Area, BoardError, Coord, Pos, Result, neighbors};

/// Immutable mine placement for one game.
///
/// Adjacency counts are computed once at construction and never change
/// afterwards; reveal operations only read them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineField {
    mines: Array2<bool>,
    counts: Array2<u8>,
    mine_count: Area,
}

impl MineField {
    /// Builds a field from a mine mask. The mask dimensions must fit the
    /// [`Coord`] range.
    pub fn from_mask(mines: Array2<bool>) -> Self {
        let dim = mines.dim();
        let bounds: Pos = (
            dim.0.try_into().expect("width must fit a Coord"),
            dim.1.try_into().expect("height must fit a Coord"),
        );

        let mut counts: Array2<u8> = Array2::from_elem(dim, 0);
        let mut mine_count: Area = 0;
        for ((x, y), &is_mine) in mines.indexed_iter() {
            if !is_mine {
                continue;
            }
            mine_count += 1;
            for pos in neighbors((x as Coord, y as Coord), bounds) {
                counts[pos.to_index()] += 1;
            }
        }

        Self {
            mines,
            counts,
            mine_count,
        }
    }

    pub fn from_coords(size: Pos, mine_coords: &[Pos]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default([size.0 as usize, size.1 as usize]);

        for &pos in mine_coords {
            if pos.0 >= size.0 || pos.1 >= size.1 {
                return Err(BoardError::OutOfBounds);
            }
            mines[pos.to_index()] = true;
        }

        Ok(Self::from_mask(mines))
    }

    pub fn size(&self) -> Pos {
        let dim = self.mines.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> Area {
        self.mines.len() as Area
    }

    pub fn safe_cells(&self) -> Area {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> Area {
        self.mine_count
    }

    pub fn contains_mine(&self, pos: Pos) -> bool {
        self.mines[pos.to_index()]
    }

    /// Number of mines among the 8 grid neighbors of `pos`, precomputed.
    pub fn adjacent_mines(&self, pos: Pos) -> u8 {
        self.counts[pos.to_index()]
    }
}
