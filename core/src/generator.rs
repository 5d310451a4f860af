use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::ToIndex;
use crate::{Area, MineField, Pos, area, neighbors};

/// Produces the mine placement for a board. Consumed on use.
pub trait MineGenerator {
    fn generate(self, size: Pos, mines: Area) -> MineField;
}

/// How much safety the first revealed cell is guaranteed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstClickPolicy {
    /// No guarantee, mines may land anywhere.
    Anywhere,
    /// The first revealed cell is never a mine.
    SafeStart,
    /// The first revealed cell and its 8 neighbors are mine-free, so the
    /// first reveal always opens a zero region.
    OpenStart,
}

/// Uniform random placement honoring a [`FirstClickPolicy`], seeded for
/// reproducibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomGenerator {
    seed: u64,
    start: Pos,
    policy: FirstClickPolicy,
}

impl RandomGenerator {
    pub fn new(seed: u64, start: Pos, policy: FirstClickPolicy) -> Self {
        Self {
            seed,
            start,
            policy,
        }
    }
}

impl MineGenerator for RandomGenerator {
    fn generate(self, size: Pos, mines: Area) -> MineField {
        use FirstClickPolicy::*;
        use rand::prelude::*;

        let total = area(size.0, size.1);
        let dim = [size.0 as usize, size.1 as usize];

        // optimize for full boards
        if mines >= total {
            if mines > total {
                log::warn!("requested {mines} mines but the board only fits {total}");
            }
            return MineField::from_mask(Array2::from_elem(dim, true));
        }

        // Reserve the protected cells around the start position, degrading
        // the policy until the requested mines fit in the free remainder.
        // Reservations are counted, not assumed: a corner start only blocks
        // 4 cells, so small boards can still honor `OpenStart`.
        let mut policy = self.policy;
        let (mut mask, mut free) = loop {
            let mut mask: Array2<bool> = Array2::default(dim);
            let mut reserved: Area = 0;
            match policy {
                Anywhere => {}
                SafeStart => {
                    mask[self.start.to_index()] = true;
                    reserved = 1;
                }
                OpenStart => {
                    mask[self.start.to_index()] = true;
                    reserved = 1;
                    for pos in neighbors(self.start, size) {
                        mask[pos.to_index()] = true;
                        reserved += 1;
                    }
                }
            }

            let free = total - reserved;
            if mines <= free {
                break (mask, free);
            }

            let fallback = match policy {
                OpenStart => SafeStart,
                SafeStart | Anywhere => Anywhere,
            };
            log::warn!(
                "{mines} mines do not fit a {total}-cell board under {policy:?}, \
                 falling back to {fallback:?}"
            );
            policy = fallback;
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: Area = 0;
        {
            let cells = mask.as_slice_mut().expect("layout should be standard");
            while placed < mines {
                let mut target = rng.random_range(0..free);
                for cell in cells.iter_mut() {
                    if *cell {
                        continue;
                    }
                    if target == 0 {
                        *cell = true;
                        placed += 1;
                        free -= 1;
                        break;
                    }
                    target -= 1;
                }
            }
        }

        // undo the reservations so only actual mines remain
        match policy {
            Anywhere => {}
            SafeStart => {
                mask[self.start.to_index()] = false;
            }
            OpenStart => {
                mask[self.start.to_index()] = false;
                for pos in neighbors(self.start, size) {
                    mask[pos.to_index()] = false;
                }
            }
        }

        let field = MineField::from_mask(mask);
        if field.mine_count() != mines {
            log::warn!(
                "generated mine count mismatch, actual: {}, requested: {mines}",
                field.mine_count()
            );
        }
        field
    }
}
