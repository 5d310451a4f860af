/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mines, flags, and cell totals.
pub type Area = u16;

/// Grid position `(x, y)`.
pub type Pos = (Coord, Coord);

pub(crate) trait ToIndex {
    fn to_index(self) -> [usize; 2];
}

impl ToIndex for Pos {
    fn to_index(self) -> [usize; 2] {
        [self.0.into(), self.1.into()]
    }
}

pub const fn area(w: Coord, h: Coord) -> Area {
    let w = w as Area;
    let h = h as Area;
    w.saturating_mul(h)
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Positions at Chebyshev distance 1 from `pos`, clipped to `bounds`.
/// Never yields `pos` itself.
pub fn neighbors(pos: Pos, bounds: Pos) -> impl Iterator<Item = Pos> {
    DISPLACEMENTS.iter().filter_map(move |&(dx, dy)| {
        let x = pos.0.checked_add_signed(dx)?;
        let y = pos.1.checked_add_signed(dy)?;
        (x < bounds.0 && y < bounds.1).then_some((x, y))
    })
}
