use rand::Rng;

use crate::playfield::{Playfield, GRID_WIDTH};

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// `None` when either coordinate would overflow.
    pub fn checked_offset(self, dx: i16, dy: i16) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

/// Opaque color identity. The renderer decides what it looks like.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ColorId(pub u8);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum FormationKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// A 5x5 occupancy mask, `#` marks an occupied cell.
pub type Mask = [&'static str; 5];

pub const MASK_SIZE: i16 = 5;

// ============================================================================
// Catalog
// ============================================================================

const I_LAYOUTS: &[Mask] = &[
    [".....", "..#..", "..#..", "..#..", "..#.."],
    [".....", ".....", "####.", ".....", "....."],
];

const O_LAYOUTS: &[Mask] = &[[".....", ".....", ".##..", ".##..", "....."]];

const T_LAYOUTS: &[Mask] = &[
    [".....", ".....", ".#...", "###..", "....."],
    [".....", ".....", ".#...", ".##..", ".#..."],
    [".....", ".....", ".....", "###..", ".#..."],
    [".....", ".....", ".#...", "##...", ".#..."],
];

const S_LAYOUTS: &[Mask] = &[
    [".....", ".....", ".##..", "##...", "....."],
    [".....", ".#...", ".##..", "..#..", "....."],
];

const Z_LAYOUTS: &[Mask] = &[
    [".....", ".....", "##...", ".##..", "....."],
    [".....", "..#..", ".##..", ".#...", "....."],
];

const J_LAYOUTS: &[Mask] = &[
    [".....", ".#...", ".#...", "##...", "....."],
    [".....", ".....", "#....", "###..", "....."],
    [".....", ".##..", ".#...", ".#...", "....."],
    [".....", ".....", "###..", "..#..", "....."],
];

const L_LAYOUTS: &[Mask] = &[
    [".....", "..#..", "..#..", ".##..", "....."],
    [".....", ".....", "###..", "#....", "....."],
    [".....", "##...", ".#...", ".#...", "....."],
    [".....", ".....", "..#..", "###..", "....."],
];

impl FormationKind {
    pub const ALL: [FormationKind; 7] = [
        FormationKind::I,
        FormationKind::O,
        FormationKind::T,
        FormationKind::S,
        FormationKind::Z,
        FormationKind::J,
        FormationKind::L,
    ];

    pub fn layouts(&self) -> &'static [Mask] {
        match self {
            FormationKind::I => I_LAYOUTS,
            FormationKind::O => O_LAYOUTS,
            FormationKind::T => T_LAYOUTS,
            FormationKind::S => S_LAYOUTS,
            FormationKind::Z => Z_LAYOUTS,
            FormationKind::J => J_LAYOUTS,
            FormationKind::L => L_LAYOUTS,
        }
    }

    pub fn rotation_count(&self) -> usize {
        self.layouts().len()
    }

    pub fn color(&self) -> ColorId {
        match self {
            FormationKind::I => ColorId(0),
            FormationKind::O => ColorId(1),
            FormationKind::T => ColorId(2),
            FormationKind::S => ColorId(3),
            FormationKind::Z => ColorId(4),
            FormationKind::J => ColorId(5),
            FormationKind::L => ColorId(6),
        }
    }

    /// Uniform draw over the seven kinds.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        FormationKind::ALL[rng.gen_range(0..FormationKind::ALL.len())]
    }
}

/// Absolute cells of `kind` in rotation state `rotation` (taken modulo the
/// layout count) with the mask's top-left corner at `origin`.
pub fn occupied_cells(kind: FormationKind, rotation: usize, origin: Position) -> Vec<Position> {
    let layouts = kind.layouts();
    let mask = &layouts[rotation % layouts.len()];
    mask.iter()
        .enumerate()
        .flat_map(|(row, line)| {
            line.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'#')
                .map(move |(col, _)| Position {
                    x: origin.x.saturating_add(col as i16),
                    y: origin.y.saturating_add(row as i16),
                })
        })
        .collect()
}

// ============================================================================
// Formation
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formation {
    pub kind: FormationKind,
    pub origin: Position,
    pub rotation: usize,
    pub color: ColorId,
}

impl Formation {
    pub const SPAWN_ORIGIN: Position = Position {
        x: GRID_WIDTH as i16 / 2 - 2,
        y: 0,
    };

    pub fn spawn(kind: FormationKind) -> Self {
        Self {
            kind,
            origin: Self::SPAWN_ORIGIN,
            rotation: 0,
            color: kind.color(),
        }
    }

    pub fn new_at(kind: FormationKind, x: i16, y: i16) -> Self {
        Self {
            origin: Position { x, y },
            ..Self::spawn(kind)
        }
    }

    pub fn cells(&self) -> Vec<Position> {
        self.cells_at(self.origin, self.rotation)
    }

    /// Cells this formation would occupy at a candidate origin and rotation.
    pub fn cells_at(&self, origin: Position, rotation: usize) -> Vec<Position> {
        occupied_cells(self.kind, rotation, origin)
    }

    /// The mask may rise at most one mask height above the top row.
    pub fn try_move(&mut self, field: &Playfield, dx: i16, dy: i16) -> bool {
        let Some(origin) = self.origin.checked_offset(dx, dy) else {
            return false;
        };
        if origin.y < -MASK_SIZE {
            return false;
        }
        if field.is_valid_placement(&self.cells_at(origin, self.rotation)) {
            self.origin = origin;
            true
        } else {
            false
        }
    }

    /// Clockwise to the next layout. No kicks: a colliding candidate is rejected.
    pub fn try_rotate(&mut self, field: &Playfield) -> bool {
        let rotation = (self.rotation + 1) % self.kind.rotation_count();
        if field.is_valid_placement(&self.cells_at(self.origin, rotation)) {
            self.rotation = rotation;
            true
        } else {
            false
        }
    }
}
