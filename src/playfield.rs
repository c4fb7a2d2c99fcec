use crate::formation::{ColorId, Position};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(ColorId),
}

impl Cell {
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

pub type Row = [Cell; GRID_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; GRID_WIDTH];

/// The grid of locked cells, row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playfield {
    rows: Vec<Row>,
}

impl Playfield {
    pub fn new() -> Self {
        Self {
            rows: vec![EMPTY_ROW; GRID_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Cell::Empty)
    }

    /// Fixture access; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    /// Cells above the top edge (`y < 0`) only have to be in range horizontally.
    pub fn is_valid_placement(&self, cells: &[Position]) -> bool {
        cells.iter().all(|cell| {
            if cell.x < 0 || cell.x >= GRID_WIDTH as i16 || cell.y >= GRID_HEIGHT as i16 {
                return false;
            }
            cell.y < 0 || !self.rows[cell.y as usize][cell.x as usize].is_filled()
        })
    }

    /// Writes `color` into every on-field cell. Cells above the top are dropped.
    pub fn commit(&mut self, cells: &[Position], color: ColorId) {
        for cell in cells {
            if cell.y < 0 || cell.x < 0 {
                continue;
            }
            self.set(cell.x as usize, cell.y as usize, Cell::Filled(color));
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .map_or(false, |row| row.iter().all(Cell::is_filled))
    }

    pub fn filled_in_row(&self, y: usize) -> usize {
        self.rows
            .get(y)
            .map_or(0, |row| row.iter().filter(|cell| cell.is_filled()).count())
    }

    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }

    /// Indices of full rows, ascending.
    pub fn full_rows(&self) -> Vec<usize> {
        (0..GRID_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Removes `rows` and refills the top with as many empty rows. Survivors keep
    /// their relative order; out-of-range and repeated indices are ignored.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        let mut survivors: Vec<Row> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(y, _)| !rows.contains(y))
            .map(|(_, row)| *row)
            .collect();
        let removed = GRID_HEIGHT - survivors.len();
        let mut compacted = vec![EMPTY_ROW; removed];
        compacted.append(&mut survivors);
        self.rows = compacted;
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: ColorId = ColorId(2);

    fn fill_row(field: &mut Playfield, y: usize) {
        for x in 0..GRID_WIDTH {
            field.set(x, y, Cell::Filled(C));
        }
    }

    #[test]
    fn new_field_is_empty() {
        let field = Playfield::new();
        assert_eq!(field.rows().len(), GRID_HEIGHT);
        assert_eq!(field.filled_cells(), 0);
        assert!(field.full_rows().is_empty());
    }

    #[test]
    fn placement_bounds() {
        let field = Playfield::new();
        assert!(field.is_valid_placement(&[Position::new(0, 0), Position::new(9, 19)]));
        assert!(!field.is_valid_placement(&[Position::new(-1, 5)]));
        assert!(!field.is_valid_placement(&[Position::new(10, 5)]));
        assert!(!field.is_valid_placement(&[Position::new(4, 20)]));
    }

    #[test]
    fn cells_above_top_skip_occupancy_but_not_columns() {
        let mut field = Playfield::new();
        fill_row(&mut field, 0);
        assert!(field.is_valid_placement(&[Position::new(3, -1), Position::new(4, -2)]));
        assert!(!field.is_valid_placement(&[Position::new(-1, -1)]));
        assert!(!field.is_valid_placement(&[Position::new(10, -3)]));
        assert!(!field.is_valid_placement(&[Position::new(3, -1), Position::new(3, 0)]));
    }

    #[test]
    fn commit_drops_cells_above_top() {
        let mut field = Playfield::new();
        field.commit(
            &[Position::new(2, -1), Position::new(2, 0), Position::new(3, 0)],
            C,
        );
        assert_eq!(field.filled_cells(), 2);
        assert_eq!(field.cell(2, 0), Cell::Filled(C));
        assert_eq!(field.cell(3, 0), Cell::Filled(C));
    }

    #[test]
    fn full_rows_reports_only_complete_rows() {
        let mut field = Playfield::new();
        fill_row(&mut field, 19);
        fill_row(&mut field, 4);
        fill_row(&mut field, 12);
        field.set(6, 12, Cell::Empty);
        assert_eq!(field.full_rows(), vec![4, 19]);
    }

    #[test]
    fn clear_rows_with_nothing_is_identity() {
        let mut field = Playfield::new();
        field.set(1, 18, Cell::Filled(C));
        let before = field.clone();
        field.clear_rows(&[]);
        assert_eq!(field, before);
    }

    #[test]
    fn clear_non_contiguous_rows_preserves_order() {
        let mut field = Playfield::new();
        fill_row(&mut field, 5);
        fill_row(&mut field, 7);
        field.set(0, 4, Cell::Filled(ColorId(0)));
        field.set(0, 6, Cell::Filled(ColorId(1)));
        field.set(0, 8, Cell::Filled(ColorId(3)));

        field.clear_rows(&[5, 7]);

        assert_eq!(field.rows().len(), GRID_HEIGHT);
        assert_eq!(field.filled_in_row(0), 0);
        assert_eq!(field.filled_in_row(1), 0);
        // Row 4 shifts by two, row 6 by one, row 8 stays.
        assert_eq!(field.cell(0, 6), Cell::Filled(ColorId(0)));
        assert_eq!(field.cell(0, 7), Cell::Filled(ColorId(1)));
        assert_eq!(field.cell(0, 8), Cell::Filled(ColorId(3)));
        assert_eq!(field.filled_cells(), 3);
    }

    #[test]
    fn clear_every_row() {
        let mut field = Playfield::new();
        for y in 0..GRID_HEIGHT {
            fill_row(&mut field, y);
        }
        let rows = field.full_rows();
        field.clear_rows(&rows);
        assert_eq!(field, Playfield::new());
    }

    #[test]
    fn clear_rows_ignores_repeats_and_out_of_range() {
        let mut field = Playfield::new();
        fill_row(&mut field, 19);
        field.set(3, 18, Cell::Filled(C));
        field.clear_rows(&[19, 19, 42]);
        assert_eq!(field.rows().len(), GRID_HEIGHT);
        assert_eq!(field.cell(3, 19), Cell::Filled(C));
        assert_eq!(field.filled_cells(), 1);
    }
}
