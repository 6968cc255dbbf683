/// Board side length and row/column index.
pub type Coord = u8;

/// Mine and cell counts. A 255x255 board still fits.
pub type CellCount = u16;

/// `(row, col)`
pub type Coord2 = (Coord, Coord);

/// Converts wide, possibly negative coordinates into board coordinates when they fall inside a
/// `size x size` board.
pub fn checked_coords(row: i64, col: i64, size: Coord) -> Option<Coord2> {
    let row = Coord::try_from(row).ok()?;
    let col = Coord::try_from(col).ok()?;
    (row < size && col < size).then_some((row, col))
}
