//! Single braille glyphs and the dot-to-bit table.

/// Braille base character (U+2800, empty braille pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// Bit for each dot, indexed `[column][row]` within the 2x4 block.
///
/// ```text
/// [0,0]=0x01   [1,0]=0x08
/// [0,1]=0x02   [1,1]=0x10
/// [0,2]=0x04   [1,2]=0x20
/// [0,3]=0x40   [1,3]=0x80
/// ```
pub const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// One output character: an 8-bit dot mask over a 2x4 pixel block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BrailleCell(u8);

impl BrailleCell {
    /// The blank cell (U+2800).
    pub const BLANK: BrailleCell = BrailleCell(0);
    /// All eight dots set (U+28FF).
    pub const FULL: BrailleCell = BrailleCell(0xFF);

    pub fn from_mask(mask: u8) -> Self {
        BrailleCell(mask)
    }

    /// Build a cell from a 2x4 boolean grid where `grid[x][y]` marks the dot
    /// in column `x`, row `y` as on.
    pub fn from_dots(grid: [[bool; 4]; 2]) -> Self {
        let mut mask = 0u8;
        for (x, column) in grid.iter().enumerate() {
            for (y, &on) in column.iter().enumerate() {
                if on {
                    mask |= DOT_BITS[x][y];
                }
            }
        }
        BrailleCell(mask)
    }

    pub fn mask(self) -> u8 {
        self.0
    }

    /// Whether the dot at column `x`, row `y` is set.
    pub fn is_set(self, x: usize, y: usize) -> bool {
        self.0 & DOT_BITS[x][y] != 0
    }

    /// The corresponding braille character (U+2800 to U+28FF).
    pub fn to_char(self) -> char {
        char::from_u32(BRAILLE_BASE as u32 + self.0 as u32).unwrap_or(BRAILLE_BASE)
    }
}

impl From<BrailleCell> for char {
    fn from(cell: BrailleCell) -> Self {
        cell.to_char()
    }
}
