use nyan_core::DecodeError;

/// Position of a sentence's text inside its rect, on a 3×3 grid.
///
/// Stored as `row * 3 + column`: 0 is top-left, 4 centre, 8 bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    row: u8,
    column: u8,
}

impl Alignment {
    pub const TOP_LEFT: Alignment = Alignment { row: 0, column: 0 };
    pub const CENTER: Alignment = Alignment { row: 1, column: 1 };

    /// `None` unless both coordinates are in `0..3`.
    pub fn new(row: u8, column: u8) -> Option<Self> {
        (row < 3 && column < 3).then_some(Self { row, column })
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::new(index / 3, index % 3)
    }

    pub fn index(self) -> u8 {
        self.row * 3 + self.column
    }

    /// Vertical component: 0 top, 1 middle, 2 bottom.
    pub fn row(self) -> u8 {
        self.row
    }

    /// Horizontal component: 0 left, 1 centre, 2 right.
    pub fn column(self) -> u8 {
        self.column
    }

    pub fn with_row(self, row: u8) -> Option<Self> {
        Self::new(row, self.column)
    }

    pub fn with_column(self, column: u8) -> Option<Self> {
        Self::new(self.row, column)
    }
}

/// The packed style byte of a sentence.
///
/// Layout, MSB first: `[alignment:4][bold:1][vertical:1][color:1][unused:1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentenceFlags {
    pub alignment: Alignment,
    pub bold: bool,
    pub vertical: bool,
    pub color: bool,
}

impl SentenceFlags {
    const BOLD: u8 = 1 << 3;
    const VERTICAL: u8 = 1 << 2;
    const COLOR: u8 = 1 << 1;

    pub fn encode(self) -> u8 {
        let mut byte = self.alignment.index() << 4;
        if self.bold {
            byte |= Self::BOLD;
        }
        if self.vertical {
            byte |= Self::VERTICAL;
        }
        if self.color {
            byte |= Self::COLOR;
        }
        byte
    }

    /// Unpack a stored byte; the unused low bit is ignored.
    pub fn decode(byte: u8) -> Result<Self, DecodeError> {
        let alignment = Alignment::from_index(byte >> 4)
            .ok_or_else(|| DecodeError::Invalid(format!("alignment {} out of range", byte >> 4)))?;
        Ok(Self {
            alignment,
            bold: byte & Self::BOLD != 0,
            vertical: byte & Self::VERTICAL != 0,
            color: byte & Self::COLOR != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout() {
        let flags = SentenceFlags {
            alignment: Alignment::from_index(5).unwrap(),
            bold: true,
            vertical: false,
            color: true,
        };
        assert_eq!(flags.encode(), 0b0101_1010);
        assert_eq!(SentenceFlags::decode(0b0101_1010).unwrap(), flags);
    }

    #[test]
    fn unused_bit_is_ignored() {
        let flags = SentenceFlags::decode(0b1000_0101).unwrap();
        assert_eq!(flags.alignment.index(), 8);
        assert!(flags.vertical);
        assert!(!flags.bold && !flags.color);
    }

    #[test]
    fn alignment_out_of_range_is_invalid() {
        assert!(SentenceFlags::decode(9 << 4).is_err());
        assert_eq!(Alignment::new(3, 0), None);
    }

    #[test]
    fn alignment_components() {
        let a = Alignment::from_index(7).unwrap();
        assert_eq!((a.row(), a.column()), (2, 1));
        assert_eq!(a.with_row(0).unwrap().index(), 1);
        assert_eq!(a.with_column(2).unwrap().index(), 8);
    }
}
