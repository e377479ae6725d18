/// JLPT level of a kanji as stored in the dictionary dump (1–5, 6 = unclassified).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum JlptLevel {
    N1 = 1, // Advanced
    N2 = 2, // Upper intermediate
    N3 = 3, // Intermediate
    N4 = 4, // Elementary
    N5 = 5, // Beginner
    #[default]
    Unclassified = 6,
}

impl JlptLevel {
    /// Level from its stored number; anything outside 1–6 is rejected
    pub fn from_number(n: i32) -> Option<Self> {
        match n {
            1 => Some(JlptLevel::N1),
            2 => Some(JlptLevel::N2),
            3 => Some(JlptLevel::N3),
            4 => Some(JlptLevel::N4),
            5 => Some(JlptLevel::N5),
            6 => Some(JlptLevel::Unclassified),
            _ => None,
        }
    }

    pub fn number(self) -> i32 {
        self as i32
    }
}
