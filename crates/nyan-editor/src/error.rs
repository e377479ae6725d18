#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("page {0} does not exist")]
    NoPage(usize),

    #[error("sentence {sentence} does not exist on page {page}")]
    NoSentence { page: usize, sentence: usize },

    #[error("cannot insert a sentence at {index} on page {page}")]
    InsertOutOfRange { page: usize, index: usize },

    #[error("furigana {index} out of range, sentence has {len}")]
    NoFurigana { index: usize, len: usize },

    #[error("alignment component {0} out of range")]
    BadAlignment(u8),

    #[error("a level keeps at least one page")]
    LastPage,

    #[error("nothing to paste")]
    EmptyClipboard,
}
