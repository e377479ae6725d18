//! Level editing model: reversible actions, the undo/redo history, and the
//! editing session that ties them to a file.

mod action;
mod error;
mod history;
mod session;

pub use action::{EditorAction, Target, ViewState};
pub use error::EditorError;
pub use history::EditorHistory;
pub use session::EditorSession;
