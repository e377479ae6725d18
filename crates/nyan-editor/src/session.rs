use std::io;
use std::path::{Path, PathBuf};

use nyan_core::{FormatError, KanjiSource};
use nyan_level::{Level, LevelMeta, SentenceObject, SourceStamp};

use crate::action::{EditorAction, Target, ViewState};
use crate::error::EditorError;
use crate::history::EditorHistory;

/// A level open in the editor.
#[derive(Debug)]
pub struct EditorSession {
    level: Level,
    path: PathBuf,
    history: EditorHistory,
    view: ViewState,
    clipboard: Option<SentenceObject>,
}

impl EditorSession {
    /// Start editing an in-memory level that will be saved to `path`.
    pub fn new(mut level: Level, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(name) = path.file_name() {
            level.file_name = name.to_string_lossy().into_owned();
        }
        Self {
            level,
            path,
            history: EditorHistory::new(),
            view: ViewState::default(),
            clipboard: None,
        }
    }

    /// Open a level file. Levels that fail validation still open.
    pub fn open(path: &Path) -> Result<Self, FormatError> {
        let level = Level::load(path)?;
        tracing::info!("Editing {} ({} pages)", level.file_name, level.pages.len());
        Ok(Self::new(level, path))
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history(&self) -> &EditorHistory {
        &self.history
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    /// Window title, with `*` while there are unsaved changes.
    pub fn title(&self) -> String {
        let name = if self.level.name.is_empty() {
            &self.level.file_name
        } else {
            &self.level.name
        };
        if self.is_dirty() {
            format!("{name}*")
        } else {
            name.clone()
        }
    }

    pub fn apply(&mut self, action: EditorAction) -> Result<(), EditorError> {
        self.history.do_action(action, &mut self.level, &mut self.view)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.history.undo(&mut self.level, &mut self.view)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.history.redo(&mut self.level, &mut self.view)
    }

    /// Navigation only; not recorded in the history.
    pub fn select(&mut self, page: usize, sentence: Option<usize>) -> Result<(), EditorError> {
        let sentences = &self.level.pages.get(page).ok_or(EditorError::NoPage(page))?.sentences;
        if let Some(index) = sentence.filter(|&i| i >= sentences.len()) {
            return Err(EditorError::NoSentence { page, sentence: index });
        }
        self.view = ViewState { page, selected: sentence };
        Ok(())
    }

    pub fn copy(&mut self, target: Target) -> Result<(), EditorError> {
        let sentence = self
            .level
            .sentence(target.page, target.sentence)
            .ok_or(EditorError::NoSentence {
                page: target.page,
                sentence: target.sentence,
            })?;
        self.clipboard = Some(sentence.clone());
        Ok(())
    }

    /// Paste the copied sentence onto the current page.
    pub fn paste(&mut self) -> Result<(), EditorError> {
        let sentence = self.clipboard.clone().ok_or(EditorError::EmptyClipboard)?;
        let action = EditorAction::paste_sentence(&self.level, self.view.page, sentence)?;
        self.apply(action)
    }

    /// Write the level, refresh its meta, and clear the unsaved indicator.
    ///
    /// A meta that cannot be written is only logged; the level listing will
    /// regenerate it.
    pub fn save(&mut self, kanji: &impl KanjiSource, max_sentence_length: usize) -> Result<LevelMeta, FormatError> {
        self.level.save(&self.path)?;
        let source = SourceStamp::of(&self.path);
        Ok(self.finish_save(source, kanji, max_sentence_length))
    }

    /// Everything after the level file itself is on disk; cannot fail.
    fn finish_save(
        &mut self,
        source: io::Result<SourceStamp>,
        kanji: &impl KanjiSource,
        max_sentence_length: usize,
    ) -> LevelMeta {
        let meta = match source {
            Ok(source) => {
                let meta = LevelMeta::generate(&self.level, source, kanji, max_sentence_length);
                if let Err(e) = meta.save(&LevelMeta::path_for(&self.path)) {
                    tracing::error!("Could not write level meta: {}", e);
                }
                meta
            }
            Err(e) => {
                // a meta without a stamp would never be current, leave it to the listing
                tracing::warn!("Saved {} but could not stat it: {}", self.path.display(), e);
                LevelMeta::generate(&self.level, SourceStamp::default(), kanji, max_sentence_length)
            }
        };

        self.history.mark_saved();
        tracing::info!(
            "Saved {} ({} pages, {})",
            self.level.file_name,
            self.level.pages.len(),
            meta.parser_result.message()
        );
        meta
    }
}

#[cfg(test)]
mod tests {
    use nyan_level::ParserResult;

    use super::*;
    use crate::action::tests::{Cjk, level};

    #[test]
    fn edit_save_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Levels").join("edit.nyl");
        let mut session = EditorSession::new(level(), &path);
        assert_eq!(session.title(), "編集");

        let action = EditorAction::set_text(session.level(), Target::new(0, 1), "白い猫", &Cjk).unwrap();
        session.apply(action).unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.title(), "編集*");

        let meta = session.save(&Cjk, 60).unwrap();
        assert!(!session.is_dirty());
        // new kanji get empty furigana slots, which still count
        assert_eq!(meta.parser_result, ParserResult::Success);
        assert_eq!(session.level().pages[0].sentences[1].furigana, ["", ""]);
        assert_eq!(LevelMeta::load(&LevelMeta::path_for(&path)).unwrap(), meta);

        let reopened = EditorSession::open(&path).unwrap();
        assert_eq!(reopened.level(), session.level());
        assert_eq!(reopened.level().file_name, "edit.nyl");
        assert!(!reopened.is_dirty());
    }

    #[test]
    fn written_level_counts_as_saved_without_a_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stamp.nyl");
        let mut session = EditorSession::new(level(), &path);
        let action = EditorAction::toggle_color(session.level(), Target::new(0, 0)).unwrap();
        session.apply(action).unwrap();
        assert!(session.is_dirty());

        let meta = session.finish_save(Err(io::Error::other("stat failed")), &Cjk, 60);
        assert!(!session.is_dirty());
        assert_eq!(meta.source, SourceStamp::default());
        assert!(!LevelMeta::path_for(&path).exists());
    }

    #[test]
    fn copy_paste_onto_current_page() {
        let mut session = EditorSession::new(level(), "unused.nyl");
        assert_eq!(session.paste(), Err(EditorError::EmptyClipboard));

        session.copy(Target::new(0, 0)).unwrap();
        session.select(1, None).unwrap();
        session.paste().unwrap();

        assert_eq!(session.level().pages[1].sentences[0].text, "日本語です");
        assert_eq!(session.view(), ViewState { page: 1, selected: Some(0) });

        session.undo().unwrap();
        assert!(session.level().pages[1].sentences.is_empty());
    }

    #[test]
    fn select_checks_bounds() {
        let mut session = EditorSession::new(level(), "unused.nyl");
        assert_eq!(session.select(2, None), Err(EditorError::NoPage(2)));
        assert_eq!(
            session.select(0, Some(2)),
            Err(EditorError::NoSentence { page: 0, sentence: 2 })
        );
        session.select(0, Some(1)).unwrap();
        assert_eq!(session.view().selected, Some(1));
    }
}
