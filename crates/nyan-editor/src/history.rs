use nyan_level::Level;

use crate::action::{EditorAction, ViewState};
use crate::error::EditorError;

/// Linear undo/redo log.
///
/// `applied` actions from the front of `actions` are in effect; the rest form
/// the redo tail, which is dropped as soon as a new action is recorded.
#[derive(Debug)]
pub struct EditorHistory {
    actions: Vec<EditorAction>,
    applied: usize,
    /// `applied` at the last save; `None` once that state can no longer be
    /// reached.
    saved: Option<usize>,
}

impl Default for EditorHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHistory {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            applied: 0,
            saved: Some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Index of the last applied action, `-1` when nothing is applied.
    pub fn cursor(&self) -> isize {
        self.applied as isize - 1
    }

    pub fn actions(&self) -> &[EditorAction] {
        &self.actions
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Perform `action` and record it. A failed action is not recorded and
    /// keeps the redo tail.
    pub fn do_action(
        &mut self,
        action: EditorAction,
        level: &mut Level,
        view: &mut ViewState,
    ) -> Result<(), EditorError> {
        action.perform(level, view)?;

        if self.actions.len() > self.applied {
            tracing::debug!("Discarding {} redo steps", self.actions.len() - self.applied);
            self.actions.truncate(self.applied);
            if self.saved.is_some_and(|saved| saved > self.applied) {
                self.saved = None;
            }
        }
        tracing::trace!("do: {}", action.name());
        self.actions.push(action);
        self.applied += 1;
        Ok(())
    }

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self, level: &mut Level, view: &mut ViewState) -> Result<bool, EditorError> {
        let Some(action) = self.applied.checked_sub(1).map(|i| &self.actions[i]) else {
            return Ok(false);
        };
        action.undo(level, view)?;
        tracing::trace!("undo: {}", action.name());
        self.applied -= 1;
        Ok(true)
    }

    /// Returns `false` when there was nothing to redo.
    pub fn redo(&mut self, level: &mut Level, view: &mut ViewState) -> Result<bool, EditorError> {
        let Some(action) = self.actions.get(self.applied) else {
            return Ok(false);
        };
        action.perform(level, view)?;
        tracing::trace!("redo: {}", action.name());
        self.applied += 1;
        Ok(true)
    }

    /// Whether the level differs from what was last saved.
    pub fn is_dirty(&self) -> bool {
        self.saved != Some(self.applied)
    }

    pub fn mark_saved(&mut self) {
        self.saved = Some(self.applied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Target;
    use crate::action::tests::{Cjk, level};

    const FIRST: Target = Target { page: 0, sentence: 0 };

    fn size(level: &Level) -> f32 {
        level.pages[0].sentences[0].text_size
    }

    fn record_sizes(history: &mut EditorHistory, level: &mut Level, view: &mut ViewState, sizes: &[f32]) {
        for &s in sizes {
            let action = EditorAction::set_text_size(level, FIRST, s).unwrap();
            history.do_action(action, level, view).unwrap();
        }
    }

    #[test]
    fn undo_and_redo_walk_the_cursor() {
        let mut level = level();
        let mut view = ViewState::default();
        let mut history = EditorHistory::new();
        assert_eq!(history.cursor(), -1);
        assert!(!history.undo(&mut level, &mut view).unwrap());

        record_sizes(&mut history, &mut level, &mut view, &[40.0, 44.0, 48.0]);
        assert_eq!(history.cursor(), 2);
        assert_eq!(size(&level), 48.0);

        assert!(history.undo(&mut level, &mut view).unwrap());
        assert!(history.undo(&mut level, &mut view).unwrap());
        assert_eq!(size(&level), 40.0);
        assert_eq!(history.cursor(), 0);

        assert!(history.redo(&mut level, &mut view).unwrap());
        assert_eq!(size(&level), 44.0);
        assert!(history.redo(&mut level, &mut view).unwrap());
        assert!(!history.redo(&mut level, &mut view).unwrap());
        assert_eq!(size(&level), 48.0);
    }

    #[test]
    fn new_action_discards_redo_tail() {
        let mut level = level();
        let mut view = ViewState::default();
        let mut history = EditorHistory::new();
        record_sizes(&mut history, &mut level, &mut view, &[40.0, 44.0, 48.0, 52.0]);

        history.undo(&mut level, &mut view).unwrap();
        history.undo(&mut level, &mut view).unwrap();
        let m = history.cursor();
        record_sizes(&mut history, &mut level, &mut view, &[60.0]);

        assert_eq!(history.len() as isize, m + 2);
        assert_eq!(history.cursor(), m + 1);
        assert!(!history.can_redo());
        assert_eq!(size(&level), 60.0);
    }

    #[test]
    fn full_undo_restores_opened_level() {
        let original = level();
        let mut level = original.clone();
        let mut view = ViewState::default();
        let mut history = EditorHistory::new();

        let steps = [
            EditorAction::set_text(&level, FIRST, "猫", &Cjk).unwrap(),
            EditorAction::toggle_color(&level, FIRST).unwrap(),
            EditorAction::delete_page(&level, 1).unwrap(),
        ];
        for step in steps {
            history.do_action(step, &mut level, &mut view).unwrap();
        }
        let create = EditorAction::create_sentence(&level, 0, Default::default()).unwrap();
        history.do_action(create, &mut level, &mut view).unwrap();

        while history.undo(&mut level, &mut view).unwrap() {}
        assert_eq!(level, original);
    }

    #[test]
    fn undo_all_then_redo_all_reaches_same_state() {
        let original = level();
        let mut level = original.clone();
        let mut view = ViewState::default();
        let mut history = EditorHistory::new();

        let build: [fn(&Level) -> EditorAction; 5] = [
            |l| EditorAction::set_text(l, Target::new(0, 1), "子猫", &Cjk).unwrap(),
            |l| EditorAction::set_furigana(l, Target::new(0, 1), 1, "ねこ").unwrap(),
            |l| EditorAction::change_order(l, 0, 0, 1).unwrap(),
            |l| EditorAction::paste_sentence(l, 1, l.pages[0].sentences[0].clone()).unwrap(),
            |l| EditorAction::set_alignment_h(l, Target::new(1, 0), 2).unwrap(),
        ];
        for make in build {
            let action = make(&level);
            history.do_action(action, &mut level, &mut view).unwrap();
        }
        let finished = level.clone();
        assert_eq!(finished.pages[0].sentences[0].furigana, ["", "ねこ"]);
        assert_eq!(finished.pages[1].sentences[0].alignment.column(), 2);

        while history.undo(&mut level, &mut view).unwrap() {}
        assert_eq!(level, original);
        while history.redo(&mut level, &mut view).unwrap() {}
        assert_eq!(level, finished);
        assert_eq!(history.cursor(), 4);
    }

    #[test]
    fn dirty_tracks_save_marker() {
        let mut level = level();
        let mut view = ViewState::default();
        let mut history = EditorHistory::new();
        assert!(!history.is_dirty());

        record_sizes(&mut history, &mut level, &mut view, &[40.0]);
        assert!(history.is_dirty());
        history.undo(&mut level, &mut view).unwrap();
        assert!(!history.is_dirty());

        history.redo(&mut level, &mut view).unwrap();
        history.mark_saved();
        assert!(!history.is_dirty());
        history.undo(&mut level, &mut view).unwrap();
        assert!(history.is_dirty());
    }

    #[test]
    fn saved_state_lost_to_branch_stays_dirty() {
        let mut level = level();
        let mut view = ViewState::default();
        let mut history = EditorHistory::new();
        record_sizes(&mut history, &mut level, &mut view, &[40.0, 44.0]);
        history.mark_saved();

        history.undo(&mut level, &mut view).unwrap();
        record_sizes(&mut history, &mut level, &mut view, &[70.0]);
        // same cursor as at save time, different content
        assert_eq!(history.cursor(), 1);
        assert!(history.is_dirty());
    }

    #[test]
    fn failed_action_is_not_recorded() {
        let mut level = level();
        let mut view = ViewState::default();
        let mut history = EditorHistory::new();
        record_sizes(&mut history, &mut level, &mut view, &[40.0, 44.0]);
        history.undo(&mut level, &mut view).unwrap();

        let stale = EditorAction::SetTextSize {
            target: Target::new(3, 0),
            old: 1.0,
            new: 2.0,
        };
        assert!(history.do_action(stale, &mut level, &mut view).is_err());
        assert_eq!(history.len(), 2);
        assert!(history.can_redo());
    }
}
