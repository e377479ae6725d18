use nyan_core::KanjiSource;
use nyan_level::{Level, Page, Rect, SentenceObject};

use crate::error::EditorError;

/// Addresses one sentence of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Target {
    pub page: usize,
    pub sentence: usize,
}

impl Target {
    pub fn new(page: usize, sentence: usize) -> Self {
        Self { page, sentence }
    }
}

/// What the editor currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub page: usize,
    pub selected: Option<usize>,
}

impl ViewState {
    fn focus(&mut self, target: Target) {
        self.page = target.page;
        self.selected = Some(target.sentence);
    }

    fn show_page(&mut self, page: usize) {
        if self.page != page {
            self.selected = None;
        }
        self.page = page;
    }
}

/// One reversible edit.
///
/// Every variant stores the values on both sides of the change, captured when
/// the action is built, so performing or undoing it twice has the same effect
/// as doing it once.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    SetText {
        target: Target,
        old_text: String,
        new_text: String,
        old_furigana: Vec<String>,
        new_furigana: Vec<String>,
    },
    SetRect {
        target: Target,
        old: Rect,
        new: Rect,
    },
    SetTextSize {
        target: Target,
        old: f32,
        new: f32,
    },
    SetOutline {
        target: Target,
        old: f32,
        new: f32,
    },
    ToggleColor {
        target: Target,
        old: bool,
    },
    ToggleBold {
        target: Target,
        old: bool,
    },
    /// `true` is vertical text.
    SetOrientation {
        target: Target,
        old: bool,
        new: bool,
    },
    /// Alignment row: 0 top, 1 middle, 2 bottom.
    SetAlignmentV {
        target: Target,
        old: u8,
        new: u8,
    },
    /// Alignment column: 0 left, 1 centre, 2 right.
    SetAlignmentH {
        target: Target,
        old: u8,
        new: u8,
    },
    SetFurigana {
        target: Target,
        index: usize,
        old: String,
        new: String,
    },
    CreateSentence {
        target: Target,
        sentence: SentenceObject,
    },
    DeleteSentence {
        target: Target,
        sentence: SentenceObject,
    },
    PasteSentence {
        target: Target,
        sentence: SentenceObject,
    },
    /// Swaps two sentences; undoing is the same swap.
    ChangeOrder {
        page: usize,
        first: usize,
        second: usize,
    },
    DeletePage {
        index: usize,
        page: Page,
    },
}

fn sentence(level: &Level, target: Target) -> Result<&SentenceObject, EditorError> {
    level.sentence(target.page, target.sentence).ok_or(EditorError::NoSentence {
        page: target.page,
        sentence: target.sentence,
    })
}

fn sentence_mut(level: &mut Level, target: Target) -> Result<&mut SentenceObject, EditorError> {
    level.sentence_mut(target.page, target.sentence).ok_or(EditorError::NoSentence {
        page: target.page,
        sentence: target.sentence,
    })
}

fn sentences_mut(level: &mut Level, page: usize) -> Result<&mut Vec<SentenceObject>, EditorError> {
    level
        .pages
        .get_mut(page)
        .map(|p| &mut p.sentences)
        .ok_or(EditorError::NoPage(page))
}

fn pick<T>(forward: bool, old: T, new: T) -> T {
    if forward { new } else { old }
}

fn insert_sentence(
    level: &mut Level,
    view: &mut ViewState,
    target: Target,
    sentence: &SentenceObject,
) -> Result<(), EditorError> {
    let sentences = sentences_mut(level, target.page)?;
    if target.sentence > sentences.len() {
        return Err(EditorError::InsertOutOfRange {
            page: target.page,
            index: target.sentence,
        });
    }
    sentences.insert(target.sentence, sentence.clone());
    view.focus(target);
    Ok(())
}

fn remove_sentence(level: &mut Level, view: &mut ViewState, target: Target) -> Result<(), EditorError> {
    sentence(level, target)?;
    sentences_mut(level, target.page)?.remove(target.sentence);
    view.page = target.page;
    view.selected = None;
    Ok(())
}

impl EditorAction {
    pub fn set_text(
        level: &Level,
        target: Target,
        new_text: impl Into<String>,
        kanji: &impl KanjiSource,
    ) -> Result<Self, EditorError> {
        let current = sentence(level, target)?;
        let new_text = new_text.into();
        let new_furigana = current.furigana_for_text(&new_text, kanji);
        Ok(EditorAction::SetText {
            target,
            old_text: current.text.clone(),
            new_text,
            old_furigana: current.furigana.clone(),
            new_furigana,
        })
    }

    pub fn set_rect(level: &Level, target: Target, rect: Rect) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.rect;
        Ok(EditorAction::SetRect { target, old, new: rect })
    }

    pub fn set_text_size(level: &Level, target: Target, size: f32) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.text_size;
        Ok(EditorAction::SetTextSize { target, old, new: size })
    }

    pub fn set_outline(level: &Level, target: Target, size: f32) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.outline_size;
        Ok(EditorAction::SetOutline { target, old, new: size })
    }

    pub fn toggle_color(level: &Level, target: Target) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.color;
        Ok(EditorAction::ToggleColor { target, old })
    }

    pub fn toggle_bold(level: &Level, target: Target) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.bold;
        Ok(EditorAction::ToggleBold { target, old })
    }

    pub fn set_orientation(level: &Level, target: Target, vertical: bool) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.vertical;
        Ok(EditorAction::SetOrientation {
            target,
            old,
            new: vertical,
        })
    }

    pub fn set_alignment_v(level: &Level, target: Target, row: u8) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.alignment;
        old.with_row(row).ok_or(EditorError::BadAlignment(row))?;
        Ok(EditorAction::SetAlignmentV {
            target,
            old: old.row(),
            new: row,
        })
    }

    pub fn set_alignment_h(level: &Level, target: Target, column: u8) -> Result<Self, EditorError> {
        let old = sentence(level, target)?.alignment;
        old.with_column(column).ok_or(EditorError::BadAlignment(column))?;
        Ok(EditorAction::SetAlignmentH {
            target,
            old: old.column(),
            new: column,
        })
    }

    pub fn set_furigana(
        level: &Level,
        target: Target,
        index: usize,
        reading: impl Into<String>,
    ) -> Result<Self, EditorError> {
        let furigana = &sentence(level, target)?.furigana;
        let old = furigana.get(index).ok_or(EditorError::NoFurigana {
            index,
            len: furigana.len(),
        })?;
        Ok(EditorAction::SetFurigana {
            target,
            index,
            old: old.clone(),
            new: reading.into(),
        })
    }

    /// A fresh sentence appended to `page`.
    pub fn create_sentence(level: &Level, page: usize, rect: Rect) -> Result<Self, EditorError> {
        let count = level.pages.get(page).ok_or(EditorError::NoPage(page))?.sentences.len();
        Ok(EditorAction::CreateSentence {
            target: Target::new(page, count),
            sentence: SentenceObject::new(rect),
        })
    }

    pub fn delete_sentence(level: &Level, target: Target) -> Result<Self, EditorError> {
        Ok(EditorAction::DeleteSentence {
            target,
            sentence: sentence(level, target)?.clone(),
        })
    }

    /// A copy of `sentence` appended to `page`.
    pub fn paste_sentence(level: &Level, page: usize, sentence: SentenceObject) -> Result<Self, EditorError> {
        let count = level.pages.get(page).ok_or(EditorError::NoPage(page))?.sentences.len();
        Ok(EditorAction::PasteSentence {
            target: Target::new(page, count),
            sentence,
        })
    }

    pub fn change_order(level: &Level, page: usize, first: usize, second: usize) -> Result<Self, EditorError> {
        sentence(level, Target::new(page, first))?;
        sentence(level, Target::new(page, second))?;
        Ok(EditorAction::ChangeOrder { page, first, second })
    }

    pub fn delete_page(level: &Level, index: usize) -> Result<Self, EditorError> {
        let page = level.pages.get(index).ok_or(EditorError::NoPage(index))?;
        if level.pages.len() == 1 {
            return Err(EditorError::LastPage);
        }
        Ok(EditorAction::DeletePage {
            index,
            page: page.clone(),
        })
    }

    /// Short label for history listings.
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::SetText { .. } => "Edit text",
            EditorAction::SetRect { .. } => "Move sentence",
            EditorAction::SetTextSize { .. } => "Text size",
            EditorAction::SetOutline { .. } => "Outline size",
            EditorAction::ToggleColor { .. } => "Toggle color",
            EditorAction::ToggleBold { .. } => "Toggle bold",
            EditorAction::SetOrientation { .. } => "Orientation",
            EditorAction::SetAlignmentV { .. } => "Vertical alignment",
            EditorAction::SetAlignmentH { .. } => "Horizontal alignment",
            EditorAction::SetFurigana { .. } => "Edit furigana",
            EditorAction::CreateSentence { .. } => "New sentence",
            EditorAction::DeleteSentence { .. } => "Delete sentence",
            EditorAction::PasteSentence { .. } => "Paste sentence",
            EditorAction::ChangeOrder { .. } => "Change order",
            EditorAction::DeletePage { .. } => "Delete page",
        }
    }

    pub fn perform(&self, level: &mut Level, view: &mut ViewState) -> Result<(), EditorError> {
        self.apply(level, view, true)
    }

    pub fn undo(&self, level: &mut Level, view: &mut ViewState) -> Result<(), EditorError> {
        self.apply(level, view, false)
    }

    /// Checks the target before touching anything, so a failed call leaves
    /// the level unchanged.
    fn apply(&self, level: &mut Level, view: &mut ViewState, forward: bool) -> Result<(), EditorError> {
        match self {
            EditorAction::SetText {
                target,
                old_text,
                new_text,
                old_furigana,
                new_furigana,
            } => {
                let s = sentence_mut(level, *target)?;
                s.text = pick(forward, old_text, new_text).clone();
                s.furigana = pick(forward, old_furigana, new_furigana).clone();
                view.focus(*target);
            }
            EditorAction::SetRect { target, old, new } => {
                sentence_mut(level, *target)?.rect = pick(forward, *old, *new);
                view.focus(*target);
            }
            EditorAction::SetTextSize { target, old, new } => {
                sentence_mut(level, *target)?.text_size = pick(forward, *old, *new);
                view.focus(*target);
            }
            EditorAction::SetOutline { target, old, new } => {
                sentence_mut(level, *target)?.outline_size = pick(forward, *old, *new);
                view.focus(*target);
            }
            EditorAction::ToggleColor { target, old } => {
                sentence_mut(level, *target)?.color = pick(forward, *old, !*old);
                view.focus(*target);
            }
            EditorAction::ToggleBold { target, old } => {
                sentence_mut(level, *target)?.bold = pick(forward, *old, !*old);
                view.focus(*target);
            }
            EditorAction::SetOrientation { target, old, new } => {
                sentence_mut(level, *target)?.vertical = pick(forward, *old, *new);
                view.focus(*target);
            }
            EditorAction::SetAlignmentV { target, old, new } => {
                let s = sentence_mut(level, *target)?;
                let row = pick(forward, *old, *new);
                s.alignment = s.alignment.with_row(row).ok_or(EditorError::BadAlignment(row))?;
                view.focus(*target);
            }
            EditorAction::SetAlignmentH { target, old, new } => {
                let s = sentence_mut(level, *target)?;
                let column = pick(forward, *old, *new);
                s.alignment = s
                    .alignment
                    .with_column(column)
                    .ok_or(EditorError::BadAlignment(column))?;
                view.focus(*target);
            }
            EditorAction::SetFurigana {
                target,
                index,
                old,
                new,
            } => {
                let furigana = &mut sentence_mut(level, *target)?.furigana;
                let len = furigana.len();
                let slot = furigana
                    .get_mut(*index)
                    .ok_or(EditorError::NoFurigana { index: *index, len })?;
                *slot = pick(forward, old, new).clone();
                view.focus(*target);
            }
            EditorAction::CreateSentence { target, sentence }
            | EditorAction::PasteSentence { target, sentence } => {
                if forward {
                    insert_sentence(level, view, *target, sentence)?;
                } else {
                    remove_sentence(level, view, *target)?;
                }
            }
            EditorAction::DeleteSentence { target, sentence } => {
                if forward {
                    remove_sentence(level, view, *target)?;
                } else {
                    insert_sentence(level, view, *target, sentence)?;
                }
            }
            EditorAction::ChangeOrder { page, first, second } => {
                let sentences = sentences_mut(level, *page)?;
                for &index in [first, second] {
                    if index >= sentences.len() {
                        return Err(EditorError::NoSentence {
                            page: *page,
                            sentence: index,
                        });
                    }
                }
                sentences.swap(*first, *second);
                view.show_page(*page);
                // the selection follows the sentence it was on
                if view.selected == Some(*first) {
                    view.selected = Some(*second);
                } else if view.selected == Some(*second) {
                    view.selected = Some(*first);
                }
            }
            EditorAction::DeletePage { index, page } => {
                if forward {
                    if *index >= level.pages.len() {
                        return Err(EditorError::NoPage(*index));
                    }
                    if level.pages.len() == 1 {
                        return Err(EditorError::LastPage);
                    }
                    level.pages.remove(*index);
                    if view.page > *index {
                        view.page -= 1;
                    }
                    view.page = view.page.min(level.pages.len() - 1);
                    view.selected = None;
                } else {
                    if *index > level.pages.len() {
                        return Err(EditorError::NoPage(*index));
                    }
                    level.pages.insert(*index, page.clone());
                    view.page = *index;
                    view.selected = None;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// CJK ideographs count as kanji.
    pub(crate) struct Cjk;

    impl KanjiSource for Cjk {
        fn is_kanji(&self, c: char) -> bool {
            ('\u{4E00}'..='\u{9FFF}').contains(&c)
        }

        fn difficulty(&self, _: char) -> i32 {
            1
        }
    }

    pub(crate) fn level() -> Level {
        let mut level = Level::new("編集", "nyan", 1280, 720);
        let mut first = SentenceObject::new(Rect::new(10.0, 10.0, 300.0, 60.0));
        first.text = "日本語です".into();
        first.furigana = vec!["に".into(), "ほん".into(), "ご".into()];
        let mut second = SentenceObject::new(Rect::new(10.0, 100.0, 300.0, 60.0));
        second.text = "ねこ".into();
        level.pages[0].sentences = vec![first, second];
        level.pages.push(Page {
            background: Some(vec![9, 9]),
            ..Page::default()
        });
        level
    }

    const FIRST: Target = Target { page: 0, sentence: 0 };

    fn value_actions(level: &Level) -> Vec<EditorAction> {
        vec![
            EditorAction::set_text(level, FIRST, "本日語", &Cjk).unwrap(),
            EditorAction::set_rect(level, FIRST, Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap(),
            EditorAction::set_text_size(level, FIRST, 48.0).unwrap(),
            EditorAction::set_outline(level, FIRST, 0.5).unwrap(),
            EditorAction::toggle_color(level, FIRST).unwrap(),
            EditorAction::toggle_bold(level, FIRST).unwrap(),
            EditorAction::set_orientation(level, FIRST, true).unwrap(),
            EditorAction::set_alignment_v(level, FIRST, 2).unwrap(),
            EditorAction::set_alignment_h(level, FIRST, 1).unwrap(),
            EditorAction::set_furigana(level, FIRST, 1, "もと").unwrap(),
            EditorAction::change_order(level, 0, 0, 1).unwrap(),
        ]
    }

    fn structural_actions(level: &Level) -> Vec<EditorAction> {
        vec![
            EditorAction::create_sentence(level, 1, Rect::default()).unwrap(),
            EditorAction::delete_sentence(level, Target::new(0, 1)).unwrap(),
            EditorAction::paste_sentence(level, 0, level.pages[0].sentences[0].clone()).unwrap(),
            EditorAction::delete_page(level, 0).unwrap(),
        ]
    }

    #[test]
    fn undo_restores_level() {
        let original = level();
        for action in value_actions(&original).into_iter().chain(structural_actions(&original)) {
            let mut level = original.clone();
            let mut view = ViewState::default();
            action.perform(&mut level, &mut view).unwrap();
            assert_ne!(level, original, "{} changed nothing", action.name());
            action.undo(&mut level, &mut view).unwrap();
            assert_eq!(level, original, "{} did not undo", action.name());
        }
    }

    #[test]
    fn replaying_stored_values_is_idempotent() {
        let original = level();
        for action in value_actions(&original) {
            if matches!(action, EditorAction::ChangeOrder { .. }) {
                continue;
            }
            let mut once = original.clone();
            let mut twice = original.clone();
            let mut view = ViewState::default();
            action.perform(&mut once, &mut view).unwrap();
            action.perform(&mut twice, &mut view).unwrap();
            action.perform(&mut twice, &mut view).unwrap();
            assert_eq!(once, twice, "{}", action.name());
        }
    }

    #[test]
    fn change_order_is_self_inverse() {
        let original = level();
        let action = EditorAction::change_order(&original, 0, 0, 1).unwrap();
        let mut level = original.clone();
        let mut view = ViewState {
            page: 0,
            selected: Some(0),
        };
        action.perform(&mut level, &mut view).unwrap();
        assert_eq!(level.pages[0].sentences[1].text, "日本語です");
        assert_eq!(view.selected, Some(1));
        action.perform(&mut level, &mut view).unwrap();
        assert_eq!(level, original);
        assert_eq!(view.selected, Some(0));
    }

    #[test]
    fn set_text_copies_furigana_by_position() {
        let level = level();
        match EditorAction::set_text(&level, FIRST, "語本日だ", &Cjk).unwrap() {
            EditorAction::SetText { new_furigana, .. } => assert_eq!(new_furigana, ["に", "ほん", "ご"]),
            other => panic!("unexpected {other:?}"),
        }
        match EditorAction::set_text(&level, FIRST, "日本", &Cjk).unwrap() {
            EditorAction::SetText { new_furigana, .. } => assert_eq!(new_furigana, ["", ""]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn view_follows_structural_edits() {
        let mut level = level();
        let mut view = ViewState::default();

        let create = EditorAction::create_sentence(&level, 0, Rect::default()).unwrap();
        create.perform(&mut level, &mut view).unwrap();
        assert_eq!(view, ViewState { page: 0, selected: Some(2) });

        let delete = EditorAction::delete_sentence(&level, Target::new(0, 2)).unwrap();
        delete.perform(&mut level, &mut view).unwrap();
        assert_eq!(view.selected, None);

        view.page = 1;
        let delete_page = EditorAction::delete_page(&level, 1).unwrap();
        delete_page.perform(&mut level, &mut view).unwrap();
        assert_eq!(view.page, 0);
        delete_page.undo(&mut level, &mut view).unwrap();
        assert_eq!(view.page, 1);
    }

    #[test]
    fn invalid_targets_are_rejected() {
        let level = level();
        assert_eq!(
            EditorAction::toggle_bold(&level, Target::new(0, 5)),
            Err(EditorError::NoSentence { page: 0, sentence: 5 })
        );
        assert_eq!(
            EditorAction::set_alignment_v(&level, FIRST, 3),
            Err(EditorError::BadAlignment(3))
        );
        assert_eq!(
            EditorAction::set_furigana(&level, FIRST, 3, "x"),
            Err(EditorError::NoFurigana { index: 3, len: 3 })
        );
        assert_eq!(EditorAction::create_sentence(&level, 7, Rect::default()), Err(EditorError::NoPage(7)));

        let mut single = Level::new("a", "b", 1, 1);
        assert_eq!(EditorAction::delete_page(&single, 0), Err(EditorError::LastPage));

        // a stale action leaves the level alone
        let stale = EditorAction::toggle_bold(&level, Target::new(0, 1)).unwrap();
        let before = single.clone();
        assert!(stale.perform(&mut single, &mut ViewState::default()).is_err());
        assert_eq!(single, before);
    }
}
