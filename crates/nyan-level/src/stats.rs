use nyan_core::KanjiSource;

use crate::model::Level;

/// Summary numbers for a level, shown in the level listing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelStats {
    pub kanji_count: usize,
    /// Non-whitespace characters across all sentences.
    pub character_count: usize,
    /// Length of the longest sentence, whitespace included, counted the way
    /// the sentence length limit counts it; a level passes that limit iff
    /// this is at most the limit.
    pub longest_sentence: usize,
    pub most_kanji_in_sentence: usize,
    pub average_kanji_difficulty: f32,
    pub difficulty: f32,
}

impl LevelStats {
    pub fn kanji_rate(&self) -> f32 {
        if self.character_count == 0 {
            0.0
        } else {
            self.kanji_count as f32 / self.character_count as f32
        }
    }
}

/// Scale the average kanji difficulty by kanji density, centred at 50%:
/// `average * (1 + (rate - 0.5) * 2)`.
pub fn level_difficulty(average_kanji_difficulty: f32, kanji_rate: f32) -> f32 {
    average_kanji_difficulty * (1.0 + (kanji_rate - 0.5) * 2.0)
}

/// Single pass over every sentence of the level.
pub fn derive_stats(level: &Level, kanji: &impl KanjiSource) -> LevelStats {
    let mut stats = LevelStats::default();
    let mut difficulty_sum: i64 = 0;

    for sentence in level.sentences() {
        let mut in_sentence = 0;
        for c in sentence.text.chars().filter(|c| !c.is_whitespace()) {
            stats.character_count += 1;
            if kanji.is_kanji(c) {
                in_sentence += 1;
                difficulty_sum += i64::from(kanji.difficulty(c));
            }
        }

        stats.kanji_count += in_sentence;
        stats.most_kanji_in_sentence = stats.most_kanji_in_sentence.max(in_sentence);
        stats.longest_sentence = stats.longest_sentence.max(sentence.char_count());
    }

    if stats.kanji_count > 0 {
        stats.average_kanji_difficulty = difficulty_sum as f32 / stats.kanji_count as f32;
        stats.difficulty = level_difficulty(stats.average_kanji_difficulty, stats.kanji_rate());
    }

    tracing::debug!(
        "{}: {} kanji / {} chars, difficulty {:.2}",
        level.file_name,
        stats.kanji_count,
        stats.character_count,
        stats.difficulty
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::Ideographs;
    use crate::model::{Page, Rect, SentenceObject};
    use crate::validate::{ParserResult, parse_level};

    fn level(texts: &[&[&str]]) -> Level {
        let mut level = Level::new("s", "a", 640, 480);
        level.pages = texts
            .iter()
            .map(|page| Page {
                sentences: page
                    .iter()
                    .map(|t| {
                        let mut s = SentenceObject::new(Rect::default());
                        s.text = t.to_string();
                        s
                    })
                    .collect(),
                ..Page::default()
            })
            .collect();
        level
    }

    #[test]
    fn half_density_keeps_average() {
        assert_eq!(level_difficulty(6.0, 0.5), 6.0);
        assert_eq!(level_difficulty(6.0, 1.0), 12.0);
        assert_eq!(level_difficulty(6.0, 1.0), 2.0 * level_difficulty(6.0, 0.5));
        assert_eq!(level_difficulty(6.0, 0.0), 0.0);
    }

    #[test]
    fn counts_across_pages() {
        // 日 U+65E5 -> 5, 本 U+672C -> 2
        let level = level(&[&["日本です", "ねこ"], &["本 本 本"]]);
        let stats = derive_stats(&level, &Ideographs);

        assert_eq!(stats.kanji_count, 5);
        assert_eq!(stats.character_count, 4 + 2 + 3);
        assert_eq!(stats.longest_sentence, 5);
        assert_eq!(stats.most_kanji_in_sentence, 3);

        let expected_avg = ('日' as i32 % 10 + 4 * ('本' as i32 % 10)) as f32 / 5.0;
        assert!((stats.average_kanji_difficulty - expected_avg).abs() < 1e-6);
        let expected = level_difficulty(expected_avg, 5.0 / 9.0);
        assert!((stats.difficulty - expected).abs() < 1e-5);
    }

    #[test]
    fn longest_sentence_matches_length_limit() {
        let level = level(&[&["本 本 本", "ねこ"]]);
        let stats = derive_stats(&level, &Ideographs);
        assert_eq!(stats.character_count, 5);
        assert_eq!(stats.longest_sentence, 5);

        // no furigana on purpose: the length check comes first
        assert_eq!(
            parse_level(&level, &Ideographs, stats.longest_sentence - 1),
            ParserResult::SentenceTooLong
        );
        assert_ne!(
            parse_level(&level, &Ideographs, stats.longest_sentence),
            ParserResult::SentenceTooLong
        );
    }

    #[test]
    fn half_kanji_level_equals_average() {
        let level = level(&[&["日の本の"]]);
        let stats = derive_stats(&level, &Ideographs);
        assert_eq!(stats.kanji_rate(), 0.5);
        assert!((stats.difficulty - stats.average_kanji_difficulty).abs() < 1e-6);
    }

    #[test]
    fn no_kanji_is_zero_difficulty() {
        let stats = derive_stats(&level(&[&["ひらがな"]]), &Ideographs);
        assert_eq!(stats.kanji_count, 0);
        assert_eq!(stats.difficulty, 0.0);
        assert_eq!(derive_stats(&level(&[]), &Ideographs), LevelStats::default());
    }
}
