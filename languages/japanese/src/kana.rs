//! Romaji ↔ kana transliteration driven by an input-method mapping table.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::Path;

use crate::unicode::{is_hiragana, is_romaji_vowel, is_small_tsu, small_y_glide};

const HIRAGANA: &str = "ぁあぃいぅうぇえぉおかがきぎくぐけげこごさざしじすずせぜそぞただちぢっつづてでとどなにぬねのはばぱひびぴふぶぷへべぺほぼぽまみむめもゃやゅゆょよらりるれろゎわゐゑをんゔゕゖ";
const KATAKANA: &str = "ァアィイゥウェエォオカガキギクグケゲコゴサザシジスズセゼソゾタダチヂッツヅテデトドナニヌネノハバパヒビピフブプヘベペホボポマミムメモャヤュユョヨラリルレロヮワヰヱヲンヴヵヶ";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KanaError {
    #[error("no kana mapping loaded")]
    EmptyTable,
}

/// One `kana=romaji` line of an input method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanaEntry {
    pub character: String,
    pub reading: String,
    pub is_hiragana: bool,
}

impl KanaEntry {
    pub fn new(character: impl Into<String>, reading: impl Into<String>) -> Self {
        let character = character.into();
        let is_hiragana = character.chars().all(is_hiragana);
        Self {
            character,
            reading: reading.into(),
            is_hiragana,
        }
    }
}

/// Active input-method mapping.
///
/// Entries are kept ordered by descending reading length so the first match
/// during forward transliteration is the longest one.
#[derive(Debug, Clone, Default)]
pub struct KanaTable {
    entries: Vec<KanaEntry>,
    by_character: HashMap<String, usize>,
}

impl KanaTable {
    /// Entries with an empty reading can never be typed and are dropped.
    pub fn new(entries: Vec<KanaEntry>) -> Self {
        let mut entries = entries;
        entries.retain(|e| {
            if e.reading.is_empty() {
                tracing::debug!("Dropping kana mapping {:?} with empty reading", e.character);
            }
            !e.reading.is_empty()
        });
        entries.sort_by_key(|e| Reverse(e.reading.chars().count()));

        let mut by_character = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_character.entry(entry.character.clone()).or_insert(idx);
        }

        Self {
            entries,
            by_character,
        }
    }

    /// Parse an input-method config: `kana=romaji` lines, `#` comments.
    pub fn load_mapping(config: &str) -> Self {
        let mut entries = Vec::new();

        for (number, line) in config.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((kana, romaji)) if !kana.trim().is_empty() && !romaji.trim().is_empty() => {
                    entries.push(KanaEntry::new(kana.trim(), romaji.trim()));
                }
                _ => tracing::warn!("Skipping malformed mapping line {}: {:?}", number + 1, line),
            }
        }

        Self::new(entries)
    }

    /// Read a `.cfg` file; a missing or unreadable file yields an empty table.
    pub fn load_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(config) => {
                let table = Self::load_mapping(&config);
                tracing::info!("Loaded {} kana mappings from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                tracing::warn!("Failed to read input method {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[KanaEntry] {
        &self.entries
    }

    /// Romaji reading of a kana, first entry wins for duplicates.
    pub fn reading_of(&self, kana: &str) -> Option<&str> {
        self.by_character
            .get(kana)
            .map(|&idx| self.entries[idx].reading.as_str())
    }

    /// Transliterate romaji left to right, longest mapping first.
    ///
    /// A doubled consonant (`kk`, `tt`, ...) emits っ and consumes only the
    /// first letter. Characters without a mapping are copied through when
    /// `keep_unmatched` is set and dropped otherwise.
    pub fn romaji_to_kana(&self, input: &str, keep_unmatched: bool) -> Result<String, KanaError> {
        if self.entries.is_empty() {
            return Err(KanaError::EmptyTable);
        }

        let mut out = String::with_capacity(input.len());
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];
            let mut chars = rest.chars();
            let Some(current) = chars.next() else { break };

            if chars.next() == Some(current) && is_geminate(current) {
                out.push('っ');
                pos += current.len_utf8();
                continue;
            }

            let matched = self
                .entries
                .iter()
                .find(|e| !e.reading.is_empty() && rest.starts_with(e.reading.as_str()));
            match matched {
                Some(entry) => {
                    out.push_str(&entry.character);
                    pos += entry.reading.len();
                }
                None => {
                    if keep_unmatched {
                        out.push(current);
                    }
                    pos += current.len_utf8();
                }
            }
        }

        Ok(out)
    }

    /// Reverse transliteration.
    ///
    /// Small ゃ/ゅ/ょ replace the trailing vowel of the syllable before them
    /// (`き`+`ゃ` → `kya`, `し`+`ゃ` → `sha`); っ doubles the next consonant.
    pub fn kana_to_romaji(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() * 2);
        let mut sokuon = false;
        let mut buf = [0u8; 4];

        for c in input.chars() {
            if is_small_tsu(c) {
                sokuon = true;
                continue;
            }

            if let Some(glide) = small_y_glide(c) {
                if out.ends_with(is_romaji_vowel) {
                    out.pop();
                    if out.ends_with("sh") || out.ends_with("ch") || out.ends_with('j') {
                        out.push_str(&glide[1..]);
                    } else {
                        out.push_str(glide);
                    }
                } else {
                    out.push_str(self.reading_of(c.encode_utf8(&mut buf)).unwrap_or(glide));
                }
                sokuon = false;
                continue;
            }

            match self.reading_of(c.encode_utf8(&mut buf)) {
                Some(reading) => {
                    if sokuon {
                        if let Some(first) = reading.chars().next().filter(|f| is_geminate(*f)) {
                            out.push(first);
                        }
                    }
                    out.push_str(reading);
                }
                None => out.push(c),
            }
            sokuon = false;
        }

        if sokuon {
            if let Some(reading) = self.reading_of("っ") {
                out.push_str(reading);
            }
        }

        out
    }
}

/// Letters whose doubling marks a geminate consonant.
fn is_geminate(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_romaji_vowel(c.to_ascii_lowercase()) && !matches!(c, 'y' | 'n')
}

/// Swap hiragana and katakana; anything else passes through.
pub fn kana_to_kana(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if let Some(idx) = HIRAGANA.chars().position(|h| h == c) {
                KATAKANA.chars().nth(idx).unwrap_or(c)
            } else if let Some(idx) = KATAKANA.chars().position(|k| k == c) {
                HIRAGANA.chars().nth(idx).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}
