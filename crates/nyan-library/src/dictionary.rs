use std::path::PathBuf;

use nyan_config::Config;
use nyan_core::{FormatError, Progress, Step, Stepper};
use nyan_lang_japanese::{JapaneseDictionary, KanaTable, KanjiDictionaryLoader};

/// Startup load of the kanji dictionary followed by the active input method.
pub struct DictionaryLoad {
    kanji: KanjiDictionaryLoader,
    input_method: PathBuf,
}

impl DictionaryLoad {
    pub fn from_config(config: &Config) -> Result<Self, FormatError> {
        let kanji = KanjiDictionaryLoader::open(
            &config.paths.kanji_dictionary(),
            config.loader.records_per_step,
        )?;
        Ok(Self {
            kanji,
            input_method: config.paths.input_method(&config.input.method),
        })
    }
}

impl Stepper for DictionaryLoad {
    type Output = Result<JapaneseDictionary, FormatError>;

    fn step(&mut self) -> Step<Self::Output> {
        match self.kanji.step() {
            Step::Pending(progress) => Step::Pending(progress),
            Step::Done(Err(e)) => Step::Done(Err(e)),
            Step::Done(Ok(kanji)) => {
                let kana = KanaTable::load_file(&self.input_method);
                if kana.is_empty() {
                    tracing::warn!(
                        "Input method {} has no mappings, romaji input will fail",
                        self.input_method.display()
                    );
                }
                Step::Done(Ok(JapaneseDictionary::new(kana, kanji)))
            }
        }
    }

    fn progress(&self) -> Progress {
        self.kanji.progress()
    }
}
