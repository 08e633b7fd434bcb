//! Romanization of Chinese text (pinyin / jyutping).
//!
//! Maps are loaded from JSON files on request; nothing is read at startup.

use std::collections::HashMap;
use std::path::Path;

pub const MANDARIN_FILE: &str = "mandarin.json";
pub const CANTONESE_FILE: &str = "cantonese.json";

#[derive(Debug, thiserror::Error)]
pub enum TransliterationError {
    #[error("Failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid mapping file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A run of characters and its reading; unmapped runs have an empty reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub reading: String,
}

#[derive(Debug, Default, Clone)]
pub struct RomanizationMap {
    readings: HashMap<char, String>,
}

impl RomanizationMap {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let readings = pairs
            .into_iter()
            .filter_map(|(key, value)| single_char(key.as_ref()).map(|c| (c, value.into())))
            .collect();
        Self { readings }
    }

    pub fn load_mandarin(path: impl AsRef<Path>) -> Result<Self, TransliterationError> {
        let contents = std::fs::read_to_string(path)?;
        let raw: HashMap<String, String> = serde_json::from_str(&contents)?;
        Ok(Self::from_pairs(raw))
    }

    /// Jyutping lists keep only their first reading.
    pub fn load_cantonese(path: impl AsRef<Path>) -> Result<Self, TransliterationError> {
        let contents = std::fs::read_to_string(path)?;
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(&contents)?;
        Ok(Self::from_pairs(raw.into_iter().filter_map(|(key, values)| {
            values.into_iter().next().map(|first| (key, first))
        })))
    }

    /// The map for a settings language code, read from `dir`.
    pub fn for_language(
        code: &str,
        dir: impl AsRef<Path>,
    ) -> Result<Option<Self>, TransliterationError> {
        let dir = dir.as_ref();
        match code {
            "zh_CN" => Self::load_mandarin(dir.join(MANDARIN_FILE)).map(Some),
            "zh_HK" => Self::load_cantonese(dir.join(CANTONESE_FILE)).map(Some),
            _ => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn reading(&self, c: char) -> Option<&str> {
        self.readings.get(&c).map(String::as_str)
    }

    /// Replace every mapped character by its reading.
    pub fn transliterate(&self, text: &str) -> String {
        text.chars()
            .map(|c| match self.reading(c) {
                Some(reading) => reading.to_string(),
                None => c.to_string(),
            })
            .collect()
    }

    /// Split `text` into mapped characters and runs of unmapped ones.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut buffer = String::new();
        for c in text.chars() {
            match self.reading(c) {
                Some(reading) => {
                    if !buffer.is_empty() {
                        segments.push(Segment {
                            text: std::mem::take(&mut buffer),
                            reading: String::new(),
                        });
                    }
                    segments.push(Segment {
                        text: c.to_string(),
                        reading: reading.to_string(),
                    });
                }
                None => buffer.push(c),
            }
        }
        if !buffer.is_empty() {
            segments.push(Segment {
                text: buffer,
                reading: String::new(),
            });
        }
        segments
    }
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
