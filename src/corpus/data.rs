use std::collections::HashMap;

use super::Verse;
use crate::error::QuizError;
use crate::quiz::verse_ref::VerseRef;

/// Parsed contents of the corpus data files.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CorpusData {
    /// theme -> verse references, as written in `game-packs.json`
    pub packs: HashMap<String, Vec<String>>,
    /// lang -> book id -> display name
    pub book_names: HashMap<String, HashMap<String, String>>,
    /// book id -> "chapter_verse" -> lang -> text
    pub verses: HashMap<String, HashMap<String, HashMap<String, String>>>,
}

impl CorpusData {
    pub fn theme_pool(&self, theme: &str) -> Result<Vec<VerseRef>, QuizError> {
        let raw = self.packs.get(theme).ok_or_else(|| QuizError::ThemeNotFound {
            theme: theme.to_string(),
        })?;
        raw.iter().map(|r| r.parse()).collect()
    }

    pub fn themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = self.packs.keys().cloned().collect();
        themes.sort();
        themes
    }

    pub fn book_names(&self, lang: &str) -> HashMap<String, String> {
        self.book_names.get(lang).cloned().unwrap_or_default()
    }

    pub fn verse_text(&self, reference: &VerseRef, lang: &str) -> Option<&str> {
        self.verses
            .get(&reference.book_id)?
            .get(&reference.chapter_verse_key())?
            .get(lang)
            .map(|text| text.as_str())
    }

    pub fn verse_batch(&self, refs: &[VerseRef], lang: &str) -> HashMap<VerseRef, Verse> {
        refs.iter()
            .filter_map(|r| {
                let text = self.verse_text(r, lang)?;
                Some((
                    r.clone(),
                    Verse {
                        reference: r.clone(),
                        text: text.to_string(),
                    },
                ))
            })
            .collect()
    }
}

#[cfg(test)]
impl CorpusData {
    pub fn insert_verse(&mut self, reference: &VerseRef, lang: &str, text: &str) {
        self.verses
            .entry(reference.book_id.clone())
            .or_default()
            .entry(reference.chapter_verse_key())
            .or_default()
            .insert(lang.to_string(), text.to_string());
    }

    pub fn insert_book_name(&mut self, lang: &str, book_id: &str, name: &str) {
        self.book_names
            .entry(lang.to_string())
            .or_default()
            .insert(book_id.to_string(), name.to_string());
    }

    pub fn insert_pack(&mut self, theme: &str, refs: &[VerseRef]) {
        self.packs
            .insert(theme.to_string(), refs.iter().map(|r| r.to_string()).collect());
    }
}
