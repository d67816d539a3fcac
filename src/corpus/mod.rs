pub mod cache;
pub mod data;
pub mod file;

use std::collections::HashMap;
use std::future::Future;
#[cfg(test)]
use std::sync::Arc;

use crate::error::QuizError;
use crate::quiz::verse_ref::VerseRef;

pub use data::CorpusData;
pub use file::FileCorpus;

/// Text of one verse in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub reference: VerseRef,
    pub text: String,
}

/// Where verses, book names and theme pools come from.
pub trait Corpus: Send + Sync {
    /// Fails with [`QuizError::ThemeNotFound`] for unknown themes.
    fn theme_pool(&self, theme: &str)
        -> impl Future<Output = Result<Vec<VerseRef>, QuizError>> + Send;

    fn themes(&self) -> impl Future<Output = Result<Vec<String>, QuizError>> + Send;

    /// `bookId -> display name` for one language. Unknown languages give an empty table.
    fn book_names(
        &self,
        lang: &str,
    ) -> impl Future<Output = Result<HashMap<String, String>, QuizError>> + Send;

    /// Falls back to the book id itself when the language has no name for it.
    fn book_display_name(
        &self,
        lang: &str,
        book_id: &str,
    ) -> impl Future<Output = Result<String, QuizError>> + Send {
        async move {
            let names = self.book_names(lang).await?;
            Ok(display_name(&names, lang, book_id))
        }
    }

    /// References without text in `lang` are left out of the result.
    fn verse_batch(
        &self,
        refs: &[VerseRef],
        lang: &str,
    ) -> impl Future<Output = Result<HashMap<VerseRef, Verse>, QuizError>> + Send;
}

pub fn display_name(names: &HashMap<String, String>, lang: &str, book_id: &str) -> String {
    match names.get(book_id) {
        Some(name) => name.clone(),
        None => {
            log::warn!("No '{}' name for book {}", lang, book_id);
            book_id.to_string()
        }
    }
}

/// A corpus held entirely in memory.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    data: Arc<CorpusData>,
}

#[cfg(test)]
impl MemoryCorpus {
    pub fn new(data: CorpusData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

#[cfg(test)]
impl Corpus for MemoryCorpus {
    async fn theme_pool(&self, theme: &str) -> Result<Vec<VerseRef>, QuizError> {
        self.data.theme_pool(theme)
    }

    async fn themes(&self) -> Result<Vec<String>, QuizError> {
        Ok(self.data.themes())
    }

    async fn book_names(&self, lang: &str) -> Result<HashMap<String, String>, QuizError> {
        Ok(self.data.book_names(lang))
    }

    async fn verse_batch(
        &self,
        refs: &[VerseRef],
        lang: &str,
    ) -> Result<HashMap<VerseRef, Verse>, QuizError> {
        Ok(self.data.verse_batch(refs, lang))
    }
}
