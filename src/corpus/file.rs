use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};
use serde::de::DeserializeOwned;

use super::cache::SnapshotCache;
use super::{Corpus, CorpusData, Verse};
use crate::error::QuizError;
use crate::quiz::verse_ref::VerseRef;

pub const GAME_PACKS_FILE: &str = "game-packs.json";
pub const BOOK_NAMES_FILE: &str = "book_names.json";
pub const VERSES_FILE: &str = "verses_content.json";

/// Corpus backed by the JSON files of a data directory, read on first use.
#[derive(Debug, Clone)]
pub struct FileCorpus {
    dir: PathBuf,
    cache: Arc<SnapshotCache<CorpusData>>,
}

impl FileCorpus {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_cache(dir, Arc::new(SnapshotCache::new()))
    }

    /// Several corpora over the same directory can share one snapshot.
    pub fn with_cache(dir: impl AsRef<Path>, cache: Arc<SnapshotCache<CorpusData>>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            cache,
        }
    }

    async fn data(&self) -> Result<Arc<CorpusData>, QuizError> {
        self.cache.get_or_load(load_dir(&self.dir)).await
    }
}

async fn load_dir(dir: &Path) -> Result<CorpusData, QuizError> {
    info!("Loading corpus from {}", dir.display());
    let (packs, book_names, verses) = tokio::try_join!(
        read_json(dir.join(GAME_PACKS_FILE)),
        read_json(dir.join(BOOK_NAMES_FILE)),
        read_json(dir.join(VERSES_FILE)),
    )?;
    let data = CorpusData {
        packs,
        book_names,
        verses,
    };
    info!(
        "Corpus loaded: {} themes, {} books, {} languages",
        data.packs.len(),
        data.verses.len(),
        data.book_names.len()
    );
    Ok(data)
}

async fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, QuizError> {
    let bytes = tokio::fs::read(&path).await.map_err(|err| {
        error!("Failed to read {}: {}", path.display(), err);
        QuizError::from(err)
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        error!("Failed to parse {}: {}", path.display(), err);
        QuizError::from(err)
    })
}

impl Corpus for FileCorpus {
    async fn theme_pool(&self, theme: &str) -> Result<Vec<VerseRef>, QuizError> {
        self.data().await?.theme_pool(theme)
    }

    async fn themes(&self) -> Result<Vec<String>, QuizError> {
        Ok(self.data().await?.themes())
    }

    async fn book_names(&self, lang: &str) -> Result<HashMap<String, String>, QuizError> {
        Ok(self.data().await?.book_names(lang))
    }

    async fn verse_batch(
        &self,
        refs: &[VerseRef],
        lang: &str,
    ) -> Result<HashMap<VerseRef, Verse>, QuizError> {
        Ok(self.data().await?.verse_batch(refs, lang))
    }
}
