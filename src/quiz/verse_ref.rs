use std::fmt;
use std::str::FromStr;

use crate::error::QuizError;

/// A verse number or an inclusive range of them, e.g. `5` or `3-5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseNumber {
    pub first: u32,
    pub last: Option<u32>,
}

impl VerseNumber {
    pub fn single(verse: u32) -> Self {
        Self {
            first: verse,
            last: None,
        }
    }

    /// Human form, ranges joined with an en-dash ("3–5").
    pub fn label(&self) -> String {
        match self.last {
            Some(last) => format!("{}\u{2013}{}", self.first, last),
            None => self.first.to_string(),
        }
    }
}

impl fmt::Display for VerseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            Some(last) => write!(f, "{}-{}", self.first, last),
            None => write!(f, "{}", self.first),
        }
    }
}

/// Only the plain decimal spelling is accepted ("1", not "01" or "+1"), so a
/// parsed reference always prints back to the exact corpus key it came from.
fn canonical_number(s: &str) -> Result<u32, ()> {
    let n: u32 = s.parse().map_err(|_| ())?;
    if n.to_string() != s {
        return Err(());
    }
    Ok(n)
}

impl FromStr for VerseNumber {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((first, last)) => {
                let first = canonical_number(first)?;
                let last = canonical_number(last)?;
                if last < first {
                    return Err(());
                }
                Ok(Self {
                    first,
                    last: Some(last),
                })
            }
            None => Ok(Self::single(canonical_number(s)?)),
        }
    }
}

/// Key of one verse in the corpus: `BOOK_CHAPTER_VERSE`, e.g. `GEN_1_1` or `PSA_23_1-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerseRef {
    pub book_id: String,
    pub chapter: u32,
    pub verse: VerseNumber,
}

impl VerseRef {
    pub fn new(book_id: &str, chapter: u32, verse: VerseNumber) -> Self {
        Self {
            book_id: book_id.to_string(),
            chapter,
            verse,
        }
    }

    /// The `chapter_verse` part of the reference, as keyed inside a book.
    pub fn chapter_verse_key(&self) -> String {
        format!("{}_{}", self.chapter, self.verse)
    }

    /// "Genesis 1:1", "诗篇 23:1–3"
    pub fn location_label(&self, book_name: &str) -> String {
        format!("{} {}:{}", book_name, self.chapter, self.verse.label())
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.book_id, self.chapter, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || QuizError::MalformedReference {
            reference: s.to_string(),
        };

        let mut parts = s.split('_');
        let (book_id, chapter, verse) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(book), Some(chapter), Some(verse), None) if !book.is_empty() => (book, chapter, verse),
            _ => return Err(malformed()),
        };

        let chapter = canonical_number(chapter).map_err(|_| malformed())?;
        let verse: VerseNumber = verse.parse().map_err(|_| malformed())?;

        Ok(Self::new(book_id, chapter, verse))
    }
}

impl TryFrom<String> for VerseRef {
    type Error = QuizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VerseRef> for String {
    fn from(value: VerseRef) -> Self {
        value.to_string()
    }
}
