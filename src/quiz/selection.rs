use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::verse_ref::VerseRef;
use crate::error::QuizError;

pub const MAIN_DISTRACTORS: usize = 3;
pub const REVIEW_DISTRACTORS: usize = 2;
/// One correct answer, its distractors and every review distractor, all distinct.
pub const MIN_POOL_SIZE: usize = 1 + MAIN_DISTRACTORS + MAIN_DISTRACTORS * REVIEW_DISTRACTORS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Anything that isn't "medium" or "hard" plays as easy.
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "hard" => Difficulty::Hard,
            "medium" => Difficulty::Medium,
            "easy" => Difficulty::Easy,
            other => {
                debug!("Unrecognized difficulty '{}', using easy", other);
                Difficulty::Easy
            }
        }
    }

    /// Distractors taken from the correct verse's own book. Those sit closer to
    /// the answer, so more of them makes the question harder.
    pub fn same_book_quota(&self) -> usize {
        match self {
            Difficulty::Hard => 2,
            Difficulty::Medium => 1,
            Difficulty::Easy => 0,
        }
    }

    pub fn other_book_quota(&self) -> usize {
        MAIN_DISTRACTORS - self.same_book_quota()
    }
}

/// References picked for one bundle, before any text is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub correct: VerseRef,
    pub distractors: Vec<VerseRef>,
    /// Per main distractor, the references used as wrong options of its review question.
    pub reviews: Vec<(VerseRef, Vec<VerseRef>)>,
}

impl Selection {
    /// Every reference the bundle uses, correct one first.
    pub fn needed(&self) -> Vec<VerseRef> {
        let mut needed = vec![self.correct.clone()];
        needed.extend(self.distractors.iter().cloned());
        for (_, picks) in &self.reviews {
            needed.extend(picks.iter().cloned());
        }
        needed
    }
}

/// Collapses repeated references, keeping first occurrences in order.
pub fn distinct(pool: &[VerseRef]) -> Vec<VerseRef> {
    let mut seen = HashSet::new();
    pool.iter()
        .filter(|r| seen.insert(*r))
        .cloned()
        .collect()
}

/// Picks the correct answer, its distractors and the review distractors from a theme pool.
///
/// All shuffles are Fisher-Yates (`SliceRandom::shuffle`), so taking from the
/// front of a shuffled list is uniform sampling without replacement.
pub fn select<R: Rng + ?Sized>(
    theme: &str,
    pool: &[VerseRef],
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Selection, QuizError> {
    let mut pool = distinct(pool);
    if pool.len() < MIN_POOL_SIZE {
        return Err(QuizError::PoolTooSmall {
            theme: theme.to_string(),
            available: pool.len(),
            required: MIN_POOL_SIZE,
        });
    }
    pool.shuffle(rng);

    let correct = pool[0].clone();

    let (mut same_book, mut other_book): (Vec<VerseRef>, Vec<VerseRef>) = pool[1..]
        .iter()
        .cloned()
        .partition(|r| r.book_id == correct.book_id);
    same_book.shuffle(rng);
    other_book.shuffle(rng);

    let distractors = pick_main_distractors(&correct, same_book, other_book, difficulty);
    debug!(
        "Theme '{}': correct {}, {:?} distractors {:?}",
        theme,
        correct,
        difficulty,
        distractors.iter().map(|r| r.to_string()).collect::<Vec<_>>()
    );

    let reviews = pick_review_distractors(theme, &pool, &correct, &distractors, rng)?;

    Ok(Selection {
        correct,
        distractors,
        reviews,
    })
}

/// Takes the difficulty's quota from the front of each (already shuffled) list,
/// then backfills empty slots from the other-book list first, the same-book list second.
///
/// Returns fewer than three distractors when the lists run dry.
pub fn pick_main_distractors(
    correct: &VerseRef,
    same_book: Vec<VerseRef>,
    other_book: Vec<VerseRef>,
    difficulty: Difficulty,
) -> Vec<VerseRef> {
    let mut chosen: Vec<VerseRef> = Vec::with_capacity(MAIN_DISTRACTORS);
    let mut same_book = same_book.into_iter();
    let mut other_book = other_book.into_iter();

    take_unique(&mut chosen, &mut same_book, difficulty.same_book_quota(), correct);
    take_unique(&mut chosen, &mut other_book, difficulty.other_book_quota(), correct);

    let missing = MAIN_DISTRACTORS - chosen.len();
    if missing > 0 {
        debug!("Backfilling {} distractor slot(s)", missing);
        take_unique(&mut chosen, &mut other_book, missing, correct);
        let missing = MAIN_DISTRACTORS - chosen.len();
        take_unique(&mut chosen, &mut same_book, missing, correct);
    }

    chosen
}

fn take_unique(
    chosen: &mut Vec<VerseRef>,
    candidates: &mut impl Iterator<Item = VerseRef>,
    count: usize,
    correct: &VerseRef,
) {
    let mut taken = 0;
    while taken < count {
        let Some(candidate) = candidates.next() else {
            return;
        };
        if &candidate == correct || chosen.contains(&candidate) {
            continue;
        }
        chosen.push(candidate);
        taken += 1;
    }
}

/// Two review distractors per main distractor. Nothing already in the bundle is
/// reused, across all review questions, so draws come from `pool \ needed`.
fn pick_review_distractors<R: Rng + ?Sized>(
    theme: &str,
    pool: &[VerseRef],
    correct: &VerseRef,
    distractors: &[VerseRef],
    rng: &mut R,
) -> Result<Vec<(VerseRef, Vec<VerseRef>)>, QuizError> {
    let needed: HashSet<&VerseRef> = std::iter::once(correct).chain(distractors).collect();
    let mut spare: Vec<VerseRef> = pool
        .iter()
        .filter(|r| !needed.contains(r))
        .cloned()
        .collect();
    spare.shuffle(rng);

    let available = spare.len();
    let mut spare = spare.into_iter();
    let mut reviews = Vec::with_capacity(distractors.len());
    for distractor in distractors {
        let picks: Vec<VerseRef> = spare.by_ref().take(REVIEW_DISTRACTORS).collect();
        if picks.len() < REVIEW_DISTRACTORS {
            return Err(QuizError::PoolTooSmall {
                theme: theme.to_string(),
                available: needed.len() + available,
                required: needed.len() + distractors.len() * REVIEW_DISTRACTORS,
            });
        }
        reviews.push((distractor.clone(), picks));
    }
    Ok(reviews)
}
