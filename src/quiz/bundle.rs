use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::selection::{self, distinct, Difficulty, REVIEW_DISTRACTORS};
use super::verse_ref::VerseRef;
use super::{Answer, MainOption, MainQuestion, QuestionBundle, ReviewQuestion};
use crate::corpus::{display_name, Corpus, Verse};
use crate::error::QuizError;

/// How verse locations are written in option and prompt labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    /// "创世记 1:1"
    #[default]
    Display,
    /// "GEN 1:1", leaving book names to the client
    Raw,
}

impl LabelStyle {
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" => LabelStyle::Raw,
            _ => LabelStyle::Display,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Pool used when the requested theme doesn't exist.
    pub default_theme: String,
    pub labels: LabelStyle,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            default_theme: "default".to_string(),
            labels: LabelStyle::Display,
        }
    }
}

pub struct BundleBuilder<C> {
    corpus: C,
    options: BuilderOptions,
}

impl<C: Corpus> BundleBuilder<C> {
    pub fn new(corpus: C, options: BuilderOptions) -> Self {
        Self { corpus, options }
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    pub async fn build_bundle(
        &self,
        theme: &str,
        lang: &str,
        difficulty: Difficulty,
    ) -> Result<QuestionBundle, QuizError> {
        let mut rng = StdRng::from_entropy();
        self.build_bundle_with_rng(theme, lang, difficulty, &mut rng)
            .await
    }

    /// Pool and book names are fetched together, then distractors are chosen,
    /// then the verse texts for exactly those references are fetched in one batch.
    pub async fn build_bundle_with_rng<R: Rng + Send>(
        &self,
        theme: &str,
        lang: &str,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<QuestionBundle, QuizError> {
        let (pool, book_names) = tokio::join!(self.resolve_pool(theme), self.corpus.book_names(lang));
        let (theme, pool) = pool?;
        let book_names = book_names?;
        debug!("Theme '{}' resolved to {} references", theme, pool.len());

        let selection = selection::select(&theme, &pool, difficulty, rng)?;
        let needed = selection.needed();
        let verses = self.corpus.verse_batch(&needed, lang).await?;
        for reference in &needed {
            verse(&verses, reference, lang)?;
        }

        let mut options = std::iter::once(&selection.correct)
            .chain(&selection.distractors)
            .map(|r| -> Result<MainOption, QuizError> {
                let verse = verse(&verses, r, lang)?;
                Ok(MainOption {
                    option_id: verse.reference.clone(),
                    display_text: self.label(&verse.reference, lang, &book_names),
                })
            })
            .collect::<Result<Vec<_>, QuizError>>()?;
        options.shuffle(rng);

        let mut review_questions = BTreeMap::new();
        for (distractor, picks) in &selection.reviews {
            let label = self.label(distractor, lang, &book_names);
            let review = review_question(distractor, picks, label, lang, &verses, rng)?;
            review_questions.insert(distractor.clone(), review);
        }

        Ok(QuestionBundle {
            main_question: MainQuestion {
                prompt_text: verse(&verses, &selection.correct, lang)?.text.clone(),
                options,
                correct_option_id: selection.correct,
            },
            review_questions,
        })
    }

    pub async fn build_review_question(
        &self,
        reference: &VerseRef,
        theme: &str,
        lang: &str,
    ) -> Result<ReviewQuestion, QuizError> {
        let mut rng = StdRng::from_entropy();
        self.build_review_question_with_rng(reference, theme, lang, &mut rng)
            .await
    }

    /// A single review question for `reference`, with wrong options drawn from the theme pool.
    pub async fn build_review_question_with_rng<R: Rng + Send>(
        &self,
        reference: &VerseRef,
        theme: &str,
        lang: &str,
        rng: &mut R,
    ) -> Result<ReviewQuestion, QuizError> {
        let (pool, label) = tokio::join!(self.resolve_pool(theme), self.review_label(reference, lang));
        let (theme, pool) = pool?;
        let label = label?;

        let mut spare: Vec<VerseRef> = distinct(&pool)
            .into_iter()
            .filter(|r| r != reference)
            .collect();
        if spare.len() < REVIEW_DISTRACTORS {
            return Err(QuizError::PoolTooSmall {
                theme,
                available: spare.len() + 1,
                required: REVIEW_DISTRACTORS + 1,
            });
        }
        spare.shuffle(rng);
        spare.truncate(REVIEW_DISTRACTORS);

        let mut needed = vec![reference.clone()];
        needed.extend(spare.iter().cloned());
        let verses = self.corpus.verse_batch(&needed, lang).await?;

        review_question(reference, &spare, label, lang, &verses, rng)
    }

    async fn resolve_pool(&self, theme: &str) -> Result<(String, Vec<VerseRef>), QuizError> {
        match self.corpus.theme_pool(theme).await {
            Ok(pool) => Ok((theme.to_string(), pool)),
            Err(QuizError::ThemeNotFound { .. }) if theme != self.options.default_theme => {
                warn!(
                    "Theme '{}' not found, falling back to '{}'",
                    theme, self.options.default_theme
                );
                let pool = self.corpus.theme_pool(&self.options.default_theme).await?;
                Ok((self.options.default_theme.clone(), pool))
            }
            Err(err) => Err(err),
        }
    }

    /// Label for a lone review question, looking up just the one book name.
    async fn review_label(&self, reference: &VerseRef, lang: &str) -> Result<String, QuizError> {
        match self.options.labels {
            LabelStyle::Display => {
                let name = self.corpus.book_display_name(lang, &reference.book_id).await?;
                Ok(reference.location_label(&name))
            }
            LabelStyle::Raw => Ok(reference.location_label(&reference.book_id)),
        }
    }

    fn label(&self, reference: &VerseRef, lang: &str, book_names: &HashMap<String, String>) -> String {
        match self.options.labels {
            LabelStyle::Display => {
                reference.location_label(&display_name(book_names, lang, &reference.book_id))
            }
            LabelStyle::Raw => reference.location_label(&reference.book_id),
        }
    }
}

fn review_question<R: Rng + ?Sized>(
    reviewed: &VerseRef,
    wrong: &[VerseRef],
    label: String,
    lang: &str,
    verses: &HashMap<VerseRef, Verse>,
    rng: &mut R,
) -> Result<ReviewQuestion, QuizError> {
    let mut answers = vec![Answer::new(verse(verses, reviewed, lang)?.text.clone(), true)];
    for r in wrong {
        answers.push(Answer::new(verse(verses, r, lang)?.text.clone(), false));
    }
    answers.shuffle(rng);

    Ok(ReviewQuestion::new(label, answers))
}

fn verse<'a>(
    verses: &'a HashMap<VerseRef, Verse>,
    reference: &VerseRef,
    lang: &str,
) -> Result<&'a Verse, QuizError> {
    verses.get(reference).ok_or_else(|| QuizError::VerseNotFound {
        reference: reference.to_string(),
        lang: lang.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusData, MemoryCorpus};
    use crate::quiz::selection::MAIN_DISTRACTORS;
    use std::collections::HashSet;

    const POOL: [&str; 12] = [
        "GEN_1_1", "GEN_1_2", "GEN_1_3", "GEN_2_7", "EXO_3_14", "EXO_20_3", "PSA_23_1-3",
        "JHN_3_16", "JHN_11_35", "ROM_8_28", "PHP_4_13", "PRO_3_5",
    ];

    fn refs(raw: &[&str]) -> Vec<VerseRef> {
        raw.iter().map(|r| r.parse().unwrap()).collect()
    }

    fn text_for(r: &VerseRef, lang: &str) -> String {
        format!("[{}] text of {}", lang, r)
    }

    fn corpus_with(pool: &[&str], langs: &[&str]) -> CorpusData {
        let pool = refs(pool);
        let mut data = CorpusData::default();
        data.insert_pack("default", &pool);
        for r in &pool {
            for lang in langs {
                data.insert_verse(r, lang, &text_for(r, lang));
            }
        }
        for (id, en, zh) in [
            ("GEN", "Genesis", "创世记"),
            ("EXO", "Exodus", "出埃及记"),
            ("PSA", "Psalms", "诗篇"),
            ("JHN", "John", "约翰福音"),
            ("ROM", "Romans", "罗马书"),
            ("PHP", "Philippians", "腓立比书"),
            ("PRO", "Proverbs", "箴言"),
        ] {
            data.insert_book_name("en", id, en);
            data.insert_book_name("zh", id, zh);
        }
        data
    }

    fn builder(data: CorpusData) -> BundleBuilder<MemoryCorpus> {
        BundleBuilder::new(MemoryCorpus::new(data), BuilderOptions::default())
    }

    fn check_bundle(bundle: &QuestionBundle, lang: &str) {
        let main = &bundle.main_question;
        assert_eq!(main.options.len(), 1 + MAIN_DISTRACTORS);
        assert_eq!(
            main.options
                .iter()
                .filter(|o| o.option_id == main.correct_option_id)
                .count(),
            1
        );
        assert_eq!(main.prompt_text, text_for(&main.correct_option_id, lang));

        // texts are unique per reference, so repeated text means a repeated reference
        let mut used: HashSet<String> = main
            .options
            .iter()
            .map(|o| text_for(&o.option_id, lang))
            .collect();
        assert_eq!(used.len(), main.options.len());

        assert_eq!(bundle.review_questions.len(), MAIN_DISTRACTORS);
        for option in main.options.iter().filter(|o| o.option_id != main.correct_option_id) {
            let review = &bundle.review_questions[&option.option_id];
            assert_eq!(review.options.len(), 1 + REVIEW_DISTRACTORS);
            assert_eq!(review.options.iter().filter(|a| a.is_correct).count(), 1);
            assert_eq!(
                review.correct_answer().unwrap().text,
                text_for(&option.option_id, lang)
            );
            assert_eq!(review.question_text, option.display_text);
            for answer in review.options.iter().filter(|a| !a.is_correct) {
                assert!(used.insert(answer.text.clone()), "reused {}", answer.text);
            }
        }
    }

    #[tokio::test]
    async fn builds_complete_bundles() {
        let builder = builder(corpus_with(&POOL, &["en", "zh"]));
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let bundle = builder
                    .build_bundle_with_rng("default", "zh", difficulty, &mut rng)
                    .await
                    .unwrap();
                check_bundle(&bundle, "zh");
            }
        }
    }

    #[tokio::test]
    async fn labels_use_book_names_and_en_dash() {
        let builder = builder(corpus_with(&POOL, &["en"]));
        let psalm: VerseRef = "PSA_23_1-3".parse().unwrap();
        let other = refs(&["GEN_1_1", "JHN_3_16"]);
        let mut rng = StdRng::seed_from_u64(1);

        let review = builder
            .build_review_question_with_rng(&psalm, "default", "en", &mut rng)
            .await
            .unwrap();
        assert_eq!(review.question_text, "Psalms 23:1\u{2013}3");

        let mut data = corpus_with(&POOL, &["en"]);
        data.insert_pack("default", &[psalm.clone(), other[0].clone(), other[1].clone()]);
        let raw = BundleBuilder::new(
            MemoryCorpus::new(data),
            BuilderOptions {
                labels: LabelStyle::Raw,
                ..BuilderOptions::default()
            },
        );
        let review = raw
            .build_review_question_with_rng(&psalm, "default", "en", &mut rng)
            .await
            .unwrap();
        assert_eq!(review.question_text, "PSA 23:1\u{2013}3");
    }

    #[tokio::test]
    async fn unknown_theme_falls_back_to_default() {
        let builder = builder(corpus_with(&POOL, &["en"]));
        let bundle = builder
            .build_bundle_with_rng("no-such-theme", "en", Difficulty::Hard, &mut StdRng::seed_from_u64(9))
            .await
            .unwrap();
        check_bundle(&bundle, "en");
    }

    #[tokio::test]
    async fn missing_default_theme_is_reported() {
        let mut data = corpus_with(&POOL, &["en"]);
        data.packs.clear();
        let err = builder(data)
            .build_bundle("love", "en", Difficulty::Easy)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::ThemeNotFound { ref theme } if theme == "default"));
    }

    #[tokio::test]
    async fn small_pool_fails_without_a_bundle() {
        let builder = builder(corpus_with(&POOL[..9], &["en"]));
        let err = builder
            .build_bundle("default", "en", Difficulty::Medium)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::PoolTooSmall { .. }));
        assert_eq!(err.status(), 422);
    }

    #[tokio::test]
    async fn missing_language_is_verse_not_found() {
        let builder = builder(corpus_with(&POOL, &["en"]));
        let err = builder
            .build_bundle("default", "fr", Difficulty::Easy)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::VerseNotFound { ref lang, .. } if lang == "fr"));
    }

    #[tokio::test]
    async fn one_missing_verse_fails_the_bundle() {
        let mut data = corpus_with(&POOL[..10], &["en"]);
        // every bundle from a ten-verse pool uses all ten
        data.verses.remove("ROM");
        let err = builder(data)
            .build_bundle("default", "en", Difficulty::Hard)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::VerseNotFound { ref reference, .. } if reference == "ROM_8_28"));
    }

    #[tokio::test]
    async fn correct_answer_position_is_uniform() {
        let builder = builder(corpus_with(&POOL[..10], &["en"]));
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 4000;
        let mut positions = [0usize; 4];
        for _ in 0..trials {
            let bundle = builder
                .build_bundle_with_rng("default", "en", Difficulty::Medium, &mut rng)
                .await
                .unwrap();
            positions[bundle.main_question.correct_position().unwrap()] += 1;
        }
        // expected 1000 each, standard deviation about 27
        for count in positions {
            assert!((850..=1150).contains(&count), "{:?}", positions);
        }
    }

    #[tokio::test]
    async fn hard_bundle_backfills_when_book_has_one_other_verse() {
        let pool = [
            "GEN_1_1", "GEN_1_2", "EXO_1_1", "EXO_1_2", "LEV_1_1", "LEV_1_2", "NUM_1_1",
            "NUM_1_2", "DEU_1_1", "DEU_1_2",
        ];
        let builder = builder(corpus_with(&pool, &["en"]));
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let bundle = builder
                .build_bundle_with_rng("default", "en", Difficulty::Hard, &mut rng)
                .await
                .unwrap();
            check_bundle(&bundle, "en");

            let main = &bundle.main_question;
            let book = &main.correct_option_id.book_id;
            let distractors: Vec<&VerseRef> = main
                .options
                .iter()
                .map(|o| &o.option_id)
                .filter(|r| *r != &main.correct_option_id)
                .collect();
            assert_eq!(distractors.len(), 3);
            assert_eq!(distractors.iter().filter(|r| &r.book_id == book).count(), 1);
            assert_eq!(distractors.iter().filter(|r| &r.book_id != book).count(), 2);
        }
    }

    #[tokio::test]
    async fn review_label_falls_back_to_book_id() {
        let mut data = corpus_with(&POOL, &["en"]);
        data.book_names.clear();
        let target: VerseRef = "ROM_8_28".parse().unwrap();
        let review = builder(data)
            .build_review_question_with_rng(&target, "default", "en", &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        assert_eq!(review.question_text, "ROM 8:28");
    }

    #[tokio::test]
    async fn standalone_review_question() {
        let builder = builder(corpus_with(&POOL, &["en"]));
        let target: VerseRef = "JHN_11_35".parse().unwrap();
        let review = builder
            .build_review_question(&target, "default", "en")
            .await
            .unwrap();
        assert_eq!(review.options.len(), 3);
        assert_eq!(review.correct_answer().unwrap().text, text_for(&target, "en"));
        assert_eq!(review.question_text, "John 11:35");
        let texts: HashSet<&str> = review.options.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts.len(), 3);
    }

    #[tokio::test]
    async fn standalone_review_needs_two_other_verses() {
        let mut data = corpus_with(&POOL, &["en"]);
        let only = refs(&["GEN_1_1", "GEN_1_2"]);
        data.insert_pack("default", &only);
        let err = builder(data)
            .build_review_question(&only[0], "default", "en")
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::PoolTooSmall { available: 2, required: 3, .. }));
    }
}
