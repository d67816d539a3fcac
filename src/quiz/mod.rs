pub mod bundle;
pub mod selection;
pub mod verse_ref;

use std::collections::BTreeMap;

use verse_ref::VerseRef;

/// Everything the client needs for one round: the main question and a ready
/// review question for each of its wrong options.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBundle {
    pub main_question: MainQuestion,
    pub review_questions: BTreeMap<VerseRef, ReviewQuestion>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainQuestion {
    pub prompt_text: String,
    pub options: Vec<MainOption>,
    pub correct_option_id: VerseRef,
}

#[cfg(test)]
impl MainQuestion {
    /// Index of the correct option in presentation order.
    pub fn correct_position(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.option_id == self.correct_option_id)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainOption {
    pub option_id: VerseRef,
    pub display_text: String,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuestion {
    pub question_text: String,
    pub options: Vec<Answer>,
}
impl ReviewQuestion {
    pub fn new(question_text: String, options: Vec<Answer>) -> Self {
        Self {
            question_text,
            options,
        }
    }
}

#[cfg(test)]
impl ReviewQuestion {
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.options.iter().find(|a| a.is_correct)
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
}
impl Answer {
    pub fn new(text: String, is_correct: bool) -> Self {
        Self { text, is_correct }
    }
}
