use std::collections::BTreeMap;

use log::{debug, warn};

use crate::config::{Label, RawValue};
use crate::patterns::{SANDWICH_QUESTION, SOUP_QUESTION};

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum QuestionKind {
    /// Answered by picking an option. The data holds the 1-based option code.
    Closed,
    /// Answered in free text, then classified.
    FreeText,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyQuestion {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    /// For closed questions, option code `n` is `options[n - 1]`. For
    /// free-text questions, the classification labels.
    pub options: Vec<String>,
}

impl SurveyQuestion {
    fn closed(id: &str, prompt: &str, options: &[&str]) -> SurveyQuestion {
        SurveyQuestion {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::Closed,
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn free_text(id: &str, prompt: &str) -> SurveyQuestion {
        SurveyQuestion {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::FreeText,
            options: Label::CLASSIFIED
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
        }
    }

    /// The column holding the answers, in the numeric or the text table.
    pub fn column(&self) -> String {
        match self.kind {
            QuestionKind::Closed => self.id.clone(),
            QuestionKind::FreeText => format!("{}_text", self.id),
        }
    }

    /// The text of a coded answer.
    ///
    /// Codes outside the options have no answer. A question without any
    /// declared option shows the code itself.
    pub fn answer_text(&self, code: &RawValue) -> Option<String> {
        if self.options.is_empty() {
            return code.to_label();
        }
        let c = code.as_code()?;
        if c < 1 {
            return None;
        }
        self.options.get((c - 1) as usize).cloned()
    }

    /// The position of an answer among the options, used to order summaries.
    pub fn option_rank(&self, answer: &str) -> Option<usize> {
        self.options.iter().position(|o| o == answer)
    }
}

/// All the questions of the survey, by id.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct QuestionRegistry {
    questions: BTreeMap<String, SurveyQuestion>,
}

impl QuestionRegistry {
    /// The questions of the sandwich and soup survey, with their options.
    pub fn standard() -> QuestionRegistry {
        let questions = vec![
            SurveyQuestion::closed(
                "Q1",
                "Is a hot dog a sandwich?",
                &["Yes", "No", "It depends", "I refuse to answer"],
            ),
            SurveyQuestion::closed(
                "Q2",
                "If the bottom of a hot dog bun rips, does it become a sandwich?",
                &["Yes", "No"],
            ),
            SurveyQuestion::closed(
                "Q3",
                "What is the minimum number of ingredients required for something to be considered a sandwich?",
                &[
                    "0 (bread is a sandwich by itself)",
                    "1 (e.g. buttered toast)",
                    "2 (e.g. PB&J)",
                    "3 or more",
                ],
            ),
            SurveyQuestion::closed(
                "Q4",
                "Is a taco more likely to be considered a sandwich in which of the following scenarios?",
                &[
                    "Hard shell",
                    "Soft shell",
                    "Only if the bottom cracks or rips",
                    "Under no conditions should a taco be considered a sandwich",
                ],
            ),
            SurveyQuestion::closed(
                "Q5",
                "What is the most important characteristic for something to be considered soup?",
                &[
                    "The broth",
                    "The consistency",
                    "The way it's served",
                    "The primary flavour profile",
                    "Something else",
                ],
            ),
            SurveyQuestion::closed(
                "Q6",
                "Is cereal with milk a type of soup?",
                &["Yes", "No", "It depends"],
            ),
            SurveyQuestion::closed(
                "Q7",
                "How likely are you to order an open-faced sandwich compared to a regular sandwich?",
                &[
                    "Much more",
                    "A little more",
                    "It makes no difference",
                    "A little less",
                    "Much less",
                ],
            ),
            SurveyQuestion::free_text(SOUP_QUESTION, "Is curry a soup?"),
            SurveyQuestion::free_text(
                SANDWICH_QUESTION,
                "Is a pizza folded crust-to-crust a sandwich?",
            ),
            SurveyQuestion::closed(
                "Q10",
                "How important is the chef's intent when determining if something is a sandwich?",
                &[
                    "0 - Not at all",
                    "1",
                    "2",
                    "3",
                    "4",
                    "5 - It's the only thing that matters",
                ],
            ),
        ];
        QuestionRegistry {
            questions: questions.into_iter().map(|q| (q.id.clone(), q)).collect(),
        }
    }

    /// Updates the prompts with the ones from the questions table.
    ///
    /// Ids that are not known yet become closed questions without options.
    pub fn with_prompts(mut self, prompts: &[(String, String)]) -> QuestionRegistry {
        for (id, prompt) in prompts {
            match self.questions.get_mut(id) {
                Some(q) => {
                    debug!("with_prompts: {}: {:?}", id, prompt);
                    q.prompt = prompt.clone();
                }
                None => {
                    warn!(
                        "with_prompts: question {} has no known options, showing raw codes",
                        id
                    );
                    self.questions
                        .insert(id.clone(), SurveyQuestion::closed(id, prompt, &[]));
                }
            }
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&SurveyQuestion> {
        self.questions.get(id)
    }

    /// The questions, in their natural order (Q2 before Q10).
    pub fn questions(&self) -> Vec<&SurveyQuestion> {
        let mut res: Vec<&SurveyQuestion> = self.questions.values().collect();
        res.sort_by_key(|q| question_sort_key(&q.id));
        res
    }

    pub fn free_text_questions(&self) -> Vec<&SurveyQuestion> {
        self.questions()
            .into_iter()
            .filter(|q| q.kind == QuestionKind::FreeText)
            .collect()
    }
}

fn question_sort_key(id: &str) -> (String, u64, String) {
    let prefix: String = id.chars().take_while(|c| !c.is_ascii_digit()).collect();
    let digits: String = id
        .chars()
        .skip(prefix.chars().count())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (prefix, digits.parse::<u64>().unwrap_or(u64::MAX), id.to_string())
}
