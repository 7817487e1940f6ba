//! Heuristic yes/no classification of free-text answers.
//!
//! The decision runs in stages and the first stage that reaches a decision wins:
//!
//! 1. missing, non-textual or blank input is [Label::Unclassified]
//! 2. the text is lower-cased and trimmed
//! 3. direct cues (`yes`, `never`, ...) are looked up
//! 4. contextual phrases of the question (`not a soup`, ...) are looked up
//! 5. a side that is the only one with direct cues wins, then a side that is
//!    the only one with contextual phrases; otherwise a mention of `depends`
//!    gives [Label::ItDepends]
//! 6. the keyword buckets of the question are tried in order
//! 7. the side with the most matching patterns wins, a tie is [Label::Ambiguous]

use log::debug;

use crate::config::{Label, RawValue};
use crate::patterns::{PatternLibrary, QuestionPatterns};

/// Which cues were found in a text.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Cues {
    pub yes_word: bool,
    pub no_word: bool,
    pub yes_context: bool,
    pub no_context: bool,
}

pub struct TextClassifier {
    library: PatternLibrary,
}

impl TextClassifier {
    pub fn new(library: PatternLibrary) -> TextClassifier {
        TextClassifier { library }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Classifies a spreadsheet cell. Anything that is not text is unclassified.
    pub fn classify_cell(&self, cell: &RawValue, question_id: &str) -> Label {
        self.classify(cell.as_text(), question_id)
    }

    pub fn classify(&self, text: Option<&str>, question_id: &str) -> Label {
        let text = match normalize_text(text) {
            Some(t) => t,
            None => return Label::Unclassified,
        };
        let patterns = self.library.for_question(question_id);
        let cues = self.detect_cues(&text, patterns);

        let res = resolve_cues(&cues, &text)
            .or_else(|| keyword_fallback(patterns, &text))
            .unwrap_or_else(|| self.score(&text, patterns));
        debug!(
            "classify: question: {} cues: {:?} text: {:?} -> {:?}",
            question_id, cues, text, res
        );
        res
    }

    pub fn detect_cues(&self, text: &str, patterns: &QuestionPatterns) -> Cues {
        let direct = self.library.direct();
        Cues {
            yes_word: direct.yes.any_match(text),
            no_word: direct.no.any_match(text),
            yes_context: patterns.context.yes.any_match(text),
            no_context: patterns.context.no.any_match(text),
        }
    }

    /// Last resort: counts how many patterns of each side match.
    fn score(&self, text: &str, patterns: &QuestionPatterns) -> Label {
        let direct = self.library.direct();
        let yes_score = direct.yes.count_matches(text) + patterns.context.yes.count_matches(text);
        let no_score = direct.no.count_matches(text) + patterns.context.no.count_matches(text);
        debug!("score: yes: {} no: {}", yes_score, no_score);
        match yes_score.cmp(&no_score) {
            std::cmp::Ordering::Greater => Label::Yes,
            std::cmp::Ordering::Less => Label::No,
            std::cmp::Ordering::Equal => Label::Ambiguous,
        }
    }
}

/// Lower-cases and trims. Blank text counts as no text.
pub fn normalize_text(text: Option<&str>) -> Option<String> {
    let t = text?.trim().to_lowercase();
    if t.is_empty() {
        None
    } else {
        Some(t)
    }
}

fn exclusive(yes: bool, no: bool) -> Option<Label> {
    match (yes, no) {
        (true, false) => Some(Label::Yes),
        (false, true) => Some(Label::No),
        _ => None,
    }
}

/// Direct cues first, then contextual phrases, then an explicit "it depends".
///
/// When both sides have cues, the text is not settled by whichever list
/// happened to match first: it moves on to the next stage.
pub fn resolve_cues(cues: &Cues, text: &str) -> Option<Label> {
    exclusive(cues.yes_word, cues.no_word)
        .or_else(|| exclusive(cues.yes_context, cues.no_context))
        .or_else(|| {
            // "it depends" is covered by "depends".
            if text.contains("depends") {
                Some(Label::ItDepends)
            } else {
                None
            }
        })
}

pub fn keyword_fallback(patterns: &QuestionPatterns, text: &str) -> Option<Label> {
    patterns
        .fallback
        .iter()
        .find(|bucket| bucket.matches(text))
        .map(|bucket| bucket.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{SANDWICH_QUESTION, SOUP_QUESTION};

    fn classifier() -> TextClassifier {
        TextClassifier::new(PatternLibrary::standard().unwrap())
    }

    fn classify(text: &str, question_id: &str) -> Label {
        classifier().classify(Some(text), question_id)
    }

    #[test]
    fn missing_input() {
        let c = classifier();
        for q in ["Q1", SOUP_QUESTION, SANDWICH_QUESTION, "Q42"] {
            assert_eq!(c.classify(None, q), Label::Unclassified);
            assert_eq!(c.classify(Some(""), q), Label::Unclassified);
            assert_eq!(c.classify(Some("   \n"), q), Label::Unclassified);
        }
        assert_eq!(
            c.classify_cell(&RawValue::Float(3.0), SOUP_QUESTION),
            Label::Unclassified
        );
        assert_eq!(
            c.classify_cell(&RawValue::Empty, SOUP_QUESTION),
            Label::Unclassified
        );
        assert_eq!(
            c.classify_cell(&RawValue::Text("Yes".to_string()), SOUP_QUESTION),
            Label::Yes
        );
    }

    #[test]
    fn direct_answers() {
        assert_eq!(classify("Yes, absolutely!", SOUP_QUESTION), Label::Yes);
        assert_eq!(
            classify("No, it's a stew not a soup", SOUP_QUESTION),
            Label::No
        );
        assert_eq!(classify("NOPE.", "Q1"), Label::No);
        assert_eq!(classify("  Sure  ", SANDWICH_QUESTION), Label::Yes);
    }

    #[test]
    fn depends() {
        assert_eq!(
            classify("it depends on the recipe", SOUP_QUESTION),
            Label::ItDepends
        );
        assert_eq!(
            classify("Depends who is asking", SANDWICH_QUESTION),
            Label::ItDepends
        );
    }

    #[test]
    fn words_before_context() {
        // "not" is a direct negative cue, even though "is a soup" would say yes.
        assert_eq!(
            classify("it is a soup, not really", SOUP_QUESTION),
            Label::No
        );
    }

    #[test]
    fn context_when_words_are_silent() {
        assert_eq!(classify("Curry is a soup", SOUP_QUESTION), Label::Yes);
        assert_eq!(classify("It's a sauce over rice", SOUP_QUESTION), Label::No);
        assert_eq!(
            classify("It is technically a sandwich", SANDWICH_QUESTION),
            Label::Yes
        );
        assert_eq!(classify("That's just pizza", SANDWICH_QUESTION), Label::No);
        // Contextual phrases belong to their own question.
        assert_eq!(
            classify("Curry is a soup", SANDWICH_QUESTION),
            Label::Ambiguous
        );
    }

    #[test]
    fn conflicting_words_do_not_short_circuit() {
        // Both sides have direct cues: the context decides.
        assert_eq!(
            classify("yes and no, but it is a soup", SOUP_QUESTION),
            Label::Yes
        );
        assert_eq!(classify("yes and no", "Q1"), Label::Ambiguous);
    }

    #[test]
    fn keyword_fallback_path() {
        assert_eq!(
            classify("I would say it has bread and a filling", SANDWICH_QUESTION),
            Label::Yes
        );
        assert_eq!(
            classify("Served in a bowl with broth", SOUP_QUESTION),
            Label::Yes
        );
        assert_eq!(
            classify("there is bread on both sides", SANDWICH_QUESTION),
            Label::Yes
        );
    }

    #[test]
    fn soup_checks_negative_keywords_first() {
        // Both contexts match, the scores are tied (2-2): only the keywords decide.
        let text = "yes and no, it is a soup but really a broth, a stew";
        assert_eq!(classify(text, SOUP_QUESTION), Label::No);
    }

    #[test]
    fn sandwich_checks_positive_keywords_first() {
        // The score would say no (2 against 3), the "bread" keyword says yes.
        let text = "yes and no, it is a sandwich but just pizza, not bread";
        assert_eq!(classify(text, SANDWICH_QUESTION), Label::Yes);
    }

    #[test]
    fn scored_tie_break() {
        let c = classifier();
        let text = "yes, no, never";
        let patterns = c.library().for_question("Q1");
        let cues = c.detect_cues(text, patterns);
        assert!(cues.yes_word && cues.no_word);
        assert_eq!(resolve_cues(&cues, text), None);
        assert_eq!(keyword_fallback(patterns, text), None);
        assert_eq!(c.classify(Some(text), "Q1"), Label::No);
        assert_eq!(c.classify(Some("i would say no"), "Q1"), Label::Yes);
        assert_eq!(c.classify(Some("hmm"), "Q1"), Label::Ambiguous);
    }

    #[test]
    fn case_and_punctuation_are_irrelevant() {
        assert_eq!(classify("YES!!!", SOUP_QUESTION), Label::Yes);
        assert_eq!(classify("...No.", SOUP_QUESTION), Label::No);
        assert_eq!(classify("IT DEPENDS", SOUP_QUESTION), Label::ItDepends);
    }

    #[test]
    fn resolution_order() {
        let words_only = Cues {
            no_word: true,
            yes_context: true,
            ..Cues::default()
        };
        assert_eq!(resolve_cues(&words_only, "whatever"), Some(Label::No));
        let contexts = Cues {
            yes_word: true,
            no_word: true,
            no_context: true,
            ..Cues::default()
        };
        assert_eq!(resolve_cues(&contexts, "it depends"), Some(Label::No));
        let undecided = Cues {
            yes_word: true,
            no_word: true,
            ..Cues::default()
        };
        assert_eq!(
            resolve_cues(&undecided, "it depends"),
            Some(Label::ItDepends)
        );
        assert_eq!(resolve_cues(&undecided, "hmm"), None);
    }
}
