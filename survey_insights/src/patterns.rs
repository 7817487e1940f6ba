//! The cue tables used by the free-text classifier.
//!
//! All the patterns are matched against lower-cased, trimmed text. The direct
//! cues use word boundaries; the contextual phrases do not, so `stew` also
//! matches inside `stewed`.

use std::collections::HashMap;

use log::debug;
use regex::Regex;

use crate::config::{InsightsError, Label};

/// The question about curry being a soup.
pub const SOUP_QUESTION: &str = "Q8";
/// The question about a folded pizza being a sandwich.
pub const SANDWICH_QUESTION: &str = "Q9";

const DIRECT_YES: &[&str] = &[
    r"\byes\b",
    r"\byeah\b",
    r"\bep\b",
    r"\bsure\b",
    r"\bdefinitely\b",
    r"\babsolutely\b",
    r"\bagree\b",
    r"\bwould\b",
    r"\bpositive\b",
    r"\baffirmative\b",
    r"\bi think so\b",
    r"\bi would\b",
    r"\bi do\b",
    r"\bi believe so\b",
];

const DIRECT_NO: &[&str] = &[
    r"\bno\b",
    r"\bnope\b",
    r"\bnah\b",
    r"\bnever\b",
    r"\bdisagree\b",
    r"\bwouldn't\b",
    r"\bwould not\b",
    r"\bnegative\b",
    r"\bnot\b",
    r"\bi don't\b",
    r"\bi do not\b",
    r"\bi wouldn't\b",
    r"\bi would not\b",
];

const SOUP_CONTEXT_YES: &[&str] = &[
    "is a soup",
    "type of soup",
    "soup-like",
    "similar to soup",
    "considered a soup",
    "classified as soup",
    "soup category",
];

const SOUP_CONTEXT_NO: &[&str] = &[
    "not a soup",
    "isn't a soup",
    "is not a soup",
    "different from soup",
    "stew",
    "sauce",
    "dish",
    "not soup",
    "wouldn't classify",
];

const SANDWICH_CONTEXT_YES: &[&str] = &[
    "is a sandwich",
    "sandwich-like",
    "would be a sandwich",
    "technically a sandwich",
    "fits the definition",
    "meets the criteria",
];

const SANDWICH_CONTEXT_NO: &[&str] = &[
    "not a sandwich",
    "isn't a sandwich",
    "is not a sandwich",
    "wouldn't be a sandwich",
    "would not be a sandwich",
    "just pizza",
];

/// A compiled list of patterns pointing at the same answer.
#[derive(Debug, Clone, Default)]
pub struct CueList {
    patterns: Vec<Regex>,
}

impl CueList {
    /// The patterns are regular expressions. Phrases without special characters
    /// are matched literally.
    pub fn compile(patterns: &[&str]) -> Result<CueList, InsightsError> {
        let mut res: Vec<Regex> = Vec::new();
        for p in patterns {
            let re = Regex::new(p).map_err(|e| InsightsError::InvalidPattern {
                pattern: p.to_string(),
                message: e.to_string(),
            })?;
            res.push(re);
        }
        Ok(CueList { patterns: res })
    }

    pub fn any_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    /// The number of distinct patterns that match, not the number of occurrences.
    pub fn count_matches(&self, text: &str) -> usize {
        self.patterns.iter().filter(|re| re.is_match(text)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// The patterns in favor of each side of a yes/no question.
#[derive(Debug, Clone, Default)]
pub struct CuePair {
    pub yes: CueList,
    pub no: CueList,
}

impl CuePair {
    pub fn compile(yes: &[&str], no: &[&str]) -> Result<CuePair, InsightsError> {
        Ok(CuePair {
            yes: CueList::compile(yes)?,
            no: CueList::compile(no)?,
        })
    }
}

/// Keywords that settle an otherwise undecided answer.
///
/// Matching is plain substring containment.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct KeywordBucket {
    pub label: Label,
    pub keywords: Vec<String>,
}

impl KeywordBucket {
    pub fn new(label: Label, keywords: &[&str]) -> KeywordBucket {
        KeywordBucket {
            label,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

/// Everything that is specific to one question.
#[derive(Debug, Clone, Default)]
pub struct QuestionPatterns {
    pub context: CuePair,
    /// Checked in order, the first matching bucket wins.
    pub fallback: Vec<KeywordBucket>,
}

/// The registry of cues for all the questions.
///
/// Questions without an entry only use the direct cues.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    direct: CuePair,
    questions: HashMap<String, QuestionPatterns>,
    no_patterns: QuestionPatterns,
}

impl PatternLibrary {
    /// A library with the direct cues and no question-specific entry.
    pub fn new() -> Result<PatternLibrary, InsightsError> {
        Ok(PatternLibrary {
            direct: CuePair::compile(DIRECT_YES, DIRECT_NO)?,
            questions: HashMap::new(),
            no_patterns: QuestionPatterns::default(),
        })
    }

    /// The library for the survey questions.
    ///
    /// The fallback buckets are not checked in the same order for the two
    /// questions: negative first for the soup question, positive first for
    /// the sandwich question.
    pub fn standard() -> Result<PatternLibrary, InsightsError> {
        let lib = PatternLibrary::new()?
            .with_question(
                SOUP_QUESTION,
                QuestionPatterns {
                    context: CuePair::compile(SOUP_CONTEXT_YES, SOUP_CONTEXT_NO)?,
                    fallback: vec![
                        KeywordBucket::new(
                            Label::No,
                            &["stew", "sauce", "dish", "not liquid enough"],
                        ),
                        KeywordBucket::new(Label::Yes, &["liquid", "broth", "bowl"]),
                    ],
                },
            )
            .with_question(
                SANDWICH_QUESTION,
                QuestionPatterns {
                    context: CuePair::compile(SANDWICH_CONTEXT_YES, SANDWICH_CONTEXT_NO)?,
                    fallback: vec![
                        KeywordBucket::new(Label::Yes, &["bread", "filling", "between"]),
                        KeywordBucket::new(Label::No, &["still pizza", "just pizza", "not bread"]),
                    ],
                },
            );
        debug!(
            "PatternLibrary::standard: {} yes cues, {} no cues, questions: {:?}",
            lib.direct.yes.len(),
            lib.direct.no.len(),
            lib.question_ids()
        );
        Ok(lib)
    }

    pub fn with_question(
        mut self,
        question_id: &str,
        patterns: QuestionPatterns,
    ) -> PatternLibrary {
        self.questions.insert(question_id.to_string(), patterns);
        self
    }

    pub fn direct(&self) -> &CuePair {
        &self.direct
    }

    /// The patterns for a question. Unknown questions get empty lists.
    pub fn for_question(&self, question_id: &str) -> &QuestionPatterns {
        self.questions.get(question_id).unwrap_or(&self.no_patterns)
    }

    pub fn question_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.questions.keys().cloned().collect();
        ids.sort();
        ids
    }
}
