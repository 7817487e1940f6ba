//! Counting answers.
//!
//! Percentages are computed over the answers that have a label (unmapped codes
//! and unclassified text are left out) and rounded to one decimal place, ties
//! going to the even digit. The classification table is the exception: its
//! percentages are over every non-empty answer, including the unclassified ones.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;

use crate::config::*;
use crate::dataset::{Answer, Respondent};
use crate::demographics::compare_labels;
use crate::questions::SurveyQuestion;

pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Tenths of a percent, rounded on the exact ratio.
    let scaled = u128::from(count) * 1000;
    let total = u128::from(total);
    let (mut tenths, rem) = (scaled / total, scaled % total);
    if 2 * rem > total || (2 * rem == total && tenths % 2 == 1) {
        tenths += 1;
    }
    tenths as f64 / 10.0
}

/// Declared options first, in their order. Other answers follow alphabetically.
pub fn compare_answers(question: &SurveyQuestion, a: &str, b: &str) -> Ordering {
    match (question.option_rank(a), question.option_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn count_labels(records: &[&Respondent], question: &SurveyQuestion) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for r in records {
        if let Some(label) = r.answer_label(question) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    counts
}

/// Counts the answers to a question.
///
/// Answers without a label do not count. When no answer is left, the summary
/// is [Summary::Empty].
pub fn aggregate(records: &[&Respondent], question: &SurveyQuestion) -> Summary {
    let counts = count_labels(records, question);
    let total: u64 = counts.values().sum();
    if total == 0 {
        debug!(
            "aggregate: {}: no labelled answer in {} records",
            question.id,
            records.len()
        );
        return Summary::Empty;
    }
    let mut tallies: Vec<Tally> = counts
        .into_iter()
        .map(|(label, count)| Tally {
            label,
            count,
            percentage: percentage(count, total),
        })
        .collect();
    tallies.sort_by(|a, b| compare_answers(question, &a.label, &b.label));
    debug!(
        "aggregate: {}: total: {} tallies: {:?}",
        question.id, total, tallies
    );
    Summary::Counts { total, tallies }
}

/// Counts the answers to a question for each value of a demographic field.
///
/// Respondents without a value for the field are left out. The rows follow
/// the order of the field (the canonical order for ordinal fields), then the
/// order of the answers.
pub fn aggregate_grouped(
    records: &[&Respondent],
    question: &SurveyQuestion,
    field: DemographicField,
) -> GroupedSummary {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for r in records {
        let group = match r.demographic(field) {
            Some(g) => g,
            None => continue,
        };
        if let Some(label) = r.answer_label(question) {
            *counts.entry((label, group.to_string())).or_insert(0) += 1;
        }
    }
    if counts.is_empty() {
        debug!(
            "aggregate_grouped: {} by {}: nothing to count",
            question.id, field
        );
        return GroupedSummary::Empty;
    }
    let mut tallies: Vec<GroupedTally> = counts
        .into_iter()
        .map(|((label, group), count)| GroupedTally {
            label,
            group,
            count,
        })
        .collect();
    tallies.sort_by(|a, b| {
        compare_labels(field, &a.group, &b.group)
            .then_with(|| compare_answers(question, &a.label, &b.label))
    });
    debug!(
        "aggregate_grouped: {} by {}: {} rows",
        question.id,
        field,
        tallies.len()
    );
    GroupedSummary::Counts { field, tallies }
}

/// The table of all the classification labels for a free-text question,
/// including the labels nobody got. The percentages are over all the non-empty
/// answers, so they do not add up to 100 when some answers are unclassified.
pub fn classification_table(records: &[&Respondent], question_id: &str) -> ClassificationTable {
    let mut counts: BTreeMap<Label, u64> = BTreeMap::new();
    let mut unclassified: u64 = 0;
    for r in records {
        match r.answers.get(question_id) {
            Some(Answer::FreeText { label, .. }) if label.is_classified() => {
                *counts.entry(*label).or_insert(0) += 1;
            }
            Some(Answer::FreeText { text, .. }) if !text.is_empty() => unclassified += 1,
            _ => {}
        }
    }
    let total: u64 = counts.values().sum::<u64>() + unclassified;
    let rows = Label::CLASSIFIED
        .iter()
        .map(|label| {
            let count = counts.get(label).copied().unwrap_or(0);
            ClassificationRow {
                label: *label,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();
    ClassificationTable { rows, unclassified }
}

/// The individual free-text answers, in row order. Empty cells are skipped.
pub fn text_responses(records: &[&Respondent], question_id: &str) -> Vec<TextResponse> {
    records
        .iter()
        .filter_map(|r| match r.answers.get(question_id) {
            Some(Answer::FreeText { text, label }) => text.to_label().map(|t| TextResponse {
                row: r.row,
                text: t,
                label: *label,
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QuestionRegistry;

    fn coded(row: usize, code: i64) -> Respondent {
        Respondent::new(row).with_answer("Q1", Answer::Coded(RawValue::Int(code)))
    }

    fn free_text(row: usize, text: &str, label: Label) -> Respondent {
        Respondent::new(row).with_answer(
            "Q8",
            Answer::FreeText {
                text: RawValue::Text(text.to_string()),
                label,
            },
        )
    }

    fn refs(records: &[Respondent]) -> Vec<&Respondent> {
        records.iter().collect()
    }

    #[test]
    fn empty_input_is_marked() {
        let reg = QuestionRegistry::standard();
        let q1 = reg.get("Q1").unwrap();
        assert_eq!(aggregate(&[], q1), Summary::Empty);
        // Only unmapped codes: nothing to count either.
        let recs = vec![coded(0, 17)];
        assert_eq!(aggregate(&refs(&recs), q1), Summary::Empty);
        assert_eq!(
            aggregate_grouped(&[], q1, DemographicField::Income),
            GroupedSummary::Empty
        );
    }

    #[test]
    fn option_order_and_percentages() {
        let reg = QuestionRegistry::standard();
        let q1 = reg.get("Q1").unwrap();
        let recs = vec![coded(0, 4), coded(1, 2), coded(2, 2), coded(3, 9)];
        match aggregate(&refs(&recs), q1) {
            Summary::Counts { total, tallies } => {
                assert_eq!(total, 3);
                assert_eq!(
                    tallies,
                    vec![
                        Tally {
                            label: "No".to_string(),
                            count: 2,
                            percentage: 66.7
                        },
                        Tally {
                            label: "I refuse to answer".to_string(),
                            count: 1,
                            percentage: 33.3
                        },
                    ]
                );
            }
            Summary::Empty => panic!("expected counts"),
        }
    }

    #[test]
    fn unclassified_answers_are_not_counted() {
        let reg = QuestionRegistry::standard();
        let q8 = reg.get("Q8").unwrap();
        let recs = vec![
            free_text(0, "yes", Label::Yes),
            free_text(1, "42", Label::Unclassified),
            free_text(2, "hmm", Label::Ambiguous),
            Respondent::new(3).with_answer(
                "Q8",
                Answer::FreeText {
                    text: RawValue::Empty,
                    label: Label::Unclassified,
                },
            ),
        ];
        let recs = refs(&recs);
        match aggregate(&recs, q8) {
            Summary::Counts { total, tallies } => {
                assert_eq!(total, 2);
                let labels: Vec<&str> = tallies.iter().map(|t| t.label.as_str()).collect();
                assert_eq!(labels, vec!["Yes", "Ambiguous"]);
                assert_eq!(tallies[0].percentage, 50.0);
            }
            Summary::Empty => panic!("expected counts"),
        }
        let table = classification_table(&recs, "Q8");
        let counts: Vec<u64> = table.rows.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);
        assert_eq!(table.unclassified, 1);
        // The unclassified "42" still counts in the denominator.
        let percentages: Vec<f64> = table.rows.iter().map(|r| r.percentage).collect();
        assert_eq!(percentages, vec![33.3, 0.0, 0.0, 33.3]);
        let responses = text_responses(&recs, "Q8");
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[1].text, "42");
        assert_eq!(responses[1].label, Label::Unclassified);
    }

    #[test]
    fn income_groups_follow_income_order() {
        let reg = QuestionRegistry::standard();
        let q1 = reg.get("Q1").unwrap();
        let incomes = [6, 1, 7, 3, 1];
        let recs: Vec<Respondent> = incomes
            .iter()
            .enumerate()
            .map(|(i, code)| {
                coded(i, 1).with_demographic(DemographicField::Income, RawValue::Int(*code))
            })
            .chain(std::iter::once(
                coded(9, 2).with_demographic(
                    DemographicField::Income,
                    RawValue::Text("Lottery winner".to_string()),
                ),
            ))
            .chain(std::iter::once(coded(10, 2)))
            .collect();
        let mut reversed = refs(&recs);
        reversed.reverse();
        for input in [refs(&recs), reversed] {
            match aggregate_grouped(&input, q1, DemographicField::Income) {
                GroupedSummary::Counts { field, tallies } => {
                    assert_eq!(field, DemographicField::Income);
                    let groups: Vec<(&str, u64)> = tallies
                        .iter()
                        .map(|t| (t.group.as_str(), t.count))
                        .collect();
                    assert_eq!(
                        groups,
                        vec![
                            ("Under $25,000", 2),
                            ("$50,000 to less than $100,000", 1),
                            ("Over $200,000", 1),
                            ("Don't know / Rather not say", 1),
                            ("Lottery winner", 1),
                        ]
                    );
                }
                GroupedSummary::Empty => panic!("expected counts"),
            }
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(7, 7), 100.0);
        // Exact ties go to the even tenth.
        assert_eq!(percentage(1, 16), 6.2);
        assert_eq!(percentage(1, 80), 1.2);
        assert_eq!(percentage(3, 16), 18.8);
        assert_eq!(percentage(3, 80), 3.8);
    }
}
