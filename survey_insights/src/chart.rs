//! Render-agnostic chart specifications.

use log::debug;

use crate::aggregate::compare_answers;
use crate::config::*;
use crate::questions::{QuestionKind, SurveyQuestion};

pub const NO_DATA_AXIS_TITLE: &str = "No data available";
pub const COUNT_AXIS_TITLE: &str = "Count";

fn title(question: &SurveyQuestion) -> String {
    match question.kind {
        QuestionKind::FreeText => format!("AI Classification for {}", question.id),
        QuestionKind::Closed => format!("Response Distribution for {}", question.id),
    }
}

/// The text shown for an answer. Classification labels get their glyph.
fn category(question: &SurveyQuestion, label: &str) -> String {
    match (question.kind, Label::from_name(label)) {
        (QuestionKind::FreeText, Some(l)) => l.decorated(),
        _ => label.to_string(),
    }
}

fn axis_titles(kind: ChartKind, question: &SurveyQuestion) -> (String, String) {
    let answers = match question.kind {
        QuestionKind::FreeText => "Classification",
        QuestionKind::Closed => "Answer",
    };
    match kind {
        ChartKind::Bar | ChartKind::StackedBar => {
            (answers.to_string(), COUNT_AXIS_TITLE.to_string())
        }
        ChartKind::HorizontalBar => (COUNT_AXIS_TITLE.to_string(), answers.to_string()),
        ChartKind::Pie | ChartKind::Donut => (String::new(), String::new()),
    }
}

/// The chart of the answers to a question.
///
/// Stacking needs groups: an ungrouped stacked bar chart is a plain bar chart.
pub fn build_chart(kind: ChartKind, question: &SurveyQuestion, summary: &Summary) -> ChartSpec {
    let tallies = match summary {
        Summary::Counts { tallies, .. } => tallies,
        Summary::Empty => {
            return no_data_chart(kind, &question.id, NoDataReason::EmptyFilterResult);
        }
    };
    let kind = match kind {
        ChartKind::StackedBar => ChartKind::Bar,
        k => k,
    };
    let (x_axis_title, y_axis_title) = axis_titles(kind, question);
    ChartSpec {
        kind,
        title: title(question),
        x_axis_title,
        y_axis_title,
        categories: tallies.iter().map(|t| category(question, &t.label)).collect(),
        values: tallies.iter().map(|t| t.count).collect(),
        groups: None,
    }
}

/// The chart of the answers split by a demographic field: one series per
/// group, aligned with the categories.
pub fn build_grouped_chart(
    kind: ChartKind,
    question: &SurveyQuestion,
    grouped: &GroupedSummary,
) -> ChartSpec {
    let tallies = match grouped {
        GroupedSummary::Empty => {
            return no_data_chart(kind, &question.id, NoDataReason::EmptyFilterResult);
        }
        GroupedSummary::Counts { tallies, .. } => tallies,
    };
    // The tallies are sorted by group, then by answer.
    let mut labels: Vec<&str> = Vec::new();
    let mut groups: Vec<&str> = Vec::new();
    for t in tallies {
        if !groups.contains(&t.group.as_str()) {
            groups.push(&t.group);
        }
        if !labels.contains(&t.label.as_str()) {
            labels.push(&t.label);
        }
    }
    labels.sort_by(|a, b| compare_answers(question, a, b));

    let series: Vec<GroupSeries> = groups
        .iter()
        .map(|g| GroupSeries {
            group: g.to_string(),
            values: labels
                .iter()
                .map(|l| {
                    tallies
                        .iter()
                        .find(|t| t.group == *g && t.label == *l)
                        .map(|t| t.count)
                        .unwrap_or(0)
                })
                .collect(),
        })
        .collect();
    debug!(
        "build_grouped_chart: {}: {} categories, {} groups",
        question.id,
        labels.len(),
        series.len()
    );
    let (x_axis_title, y_axis_title) = axis_titles(kind, question);
    ChartSpec {
        kind,
        title: title(question),
        x_axis_title,
        y_axis_title,
        categories: labels.iter().map(|l| category(question, l)).collect(),
        values: Vec::new(),
        groups: Some(series),
    }
}

pub fn no_data_message(question_id: &str, reason: NoDataReason) -> String {
    match reason {
        NoDataReason::UnknownQuestion => {
            format!("Question {} is not part of the survey", question_id)
        }
        NoDataReason::QuestionNotInData => format!("Question {} data not found", question_id),
        NoDataReason::EmptyFilterResult => "No data available for the selected filters".to_string(),
    }
}

/// An empty chart, titled with the reason why it is empty.
pub fn no_data_chart(kind: ChartKind, question_id: &str, reason: NoDataReason) -> ChartSpec {
    let title = match reason {
        NoDataReason::EmptyFilterResult => {
            format!(
                "No data available for {} with the selected filters",
                question_id
            )
        }
        r => no_data_message(question_id, r),
    };
    ChartSpec {
        kind,
        title,
        x_axis_title: NO_DATA_AXIS_TITLE.to_string(),
        y_axis_title: COUNT_AXIS_TITLE.to_string(),
        categories: Vec::new(),
        values: Vec::new(),
        groups: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QuestionRegistry;

    fn tally(label: &str, count: u64) -> Tally {
        Tally {
            label: label.to_string(),
            count,
            percentage: 0.0,
        }
    }

    fn grouped(label: &str, group: &str, count: u64) -> GroupedTally {
        GroupedTally {
            label: label.to_string(),
            group: group.to_string(),
            count,
        }
    }

    #[test]
    fn free_text_categories_are_decorated() {
        let reg = QuestionRegistry::standard();
        let summary = Summary::Counts {
            total: 3,
            tallies: vec![tally("Yes", 2), tally("Ambiguous", 1)],
        };
        let chart = build_chart(ChartKind::Donut, reg.get("Q9").unwrap(), &summary);
        assert_eq!(chart.kind, ChartKind::Donut);
        assert_eq!(chart.title, "AI Classification for Q9");
        assert_eq!(
            chart.categories,
            vec!["\u{2705} Yes".to_string(), "\u{2753} Ambiguous".to_string()]
        );
        assert_eq!(chart.values, vec![2, 1]);
        assert_eq!(chart.groups, None);
    }

    #[test]
    fn closed_categories_are_plain() {
        let reg = QuestionRegistry::standard();
        let summary = Summary::Counts {
            total: 1,
            tallies: vec![tally("Yes", 1)],
        };
        let chart = build_chart(ChartKind::HorizontalBar, reg.get("Q6").unwrap(), &summary);
        assert_eq!(chart.title, "Response Distribution for Q6");
        assert_eq!(chart.categories, vec!["Yes".to_string()]);
        assert_eq!(chart.x_axis_title, "Count");
        assert_eq!(chart.y_axis_title, "Answer");
    }

    #[test]
    fn stacked_bar_needs_groups() {
        let reg = QuestionRegistry::standard();
        let q1 = reg.get("Q1").unwrap();
        let summary = Summary::Counts {
            total: 1,
            tallies: vec![tally("No", 1)],
        };
        assert_eq!(
            build_chart(ChartKind::StackedBar, q1, &summary).kind,
            ChartKind::Bar
        );
        let g = GroupedSummary::Counts {
            field: DemographicField::Gender,
            tallies: vec![grouped("No", "Female", 1)],
        };
        assert_eq!(
            build_grouped_chart(ChartKind::StackedBar, q1, &g).kind,
            ChartKind::StackedBar
        );
    }

    #[test]
    fn grouped_series_are_aligned() {
        let reg = QuestionRegistry::standard();
        let q1 = reg.get("Q1").unwrap();
        let g = GroupedSummary::Counts {
            field: DemographicField::Education,
            tallies: vec![
                grouped("No", "High School Graduate", 2),
                grouped("Yes", "Bachelor's Degree", 1),
                grouped("It depends", "Bachelor's Degree", 4),
            ],
        };
        let chart = build_grouped_chart(ChartKind::Bar, q1, &g);
        assert_eq!(
            chart.categories,
            vec![
                "Yes".to_string(),
                "No".to_string(),
                "It depends".to_string(),
            ]
        );
        assert!(chart.values.is_empty());
        assert_eq!(
            chart.groups.unwrap(),
            vec![
                GroupSeries {
                    group: "High School Graduate".to_string(),
                    values: vec![0, 2, 0]
                },
                GroupSeries {
                    group: "Bachelor's Degree".to_string(),
                    values: vec![1, 0, 4]
                },
            ]
        );
    }

    #[test]
    fn no_data() {
        let chart = no_data_chart(ChartKind::Pie, "Q3", NoDataReason::EmptyFilterResult);
        assert_eq!(
            chart.title,
            "No data available for Q3 with the selected filters"
        );
        assert_eq!(chart.x_axis_title, "No data available");
        assert!(chart.categories.is_empty());
        assert_eq!(
            no_data_message("Q3", NoDataReason::QuestionNotInData),
            "Question Q3 data not found"
        );
        let reg = QuestionRegistry::standard();
        let chart = build_chart(ChartKind::Bar, reg.get("Q3").unwrap(), &Summary::Empty);
        assert_eq!(
            chart.title,
            "No data available for Q3 with the selected filters"
        );
    }
}
