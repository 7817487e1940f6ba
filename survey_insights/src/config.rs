// ********* Input data structures ***********

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::Display;

/// The content of a single cell, as read from a spreadsheet or a CSV file.
///
/// Spreadsheets report all numbers as floating point values, so integral
/// floats are accepted wherever an integer code is expected.
#[derive(PartialEq, Debug, Clone)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl RawValue {
    /// Parses a cell from a textual source (CSV).
    ///
    /// Integer-looking cells become codes, decimal-looking cells become numbers,
    /// blank cells are empty and everything else is kept verbatim as text.
    pub fn parse(s: &str) -> RawValue {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return RawValue::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return RawValue::Int(i);
        }
        // "nan" and "inf" are valid floats for the parser, but not numbers in a survey.
        if trimmed.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return RawValue::Float(f);
            }
        }
        RawValue::Text(s.to_string())
    }

    /// The integer code held by this cell, if any.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            RawValue::Int(i) => Some(*i),
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Int(i) => Some(*i as f64),
            RawValue::Float(f) if f.is_finite() => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The string form of the cell, used when a value has no known mapping.
    pub fn to_label(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Empty => None,
            x => match x.as_code() {
                Some(code) => Some(code.to_string()),
                None => x.as_number().map(|f| f.to_string()),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }
}

/// The outcome of classifying a free-text answer.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Label {
    Yes,
    No,
    ItDepends,
    Ambiguous,
    /// The answer is missing or is not text.
    Unclassified,
}

impl Label {
    /// The labels a free-text answer can actually receive, in display order.
    pub const CLASSIFIED: [Label; 4] = [Label::Yes, Label::No, Label::ItDepends, Label::Ambiguous];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Yes => "Yes",
            Label::No => "No",
            Label::ItDepends => "It depends",
            Label::Ambiguous => "Ambiguous",
            Label::Unclassified => "Unclassified",
        }
    }

    /// Display decoration only. Nothing should be decided based on it.
    pub fn glyph(&self) -> &'static str {
        match self {
            Label::Yes => "\u{2705}",
            Label::No => "\u{274c}",
            Label::ItDepends => "\u{1f914}",
            Label::Ambiguous => "\u{2753}",
            Label::Unclassified => "\u{26aa}",
        }
    }

    /// The label prefixed with its glyph, as shown on chart axes.
    pub fn decorated(&self) -> String {
        format!("{} {}", self.glyph(), self.as_str())
    }

    pub fn is_classified(&self) -> bool {
        *self != Label::Unclassified
    }

    pub fn from_name(s: &str) -> Option<Label> {
        Label::CLASSIFIED
            .iter()
            .chain([Label::Unclassified].iter())
            .find(|l| l.as_str() == s)
            .copied()
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The name of the column holding the age of the respondent.
pub const AGE_COLUMN: &str = "AGE";

/// The demographic attributes a respondent can be filtered or grouped by.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum DemographicField {
    /// Derived from the age column, never stored.
    AgeGroup,
    Gender,
    Region,
    Education,
    Income,
    Ethnicity,
    MaritalStatus,
}

impl DemographicField {
    pub const ALL: [DemographicField; 7] = [
        DemographicField::AgeGroup,
        DemographicField::Gender,
        DemographicField::Region,
        DemographicField::Education,
        DemographicField::Income,
        DemographicField::Ethnicity,
        DemographicField::MaritalStatus,
    ];

    /// The fields that are read from a column and normalized.
    pub const STORED: [DemographicField; 6] = [
        DemographicField::Gender,
        DemographicField::Region,
        DemographicField::Education,
        DemographicField::Income,
        DemographicField::Ethnicity,
        DemographicField::MaritalStatus,
    ];

    /// The column name in the source tables.
    pub fn column(&self) -> &'static str {
        match self {
            DemographicField::AgeGroup => "AGE_GROUP",
            DemographicField::Gender => "GENDER",
            DemographicField::Region => "REGION",
            DemographicField::Education => "EDUCATION",
            DemographicField::Income => "HHINCOME",
            DemographicField::Ethnicity => "ETHNICITYROLL23",
            DemographicField::MaritalStatus => "PMARITALSTATUS",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DemographicField::AgeGroup => "age-group",
            DemographicField::Gender => "gender",
            DemographicField::Region => "region",
            DemographicField::Education => "education",
            DemographicField::Income => "income",
            DemographicField::Ethnicity => "ethnicity",
            DemographicField::MaritalStatus => "marital-status",
        }
    }

    /// Accepts either the short name (`marital-status`) or the column name
    /// (`PMARITALSTATUS`), in any case.
    pub fn parse(s: &str) -> Option<DemographicField> {
        let norm = s.trim().to_lowercase().replace('_', "-");
        let matches = |f: &&DemographicField| {
            f.name() == norm || f.column().to_lowercase().replace('_', "-") == norm
        };
        DemographicField::ALL.iter().find(matches).copied()
    }
}

impl Display for DemographicField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The selected values for each demographic field.
///
/// A field that is absent, or present with an empty set, does not filter anything.
pub type Selections = BTreeMap<DemographicField, BTreeSet<String>>;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    StackedBar,
    Pie,
    Donut,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::HorizontalBar => "hbar",
            ChartKind::StackedBar => "stacked_bar",
            ChartKind::Pie => "pie",
            ChartKind::Donut => "donut",
        }
    }

    pub fn parse(s: &str) -> Option<ChartKind> {
        let norm: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match norm.as_str() {
            "bar" => Some(ChartKind::Bar),
            "hbar" | "horizontalbar" => Some(ChartKind::HorizontalBar),
            "stackedbar" => Some(ChartKind::StackedBar),
            "pie" => Some(ChartKind::Pie),
            "donut" => Some(ChartKind::Donut),
            _ => None,
        }
    }
}

/// One interaction with the dashboard: a question, some filters and a way to display them.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ViewRequest {
    pub question_id: String,
    pub selections: Selections,
    pub chart_kind: ChartKind,
    pub group_by: Option<DemographicField>,
}

impl ViewRequest {
    pub fn new(question_id: &str) -> ViewRequest {
        ViewRequest {
            question_id: question_id.to_string(),
            selections: Selections::new(),
            chart_kind: ChartKind::Bar,
            group_by: None,
        }
    }
}

// ******** Output data structures *********

/// The count of one answer and its share of all the labelled answers.
#[derive(PartialEq, Debug, Clone)]
pub struct Tally {
    pub label: String,
    pub count: u64,
    /// Rounded to one decimal place.
    pub percentage: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Summary {
    /// Nothing survived the filters. This is distinct from a label with a zero count.
    Empty,
    Counts { total: u64, tallies: Vec<Tally> },
}

#[derive(PartialEq, Debug, Clone)]
pub struct GroupedTally {
    pub label: String,
    pub group: String,
    pub count: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub enum GroupedSummary {
    Empty,
    Counts {
        field: DemographicField,
        tallies: Vec<GroupedTally>,
    },
}

/// The values of one group, aligned with the categories of the chart.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupSeries {
    pub group: String,
    pub values: Vec<u64>,
}

/// A chart, independent of how it is going to be drawn.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub categories: Vec<String>,
    /// Empty when the chart is grouped.
    pub values: Vec<u64>,
    pub groups: Option<Vec<GroupSeries>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NoDataReason {
    UnknownQuestion,
    QuestionNotInData,
    EmptyFilterResult,
}

impl NoDataReason {
    pub fn name(&self) -> &'static str {
        match self {
            NoDataReason::UnknownQuestion => "unknownQuestion",
            NoDataReason::QuestionNotInData => "questionNotInData",
            NoDataReason::EmptyFilterResult => "emptyFilterResult",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ClassificationRow {
    pub label: Label,
    pub count: u64,
    pub percentage: f64,
}

/// The summary table shown next to the free-text answers.
#[derive(PartialEq, Debug, Clone)]
pub struct ClassificationTable {
    /// Always one row per classified label, in display order, including zero counts.
    pub rows: Vec<ClassificationRow>,
    /// Non-empty answers that could not be classified (for example a number).
    pub unclassified: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TextResponse {
    pub row: usize,
    pub text: String,
    pub label: Label,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartView {
    pub question_id: String,
    pub prompt: String,
    pub chart: ChartSpec,
    pub total: u64,
    pub tallies: Vec<Tally>,
    pub grouped: Option<Vec<GroupedTally>>,
    /// Only for free-text questions.
    pub classification: Option<ClassificationTable>,
    pub responses: Vec<TextResponse>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum DashboardView {
    NoData {
        question_id: String,
        chart: ChartSpec,
        message: String,
        reason: NoDataReason,
    },
    Chart(Box<ChartView>),
}

/// Errors that prevent the dataset or the pattern library from being built.
///
/// Once built, none of the operations on them fail.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum InsightsError {
    InvalidPattern { pattern: String, message: String },
    MissingColumn { table: String, column: String },
}

impl Error for InsightsError {}

impl Display for InsightsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightsError::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern {:?}: {}", pattern, message)
            }
            InsightsError::MissingColumn { table, column } => {
                write!(
                    f,
                    "table {} is missing the required column {:?}",
                    table, column
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cells() {
        assert_eq!(RawValue::parse(""), RawValue::Empty);
        assert_eq!(RawValue::parse("  "), RawValue::Empty);
        assert_eq!(RawValue::parse("2"), RawValue::Int(2));
        assert_eq!(RawValue::parse("34.5"), RawValue::Float(34.5));
        assert_eq!(RawValue::parse("nan"), RawValue::Text("nan".to_string()));
        assert_eq!(
            RawValue::parse("No, it's a stew"),
            RawValue::Text("No, it's a stew".to_string())
        );
    }

    #[test]
    fn integral_floats_are_codes() {
        assert_eq!(RawValue::Float(3.0).as_code(), Some(3));
        assert_eq!(RawValue::Float(3.5).as_code(), None);
        assert_eq!(RawValue::Float(3.0).to_label(), Some("3".to_string()));
        assert_eq!(RawValue::Float(3.5).to_label(), Some("3.5".to_string()));
        assert_eq!(RawValue::Empty.to_label(), None);
    }

    #[test]
    fn field_names() {
        assert_eq!(
            DemographicField::parse("marital-status"),
            Some(DemographicField::MaritalStatus)
        );
        assert_eq!(
            DemographicField::parse("HHINCOME"),
            Some(DemographicField::Income)
        );
        assert_eq!(
            DemographicField::parse("age_group"),
            Some(DemographicField::AgeGroup)
        );
        assert_eq!(DemographicField::parse("shoe size"), None);
    }

    #[test]
    fn chart_kinds() {
        assert_eq!(ChartKind::parse("stacked_bar"), Some(ChartKind::StackedBar));
        assert_eq!(
            ChartKind::parse("horizontalBar"),
            Some(ChartKind::HorizontalBar)
        );
        assert_eq!(ChartKind::parse("hbar"), Some(ChartKind::HorizontalBar));
        assert_eq!(ChartKind::parse("radar"), None);
    }

    #[test]
    fn labels_round_trip_by_name() {
        for l in Label::CLASSIFIED {
            assert_eq!(Label::from_name(l.as_str()), Some(l));
        }
        assert_eq!(Label::Yes.decorated(), "\u{2705} Yes");
    }
}
