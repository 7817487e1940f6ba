use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::aggregate::{aggregate, aggregate_grouped, classification_table, text_responses};
use crate::chart::{build_chart, build_grouped_chart, no_data_chart, no_data_message};
use crate::classifier::TextClassifier;
use crate::config::*;
use crate::demographics::{age_group, normalize};
use crate::filter::apply_filters;
use crate::questions::{QuestionKind, QuestionRegistry, SurveyQuestion};

/// The name of the column holding the question ids in the questions table.
pub const QUESTION_ID_COLUMN: &str = "Question_ID";
/// The name of the column holding the prompts in the questions table.
pub const QUESTION_TEXT_COLUMN: &str = "Question_Text";

static EMPTY_CELL: RawValue = RawValue::Empty;

/// A table as read from a source: a header and rows of cells.
///
/// Rows may be shorter than the header, missing cells are empty.
#[derive(PartialEq, Debug, Clone)]
pub struct RawTable {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn new(name: &str, header: Vec<String>, rows: Vec<Vec<RawValue>>) -> RawTable {
        RawTable {
            name: name.to_string(),
            header,
            rows,
        }
    }

    /// The position of a column. Surrounding whitespace in the header is ignored.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == column)
    }

    fn required_column(&self, column: &str) -> Result<usize, InsightsError> {
        self.column_index(column)
            .ok_or_else(|| InsightsError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn cell(&self, row: usize, column: usize) -> &RawValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum Answer {
    /// The option code of a closed question.
    Coded(RawValue),
    /// A free-text answer and the label it was given when the dataset was built.
    FreeText { text: RawValue, label: Label },
}

/// One row of a data table.
#[derive(PartialEq, Debug, Clone)]
pub struct Respondent {
    /// The position of the row in its table, starting at 0.
    pub row: usize,
    /// Canonical labels of the stored demographic fields.
    pub demographics: BTreeMap<DemographicField, String>,
    pub age: Option<f64>,
    /// Answers by question id.
    pub answers: BTreeMap<String, Answer>,
}

impl Respondent {
    pub fn new(row: usize) -> Respondent {
        Respondent {
            row,
            demographics: BTreeMap::new(),
            age: None,
            answers: BTreeMap::new(),
        }
    }

    /// Sets a demographic value. The value is normalized first.
    pub fn with_demographic(mut self, field: DemographicField, value: RawValue) -> Respondent {
        if let Some(label) = normalize(field, &value) {
            self.demographics.insert(field, label);
        }
        self
    }

    pub fn with_age(mut self, age: f64) -> Respondent {
        self.age = Some(age);
        self
    }

    pub fn with_answer(mut self, question_id: &str, answer: Answer) -> Respondent {
        self.answers.insert(question_id.to_string(), answer);
        self
    }

    /// The canonical value of a field. The age group is derived from the age.
    pub fn demographic(&self, field: DemographicField) -> Option<&str> {
        match field {
            DemographicField::AgeGroup => self.age.and_then(age_group),
            f => self.demographics.get(&f).map(|s| s.as_str()),
        }
    }

    /// The answer to a question as it is displayed and counted.
    ///
    /// Unmapped codes and unclassified text have no label.
    pub fn answer_label(&self, question: &SurveyQuestion) -> Option<String> {
        match self.answers.get(&question.id)? {
            Answer::Coded(code) => question.answer_text(code),
            Answer::FreeText { label, .. } if label.is_classified() => {
                Some(label.as_str().to_string())
            }
            Answer::FreeText { .. } => None,
        }
    }
}

/// All the answers of the survey, normalized and classified.
///
/// Built once, then only read.
#[derive(Debug, Clone)]
pub struct Dataset {
    registry: QuestionRegistry,
    numeric: Vec<Respondent>,
    text: Vec<Respondent>,
    numeric_questions: BTreeSet<String>,
    text_questions: BTreeSet<String>,
}

impl Dataset {
    /// Builds the dataset from the three source tables.
    ///
    /// The questions table must have the id and prompt columns. All the
    /// columns of the data tables are optional.
    pub fn from_tables(
        questions: &RawTable,
        numeric: &RawTable,
        text: &RawTable,
        classifier: &TextClassifier,
    ) -> Result<Dataset, InsightsError> {
        let prompts = read_prompts(questions)?;
        let registry = QuestionRegistry::standard().with_prompts(&prompts);

        let closed: Vec<&SurveyQuestion> = registry
            .questions()
            .into_iter()
            .filter(|q| q.kind == QuestionKind::Closed)
            .collect();
        let (numeric_respondents, numeric_questions) =
            read_respondents(numeric, &closed, |_, cell| Answer::Coded(cell.clone()));

        let free_text = registry.free_text_questions();
        let (text_respondents, text_questions) =
            read_respondents(text, &free_text, |q, cell| Answer::FreeText {
                text: cell.clone(),
                label: classifier.classify_cell(cell, &q.id),
            });

        info!(
            "from_tables: {} questions, {} numeric rows, {} text rows",
            prompts.len(),
            numeric_respondents.len(),
            text_respondents.len()
        );
        debug!(
            "from_tables: numeric questions: {:?} text questions: {:?}",
            numeric_questions, text_questions
        );
        Ok(Dataset {
            registry,
            numeric: numeric_respondents,
            text: text_respondents,
            numeric_questions,
            text_questions,
        })
    }

    pub fn registry(&self) -> &QuestionRegistry {
        &self.registry
    }

    pub fn numeric_respondents(&self) -> &[Respondent] {
        &self.numeric
    }

    pub fn text_respondents(&self) -> &[Respondent] {
        &self.text
    }

    /// The rows holding the answers to a question, if the question has a column.
    pub fn respondents_for(&self, question: &SurveyQuestion) -> Option<&[Respondent]> {
        let (rows, present) = match question.kind {
            QuestionKind::Closed => (&self.numeric, &self.numeric_questions),
            QuestionKind::FreeText => (&self.text, &self.text_questions),
        };
        if present.contains(&question.id) {
            Some(rows.as_slice())
        } else {
            None
        }
    }

    /// Runs a request: filter, count and chart.
    pub fn view(&self, request: &ViewRequest) -> DashboardView {
        let qid = request.question_id.as_str();
        let question = match self.registry.get(qid) {
            Some(q) => q,
            None => return no_data(request, NoDataReason::UnknownQuestion),
        };
        let rows = match self.respondents_for(question) {
            Some(rows) => rows,
            None => return no_data(request, NoDataReason::QuestionNotInData),
        };

        let filtered = apply_filters(rows, &request.selections);
        debug!(
            "view: {}: {} rows, {} after filters",
            qid,
            rows.len(),
            filtered.len()
        );
        let summary = aggregate(&filtered, question);
        let (total, tallies) = match &summary {
            Summary::Empty => return no_data(request, NoDataReason::EmptyFilterResult),
            Summary::Counts { total, tallies } => (*total, tallies.clone()),
        };

        let grouped = request
            .group_by
            .map(|field| aggregate_grouped(&filtered, question, field));
        let chart = match &grouped {
            Some(g @ GroupedSummary::Counts { .. }) => {
                build_grouped_chart(request.chart_kind, question, g)
            }
            Some(GroupedSummary::Empty) => {
                warn!(
                    "view: {}: no row has a value for {:?}, the chart is not grouped",
                    qid, request.group_by
                );
                build_chart(request.chart_kind, question, &summary)
            }
            None => build_chart(request.chart_kind, question, &summary),
        };
        let grouped = grouped.map(|g| match g {
            GroupedSummary::Counts { tallies, .. } => tallies,
            GroupedSummary::Empty => Vec::new(),
        });

        let (classification, responses) = match question.kind {
            QuestionKind::FreeText => (
                Some(classification_table(&filtered, qid)),
                text_responses(&filtered, qid),
            ),
            QuestionKind::Closed => (None, Vec::new()),
        };

        DashboardView::Chart(Box::new(ChartView {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            chart,
            total,
            tallies,
            grouped,
            classification,
            responses,
        }))
    }
}

fn no_data(request: &ViewRequest, reason: NoDataReason) -> DashboardView {
    info!("view: {}: no data ({})", request.question_id, reason.name());
    DashboardView::NoData {
        question_id: request.question_id.clone(),
        chart: no_data_chart(request.chart_kind, &request.question_id, reason),
        message: no_data_message(&request.question_id, reason),
        reason,
    }
}

fn read_prompts(table: &RawTable) -> Result<Vec<(String, String)>, InsightsError> {
    let id_idx = table.required_column(QUESTION_ID_COLUMN)?;
    let text_idx = table.required_column(QUESTION_TEXT_COLUMN)?;
    let mut res: Vec<(String, String)> = Vec::new();
    for row in 0..table.rows.len() {
        let id = match table.cell(row, id_idx).to_label() {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                debug!("read_prompts: row {}: no question id, skipping", row);
                continue;
            }
        };
        let prompt = table.cell(row, text_idx).to_label().unwrap_or_default();
        res.push((id, prompt));
    }
    Ok(res)
}

/// Reads the demographic columns of every row, and the answers to the
/// questions that have a column in the table.
fn read_respondents<F>(
    table: &RawTable,
    questions: &[&SurveyQuestion],
    make_answer: F,
) -> (Vec<Respondent>, BTreeSet<String>)
where
    F: Fn(&SurveyQuestion, &RawValue) -> Answer,
{
    let demo_columns: Vec<(DemographicField, usize)> = DemographicField::STORED
        .iter()
        .filter_map(|f| table.column_index(f.column()).map(|idx| (*f, idx)))
        .collect();
    for f in DemographicField::STORED {
        if table.column_index(f.column()).is_none() {
            debug!(
                "read_respondents: table {}: no column {}",
                table.name,
                f.column()
            );
        }
    }
    let age_idx = table.column_index(AGE_COLUMN);
    let question_columns: Vec<(&SurveyQuestion, usize)> = questions
        .iter()
        .filter_map(|q| table.column_index(&q.column()).map(|idx| (*q, idx)))
        .collect();
    let present: BTreeSet<String> = question_columns.iter().map(|(q, _)| q.id.clone()).collect();

    let mut res: Vec<Respondent> = Vec::new();
    for row in 0..table.rows.len() {
        let mut respondent = Respondent::new(row);
        for (field, idx) in demo_columns.iter() {
            respondent = respondent.with_demographic(*field, table.cell(row, *idx).clone());
        }
        if let Some(idx) = age_idx {
            let cell = table.cell(row, idx);
            match cell.as_number() {
                Some(age) => respondent = respondent.with_age(age),
                None if !cell.is_empty() => {
                    warn!(
                        "read_respondents: table {}: row {}: age {:?} is not a number",
                        table.name, row, cell
                    );
                }
                None => {}
            }
        }
        for (q, idx) in question_columns.iter() {
            let cell = table.cell(row, *idx);
            let answer = make_answer(*q, cell);
            respondent = respondent.with_answer(&q.id, answer);
        }
        res.push(respondent);
    }
    (res, present)
}
