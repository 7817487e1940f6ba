use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_insights::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "The workbook {path} has multiple worksheets ({names}), use the excelWorksheetName option"
    ))]
    MultipleWorksheets { path: String, names: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV file {path} at line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Unknown provider {provider:?}, expected xlsx or csv"))]
    UnknownProvider { provider: String },
    #[snafu(display("Invalid filter {filter:?}, expected field=value"))]
    InvalidFilter { filter: String },
    #[snafu(display("Unknown chart type {chart:?}"))]
    InvalidChart { chart: String },
    #[snafu(display("Unknown demographic field {field:?}"))]
    InvalidGroupBy { field: String },
    #[snafu(display("Error building the dataset"))]
    BuildingDataset { source: InsightsError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

fn parse_filter(filter: &str) -> SurveyResult<(DemographicField, String)> {
    let (field_s, value) = filter
        .split_once('=')
        .context(InvalidFilterSnafu { filter })?;
    let field = DemographicField::parse(field_s).context(InvalidFilterSnafu { filter })?;
    let value = value.trim();
    ensure!(!value.is_empty(), InvalidFilterSnafu { filter });

    let canonical = normalize_str(field, value);
    if !canonical_labels(field).contains(&canonical.as_str()) {
        warn!(
            "parse_filter: {} is not a known value for {}, known values: {:?}",
            value,
            field,
            canonical_labels(field)
        );
    }
    Ok((field, value.to_string()))
}

/// Each filter is `field=value`. Repeating a field selects more values.
pub fn parse_filters(filters: &[String]) -> SurveyResult<Selections> {
    let mut selections = Selections::new();
    for f in filters {
        let (field, value) = parse_filter(f)?;
        selections.entry(field).or_default().insert(value);
    }
    debug!("parse_filters: {:?}", selections);
    Ok(selections)
}

pub fn build_request(args: &Args) -> SurveyResult<ViewRequest> {
    let mut request = ViewRequest::new(args.question.trim());
    request.selections = parse_filters(&args.filter)?;
    if let Some(chart) = &args.chart {
        request.chart_kind = ChartKind::parse(chart).context(InvalidChartSnafu { chart })?;
    }
    request.group_by = match args.group_by.as_deref().map(|s| s.trim()) {
        None | Some("") | Some("none") => None,
        Some(field) => {
            let field = DemographicField::parse(field).context(InvalidGroupBySnafu { field })?;
            Some(field)
        }
    };
    Ok(request)
}

fn read_table(root: &Path, cfs: &FileSource) -> SurveyResult<RawTable> {
    let path = io_common::resolve_path(root, &cfs.file_path);
    info!("Attempting to read table {:?}", path);
    match cfs.provider.as_str() {
        "xlsx" => io_excel::read_excel_table(&path, cfs),
        "csv" => io_csv::read_csv_table(&path),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

pub fn load_dataset(config: &SurveyConfig, root: &Path) -> SurveyResult<Dataset> {
    let questions = read_table(root, &config.questions_source)?;
    let numeric = read_table(root, &config.numeric_source)?;
    let text = read_table(root, &config.text_source)?;
    let classifier =
        TextClassifier::new(PatternLibrary::standard().context(BuildingDatasetSnafu {})?);
    Dataset::from_tables(&questions, &numeric, &text, &classifier).context(BuildingDatasetSnafu {})
}

fn chart_to_json(chart: &ChartSpec) -> JSValue {
    let groups: Option<Vec<JSValue>> = chart.groups.as_ref().map(|gs| {
        gs.iter()
            .map(|g| json!({"group": g.group, "values": g.values}))
            .collect()
    });
    json!({
        "kind": chart.kind.name(),
        "title": chart.title,
        "xAxisTitle": chart.x_axis_title,
        "yAxisTitle": chart.y_axis_title,
        "categories": chart.categories,
        "values": chart.values,
        "groups": groups,
    })
}

fn request_to_json(request: &ViewRequest) -> JSValue {
    let mut filters: JSMap<String, JSValue> = JSMap::new();
    for (field, values) in request.selections.iter() {
        filters.insert(field.name().to_string(), json!(values));
    }
    json!({
        "question": request.question_id,
        "chart": request.chart_kind.name(),
        "groupBy": request.group_by.map(|f| f.name()),
        "filters": filters,
    })
}

fn classification_to_json(table: &ClassificationTable) -> JSValue {
    let rows: Vec<JSValue> = table
        .rows
        .iter()
        .map(|r| {
            json!({
                "label": r.label.as_str(),
                "glyph": r.label.glyph(),
                "count": r.count,
                "percentage": r.percentage,
            })
        })
        .collect();
    json!({"rows": rows, "unclassified": table.unclassified})
}

fn build_view_js(
    settings: &OutputSettings,
    request: &ViewRequest,
    view: &DashboardView,
) -> JSValue {
    match view {
        DashboardView::NoData {
            question_id,
            chart,
            message,
            reason,
        } => json!({
            "title": settings.title,
            "request": request_to_json(request),
            "status": "noData",
            "question": {"id": question_id},
            "reason": reason.name(),
            "message": message,
            "chart": chart_to_json(chart),
        }),
        DashboardView::Chart(cv) => {
            let tallies: Vec<JSValue> = cv
                .tallies
                .iter()
                .map(|t| json!({"label": t.label, "count": t.count, "percentage": t.percentage}))
                .collect();
            let grouped: Option<Vec<JSValue>> = cv.grouped.as_ref().map(|gs| {
                gs.iter()
                    .map(|g| json!({"label": g.label, "group": g.group, "count": g.count}))
                    .collect()
            });
            let responses: Vec<JSValue> = cv
                .responses
                .iter()
                .map(|r| {
                    json!({
                        "row": r.row,
                        "text": r.text,
                        "label": r.label.as_str(),
                        "glyph": r.label.glyph(),
                    })
                })
                .collect();
            json!({
                "title": settings.title,
                "request": request_to_json(request),
                "status": "chart",
                "question": {"id": cv.question_id, "prompt": cv.prompt},
                "chart": chart_to_json(&cv.chart),
                "total": cv.total,
                "tallies": tallies,
                "grouped": grouped,
                "classification": cv.classification.as_ref().map(classification_to_json),
                "responses": responses,
            })
        }
    }
}

fn write_output(out: Option<String>, root: &Path, contents: &str) -> SurveyResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some(p) => {
            let path = io_common::resolve_path(root, p);
            info!("Writing the view to {:?}", path);
            fs::write(&path, contents).context(WritingOutputSnafu { path })
        }
    }
}

fn check_reference(reference_path: &str, pretty_js_view: &str) -> SurveyResult<()> {
    let reference = read_summary(reference_path)?;
    let pretty_js_reference =
        serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_js_reference != pretty_js_view {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(pretty_js_reference.as_str(), pretty_js_view, "\n");
        whatever!("Difference detected between the view and the reference")
    }
    Ok(())
}

pub fn run_dashboard(args: &Args) -> SurveyResult<()> {
    let (config, root): (SurveyConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => {
            info!("No configuration provided, reading the default workbooks");
            (SurveyConfig::default_sources(), PathBuf::from("."))
        }
    };
    info!("config: {:?}", config);

    let request = build_request(args)?;
    let dataset = load_dataset(&config, &root)?;
    let view = dataset.view(&request);
    debug!("run_dashboard: view: {:?}", view);

    let view_js = build_view_js(&config.output_settings, &request, &view);
    let pretty_js_view = serde_json::to_string_pretty(&view_js).context(ParsingJsonSnafu {})?;

    // The command line takes precedence over the configuration.
    let out = args
        .out
        .clone()
        .or_else(|| config.output_settings.output_path.clone());
    write_output(out, &root, &pretty_js_view)?;

    // The reference view, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js_view)?;
    }
    Ok(())
}

#[cfg(test)]
fn test_args(question: &str, filters: &[&str], chart: &str, group_by: Option<&str>) -> Args {
    Args {
        config: None,
        question: question.to_string(),
        filter: filters.iter().map(|s| s.to_string()).collect(),
        chart: Some(chart.to_string()),
        group_by: group_by.map(|s| s.to_string()),
        out: None,
        reference: None,
        verbose: false,
    }
}

/// Runs a request against the tables of `tests/data/survey` and compares the
/// view with `tests/data/survey/<test_name>_expected.json`.
#[cfg(test)]
pub fn test_wrapper(
    test_name: &str,
    question: &str,
    filters: &[&str],
    chart: &str,
    group_by: Option<&str>,
) {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir = format!("{}/tests/data/survey", env!("CARGO_MANIFEST_DIR"));
    info!("Running test {}", test_name);
    let mut args = test_args(question, filters, chart, group_by);
    args.config = Some(format!("{}/survey_config.json", test_dir));
    args.reference = Some(format!("{}/{}_expected.json", test_dir, test_name));
    let res = run_dashboard(&args);
    if let Err(e) = &res {
        eprintln!("An error occured {}", e);
    }
    assert!(res.is_ok(), "test {} failed", test_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soup_overview() {
        test_wrapper("soup_overview", "Q8", &[], "bar", None);
    }

    #[test]
    fn soup_by_age() {
        test_wrapper("soup_by_age", "Q8", &[], "hbar", Some("age-group"));
    }

    #[test]
    fn pizza_by_gender() {
        test_wrapper("pizza_by_gender", "Q9", &["gender=2"], "donut", None);
    }

    #[test]
    fn hot_dog_by_income() {
        test_wrapper(
            "hot_dog_by_income",
            "Q1",
            &[],
            "stacked_bar",
            Some("HHINCOME"),
        );
    }

    #[test]
    fn empty_filter() {
        test_wrapper("empty_filter", "Q1", &["region=Yukon"], "pie", None);
    }

    #[test]
    fn unknown_question() {
        test_wrapper("unknown_question", "Q42", &[], "bar", None);
    }

    #[test]
    fn filters() {
        let sel = parse_filters(&[
            "gender=Female".to_string(),
            "gender=1".to_string(),
            "HHINCOME=Under $25,000".to_string(),
        ])
        .unwrap();
        assert_eq!(sel.len(), 2);
        assert_eq!(sel[&DemographicField::Gender].len(), 2);
        assert!(sel[&DemographicField::Income].contains("Under $25,000"));

        assert!(matches!(
            parse_filters(&["gender".to_string()]),
            Err(SurveyError::InvalidFilter { .. })
        ));
        assert!(matches!(
            parse_filters(&["shoe=42".to_string()]),
            Err(SurveyError::InvalidFilter { .. })
        ));
        assert!(matches!(
            parse_filters(&["gender= ".to_string()]),
            Err(SurveyError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn requests() {
        let request = build_request(&test_args("Q8", &[], "donut", Some("none"))).unwrap();
        assert_eq!(request.chart_kind, ChartKind::Donut);
        assert_eq!(request.group_by, None);

        let request = build_request(&test_args("Q8", &[], "bar", Some("education"))).unwrap();
        assert_eq!(request.group_by, Some(DemographicField::Education));

        assert!(matches!(
            build_request(&test_args("Q8", &[], "radar", None)),
            Err(SurveyError::InvalidChart { .. })
        ));
        assert!(matches!(
            build_request(&test_args("Q8", &[], "bar", Some("height"))),
            Err(SurveyError::InvalidGroupBy { .. })
        ));
    }

    #[test]
    fn unknown_provider() {
        let cfs = FileSource {
            provider: "parquet".to_string(),
            file_path: "x.parquet".to_string(),
            excel_worksheet_name: None,
        };
        assert!(matches!(
            read_table(Path::new(""), &cfs),
            Err(SurveyError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn missing_required_column() {
        let test_dir = format!("{}/tests/data/broken", env!("CARGO_MANIFEST_DIR"));
        let config = read_config(&format!("{}/broken_config.json", test_dir)).unwrap();
        let res = load_dataset(&config, Path::new(&test_dir));
        assert!(matches!(
            res,
            Err(SurveyError::BuildingDataset {
                source: InsightsError::MissingColumn { .. }
            })
        ));
    }
}
