use clap::Parser;

/// Explores the answers of the sandwich and soup survey: filters the respondents,
/// classifies the free-text answers and summarizes them as a chart.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration pointing to the three source tables.
    /// If not provided, the workbooks Questions.xlsx, Chat Data Numeric.xlsx and
    /// Chat Data Text.xlsx are read from the current directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (default Q1) The id of the question to summarize.
    #[clap(short, long, value_parser, default_value = "Q1")]
    pub question: String,

    /// (field=value, repeatable) Keeps only the respondents with this value. The fields are
    /// age-group, gender, region, education, income, ethnicity and marital-status. Values can
    /// be codes (gender=2) or labels (gender=Female). Repeating a field selects more values.
    #[clap(short, long, value_parser)]
    pub filter: Vec<String>,

    /// (default bar) The type of chart: bar, hbar, stacked_bar, pie or donut.
    #[clap(long, value_parser)]
    pub chart: Option<String>,

    /// (field name or 'none') Splits the counts by the values of a demographic field.
    #[clap(short, long, value_parser)]
    pub group_by: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the view will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a view in JSON format. If provided, survey_explorer will
    /// check that the computed view matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
