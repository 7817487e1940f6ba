use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_QUESTIONS_FILE: &str = "Questions.xlsx";
pub const DEFAULT_NUMERIC_FILE: &str = "Chat Data Numeric.xlsx";
pub const DEFAULT_TEXT_FILE: &str = "Chat Data Text.xlsx";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub title: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// `xlsx` or `csv`
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    fn excel(file_path: &str) -> FileSource {
        FileSource {
            provider: "xlsx".to_string(),
            file_path: file_path.to_string(),
            excel_worksheet_name: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "questionsSource")]
    pub questions_source: FileSource,
    #[serde(rename = "numericSource")]
    pub numeric_source: FileSource,
    #[serde(rename = "textSource")]
    pub text_source: FileSource,
}

impl SurveyConfig {
    /// The three workbooks of the survey export, in the working directory.
    pub fn default_sources() -> SurveyConfig {
        SurveyConfig {
            output_settings: OutputSettings {
                title: "Survey explorer".to_string(),
                output_path: None,
            },
            questions_source: FileSource::excel(DEFAULT_QUESTIONS_FILE),
            numeric_source: FileSource::excel(DEFAULT_NUMERIC_FILE),
            text_source: FileSource::excel(DEFAULT_TEXT_FILE),
        }
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields() {
        let js = r#"{
            "outputSettings": {"title": "t"},
            "questionsSource": {"provider": "csv", "filePath": "q.csv"},
            "numericSource": {"provider": "xlsx", "filePath": "n.xlsx", "excelWorksheetName": "Data"},
            "textSource": {"provider": "csv", "filePath": "t.csv"}
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.output_path, None);
        assert_eq!(
            config.numeric_source.excel_worksheet_name,
            Some("Data".to_string())
        );
        assert_eq!(config.text_source.provider, "csv");
    }

    #[test]
    fn defaults_are_the_survey_workbooks() {
        let config = SurveyConfig::default_sources();
        assert_eq!(config.questions_source.file_path, "Questions.xlsx");
        assert_eq!(config.numeric_source.provider, "xlsx");
        assert_eq!(config.text_source.file_path, "Chat Data Text.xlsx");
    }
}
