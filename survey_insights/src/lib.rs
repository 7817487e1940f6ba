/*!
Classification, filtering and summaries for the answers of a food survey
(is a hot dog a sandwich, is curry a soup, ...).

The entry point is [Dataset]: it is built once from the source tables, and
then answers [ViewRequest]s with a [DashboardView].

```
use survey_insights::*;

let classifier = TextClassifier::new(PatternLibrary::standard()?);
assert_eq!(
    classifier.classify(Some("Nope, it's a stew"), "Q8"),
    Label::No
);
# Ok::<(), InsightsError>(())
```

See the [manual] for the description of the tables and of the classifier.
 */

mod aggregate;
mod chart;
mod classifier;
mod config;
mod dataset;
mod demographics;
mod filter;
pub mod manual;
mod patterns;
mod questions;

pub use crate::aggregate::{aggregate, aggregate_grouped, classification_table, percentage};
pub use crate::chart::{build_chart, build_grouped_chart, no_data_chart};
pub use crate::classifier::{normalize_text, Cues, TextClassifier};
pub use crate::config::*;
pub use crate::dataset::{
    Answer, Dataset, RawTable, Respondent, QUESTION_ID_COLUMN, QUESTION_TEXT_COLUMN,
};
pub use crate::demographics::{
    age_group, canonical_labels, compare_labels, is_ordinal, normalize, normalize_str,
};
pub use crate::filter::apply_filters;
pub use crate::patterns::{
    CueList, CuePair, KeywordBucket, PatternLibrary, QuestionPatterns, SANDWICH_QUESTION,
    SOUP_QUESTION,
};
pub use crate::questions::{QuestionKind, QuestionRegistry, SurveyQuestion};
