use log::debug;

use crate::config::Selections;
use crate::dataset::Respondent;
use crate::demographics::normalize_str;

/// Brings the selected values to their canonical labels and drops the
/// fields without any selected value.
pub fn normalize_selections(selections: &Selections) -> Selections {
    selections
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field, values)| {
            let norm = values.iter().map(|v| normalize_str(*field, v)).collect();
            (*field, norm)
        })
        .collect()
}

/// True if the respondent has one of the selected values for every
/// selected field.
///
/// The selections must already be normalized.
pub fn matches(respondent: &Respondent, selections: &Selections) -> bool {
    selections.iter().all(|(field, values)| {
        values.is_empty()
            || respondent
                .demographic(*field)
                .map(|v| values.contains(v))
                .unwrap_or(false)
    })
}

/// Keeps the respondents matching all the selections, in their original order.
pub fn apply_filters<'a>(
    records: &'a [Respondent],
    selections: &Selections,
) -> Vec<&'a Respondent> {
    let norm = normalize_selections(selections);
    let res: Vec<&Respondent> = records.iter().filter(|r| matches(r, &norm)).collect();
    debug!(
        "apply_filters: selections: {:?} kept {} of {}",
        norm,
        res.len(),
        records.len()
    );
    res
}
