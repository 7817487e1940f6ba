//! Canonical labels for the demographic attributes.
//!
//! The survey tables were exported with a mix of numeric codes, short codes
//! (`QC`) and long questionnaire wordings. Each of them is mapped to a single
//! canonical label. Canonical labels map to themselves, and values without a
//! mapping are passed through unchanged.

use std::cmp::Ordering;

use crate::config::{DemographicField, RawValue};

/// The mapping for one demographic attribute.
pub struct DemographicTable {
    /// Numeric codes, in the order of the questionnaire.
    pub codes: &'static [(i64, &'static str)],
    /// Alternative spellings.
    pub aliases: &'static [(&'static str, &'static str)],
    /// The canonical order, for ordinal attributes.
    pub order: Option<&'static [&'static str]>,
}

static GENDER: DemographicTable = DemographicTable {
    codes: &[(1, "Male"), (2, "Female")],
    aliases: &[],
    order: None,
};

// The short codes are what the numeric table used to hold. The full names are
// canonical so that normalizing twice gives the same answer.
static REGION: DemographicTable = DemographicTable {
    codes: &[
        (1, "Atlantic Provinces"),
        (2, "Quebec"),
        (3, "Ontario"),
        (4, "Manitoba"),
        (5, "Saskatchewan"),
        (6, "Alberta"),
        (7, "British Columbia"),
    ],
    aliases: &[
        ("ATL", "Atlantic Provinces"),
        ("QC", "Quebec"),
        ("ON", "Ontario"),
        ("MB", "Manitoba"),
        ("SK", "Saskatchewan"),
        ("AB", "Alberta"),
        ("BC", "British Columbia"),
    ],
    order: None,
};

const EDUCATION_ORDER: &[&str] = &[
    "Elementary/High School (Partial)",
    "High School Graduate",
    "College/Trade School (Partial)",
    "College/Trade School Graduate",
    "University (Partial)",
    "Bachelor's Degree",
    "Graduate Degree (Master's/PhD)",
];

static EDUCATION: DemographicTable = DemographicTable {
    codes: &[
        (1, "Elementary/High School (Partial)"),
        (2, "High School Graduate"),
        (3, "College/Trade School (Partial)"),
        (4, "College/Trade School Graduate"),
        (5, "University (Partial)"),
        (6, "Bachelor's Degree"),
        (7, "Graduate Degree (Master's/PhD)"),
    ],
    aliases: &[
        (
            "Some elementary or high school",
            "Elementary/High School (Partial)",
        ),
        ("High school graduate", "High School Graduate"),
        ("Some college/trade school", "College/Trade School (Partial)"),
        (
            "Graduated from college/trade school",
            "College/Trade School Graduate",
        ),
        ("Some university", "University (Partial)"),
        (
            "University undergraduate degree, such as a bachelor's degree",
            "Bachelor's Degree",
        ),
        (
            "University graduate degree, such as a master's or PhD",
            "Graduate Degree (Master's/PhD)",
        ),
    ],
    order: Some(EDUCATION_ORDER),
};

const INCOME_ORDER: &[&str] = &[
    "Under $25,000",
    "$25,000 to less than $50,000",
    "$50,000 to less than $100,000",
    "$100,000 to less than $150,000",
    "$150,000 to less than $200,000",
    "Over $200,000",
    "Don't know / Rather not say",
];

static INCOME: DemographicTable = DemographicTable {
    codes: &[
        (1, "Under $25,000"),
        (2, "$25,000 to less than $50,000"),
        (3, "$50,000 to less than $100,000"),
        (4, "$100,000 to less than $150,000"),
        (5, "$150,000 to less than $200,000"),
        (6, "Over $200,000"),
        (7, "Don't know / Rather not say"),
    ],
    aliases: &[],
    order: Some(INCOME_ORDER),
};

static ETHNICITY: DemographicTable = DemographicTable {
    codes: &[
        (1, "First Nations"),
        (2, "White"),
        (3, "South Asian"),
        (4, "Chinese"),
        (5, "Black"),
        (6, "Filipino"),
        (7, "Arab/West Asian"),
        (8, "Latin American"),
        (9, "Southeast Asian"),
        (10, "East Asian"),
        (11, "Multiple visible minorities"),
    ],
    aliases: &[],
    order: None,
};

static MARITAL_STATUS: DemographicTable = DemographicTable {
    codes: &[
        (1, "Single, never married"),
        (2, "Married"),
        (3, "Common law"),
        (4, "Separated"),
        (5, "Widowed"),
        (6, "Divorced"),
    ],
    aliases: &[],
    order: None,
};

/// The upper bound (inclusive) of each age group except the last one.
const AGE_GROUP_EDGES: [f64; 12] = [
    18.0, 24.0, 29.0, 34.0, 39.0, 44.0, 49.0, 54.0, 59.0, 64.0, 69.0, 74.0,
];

pub const AGE_GROUP_ORDER: &[&str] = &[
    "Under 18", "18-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54", "55-59", "60-64",
    "65-69", "70-74", "75+",
];

static AGE_GROUP: DemographicTable = DemographicTable {
    codes: &[],
    aliases: &[],
    order: Some(AGE_GROUP_ORDER),
};

pub fn table(field: DemographicField) -> &'static DemographicTable {
    match field {
        DemographicField::AgeGroup => &AGE_GROUP,
        DemographicField::Gender => &GENDER,
        DemographicField::Region => &REGION,
        DemographicField::Education => &EDUCATION,
        DemographicField::Income => &INCOME,
        DemographicField::Ethnicity => &ETHNICITY,
        DemographicField::MaritalStatus => &MARITAL_STATUS,
    }
}

impl DemographicTable {
    fn lookup_code(&self, code: i64) -> Option<&'static str> {
        self.codes
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    fn lookup_text(&self, s: &str) -> Option<&'static str> {
        let alias = self
            .aliases
            .iter()
            .find(|(a, _)| *a == s)
            .map(|(_, label)| *label);
        alias.or_else(|| {
            self.codes
                .iter()
                .find(|(_, label)| *label == s)
                .map(|(_, label)| *label)
        })
    }

    /// All the labels this table can produce, in questionnaire order.
    pub fn canonical_labels(&self) -> Vec<&'static str> {
        match self.order {
            Some(order) => order.to_vec(),
            None => self.codes.iter().map(|(_, label)| *label).collect(),
        }
    }
}

/// The labels a field can take, other than the passed-through values.
pub fn canonical_labels(field: DemographicField) -> Vec<&'static str> {
    table(field).canonical_labels()
}

/// Maps a raw cell to its canonical label.
///
/// Unknown values come back unchanged (in their string form). Only empty
/// cells have no label.
pub fn normalize(field: DemographicField, raw: &RawValue) -> Option<String> {
    let t = table(field);
    let mapped = match raw {
        RawValue::Text(s) => t.lookup_text(s),
        RawValue::Empty => None,
        x => x.as_code().and_then(|code| t.lookup_code(code)),
    };
    match mapped {
        Some(label) => Some(label.to_string()),
        None => raw.to_label(),
    }
}

/// Normalizes a value typed by a user, such as a filter selection.
///
/// Integer-looking input is treated as a code.
pub fn normalize_str(field: DemographicField, s: &str) -> String {
    let value = match RawValue::parse(s) {
        RawValue::Text(_) | RawValue::Empty => RawValue::Text(s.to_string()),
        x => x,
    };
    normalize(field, &value).unwrap_or_else(|| s.to_string())
}

pub fn is_ordinal(field: DemographicField) -> bool {
    table(field).order.is_some()
}

/// The position of a label in the canonical order of its field.
///
/// Labels outside the order (and all labels of non-ordinal fields) have no rank.
pub fn ordinal_rank(field: DemographicField, label: &str) -> Option<usize> {
    table(field)
        .order
        .and_then(|order| order.iter().position(|l| *l == label))
}

/// Compares two labels of a field: by canonical order when the field is
/// ordinal (unranked labels last), otherwise alphabetically.
pub fn compare_labels(field: DemographicField, a: &str, b: &str) -> Ordering {
    match (ordinal_rank(field, a), ordinal_rank(field, b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// The age group of an age.
///
/// The groups are right-inclusive: 18 is still "Under 18" and 24 is in
/// "18-24". Anything above 74 is "75+". Non-positive ages have no group.
pub fn age_group(age: f64) -> Option<&'static str> {
    if !age.is_finite() || age <= 0.0 {
        return None;
    }
    let idx = AGE_GROUP_EDGES
        .iter()
        .position(|edge| age <= *edge)
        .unwrap_or(AGE_GROUP_EDGES.len());
    AGE_GROUP_ORDER.get(idx).copied()
}
