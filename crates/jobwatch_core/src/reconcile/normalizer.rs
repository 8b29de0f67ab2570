//! Raw listing record normalization.
//!
//! # Responsibility
//! - Pull source ids and display fields out of one raw record according to
//!   a fixed [`FieldLayout`].
//! - Stamp the resulting posting with its identity.
//!
//! # Invariants
//! - A record missing any required field is rejected whole; no partially
//!   filled posting is ever produced.
//! - Scalar ids may arrive as JSON strings or numbers and normalize to the
//!   same text either way.

use crate::model::identity::{IdentityHasher, Sha256Identity};
use crate::model::posting::Posting;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One record exactly as the listing source returned it.
pub type RawRecord = Value;

const CONTEST_PLACEHOLDER: &str = "{contest}";

/// Where each posting field lives inside a raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub source_id_field: String,
    pub contest_number_field: String,
    /// Array of display columns.
    pub columns_field: String,
    pub title_column: usize,
    pub department_column: usize,
    /// Detail page URL; `{contest}` is replaced by the contest number.
    pub detail_url_template: String,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            source_id_field: "jobId".to_string(),
            contest_number_field: "contestNo".to_string(),
            columns_field: "column".to_string(),
            title_column: 0,
            department_column: 2,
            detail_url_template:
                "https://mtstatejobs.taleo.net/careersection/200/jobdetail.ftl?job={contest}"
                    .to_string(),
        }
    }
}

/// A raw record did not match the field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecordError {
    NotAnObject,
    MissingField(String),
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

impl Display for MalformedRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "raw record is not a JSON object"),
            Self::MissingField(field) => write!(f, "raw record is missing `{field}`"),
            Self::InvalidField { field, expected } => {
                write!(f, "raw record field `{field}` is not {expected}")
            }
        }
    }
}

impl Error for MalformedRecordError {}

/// Converts raw records into postings.
#[derive(Debug, Clone)]
pub struct PostingNormalizer<H = Sha256Identity> {
    layout: FieldLayout,
    hasher: H,
}

impl PostingNormalizer<Sha256Identity> {
    pub fn new(layout: FieldLayout) -> Self {
        Self::with_hasher(layout, Sha256Identity)
    }
}

impl Default for PostingNormalizer<Sha256Identity> {
    fn default() -> Self {
        Self::new(FieldLayout::default())
    }
}

impl<H: IdentityHasher> PostingNormalizer<H> {
    pub fn with_hasher(layout: FieldLayout, hasher: H) -> Self {
        Self { layout, hasher }
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Normalizes one raw record.
    pub fn normalize(&self, record: &RawRecord) -> Result<Posting, MalformedRecordError> {
        let object = record.as_object().ok_or(MalformedRecordError::NotAnObject)?;
        let layout = &self.layout;

        let source_id = scalar_text(object.get(&layout.source_id_field), &layout.source_id_field)?;
        let contest_number = scalar_text(
            object.get(&layout.contest_number_field),
            &layout.contest_number_field,
        )?;

        let columns = match object.get(&layout.columns_field) {
            None | Some(Value::Null) => {
                return Err(MalformedRecordError::MissingField(
                    layout.columns_field.clone(),
                ))
            }
            Some(Value::Array(columns)) => columns,
            Some(_) => {
                return Err(MalformedRecordError::InvalidField {
                    field: layout.columns_field.clone(),
                    expected: "an array",
                })
            }
        };
        let title = self.column_text(columns, layout.title_column)?;
        let department = self.column_text(columns, layout.department_column)?;

        let detail_url = layout
            .detail_url_template
            .replace(CONTEST_PLACEHOLDER, &contest_number);

        Ok(Posting::with_hasher(
            &self.hasher,
            source_id,
            contest_number,
            title,
            department,
            detail_url,
        ))
    }

    /// Normalizes every record, stopping at the first malformed one.
    ///
    /// The error carries the zero-based position of the offending record.
    pub fn normalize_all(
        &self,
        records: &[RawRecord],
    ) -> Result<Vec<Posting>, (usize, MalformedRecordError)> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalize(record).map_err(|err| (index, err)))
            .collect()
    }

    fn column_text(&self, columns: &[Value], position: usize) -> Result<String, MalformedRecordError> {
        let field = format!("{}[{position}]", self.layout.columns_field);
        scalar_text(columns.get(position), &field)
    }
}

fn scalar_text(value: Option<&Value>, field: &str) -> Result<String, MalformedRecordError> {
    match value {
        None | Some(Value::Null) => Err(MalformedRecordError::MissingField(field.to_string())),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(_) => Err(MalformedRecordError::InvalidField {
            field: field.to_string(),
            expected: "a string or number",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldLayout, MalformedRecordError, PostingNormalizer};
    use serde_json::json;

    fn record() -> serde_json::Value {
        json!({
            "jobId": "18004",
            "contestNo": "20-0412",
            "column": ["Clerk", "Helena", "Department of Revenue", "Nov 1, 2018"]
        })
    }

    #[test]
    fn normalize_extracts_layout_fields() {
        let posting = PostingNormalizer::default().normalize(&record()).unwrap();

        assert_eq!(posting.source_id, "18004");
        assert_eq!(posting.source_contest_number, "20-0412");
        assert_eq!(posting.title, "Clerk");
        assert_eq!(posting.department, "Department of Revenue");
        assert_eq!(
            posting.detail_url,
            "https://mtstatejobs.taleo.net/careersection/200/jobdetail.ftl?job=20-0412"
        );
    }

    #[test]
    fn normalize_twice_yields_same_identity() {
        let normalizer = PostingNormalizer::default();
        let first = normalizer.normalize(&record()).unwrap();
        let second = normalizer.normalize(&record()).unwrap();
        assert_eq!(first.identity, second.identity);
    }

    #[test]
    fn numeric_and_string_ids_normalize_alike() {
        let normalizer = PostingNormalizer::default();
        let mut numeric = record();
        numeric["jobId"] = json!(18004);

        let from_text = normalizer.normalize(&record()).unwrap();
        let from_number = normalizer.normalize(&numeric).unwrap();
        assert_eq!(from_text.identity, from_number.identity);
    }

    #[test]
    fn each_identity_input_changes_identity() {
        let normalizer = PostingNormalizer::default();
        let baseline = normalizer.normalize(&record()).unwrap().identity;

        let mut edits = Vec::new();
        let mut changed = record();
        changed["jobId"] = json!("18005");
        edits.push(changed);
        let mut changed = record();
        changed["contestNo"] = json!("20-0413");
        edits.push(changed);
        let mut changed = record();
        changed["column"][0] = json!("Senior Clerk");
        edits.push(changed);
        let mut changed = record();
        changed["column"][2] = json!("Department of Labor");
        edits.push(changed);

        for edit in &edits {
            let identity = normalizer.normalize(edit).unwrap().identity;
            assert_ne!(identity, baseline, "edit did not change identity: {edit}");
        }

        let moved_url = PostingNormalizer::new(FieldLayout {
            detail_url_template: "https://jobs.example.org/{contest}".to_string(),
            ..FieldLayout::default()
        })
        .normalize(&record())
        .unwrap();
        assert_ne!(moved_url.identity, baseline);
    }

    #[test]
    fn missing_title_is_malformed() {
        let raw = json!({ "jobId": "1", "contestNo": "2", "column": [] });
        let err = PostingNormalizer::default().normalize(&raw).unwrap_err();
        assert_eq!(err, MalformedRecordError::MissingField("column[0]".to_string()));
    }

    #[test]
    fn null_id_is_malformed() {
        let mut raw = record();
        raw["contestNo"] = serde_json::Value::Null;
        let err = PostingNormalizer::default().normalize(&raw).unwrap_err();
        assert_eq!(err, MalformedRecordError::MissingField("contestNo".to_string()));
    }

    #[test]
    fn non_array_columns_are_rejected() {
        let mut raw = record();
        raw["column"] = json!("Clerk");
        let err = PostingNormalizer::default().normalize(&raw).unwrap_err();
        assert!(matches!(err, MalformedRecordError::InvalidField { ref field, .. } if field == "column"));
    }

    #[test]
    fn normalize_all_reports_first_bad_position() {
        let records = vec![record(), json!({ "jobId": "9" }), json!([])];
        let (position, err) = PostingNormalizer::default()
            .normalize_all(&records)
            .unwrap_err();
        assert_eq!(position, 1);
        assert_eq!(err, MalformedRecordError::MissingField("contestNo".to_string()));
    }
}
