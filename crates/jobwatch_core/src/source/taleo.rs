//! Taleo job-board search client.
//!
//! # Invariants
//! - Exactly one search request per `fetch_postings` call, first page only.
//! - Only the `requisitionList` array of the response is handed onwards.

use crate::reconcile::normalizer::RawRecord;
use crate::source::{ListingSource, SourceError};
use log::{error, info};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Search endpoint and filter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaleoConfig {
    pub endpoint: String,
    /// `LOCATION` filter value (Helena, MT by default).
    pub location_id: String,
    /// `JOB_FIELD` filter value (information technology by default).
    pub job_field_id: String,
    pub timeout: Duration,
}

impl Default for TaleoConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://mtstatejobs.taleo.net/careersection/rest/jobboard/searchjobs?lang=en&portal=101430233".to_string(),
            location_id: "20300100198".to_string(),
            job_field_id: "7000100198".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking client for the Taleo `searchjobs` endpoint.
pub struct TaleoSource {
    config: TaleoConfig,
    client: Client,
}

impl TaleoSource {
    pub fn new(config: TaleoConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| SourceError::Config(err.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TaleoConfig {
        &self.config
    }

    /// Search request body sorted by posting date, filtered by location and
    /// job field.
    pub fn search_payload(&self) -> Value {
        json!({
            "multilineEnabled": "false",
            "sortingSelection": {
                "sortBySelectionParam": "5",
                "ascendingSortingOrder": "true"
            },
            "fieldData": {
                "fields": { "KEYWORD": "", "LOCATION": "", "ORGANIZATION": "" },
                "valid": "true"
            },
            "filterSelectionParam": {
                "searchFilterSelections": [
                    { "id": "POSTING_DATE", "selectedValues": [] },
                    { "id": "LOCATION", "selectedValues": [self.config.location_id] },
                    { "id": "JOB_FIELD", "selectedValues": [self.config.job_field_id] }
                ]
            },
            "advancedSearchFiltersSelectionParam": {
                "searchFilterSelections": [
                    { "id": "ORGANIZATION", "selectedValues": [] },
                    { "id": "LOCATION", "selectedValues": [] },
                    { "id": "JOB_FIELD", "selectedValues": [] },
                    { "id": "STUDY_LEVEL", "selectedValues": [] },
                    { "id": "WILL_TRAVEL", "selectedValues": [] },
                    { "id": "JOB_SHIFT", "selectedValues": [] }
                ]
            },
            "pageNo": 1
        })
    }

    fn request(&self) -> Result<Vec<RawRecord>, SourceError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(ACCEPT, "application/json")
            .json(&self.search_payload())
            .send()
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body: Value = response
            .json()
            .map_err(|err| SourceError::Decode(err.to_string()))?;
        extract_requisitions(body)
    }
}

impl ListingSource for TaleoSource {
    fn name(&self) -> &'static str {
        "taleo"
    }

    fn fetch_postings(&self) -> Result<Vec<RawRecord>, SourceError> {
        let started_at = Instant::now();
        match self.request() {
            Ok(records) => {
                info!(
                    "event=source_fetch module=source status=ok source=taleo records={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    "event=source_fetch module=source status=error source=taleo duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

fn extract_requisitions(body: Value) -> Result<Vec<RawRecord>, SourceError> {
    let Value::Object(mut object) = body else {
        return Err(SourceError::Decode(
            "response body is not a JSON object".to_string(),
        ));
    };
    match object.remove("requisitionList") {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(SourceError::Decode(
            "`requisitionList` is not an array".to_string(),
        )),
        None => Err(SourceError::Decode(
            "response is missing `requisitionList`".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_requisitions, TaleoConfig, TaleoSource};
    use crate::source::SourceError;
    use serde_json::json;

    #[test]
    fn payload_carries_configured_filters() {
        let source = TaleoSource::new(TaleoConfig {
            location_id: "LOC-1".to_string(),
            job_field_id: "FIELD-9".to_string(),
            ..TaleoConfig::default()
        })
        .unwrap();

        let payload = source.search_payload();
        let filters = &payload["filterSelectionParam"]["searchFilterSelections"];
        assert_eq!(filters[1]["id"], "LOCATION");
        assert_eq!(filters[1]["selectedValues"][0], "LOC-1");
        assert_eq!(filters[2]["selectedValues"][0], "FIELD-9");
        assert_eq!(payload["pageNo"], 1);
    }

    #[test]
    fn extract_requires_requisition_array() {
        let records = extract_requisitions(json!({ "requisitionList": [{ "jobId": "1" }] })).unwrap();
        assert_eq!(records.len(), 1);

        let err = extract_requisitions(json!({ "jobs": [] })).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));

        let err = extract_requisitions(json!([1, 2])).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
