//! Endpoint construction for the assessment platform REST API.

/// Base URL used when no `api.base-url` setting has been stored
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Collection names as they appear in the API paths
pub mod collections {
    pub const STUDIES: &str = "studies";
    pub const QUESTION_POOLS: &str = "question-pools";
    pub const ASSESSMENTS: &str = "assessments";
}

/// Build a collection endpoint URL, e.g. `{base}/assessments`
pub fn collection_endpoint(base_url: &str, collection: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), collection)
}

/// Build a record endpoint URL, e.g. `{base}/assessments/{id}`
pub fn record_endpoint(base_url: &str, collection: &str, id: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), collection, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_not_doubled() {
        assert_eq!(
            collection_endpoint("http://localhost:8000/api/", collections::ASSESSMENTS),
            "http://localhost:8000/api/assessments"
        );
        assert_eq!(
            record_endpoint("http://localhost:8000/api", collections::STUDIES, "study-1"),
            "http://localhost:8000/api/studies/study-1"
        );
    }
}
