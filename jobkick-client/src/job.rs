//! Job identifiers and claim results

use reqwest::StatusCode;
use std::fmt;

/// Opaque identifier of a claimed job
///
/// Never empty and never padded with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Parses a claim response body into a job identifier
    ///
    /// Returns `None` when the trimmed body is empty.
    pub fn parse(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a claim call that reached the queue service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// 200 with a job identifier in the body
    Job(JobId),
    /// 204, the queue has nothing to hand out
    Empty,
    /// 200 with an empty or whitespace-only body
    Blank,
    /// Any other status code
    Unexpected(StatusCode),
}

impl ClaimOutcome {
    /// Classifies a claim response from its status and body text
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::NO_CONTENT => Self::Empty,
            StatusCode::OK => match JobId::parse(body) {
                Some(job_id) => Self::Job(job_id),
                None => Self::Blank,
            },
            other => Self::Unexpected(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_is_trimmed() {
        let job_id = JobId::parse("  job-42\r\n").unwrap();
        assert_eq!(job_id.as_str(), "job-42");
        assert_eq!(job_id.to_string(), "job-42");
    }

    #[test]
    fn test_blank_job_id_is_rejected() {
        assert!(JobId::parse("").is_none());
        assert!(JobId::parse(" \n\t ").is_none());
    }

    #[test]
    fn test_claim_outcome_classification() {
        assert_eq!(
            ClaimOutcome::from_response(StatusCode::OK, "job-42\n"),
            ClaimOutcome::Job(JobId::parse("job-42").unwrap())
        );
        assert_eq!(
            ClaimOutcome::from_response(StatusCode::NO_CONTENT, ""),
            ClaimOutcome::Empty
        );
        assert_eq!(
            ClaimOutcome::from_response(StatusCode::OK, "   "),
            ClaimOutcome::Blank
        );
        assert_eq!(
            ClaimOutcome::from_response(StatusCode::SERVICE_UNAVAILABLE, "busy"),
            ClaimOutcome::Unexpected(StatusCode::SERVICE_UNAVAILABLE)
        );
    }

    #[test]
    fn test_no_content_ignores_body() {
        assert_eq!(
            ClaimOutcome::from_response(StatusCode::NO_CONTENT, "job-1"),
            ClaimOutcome::Empty
        );
    }
}
