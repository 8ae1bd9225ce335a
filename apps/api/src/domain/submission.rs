use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};
use crate::domain::user::value_objects::validate_url;

/// A team's project entry; one per team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub team_id: i64,
    pub project_name: String,
    pub description: Option<String>,
    pub devpost_url: String,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    pub submitted_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    pub project_name: String,
    pub description: Option<String>,
    pub devpost_url: String,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
}

impl SubmissionDraft {
    /// # Business Rules Enforced
    /// - Project name must not be empty
    /// - A Devpost project link is required
    /// - Optional links must be http(s) URLs
    pub fn validate(self) -> DomainResult<Self> {
        let devpost_url = validate_url("devpostUrl", Some(self.devpost_url))?
            .ok_or_else(|| DomainError::validation("devpostUrl cannot be empty"))?;
        Ok(Self {
            project_name: required_text("projectName", self.project_name, 120)?,
            description: optional_text("description", self.description, 5000)?,
            devpost_url,
            repository_url: validate_url("repositoryUrl", self.repository_url)?,
            demo_url: validate_url("demoUrl", self.demo_url)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(devpost_url: &str) -> SubmissionDraft {
        SubmissionDraft {
            project_name: "Compost Copilot".into(),
            description: None,
            devpost_url: devpost_url.into(),
            repository_url: Some("".into()),
            demo_url: None,
        }
    }

    #[test]
    fn devpost_link_required() {
        assert!(draft("").validate().is_err());
        let ok = draft("https://devpost.com/software/compost-copilot")
            .validate()
            .unwrap();
        assert_eq!(ok.repository_url, None);
    }
}
