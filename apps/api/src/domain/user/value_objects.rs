use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::domain::errors::{DomainError, DomainResult};

/// Maximum number of entries kept in a skills or interests set
pub const MAX_TAGS: usize = 20;

/// Maximum length of a single skill or interest tag
pub const MAX_TAG_LEN: usize = 40;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
/// - Stored lowercased and trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use hackathon_portal_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" Hacker@Example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "hacker@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> DomainResult<Self> {
        let email = email.into().trim().to_lowercase();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(DomainError::validation(format!("Invalid email: {}", email)))
        }
    }

    fn is_valid(email: &str) -> bool {
        email.contains('@') && email.len() >= 3
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part before the '@'
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Portal role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Self-reported hacking experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "experience_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Devpost handle submitted during registration
///
/// Only the format is checked; nothing confirms the account exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevpostUsername(String);

impl DevpostUsername {
    pub fn new(username: impl Into<String>) -> DomainResult<Self> {
        let username = username.into().trim().trim_start_matches('@').to_string();
        if username.is_empty() || username.len() > 64 {
            return Err(DomainError::validation(
                "Devpost username must be between 1 and 64 characters",
            ));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
        if !username.chars().all(allowed) {
            return Err(DomainError::validation(
                "Devpost username may only contain letters, digits, '-', '_' and '.'",
            ));
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Checks that an optional link is an absolute http(s) URL
///
/// Blank strings are treated as "no link".
pub fn validate_url(field: &str, url: Option<String>) -> DomainResult<Option<String>> {
    let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    match Url::parse(&url) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() =>
        {
            Ok(Some(url))
        }
        _ => Err(DomainError::validation(format!(
            "{} must be an http(s) URL",
            field
        ))),
    }
}

/// Trims, de-duplicates (case-insensitively) and bounds a skills/interests set
pub fn normalize_tags(field: &str, tags: Vec<String>) -> DomainResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(DomainError::validation(format!(
                "{} entries must be at most {} characters",
                field, MAX_TAG_LEN
            )));
        }
        if !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    if out.len() > MAX_TAGS {
        return Err(DomainError::validation(format!(
            "At most {} {} allowed",
            MAX_TAGS, field
        )));
    }
    Ok(out)
}
