use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::value_objects::TeamRole;
use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};

pub const MIN_TEAM_SIZE: i32 = 2;
pub const MAX_TEAM_SIZE: i32 = 6;
pub const DEFAULT_TEAM_SIZE: i32 = 4;

/// Team fields as submitted by a client
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    pub name: String,
    pub description: Option<String>,
    pub project_idea: Option<String>,
    pub max_members: Option<i32>,
}

/// Validated team fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    pub name: String,
    pub description: Option<String>,
    pub project_idea: Option<String>,
    pub max_members: i32,
}

impl TeamDraft {
    /// Validates client input
    ///
    /// # Business Rules Enforced
    /// - Name must not be empty (max 80 characters)
    /// - Size limit must be between 2 and 6, defaulting to 4
    ///
    /// # Example
    /// ```
    /// use hackathon_portal_api::domain::team::{TeamDraft, TeamInput};
    ///
    /// let draft = TeamDraft::new(TeamInput {
    ///     name: "Null Pointers".to_string(),
    ///     description: None,
    ///     project_idea: None,
    ///     max_members: None,
    /// })
    /// .expect("valid team");
    ///
    /// assert_eq!(draft.max_members, 4);
    /// ```
    pub fn new(input: TeamInput) -> DomainResult<Self> {
        let max_members = input.max_members.unwrap_or(DEFAULT_TEAM_SIZE);
        if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&max_members) {
            return Err(DomainError::validation(format!(
                "Team size must be between {} and {}",
                MIN_TEAM_SIZE, MAX_TEAM_SIZE
            )));
        }

        Ok(Self {
            name: required_text("Team name", input.name, 80)?,
            description: optional_text("description", input.description, 1000)?,
            project_idea: optional_text("projectIdea", input.project_idea, 2000)?,
            max_members,
        })
    }
}

/// Team aggregate root
///
/// # Invariants
/// - Name cannot be empty
/// - `max_members` stays within 2..=6 and never below the current head count
#[derive(Debug, Clone)]
pub struct Team {
    id: i64,
    name: String,
    description: Option<String>,
    project_idea: Option<String>,
    max_members: i32,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Replaces the editable fields
    ///
    /// Fails if the new size limit is below the current number of members.
    pub fn apply(&mut self, draft: TeamDraft, member_count: i64) -> DomainResult<()> {
        if i64::from(draft.max_members) < member_count {
            return Err(DomainError::rule(format!(
                "Team already has {} members",
                member_count
            )));
        }
        self.name = draft.name;
        self.description = draft.description;
        self.project_idea = draft.project_idea;
        self.max_members = draft.max_members;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_full(&self, member_count: i64) -> bool {
        member_count >= i64::from(self.max_members)
    }

    // ===== Getters =====

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn project_idea(&self) -> Option<&str> {
        self.project_idea.as_deref()
    }

    pub fn max_members(&self) -> i32 {
        self.max_members
    }

    pub fn created_by(&self) -> i64 {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Team from stored data
    ///
    /// Only to be used by repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: i64,
        name: String,
        description: Option<String>,
        project_idea: Option<String>,
        max_members: i32,
        created_by: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            project_idea,
            max_members,
            created_by,
            created_at,
            updated_at,
        }
    }
}

/// Membership row linking a user to a team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub team_id: i64,
    pub user_id: i64,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn is_leader(&self) -> bool {
        self.role == TeamRole::Leader
    }
}

/// Team with its head count, as listed in the team directory
#[derive(Debug, Clone)]
pub struct TeamSummary {
    pub team: Team,
    pub member_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, max_members: Option<i32>) -> TeamInput {
        TeamInput {
            name: name.to_string(),
            description: Some("  ".to_string()),
            project_idea: Some("AI for compost".to_string()),
            max_members,
        }
    }

    fn team(max_members: i32) -> Team {
        let now = Utc::now();
        Team::from_persistence(7, "Crabs".into(), None, None, max_members, 1, now, now)
    }

    #[test]
    fn draft_defaults_size_and_trims() {
        let draft = TeamDraft::new(input(" Crabs ", None)).unwrap();
        assert_eq!(draft.name, "Crabs");
        assert_eq!(draft.max_members, DEFAULT_TEAM_SIZE);
        assert_eq!(draft.description, None);
        assert_eq!(draft.project_idea.as_deref(), Some("AI for compost"));
    }

    #[test]
    fn draft_with_empty_name_fails() {
        let err = TeamDraft::new(input("", None)).unwrap_err();
        assert!(err.to_string().contains("Team name cannot be empty"));
    }

    #[test]
    fn draft_size_bounds() {
        assert!(TeamDraft::new(input("a", Some(1))).is_err());
        assert!(TeamDraft::new(input("a", Some(7))).is_err());
        assert!(TeamDraft::new(input("a", Some(2))).is_ok());
        assert!(TeamDraft::new(input("a", Some(6))).is_ok());
    }

    #[test]
    fn full_team() {
        let team = team(3);
        assert!(!team.is_full(2));
        assert!(team.is_full(3));
    }

    #[test]
    fn cannot_shrink_below_head_count() {
        let mut team = team(4);
        let draft = TeamDraft::new(input("Crabs", Some(2))).unwrap();
        assert!(team.apply(draft, 3).is_err());
        assert_eq!(team.max_members(), 4);

        let draft = TeamDraft::new(input("Lobsters", Some(3))).unwrap();
        team.apply(draft, 3).unwrap();
        assert_eq!(team.name(), "Lobsters");
        assert_eq!(team.max_members(), 3);
    }
}
