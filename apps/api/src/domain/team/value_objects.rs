use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a member inside a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    /// Creator of the team; manages members and invitations
    Leader,
    Member,
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamRole::Leader => write!(f, "leader"),
            TeamRole::Member => write!(f, "member"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TeamRole::Leader).unwrap(), "\"leader\"");
        assert_eq!(TeamRole::Member.to_string(), "member");
    }
}
