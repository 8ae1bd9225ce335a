use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::registration::RegistrationStage;
use super::value_objects::{
    normalize_tags, validate_url, DevpostUsername, Email, ExperienceLevel, Role,
};
use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_BIO_LEN: usize = 1000;

/// Public-facing profile of a participant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub looking_for_team: bool,
}

/// Partial profile edit
///
/// Absent fields are left untouched; a blank string clears an optional
/// text field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub experience_level: Option<ExperienceLevel>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub looking_for_team: Option<bool>,
}

/// Data needed to provision a user on first contact
#[derive(Debug, Clone)]
pub struct NewUser {
    pub identity_ref: String,
    pub email: Email,
    pub name: String,
    pub role: Role,
}

/// Participant record
///
/// # Invariants
/// - `portal_access_granted()` implies `registration_step() >= 3`; both are
///   derived from `stage`
/// - The stage only moves along `RegistrationStage::can_transition_to`
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub identity_ref: String,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub stage: RegistrationStage,
    pub devpost_username: Option<String>,
    pub devpost_verified: bool,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_portal_access(&self) -> bool {
        self.stage.portal_access_granted()
    }

    pub fn registration_step(&self) -> i16 {
        self.stage.step()
    }

    /// Applies a validated profile edit
    ///
    /// Every field is validated before anything is written, so a rejected
    /// edit leaves the user unchanged.
    pub fn apply_profile(&mut self, update: ProfileUpdate) -> DomainResult<()> {
        let name = update
            .name
            .map(|n| required_text("name", n, MAX_NAME_LEN))
            .transpose()?;
        let bio = update
            .bio
            .map(|b| optional_text("bio", Some(b), MAX_BIO_LEN))
            .transpose()?;
        let skills = update
            .skills
            .map(|s| normalize_tags("skills", s))
            .transpose()?;
        let interests = update
            .interests
            .map(|i| normalize_tags("interests", i))
            .transpose()?;
        let github_url = update
            .github_url
            .map(|u| validate_url("githubUrl", Some(u)))
            .transpose()?;
        let linkedin_url = update
            .linkedin_url
            .map(|u| validate_url("linkedinUrl", Some(u)))
            .transpose()?;
        let portfolio_url = update
            .portfolio_url
            .map(|u| validate_url("portfolioUrl", Some(u)))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(bio) = bio {
            self.profile.bio = bio;
        }
        if let Some(skills) = skills {
            self.profile.skills = skills;
        }
        if let Some(interests) = interests {
            self.profile.interests = interests;
        }
        if let Some(level) = update.experience_level {
            self.profile.experience_level = Some(level);
        }
        if let Some(url) = github_url {
            self.profile.github_url = url;
        }
        if let Some(url) = linkedin_url {
            self.profile.linkedin_url = url;
        }
        if let Some(url) = portfolio_url {
            self.profile.portfolio_url = url;
        }
        if let Some(looking) = update.looking_for_team {
            self.profile.looking_for_team = looking;
        }
        Ok(())
    }

    /// Step 1 -> 2: records the Devpost username and profile
    ///
    /// Re-submitting from a later stage refreshes the data without moving
    /// the stage.
    pub fn complete_registration(
        &mut self,
        devpost_username: DevpostUsername,
        profile: ProfileUpdate,
    ) -> DomainResult<()> {
        self.apply_profile(profile)?;
        self.devpost_username = Some(devpost_username.into_inner());
        if self.stage == RegistrationStage::Registered {
            self.transition(RegistrationStage::DevpostSubmitted)?;
        }
        Ok(())
    }

    /// Step 2 -> 3: participant confirms their Devpost registration
    ///
    /// Returns `false` when the participant was already past this step.
    pub fn confirm_devpost(&mut self) -> DomainResult<bool> {
        match self.stage {
            RegistrationStage::Registered => {
                Err(DomainError::rule("Complete registration first"))
            }
            RegistrationStage::DevpostSubmitted => {
                self.transition(RegistrationStage::DevpostConfirmed)?;
                self.devpost_verified = true;
                Ok(true)
            }
            RegistrationStage::DevpostConfirmed | RegistrationStage::Approved => Ok(false),
        }
    }

    /// Admin unlock; returns `false` if access was already granted
    pub fn approve(&mut self) -> DomainResult<bool> {
        if self.stage == RegistrationStage::Approved {
            return Ok(false);
        }
        self.transition(RegistrationStage::Approved)?;
        Ok(true)
    }

    /// Admin lock; the registration step stays at 3
    pub fn revoke(&mut self) -> DomainResult<()> {
        if self.stage != RegistrationStage::Approved {
            return Err(DomainError::rule("Portal access has not been granted"));
        }
        self.transition(RegistrationStage::DevpostConfirmed)
    }

    fn transition(&mut self, next: RegistrationStage) -> DomainResult<()> {
        if !self.stage.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.stage.to_string(),
                to: next.to_string(),
            });
        }
        self.stage = next;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn user_at(stage: RegistrationStage) -> User {
        let now = Utc::now();
        User {
            id: 1,
            identity_ref: "idp|ada".into(),
            email: Email::new("ada@example.com").unwrap(),
            name: "Ada".into(),
            role: Role::User,
            stage,
            devpost_username: None,
            devpost_verified: false,
            profile: Profile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn complete_registration_advances_from_step_one() {
        let mut user = user_at(RegistrationStage::Registered);
        let profile = ProfileUpdate {
            skills: Some(vec!["rust".into()]),
            ..Default::default()
        };

        user.complete_registration(DevpostUsername::new("ada").unwrap(), profile)
            .unwrap();

        assert_eq!(user.registration_step(), 2);
        assert_eq!(user.devpost_username.as_deref(), Some("ada"));
        assert_eq!(user.profile.skills, vec!["rust".to_string()]);
    }

    #[test]
    fn complete_registration_later_keeps_stage() {
        let mut user = user_at(RegistrationStage::Approved);
        user.complete_registration(
            DevpostUsername::new("ada2").unwrap(),
            ProfileUpdate::default(),
        )
        .unwrap();

        assert_eq!(user.stage, RegistrationStage::Approved);
        assert_eq!(user.devpost_username.as_deref(), Some("ada2"));
    }

    #[test]
    fn invalid_profile_leaves_user_unchanged() {
        let mut user = user_at(RegistrationStage::Registered);
        let profile = ProfileUpdate {
            bio: Some("hello".into()),
            github_url: Some("not a url".into()),
            ..Default::default()
        };

        let result = user.complete_registration(DevpostUsername::new("ada").unwrap(), profile);

        assert!(result.is_err());
        assert_eq!(user.stage, RegistrationStage::Registered);
        assert!(user.profile.bio.is_none());
        assert!(user.devpost_username.is_none());
    }

    #[test]
    fn confirm_devpost_requires_step_two() {
        let mut user = user_at(RegistrationStage::Registered);
        let err = user.confirm_devpost().unwrap_err();
        assert_eq!(err.to_string(), "Complete registration first");

        let mut user = user_at(RegistrationStage::DevpostSubmitted);
        assert!(user.confirm_devpost().unwrap());
        assert_eq!(user.registration_step(), 3);
        assert!(user.devpost_verified);
        assert!(!user.has_portal_access());
        assert!(!user.confirm_devpost().unwrap());
    }

    #[test]
    fn approve_sets_access_and_step() {
        let mut user = user_at(RegistrationStage::Registered);
        assert!(user.approve().unwrap());
        assert!(user.has_portal_access());
        assert_eq!(user.registration_step(), 3);
        assert!(!user.approve().unwrap());
    }

    #[test]
    fn revoke_keeps_step() {
        let mut user = user_at(RegistrationStage::Approved);
        user.revoke().unwrap();
        assert!(!user.has_portal_access());
        assert_eq!(user.registration_step(), 3);
        assert!(user.revoke().is_err());
    }

    #[test]
    fn blank_bio_clears() {
        let mut user = user_at(RegistrationStage::Registered);
        user.profile.bio = Some("old".into());
        user.apply_profile(ProfileUpdate {
            bio: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(user.profile.bio.is_none());
    }
}
