// Team domain module
// Contains the team aggregate, membership rows and invitations

#![allow(clippy::module_inception)]

pub mod invitation;
pub mod team;
pub mod value_objects;

// Re-export main types for convenience
pub use invitation::TeamInvitation;
pub use team::{Team, TeamDraft, TeamInput, TeamMember, TeamSummary};
pub use value_objects::TeamRole;
