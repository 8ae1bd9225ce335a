// User domain module
// Participant record, profile value objects and the registration state machine

#![allow(clippy::module_inception)]

pub mod registration;
pub mod user;
pub mod value_objects;

pub use registration::RegistrationStage;
pub use user::{NewUser, Profile, ProfileUpdate, User};
pub use value_objects::{DevpostUsername, Email, ExperienceLevel, Role};
