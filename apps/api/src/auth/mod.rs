// Authentication and authorization
// Token verification lives in jwt; the action -> requirement table in policy

pub mod jwt;
pub mod policy;

pub use policy::{authorize, Action, PolicyViolation, Requirement};
