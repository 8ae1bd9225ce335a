// HTTP handlers grouped by domain

pub mod admin;
pub mod auth;
pub mod connections;
pub mod content;
pub mod profile;
pub mod registration;
pub mod submissions;
pub mod teammates;
pub mod teams;
