// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod connection;
pub mod content;
pub mod errors;
pub mod repositories;
pub mod request;
pub mod submission;
pub mod team;
pub mod user;
