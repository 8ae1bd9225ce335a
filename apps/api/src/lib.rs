//! Hackathon Portal API Library
//!
//! This library provides the core functionality for the hackathon portal:
//! participant registration, teams, connections, event content and the
//! admin approval workflow, including domain logic, repositories, and the
//! HTTP router.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
