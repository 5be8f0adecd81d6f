//! Business logic layer.
//!
//! Services orchestrate repositories and upstream HTTP calls and work with domain
//! models rather than DTOs.

pub mod auth;
pub mod invite;
pub mod link;
pub mod link_state;
pub mod member;
