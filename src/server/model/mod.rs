//! Domain models and operation-specific parameter types.
//!
//! Repositories convert entity models into these types at the data boundary and
//! controllers convert them into DTOs at the HTTP boundary.

pub mod discord;
pub mod link;
pub mod member;
