//! Request processing helpers for authentication and session state.

pub mod auth;
pub mod session;
