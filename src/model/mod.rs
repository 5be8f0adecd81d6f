//! Data transfer objects shared with the dashboard front end.
//!
//! These types define the JSON bodies of the HTTP API. Server-side domain models
//! convert into them at the controller boundary.

pub mod api;
pub mod auth;
pub mod discord;
pub mod member;
