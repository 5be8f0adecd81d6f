//! HTTP request handlers.
//!
//! Controllers enforce access control, validate and convert DTOs, call services and
//! convert domain models back into DTOs.

pub mod auth;
pub mod discord;

#[cfg(test)]
mod test;
