//! Test fixtures providing reusable test data without database insertion.
//!
//! Unlike factories, fixtures do NOT insert data into the database. They build the
//! JSON payloads that upstream services return so tests can feed them to
//! [`crate::upstream::FakeUpstream`] or decode them directly.

pub mod discord;
