//! Crew Dashboard Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the crew
//! dashboard backend. This crate offers a builder pattern for creating test contexts with
//! in-memory SQLite databases, member factories, Discord payload fixtures, and a fake
//! upstream server standing in for Discord and the identity provider.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection and session layer
//! - **TestError**: Error types that can occur during test setup
//! - **FakeUpstream**: Local HTTP server answering Discord OAuth and identity requests
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::Member;
//!
//! #[tokio::test]
//! async fn test_member_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(Member)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod fixture;
pub mod upstream;
