//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Approved member with defaults
//!     let member = factory::member::create_member(&db).await?;
//!
//!     // Member already linked to a Discord account
//!     let linked = factory::member::MemberFactory::new(&db)
//!         .email("bob@example.com")
//!         .discord("111", "bob_d", Some("0002"))
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `member` - Create member roster entities
//! - `helpers` - Shared ID generation

pub mod helpers;
pub mod member;

// Re-export commonly used factory functions for concise usage
pub use member::{create_member, create_member_with_email};
