//! SeaORM entities for the crew dashboard database.

pub mod prelude;

pub mod member;
