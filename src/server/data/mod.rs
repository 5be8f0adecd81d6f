//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models to keep
//! the data layer separate from business logic. All member queries and updates go
//! through these repositories.

pub mod member;

#[cfg(test)]
mod test;
