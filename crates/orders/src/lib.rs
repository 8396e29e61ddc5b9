//! Orders domain module.
//!
//! This crate contains the business rules for customer orders, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage). Storage
//! is reached through the [`OrderRepository`] port, implemented elsewhere.

pub mod order;
pub mod pricing;
pub mod repository;

pub use order::{Order, OrderId, OrderStatus};
pub use pricing::DiscountPolicy;
pub use repository::{OrderRepository, RepositoryError};
