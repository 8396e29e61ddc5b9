//! Infrastructure layer: order storage, orchestration, config.

pub mod config;
pub mod order_store;
pub mod service;


pub use config::{ConfigError, StorefrontConfig};
pub use order_store::InMemoryOrderRepository;
pub use service::{OrderService, Quote, ServiceError};
