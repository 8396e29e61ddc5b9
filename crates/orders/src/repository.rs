//! Persistence port for orders.
//!
//! The domain never talks to storage directly; infrastructure implements this
//! trait (in-memory for tests/dev, a database adapter in deployments).

use std::sync::Arc;

use thiserror::Error;

use storefront_core::DomainError;

use crate::order::{Order, OrderId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The stored state was rejected by the domain (e.g. identity conflict).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The backing store could not be reached or is in a bad state.
    #[error("order store unavailable: {0}")]
    Unavailable(String),
}

/// Load/store orders by identifier.
///
/// Implementations assign an id on first save and keep the owned cart together
/// with its order: saving an order saves its cart, deleting it deletes the cart.
pub trait OrderRepository: Send + Sync {
    /// Insert or update `order`, returning it as stored (with ids assigned).
    fn save(&self, order: Order) -> Result<Order, RepositoryError>;

    fn find(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    fn list(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Remove the order and its cart. Returns whether anything was removed.
    fn delete(&self, id: OrderId) -> Result<bool, RepositoryError>;
}

impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    fn save(&self, order: Order) -> Result<Order, RepositoryError> {
        (**self).save(order)
    }

    fn find(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).find(id)
    }

    fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        (**self).list()
    }

    fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        (**self).delete(id)
    }
}
