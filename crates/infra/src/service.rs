//! Order orchestration (application-level).
//!
//! `OrderService` is the one place that loads an order, runs a domain
//! operation on it and saves it back:
//!
//! ```text
//! request
//!   ↓
//! 1. Load order from repository (NotFound if missing)
//!   ↓
//! 2. Run the domain operation (pure, may reject)
//!   ↓
//! 3. Save the order (ids assigned on first save)
//! ```
//!
//! Rejected operations never reach step 3, so storage only ever sees states
//! the domain accepted. The service holds no lock across the three steps;
//! callers that share an order across threads serialize access themselves.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use storefront_cart::Cart;
use storefront_core::{Clock, DomainError, Money};
use storefront_orders::{DiscountPolicy, Order, OrderId, OrderRepository, RepositoryError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Pricing was requested for an order that has no cart.
    #[error("order {0} has no cart")]
    MissingCart(OrderId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Price breakdown of an order under the service's discount policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

/// Runs order use cases against a repository with an injected clock.
#[derive(Debug)]
pub struct OrderService<R, C> {
    repository: R,
    clock: C,
    policy: DiscountPolicy,
}

impl<R, C> OrderService<R, C>
where
    R: OrderRepository,
    C: Clock,
{
    pub fn new(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            policy: DiscountPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DiscountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &DiscountPolicy {
        &self.policy
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create and save a new order with an empty cart.
    pub fn open(&self, number: impl Into<String>) -> Result<Order, ServiceError> {
        let mut order = Order::with_number(number);
        order.create_order();
        let order = self.repository.save(order)?;
        info!(order_id = ?order.id(), number = ?order.number(), "order opened");
        Ok(order)
    }

    pub fn get(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.repository.find(id)?.ok_or(ServiceError::NotFound(id))
    }

    pub fn list(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.repository.list()?)
    }

    /// Add units to the order's cart, attaching a cart first if it has none.
    pub fn add_item(
        &self,
        id: OrderId,
        sku: &str,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Order, ServiceError> {
        self.update(id, "add_item", |order| {
            match order.cart_mut()? {
                Some(cart) => cart.add_item(sku, quantity, unit_price),
                None => {
                    let mut cart = Cart::new();
                    cart.add_item(sku, quantity, unit_price)?;
                    order.set_cart(cart)
                }
            }
        })
    }

    pub fn replace_cart(&self, id: OrderId, cart: Cart) -> Result<Order, ServiceError> {
        self.update(id, "replace_cart", |order| order.set_cart(cart))
    }

    pub fn checkout(&self, id: OrderId) -> Result<Order, ServiceError> {
        let clock = &self.clock;
        self.update(id, "checkout", |order| order.checkout(clock))
    }

    pub fn close(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.update(id, "close", |order| {
            order.close();
            Ok(())
        })
    }

    /// Price breakdown without mutating the order.
    pub fn quote(&self, id: OrderId) -> Result<Quote, ServiceError> {
        let order = self.get(id)?;
        let Some(cart) = order.cart() else {
            warn!(order_id = %id, "quote requested for order without cart");
            return Err(ServiceError::MissingCart(id));
        };

        let subtotal = cart.total_price();
        Ok(Quote {
            subtotal,
            discount: self.policy.discount_for(subtotal),
            total: self.policy.price_for(subtotal),
        })
    }

    /// Delete the order together with its cart.
    pub fn remove(&self, id: OrderId) -> Result<bool, ServiceError> {
        let removed = self.repository.delete(id)?;
        info!(order_id = %id, removed, "order removed");
        Ok(removed)
    }

    fn update<F>(&self, id: OrderId, operation: &'static str, f: F) -> Result<Order, ServiceError>
    where
        F: FnOnce(&mut Order) -> Result<(), DomainError>,
    {
        let mut order = self.get(id)?;

        if let Err(err) = f(&mut order) {
            warn!(
                order_id = %id,
                operation,
                status = ?order.status(),
                business_rule = err.is_business_rejection(),
                error = %err,
                "order operation rejected"
            );
            return Err(err.into());
        }

        let order = self.repository.save(order)?;
        info!(order_id = %id, operation, status = ?order.status(), issue_date = ?order.issue_date(), "order updated");
        Ok(order)
    }
}
