use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storefront_cart::Cart;
use storefront_core::{Clock, DomainError, DomainResult, Entity, EntityId, Money};

use crate::pricing::DiscountPolicy;

/// Order identifier, assigned by the persistence collaborator on first save.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for OrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Order status lifecycle: `Created -> Pending -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Pending,
    Closed,
}

/// A customer's order wrapping the cart it was placed with.
///
/// The order owns its cart outright; saving or deleting the order saves or
/// deletes the cart with it. `id` is never read from external input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_deserializing)]
    id: Option<OrderId>,
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    issue_date: Option<NaiveDate>,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default)]
    cart: Option<Cart>,
}

impl Order {
    /// A `Created` order with no cart and no identity.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(number: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn issue_date(&self) -> Option<NaiveDate> {
        self.issue_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.status == OrderStatus::Closed
    }

    pub fn set_number(&mut self, number: impl Into<String>) {
        self.number = Some(number.into());
    }

    /// Start the order over with a fresh, empty cart.
    ///
    /// This is a reset and the one way back to `Created`: it applies in any
    /// status, closed orders included, and drops the previous cart. The issue
    /// date of an earlier checkout is kept.
    pub fn create_order(&mut self) {
        self.cart = Some(Cart::new());
        self.status = OrderStatus::Created;
    }

    /// Move the order to `Pending`, stamping today's date from `clock`.
    ///
    /// A closed order is rejected before the cart is looked at. An attached
    /// cart must hold at least one unit; an order without any cart passes.
    pub fn checkout<C>(&mut self, clock: &C) -> DomainResult<()>
    where
        C: Clock + ?Sized,
    {
        if self.is_closed() {
            return Err(DomainError::not_allowed("cannot checkout a closed order"));
        }

        if let Some(cart) = &self.cart {
            if cart.total_quantity() == 0 {
                return Err(DomainError::invalid_argument(
                    "cannot checkout an order whose cart has zero items",
                ));
            }
        }

        self.issue_date = Some(clock.today());
        self.status = OrderStatus::Pending;
        Ok(())
    }

    /// Finish the order. Allowed from any status, including `Closed`.
    pub fn close(&mut self) {
        self.status = OrderStatus::Closed;
    }

    /// Replace the cart. A closed order keeps the cart it was closed with.
    pub fn set_cart(&mut self, cart: Cart) -> DomainResult<()> {
        if self.is_closed() {
            return Err(DomainError::not_allowed("cannot change cart of a closed order"));
        }
        self.cart = Some(cart);
        Ok(())
    }

    /// Mutable access to the cart contents while the order is still open.
    pub fn cart_mut(&mut self) -> DomainResult<Option<&mut Cart>> {
        if self.is_closed() {
            return Err(DomainError::not_allowed("cannot change cart of a closed order"));
        }
        Ok(self.cart.as_mut())
    }

    /// Discount under the default policy.
    ///
    /// # Panics
    ///
    /// Panics if no cart is attached.
    pub fn discount(&self) -> Money {
        self.discount_with(&DiscountPolicy::default())
    }

    /// Cart total minus [`Order::discount`].
    ///
    /// # Panics
    ///
    /// Panics if no cart is attached.
    pub fn order_price(&self) -> Money {
        self.order_price_with(&DiscountPolicy::default())
    }

    /// # Panics
    ///
    /// Panics if no cart is attached.
    pub fn discount_with(&self, policy: &DiscountPolicy) -> Money {
        policy.discount_for(self.attached_cart().total_price())
    }

    /// # Panics
    ///
    /// Panics if no cart is attached.
    pub fn order_price_with(&self, policy: &DiscountPolicy) -> Money {
        policy.price_for(self.attached_cart().total_price())
    }

    /// Record the identity handed out by the persistence collaborator.
    ///
    /// The attached cart receives its own identity in the same step. Assigning
    /// the id the order already has is a no-op; a different id is a conflict.
    pub fn assign_id(&mut self, id: OrderId) -> DomainResult<()> {
        match self.id {
            Some(existing) if existing != id => {
                return Err(DomainError::conflict(format!(
                    "order {existing} cannot be re-identified as {id}"
                )));
            }
            _ => self.id = Some(id),
        }
        if let Some(cart) = self.cart.as_mut() {
            cart.ensure_id();
        }
        Ok(())
    }

    fn attached_cart(&self) -> &Cart {
        match &self.cart {
            Some(cart) => cart,
            None => panic!(
                "order {} has no cart attached; pricing requires a cart",
                self.id.map(|id| id.to_string()).unwrap_or_else(|| "<unsaved>".into())
            ),
        }
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }
}
