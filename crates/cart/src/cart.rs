use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, EntityId, Money};

/// Cart identifier, assigned when the owning order is first saved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub EntityId);

impl CartId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Cart line: product reference, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl CartItem {
    /// `unit_price × quantity`, `None` when that leaves the `Money` range.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Shopping cart.
///
/// The total price of a cart always fits in [`Money`]; `add_item` and
/// deserialization both reject carts that would overflow it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CartRecord")]
pub struct Cart {
    id: Option<CartId>,
    items: Vec<CartItem>,
}

/// Wire shape of a cart before its totals are checked.
#[derive(Deserialize)]
struct CartRecord {
    #[serde(default)]
    id: Option<CartId>,
    #[serde(default)]
    items: Vec<CartItem>,
}

impl TryFrom<CartRecord> for Cart {
    type Error = DomainError;

    fn try_from(record: CartRecord) -> Result<Self, Self::Error> {
        checked_total(&record.items).ok_or_else(total_overflow)?;
        Ok(Self {
            id: record.id,
            items: record.items,
        })
    }
}

fn checked_total(items: &[CartItem]) -> Option<Money> {
    items
        .iter()
        .try_fold(Money::ZERO, |total, item| total.checked_add(item.line_total()?))
}

fn total_overflow() -> DomainError {
    DomainError::invalid_argument(format!(
        "cart total must not exceed {}",
        Money::MAX_UNITS
    ))
}

impl Cart {
    /// Empty cart with no identity yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<CartId> {
        self.id
    }

    /// Give the cart an identity if it has none. Existing ids are kept.
    pub fn ensure_id(&mut self) -> CartId {
        *self.id.get_or_insert_with(|| CartId::new(EntityId::new()))
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of `sku`.
    ///
    /// Adding a sku already in the cart merges into the existing line; the
    /// unit price must match the one already recorded. Fails without touching
    /// the cart when the new total would exceed [`Money::MAX_UNITS`].
    pub fn add_item(
        &mut self,
        sku: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<()> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(DomainError::invalid_argument("sku must not be empty"));
        }

        if let Some(existing) = self.items.iter().find(|item| item.sku == sku) {
            if existing.unit_price != unit_price {
                return Err(DomainError::invalid_argument(format!(
                    "sku {sku} is already in the cart at {}, not {unit_price}",
                    existing.unit_price
                )));
            }
        }

        unit_price
            .checked_times(quantity)
            .and_then(|added| self.total_price().checked_add(added))
            .ok_or_else(total_overflow)?;

        match self.items.iter_mut().find(|item| item.sku == sku) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(quantity).ok_or_else(|| {
                    DomainError::invalid_argument(format!("quantity overflow for sku {sku}"))
                })?;
            }
            None => self.items.push(CartItem {
                sku,
                quantity,
                unit_price,
            }),
        }
        Ok(())
    }

    /// Remove the line for `sku`, returning it if present.
    pub fn remove_item(&mut self, sku: &str) -> Option<CartItem> {
        let idx = self.items.iter().position(|item| item.sku == sku)?;
        Some(self.items.remove(idx))
    }

    /// Sum of the quantities of all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn total_price(&self) -> Money {
        // Every way into `items` checks the total, so the fallback is never taken.
        checked_total(&self.items).unwrap_or_else(Money::max)
    }
}
