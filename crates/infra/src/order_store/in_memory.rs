use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use storefront_core::EntityId;
use storefront_orders::{Order, OrderId, OrderRepository, RepositoryError};

/// In-memory order store.
///
/// Intended for tests/dev. Orders are cloned in and out, so callers never hold
/// a reference into the store; the cart travels inside its order.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("lock poisoned".to_string())
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, mut order: Order) -> Result<Order, RepositoryError> {
        let id = order.id().unwrap_or_else(|| OrderId::new(EntityId::new()));
        order.assign_id(id)?;

        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        let inserted = orders.insert(id, order.clone()).is_none();
        debug!(order_id = %id, status = ?order.status(), inserted, "order saved");
        Ok(order)
    }

    fn find(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        // Stable output regardless of hash order.
        let mut all: Vec<(OrderId, Order)> =
            orders.iter().map(|(id, o)| (*id, o.clone())).collect();
        all.sort_by_key(|(id, _)| *id);
        Ok(all.into_iter().map(|(_, o)| o).collect())
    }

    fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        let removed = orders.remove(&id).is_some();
        debug!(order_id = %id, removed, "order deleted");
        Ok(removed)
    }
}
