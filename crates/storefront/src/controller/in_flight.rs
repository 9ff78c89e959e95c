//! At-most-one-in-flight tracking for cart actions.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use bazaar_core::ProductId;

/// Which mutation a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CartAction {
    Add,
    Remove,
}

type RequestKey = (CartAction, ProductId);

/// Set of (action, product) pairs with a request outstanding.
#[derive(Debug)]
pub(crate) struct InFlight {
    enabled: bool,
    keys: Mutex<HashSet<RequestKey>>,
}

impl InFlight {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            keys: Mutex::new(HashSet::new()),
        }
    }

    /// Claim a slot for the request. `None` means an identical request is
    /// already running; the slot is released when the guard drops.
    pub(crate) fn try_begin(&self, action: CartAction, product_id: ProductId) -> Option<InFlightGuard<'_>> {
        if !self.enabled {
            return Some(InFlightGuard { owner: self, key: None });
        }

        let key = (action, product_id);
        let inserted = self
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);

        inserted.then_some(InFlightGuard {
            owner: self,
            key: Some(key),
        })
    }
}

pub(crate) struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: Option<RequestKey>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.owner
                .keys
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_rejected_until_release() {
        let in_flight = InFlight::new(true);
        let product = ProductId::new(1);

        let guard = in_flight.try_begin(CartAction::Add, product);
        assert!(guard.is_some());
        assert!(in_flight.try_begin(CartAction::Add, product).is_none());

        // other action or product is independent
        assert!(in_flight.try_begin(CartAction::Remove, product).is_some());
        assert!(in_flight.try_begin(CartAction::Add, ProductId::new(2)).is_some());

        drop(guard);
        assert!(in_flight.try_begin(CartAction::Add, product).is_some());
    }

    #[test]
    fn test_disabled_never_rejects() {
        let in_flight = InFlight::new(false);
        let product = ProductId::new(1);
        let _first = in_flight.try_begin(CartAction::Add, product);
        assert!(in_flight.try_begin(CartAction::Add, product).is_some());
    }
}
