//! Guest cart.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    domain::catalog::CarId,
    storage::{GUEST_CART_KEY, LocalStore, StoreError},
};

/// Set of catalog ids kept in local storage for visitors without a session.
///
/// Ids are unique and keep their insertion order. Anything unreadable in
/// storage decodes to an empty cart.
#[derive(Clone)]
pub struct GuestCart {
    store: Arc<dyn LocalStore>,
}

impl GuestCart {
    /// Guest cart over the shared store.
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Ids currently in the guest cart.
    pub fn ids(&self) -> Vec<CarId> {
        match self.store.get(GUEST_CART_KEY) {
            Ok(Some(raw)) => decode_ids(&raw),
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!("failed to read guest cart: {error}");

                Vec::new()
            }
        }
    }

    /// Add `car`. Returns `false` when it was already present, in which case
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn insert(&self, car: CarId) -> Result<bool, StoreError> {
        let mut ids = self.ids();

        if ids.contains(&car) {
            return Ok(false);
        }

        ids.push(car);

        self.persist(&ids)?;

        Ok(true)
    }

    /// Remove `car`. Returns `false` when it was not present.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn remove(&self, car: CarId) -> Result<bool, StoreError> {
        let mut ids = self.ids();
        let before = ids.len();

        ids.retain(|id| *id != car);

        if ids.len() == before {
            return Ok(false);
        }

        if ids.is_empty() {
            self.clear()?;
        } else {
            self.persist(&ids)?;
        }

        Ok(true)
    }

    /// Drop the guest cart entirely.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(GUEST_CART_KEY)
    }

    fn persist(&self, ids: &[CarId]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(ids)?;

        self.store.set(GUEST_CART_KEY, &encoded)?;

        debug!(items = ids.len(), "saved guest cart");

        Ok(())
    }
}

impl std::fmt::Debug for GuestCart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestCart").finish_non_exhaustive()
    }
}

/// Decode stored guest cart content.
///
/// Accepts positive integers, integral floats and numeric strings; everything
/// else is skipped. Duplicates keep their first position.
pub(crate) fn decode_ids(raw: &str) -> Vec<CarId> {
    let Ok(Value::Array(values)) = serde_json::from_str::<Value>(raw) else {
        if !raw.trim().is_empty() {
            warn!("guest cart storage is not a JSON array; treating it as empty");
        }

        return Vec::new();
    };

    let mut ids: Vec<CarId> = Vec::with_capacity(values.len());

    for id in values.iter().filter_map(decode_id) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    ids
}

fn decode_id(value: &Value) -> Option<CarId> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| integral(Decimal::try_from(number.as_f64()?).ok()?)),
        Value::String(text) => parse_decimal(text.trim()).and_then(integral),
        _ => None,
    }
    .and_then(CarId::new)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

fn integral(decimal: Decimal) -> Option<u64> {
    decimal
        .is_integer()
        .then(|| u64::try_from(decimal).ok())
        .flatten()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::*;

    fn car(id: u64) -> CarId {
        CarId::new(id).unwrap_or_else(|| unreachable!("test ids are positive"))
    }

    fn guest_cart_with(raw: &str) -> (Arc<MemoryStore>, GuestCart) {
        let store = Arc::new(MemoryStore::with_entries([(GUEST_CART_KEY, raw)]));

        (store.clone(), GuestCart::new(store))
    }

    #[test]
    fn corrupt_content_decodes_to_empty() {
        for raw in ["", "not json", "{\"a\": 1}", "42", "\"1,2\"", "null", "[1, 2"] {
            assert!(decode_ids(raw).is_empty(), "expected empty cart for {raw:?}");
        }
    }

    #[test]
    fn decoding_keeps_only_positive_integers_once() {
        let ids = decode_ids(r#"[3, "2", 3, 0, -1, 1.5, 4.0, true, null, "x", {"id": 9}]"#);

        assert_eq!(ids, vec![car(3), car(2), car(4)]);
    }

    #[test]
    fn numeric_strings_follow_number_rules() {
        let ids = decode_ids(r#"["4.0", " 6 ", "1e1", "2.5", "-3", "0", ""]"#);

        assert_eq!(ids, vec![car(4), car(6), car(10)]);
    }

    #[test]
    fn insert_is_idempotent() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let cart = GuestCart::new(store.clone());

        assert!(cart.insert(car(1))?);
        assert!(cart.insert(car(2))?);

        let before = store.get(GUEST_CART_KEY)?;

        assert!(!cart.insert(car(1))?);
        assert_eq!(store.get(GUEST_CART_KEY)?, before);
        assert_eq!(before.as_deref(), Some("[1,2]"));

        Ok(())
    }

    #[test]
    fn insert_into_corrupt_cart_starts_fresh() -> TestResult {
        let (store, cart) = guest_cart_with("{garbage");

        assert!(cart.insert(car(5))?);
        assert_eq!(store.get(GUEST_CART_KEY)?.as_deref(), Some("[5]"));

        Ok(())
    }

    #[test]
    fn removing_last_id_clears_the_key() -> TestResult {
        let (store, cart) = guest_cart_with("[7]");

        assert!(!cart.remove(car(8))?);
        assert!(cart.remove(car(7))?);
        assert_eq!(store.get(GUEST_CART_KEY)?, None);

        Ok(())
    }
}
