//! Cart Models

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::catalog::{CarId, CatalogItem};

/// Opaque identifier of a cart row. Distinct from the catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawCartItemId")]
pub struct CartItemId(String);

impl CartItemId {
    /// Wrap an id issued by the server.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthetic id for a guest cart row.
    #[must_use]
    pub fn guest(car: CarId) -> Self {
        Self(format!("guest-{car}"))
    }

    fn positional(index: usize) -> Self {
        Self(format!("row-{}", index + 1))
    }

    /// The id as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCartItemId {
    Number(u64),
    Text(String),
}

impl From<RawCartItemId> for CartItemId {
    fn from(raw: RawCartItemId) -> Self {
        match raw {
            RawCartItemId::Number(id) => Self(id.to_string()),
            RawCartItemId::Text(id) => Self(id),
        }
    }
}

/// A row of the server-side cart, as returned by the cart service.
///
/// The referenced car may have been deleted since it was added, so every
/// descriptive field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartEntry {
    /// Server id of the row; older servers send it as `id`.
    #[serde(default, alias = "id")]
    pub cart_item_id: Option<CartItemId>,

    /// Catalog id of the car in this row.
    #[serde(default)]
    pub car_id: Option<CarId>,

    /// Price snapshot taken when the car was added.
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Car brand, when the car still exists.
    #[serde(default)]
    pub brand: Option<String>,

    /// Car model, when the car still exists.
    #[serde(default)]
    pub model: Option<String>,

    /// Stored image path, relative to the API origin or absolute.
    #[serde(default)]
    pub image_path: Option<String>,
}

/// A rendered cart row, identical in shape for both cart modes.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRow {
    /// Row id; `guest-<car id>` for guest rows.
    pub cart_item_id: CartItemId,
    /// Catalog id, unknown for some server rows.
    pub car_id: Option<CarId>,
    /// Car brand.
    pub brand: Option<String>,
    /// Car model.
    pub model: Option<String>,
    /// Row price; zero when the server sent none.
    pub price: Decimal,
    /// Stored image path.
    pub image_path: Option<String>,
}

impl CartRow {
    /// Row for a guest cart id resolved through the catalog.
    #[must_use]
    pub fn from_catalog(item: CatalogItem) -> Self {
        Self {
            cart_item_id: CartItemId::guest(item.id),
            car_id: Some(item.id),
            brand: Some(item.brand),
            model: Some(item.model),
            price: item.price,
            image_path: item.image_path,
        }
    }

    /// Row for the `index`-th entry of the server cart.
    #[must_use]
    pub fn from_entry(index: usize, entry: CartEntry) -> Self {
        Self {
            cart_item_id: entry
                .cart_item_id
                .unwrap_or_else(|| CartItemId::positional(index)),
            car_id: entry.car_id,
            brand: entry.brand,
            model: entry.model,
            price: entry.price.unwrap_or_default(),
            image_path: entry.image_path,
        }
    }

    /// `"<brand> <model>"`, or `None` when neither is known.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let title = [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        (!title.is_empty()).then_some(title)
    }
}

/// Count and total of a rendered cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of rows.
    pub count: usize,

    /// Sum of row prices.
    pub total: Decimal,
}

impl CartSummary {
    /// Summarise rendered rows.
    #[must_use]
    pub fn from_rows(rows: &[CartRow]) -> Self {
        Self {
            count: rows.len(),
            total: rows.iter().map(|row| row.price).sum(),
        }
    }
}

/// Which cart representation drives the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartMode {
    /// The guest cart in local storage.
    #[default]
    Guest,

    /// The server cart of the signed-in user.
    Authenticated,
}

impl fmt::Display for CartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Guest => "guest",
            Self::Authenticated => "account",
        })
    }
}

/// Result of a successful cart load.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    /// Which cart these rows come from.
    pub mode: CartMode,

    /// Rows in display order.
    pub rows: Vec<CartRow>,

    /// Count and total of `rows`.
    pub summary: CartSummary,

    /// The server rejected the stored credential, so the guest cart is shown
    /// in place of the account cart.
    pub session_expired: bool,
}

impl CartView {
    /// View over `rows`, with the summary computed from them.
    #[must_use]
    pub fn new(mode: CartMode, rows: Vec<CartRow>) -> Self {
        let summary = CartSummary::from_rows(&rows);

        Self {
            mode,
            rows,
            summary,
            session_expired: false,
        }
    }

    /// Mark whether the view replaces an account cart whose session expired.
    #[must_use]
    pub fn with_session_expired(mut self, session_expired: bool) -> Self {
        self.session_expired = session_expired;
        self
    }
}

/// Server confirmation of a whole-cart purchase. Authoritative for the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Purchase {
    /// Number of cars bought.
    pub items_count: u64,

    /// Amount charged.
    pub total_price: Decimal,
}

/// Outcome of adding a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Added to the guest cart.
    Added,

    /// Already in the guest cart; nothing changed.
    AlreadyInCart,

    /// Added to the server cart.
    AddedToAccount,

    /// The session had expired; the car was kept in the guest cart instead.
    SavedToGuestCart,
}

/// Outcome of buying everything in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Guest cart emptied locally; nothing was purchased.
    Cleared {
        /// Whether anything was in the cart before clearing.
        had_items: bool,
    },

    /// Server purchase completed.
    Purchased(Purchase),
}

/// Outcome of buying a single car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyItemOutcome {
    /// Removed from the guest cart locally.
    RemovedFromGuestCart {
        /// Whether the car was in the guest cart.
        was_present: bool,
    },

    /// Server purchase completed.
    Purchased,
}

/// Outcome of pushing the guest cart into the server cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Cars accepted by the server and removed from the guest cart.
    pub merged: usize,

    /// Cars still in the guest cart.
    pub remaining: usize,
}
