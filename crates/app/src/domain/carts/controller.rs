//! Cart reconciliation.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    auth::{BearerToken, SessionStore},
    domain::{
        carts::{
            CartService, GuestCart,
            errors::CartError,
            models::{
                AddOutcome, BuyItemOutcome, CartMode, CartRow, CartSummary, CartView,
                CheckoutOutcome, MergeOutcome,
            },
        },
        catalog::{CarId, CatalogService},
    },
    http::ApiError,
    storage::LocalStore,
};

/// Keeps one cart view consistent across guest and signed-in use.
///
/// The mode is derived from the stored credential at the start of every
/// operation. A credential rejected by the server is evicted on the spot and
/// the operation continues (or fails) as described per method. Methods take
/// `&mut self`, so a second action cannot start while one is in flight.
///
/// Once a credential has been evicted, purchases keep failing with
/// [`CartError::AuthExpired`] until a new session is stored, so an account
/// purchase is never turned into a guest cart change.
pub struct CartController {
    catalog: Arc<dyn CatalogService>,
    carts: Arc<dyn CartService>,
    session: SessionStore,
    guest: GuestCart,
    mode: CartMode,
    rows: Vec<CartRow>,
    session_expired: bool,
}

impl CartController {
    /// Controller over the given services and the shared local store.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        carts: Arc<dyn CartService>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        Self {
            catalog,
            carts,
            session: SessionStore::new(store.clone()),
            guest: GuestCart::new(store),
            mode: CartMode::Guest,
            rows: Vec::new(),
            session_expired: false,
        }
    }

    /// Mode of the most recently rendered view.
    pub fn mode(&self) -> CartMode {
        self.mode
    }

    /// Rows of the most recently rendered view.
    pub fn rows(&self) -> &[CartRow] {
        &self.rows
    }

    /// Count and total of the most recently rendered view.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from_rows(&self.rows)
    }

    /// Whether this controller evicted a credential the server rejected and
    /// no new session has been stored since.
    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    /// The stored session this controller reads on every operation.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The guest cart kept in local storage.
    pub fn guest_cart(&self) -> &GuestCart {
        &self.guest
    }

    /// Load whichever cart is authoritative right now.
    ///
    /// With a credential the server cart is shown; if the server rejects the
    /// credential it is evicted and the guest cart is shown instead. Failed
    /// loads leave the previous view untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when the active cart cannot be fetched or decoded.
    #[instrument(skip(self))]
    pub async fn load_cart(&mut self) -> Result<CartView, CartError> {
        if let Some(token) = self.active_token() {
            match self.carts.list_items(&token).await {
                Ok(entries) => {
                    let rows = entries
                        .into_iter()
                        .enumerate()
                        .map(|(index, entry)| CartRow::from_entry(index, entry))
                        .collect();

                    return Ok(self.render(CartMode::Authenticated, rows));
                }
                Err(ApiError::Unauthorized) => {
                    self.evict_session()?;
                }
                Err(error) => return Err(error.into()),
            }
        }

        self.load_guest_cart().await
    }

    async fn load_guest_cart(&mut self) -> Result<CartView, CartError> {
        let ids = self.guest.ids();

        if ids.is_empty() {
            return Ok(self.render(CartMode::Guest, Vec::new()));
        }

        let catalog = self.catalog.list_cars().await?;

        let rows = catalog
            .into_iter()
            .filter(|item| ids.contains(&item.id))
            .map(CartRow::from_catalog)
            .collect();

        Ok(self.render(CartMode::Guest, rows))
    }

    /// Add `car` to the active cart.
    ///
    /// If the server rejects the credential, the car goes into the guest cart
    /// so the action is not lost.
    ///
    /// # Errors
    ///
    /// Returns an error when the server refuses the add for any reason other
    /// than an expired session, or local storage cannot be written.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&mut self, car: CarId) -> Result<AddOutcome, CartError> {
        let Some(token) = self.active_token() else {
            return self.add_to_guest_cart(car);
        };

        match self.carts.add_item(&token, car).await {
            Ok(()) => Ok(AddOutcome::AddedToAccount),
            Err(ApiError::Unauthorized) => {
                self.evict_session()?;
                self.guest.insert(car)?;

                info!("session expired, saved car to guest cart");

                Ok(AddOutcome::SavedToGuestCart)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn add_to_guest_cart(&self, car: CarId) -> Result<AddOutcome, CartError> {
        if self.guest.insert(car)? {
            Ok(AddOutcome::Added)
        } else {
            Ok(AddOutcome::AlreadyInCart)
        }
    }

    /// Buy everything in the cart.
    ///
    /// Guests have no server-side purchase: their cart is only cleared. With
    /// a session, the current account view must be non-empty and the total
    /// reported is the one the server confirms. An expired session is never
    /// turned into a guest-side action here, including one evicted by an
    /// earlier load.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] without any request when nothing is
    /// rendered, [`CartError::AuthExpired`] after evicting a rejected
    /// credential, or the classified server failure.
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> Result<CheckoutOutcome, CartError> {
        let Some(token) = self.active_token() else {
            if self.session_expired {
                return Err(CartError::AuthExpired);
            }

            let had_items = !self.rows.is_empty() || !self.guest.ids().is_empty();

            self.guest.clear()?;
            self.render(CartMode::Guest, Vec::new());

            return Ok(CheckoutOutcome::Cleared { had_items });
        };

        if self.mode != CartMode::Authenticated || self.rows.is_empty() {
            return Err(CartError::EmptyCart);
        }

        match self.carts.buy_all(&token).await {
            Ok(purchase) => {
                self.render(CartMode::Authenticated, Vec::new());

                info!(
                    items = purchase.items_count,
                    total = %purchase.total_price,
                    "checkout completed"
                );

                Ok(CheckoutOutcome::Purchased(purchase))
            }
            Err(ApiError::Unauthorized) => {
                self.evict_session()?;

                Err(CartError::AuthExpired)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Buy a single car.
    ///
    /// Guests only drop the car from their local cart. With a session the
    /// server purchase is issued and the first matching row leaves the view.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AuthExpired`] after evicting a rejected
    /// credential (here or in an earlier operation), or the classified server
    /// failure.
    #[instrument(skip(self))]
    pub async fn buy_item(&mut self, car: CarId) -> Result<BuyItemOutcome, CartError> {
        let Some(token) = self.active_token() else {
            if self.session_expired {
                return Err(CartError::AuthExpired);
            }

            let was_present = self.guest.remove(car)?;

            self.rows.retain(|row| row.car_id != Some(car));

            return Ok(BuyItemOutcome::RemovedFromGuestCart { was_present });
        };

        match self.carts.buy_item(&token, car).await {
            Ok(()) => {
                if let Some(position) = self.rows.iter().position(|row| row.car_id == Some(car)) {
                    self.rows.remove(position);
                }

                Ok(BuyItemOutcome::Purchased)
            }
            Err(ApiError::Unauthorized) => {
                self.evict_session()?;

                Err(CartError::AuthExpired)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Move the guest cart into the signed-in user's cart.
    ///
    /// Each id leaves the guest cart as soon as the server accepts it, so an
    /// interrupted merge can simply be repeated.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SignInRequired`] without a session,
    /// [`CartError::AuthExpired`] after evicting a rejected credential, or the
    /// classified server failure. Ids not yet merged stay in the guest cart.
    #[instrument(skip(self))]
    pub async fn merge_guest_cart(&mut self) -> Result<MergeOutcome, CartError> {
        let Some(token) = self.active_token() else {
            return Err(CartError::SignInRequired);
        };

        let mut merged = 0;

        for car in self.guest.ids() {
            match self.carts.add_item(&token, car).await {
                Ok(()) => {
                    self.guest.remove(car)?;
                    merged += 1;
                }
                Err(ApiError::Unauthorized) => {
                    self.evict_session()?;

                    info!(merged, "session expired during merge");

                    return Err(CartError::AuthExpired);
                }
                Err(error) => return Err(error.into()),
            }
        }

        let remaining = self.guest.ids().len();

        info!(merged, remaining, "merged guest cart");

        Ok(MergeOutcome { merged, remaining })
    }

    fn active_token(&mut self) -> Option<BearerToken> {
        let token = self.session.token();

        if token.is_some() {
            self.session_expired = false;
        }

        token
    }

    fn evict_session(&mut self) -> Result<(), CartError> {
        info!("server rejected credential, falling back to guest cart");

        self.session_expired = true;
        self.session.sign_out()?;

        Ok(())
    }

    fn render(&mut self, mode: CartMode, rows: Vec<CartRow>) -> CartView {
        self.mode = mode;
        self.rows.clone_from(&rows);

        CartView::new(mode, rows).with_session_expired(self.session_expired)
    }
}

impl std::fmt::Debug for CartController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartController")
            .field("mode", &self.mode)
            .field("rows", &self.rows.len())
            .field("session_expired", &self.session_expired)
            .finish_non_exhaustive()
    }
}
