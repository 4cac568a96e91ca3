//! Local Persistent Store
//!
//! Key/value strings that survive between runs, the way a browser keeps
//! `localStorage`. The cart and the session credential are both kept here.

mod errors;
mod file;
mod memory;

pub use errors::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage key holding the JSON-encoded guest cart.
pub const GUEST_CART_KEY: &str = "shoptech_guest_cart";

/// Storage key holding the user bearer credential.
pub const USER_TOKEN_KEY: &str = "shoptech_user_token";

/// Storage key holding the admin bearer credential.
pub const ADMIN_TOKEN_KEY: &str = "shoptech_admin_token";

/// String key/value store shared by the cart and the session.
pub trait LocalStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
