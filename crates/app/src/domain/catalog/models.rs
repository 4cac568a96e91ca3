//! Catalog Models

use std::{fmt, num::NonZeroU64, str::FromStr};

use reqwest::Url;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catalog item identifier; always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(NonZeroU64);

impl CarId {
    /// `None` for zero.
    #[must_use]
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CarId {
    type Err = <NonZeroU64 as FromStr>::Err;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(Self)
    }
}

/// A car as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog id.
    pub id: CarId,

    /// Manufacturer.
    #[serde(default)]
    pub brand: String,

    /// Model name.
    #[serde(default)]
    pub model: String,

    /// Current price in roubles.
    pub price: Decimal,

    /// Image path as stored by the server.
    #[serde(default)]
    pub image_path: Option<String>,

    /// Passed through for display only.
    #[serde(default)]
    pub power: Option<Value>,

    /// Passed through for display only.
    #[serde(default)]
    pub displacement: Option<Value>,

    /// Passed through for display only.
    #[serde(default)]
    pub drive: Option<Value>,
}

impl CatalogItem {
    /// `"<brand> <model>"`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}", self.brand, self.model).trim().to_string()
    }

    /// Absolute image URL for this item, resolved against the API origin.
    #[must_use]
    pub fn image_url(&self, origin: &Url) -> Option<String> {
        resolve_image_url(self.image_path.as_deref(), origin)
    }
}

/// Resolve a stored image path.
///
/// Absolute `http(s)` URLs are kept as-is, anything else is treated as a
/// site path on the API origin. Empty paths have no image.
pub fn resolve_image_url(image_path: Option<&str>, origin: &Url) -> Option<String> {
    let image_path = image_path.map(str::trim).filter(|path| !path.is_empty())?;

    if image_path.starts_with("http://") || image_path.starts_with("https://") {
        return Some(image_path.to_string());
    }

    let site_path = if image_path.starts_with('/') {
        image_path.to_string()
    } else {
        format!("/{image_path}")
    };

    origin.join(&site_path).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn car_id_rejects_zero() {
        assert!(CarId::new(0).is_none());
        assert_eq!(CarId::new(7).map(CarId::get), Some(7));
        assert!("0".parse::<CarId>().is_err());
        assert!("-3".parse::<CarId>().is_err());
    }

    #[test]
    fn catalog_item_decodes_backend_shape() -> TestResult {
        let item: CatalogItem = serde_json::from_str(
            r#"{
                "id": 3,
                "brand": "Lada",
                "model": "Vesta",
                "power": 106,
                "displacement": 1.6,
                "drive": "front",
                "price": 1250000,
                "image_path": "uploads/cars/vesta.png"
            }"#,
        )?;

        assert_eq!(item.id, CarId::new(3).ok_or("valid id")?);
        assert_eq!(item.price, Decimal::from(1_250_000));
        assert_eq!(item.title(), "Lada Vesta");
        assert_eq!(item.drive, Some(Value::from("front")));

        Ok(())
    }

    #[test]
    fn image_urls_resolve_against_origin() -> TestResult {
        let origin = Url::parse("http://shop.test:8000/")?;

        assert_eq!(
            resolve_image_url(Some("uploads/cars/a.png"), &origin).as_deref(),
            Some("http://shop.test:8000/uploads/cars/a.png")
        );
        assert_eq!(
            resolve_image_url(Some("/uploads/cars/a.png"), &origin).as_deref(),
            Some("http://shop.test:8000/uploads/cars/a.png")
        );
        assert_eq!(
            resolve_image_url(Some("https://cdn.test/a.png"), &origin).as_deref(),
            Some("https://cdn.test/a.png")
        );
        assert_eq!(resolve_image_url(Some(""), &origin), None);
        assert_eq!(resolve_image_url(None, &origin), None);

        Ok(())
    }
}
