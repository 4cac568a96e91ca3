//! Admin Models

use std::{fmt, fs, path::Path, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{admin::NewCarError, domain::catalog::CarId};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Which wheels are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveType {
    /// Front-wheel drive.
    Front,
    /// Rear-wheel drive.
    Rear,
    /// All-wheel drive.
    All,
}

impl DriveType {
    /// Form value the server expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Rear => "rear",
            Self::All => "all",
        }
    }
}

impl fmt::Display for DriveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriveType {
    type Err = NewCarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "rear" => Ok(Self::Rear),
            "all" => Ok(Self::All),
            _ => Err(NewCarError::UnknownDrive(value.to_string())),
        }
    }
}

/// Image encodings the catalog accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
}

impl ImageFormat {
    /// Sniff the format from the leading bytes.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// MIME type sent with the upload.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Picture uploaded with a new catalog entry.
#[derive(Clone, PartialEq, Eq)]
pub struct CarImage {
    file_name: String,
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl CarImage {
    /// Wrap image bytes, rejecting anything that is not PNG or JPEG.
    ///
    /// # Errors
    ///
    /// Returns [`NewCarError::EmptyImage`] or [`NewCarError::UnsupportedImage`].
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, NewCarError> {
        if bytes.is_empty() {
            return Err(NewCarError::EmptyImage);
        }

        let format = ImageFormat::detect(&bytes).ok_or(NewCarError::UnsupportedImage)?;

        Ok(Self {
            file_name: file_name.into(),
            bytes,
            format,
        })
    }

    /// Read an image file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`NewCarError::ImageUnreadable`] when the file cannot be read,
    /// otherwise the same errors as [`CarImage::new`].
    pub fn read(path: &Path) -> Result<Self, NewCarError> {
        let bytes = fs::read(path).map_err(NewCarError::ImageUnreadable)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());

        Self::new(file_name, bytes)
    }

    /// File name sent with the upload.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Detected encoding.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl fmt::Debug for CarImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarImage")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// A catalog entry to create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Engine power in horsepower.
    pub power: u32,
    /// Engine displacement in litres.
    pub displacement: Decimal,
    /// Driven wheels.
    pub drive: DriveType,
    /// Price in roubles.
    pub price: Decimal,
    /// Catalog picture.
    pub image: CarImage,
}

impl NewCar {
    /// Check the entry before it is uploaded.
    ///
    /// # Errors
    ///
    /// Returns the first field that is blank or not positive.
    pub fn validate(&self) -> Result<(), NewCarError> {
        if self.brand.trim().is_empty() {
            return Err(NewCarError::MissingBrand);
        }

        if self.model.trim().is_empty() {
            return Err(NewCarError::MissingModel);
        }

        if self.power == 0 {
            return Err(NewCarError::NotPositive("power"));
        }

        if self.displacement <= Decimal::ZERO {
            return Err(NewCarError::NotPositive("displacement"));
        }

        if self.price <= Decimal::ZERO {
            return Err(NewCarError::NotPositive("price"));
        }

        Ok(())
    }
}

/// Catalog entry as echoed back after creation.
///
/// The server may answer before the row id is assigned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedCar {
    /// Catalog id, when the server reports it.
    #[serde(default)]
    pub id: Option<CarId>,
    /// Manufacturer.
    #[serde(default)]
    pub brand: String,
    /// Model name.
    #[serde(default)]
    pub model: String,
    /// Stored price.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Where the server stored the picture.
    #[serde(default)]
    pub image_path: Option<String>,
}

/// A registered shop user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminUser {
    /// User id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Login name.
    #[serde(default, alias = "name")]
    pub username: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn png(name: &str) -> TestResult<CarImage> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13]);

        Ok(CarImage::new(name, bytes)?)
    }

    fn niva() -> TestResult<NewCar> {
        Ok(NewCar {
            brand: "Lada".to_string(),
            model: "Niva".to_string(),
            power: 83,
            displacement: Decimal::new(17, 1),
            drive: DriveType::All,
            price: Decimal::from(900_000),
            image: png("niva.png")?,
        })
    }

    #[test]
    fn drive_parses_case_insensitively() -> TestResult {
        assert_eq!(" Rear ".parse::<DriveType>()?, DriveType::Rear);
        assert!(matches!(
            "diagonal".parse::<DriveType>(),
            Err(NewCarError::UnknownDrive(value)) if value == "diagonal"
        ));

        Ok(())
    }

    #[test]
    fn image_format_is_sniffed_from_content() {
        assert_eq!(ImageFormat::detect(b"\x89PNG\r\n\x1a\n...."), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::detect(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::detect(b"GIF89a"), None);
    }

    #[test]
    fn only_png_and_jpeg_images_are_accepted() {
        assert!(matches!(
            CarImage::new("car.gif", b"GIF89a".to_vec()),
            Err(NewCarError::UnsupportedImage)
        ));
        assert!(matches!(
            CarImage::new("car.png", Vec::new()),
            Err(NewCarError::EmptyImage)
        ));
    }

    #[test]
    fn reading_a_missing_image_fails() {
        let result = CarImage::read(Path::new("/definitely/not/here.png"));

        assert!(matches!(result, Err(NewCarError::ImageUnreadable(_))));
    }

    #[test]
    fn image_debug_omits_content() -> TestResult {
        let debug = format!("{:?}", png("niva.png")?);

        assert!(debug.contains("bytes: 12"), "unexpected debug: {debug}");

        Ok(())
    }

    #[test]
    fn new_car_validation() -> TestResult {
        assert!(niva()?.validate().is_ok());

        let mut blank_brand = niva()?;
        blank_brand.brand = "  ".to_string();

        let mut no_power = niva()?;
        no_power.power = 0;

        let mut free = niva()?;
        free.price = Decimal::ZERO;

        assert!(matches!(blank_brand.validate(), Err(NewCarError::MissingBrand)));
        assert!(matches!(no_power.validate(), Err(NewCarError::NotPositive("power"))));
        assert!(matches!(free.validate(), Err(NewCarError::NotPositive("price"))));

        Ok(())
    }

    #[test]
    fn users_accept_either_name_field() -> TestResult {
        let users: Vec<AdminUser> = serde_json::from_str(
            r#"[{"id": 1, "username": "alice", "hashed_password": "x"}, {"name": "bob"}]"#,
        )?;

        assert_eq!(
            users,
            vec![
                AdminUser {
                    id: Some(1),
                    username: "alice".to_string(),
                },
                AdminUser {
                    id: None,
                    username: "bob".to_string(),
                },
            ]
        );

        Ok(())
    }
}
