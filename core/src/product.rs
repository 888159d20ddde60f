//! Product identity and typing.
//!
//! The host catalog identifies a product twice over: by an integer
//! `entity_id` and by a SKU string. Both appear throughout the stock tables
//! (the global table is keyed by id, per-scope index tables by SKU), so both
//! get strong newtypes here. Inventory source items carry their own id space.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for [`Sku`] parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid SKU: {0}")]
pub struct ParseSkuError(String);

/// Catalog product identifier (`entity_id` in the host catalog).
///
/// # Validation
///
/// Product ids are strictly positive. [`ProductId::new`] rejects zero and
/// negative values, so malformed ids read back from storage fail closed
/// (dropped with a diagnostic) instead of being coerced the way the host
/// platform's loose integer handling would.
///
/// # Examples
///
/// ```
/// use stocksync_core::product::ProductId;
///
/// assert_eq!(ProductId::new(55).map(ProductId::get), Some(55));
/// assert_eq!(ProductId::new(0), None);
/// assert_eq!(ProductId::new(-3), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a product id, rejecting non-positive values.
    #[must_use]
    pub const fn new(value: i64) -> Option<Self> {
        if value > 0 { Some(Self(value)) } else { None }
    }

    /// Get the raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inventory source-item identifier.
///
/// A source item associates one SKU with one source (warehouse). This core
/// never writes source items; it only observes their ids through the
/// inventory changelog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceItemId(i64);

impl SourceItemId {
    /// Create a source-item id.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SourceItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stock keeping unit.
///
/// # Validation
///
/// - `FromStr::from_str()`: validates input (rejects empty strings)
/// - `From::from()` and `new()`: no validation (for trusted, storage-sourced
///   values)
///
/// # Examples
///
/// ```
/// use stocksync_core::product::Sku;
///
/// let sku = Sku::new("SKU-24-MB01");
/// assert_eq!(sku.as_str(), "SKU-24-MB01");
///
/// let parsed: Sku = "SKU-24-MB02".parse().unwrap();
/// assert_eq!(parsed, Sku::new("SKU-24-MB02"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    /// Create a new `Sku` from a string.
    #[must_use]
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Get the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `Sku` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Sku {
    type Err = ParseSkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseSkuError("SKU cannot be empty".to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for Sku {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Product type codes of the host catalog, as a closed union.
///
/// The composite-status path only ever resolves [`Configurable`] and
/// [`Bundle`] products; every other code — including codes introduced by
/// third-party catalog extensions — lands in [`Other`] and fails the
/// type-validation step explicitly rather than silently.
///
/// [`Configurable`]: ProductType::Configurable
/// [`Bundle`]: ProductType::Bundle
/// [`Other`]: ProductType::Other
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProductType {
    /// A plain product with its own stock record.
    Simple,
    /// Composite product whose variants are the purchasable children.
    Configurable,
    /// Composite product assembled from option groups of children.
    Bundle,
    /// Any other type code, carried verbatim for diagnostics.
    Other(String),
}

impl ProductType {
    /// Map a host type code onto the closed union.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "simple" => Self::Simple,
            "configurable" => Self::Configurable,
            "bundle" => Self::Bundle,
            other => Self::Other(other.to_string()),
        }
    }

    /// The host type code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Simple => "simple",
            Self::Configurable => "configurable",
            Self::Bundle => "bundle",
            Self::Other(code) => code,
        }
    }

    /// Whether salability for this type depends on child products.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Configurable | Self::Bundle)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
