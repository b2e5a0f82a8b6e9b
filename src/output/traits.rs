//! Output sink trait and record types
//!
//! This module defines the product record handed to output sinks and the
//! trait interface sinks implement.

use thiserror::Error;

/// Placeholder for fields the listing does not provide
pub const NOT_AVAILABLE: &str = "Not Available";

/// Column headers of the tabular output, in order
pub const COLUMNS: [&str; 6] = [
    "Category",
    "Name",
    "Price (INR)",
    "Discount (%)",
    "Rating",
    "Sold By",
];

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// An accepted product, ready for output
///
/// Created once by the category crawler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    /// Display name of the category the product was listed in
    pub category: String,

    pub name: String,

    /// Offer price in rupees, as cleaned decimal text
    pub price_inr: String,

    /// Observed discount percentage, if the listing provides one
    pub discount_pct: Option<f64>,

    /// Rating text or "Not Available"
    pub rating: String,

    /// Always "Not Available": listings do not name the seller
    pub sold_by: String,
}

impl ProductRecord {
    /// Creates a record with the placeholders for missing values filled in
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        price_inr: impl Into<String>,
        discount_pct: Option<f64>,
        rating: Option<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            price_inr: price_inr.into(),
            discount_pct,
            rating: rating.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            sold_by: NOT_AVAILABLE.to_string(),
        }
    }

    /// Discount as shown in tabular output
    pub fn discount_display(&self) -> String {
        match self.discount_pct {
            Some(discount) => format!("{:.2}", discount),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// Field values in [`COLUMNS`] order
    pub fn to_row(&self) -> [String; 6] {
        [
            self.category.clone(),
            self.name.clone(),
            self.price_inr.clone(),
            self.discount_display(),
            self.rating.clone(),
            self.sold_by.clone(),
        ]
    }
}

/// Trait for output sinks
///
/// A sink receives the complete record set of a harvest once, in category
/// order, after all categories have been crawled.
pub trait OutputSink {
    /// Persists `records`
    fn write(&mut self, records: &[ProductRecord]) -> OutputResult<()>;

    /// Human-readable destination, for logs
    fn destination(&self) -> String;
}
