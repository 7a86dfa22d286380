//! Catalog product records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MAX_AMOUNT, MONEY_SCALE, Money, ProductId};

/// A persisted catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i32,
    pub category: String,
    /// Image URLs in display order.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form submission for creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub stock: i32,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Reasons a [`ProductInput`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("Please provide a name for this product.")]
    MissingName,
    #[error("Name cannot be more than {max} characters")]
    NameTooLong { max: usize },
    #[error("Please provide a description for this product.")]
    MissingDescription,
    #[error("Price must be greater than zero")]
    NonPositivePrice,
    #[error("Price cannot have more than {max} decimal places")]
    PriceTooPrecise { max: u32 },
    #[error("Price must be less than {max}")]
    PriceTooLarge { max: Money },
    #[error("Stock cannot be negative")]
    NegativeStock,
    #[error("Please specify a category.")]
    MissingCategory,
}

impl ProductInput {
    /// Maximum product name length, in characters.
    pub const MAX_NAME_LENGTH: usize = 60;

    /// Trim text fields and check every constraint.
    ///
    /// Blank image URLs are dropped; the remaining order is preserved.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validated(mut self) -> Result<Self, ProductValidationError> {
        self.name = self.name.trim().to_owned();
        self.description = self.description.trim().to_owned();
        self.category = self.category.trim().to_owned();
        self.images = self
            .images
            .into_iter()
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .collect();

        if self.name.is_empty() {
            return Err(ProductValidationError::MissingName);
        }
        if self.name.chars().count() > Self::MAX_NAME_LENGTH {
            return Err(ProductValidationError::NameTooLong {
                max: Self::MAX_NAME_LENGTH,
            });
        }
        if self.description.is_empty() {
            return Err(ProductValidationError::MissingDescription);
        }
        if self.price <= Decimal::ZERO {
            return Err(ProductValidationError::NonPositivePrice);
        }
        if self.price.normalize().scale() > MONEY_SCALE {
            return Err(ProductValidationError::PriceTooPrecise { max: MONEY_SCALE });
        }
        if self.price >= MAX_AMOUNT {
            return Err(ProductValidationError::PriceTooLarge { max: MAX_AMOUNT });
        }
        if self.stock < 0 {
            return Err(ProductValidationError::NegativeStock);
        }
        if self.category.is_empty() {
            return Err(ProductValidationError::MissingCategory);
        }
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn widget() -> ProductInput {
        ProductInput {
            name: "Widget".to_owned(),
            description: "A widget".to_owned(),
            price: Decimal::new(999, 2),
            stock: 5,
            category: "Tools".to_owned(),
            images: vec![],
        }
    }

    #[test]
    fn test_valid_input_is_trimmed() {
        let input = ProductInput {
            name: "  Widget ".to_owned(),
            images: vec![" https://img/1.png ".to_owned(), "   ".to_owned()],
            ..widget()
        };
        let valid = input.validated().unwrap();
        assert_eq!(valid.name, "Widget");
        assert_eq!(valid.images, vec!["https://img/1.png".to_owned()]);
    }

    #[test]
    fn test_name_length_limit() {
        let at_limit = ProductInput {
            name: "x".repeat(60),
            ..widget()
        };
        assert!(at_limit.validated().is_ok());

        let over = ProductInput {
            name: "x".repeat(61),
            ..widget()
        };
        assert_eq!(
            over.validated(),
            Err(ProductValidationError::NameTooLong { max: 60 })
        );
    }

    #[test]
    fn test_price_must_be_positive() {
        let free = ProductInput {
            price: Decimal::ZERO,
            ..widget()
        };
        assert_eq!(
            free.validated(),
            Err(ProductValidationError::NonPositivePrice)
        );
    }

    #[test]
    fn test_price_must_fit_stored_amounts() {
        let cents = |price| ProductInput { price, ..widget() };

        assert_eq!(
            cents(Decimal::new(1999, 3)).validated(),
            Err(ProductValidationError::PriceTooPrecise { max: 2 })
        );
        assert!(cents(Decimal::new(19_900, 4)).validated().is_ok());

        assert!(cents(Decimal::new(999_999_999_999, 2)).validated().is_ok());
        let err = cents(Decimal::MAX).validated().unwrap_err();
        assert_eq!(err.to_string(), "Price must be less than 10000000000");
    }

    #[test]
    fn test_negative_stock_rejected() {
        let input = ProductInput {
            stock: -1,
            ..widget()
        };
        assert_eq!(input.validated(), Err(ProductValidationError::NegativeStock));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let input = ProductInput {
            category: " ".to_owned(),
            ..widget()
        };
        assert_eq!(
            input.validated(),
            Err(ProductValidationError::MissingCategory)
        );
    }

    #[test]
    fn test_deserialize_defaults_and_numeric_price() {
        let input: ProductInput = serde_json::from_str(
            r#"{"name":"Widget","description":"d","price":9.99,"category":"Tools"}"#,
        )
        .unwrap();
        assert_eq!(input.stock, 0);
        assert!(input.images.is_empty());
        assert_eq!(input.price, Decimal::new(999, 2));
    }
}
