//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum + serde)                                │
//! │  ├── Malformed JSON, wrong types, non-numeric ids                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required names, non-negative price/stock, positive quantity       │
//! │  └── Dates and UTC offsets                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (price >= 0, stock >= 0, quantity > 0)                      │
//! │  └── Foreign key on products.category_id                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::{parse_date, validate_quantity};
//!
//! validate_quantity(5).unwrap();
//! let day = parse_date("start_date", "2026-01-31").unwrap();
//! assert_eq!(day.to_string(), "2026-01-31");
//! ```

use chrono::{FixedOffset, NaiveDate};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CategoryInput, CheckoutItem, ProductInput};
use crate::{DATE_FORMAT, MAX_CHECKOUT_LINES, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Indomie ").unwrap(), "Indomie");
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price (zero is allowed, e.g. free samples).
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates a checkout quantity.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Body Validators
// =============================================================================

/// Validates a category body, returning it normalized (trimmed).
pub fn validate_category_input(input: &CategoryInput) -> ValidationResult<CategoryInput> {
    Ok(CategoryInput {
        name: validate_name("name", &input.name)?,
        description: input.description.trim().to_string(),
    })
}

/// Validates a product body, returning it normalized (trimmed).
///
/// Whether `category_id` references an existing category is checked by the
/// store, not here.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<ProductInput> {
    let name = validate_name("name", &input.name)?;
    validate_price(input.price)?;
    validate_stock(input.stock)?;

    Ok(ProductInput {
        name,
        price: input.price,
        stock: input.stock,
        category_id: input.category_id,
    })
}

/// Validates the shape of a checkout batch before any storage access.
///
/// ## Rules
/// - At least one line, at most [`MAX_CHECKOUT_LINES`]
/// - Every quantity is positive
///
/// The same product may appear on several lines.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::EmptyCheckout);
    }

    if items.len() > MAX_CHECKOUT_LINES {
        return Err(CoreError::TooManyLines {
            max: MAX_CHECKOUT_LINES,
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Parsers
// =============================================================================

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD ({})", e),
        }
    })
}

/// Parses a UTC offset such as `+07:00`, `-05:30`, `+08` or `Z`.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::parse_utc_offset;
///
/// assert_eq!(parse_utc_offset("+07:00").unwrap().local_minus_utc(), 7 * 3600);
/// assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
/// assert!(parse_utc_offset("Asia/Jakarta").is_err());
/// ```
pub fn parse_utc_offset(value: &str) -> ValidationResult<FixedOffset> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "timezone_offset".to_string(),
        reason: reason.to_string(),
    };

    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| invalid("out of range"));
    }

    let (sign, rest) = if let Some(rest) = value.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = value.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid("must start with + or -"));
    };

    if !rest.is_ascii() {
        return Err(invalid("must be ASCII digits"));
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours: i32 = hours
        .parse()
        .map_err(|_| invalid("hours must be numeric"))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| invalid("minutes must be numeric"))?;

    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(invalid("out of range"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(|| invalid("out of range"))
}

// =============================================================================
// Unit Tests
// =============================================================================
