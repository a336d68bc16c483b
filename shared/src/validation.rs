//! Validation utilities for the Stockroom platform

use rust_decimal::Decimal;

/// Longest category name accepted by the registry
pub const MAX_CATEGORY_NAME_LEN: usize = 64;

/// Longest brand/model text accepted for a unit
pub const MAX_BRAND_MODEL_LEN: usize = 120;

/// Prices are stored as NUMERIC(16, 2)
pub const PRICE_SCALE: u32 = 2;

/// Largest price a NUMERIC(16, 2) column holds
// 99_999_999_999_999_99 split into 32-bit parts (Decimal::new is not const)
pub const MAX_PURCHASE_PRICE: Decimal = Decimal::from_parts(0x6FC0_FFFF, 0x0023_86F2, 0, false, PRICE_SCALE);

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate a category name (non-empty after trimming)
pub fn validate_category_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Category name must not be empty");
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err("Category name must be at most 64 characters");
    }
    Ok(())
}

/// Validate a category prefix code (1-2 uppercase ASCII letters)
pub fn validate_prefix_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() {
        return Err("Prefix code must not be empty");
    }
    if code.len() > 2 {
        return Err("Prefix code must be at most 2 letters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err("Prefix code must be uppercase letters only");
    }
    Ok(())
}

/// Validate brand/model text used for identifier generation
pub fn validate_brand_model(brand_model: &str) -> Result<(), &'static str> {
    let brand_model = brand_model.trim();
    if brand_model.is_empty() {
        return Err("Brand and model must not be empty");
    }
    if brand_model.chars().count() > MAX_BRAND_MODEL_LEN {
        return Err("Brand and model must be at most 120 characters");
    }
    if brand_model.chars().any(char::is_control) {
        return Err("Brand and model must not contain control characters");
    }
    Ok(())
}

/// Validate purchase price fits the stored money column exactly
pub fn validate_purchase_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Purchase price cannot be negative");
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err("Purchase price must have at most 2 decimal places");
    }
    if price > MAX_PURCHASE_PRICE {
        return Err("Purchase price must be below 100000000000000");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}
