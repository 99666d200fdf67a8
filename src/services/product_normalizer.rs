//! Turns raw product form fields into a [`NormalizedProduct`].
//!
//! Every numeric and list field is parsed strictly: a value that cannot be
//! read is reported as an error instead of being stored as a default.
//! Amounts must fit the `NUMERIC(12, 2)` price columns exactly.

use std::{collections::HashSet, str::FromStr};

use rust_decimal::Decimal;

use crate::{
    config::UPLOADS_MOUNT,
    error::{AppError, Result},
    models::{NormalizedProduct, ProductFields, StoredFile},
};

pub fn normalize(fields: &ProductFields, stored: &[StoredFile]) -> Result<NormalizedProduct> {
    let name = fields.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let price = parse_price(fields.price.as_deref().unwrap_or_default())?;
    let discount = parse_discount(fields.discount.as_deref())?;
    let category_ids = match fields.category_ids.as_deref() {
        Some(raw) => parse_category_ids(raw)?,
        None => {
            return Err(AppError::MalformedCategoryList(
                "categoryIds is required".to_string(),
            ));
        }
    };

    Ok(NormalizedProduct {
        name: name.to_string(),
        price,
        description: fields.description.clone().unwrap_or_default(),
        discount,
        images: stored.iter().map(|file| image_path(&file.filename)).collect(),
        category_ids,
    })
}

pub fn parse_price(raw: &str) -> Result<Decimal> {
    parse_amount(raw).ok_or_else(|| AppError::InvalidPrice(raw.to_string()))
}

/// Absent or blank input means the product has no discount.
pub fn parse_discount(raw: Option<&str>) -> Result<Option<Decimal>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_amount(value)
            .map(Some)
            .ok_or_else(|| AppError::InvalidDiscount(value.to_string())),
    }
}

/// Decodes a JSON array of integer ids, dropping repeated ids.
pub fn parse_category_ids(raw: &str) -> Result<Vec<i32>> {
    let ids: Vec<i32> = serde_json::from_str(raw)
        .map_err(|e| AppError::MalformedCategoryList(e.to_string()))?;

    let mut seen = HashSet::with_capacity(ids.len());
    Ok(ids.into_iter().filter(|id| seen.insert(*id)).collect())
}

/// Largest number of fractional digits an amount may carry.
const AMOUNT_SCALE: u32 = 2;

/// Amounts must stay below 10^10 to fit ten integer digits.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

pub fn image_path(filename: &str) -> String {
    format!("{}/{}", UPLOADS_MOUNT, filename)
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return None;
    }

    let amount = amount.normalize();
    (amount.scale() <= AMOUNT_SCALE && amount < AMOUNT_LIMIT).then_some(amount)
}
