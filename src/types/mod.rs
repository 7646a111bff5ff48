use crate::error::{InventoryError, InventoryResult};

/// Expiration date of a batch.
///
/// Conventionally `YYYYMMDD`, but treated as an opaque totally-ordered key:
/// no calendar validation is performed.
pub type Date = i32;

/// Units of product held by a batch.
pub type Stock = u32;

/// Units requested by a single dispatch order.
pub type Quantity = u32;

/// Default maximum length of product and destination names, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 63;

/// Truncates a product or destination name to at most `max_len` characters.
pub fn bounded_label(raw: &str, max_len: usize) -> String {
    match raw.char_indices().nth(max_len) {
        Some((end, _)) => raw[..end].to_owned(),
        None => raw.to_owned(),
    }
}

/// Validates a raw dispatch quantity as entered by the user.
pub fn quantity(raw: i64) -> InventoryResult<Quantity> {
    match Quantity::try_from(raw) {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(InventoryError::InvalidQuantity { quantity: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_label_truncates_on_char_boundary() {
        assert_eq!(bounded_label("Rice", 63), "Rice");
        assert_eq!(bounded_label("Arroz", 3), "Arr");
        assert_eq!(bounded_label("Ñandú", 4), "Ñand");
        assert_eq!(bounded_label("", 4), "");
    }

    #[test]
    fn test_quantity_rejects_non_positive() {
        assert_eq!(quantity(40), Ok(40));
        assert_eq!(
            quantity(0),
            Err(InventoryError::InvalidQuantity { quantity: 0 })
        );
        assert_eq!(
            quantity(-5),
            Err(InventoryError::InvalidQuantity { quantity: -5 })
        );
        assert!(quantity(i64::MAX).is_err());
    }
}
