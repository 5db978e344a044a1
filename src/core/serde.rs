//! Serde helper functions for `skip_serializing_if`

/// Skip serializing if value is default
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    value == &T::default()
}

/// Skip serializing if value is zero
pub fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

/// Default value helper for boolean fields that are on unless configured off
pub const fn default_true() -> bool {
    true
}
