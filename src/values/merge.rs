//! Deep merge of values documents.

use fyaml::Value;
use std::mem;

/// Deep-merge `overlay` on top of `base`.
///
/// Mappings present on both sides are merged key by key. Everything else
/// from `overlay` (scalars, sequences, nulls, or a value of a different kind)
/// replaces what `base` holds. Sequences are never merged element-wise.
///
/// Keys of `base` keep their position; keys only found in `overlay` are
/// appended in overlay order.
pub fn merge(base: Value, overlay: Value) -> Value {
    let (mut result, overlay_map) = match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => (base_map, overlay_map),
        (_, overlay) => return overlay,
    };

    for (key, overlay_value) in overlay_map {
        match (result.get_mut(&key), overlay_value) {
            (Some(existing), overlay_value @ Value::Mapping(_))
                if matches!(existing, Value::Mapping(_)) =>
            {
                let prior = mem::replace(existing, Value::Null);
                *existing = merge(prior, overlay_value);
            }
            (_, overlay_value) => {
                result.insert(key, overlay_value);
            }
        }
    }
    Value::Mapping(result)
}

// =============================================================================
// Unit Tests
// =============================================================================
