//! Response-shape inspection for `Page` and `Slice` JSON bodies
//!
//! The checks look at which keys are present, so bodies stay as
//! `serde_json::Value` rather than typed structs.

use serde_json::Value;

use crate::error::{CheckError, Result};

/// Keys every `Page` response must carry
pub const PAGE_KEYS: [&str; 5] = ["content", "totalPages", "totalElements", "size", "number"];

/// Counting keys a `Slice` response must not carry
pub const SLICE_FORBIDDEN_KEYS: [&str; 2] = ["totalElements", "totalPages"];

/// Any one of these marks a body as a `Slice`
pub const SLICE_MARKER_KEYS: [&str; 2] = ["hasNext", "last"];

/// Keys from `keys` that `body` lacks
pub fn missing_keys<'a>(body: &Value, keys: &[&'a str]) -> Vec<&'a str> {
    keys.iter()
        .copied()
        .filter(|key| body.get(key).is_none())
        .collect()
}

/// Keys from `keys` that `body` has
pub fn present_keys<'a>(body: &Value, keys: &[&'a str]) -> Vec<&'a str> {
    keys.iter()
        .copied()
        .filter(|key| body.get(key).is_some())
        .collect()
}

pub fn has_any_key(body: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|key| body.get(key).is_some())
}

/// The `content` array, or an empty slice when absent or not an array
pub fn content(body: &Value) -> &[Value] {
    body.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// `totalElements`, defaulting to 0 when absent or non-numeric
pub fn total_elements(body: &Value) -> i64 {
    body.get("totalElements")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

pub fn item_name(item: &Value) -> Result<&str> {
    item.get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| CheckError::missing_field("name", "content item"))
}

/// `price` as a number; numeric strings (BigDecimal serialised as text) are accepted
pub fn item_price(item: &Value) -> Result<f64> {
    let price = item
        .get("price")
        .ok_or_else(|| CheckError::missing_field("price", "content item"))?;
    price
        .as_f64()
        .or_else(|| price.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| CheckError::missing_field("price", "content item (not numeric)"))
}

/// Case-insensitive substring match
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Index `i` of the first pair with `price[i] < price[i + 1]`, if any
pub fn first_descending_violation(items: &[Value]) -> Result<Option<usize>> {
    let prices = items.iter().map(item_price).collect::<Result<Vec<_>>>()?;
    Ok(prices.windows(2).position(|pair| pair[0] < pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_body() -> Value {
        json!({
            "content": [
                {"name": "Laptop Vortex Pro", "price": 4999.5},
                {"name": "Mouse Nube Lite", "price": 120},
                {"name": "Monitor Sol X", "price": "80.25"}
            ],
            "totalElements": 1000,
            "totalPages": 334,
            "size": 3,
            "number": 0
        })
    }

    #[test]
    fn page_keys_all_present() {
        let body = page_body();
        assert!(missing_keys(&body, &PAGE_KEYS).is_empty());
        assert_eq!(present_keys(&body, &SLICE_FORBIDDEN_KEYS), vec!["totalElements", "totalPages"]);
    }

    #[test]
    fn slice_body_lacks_counts() {
        let body = json!({"content": [], "first": true, "last": false, "hasNext": true});
        assert!(present_keys(&body, &SLICE_FORBIDDEN_KEYS).is_empty());
        assert!(has_any_key(&body, &SLICE_MARKER_KEYS));
        assert_eq!(missing_keys(&body, &PAGE_KEYS), vec!["totalPages", "totalElements", "size", "number"]);
    }

    #[test]
    fn content_defaults_to_empty() {
        assert!(content(&json!({})).is_empty());
        assert!(content(&json!({"content": "nope"})).is_empty());
        assert_eq!(content(&page_body()).len(), 3);
    }

    #[test]
    fn total_elements_tolerates_absence() {
        assert_eq!(total_elements(&page_body()), 1000);
        assert_eq!(total_elements(&json!({"content": []})), 0);
        assert_eq!(total_elements(&json!({"totalElements": 7.0})), 7);
    }

    #[test]
    fn price_accepts_numbers_and_numeric_strings() {
        let body = page_body();
        let items = content(&body);
        assert_eq!(item_price(&items[0]).unwrap(), 4999.5);
        assert_eq!(item_price(&items[1]).unwrap(), 120.0);
        assert_eq!(item_price(&items[2]).unwrap(), 80.25);
        assert!(item_price(&json!({"price": "n/a"})).is_err());
        assert!(item_price(&json!({"name": "x"})).is_err());
    }

    #[test]
    fn descending_order_detection() {
        let body = page_body();
        assert_eq!(first_descending_violation(content(&body)).unwrap(), None);

        let items = vec![json!({"price": 10}), json!({"price": 10}), json!({"price": 30})];
        assert_eq!(first_descending_violation(&items).unwrap(), Some(1));
    }

    #[test]
    fn name_match_ignores_case() {
        assert!(name_matches("LAPTOP Vortex Pro", "laptop"));
        assert!(name_matches("Gaming laptop", "Laptop"));
        assert!(!name_matches("Mouse Nube Lite", "Laptop"));
        assert_eq!(item_name(&json!({"name": "Tablet"})).unwrap(), "Tablet");
        assert!(item_name(&json!({"name": 3})).is_err());
    }
}
