//! # Field Values
//!
//! The closed value model produced by every validator. Raw input is
//! untyped JSON; once normalized it is exactly one [`FieldValue`] variant.
//!
//! ## Numbers
//!
//! [`Numeric`] keeps the textual form a number was read from alongside
//! its `f64` value. The decimal-shape rule inspects that text (`"3.0"` has
//! a fractional part, `"3"` does not) so it cannot be recovered from the
//! float alone.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde::Deserialize;
use serde_json::Value;

/// JavaScript-style falsiness of a raw JSON value: `null`, `false`, `0`
/// and `""` are falsy; arrays and objects are always truthy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Render a number the way form runtimes stringify it: integral values
/// without a trailing `.0`, and no negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// A finite number together with the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric {
    value: f64,
    text: String,
}

impl Numeric {
    /// Read a JSON number. Returns `None` for values that do not fit a
    /// finite `f64`.
    pub fn from_json(number: &serde_json::Number) -> Option<Self> {
        let value = number.as_f64().filter(|v| v.is_finite())?;
        Some(Self {
            value,
            text: number.to_string(),
        })
    }

    /// Parse numeric text. All whitespace is removed first; an empty
    /// result, non-numeric text, and non-finite values are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return None;
        }
        let value: f64 = compact.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            value,
            text: compact,
        })
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The text the value was read from, whitespace removed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True if the value has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.value.fract() == 0.0
    }

    /// True if the source text carries a decimal point.
    pub fn has_decimal_point(&self) -> bool {
        self.text.contains('.')
    }

    /// Character count of the value's canonical rendering (see
    /// [`format_number`]). `100`, `"100"` and `100.0` all measure 3.
    pub fn rendered_len(&self) -> usize {
        format_number(self.value).chars().count()
    }
}

impl From<i64> for Numeric {
    fn from(n: i64) -> Self {
        Self {
            value: n as f64,
            text: n.to_string(),
        }
    }
}

/// External reference to a related entity, reduced to its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, serde::Serialize)]
pub struct RelationRef {
    /// Identifier of the referenced entity.
    pub id: String,
}

impl RelationRef {
    /// Extract a reference from raw input.
    ///
    /// Accepts an object with a string or numeric `id` (other members are
    /// discarded) or a non-empty bare string, which is taken to be an
    /// already-extracted identifier.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => match map.get("id")? {
                Value::String(id) if !id.is_empty() => Some(Self { id: id.clone() }),
                Value::Number(n) => Some(Self { id: n.to_string() }),
                _ => None,
            },
            Value::String(id) if !id.is_empty() => Some(Self { id: id.clone() }),
            _ => None,
        }
    }
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A finite number.
    Number(Numeric),
    /// A string, identifier, or formatted date/time.
    Text(String),
    /// An array of normalized values.
    List(Vec<FieldValue>),
    /// Untyped passthrough (generic fields, image and file entries).
    Raw(Value),
}

impl FieldValue {
    /// True for [`FieldValue::Null`] and a raw JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Raw(Value::Null))
    }

    /// The string content of a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean content of a bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric content of a number value.
    pub fn as_numeric(&self) -> Option<&Numeric> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The items of a list value.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert back to plain JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => number_to_json(n.value()),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Raw(v) => v.clone(),
        }
    }
}

/// Integral values within the exactly-representable range serialize as
/// integers; everything else as a float.
fn number_to_json(value: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => number_to_json(n.value()).serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Raw(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        assert!(is_falsy(&json!(null)));
        assert!(is_falsy(&json!(false)));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!(0.0)));
        assert!(is_falsy(&json!("")));
        assert!(!is_falsy(&json!(" ")));
        assert!(!is_falsy(&json!([])));
        assert!(!is_falsy(&json!({})));
        assert!(!is_falsy(&json!(true)));
    }

    #[test]
    fn format_number_matches_form_rendering() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-12.0), "-12");
    }

    #[test]
    fn numeric_parse_strips_whitespace() {
        let n = Numeric::parse(" 3.25 ").unwrap();
        assert_eq!(n.value(), 3.25);
        assert_eq!(n.text(), "3.25");
        assert!(n.has_decimal_point());
    }

    #[test]
    fn numeric_parse_rejects_garbage_and_non_finite() {
        assert!(Numeric::parse("").is_none());
        assert!(Numeric::parse("   ").is_none());
        assert!(Numeric::parse("abc").is_none());
        assert!(Numeric::parse("inf").is_none());
        assert!(Numeric::parse("NaN").is_none());
    }

    #[test]
    fn numeric_from_json_keeps_text() {
        let n: serde_json::Number = serde_json::from_str("3.0").unwrap();
        let n = Numeric::from_json(&n).unwrap();
        assert!(n.has_decimal_point());
        assert!(n.is_integer());

        let n: serde_json::Number = serde_json::from_str("3").unwrap();
        let n = Numeric::from_json(&n).unwrap();
        assert!(!n.has_decimal_point());
    }

    #[test]
    fn rendered_len_ignores_trailing_zero_fraction() {
        assert_eq!(Numeric::parse("100.0").unwrap().rendered_len(), 3);
        assert_eq!(Numeric::from(42).rendered_len(), 2);
        assert_eq!(Numeric::from(-42).rendered_len(), 3);
    }

    #[test]
    fn relation_ref_from_object_discards_other_members() {
        let r = RelationRef::from_value(&json!({"id": "abc", "name": "Alpha"})).unwrap();
        assert_eq!(r.id, "abc");
    }

    #[test]
    fn relation_ref_numeric_id_and_bare_string() {
        assert_eq!(RelationRef::from_value(&json!({"id": 7})).unwrap().id, "7");
        assert_eq!(RelationRef::from_value(&json!("abc")).unwrap().id, "abc");
        assert!(RelationRef::from_value(&json!({"name": "x"})).is_none());
        assert!(RelationRef::from_value(&json!(12)).is_none());
    }

    #[test]
    fn field_value_serializes_as_plain_json() {
        let v = FieldValue::List(vec![
            FieldValue::Text("a".to_string()),
            FieldValue::Number(Numeric::parse("2.5").unwrap()),
            FieldValue::Number(Numeric::from(3)),
            FieldValue::Null,
            FieldValue::Bool(true),
        ]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, json!(["a", 2.5, 3, null, true]));
        assert_eq!(v.to_json(), json);
    }

    #[test]
    fn raw_null_counts_as_null() {
        assert!(FieldValue::Raw(Value::Null).is_null());
        assert!(!FieldValue::Raw(json!([])).is_null());
    }
}
