//! # Shape Check Stage
//!
//! Confirms a transformed value has the primitive shape its field type
//! expects and converts it into a typed [`FieldValue`]. A mismatch is a
//! single [`ErrorKind::Type`] violation; constraints never run on a value
//! that failed its shape check.

use formval_core::{ErrorKind, FieldValue, Numeric, Violation};
use serde_json::Value;

/// The primitive shape a transformed value must have. `null` is accepted
/// by every shape; required-ness is a constraint, not a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Anything; kept as raw JSON.
    Any,
    /// A string.
    Text,
    /// A boolean.
    Bool,
    /// A finite number, or text that parses as one.
    Number,
    /// An array of strings.
    TextList,
    /// An array of arbitrary entries.
    List,
}

impl Shape {
    /// Name used in type-error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Any => "mixed",
            Self::Text => "string",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::TextList | Self::List => "array",
        }
    }

    /// Check `value` and convert it.
    pub fn check(&self, value: Value, label: &str) -> Result<FieldValue, Violation> {
        if value.is_null() {
            return Ok(FieldValue::Null);
        }
        match (self, value) {
            (Self::Any, v) => Ok(FieldValue::Raw(v)),
            (Self::Text, Value::String(s)) => Ok(FieldValue::Text(s)),
            (Self::Bool, Value::Bool(b)) => Ok(FieldValue::Bool(b)),
            (Self::Number, Value::Number(n)) => Numeric::from_json(&n)
                .map(FieldValue::Number)
                .ok_or_else(|| invalid_number(label)),
            (Self::Number, Value::String(s)) => Numeric::parse(&s)
                .map(FieldValue::Number)
                .ok_or_else(|| invalid_number(label)),
            (Self::Number, _) => Err(invalid_number(label)),
            (Self::TextList, Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(FieldValue::Text(s)),
                    _ => Err(self.mismatch(label)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List),
            (Self::List, Value::Array(items)) => Ok(FieldValue::List(
                items.into_iter().map(FieldValue::Raw).collect(),
            )),
            _ => Err(self.mismatch(label)),
        }
    }

    fn mismatch(&self, label: &str) -> Violation {
        Violation::new(
            ErrorKind::Type,
            label,
            format!("{label} must be a `{}` type", self.type_name()),
        )
    }
}

fn invalid_number(label: &str) -> Violation {
    Violation::new(ErrorKind::Type, label, format!("{label} must be a valid number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_passes_every_shape() {
        for shape in [
            Shape::Any,
            Shape::Text,
            Shape::Bool,
            Shape::Number,
            Shape::TextList,
            Shape::List,
        ] {
            assert_eq!(shape.check(Value::Null, "F").unwrap(), FieldValue::Null);
        }
    }

    #[test]
    fn text_rejects_objects() {
        let err = Shape::Text.check(json!({"a": 1}), "Name").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert_eq!(err.message, "Name must be a `string` type");
    }

    #[test]
    fn bool_rejects_numbers() {
        let err = Shape::Bool.check(json!(1), "Active").unwrap_err();
        assert_eq!(err.message, "Active must be a `boolean` type");
    }

    #[test]
    fn number_accepts_numeric_text() {
        let v = Shape::Number.check(json!(" 42 "), "Qty").unwrap();
        assert_eq!(v.as_numeric().unwrap().value(), 42.0);
    }

    #[test]
    fn number_rejects_non_numeric() {
        for bad in [json!("abc"), json!("  "), json!(true), json!([1]), json!({})] {
            let err = Shape::Number.check(bad, "Qty").unwrap_err();
            assert_eq!(err.message, "Qty must be a valid number");
        }
    }

    #[test]
    fn text_list_requires_strings() {
        let ok = Shape::TextList.check(json!(["a", "b"]), "Tags").unwrap();
        assert_eq!(ok.as_list().unwrap().len(), 2);
        let err = Shape::TextList.check(json!("a"), "Tags").unwrap_err();
        assert_eq!(err.message, "Tags must be a `array` type");
        assert!(Shape::TextList.check(json!([1]), "Tags").is_err());
    }

    #[test]
    fn list_keeps_raw_entries() {
        let v = Shape::List.check(json!([{"url": "a.png"}]), "Images").unwrap();
        assert_eq!(v.to_json(), json!([{"url": "a.png"}]));
    }

    #[test]
    fn any_keeps_value() {
        let v = Shape::Any.check(json!({"k": [1, 2]}), "Meta").unwrap();
        assert_eq!(v, FieldValue::Raw(json!({"k": [1, 2]})));
    }
}
