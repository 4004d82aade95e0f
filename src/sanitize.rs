use super::*;
use num_traits::ToPrimitive;
use serde_json::{Map, Number, Value};

const RESERVED_PROPS: &[&str] = &["children", "ref", "key", "__self", "__source"];

const FUNCTION_PLACEHOLDER: &str = "[Function]";
const OBJECT_PLACEHOLDER: &str = "[Object]";
const TRUNCATION_MARKER: &str = "...";

/// Summarizes a props record into a JSON-safe mapping.
///
/// Returns `None` when the record cannot be read or nothing survives the
/// filtering, never an empty map.
pub fn sanitize_props(props: &PropsRecord) -> Option<Map<String, Value>> {
    let PropsRecord::Record(entries) = props else {
        return None;
    };

    let mut out = Map::new();
    for (name, value) in entries {
        if RESERVED_PROPS.contains(&name.as_str()) {
            continue;
        }
        if let Some(value) = sanitize_value(value) {
            out.insert(name.clone(), value);
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Summarizes one prop value. Only one level is inspected: arrays and
/// objects collapse to placeholders. `None` means the prop is dropped
/// (undefined, or its getter threw).
pub fn sanitize_value(value: &PropValue) -> Option<Value> {
    let value = match value {
        PropValue::Function(_) => Value::String(FUNCTION_PLACEHOLDER.to_string()),
        PropValue::Array(items) => Value::String(format!("[Array({})]", items.len())),
        PropValue::Object(_) => Value::String(OBJECT_PLACEHOLDER.to_string()),
        PropValue::String(text) => {
            if text.chars().count() > PROP_STRING_LIMIT {
                let mut cut = truncate_chars(text, PROP_STRING_LIMIT);
                cut.push_str(TRUNCATION_MARKER);
                Value::String(cut)
            } else {
                Value::String(text.clone())
            }
        }
        PropValue::Null => Value::Null,
        PropValue::Bool(flag) => Value::Bool(*flag),
        // NaN and the infinities have no JSON form.
        PropValue::Number(number) => Number::from_f64(*number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        PropValue::BigInt(big) => match big.to_i64() {
            Some(small) => Value::Number(Number::from(small)),
            None => Value::String(format!("{big}n")),
        },
        PropValue::Undefined | PropValue::Throwing(_) => return None,
    };
    Some(value)
}
