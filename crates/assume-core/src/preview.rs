//! # Value Previews
//!
//! Compact, bounded renderings of a subject value for error messages.
//! A preview never exceeds a few hundred characters no matter how large the
//! subject is: strings are truncated, arrays collapse to their length, and
//! objects list only their first few keys.

use serde::{Deserialize, Serialize};

use crate::value::{Element, Value};

/// Bounds applied when rendering a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewLimits {
    /// Strings longer than this many characters are truncated.
    pub max_string_chars: usize,
    /// Objects list at most this many key names.
    pub max_object_keys: usize,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_string_chars: 120,
            max_object_keys: 6,
        }
    }
}

/// Render a compact preview of `value`.
pub fn preview(value: &Value, limits: &PreviewLimits) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => format!("\"{}\"", truncate(s, limits.max_string_chars)),
        Value::Array(items) => format!("Array({})", items.len()),
        Value::Object(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let mut keys: Vec<&str> = map
                .keys()
                .take(limits.max_object_keys)
                .map(String::as_str)
                .collect();
            if map.len() > limits.max_object_keys {
                keys.push("…");
            }
            format!("{{{}}}", keys.join(", "))
        }
        Value::DateTime(dt) => format!(
            "Date({})",
            dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        ),
        Value::Element(el) => format_element(el),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &s[..cut]),
        None => s.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn format_element(el: &Element) -> String {
    let mut out = format!("<{}", el.tag_name);
    if let Some(id) = &el.id {
        out.push('#');
        out.push_str(id);
    }
    for class in &el.classes {
        out.push('.');
        out.push_str(class);
    }
    out.push('>');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn limits() -> PreviewLimits {
        PreviewLimits::default()
    }

    #[test]
    fn primitives_render_plainly() {
        assert_eq!(preview(&Value::Undefined, &limits()), "undefined");
        assert_eq!(preview(&Value::Null, &limits()), "null");
        assert_eq!(preview(&Value::from(true), &limits()), "true");
        assert_eq!(preview(&Value::from(42), &limits()), "42");
        assert_eq!(preview(&Value::from(1.5), &limits()), "1.5");
        assert_eq!(preview(&Value::from(f64::NAN), &limits()), "NaN");
        assert_eq!(preview(&Value::from(f64::NEG_INFINITY), &limits()), "-Infinity");
    }

    #[test]
    fn long_strings_are_truncated() {
        let long = "a".repeat(500);
        let rendered = preview(&Value::from(long), &limits());
        // quotes + 120 chars + ellipsis
        assert_eq!(rendered.chars().count(), 123);
        assert!(rendered.ends_with("…\""));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(10);
        let small = PreviewLimits {
            max_string_chars: 3,
            max_object_keys: 6,
        };
        assert_eq!(preview(&Value::from(text), &small), "\"ééé…\"");
    }

    #[test]
    fn arrays_collapse_to_length() {
        let value = Value::from(vec![1, 2, 3]);
        assert_eq!(preview(&value, &limits()), "Array(3)");
    }

    #[test]
    fn objects_list_first_keys() {
        let mut map = BTreeMap::new();
        for key in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            map.insert(key.to_string(), Value::from(1));
        }
        assert_eq!(
            preview(&Value::Object(map), &limits()),
            "{a, b, c, d, e, f, …}"
        );
        assert_eq!(preview(&Value::Object(BTreeMap::new()), &limits()), "{}");
    }

    #[test]
    fn elements_render_as_selectors() {
        let el = Element::new("div").with_id("main").with_class("card");
        assert_eq!(preview(&Value::from(el), &limits()), "<div#main.card>");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// String previews never exceed the limit plus quotes and ellipsis,
        /// and short strings render verbatim.
        #[test]
        fn string_previews_stay_within_the_limit(s in any::<String>(), max in 0usize..200) {
            let limits = PreviewLimits { max_string_chars: max, ..PreviewLimits::default() };
            let rendered = preview(&Value::from(s.as_str()), &limits);
            prop_assert!(rendered.chars().count() <= max + 3);
            if s.chars().count() <= max {
                prop_assert_eq!(rendered, format!("\"{s}\""));
            }
        }
    }
}
