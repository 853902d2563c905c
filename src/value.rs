use crate::statics;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};
use std::fmt::Write as _;

/// Indent width used by the game's own save writer.
pub const INDENT_WIDTH: usize = 2;

/// A number that remembers whether it was written as an integer or a float.
/// The game rejects `42.0` where it wrote `42`, so the distinction must survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl SaveNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SaveNumber::I64(v) => Some(*v),
            SaveNumber::U64(v) => i64::try_from(*v).ok(),
            SaveNumber::F64(v) => {
                if v.is_finite() && v.fract() == 0.0 {
                    Some(*v as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            SaveNumber::I64(v) => *v as f64,
            SaveNumber::U64(v) => *v as f64,
            SaveNumber::F64(v) => *v,
        }
    }

    /// Store a widget-parsed float, keeping integral values as integers.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
            SaveNumber::I64(v as i64)
        } else {
            SaveNumber::F64(v)
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            SaveNumber::I64(v) => out.push_str(&v.to_string()),
            SaveNumber::U64(v) => out.push_str(&v.to_string()),
            SaveNumber::F64(v) => {
                if v.is_nan() {
                    out.push_str("NaN");
                } else if v.is_infinite() {
                    if v.is_sign_negative() {
                        out.push_str("-Infinity");
                    } else {
                        out.push_str("Infinity");
                    }
                } else {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format(*v));
                }
            }
        }
    }
}

/// One node of the save tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveValue {
    Null,
    Bool(bool),
    Number(SaveNumber),
    String(String),
    Array(Vec<SaveValue>),
    Object(IndexMap<String, SaveValue>),
}

impl SaveValue {
    pub fn int(v: i64) -> Self {
        SaveValue::Number(SaveNumber::I64(v))
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, SaveValue>> {
        match self {
            SaveValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, SaveValue>> {
        match self {
            SaveValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SaveValue]> {
        match self {
            SaveValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<SaveValue>> {
        match self {
            SaveValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SaveValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SaveValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SaveValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&SaveValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SaveValue> {
        self.as_object_mut().and_then(|m| m.get_mut(key))
    }

    pub fn at(&self, index: usize) -> Option<&SaveValue> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Integer view of `self[index]`, treating anything missing or non-numeric as 0.
    pub fn int_at(&self, index: usize) -> i64 {
        self.at(index).and_then(SaveValue::as_i64).unwrap_or(0)
    }

    /// Integer view of `self[key]`, treating anything missing or non-numeric as 0.
    pub fn int_field(&self, key: &str) -> i64 {
        self.get(key).and_then(SaveValue::as_i64).unwrap_or(0)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SaveValue::Null => "null",
            SaveValue::Bool(_) => "bool",
            SaveValue::Number(_) => "number",
            SaveValue::String(_) => "string",
            SaveValue::Array(_) => "array",
            SaveValue::Object(_) => "object",
        }
    }

    pub fn parse(text: &str) -> anyhow::Result<SaveValue> {
        Ok(json5::from_str::<SaveValue>(text)?)
    }

    /// Serialize in the layout the game writes:
    /// - 2-space indentation, `": "` between key and value
    /// - every code point above ASCII escaped as lowercase `\uXXXX` (surrogate pairs above the BMP)
    /// - empty containers kept on one line
    ///
    /// Line endings and the byte-order mark are applied by [`crate::LoadedSave`].
    pub fn to_save_pretty(&self) -> String {
        self.to_save_pretty_with_newline(statics::NL_LF)
    }

    pub fn to_save_pretty_with_newline(&self, newline: &str) -> String {
        let mut out = String::new();
        self.write_save(&mut out, 0, newline);
        out
    }

    /// Single-line rendering for previews and labels.
    pub fn to_compact(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            SaveValue::Null => out.push_str("null"),
            SaveValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            SaveValue::Number(n) => n.write(out),
            SaveValue::String(s) => write_escaped_string(out, s, false),
            SaveValue::Array(values) => {
                out.push('[');
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    v.write_compact(out);
                }
                out.push(']');
            }
            SaveValue::Object(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_escaped_string(out, k, false);
                    out.push_str(": ");
                    v.write_compact(out);
                }
                out.push('}');
            }
        }
    }

    fn write_save(&self, out: &mut String, indent: usize, newline: &str) {
        match self {
            SaveValue::Null => out.push_str("null"),
            SaveValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            SaveValue::Number(n) => n.write(out),
            SaveValue::String(s) => write_escaped_string(out, s, true),
            SaveValue::Array(values) => {
                out.push('[');
                if !values.is_empty() {
                    out.push_str(newline);
                    for (i, v) in values.iter().enumerate() {
                        out.push_str(&" ".repeat(indent + INDENT_WIDTH));
                        v.write_save(out, indent + INDENT_WIDTH, newline);
                        if i + 1 != values.len() {
                            out.push(',');
                        }
                        out.push_str(newline);
                    }
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            SaveValue::Object(map) => {
                out.push('{');
                if !map.is_empty() {
                    out.push_str(newline);
                    for (i, (k, v)) in map.iter().enumerate() {
                        out.push_str(&" ".repeat(indent + INDENT_WIDTH));
                        write_escaped_string(out, k, true);
                        out.push_str(": ");
                        v.write_save(out, indent + INDENT_WIDTH, newline);
                        if i + 1 != map.len() {
                            out.push(',');
                        }
                        out.push_str(newline);
                    }
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str, ascii_only: bool) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() && (c as u32) < 0x80 => {
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c if ascii_only && (c as u32) > 0x7F => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(out, "\\u{:04x}", unit).ok();
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl<'de> Deserialize<'de> for SaveValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = SaveValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SaveValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SaveValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(SaveValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(SaveValue::Number(SaveNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                // Keep small unsigned literals in the signed variant so edits compare cleanly.
                match i64::try_from(v) {
                    Ok(v) => Ok(SaveValue::Number(SaveNumber::I64(v))),
                    Err(_) => Ok(SaveValue::Number(SaveNumber::U64(v))),
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(SaveValue::Number(SaveNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(SaveValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(SaveValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<SaveValue>()? {
                    values.push(value);
                }
                Ok(SaveValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, SaveValue>()? {
                    values.insert(key, value);
                }
                Ok(SaveValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{SaveNumber, SaveValue};
    use indexmap::IndexMap;

    #[test]
    fn integers_and_floats_keep_their_form() {
        let v = SaveValue::parse(r#"{ "a": 42, "b": 1.5, "c": 3.0 }"#).unwrap();
        assert_eq!(v.get("a"), Some(&SaveValue::int(42)));
        assert_eq!(
            v.get("b"),
            Some(&SaveValue::Number(SaveNumber::F64(1.5)))
        );
        assert_eq!(v.get("c").unwrap().to_compact(), "3.0");
    }

    #[test]
    fn empty_containers_stay_on_one_line() {
        let v = SaveValue::Object(IndexMap::new());
        assert_eq!(v.to_save_pretty(), "{}");
        assert_eq!(SaveValue::Array(Vec::new()).to_save_pretty(), "[]");
    }

    #[test]
    fn escapes_non_ascii_as_lowercase_u16() {
        let v = SaveValue::String("caf\u{00C9}".to_string());
        assert_eq!(v.to_save_pretty(), "\"caf\\u00c9\"");
    }

    #[test]
    fn escapes_astral_plane_as_surrogate_pair() {
        let v = SaveValue::String("😀".to_string());
        assert_eq!(v.to_save_pretty(), "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn compact_form_keeps_unicode_readable() {
        let v = SaveValue::String("ルック".to_string());
        assert_eq!(v.to_compact(), "\"ルック\"");
    }

    #[test]
    fn nested_layout_uses_two_space_indent() {
        let v = SaveValue::parse(r#"{"a":[1,2],"b":{"c":true}}"#).unwrap();
        assert_eq!(
            v.to_save_pretty(),
            "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {\n    \"c\": true\n  }\n}"
        );
    }

    #[test]
    fn from_f64_prefers_integers() {
        assert_eq!(SaveNumber::from_f64(7.0), SaveNumber::I64(7));
        assert_eq!(SaveNumber::from_f64(0.25), SaveNumber::F64(0.25));
        assert_eq!(SaveNumber::from_f64(f64::NAN).as_i64(), None);
    }
}
