//! Fallback binder: any value in the tree becomes at least an editable control.

use super::BoundField;
use crate::{
    SaveValue,
    edit::DataPath,
    statics,
    widget::{Coerce, Control, Refresh, Target, Widget, WidgetKey},
};

pub fn bind_field(field: &BoundField) -> Widget {
    bind_value(&field.path, field.label(), field.value, field.descriptor.readonly)
}

/// Scalars map to typed inputs, objects to a collapsible section per property,
/// arrays to a collapsible section labelled by index.
pub fn bind_value(path: &DataPath, label: &str, value: &SaveValue, readonly: bool) -> Widget {
    let key = WidgetKey::at(path);
    let control = match value {
        SaveValue::Null => Control::text(key, label, statics::EN_EMPTY).bind(
            Target::Value {
                path: path.clone(),
                coerce: Coerce::Scalar,
            },
            Refresh::Nothing,
        ),
        SaveValue::Bool(b) => Control::checkbox(key, label, *b).bind(
            Target::Value {
                path: path.clone(),
                coerce: Coerce::Bool,
            },
            Refresh::Nothing,
        ),
        SaveValue::Number(n) => Control::number(key, label, n.as_f64()).bind(
            Target::Value {
                path: path.clone(),
                coerce: Coerce::Number,
            },
            Refresh::Nothing,
        ),
        SaveValue::String(s) => Control::text(key, label, s.as_str()).bind(
            Target::Value {
                path: path.clone(),
                coerce: Coerce::Text,
            },
            Refresh::Nothing,
        ),
        SaveValue::Object(map) => {
            let children = map
                .iter()
                .map(|(k, v)| bind_value(&path.key(k), k, v, readonly))
                .collect();
            return Widget::collapsing(WidgetKey::tagged("obj", path), label, false, children);
        }
        SaveValue::Array(items) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(i, v)| bind_value(&path.index(i), &i.to_string(), v, readonly))
                .collect();
            return Widget::collapsing(
                WidgetKey::tagged("arr", path),
                format!("{label} [{}]", items.len()),
                false,
                children,
            );
        }
    };
    if readonly {
        control.disabled().into()
    } else {
        control.into()
    }
}
