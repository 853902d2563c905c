use super::{BoundField, generic};
use crate::widget::{Coerce, Control, Refresh, Target, Widget, WidgetKey};

const PLAY_TIME_PARTS: [(&str, f64); 3] = [("Hours", 999.0), ("Minutes", 59.0), ("Seconds", 59.0)];
const ALIAS_LABELS: [&str; 3] = ["Hero's Alias", "Nanami's Alias", "Flik's Alias"];
const READONLY_ALIAS: usize = 2;

/// `[hours, minutes, seconds]`, each clamped to its range on write.
pub(super) fn play_time(field: &BoundField) -> Widget {
    let Some(parts) = field.value.as_array() else {
        return generic::bind_field(field);
    };
    let controls = parts
        .iter()
        .zip(PLAY_TIME_PARTS)
        .enumerate()
        .map(|(i, (value, (label, max)))| {
            let path = field.path.index(i);
            Widget::Control(
                Control::number(WidgetKey::at(&path), label, value.as_f64().unwrap_or(0.0))
                    .range(0.0, max)
                    .bind(
                        Target::Value {
                            path,
                            coerce: Coerce::Clamp { min: 0.0, max },
                        },
                        Refresh::Nothing,
                    ),
            )
        })
        .collect();
    Widget::section(
        WidgetKey::tagged("sec", &field.path),
        field.label(),
        vec![Widget::row(None, controls)],
    )
}

/// First three Greenhill mission aliases; the last one is fixed by the game.
pub(super) fn mission_aliases(field: &BoundField) -> Widget {
    let Some(names) = field.value.as_array() else {
        return generic::bind_field(field);
    };
    let controls = names
        .iter()
        .zip(ALIAS_LABELS)
        .enumerate()
        .map(|(i, (value, label))| {
            let path = field.path.index(i);
            let control = Control::text(WidgetKey::at(&path), label, value.as_str().unwrap_or_default());
            let control = if i == READONLY_ALIAS {
                control.disabled().hint("Flik's name is read-only")
            } else {
                control.bind(
                    Target::Value {
                        path,
                        coerce: Coerce::Text,
                    },
                    Refresh::Nothing,
                )
            };
            Widget::Control(control)
        })
        .collect();
    Widget::section(WidgetKey::tagged("sec", &field.path), field.label(), controls)
}

pub(super) fn skip(_field: &BoundField) -> Widget {
    Widget::Empty
}

#[cfg(test)]
mod tests {
    use super::{mission_aliases, play_time};
    use crate::{SaveValue, edit::DataPath, render::BoundField, schema, widget::ControlKind};

    #[test]
    fn play_time_controls_carry_ranges() {
        let v = SaveValue::parse("[12, 30, 5]").unwrap();
        let field = BoundField {
            descriptor: *schema::descriptor("play_time").unwrap(),
            path: DataPath::from_dotted("game_data.play_time"),
            value: &v,
        };
        let w = play_time(&field);
        let maxes: Vec<_> = w
            .controls()
            .iter()
            .map(|c| match c.kind {
                ControlKind::Number { max, .. } => max,
                _ => None,
            })
            .collect();
        assert_eq!(maxes, vec![Some(999.0), Some(59.0), Some(59.0)]);
    }

    #[test]
    fn third_alias_is_read_only() {
        let v = SaveValue::parse(r#"["A", "B", "Flik", "D"]"#).unwrap();
        let field = BoundField {
            descriptor: *schema::descriptor("kari_name").unwrap(),
            path: DataPath::from_dotted("game_data.kari_name"),
            value: &v,
        };
        let w = mission_aliases(&field);
        let editable: Vec<_> = w.controls().iter().map(|c| c.is_editable()).collect();
        assert_eq!(editable, vec![true, true, false]);
    }
}
