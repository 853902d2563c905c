use super::{BoundField, generic};
use crate::{
    catalog::{Catalog, KEY_ITEM_IDS},
    statics,
    widget::{Choice, Coerce, Control, Refresh, Target, Tone, Widget, WidgetKey},
};

const ROSTER_SLOTS: usize = 8;
const BATTLE_SLOTS: usize = 6;
const LAST_BATTLE_CHARACTER: i64 = 83;
const KEY_ITEM_SLOTS: usize = 6;

fn id_select(field: &BoundField, index: usize, label: String, options: Vec<Choice>) -> Widget {
    let path = field.path.index(index);
    let selected = field.value.int_at(index);
    Widget::Control(
        Control::select(WidgetKey::at(&path), label, options, selected).bind(
            Target::Value {
                path,
                coerce: Coerce::Integer,
            },
            Refresh::Nothing,
        ),
    )
}

fn none_choice() -> Choice {
    Choice::numbered(0, statics::EN_NONE)
}

/// Six battle slots (ids 1..=83) followed by two convoy slots (any character).
pub(super) fn party_members(catalog: &Catalog, field: &BoundField) -> Widget {
    let Some(slots) = field.value.as_array() else {
        return generic::bind_field(field);
    };

    let named: Vec<Choice> = catalog
        .characters
        .iter()
        .filter(|(id, _)| *id > 0)
        .map(|(id, e)| Choice::numbered(id, &e.name))
        .collect();
    let battle: Vec<Choice> = std::iter::once(none_choice())
        .chain(
            named
                .iter()
                .filter(|c| c.value <= LAST_BATTLE_CHARACTER)
                .cloned(),
        )
        .collect();
    let convoy: Vec<Choice> = std::iter::once(none_choice()).chain(named).collect();

    let mut children = vec![Widget::note(
        "First 6 slots are battle characters (1-83), last 2 slots are convoy members (full roster).",
        Tone::Muted,
    )];
    for index in 0..slots.len().min(ROSTER_SLOTS) {
        let (label, options) = if index < BATTLE_SLOTS {
            (format!("Battle Slot {}", index + 1), battle.clone())
        } else {
            (format!("Convoy {}", index + 1 - BATTLE_SLOTS), convoy.clone())
        };
        children.push(id_select(field, index, label, options));
    }
    Widget::section(WidgetKey::tagged("sec", &field.path), field.label(), children)
}

/// The first six key item slots, each limited to the known key item ids.
pub(super) fn key_items(catalog: &Catalog, field: &BoundField) -> Widget {
    let Some(slots) = field.value.as_array() else {
        return generic::bind_field(field);
    };
    let options: Vec<Choice> = std::iter::once(none_choice())
        .chain(KEY_ITEM_IDS.iter().map(|&id| match catalog.items.name(id) {
            Some(name) => Choice::numbered(id, name),
            None => Choice::numbered(id, &format!("{} {id}", statics::EN_UNKNOWN_ITEM)),
        }))
        .collect();
    let children = (0..slots.len().min(KEY_ITEM_SLOTS))
        .map(|index| id_select(field, index, format!("Slot {}", index + 1), options.clone()))
        .collect();
    Widget::section(WidgetKey::tagged("sec", &field.path), field.label(), children)
}

#[cfg(test)]
mod tests {
    use super::{key_items, party_members};
    use crate::{
        SaveValue,
        catalog::tests::small,
        edit::DataPath,
        render::BoundField,
        schema,
        widget::{ControlKind, WidgetKey},
    };

    fn options_of(w: &crate::widget::Widget, key: &str) -> Vec<i64> {
        match &w.find_control(&WidgetKey::new(key)).unwrap().kind {
            ControlKind::Select { options, .. } => options.iter().map(|c| c.value).collect(),
            other => panic!("not a select: {other:?}"),
        }
    }

    #[test]
    fn battle_slots_exclude_high_ids_but_convoy_includes_them() {
        let v = SaveValue::parse("[1, 2, 0, 0, 0, 0, 0, 125, 0, 0]").unwrap();
        let field = BoundField {
            descriptor: *schema::descriptor("exit_member").unwrap(),
            path: DataPath::from_dotted("game_data.exit_member"),
            value: &v,
        };
        let w = party_members(&small(), &field);
        assert_eq!(w.controls().len(), 8);
        assert_eq!(options_of(&w, "game_data.exit_member[0]"), vec![0, 1, 2, 26]);
        assert_eq!(options_of(&w, "game_data.exit_member[7]"), vec![0, 1, 2, 26]);
    }

    #[test]
    fn key_item_names_fall_back_to_placeholder() {
        let v = SaveValue::parse("[29, 0, 0, 0, 0, 0, 0]").unwrap();
        let field = BoundField {
            descriptor: *schema::descriptor("event_item").unwrap(),
            path: DataPath::from_dotted("party_data.event_item"),
            value: &v,
        };
        let w = key_items(&small(), &field);
        assert_eq!(w.controls().len(), 6);
        let first = w
            .find_control(&WidgetKey::new("party_data.event_item[0]"))
            .unwrap();
        assert_eq!(first.selected_label().as_deref(), Some("29: Blinking Mirror"));
        let ControlKind::Select { options, .. } = &first.kind else {
            panic!("not a select");
        };
        assert_eq!(options[2].label, "35: Unknown Item 35");
    }
}
