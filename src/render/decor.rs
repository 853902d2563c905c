use super::{BoundField, generic};
use crate::{
    catalog::{Catalog, USE_CNT_TRADE},
    statics,
    widget::{Choice, Control, Refresh, Target, Tone, Widget, WidgetKey},
};
use std::ops::RangeInclusive;

const PAINTING_IDS: [RangeInclusive<i64>; 2] = [18..=22, 42..=44];
const ORNAMENT_IDS: [RangeInclusive<i64>; 2] = [1..=17, 45..=50];

struct SlotGroup {
    title: &'static str,
    slots: &'static [usize],
    paintings: bool,
}

const SLOT_GROUPS: [SlotGroup; 3] = [
    SlotGroup {
        title: "Paintings",
        slots: &[2, 5],
        paintings: true,
    },
    SlotGroup {
        title: "Girl's Side (Left Ornaments)",
        slots: &[0, 1, 3],
        paintings: false,
    },
    SlotGroup {
        title: "Boy's Side (Right Ornaments)",
        slots: &[4, 6, 7],
        paintings: false,
    },
];

fn trade_choices(catalog: &Catalog, ranges: &[RangeInclusive<i64>]) -> Vec<Choice> {
    let none = catalog.trade.name(0).unwrap_or(statics::EN_NONE);
    std::iter::once(Choice::numbered(0, none))
        .chain(
            catalog
                .trade
                .iter()
                .filter(|(id, _)| ranges.iter().any(|r| r.contains(id)))
                .map(|(id, e)| Choice::numbered(id, &e.name)),
        )
        .collect()
}

/// Bath decorations: every slot is a trade item, so selecting writes `use_cnt = 64`
/// together with the new `item_no`.
pub(super) fn bath_items(catalog: &Catalog, field: &BoundField) -> Widget {
    let Some(slots) = field.value.as_array() else {
        return generic::bind_field(field);
    };
    let paintings = trade_choices(catalog, &PAINTING_IDS);
    let ornaments = trade_choices(catalog, &ORNAMENT_IDS);

    let mut children = vec![Widget::note(
        "All bath items use the Trade category (use_cnt: 64). Paintings go in slots 2 and 5, ornaments everywhere else.",
        Tone::Info,
    )];
    for group in &SLOT_GROUPS {
        let options = if group.paintings { &paintings } else { &ornaments };
        let controls: Vec<Widget> = group
            .slots
            .iter()
            .filter(|&&slot| slot < slots.len())
            .map(|&slot| {
                let path = field.path.index(slot);
                let selected = slots[slot].int_field(statics::SK_ITEM_NO);
                Widget::Control(
                    Control::select(
                        WidgetKey::at(&path),
                        format!("Slot {slot}"),
                        options.clone(),
                        selected,
                    )
                    .bind(
                        Target::ItemWithCount {
                            path,
                            use_cnt: USE_CNT_TRADE,
                        },
                        Refresh::Nothing,
                    ),
                )
            })
            .collect();
        if !controls.is_empty() {
            children.push(Widget::section(
                WidgetKey::new(format!("sec:{}:{}", field.path, group.title)),
                group.title,
                controls,
            ));
        }
    }
    Widget::section(
        WidgetKey::tagged("sec", &field.path),
        format!("{} [{}]", field.label(), slots.len()),
        children,
    )
}

#[cfg(test)]
mod tests {
    use super::bath_items;
    use crate::{
        SaveValue,
        catalog::{Catalog, tests::small},
        edit::DataPath,
        render::BoundField,
        schema,
        widget::{ControlKind, Target, WidgetKey},
    };

    #[test]
    fn painting_and_ornament_slots_offer_different_ids() {
        let catalog = Catalog::bundled().unwrap();
        let records: Vec<String> = (0..8)
            .map(|_| r#"{"item_no": 0, "use_cnt": 64}"#.to_string())
            .collect();
        let v = SaveValue::parse(&format!("[{}]", records.join(","))).unwrap();
        let field = BoundField {
            descriptor: *schema::descriptor("furo_item").unwrap(),
            path: DataPath::from_dotted("game_data.furo_item"),
            value: &v,
        };
        let w = bath_items(&catalog, &field);
        assert_eq!(w.controls().len(), 8);

        let ids = |key: &str| match &w.find_control(&WidgetKey::new(key)).unwrap().kind {
            ControlKind::Select { options, .. } => options.iter().map(|c| c.value).collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        assert_eq!(ids("game_data.furo_item[2]"), vec![0, 18, 19, 42]);
        assert_eq!(ids("game_data.furo_item[0]"), vec![0, 1, 45]);

        let binding = w
            .find_control(&WidgetKey::new("game_data.furo_item[5]"))
            .and_then(|c| c.binding.as_ref())
            .unwrap();
        assert!(matches!(binding.target, Target::ItemWithCount { use_cnt: 64, .. }));
    }

    #[test]
    fn short_arrays_skip_missing_slots() {
        let v = SaveValue::parse(r#"[{"item_no": 1, "use_cnt": 64}]"#).unwrap();
        let field = BoundField {
            descriptor: *schema::descriptor("furo_item").unwrap(),
            path: DataPath::from_dotted("game_data.furo_item"),
            value: &v,
        };
        let w = bath_items(&small(), &field);
        assert_eq!(w.controls().len(), 1);
    }
}
