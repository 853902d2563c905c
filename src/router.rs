//! Resolves a group's field keys to locations in the loaded save.

use crate::{
    SaveValue,
    edit::DataPath,
    render::{BoundField, probe},
    schema::{self, FieldDescriptor, Group},
};
use log::{debug, warn};

/// Bind one key of `group`. A descriptor path beats the group path; groups without a
/// path probe `game_data`, `party_data`, then the root. Virtual fields bind to the root.
/// Keys missing from the registry are bound with a generic stand-in descriptor.
pub fn bind_field<'a>(root: &'a SaveValue, group: Group, key: &'static str) -> Option<BoundField<'a>> {
    let descriptor = match schema::descriptor(key) {
        Some(d) => *d,
        None => {
            warn!("group {} lists {key} without a descriptor", group.title());
            FieldDescriptor::unregistered(key, group)
        }
    };
    if descriptor.is_virtual {
        return Some(BoundField {
            descriptor,
            path: DataPath::root(),
            value: root,
        });
    }
    let found = match descriptor.data_path.or(group.data_path()) {
        Some(base) => {
            let path = DataPath::from_dotted(base).key(key);
            path.resolve(root).map(|v| (path, v))
        }
        None => probe(root, key),
    };
    match found {
        Some((path, value)) => Some(BoundField {
            descriptor,
            path,
            value,
        }),
        None => {
            debug!("{key} not present in this save, skipping");
            None
        }
    }
}

/// Every present field of `group`, in display order.
pub fn bind_group(root: &SaveValue, group: Group) -> Vec<BoundField<'_>> {
    group
        .fields()
        .iter()
        .filter_map(|key| bind_field(root, group, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{bind_field, bind_group};
    use crate::{
        SaveValue,
        catalog::tests::small,
        prefs::SessionToggles,
        render::{RenderCtx, RenderOptions, dispatch},
        schema::Group,
        widget::WidgetKey,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_are_skipped_and_order_is_kept() {
        let root = SaveValue::parse(
            r#"{"game_data": {"gold": 5, "play_time": [1, 2, 3]}, "party_data": {"exit_member": [1]}}"#,
        )
        .unwrap();
        let keys: Vec<_> = bind_group(&root, Group::General)
            .iter()
            .map(|f| (f.key(), f.path.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("exit_member", "party_data.exit_member".to_string()),
                ("location", "$".to_string()),
                ("play_time", "game_data.play_time".to_string()),
                ("gold", "game_data.gold".to_string()),
                ("cook_off_progress", "$".to_string()),
            ]
        );
    }

    #[test]
    fn descriptor_path_wins_over_probing() {
        let root = SaveValue::parse(
            r#"{"game_data": {"event_item": [9]}, "party_data": {"event_item": [1], "party_item": []}}"#,
        )
        .unwrap();
        let field = bind_field(&root, Group::PartyBag, "event_item").unwrap();
        assert_eq!(field.path.to_string(), "party_data.event_item");
        assert!(bind_field(&root, Group::Warehouse, "base_item").is_none());
    }

    #[test]
    fn unregistered_arrays_render_generically_and_stay_editable() {
        let root = SaveValue::parse(r#"{"game_data": {"mystery_flags": [4, 5]}}"#).unwrap();
        let field = bind_field(&root, Group::Experimental, "mystery_flags").unwrap();
        assert_eq!(field.label(), "mystery_flags");
        assert_eq!(field.path.to_string(), "game_data.mystery_flags");

        let catalog = small();
        let ctx = RenderCtx {
            catalog: &catalog,
            root: &root,
            toggles: &SessionToggles::default(),
            options: &RenderOptions::default(),
        };
        let w = dispatch(&ctx, &field);
        assert!(w.find(&WidgetKey::new("arr:game_data.mystery_flags")).is_some());
        let c = w
            .find_control(&WidgetKey::new("game_data.mystery_flags[1]"))
            .unwrap();
        assert!(c.is_editable());
    }
}
