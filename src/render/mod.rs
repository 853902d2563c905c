//! Renderer dispatch: field descriptor + bound value -> widget tree.

mod battle;
mod decor;
mod general;
pub mod generic;
mod inventory;
mod recruitment;
mod roster;
mod virtual_fields;

pub use battle::{CharacterFilter, MAX_PLAYABLE_CHARACTERS, RuneSlotPolicy, WEAPON_RUNES, rune_options};
pub use inventory::MAX_RENDERED_ITEMS;
pub use recruitment::{RecruitStatus, derive_status};
pub use virtual_fields::{COOK_OFF_FLAG_INDICES, COOK_OFF_STAGES, CookOffStage, cook_off_stage};

use crate::{
    SaveValue,
    catalog::Catalog,
    edit::DataPath,
    prefs::SessionToggles,
    schema::{self, FieldDescriptor},
    widget::Widget,
};

/// View options that are neither save data nor persisted rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub rune_policy: RuneSlotPolicy,
    pub character_filter: CharacterFilter,
}

/// Everything a renderer may read besides its own field.
#[derive(Clone, Copy)]
pub struct RenderCtx<'a> {
    pub catalog: &'a Catalog,
    pub root: &'a SaveValue,
    pub toggles: &'a SessionToggles,
    pub options: &'a RenderOptions,
}

/// A descriptor resolved against the save: where its value lives and what it is.
#[derive(Debug, Clone)]
pub struct BoundField<'a> {
    pub descriptor: FieldDescriptor,
    pub path: DataPath,
    pub value: &'a SaveValue,
}

impl BoundField<'_> {
    pub fn key(&self) -> &'static str {
        self.descriptor.key
    }

    pub fn label(&self) -> &'static str {
        self.descriptor.label
    }
}

/// Argument set a renderer needs.
#[derive(Clone, Copy)]
pub enum Build {
    /// Only the field value.
    Value(fn(&BoundField) -> Widget),
    /// The field value plus lookup tables.
    Catalog(fn(&Catalog, &BoundField) -> Widget),
    /// Cross-field reads over the whole tree, the catalog and the session toggles.
    Tree(fn(&RenderCtx, &BoundField) -> Widget),
}

pub struct RendererEntry {
    pub kind: &'static str,
    pub build: Build,
}

pub static RENDERERS: &[RendererEntry] = &[
    RendererEntry {
        kind: schema::KIND_PARTY_MEMBERS,
        build: Build::Catalog(roster::party_members),
    },
    RendererEntry {
        kind: schema::KIND_KEY_ITEMS,
        build: Build::Catalog(roster::key_items),
    },
    RendererEntry {
        kind: schema::KIND_LOCATION,
        build: Build::Tree(virtual_fields::location),
    },
    RendererEntry {
        kind: schema::KIND_COOK_OFF,
        build: Build::Tree(virtual_fields::cook_off_progress),
    },
    RendererEntry {
        kind: schema::KIND_PLAY_TIME,
        build: Build::Value(general::play_time),
    },
    RendererEntry {
        kind: schema::KIND_ALIASES,
        build: Build::Value(general::mission_aliases),
    },
    RendererEntry {
        kind: schema::KIND_SKIP,
        build: Build::Value(general::skip),
    },
    RendererEntry {
        kind: schema::KIND_TABLE,
        build: Build::Catalog(inventory::item_table),
    },
    RendererEntry {
        kind: schema::KIND_BATH_ITEMS,
        build: Build::Catalog(decor::bath_items),
    },
    RendererEntry {
        kind: schema::KIND_BATTLE_CHARACTERS,
        build: Build::Tree(battle::battle_characters),
    },
    RendererEntry {
        kind: schema::KIND_RECRUITMENT,
        build: Build::Tree(recruitment::recruitment),
    },
];

pub fn renderer_for(kind: &str) -> Option<&'static RendererEntry> {
    RENDERERS.iter().find(|e| e.kind == kind)
}

/// Build the widget for one field. Missing or unknown renderer kinds use the generic binder.
pub fn dispatch(ctx: &RenderCtx, field: &BoundField) -> Widget {
    let Some(entry) = field.descriptor.renderer.and_then(renderer_for) else {
        return generic::bind_field(field);
    };
    match entry.build {
        Build::Value(build) => build(field),
        Build::Catalog(build) => build(ctx.catalog, field),
        Build::Tree(build) => build(ctx, field),
    }
}

/// Probe `game_data`, `party_data`, then the root for `key`.
pub(crate) fn probe<'a>(root: &'a SaveValue, key: &str) -> Option<(DataPath, &'a SaveValue)> {
    schema::PROBE_ORDER.iter().find_map(|base| {
        let base = DataPath::from_dotted(base);
        let path = base.key(key);
        path.resolve(root).map(|v| (path, v))
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{BoundField, RenderCtx, RenderOptions};
    use crate::{
        SaveValue, catalog::Catalog, edit::DataPath, prefs::SessionToggles, schema,
        widget::Widget,
    };

    /// Render `key` bound at `path` with the given toggles.
    pub(crate) fn render_at(
        catalog: &Catalog,
        root: &SaveValue,
        toggles: SessionToggles,
        options: RenderOptions,
        key: &str,
        path: DataPath,
    ) -> Widget {
        let descriptor = *schema::descriptor(key).unwrap();
        let value = path.resolve(root).unwrap();
        let ctx = RenderCtx {
            catalog,
            root,
            toggles: &toggles,
            options: &options,
        };
        super::dispatch(
            &ctx,
            &BoundField {
                descriptor,
                path,
                value,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{RENDERERS, probe, renderer_for, test_support::render_at};
    use crate::{
        SaveValue, catalog::tests::small, edit::DataPath, prefs::SessionToggles, schema,
        widget::Widget,
    };
    use std::collections::HashSet;

    #[test]
    fn registry_kinds_are_unique_and_known_to_schema() {
        let mut seen = HashSet::new();
        for entry in RENDERERS {
            assert!(seen.insert(entry.kind), "duplicate kind {}", entry.kind);
        }
        for d in schema::FIELDS {
            if let Some(kind) = d.renderer.filter(|k| *k != "bath_level") {
                assert!(renderer_for(kind).is_some(), "no renderer for {kind}");
            }
        }
    }

    #[test]
    fn unknown_kind_falls_back_to_generic_binder() {
        let root = SaveValue::parse(r#"{"game_data": {"furo_info": [1, 2]}}"#).unwrap();
        let w = render_at(
            &small(),
            &root,
            SessionToggles::default(),
            Default::default(),
            "furo_info",
            DataPath::from_dotted("game_data.furo_info"),
        );
        let Widget::Section { title, .. } = &w else {
            panic!("expected a section, got {w:?}");
        };
        assert_eq!(title, "Bath House Level [2]");
        assert_eq!(w.controls().len(), 2);
    }

    #[test]
    fn probe_prefers_game_data_then_party_data_then_root() {
        let root = SaveValue::parse(
            r#"{"gold": 1, "party_data": {"gold": 2}, "game_data": {"other": 0}}"#,
        )
        .unwrap();
        let (path, value) = probe(&root, "gold").unwrap();
        assert_eq!(path.to_string(), "party_data.gold");
        assert_eq!(value, &SaveValue::int(2));
        assert!(probe(&root, "missing").is_none());
    }
}
