//! Composite editor for the playable character records.

use super::{
    BoundField, RenderCtx, generic,
    inventory::{ITEM_COLUMNS, item_row},
    probe,
    recruitment::{derive_status, has_import_name},
};
use crate::{
    SaveValue,
    catalog::{Catalog, Entry, PickerScope, Table},
    edit::DataPath,
    schema, statics,
    widget::{Choice, Coerce, Control, Refresh, Target, Tone, Widget, WidgetKey},
};

/// Records from this index on exist in the save but are not playable.
pub const MAX_PLAYABLE_CHARACTERS: usize = 84;

const MAX_MP_VALUE: f64 = 153.0;
const MP_PER_SQUARE: f64 = 17.0;
const MP_LEVELS: usize = 4;

const GENERAL_FIELDS: [&str; 5] = ["level", "exp", "max_hp", "now_hp", "todome"];
const STAT_LABELS: [&str; 7] = [
    "Strength",
    "Dexterity",
    "Protection",
    "Magic",
    "Magic Defense",
    "Speed",
    "Luck",
];
const RUNE_SLOT_LABELS: [&str; 3] = ["Head Rune", "Right Hand Rune", "Left Hand Rune"];
const RUNE_SLOT_TAGS: [&str; 3] = ["HR", "RH", "LH"];
const EQUIPMENT_SLOT_LABELS: [&str; 3] = ["Helmet", "Armor", "Shield"];
const SHIELD_SLOT: usize = 2;

/// Character ids allowed to wear a shield.
const SHIELD_USERS: [i64; 12] = [2, 5, 7, 9, 12, 13, 23, 28, 33, 35, 39, 64];

/// The fixed weapon rune list; it is not the general rune table.
pub const WEAPON_RUNES: [(i64, &str); 21] = [
    (0, "None"),
    (1, "Fire Orb"),
    (2, "Rage Orb"),
    (3, "Water Orb"),
    (4, "Flowing Orb"),
    (5, "Wind Orb"),
    (6, "Cyclone Orb"),
    (7, "Earth Orb"),
    (8, "Mother Earth Orb"),
    (9, "Lightning Orb"),
    (10, "Thunder Orb"),
    (94, "Hunter Orb"),
    (95, "Technique Orb"),
    (96, "Silence Orb"),
    (97, "Poison Orb"),
    (98, "Knockdown Orb"),
    (99, "Sleep Orb"),
    (100, "Friendship Orb"),
    (101, "Solitude Orb"),
    (102, "Kindness Orb"),
    (103, "Exertion Orb"),
];

const BEAST_NONE: &str = "0: None (Beast/Monster - Cannot equip)";
const NO_SHIELD_NONE: &str = "0: None (Cannot equip shields)";

/// Which slot-affinity rule decides rune options for untagged or generic runes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuneSlotPolicy {
    /// A rune with any slot tag must carry this slot's tag (hands also accept `Wep`
    /// unless tagged for the opposite hand).
    #[default]
    Strict,
    /// `N` runes fit every slot, and only runes tagged for the opposite hand alone
    /// are kept out of a hand slot.
    Lenient,
}

impl RuneSlotPolicy {
    pub const ALL: [RuneSlotPolicy; 2] = [RuneSlotPolicy::Strict, RuneSlotPolicy::Lenient];

    pub fn label(self) -> &'static str {
        match self {
            RuneSlotPolicy::Strict => "Strict slot rules",
            RuneSlotPolicy::Lenient => "Lenient slot rules",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharacterFilter {
    #[default]
    All,
    Male,
    Female,
    Kobold,
    Winger,
    Monster,
    Noble,
}

impl CharacterFilter {
    pub const ALL: [CharacterFilter; 7] = [
        CharacterFilter::All,
        CharacterFilter::Male,
        CharacterFilter::Female,
        CharacterFilter::Kobold,
        CharacterFilter::Winger,
        CharacterFilter::Monster,
        CharacterFilter::Noble,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CharacterFilter::All => "All Characters",
            CharacterFilter::Male => "Male",
            CharacterFilter::Female => "Female",
            CharacterFilter::Kobold => "Kobold",
            CharacterFilter::Winger => "Winger",
            CharacterFilter::Monster => "Monster",
            CharacterFilter::Noble => "Noble",
        }
    }

    /// Character attribute this filter keeps.
    fn attr(self) -> Option<&'static str> {
        match self {
            CharacterFilter::All => None,
            CharacterFilter::Male => Some("M"),
            CharacterFilter::Female => Some("F"),
            CharacterFilter::Kobold => Some("K"),
            CharacterFilter::Winger => Some("W"),
            CharacterFilter::Monster => Some("Z"),
            CharacterFilter::Noble => Some("N"),
        }
    }

    /// Dropdown value; the position in [`CharacterFilter::ALL`].
    pub fn choice_value(self) -> i64 {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0) as i64
    }

    pub fn from_choice(value: i64) -> Option<Self> {
        usize::try_from(value).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn matches(self, character: Option<&Entry>) -> bool {
        match self.attr() {
            None => true,
            Some(attr) => character.is_some_and(|e| e.has_attr(attr)),
        }
    }
}

fn has_any_tag(rune: &Entry, tags: &[&str]) -> bool {
    tags.iter().any(|t| rune.has_attr(t))
}

fn fits_slot(rune: &Entry, slot: usize, policy: RuneSlotPolicy) -> bool {
    let tagged = has_any_tag(rune, &RUNE_SLOT_TAGS);
    let own = RUNE_SLOT_TAGS[slot];
    match (policy, slot) {
        (RuneSlotPolicy::Strict, 0) => !tagged || rune.has_attr(own),
        (RuneSlotPolicy::Strict, _) => {
            let opposite = if slot == 1 { "LH" } else { "RH" };
            !tagged || ((rune.has_attr(own) || rune.has_attr("Wep")) && !rune.has_attr(opposite))
        }
        (RuneSlotPolicy::Lenient, 0) => !tagged || rune.has_attr(own) || rune.has_attr("N"),
        (RuneSlotPolicy::Lenient, _) => {
            let opposite = if slot == 1 { "LH" } else { "RH" };
            if rune.has_attr(opposite) && !rune.has_attr(own) && !rune.has_attr("N") {
                return false;
            }
            !tagged || has_any_tag(rune, &[own, "N", "Wep"])
        }
    }
}

/// Leading integer of a tag, so `"12a"` reads as 12 and `"RH"` as nothing.
fn leading_int(tag: &str) -> Option<i64> {
    let t = tag.trim_start();
    let sign_len = usize::from(t.starts_with(['-', '+']));
    let digits = t[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    t[..sign_len + digits].parse().ok()
}

/// Numeric attributes restrict a rune to those character ids; `N` lifts the restriction.
fn fits_character(rune: &Entry, character: i64) -> bool {
    let mut ids = rune.attrs.iter().filter_map(|a| leading_int(a)).peekable();
    ids.peek().is_none() || rune.has_attr("N") || ids.any(|id| id == character)
}

/// Rune dropdown options for one slot (0 head, 1 right hand, 2 left hand).
/// "None" is always first; weapon-exclusive runes are never offered.
pub fn rune_options(
    catalog: &Catalog,
    character: i64,
    slot: usize,
    policy: RuneSlotPolicy,
) -> Vec<Choice> {
    catalog
        .runes
        .iter()
        .filter(|(id, rune)| {
            *id == 0
                || (!rune.has_attr("ExR")
                    && fits_slot(rune, slot, policy)
                    && fits_character(rune, character))
        })
        .map(|(id, rune)| Choice::numbered(id, &rune.name))
        .collect()
}

/// Helmet and armor entries with attributes are kept only when one of them is shared
/// with the character; id 0 and untagged entries always stay.
fn equipment_options(table: &Table, character: Option<&Entry>, filtered: bool) -> Vec<Choice> {
    let char_attrs: &[String] = character.map(|e| e.attrs.as_slice()).unwrap_or_default();
    table
        .iter()
        .filter(|(id, item)| {
            !filtered
                || *id == 0
                || item.attrs.is_empty()
                || item.attrs.iter().any(|a| char_attrs.contains(a))
        })
        .map(|(id, item)| Choice::numbered(id, &item.name))
        .collect()
}

fn forced_none(path: &DataPath, label: &str, text: &str) -> Widget {
    Widget::Control(
        Control::select(WidgetKey::at(path), label, vec![Choice::new(0, text)], 0).disabled(),
    )
}

fn number(path: DataPath, label: &str, value: &SaveValue) -> Widget {
    Widget::Control(
        Control::number(WidgetKey::at(&path), label, value.as_f64().unwrap_or(0.0))
            .min(0.0)
            .bind(
                Target::Value {
                    path,
                    coerce: Coerce::Number,
                },
                Refresh::Nothing,
            ),
    )
}

fn id_select(path: DataPath, label: &str, options: Vec<Choice>, selected: i64) -> Control {
    Control::select(WidgetKey::at(&path), label, options, selected).bind(
        Target::Value {
            path,
            coerce: Coerce::Integer,
        },
        Refresh::Nothing,
    )
}

fn subsection(path: &DataPath, name: &str, title: impl Into<String>, children: Vec<Widget>) -> Widget {
    Widget::section(WidgetKey::new(format!("sec:{path}:{name}")), title, children)
}

fn mp_row(path: DataPath, label: &str, value: f64) -> Widget {
    let row_key = WidgetKey::tagged("row", &path);
    let total = (MAX_MP_VALUE / MP_PER_SQUARE).ceil() as u32;
    let filled = ((value.max(0.0) / MP_PER_SQUARE).floor() as u32).min(total);
    Widget::row(
        Some(row_key.clone()),
        vec![
            Widget::Control(
                Control::number(WidgetKey::at(&path), label, value)
                    .range(0.0, MAX_MP_VALUE)
                    .bind(
                        Target::Value {
                            path: path.clone(),
                            coerce: Coerce::Clamp {
                                min: 0.0,
                                max: MAX_MP_VALUE,
                            },
                        },
                        Refresh::Keys(vec![row_key]),
                    ),
            ),
            Widget::Gauge {
                key: Some(WidgetKey::tagged("gauge", &path)),
                filled,
                total,
            },
        ],
    )
}

struct CharacterView<'a> {
    catalog: &'a Catalog,
    id: i64,
    path: DataPath,
    entry: Option<&'a Entry>,
    beast: bool,
}

impl CharacterView<'_> {
    fn general(&self, record: &SaveValue) -> Widget {
        let children = GENERAL_FIELDS
            .iter()
            .filter_map(|key| {
                let value = record.get(key)?;
                Some(number(self.path.key(key), schema::label_for(key), value))
            })
            .collect();
        subsection(&self.path, "general", "General", children)
    }

    fn magic(&self, levels: &[SaveValue]) -> Widget {
        let base = self.path.key(statics::SK_MP);
        let children = levels
            .iter()
            .take(MP_LEVELS)
            .enumerate()
            .map(|(i, v)| {
                mp_row(
                    base.index(i),
                    &format!("Level {}", i + 1),
                    v.as_f64().unwrap_or(0.0),
                )
            })
            .collect();
        subsection(&self.path, "magic", "Magic", children)
    }

    fn stats(&self, values: &[SaveValue]) -> Widget {
        let base = self.path.key(statics::SK_PARA);
        let children = values
            .iter()
            .zip(STAT_LABELS)
            .enumerate()
            .map(|(i, (v, label))| number(base.index(i), label, v))
            .collect();
        subsection(&self.path, "stats", "Stats", children)
    }

    fn weapon(&self, record: &SaveValue) -> Widget {
        let mut children = Vec::new();
        if let Some(level) = record.get(statics::SK_BUKI_LV) {
            children.push(number(
                self.path.key(statics::SK_BUKI_LV),
                schema::label_for(statics::SK_BUKI_LV),
                level,
            ));
        }
        if let Some(rune) = record.get(statics::SK_BUKI_MON) {
            let path = self.path.key(statics::SK_BUKI_MON);
            let label = schema::label_for(statics::SK_BUKI_MON);
            children.push(if self.beast {
                forced_none(&path, label, BEAST_NONE)
            } else {
                let options = WEAPON_RUNES
                    .iter()
                    .map(|&(id, name)| Choice::numbered(id, name))
                    .collect();
                Widget::Control(id_select(path, label, options, rune.as_i64().unwrap_or(0)))
            });
        }
        subsection(&self.path, "weapon", "Weapon", children)
    }

    fn runes(&self, slots: &[SaveValue], policy: RuneSlotPolicy) -> Widget {
        let base = self.path.key(statics::SK_MON_EQP);
        let children = slots
            .iter()
            .zip(RUNE_SLOT_LABELS)
            .enumerate()
            .map(|(i, (v, label))| {
                let current = v.as_i64().unwrap_or(0);
                let options = rune_options(self.catalog, self.id, i, policy);
                let locked = current != 0
                    && self
                        .catalog
                        .runes
                        .get(current)
                        .is_some_and(|r| r.has_attr("X"));
                let control = id_select(base.index(i), label, options, current);
                Widget::Control(if locked {
                    control
                        .disabled()
                        .hint("This rune is locked and cannot be changed")
                } else {
                    control
                })
            })
            .collect();
        subsection(&self.path, "runes", "Runes", children)
    }

    fn equipment(&self, slots: &[SaveValue]) -> Widget {
        let base = self.path.key(statics::SK_BOGU_EQP);
        let can_shield = SHIELD_USERS.contains(&self.id);
        let children = slots
            .iter()
            .zip(EQUIPMENT_SLOT_LABELS)
            .enumerate()
            .map(|(i, (v, label))| {
                let path = base.index(i);
                if self.beast {
                    return forced_none(&path, label, BEAST_NONE);
                }
                if i == SHIELD_SLOT && !can_shield {
                    return forced_none(&path, label, NO_SHIELD_NONE);
                }
                let options = match i {
                    0 => equipment_options(&self.catalog.helmet, self.entry, true),
                    1 => equipment_options(&self.catalog.armor, self.entry, true),
                    _ => equipment_options(&self.catalog.shield, self.entry, false),
                };
                Widget::Control(id_select(path, label, options, v.as_i64().unwrap_or(0)))
            })
            .collect();
        subsection(&self.path, "equipment", "Equipment", children)
    }

    fn accessories(&self, records: &[SaveValue]) -> Widget {
        let base = self.path.key(statics::SK_ITEM_EQP);
        let title = format!("Accessories [{}]", records.len());
        let children = if self.beast {
            std::iter::once(Widget::note(
                "Beast/Monster character - Cannot equip accessories",
                Tone::Muted,
            ))
            .chain(records.iter().enumerate().map(|(i, _)| {
                Widget::Control(
                    Control::item_picker(
                        WidgetKey::at(&base.index(i)),
                        format!("Slot {}", i + 1),
                        0,
                        0,
                        statics::EN_NONE.to_string(),
                        PickerScope::Accessory,
                    )
                    .disabled(),
                )
            }))
            .collect()
        } else {
            records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    item_row(
                        self.catalog,
                        &base.index(i),
                        i + 1,
                        record,
                        ITEM_COLUMNS,
                        PickerScope::Accessory,
                    )
                })
                .collect()
        };
        subsection(&self.path, "accessories", title, children)
    }
}

fn character(
    ctx: &RenderCtx,
    view: &CharacterView,
    name: &str,
    record: &SaveValue,
    flags: Option<&[SaveValue]>,
    import: bool,
) -> Widget {
    let key = WidgetKey::tagged("char", &view.path);
    let title = format!("{}: {name}", view.id);
    let Some(fields) = record.as_object() else {
        return Widget::collapsing(
            key,
            title,
            false,
            vec![generic::bind_value(&view.path, name, record, false)],
        );
    };

    let mut children = vec![view.general(record)];
    let mut other = Vec::new();
    for (prop, value) in fields {
        let array = value.as_array();
        let built = match (prop.as_str(), array) {
            ("level" | "exp" | "max_hp" | "now_hp" | "todome", _)
            | (statics::SK_BUKI_LV | statics::SK_BUKI_MON, _) => continue,
            (statics::SK_MP, Some(levels)) => view.magic(levels),
            (statics::SK_PARA, Some(values)) => view.stats(values),
            (statics::SK_MON_EQP, Some(slots)) => view.runes(slots, ctx.options.rune_policy),
            (statics::SK_BOGU_EQP, Some(slots)) => view.equipment(slots),
            (statics::SK_ITEM_EQP, Some(records)) => view.accessories(records),
            _ => {
                other.push(generic::bind_value(
                    &view.path.key(prop),
                    schema::label_for(prop),
                    value,
                    false,
                ));
                continue;
            }
        };
        children.push(built);
    }
    children.push(view.weapon(record));
    children.extend(other);

    let section = Widget::collapsing(key, title, false, children);
    match flags.filter(|f| (view.id as usize) < f.len()) {
        Some(flags) => {
            let status = derive_status(flags, view.id as usize, import, ctx.toggles);
            section.with_badge(status.label(), status.tone())
        }
        None => section,
    }
}

/// Playable characters 1..84 with stats, runes, equipment, weapon and accessories.
/// Beasts see their equipment, weapon rune and accessory slots forced to 0 and locked.
pub(super) fn battle_characters(ctx: &RenderCtx, field: &BoundField) -> Widget {
    let Some(records) = field.value.as_array() else {
        return generic::bind_field(field);
    };
    let shown = records.len().min(MAX_PLAYABLE_CHARACTERS);
    let flags = probe(ctx.root, statics::SK_CHARA_FLAG).and_then(|(_, v)| v.as_array());
    let import = has_import_name(ctx.root);

    let filter_options = CharacterFilter::ALL
        .iter()
        .map(|f| Choice::new(f.choice_value(), f.label()))
        .collect();
    let mut children = vec![Widget::Control(
        Control::select(
            WidgetKey::tagged("filter", &field.path),
            "Filter by Character Type:",
            filter_options,
            ctx.options.character_filter.choice_value(),
        )
        .bind(Target::CharacterFilter, Refresh::Field),
    )];

    for (index, record) in records.iter().enumerate().take(shown).skip(1) {
        let id = index as i64;
        let entry = ctx.catalog.characters.get(id);
        let name = match entry.map(|e| e.name.trim()) {
            Some("" | "N/A") => continue,
            Some(name) => name.to_string(),
            None => ctx.catalog.character_name(id),
        };
        if !ctx.options.character_filter.matches(entry) {
            continue;
        }
        let view = CharacterView {
            catalog: ctx.catalog,
            id,
            path: field.path.index(index),
            entry,
            beast: ctx.catalog.is_beast(id),
        };
        children.push(character(ctx, &view, &name, record, flags, import));
    }

    if records.len() > MAX_PLAYABLE_CHARACTERS {
        children.push(Widget::note(
            format!(
                "Note: Showing only first {MAX_PLAYABLE_CHARACTERS} playable characters. {} non-playable characters hidden.",
                records.len() - MAX_PLAYABLE_CHARACTERS
            ),
            Tone::Muted,
        ));
    }

    Widget::section(
        WidgetKey::tagged("sec", &field.path),
        format!("{} [{shown} playable characters]", field.label()),
        children,
    )
}

#[cfg(test)]
mod tests {
    use super::{CharacterFilter, RuneSlotPolicy, WEAPON_RUNES, leading_int, rune_options};
    use crate::{
        SaveValue,
        catalog::{Catalog, CatalogSource, tests::small},
        edit::DataPath,
        prefs::SessionToggles,
        render::{RenderOptions, test_support::render_at},
        widget::{ControlKind, Widget, WidgetKey},
    };
    use pretty_assertions::assert_eq;

    const RUNES: &str = r#"{
        RUNES: {
            "0": "None",
            "1": {name: "Fire Orb", attrs: ["N", "Wep"]},
            "13": {name: "Bright Shield Orb", attrs: ["1", "RH", "X"]},
            "20": {name: "Head Only", attrs: ["HR", "N"]},
            "21": {name: "Left Only", attrs: ["LH"]},
            "22": {name: "Generic", attrs: ["N"]},
            "23": {name: "Exclusive", attrs: ["ExR", "N"]},
            "24": {name: "Flik Only", attrs: ["2"]},
        },
    }"#;

    fn ids(options: &[crate::widget::Choice]) -> Vec<i64> {
        options.iter().map(|c| c.value).collect()
    }

    #[test]
    fn strict_rules_follow_slot_tags() {
        let c = Catalog::from_json5_str(RUNES, CatalogSource::Bundled).unwrap();
        let strict = RuneSlotPolicy::Strict;
        assert_eq!(ids(&rune_options(&c, 1, 0, strict)), vec![0, 1, 20, 22]);
        assert_eq!(ids(&rune_options(&c, 1, 1, strict)), vec![0, 1, 13, 22]);
        assert_eq!(ids(&rune_options(&c, 1, 2, strict)), vec![0, 1, 21, 22]);
        assert_eq!(ids(&rune_options(&c, 2, 2, strict)), vec![0, 1, 21, 22, 24]);
    }

    #[test]
    fn lenient_rules_let_generic_runes_into_any_slot() {
        let c = Catalog::from_json5_str(RUNES, CatalogSource::Bundled).unwrap();
        let lenient = RuneSlotPolicy::Lenient;
        assert_eq!(ids(&rune_options(&c, 1, 1, lenient)), vec![0, 1, 13, 20, 22]);
        assert_eq!(ids(&rune_options(&c, 1, 2, lenient)), vec![0, 1, 20, 21, 22]);
    }

    #[test]
    fn character_tags_read_their_leading_digits() {
        assert_eq!(leading_int("12a"), Some(12));
        assert_eq!(leading_int(" 7"), Some(7));
        assert_eq!(leading_int("RH"), None);
        assert_eq!(leading_int("-"), None);

        let c = Catalog::from_json5_str(
            r#"{RUNES: {"0": "None", "30": {name: "Tagged", attrs: ["12a", "LH"]}}}"#,
            CatalogSource::Bundled,
        )
        .unwrap();
        let strict = RuneSlotPolicy::Strict;
        assert_eq!(ids(&rune_options(&c, 12, 2, strict)), vec![0, 30]);
        assert_eq!(ids(&rune_options(&c, 11, 2, strict)), vec![0]);
    }

    #[test]
    fn filter_choices_round_trip() {
        for f in CharacterFilter::ALL {
            assert_eq!(CharacterFilter::from_choice(f.choice_value()), Some(f));
        }
        assert_eq!(CharacterFilter::from_choice(99), None);
    }

    fn record(weapon_rune: i64, runes: [i64; 3]) -> String {
        format!(
            r#"{{"level": 10, "exp": 0, "max_hp": 50, "now_hp": 50, "todome": 0,
                "mp": [34, 0, 0, 0], "para": [1, 2, 3, 4, 5, 6, 7],
                "mon_eqp": [{}, {}, {}], "bogu_eqp": [1, 1, 1],
                "item_eqp": [{{"item_no": 45, "use_cnt": 16}}],
                "buki_lv": 3, "buki_mon": {weapon_rune}, "extra": true}}"#,
            runes[0], runes[1], runes[2]
        )
    }

    fn save(records: usize) -> SaveValue {
        let list: Vec<String> = (0..records)
            .map(|i| record(if i == 26 { 5 } else { 0 }, [0, if i == 1 { 13 } else { 0 }, 0]))
            .collect();
        SaveValue::parse(&format!(
            r#"{{"game_data": {{"chara_flag": [0, 70, 0]}}, "chara_data": {{"c_varia_dat": [{}]}}}}"#,
            list.join(",")
        ))
        .unwrap()
    }

    fn render(root: &SaveValue, options: RenderOptions) -> Widget {
        render_at(
            &small(),
            root,
            SessionToggles::default(),
            options,
            "c_varia_dat",
            DataPath::from_dotted("chara_data.c_varia_dat"),
        )
    }

    #[test]
    fn beasts_have_equipment_weapon_and_accessories_forced_off() {
        let root = save(30);
        let w = render(&root, RenderOptions::default());
        for key in [
            "chara_data.c_varia_dat[26].bogu_eqp[0]",
            "chara_data.c_varia_dat[26].bogu_eqp[2]",
            "chara_data.c_varia_dat[26].buki_mon",
            "chara_data.c_varia_dat[26].item_eqp[0]",
        ] {
            let c = w.find_control(&WidgetKey::new(key)).unwrap();
            assert!(!c.is_editable(), "{key}");
            match &c.kind {
                ControlKind::Select { selected, .. } => assert_eq!(*selected, 0, "{key}"),
                ControlKind::ItemPicker { item_no, .. } => assert_eq!(*item_no, 0, "{key}"),
                other => panic!("{key}: {other:?}"),
            }
        }
    }

    #[test]
    fn shields_locked_for_non_users_and_runes_locked_by_tag() {
        let root = save(30);
        let w = render(&root, RenderOptions::default());
        let riou_shield = w
            .find_control(&WidgetKey::new("chara_data.c_varia_dat[1].bogu_eqp[2]"))
            .unwrap();
        assert_eq!(
            riou_shield.selected_label().as_deref(),
            Some("0: None (Cannot equip shields)")
        );
        let flik_shield = w
            .find_control(&WidgetKey::new("chara_data.c_varia_dat[2].bogu_eqp[2]"))
            .unwrap();
        assert!(flik_shield.is_editable());
        let locked = w
            .find_control(&WidgetKey::new("chara_data.c_varia_dat[1].mon_eqp[1]"))
            .unwrap();
        assert!(!locked.is_editable());
    }

    #[test]
    fn weapon_rune_uses_fixed_list_and_mp_has_gauge() {
        let root = save(3);
        let w = render(&root, RenderOptions::default());
        let weapon = w
            .find_control(&WidgetKey::new("chara_data.c_varia_dat[2].buki_mon"))
            .unwrap();
        let ControlKind::Select { options, .. } = &weapon.kind else {
            panic!("not a select");
        };
        assert_eq!(options.len(), WEAPON_RUNES.len());
        assert!(matches!(
            w.find(&WidgetKey::new("gauge:chara_data.c_varia_dat[1].mp[0]")),
            Some(Widget::Gauge {
                filled: 2,
                total: 9,
                ..
            })
        ));
        assert_eq!(
            w.text_at(&WidgetKey::new("char:chara_data.c_varia_dat[1]")),
            Some("Recruited")
        );
    }

    #[test]
    fn index_zero_and_non_playable_records_are_not_rendered() {
        let root = save(90);
        let w = render(&root, RenderOptions::default());
        assert!(w.find(&WidgetKey::new("char:chara_data.c_varia_dat[0]")).is_none());
        assert!(w.find(&WidgetKey::new("char:chara_data.c_varia_dat[83]")).is_some());
        assert!(w.find(&WidgetKey::new("char:chara_data.c_varia_dat[84]")).is_none());
        let Widget::Section { title, children, .. } = &w else {
            panic!("expected a section");
        };
        assert_eq!(title, "Battle Character Data [84 playable characters]");
        assert!(matches!(
            children.last(),
            Some(Widget::Text { text, .. }) if text.ends_with("6 non-playable characters hidden.")
        ));
    }

    #[test]
    fn filter_hides_characters_without_the_attribute() {
        let root = save(30);
        let options = RenderOptions {
            character_filter: CharacterFilter::Monster,
            ..Default::default()
        };
        let w = render(&root, options);
        assert!(w.find(&WidgetKey::new("char:chara_data.c_varia_dat[26]")).is_some());
        assert!(w.find(&WidgetKey::new("char:chara_data.c_varia_dat[1]")).is_none());
    }
}
