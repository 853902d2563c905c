//! Field registry: which save keys are edited, under which tab, by which renderer.
//!
//! Pure data. Adding a field is one entry in [`FIELDS`] plus its key in a group's
//! ordered list.

use crate::statics;

// Renderer kinds. Descriptors may name a kind that has no registered renderer;
// dispatch then falls back to the generic binder.
pub const KIND_PARTY_MEMBERS: &str = "party_members";
pub const KIND_LOCATION: &str = "location";
pub const KIND_PLAY_TIME: &str = "play_time";
pub const KIND_COOK_OFF: &str = "cook_off_progress";
pub const KIND_ALIASES: &str = "castle_editors_combined";
pub const KIND_SKIP: &str = "skip";
pub const KIND_BATTLE_CHARACTERS: &str = "battle_characters";
pub const KIND_KEY_ITEMS: &str = "key_items";
pub const KIND_TABLE: &str = "table";
pub const KIND_BATH_ITEMS: &str = "bath_items";
pub const KIND_RECRUITMENT: &str = "recruitment";

const ITEM_COLUMNS: &[&str] = &[statics::SK_ITEM_NO, statics::SK_USE_CNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    General,
    BattleCharacters,
    RecruitedCharacters,
    PartyBag,
    Warehouse,
    Bath,
    Experimental,
}

impl Group {
    pub const ALL: [Group; 7] = [
        Group::General,
        Group::BattleCharacters,
        Group::RecruitedCharacters,
        Group::PartyBag,
        Group::Warehouse,
        Group::Bath,
        Group::Experimental,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Group::General => "General",
            Group::BattleCharacters => "Battle Characters",
            Group::RecruitedCharacters => "Recruited Characters",
            Group::PartyBag => "Party Bag",
            Group::Warehouse => "Warehouse",
            Group::Bath => "Bath",
            Group::Experimental => "Experimental",
        }
    }

    /// Subtree backing the group. `None` means the group mixes sources and each
    /// field is probed (see [`PROBE_ORDER`]).
    pub fn data_path(self) -> Option<&'static str> {
        match self {
            Group::General | Group::RecruitedCharacters | Group::Experimental => None,
            Group::BattleCharacters => Some(statics::SK_CHARA_DATA),
            Group::PartyBag => Some(statics::SK_PARTY_DATA),
            Group::Warehouse | Group::Bath => Some(statics::SK_GAME_DATA),
        }
    }

    /// Field keys in display order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Group::General => &[
                "exit_member",
                "location",
                "play_time",
                "date_time_now",
                "bozu_name",
                "bozu_name2",
                "macd_name",
                "m_base_name",
                "nakam_1_num",
                "base_name",
                "team_name",
                "base_lv",
                "furo_info",
                "kaji_lv",
                "ninki",
                "gold",
                "cook_off_progress",
                "kari_name",
                "food_menu",
            ],
            Group::BattleCharacters => &["c_varia_dat"],
            Group::RecruitedCharacters => &[statics::SK_CHARA_FLAG],
            Group::PartyBag => &["event_item", "party_item"],
            Group::Warehouse => &["base_item", "room_item"],
            Group::Bath => &["furo_item"],
            Group::Experimental => &["tantei_lv", "hon_flag", "t_box_flag"],
        }
    }
}

/// Candidate subtrees for groups without a fixed path, highest priority first.
/// An empty string is the root.
pub const PROBE_ORDER: [&str; 3] = [statics::SK_GAME_DATA, statics::SK_PARTY_DATA, ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub group: Option<Group>,
    pub renderer: Option<&'static str>,
    pub columns: &'static [&'static str],
    pub data_path: Option<&'static str>,
    pub readonly: bool,
    pub warning: Option<&'static str>,
    /// Virtual fields have no backing key of their own and bind to the whole tree.
    pub is_virtual: bool,
}

impl FieldDescriptor {
    const fn label(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            group: None,
            renderer: None,
            columns: &[],
            data_path: None,
            readonly: false,
            warning: None,
            is_virtual: false,
        }
    }

    const fn field(key: &'static str, label: &'static str, group: Group) -> Self {
        let mut d = Self::label(key, label);
        d.group = Some(group);
        d
    }

    /// Stand-in for a key with no registry entry: labelled by the key, generic rendering.
    pub const fn unregistered(key: &'static str, group: Group) -> Self {
        Self::field(key, key, group)
    }

    const fn rendered(mut self, kind: &'static str) -> Self {
        self.renderer = Some(kind);
        self
    }

    const fn at(mut self, path: &'static str) -> Self {
        self.data_path = Some(path);
        self
    }

    const fn table(mut self) -> Self {
        self.renderer = Some(KIND_TABLE);
        self.columns = ITEM_COLUMNS;
        self
    }

    const fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    const fn warn(mut self, text: &'static str) -> Self {
        self.warning = Some(text);
        self
    }

    const fn virtual_field(mut self) -> Self {
        self.is_virtual = true;
        self
    }
}

pub static FIELDS: &[FieldDescriptor] = &[
    // General
    FieldDescriptor::field("exit_member", "Active Party Members", Group::General)
        .rendered(KIND_PARTY_MEMBERS),
    FieldDescriptor::field("location", "Location", Group::General)
        .rendered(KIND_LOCATION)
        .virtual_field(),
    FieldDescriptor::field("play_time", "Play Time", Group::General).rendered(KIND_PLAY_TIME),
    FieldDescriptor::field("date_time_now", "Last Modified (In-Game)", Group::General),
    FieldDescriptor::field("bozu_name", "Hero Name (Suikoden 2)", Group::General),
    FieldDescriptor::field("bozu_name2", "Hero Name (Real)", Group::General),
    FieldDescriptor::field("macd_name", "Hero Name (Suikoden 1)", Group::General),
    FieldDescriptor::field("m_base_name", "Suikoden 1 HQ Name", Group::General),
    FieldDescriptor::field("nakam_1_num", "S1 Recruited", Group::General).readonly(),
    FieldDescriptor::field("base_name", "Castle Name", Group::General),
    FieldDescriptor::field("team_name", "Army Name", Group::General),
    FieldDescriptor::field("base_lv", "Castle Level", Group::General),
    // No dedicated renderer exists for this kind yet; it renders generically.
    FieldDescriptor::field("furo_info", "Bath House Level", Group::General).rendered("bath_level"),
    FieldDescriptor::field("kaji_lv", "Blacksmith Level", Group::General),
    FieldDescriptor::field("ninki", "Popularity", Group::General),
    FieldDescriptor::field("gold", "Potch", Group::General),
    FieldDescriptor::field("cook_off_progress", "Cook-Off Battles Won", Group::General)
        .rendered(KIND_COOK_OFF)
        .virtual_field(),
    FieldDescriptor::field("kari_name", "Greenhill Mission Aliases", Group::General)
        .rendered(KIND_ALIASES),
    FieldDescriptor::field("food_menu", "Castle Menu Orders", Group::General).rendered(KIND_SKIP),
    // Experimental
    FieldDescriptor::field(
        "tantei_lv",
        "Richmond's Detective Clues (64 bytes, bit flags)",
        Group::Experimental,
    ),
    FieldDescriptor::field(
        "hon_flag",
        "Castle Flags ([30-31]=Veggies 255=full, [32]=Animals)",
        Group::Experimental,
    ),
    FieldDescriptor::field(
        "t_box_flag",
        "Treasure Chests (32 bytes, 256 chests total)",
        Group::Experimental,
    ),
    // Battle characters
    FieldDescriptor::field("c_varia_dat", "Battle Character Data", Group::BattleCharacters)
        .rendered(KIND_BATTLE_CHARACTERS)
        .at(statics::SK_CHARA_DATA),
    // Party bag
    FieldDescriptor::field("event_item", "Key Items", Group::PartyBag)
        .rendered(KIND_KEY_ITEMS)
        .at(statics::SK_PARTY_DATA),
    FieldDescriptor::field("party_item", "Inventory", Group::PartyBag)
        .table()
        .at(statics::SK_PARTY_DATA),
    // Warehouse
    FieldDescriptor::field("base_item", "Warehouse Items", Group::Warehouse)
        .table()
        .at(statics::SK_GAME_DATA),
    FieldDescriptor::field("room_item", "Room Items", Group::Warehouse)
        .table()
        .at(statics::SK_GAME_DATA)
        .warn("Experimental feature - Room items are unused in the game. Purpose unknown. Edit at your own risk."),
    // Bath
    FieldDescriptor::field("furo_item", "Bath Items", Group::Bath)
        .rendered(KIND_BATH_ITEMS)
        .at(statics::SK_GAME_DATA),
    // Recruitment
    FieldDescriptor::field(statics::SK_CHARA_FLAG, "Recruited Characters", Group::RecruitedCharacters)
        .rendered(KIND_RECRUITMENT),
    // Location parts (rendered by the location renderer)
    FieldDescriptor::field("area_no", "Area Location", Group::General),
    FieldDescriptor::field("town_no", "Town No", Group::General),
    FieldDescriptor::field("map_no", "Map No", Group::General),
    FieldDescriptor::field("px", "Player X Coordinate", Group::General),
    FieldDescriptor::field("py", "Player Y Coordinate", Group::General),
    // Character record properties
    FieldDescriptor::label(statics::SK_PARA, "Stats"),
    FieldDescriptor::label(statics::SK_MON_EQP, "Runes"),
    FieldDescriptor::label(statics::SK_ITEM_EQP, "Accessories"),
    FieldDescriptor::label(statics::SK_BOGU_EQP, "Equipment"),
    FieldDescriptor::label("level", "Level"),
    FieldDescriptor::label("exp", "Experience"),
    FieldDescriptor::label("now_hp", "Current HP"),
    FieldDescriptor::label("max_hp", "Max HP"),
    FieldDescriptor::label("now_mp", "Current MP"),
    FieldDescriptor::label("max_mp", "Max MP"),
    FieldDescriptor::label(statics::SK_BUKI_LV, "Weapon Level"),
    FieldDescriptor::label(statics::SK_BUKI_MON, "Weapon Rune"),
    FieldDescriptor::label("todome", "Killed Enemies"),
    FieldDescriptor::label(statics::SK_MP, "MP"),
    // Item record properties
    FieldDescriptor::label(statics::SK_ITEM_NO, "Item ID"),
    FieldDescriptor::label(statics::SK_USE_CNT, "Count"),
    // Misc
    FieldDescriptor::label("version", "Save Version"),
    FieldDescriptor::label(statics::SK_CHARA_DATA, "Character Data"),
    FieldDescriptor::label("war_data", "War Battle Data"),
    FieldDescriptor::label("nige_cnt", "Escaped Battles"),
    FieldDescriptor::label("ckd_info", "Character Status List"),
    FieldDescriptor::label("leader_no", "War Leader IDs"),
    FieldDescriptor::label("sub_no", "War Sub-Unit IDs"),
    FieldDescriptor::label("sub_to_leader", "Sub-Unit Assignment"),
    FieldDescriptor::label("money", "Potch"),
];

pub fn descriptor(key: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|d| d.key == key)
}

/// Registry label for a key, or the key itself.
pub fn label_for(key: &str) -> &str {
    descriptor(key).map(|d| d.label).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::{FIELDS, Group, descriptor, label_for};
    use std::collections::HashSet;

    #[test]
    fn every_grouped_key_has_a_descriptor_in_that_group() {
        for group in Group::ALL {
            for key in group.fields() {
                let d = descriptor(key).unwrap_or_else(|| panic!("missing descriptor for {key}"));
                assert_eq!(d.group, Some(group), "{key}");
            }
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut seen = HashSet::new();
        for d in FIELDS {
            assert!(seen.insert(d.key), "duplicate key {}", d.key);
        }
    }

    #[test]
    fn table_fields_carry_item_columns() {
        let d = descriptor("party_item").unwrap();
        assert_eq!(d.columns, &["item_no", "use_cnt"]);
        assert_eq!(d.data_path, Some("party_data"));
    }

    #[test]
    fn label_falls_back_to_key() {
        assert_eq!(label_for("buki_lv"), "Weapon Level");
        assert_eq!(label_for("mystery"), "mystery");
    }
}
