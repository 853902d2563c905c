//! Read-only lookup tables (characters, items, equipment, runes) and the
//! `use_cnt`-driven item name resolution built on top of them.

use crate::statics;
use log::{info, warn};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
};

const BUNDLED_CATALOG: &str = include_str!("../assets/gamedata.json5");

/// Regular item ids that are key items; the key item picker offers these and the
/// accessory picker hides them.
pub const KEY_ITEM_IDS: &[i64] = &[
    29, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 51, 52, 53, 54, 55, 72, 73, 74,
];
const ACCESSORY_EXCLUDED_RANGE: std::ops::RangeInclusive<i64> = 47..=50;

pub const USE_CNT_EQUIPMENT: i64 = 16;
pub const USE_CNT_RUNE: i64 = 32;
pub const USE_CNT_FARMING: i64 = 48;
pub const USE_CNT_TRADE: i64 = 64;
pub const USE_CNT_BASE: i64 = 80;
pub const USE_CNT_FOOD_MIN: i64 = 99;
pub const USE_CNT_FOOD_DEFAULT: i64 = 101;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("reading catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing catalog: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub attrs: Vec<String>,
}

impl Entry {
    pub fn has_attr(&self, attr: &str) -> bool {
        self.attrs.iter().any(|a| a == attr)
    }

    /// First attribute as a number; recipes and consumables carry their `use_cnt` there.
    fn numeric_attr(&self) -> Option<i64> {
        self.attrs.first().and_then(|a| a.parse().ok())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table(BTreeMap<i64, Entry>);

impl Table {
    pub fn get(&self, id: i64) -> Option<&Entry> {
        self.0.get(&id)
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.get(id).map(|e| e.name.as_str())
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &Entry)> {
        self.0.iter().map(|(id, e)| (*id, e))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Characters,
    Runes,
    Items,
    Farming,
    Trade,
    BaseItems,
    Food,
    Helmet,
    Armor,
    Shield,
    Accessories,
}

impl TableKind {
    pub const ALL: [TableKind; 11] = [
        TableKind::Characters,
        TableKind::Runes,
        TableKind::Items,
        TableKind::Farming,
        TableKind::Trade,
        TableKind::BaseItems,
        TableKind::Food,
        TableKind::Helmet,
        TableKind::Armor,
        TableKind::Shield,
        TableKind::Accessories,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TableKind::Characters => "Characters",
            TableKind::Runes => "Runes",
            TableKind::Items => "Items",
            TableKind::Farming => "Farming",
            TableKind::Trade => "Trade",
            TableKind::BaseItems => "Base Items",
            TableKind::Food => "Food",
            TableKind::Helmet => "Helmets",
            TableKind::Armor => "Armor",
            TableKind::Shield => "Shields",
            TableKind::Accessories => "Accessories",
        }
    }
}

/// Inventory item category, selected by the record's `use_cnt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Regular,
    Equipment,
    Rune,
    Farming,
    Trade,
    Base,
    Food,
}

impl ItemKind {
    pub fn from_use_cnt(use_cnt: i64) -> Self {
        match use_cnt {
            USE_CNT_EQUIPMENT => ItemKind::Equipment,
            USE_CNT_RUNE => ItemKind::Rune,
            USE_CNT_FARMING => ItemKind::Farming,
            USE_CNT_TRADE => ItemKind::Trade,
            USE_CNT_BASE => ItemKind::Base,
            n if n >= USE_CNT_FOOD_MIN => ItemKind::Food,
            _ => ItemKind::Regular,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ItemKind::Equipment => statics::EN_TYPE_EQUIPMENT,
            ItemKind::Rune => statics::EN_TYPE_RUNE,
            ItemKind::Farming => statics::EN_TYPE_FARMING,
            ItemKind::Trade => statics::EN_TYPE_TRADE,
            ItemKind::Base => statics::EN_TYPE_BASE,
            ItemKind::Food => statics::EN_TYPE_FOOD,
            ItemKind::Regular => statics::EN_TYPE_REGULAR,
        }
    }
}

/// Legend shown above inventory tables.
pub const ITEM_KIND_LEGEND: &[(&str, &str)] = &[
    ("0-9", "Regular Items"),
    ("16", "Equipment (all equipment types use 16)"),
    ("32", "Runes"),
    ("48", "Farming Items"),
    ("64", "Trade Items / Bath Items"),
    ("80", "Base/Warehouse Items"),
    ("99+", "Food Items (per-recipe values, be careful with the count)"),
];

/// Which picker dialog a row opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerScope {
    /// Every category, for bag and warehouse tables.
    Inventory,
    /// Regular items (minus key items), accessories and food.
    Accessory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickEntry {
    pub item_no: i64,
    pub use_cnt: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerCategory {
    pub title: &'static str,
    pub hint: &'static str,
    pub entries: Vec<PickEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub source: CatalogSource,
    pub characters: Table,
    pub runes: Table,
    pub items: Table,
    pub farming: Table,
    pub trade: Table,
    pub base_items: Table,
    pub food: Table,
    pub helmet: Table,
    pub armor: Table,
    pub shield: Table,
    pub accessories: Table,
    pub beasts: BTreeSet<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttr {
    Text(String),
    Number(i64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        attrs: Vec<RawAttr>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawCatalog {
    #[serde(default)]
    characters: BTreeMap<String, RawEntry>,
    #[serde(default)]
    runes: BTreeMap<String, RawEntry>,
    #[serde(default)]
    items: BTreeMap<String, RawEntry>,
    #[serde(default)]
    farming: BTreeMap<String, RawEntry>,
    #[serde(default)]
    trade: BTreeMap<String, RawEntry>,
    #[serde(default)]
    base_item: BTreeMap<String, RawEntry>,
    #[serde(default)]
    food: BTreeMap<String, RawEntry>,
    #[serde(default)]
    helmet: BTreeMap<String, RawEntry>,
    #[serde(default)]
    armor: BTreeMap<String, RawEntry>,
    #[serde(default)]
    shield: BTreeMap<String, RawEntry>,
    #[serde(default)]
    other_equip_gear: BTreeMap<String, RawEntry>,
    #[serde(default)]
    beasts: Vec<i64>,
}

fn build_table(raw: BTreeMap<String, RawEntry>) -> Table {
    let mut table = BTreeMap::new();
    for (id, entry) in raw {
        let Ok(id) = id.trim().parse::<i64>() else {
            warn!("catalog id {id:?} is not a number, skipping");
            continue;
        };
        let entry = match entry {
            RawEntry::Name(name) => Entry {
                name,
                attrs: Vec::new(),
            },
            RawEntry::Full { name, attrs } => Entry {
                name,
                attrs: attrs
                    .into_iter()
                    .map(|a| match a {
                        RawAttr::Text(s) => s,
                        RawAttr::Number(n) => n.to_string(),
                    })
                    .collect(),
            },
        };
        table.insert(id, entry);
    }
    Table(table)
}

impl Catalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json5_str(BUNDLED_CATALOG, CatalogSource::Bundled)
    }

    pub fn load_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json5_str(&text, CatalogSource::File(path.to_path_buf()))
    }

    /// Use the file named by `GSDE_CATALOG` when set and readable, otherwise the bundled tables.
    pub fn from_env() -> Result<Self, CatalogError> {
        if let Some(path) = std::env::var_os(statics::ENV_CATALOG) {
            let path = PathBuf::from(path);
            match Self::load_path(&path) {
                Ok(catalog) => {
                    info!("using lookup catalog {path:?}");
                    return Ok(catalog);
                }
                Err(e) => warn!("{e}; falling back to the bundled catalog"),
            }
        }
        Self::bundled()
    }

    pub fn from_json5_str(text: &str, source: CatalogSource) -> Result<Self, CatalogError> {
        let raw: RawCatalog = json5::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(Self {
            source,
            characters: build_table(raw.characters),
            runes: build_table(raw.runes),
            items: build_table(raw.items),
            farming: build_table(raw.farming),
            trade: build_table(raw.trade),
            base_items: build_table(raw.base_item),
            food: build_table(raw.food),
            helmet: build_table(raw.helmet),
            armor: build_table(raw.armor),
            shield: build_table(raw.shield),
            accessories: build_table(raw.other_equip_gear),
            beasts: raw.beasts.into_iter().collect(),
        })
    }

    pub fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Characters => &self.characters,
            TableKind::Runes => &self.runes,
            TableKind::Items => &self.items,
            TableKind::Farming => &self.farming,
            TableKind::Trade => &self.trade,
            TableKind::BaseItems => &self.base_items,
            TableKind::Food => &self.food,
            TableKind::Helmet => &self.helmet,
            TableKind::Armor => &self.armor,
            TableKind::Shield => &self.shield,
            TableKind::Accessories => &self.accessories,
        }
    }

    pub fn is_beast(&self, character: i64) -> bool {
        self.beasts.contains(&character)
    }

    /// Equipment ids are not globally unique; the sub-tables are searched in a fixed order.
    fn equipment_tables(&self) -> [(&'static str, &Table); 4] {
        [
            ("Helmet", &self.helmet),
            ("Armor", &self.armor),
            ("Shield", &self.shield),
            ("Accessory", &self.accessories),
        ]
    }

    /// Display name for an item record. Misses degrade to a placeholder, never an error.
    pub fn item_name(&self, item_no: i64, use_cnt: i64) -> String {
        let kind = ItemKind::from_use_cnt(use_cnt);
        let found = match kind {
            ItemKind::Equipment => self
                .equipment_tables()
                .into_iter()
                .find_map(|(_, t)| t.name(item_no)),
            ItemKind::Rune => self.runes.name(item_no),
            ItemKind::Farming => self.farming.name(item_no),
            ItemKind::Trade => self.trade.name(item_no),
            ItemKind::Base => self.base_items.name(item_no),
            ItemKind::Food => self.food.name(item_no),
            ItemKind::Regular => self.items.name(item_no),
        };
        match found {
            Some(name) => name.to_string(),
            None => format!("{} ({item_no})", statics::EN_UNKNOWN),
        }
    }

    pub fn character_name(&self, id: i64) -> String {
        match self.characters.name(id) {
            Some(name) => name.to_string(),
            None => format!("Character {id}"),
        }
    }

    pub fn picker_categories(&self, scope: PickerScope) -> Vec<PickerCategory> {
        match scope {
            PickerScope::Inventory => vec![
                self.regular_category(|_| true),
                self.equipment_category(),
                simple_category("Runes", "use_cnt: 32", &self.runes, USE_CNT_RUNE),
                simple_category("Farming Items", "use_cnt: 48", &self.farming, USE_CNT_FARMING),
                simple_category("Trade Items", "use_cnt: 64", &self.trade, USE_CNT_TRADE),
                simple_category("Base/Warehouse", "use_cnt: 80", &self.base_items, USE_CNT_BASE),
                self.food_category(),
            ],
            PickerScope::Accessory => vec![
                self.regular_category(|id| {
                    !KEY_ITEM_IDS.contains(&id) && !ACCESSORY_EXCLUDED_RANGE.contains(&id)
                }),
                simple_category("Accessories", "use_cnt: 16", &self.accessories, USE_CNT_EQUIPMENT),
                self.food_category(),
            ],
        }
    }

    fn regular_category(&self, keep: impl Fn(i64) -> bool) -> PickerCategory {
        PickerCategory {
            title: "Regular Items",
            hint: "use_cnt: 0-9",
            entries: self
                .items
                .iter()
                .filter(|(id, _)| keep(*id))
                .map(|(id, e)| PickEntry {
                    item_no: id,
                    use_cnt: e.numeric_attr().unwrap_or(0),
                    label: e.name.clone(),
                })
                .collect(),
        }
    }

    fn equipment_category(&self) -> PickerCategory {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (prefix, table) in self.equipment_tables() {
            for (id, e) in table.iter() {
                if !seen.insert(id) {
                    continue;
                }
                let label = if id == 0 {
                    e.name.clone()
                } else {
                    format!("[{prefix}] {}", e.name)
                };
                entries.push(PickEntry {
                    item_no: id,
                    use_cnt: USE_CNT_EQUIPMENT,
                    label,
                });
            }
        }
        entries.sort_by_key(|e| e.item_no);
        PickerCategory {
            title: "Equipment",
            hint: "use_cnt: 16",
            entries,
        }
    }

    fn food_category(&self) -> PickerCategory {
        PickerCategory {
            title: "Food Items",
            hint: "use_cnt: 101-106",
            entries: self
                .food
                .iter()
                .filter(|(id, _)| *id != 0)
                .map(|(id, e)| PickEntry {
                    item_no: id,
                    use_cnt: e.numeric_attr().unwrap_or(USE_CNT_FOOD_DEFAULT),
                    label: e.name.clone(),
                })
                .collect(),
        }
    }
}

fn simple_category(
    title: &'static str,
    hint: &'static str,
    table: &Table,
    use_cnt: i64,
) -> PickerCategory {
    PickerCategory {
        title,
        hint,
        entries: table
            .iter()
            .map(|(id, e)| PickEntry {
                item_no: id,
                use_cnt,
                label: e.name.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Catalog, CatalogSource, ItemKind, PickerScope};
    use pretty_assertions::assert_eq;

    pub(crate) const SMALL: &str = r#"{
        CHARACTERS: {
            "1": { name: "Riou", attrs: ["C", "L", "M", "Y"] },
            "2": { name: "Flik", attrs: ["C", "L", "S", "M"] },
            "26": { name: "Shiro", attrs: ["Z"] },
        },
        RUNES: {
            "0": { name: "None", attrs: [] },
            "1": { name: "Fire Orb", attrs: ["N", "Wep"] },
            "13": { name: "Bright Shield Orb", attrs: [1, "RH", "X"] },
        },
        ITEMS: { "0": "None", "1": "Medicine", "29": "Blinking Mirror", "48": "Old Key" },
        FOOD: { "0": "None", "1": { name: "Tamago-Yaki", attrs: ["103"] }, "2": "Sweet Omelet" },
        HELMET: { "0": "None", "1": { name: "Bandanna", attrs: ["C"] } },
        ARMOR: { "0": "None", "1": { name: "Clothes", attrs: ["L"] } },
        OTHER_EQUIP_GEAR: { "0": "None", "45": "Wooden Shoes" },
        BEASTS: [26],
    }"#;

    pub(crate) fn small() -> Catalog {
        Catalog::from_json5_str(SMALL, CatalogSource::Bundled).unwrap()
    }

    #[test]
    fn bundled_catalog_parses() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.characters.is_empty());
        assert_eq!(catalog.runes.name(1), Some("Fire Orb"));
        assert!(catalog.is_beast(26));
    }

    #[test]
    fn numeric_attrs_become_strings() {
        let catalog = small();
        let rune = catalog.runes.get(13).unwrap();
        assert_eq!(rune.attrs, vec!["1", "RH", "X"]);
    }

    #[test]
    fn item_kind_follows_use_cnt() {
        assert_eq!(ItemKind::from_use_cnt(3), ItemKind::Regular);
        assert_eq!(ItemKind::from_use_cnt(16), ItemKind::Equipment);
        assert_eq!(ItemKind::from_use_cnt(99), ItemKind::Food);
        assert_eq!(ItemKind::from_use_cnt(120), ItemKind::Food);
        assert_eq!(ItemKind::from_use_cnt(17), ItemKind::Regular);
    }

    #[test]
    fn name_resolution_is_stable_and_degrades() {
        let catalog = small();
        let first = catalog.item_name(1, 16);
        assert_eq!(first, "Bandanna");
        assert_eq!(catalog.item_name(1, 16), first);
        assert_eq!(catalog.item_name(45, 16), "Wooden Shoes");
        assert_eq!(catalog.item_name(77, 16), "Unknown (77)");
        assert_eq!(catalog.item_name(77, 32), "Unknown (77)");
        assert_eq!(catalog.item_name(1, 32), "Fire Orb");
        assert_eq!(catalog.item_name(1, 0), "Medicine");
    }

    #[test]
    fn equipment_picker_prefers_helmet_on_id_collision() {
        let catalog = small();
        let cats = catalog.picker_categories(PickerScope::Inventory);
        let equipment = cats.iter().find(|c| c.title == "Equipment").unwrap();
        let labels: Vec<_> = equipment.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["None", "[Helmet] Bandanna", "[Accessory] Wooden Shoes"]);
    }

    #[test]
    fn accessory_picker_hides_key_items_and_food_none() {
        let catalog = small();
        let cats = catalog.picker_categories(PickerScope::Accessory);
        let regular: Vec<_> = cats[0].entries.iter().map(|e| e.item_no).collect();
        assert_eq!(regular, vec![0, 1]);
        let food: Vec<_> = cats[2].entries.iter().map(|e| (e.item_no, e.use_cnt)).collect();
        assert_eq!(food, vec![(1, 103), (2, 101)]);
    }
}
