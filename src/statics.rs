// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs and the renderers to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "GSDE: Gensosuikoden II Save Editor";

pub const EN_BTN_OPEN: &str = "Open...";
pub const EN_BTN_SAVE_AS: &str = "Save As...";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_PICK: &str = "Pick";
pub const EN_BTN_CLEAR: &str = "Clear";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_WINDOW_PICK_ITEM: &str = "Select Item";
pub const EN_WINDOW_PICK_ACCESSORY: &str = "Select Item for Accessory Slot";

pub const EN_ABOUT_HEADING: &str = "GSDE: Gensosuikoden II Save Editor";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_CATALOG: &str = "Lookup catalog:";
pub const EN_ABOUT_CATALOG_BUNDLED: &str = "bundled";
pub const EN_ABOUT_CATALOG_PARTIAL: &str = "The bundled catalog only names a starter set of characters and items. \
    Other ids show as \"Unknown (<id>)\". Set GSDE_CATALOG to a full JSON5 catalog to name them all.";
pub const EN_ABOUT_LOGGING: &str = "Set RUST_LOG=debug to log every edit.";

pub const EN_HOME_HEADING: &str = "GSDE: Gensosuikoden II Save Editor";
pub const EN_HOME_INSTRUCTIONS: &str = "Open a Gensosuikoden II save (.json) to begin.";

pub const EN_TAB_DATA_VALUES: &str = "Data Values";
pub const EN_PICKER_ITEM_TYPE: &str = "Item Type:";
pub const EN_PICKER_SELECT_TYPE: &str = "Select an item type";
pub const EN_LABEL_SEARCH: &str = "Search:";
pub const EN_HINT_SEARCH: &str = "ID or name";
pub const EN_LABEL_RUNE_POLICY: &str = "Rune slots:";
pub const EN_PICKER_NO_MATCHES: &str = "No matching entries.";

pub const EN_COL_ID: &str = "ID";
pub const EN_COL_NAME: &str = "Name";
pub const EN_COL_ATTRS: &str = "Attrs";
pub const EN_COL_INDEX: &str = "#";
pub const EN_COL_ITEM: &str = "Item";
pub const EN_COL_TYPE: &str = "Type";
pub const EN_COL_CHARACTER: &str = "Character";
pub const EN_COL_FLAG: &str = "Flag";
pub const EN_COL_STATUS: &str = "Status";

pub const EN_STATUS_READY: &str = "Ready.";
pub const EN_STATUS_LOADED: &str = "Loaded";
pub const EN_STATUS_SAVED: &str = "Saved";
pub const EN_LABEL_UNSAVED: &str = "(unsaved changes)";
pub const EN_LABEL_ERROR: &str = "Error:";

pub const EN_FILE_FILTER_SAVE: &str = "Save files";
pub const EN_DEFAULT_SAVE_NAME: &str = "edited_save.json";

// Placeholders for lookup misses.
pub const EN_UNKNOWN: &str = "Unknown";
pub const EN_UNKNOWN_ITEM: &str = "Unknown Item";
pub const EN_NONE: &str = "None";

// Item type names (inventory classification).
pub const EN_TYPE_EQUIPMENT: &str = "Equipment";
pub const EN_TYPE_RUNE: &str = "Rune";
pub const EN_TYPE_FARMING: &str = "Farming";
pub const EN_TYPE_TRADE: &str = "Trade";
pub const EN_TYPE_BASE: &str = "Base Item";
pub const EN_TYPE_FOOD: &str = "Food";
pub const EN_TYPE_REGULAR: &str = "Regular Item";

// Recruitment status labels.
pub const EN_RECRUIT_IMPORT: &str = "Available (Import)";
pub const EN_RECRUIT_SUBSTITUTION: &str = "Recruited Via SFix";
pub const EN_RECRUIT_CHAIN: &str = "Recruited Via Kraken";
pub const EN_RECRUIT_RECRUITED: &str = "Recruited";
pub const EN_RECRUIT_ON_LEAVE: &str = "On Leave";
pub const EN_RECRUIT_DECEASED: &str = "Deceased";
pub const EN_RECRUIT_EVENT_LOCKED: &str = "Event Locked";
pub const EN_RECRUIT_SPOKE_TO: &str = "Spoke To";
pub const EN_RECRUIT_NOT_RECRUITED: &str = "Not Recruited";
pub const EN_TOGGLE_PAIR_RULE: &str = "Better Leona option (Valeria / Kasumi substitute for each other)";
pub const EN_TOGGLE_CHAIN_RULE: &str = "Kraken patch (Chuchara brings Abizboah and Rulodia)";

// Save structure keys (SK_ prefix).
pub const SK_GAME_DATA: &str = "game_data";
pub const SK_PARTY_DATA: &str = "party_data";
pub const SK_CHARA_DATA: &str = "chara_data";
pub const SK_CHARA_FLAG: &str = "chara_flag";
pub const SK_EVENT_FLAG: &str = "event_flag";
pub const SK_MACD_NAME: &str = "macd_name";
pub const SK_ITEM_NO: &str = "item_no";
pub const SK_USE_CNT: &str = "use_cnt";

pub const SK_PARA: &str = "para";
pub const SK_MON_EQP: &str = "mon_eqp";
pub const SK_BOGU_EQP: &str = "bogu_eqp";
pub const SK_ITEM_EQP: &str = "item_eqp";
pub const SK_BUKI_LV: &str = "buki_lv";
pub const SK_BUKI_MON: &str = "buki_mon";
pub const SK_MP: &str = "mp";

// Common
pub const EN_EMPTY: &str = "";
pub const NL_LF: &str = "\n";
pub const NL_CRLF: &str = "\r\n";
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

// Environment
pub const ENV_CATALOG: &str = "GSDE_CATALOG";

// Persistence keys for eframe storage.
pub const PREF_PAIR_RULE: &str = "gsde.better_leona";
pub const PREF_CHAIN_RULE: &str = "gsde.kraken_patch";
pub const PREF_DARK_MODE: &str = "gsde.dark_mode";
