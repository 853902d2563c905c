use crate::statics;
use std::collections::HashMap;

/// Optional recruitment rules. They only change how statuses are displayed and are
/// never written into the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecruitRule {
    /// Valeria and Kasumi substitute for each other.
    PairSubstitution,
    /// Recruiting Chuchara also brings Abizboah and Rulodia.
    ChainUnlock,
}

impl RecruitRule {
    pub const ALL: [RecruitRule; 2] = [RecruitRule::PairSubstitution, RecruitRule::ChainUnlock];

    pub fn pref_key(self) -> &'static str {
        match self {
            RecruitRule::PairSubstitution => statics::PREF_PAIR_RULE,
            RecruitRule::ChainUnlock => statics::PREF_CHAIN_RULE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecruitRule::PairSubstitution => statics::EN_TOGGLE_PAIR_RULE,
            RecruitRule::ChainUnlock => statics::EN_TOGGLE_CHAIN_RULE,
        }
    }
}

/// Named boolean preferences that outlive a single save.
pub trait PreferenceStore {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn set_bool(&mut self, key: &str, value: bool);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, bool>,
}

impl PreferenceStore for MemoryPreferences {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), value);
    }
}

/// Session-local rule toggles, handed to every renderer that derives a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionToggles {
    pub pair_substitution: bool,
    pub chain_unlock: bool,
}

impl SessionToggles {
    pub fn get(&self, rule: RecruitRule) -> bool {
        match rule {
            RecruitRule::PairSubstitution => self.pair_substitution,
            RecruitRule::ChainUnlock => self.chain_unlock,
        }
    }

    pub fn set(&mut self, rule: RecruitRule, on: bool) {
        match rule {
            RecruitRule::PairSubstitution => self.pair_substitution = on,
            RecruitRule::ChainUnlock => self.chain_unlock = on,
        }
    }

    pub fn load(store: &dyn PreferenceStore) -> Self {
        let mut toggles = Self::default();
        for rule in RecruitRule::ALL {
            toggles.set(rule, store.get_bool(rule.pref_key()).unwrap_or(false));
        }
        toggles
    }

    pub fn store(&self, store: &mut dyn PreferenceStore) {
        for rule in RecruitRule::ALL {
            store.set_bool(rule.pref_key(), self.get(rule));
        }
    }
}
