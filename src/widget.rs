//! Presentation-independent widget tree.
//!
//! Renderers build a [`Widget`] tree from the save; a front end paints it and reports
//! user changes back as `(WidgetKey, Input)` pairs. Each editable [`Control`] carries a
//! [`Binding`] describing where its value is written and which other widgets must be
//! rebuilt afterwards.

use crate::{SaveValue, catalog::PickerScope, edit::DataPath, prefs::RecruitRule, statics};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetKey(String);

impl WidgetKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for a control writing `path`.
    pub fn at(path: &DataPath) -> Self {
        Self(path.to_string())
    }

    /// Key for a non-control widget derived from `path` (rows, sections, notes).
    pub fn tagged(tag: &str, path: &DataPath) -> Self {
        Self(format!("{tag}:{path}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Muted,
    Good,
    Info,
    Warn,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: i64,
    pub label: String,
}

impl Choice {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    /// `"<id>: <name>"`, the label format used by every id dropdown.
    pub fn numbered(value: i64, name: &str) -> Self {
        Self::new(value, format!("{value}: {name}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Number {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    Text {
        value: String,
    },
    Checkbox {
        value: bool,
    },
    Select {
        options: Vec<Choice>,
        selected: i64,
    },
    /// Shows the resolved item name and opens a category-then-item picker.
    ItemPicker {
        item_no: i64,
        use_cnt: i64,
        name: String,
        scope: PickerScope,
    },
}

/// How a raw input becomes a stored value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerce {
    /// Floating point parse; integral results are stored as integers.
    Number,
    Clamp { min: f64, max: f64 },
    Integer,
    Text,
    Bool,
    /// Free text for a `null` slot: numbers, `true`/`false` and `null` keep their JSON type.
    Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Value { path: DataPath, coerce: Coerce },
    /// An item record; a pick writes `item_no` and `use_cnt` together.
    ItemRecord { path: DataPath },
    /// An item record whose `use_cnt` is fixed by the slot.
    ItemWithCount { path: DataPath, use_cnt: i64 },
    /// The `event_flag` array holding the two cook-off bytes.
    CookOff { path: DataPath },
    Toggle(RecruitRule),
    CharacterFilter,
}

/// What to rebuild after a successful edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// Only the edited control is resynced from the stored value.
    Nothing,
    /// These subtrees of the same field are rebuilt.
    Keys(Vec<WidgetKey>),
    /// The whole field is rebuilt.
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub target: Target,
    pub refresh: Refresh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub key: WidgetKey,
    pub label: String,
    pub kind: ControlKind,
    pub enabled: bool,
    pub hint: Option<String>,
    pub binding: Option<Binding>,
}

impl Control {
    fn new(key: WidgetKey, label: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
            enabled: true,
            hint: None,
            binding: None,
        }
    }

    pub fn number(key: WidgetKey, label: impl Into<String>, value: f64) -> Self {
        Self::new(
            key,
            label,
            ControlKind::Number {
                value,
                min: None,
                max: None,
            },
        )
    }

    pub fn text(key: WidgetKey, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, label, ControlKind::Text { value: value.into() })
    }

    pub fn checkbox(key: WidgetKey, label: impl Into<String>, value: bool) -> Self {
        Self::new(key, label, ControlKind::Checkbox { value })
    }

    pub fn select(key: WidgetKey, label: impl Into<String>, options: Vec<Choice>, selected: i64) -> Self {
        Self::new(key, label, ControlKind::Select { options, selected })
    }

    pub fn item_picker(
        key: WidgetKey,
        label: impl Into<String>,
        item_no: i64,
        use_cnt: i64,
        name: String,
        scope: PickerScope,
    ) -> Self {
        Self::new(
            key,
            label,
            ControlKind::ItemPicker {
                item_no,
                use_cnt,
                name,
                scope,
            },
        )
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        if let ControlKind::Number {
            min: lo, max: hi, ..
        } = &mut self.kind
        {
            *lo = Some(min);
            *hi = Some(max);
        }
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        if let ControlKind::Number { min: lo, .. } = &mut self.kind {
            *lo = Some(min);
        }
        self
    }

    pub fn bind(mut self, target: Target, refresh: Refresh) -> Self {
        self.binding = Some(Binding { target, refresh });
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_editable(&self) -> bool {
        self.enabled && self.binding.is_some()
    }

    /// Label of the selected option, with a placeholder for values outside the list.
    pub fn selected_label(&self) -> Option<String> {
        match &self.kind {
            ControlKind::Select { options, selected } => Some(
                options
                    .iter()
                    .find(|c| c.value == *selected)
                    .map(|c| c.label.clone())
                    .unwrap_or_else(|| format!("{selected}: {}", statics::EN_UNKNOWN)),
            ),
            _ => None,
        }
    }

    /// Resync the displayed value after a write that needs no rebuild.
    pub fn sync_from(&mut self, stored: &SaveValue) {
        match (&mut self.kind, stored) {
            (ControlKind::Number { value, .. }, SaveValue::Number(n)) => *value = n.as_f64(),
            (ControlKind::Text { value }, SaveValue::String(s)) => value.clone_from(s),
            (ControlKind::Text { value }, SaveValue::Number(_) | SaveValue::Bool(_)) => {
                *value = stored.to_compact();
            }
            (ControlKind::Checkbox { value }, SaveValue::Bool(b)) => *value = *b,
            (ControlKind::Select { selected, .. }, v) => {
                if let Some(i) = v.as_i64() {
                    *selected = i;
                }
            }
            _ => {}
        }
    }

    /// Resync from the accepted input when the target has no single stored value.
    pub fn sync_input(&mut self, input: &Input) {
        match (&mut self.kind, input) {
            (ControlKind::Select { selected, .. }, Input::Choice(v)) => *selected = *v,
            (ControlKind::Checkbox { value }, Input::Bool(b)) => *value = *b,
            (ControlKind::Number { value, .. }, Input::Number(n)) => *value = *n,
            (ControlKind::Text { value }, Input::Text(s)) => value.clone_from(s),
            _ => {}
        }
    }
}

/// A value reported by the front end for one control.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Number(f64),
    Text(String),
    Bool(bool),
    Choice(i64),
    Pick { item_no: i64, use_cnt: i64 },
}

impl Input {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Input::Number(_) => "number",
            Input::Text(_) => "text",
            Input::Bool(_) => "bool",
            Input::Choice(_) => "choice",
            Input::Pick { .. } => "pick",
        }
    }
}

impl From<Control> for Widget {
    fn from(control: Control) -> Self {
        Widget::Control(control)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Section {
        key: WidgetKey,
        title: String,
        badge: Option<(String, Tone)>,
        collapsible: bool,
        default_open: bool,
        children: Vec<Widget>,
    },
    /// Children laid out side by side.
    Row {
        key: Option<WidgetKey>,
        children: Vec<Widget>,
    },
    Control(Control),
    Text {
        key: Option<WidgetKey>,
        text: String,
        tone: Tone,
    },
    /// Filled squares out of a total (MP gauge).
    Gauge {
        key: Option<WidgetKey>,
        filled: u32,
        total: u32,
    },
    Table {
        key: WidgetKey,
        columns: Vec<String>,
        rows: Vec<Widget>,
    },
    Empty,
}

impl Widget {
    pub fn section(key: WidgetKey, title: impl Into<String>, children: Vec<Widget>) -> Self {
        Widget::Section {
            key,
            title: title.into(),
            badge: None,
            collapsible: false,
            default_open: true,
            children,
        }
    }

    pub fn collapsing(
        key: WidgetKey,
        title: impl Into<String>,
        default_open: bool,
        children: Vec<Widget>,
    ) -> Self {
        Widget::Section {
            key,
            title: title.into(),
            badge: None,
            collapsible: true,
            default_open,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Widget::Text {
            key: None,
            text: text.into(),
            tone: Tone::Normal,
        }
    }

    pub fn note(text: impl Into<String>, tone: Tone) -> Self {
        Widget::Text {
            key: None,
            text: text.into(),
            tone,
        }
    }

    pub fn keyed_text(key: WidgetKey, text: impl Into<String>, tone: Tone) -> Self {
        Widget::Text {
            key: Some(key),
            text: text.into(),
            tone,
        }
    }

    pub fn row(key: Option<WidgetKey>, children: Vec<Widget>) -> Self {
        Widget::Row { key, children }
    }

    pub fn with_badge(mut self, text: impl Into<String>, tone: Tone) -> Self {
        if let Widget::Section { badge, .. } = &mut self {
            *badge = Some((text.into(), tone));
        }
        self
    }

    pub fn key(&self) -> Option<&WidgetKey> {
        match self {
            Widget::Section { key, .. } | Widget::Table { key, .. } => Some(key),
            Widget::Row { key, .. } | Widget::Text { key, .. } | Widget::Gauge { key, .. } => {
                key.as_ref()
            }
            Widget::Control(c) => Some(&c.key),
            Widget::Empty => None,
        }
    }

    pub fn children(&self) -> &[Widget] {
        match self {
            Widget::Section { children, .. } | Widget::Row { children, .. } => children,
            Widget::Table { rows, .. } => rows,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Widget>> {
        match self {
            Widget::Section { children, .. } | Widget::Row { children, .. } => Some(children),
            Widget::Table { rows, .. } => Some(rows),
            _ => None,
        }
    }

    pub fn find(&self, key: &WidgetKey) -> Option<&Widget> {
        if self.key() == Some(key) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(key))
    }

    pub fn find_mut(&mut self, key: &WidgetKey) -> Option<&mut Widget> {
        if self.key() == Some(key) {
            return Some(self);
        }
        self.children_mut()?
            .iter_mut()
            .find_map(|c| c.find_mut(key))
    }

    pub fn find_control(&self, key: &WidgetKey) -> Option<&Control> {
        match self.find(key)? {
            Widget::Control(c) => Some(c),
            _ => None,
        }
    }

    pub fn find_control_mut(&mut self, key: &WidgetKey) -> Option<&mut Control> {
        match self.find_mut(key)? {
            Widget::Control(c) => Some(c),
            _ => None,
        }
    }

    /// Replace each keyed subtree with its counterpart from `fresh`.
    /// Returns how many subtrees were replaced.
    pub fn graft(&mut self, fresh: &Widget, keys: &[WidgetKey]) -> usize {
        let mut replaced = 0;
        for key in keys {
            let (Some(new), Some(slot)) = (fresh.find(key), self.find_mut(key)) else {
                continue;
            };
            *slot = new.clone();
            replaced += 1;
        }
        replaced
    }

    /// Depth-first list of every control in the tree.
    pub fn controls(&self) -> Vec<&Control> {
        let mut out = Vec::new();
        self.collect_controls(&mut out);
        out
    }

    fn collect_controls<'a>(&'a self, out: &mut Vec<&'a Control>) {
        if let Widget::Control(c) = self {
            out.push(c);
        }
        for child in self.children() {
            child.collect_controls(out);
        }
    }

    /// Text of a keyed `Text` widget or section badge.
    pub fn text_at(&self, key: &WidgetKey) -> Option<&str> {
        match self.find(key)? {
            Widget::Text { text, .. } => Some(text),
            Widget::Section {
                badge: Some((text, _)),
                ..
            } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Control, Tone, Widget, WidgetKey};

    fn tree(status: &str) -> Widget {
        Widget::section(
            WidgetKey::new("root"),
            "Root",
            vec![
                Widget::row(
                    Some(WidgetKey::new("row:1")),
                    vec![
                        Control::number(WidgetKey::new("flag[1]"), "Flag", 0.0).into(),
                        Widget::keyed_text(WidgetKey::new("status:1"), status, Tone::Muted),
                    ],
                ),
                Widget::keyed_text(WidgetKey::new("status:2"), status, Tone::Muted),
            ],
        )
    }

    #[test]
    fn graft_replaces_only_requested_keys() {
        let mut live = tree("old");
        let fresh = tree("new");
        let n = live.graft(&fresh, &[WidgetKey::new("row:1"), WidgetKey::new("missing")]);
        assert_eq!(n, 1);
        assert_eq!(live.text_at(&WidgetKey::new("status:1")), Some("new"));
        assert_eq!(live.text_at(&WidgetKey::new("status:2")), Some("old"));
    }

    #[test]
    fn find_control_walks_nested_rows() {
        let t = tree("x");
        assert!(t.find_control(&WidgetKey::new("flag[1]")).is_some());
        assert!(t.find_control(&WidgetKey::new("status:1")).is_none());
        assert_eq!(t.controls().len(), 1);
    }
}
