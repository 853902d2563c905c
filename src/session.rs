//! One open save plus the widget view of the selected group.
//!
//! The session is the only writer of the save tree. Front ends report `(key, input)`
//! pairs to [`EditorSession::apply`], which writes through the control's binding and
//! then rebuilds just the widgets the binding names.

use crate::{
    SaveValue,
    catalog::Catalog,
    edit::{DataPath, EditError, apply_edit},
    prefs::SessionToggles,
    render::{
        self, COOK_OFF_FLAG_INDICES, COOK_OFF_STAGES, CharacterFilter, RenderCtx, RenderOptions,
        RuneSlotPolicy,
    },
    router,
    save::{LoadError, LoadedSave},
    schema::Group,
    statics,
    value::SaveNumber,
    widget::{Binding, Coerce, Input, Refresh, Target, Widget, WidgetKey},
};
use anyhow::anyhow;
use log::{debug, warn};
use std::path::Path;

/// A rendered field of the current group.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub widget: Widget,
}

pub struct EditorSession {
    catalog: Catalog,
    save: Option<LoadedSave>,
    toggles: SessionToggles,
    options: RenderOptions,
    group: Group,
    view: Vec<FieldView>,
}

fn render_field(
    catalog: &Catalog,
    root: &SaveValue,
    toggles: &SessionToggles,
    options: &RenderOptions,
    group: Group,
    key: &'static str,
) -> Option<Widget> {
    let field = router::bind_field(root, group, key)?;
    let ctx = RenderCtx {
        catalog,
        root,
        toggles,
        options,
    };
    Some(render::dispatch(&ctx, &field))
}

fn number_from(f: f64, control: &WidgetKey) -> Result<SaveValue, EditError> {
    if !f.is_finite() {
        return Err(EditError::InputMismatch {
            control: control.to_string(),
            input: "non-finite number",
        });
    }
    Ok(SaveValue::Number(SaveNumber::from_f64(f)))
}

fn scalar_from_text(s: &str) -> SaveValue {
    match s.trim() {
        "null" => SaveValue::Null,
        "true" => SaveValue::Bool(true),
        "false" => SaveValue::Bool(false),
        t => match t.parse::<f64>() {
            Ok(f) if f.is_finite() => SaveValue::Number(SaveNumber::from_f64(f)),
            _ => SaveValue::String(s.to_string()),
        },
    }
}

fn coerce(rule: Coerce, input: &Input, control: &WidgetKey) -> Result<SaveValue, EditError> {
    let mismatch = || EditError::InputMismatch {
        control: control.to_string(),
        input: input.kind_name(),
    };
    match (rule, input) {
        (Coerce::Number, Input::Number(f)) => number_from(*f, control),
        (Coerce::Number | Coerce::Integer, Input::Choice(v)) => Ok(SaveValue::int(*v)),
        (Coerce::Clamp { min, max }, Input::Number(f)) => number_from(f.clamp(min, max), control),
        (Coerce::Integer, Input::Number(f)) if f.is_finite() => Ok(SaveValue::int(f.round() as i64)),
        (Coerce::Text, Input::Text(s)) => Ok(SaveValue::String(s.clone())),
        (Coerce::Bool, Input::Bool(b)) => Ok(SaveValue::Bool(*b)),
        (Coerce::Scalar, Input::Number(f)) => number_from(*f, control),
        (Coerce::Scalar, Input::Bool(b)) => Ok(SaveValue::Bool(*b)),
        (Coerce::Scalar, Input::Text(s)) => Ok(scalar_from_text(s)),
        _ => Err(mismatch()),
    }
}

impl EditorSession {
    pub fn new(catalog: Catalog, toggles: SessionToggles) -> Self {
        Self {
            catalog,
            save: None,
            toggles,
            options: RenderOptions::default(),
            group: Group::General,
            view: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn save(&self) -> Option<&LoadedSave> {
        self.save.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.save.as_ref().is_some_and(|s| s.dirty)
    }

    pub fn toggles(&self) -> SessionToggles {
        self.toggles
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn view(&self) -> &[FieldView] {
        &self.view
    }

    /// Load a save from disk. On failure the current save and view are left as they were.
    pub fn open_path(&mut self, path: &Path) -> Result<(), LoadError> {
        let save = LoadedSave::load_path(path)?;
        self.install(save);
        Ok(())
    }

    pub fn open_bytes(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let save = LoadedSave::from_bytes(bytes)?;
        self.install(save);
        Ok(())
    }

    fn install(&mut self, save: LoadedSave) {
        self.save = Some(save);
        self.render();
    }

    pub fn set_group(&mut self, group: Group) {
        if self.group != group {
            self.group = group;
            self.render();
        }
    }

    pub fn set_rune_policy(&mut self, policy: RuneSlotPolicy) {
        if self.options.rune_policy != policy {
            self.options.rune_policy = policy;
            self.render();
        }
    }

    /// Rebuild every field of the current group from the save tree.
    pub fn render(&mut self) {
        let Some(save) = &self.save else {
            self.view.clear();
            return;
        };
        let ctx = RenderCtx {
            catalog: &self.catalog,
            root: &save.root,
            toggles: &self.toggles,
            options: &self.options,
        };
        self.view = router::bind_group(&save.root, self.group)
            .iter()
            .map(|field| FieldView {
                key: field.key(),
                label: field.label(),
                widget: render::dispatch(&ctx, field),
            })
            .collect();
    }

    fn locate(&self, key: &WidgetKey) -> Result<(usize, Binding), EditError> {
        for (i, field) in self.view.iter().enumerate() {
            let Some(control) = field.widget.find_control(key) else {
                continue;
            };
            return match &control.binding {
                Some(binding) if control.enabled => Ok((i, binding.clone())),
                _ => Err(EditError::ReadOnly(key.to_string())),
            };
        }
        Err(EditError::UnknownControl(key.to_string()))
    }

    /// Write `input` through the binding of control `key`, then refresh what the
    /// binding names. Rejected inputs leave the save untouched.
    pub fn apply(&mut self, key: &WidgetKey, input: Input) -> Result<(), EditError> {
        let result = self.apply_inner(key, &input);
        if let Err(e) = &result {
            warn!("rejected {} for {key}: {e}", input.kind_name());
        }
        result
    }

    fn apply_inner(&mut self, key: &WidgetKey, input: &Input) -> Result<(), EditError> {
        let (index, binding) = self.locate(key)?;
        let wrote = self.write(key, &binding.target, input)?;
        debug!("applied {key} -> {:?}, refresh {:?}", binding.target, binding.refresh);
        if wrote {
            if let Some(save) = &mut self.save {
                save.mark_dirty();
            }
        }
        self.refresh(index, key, &binding, input);
        Ok(())
    }

    /// Returns whether the save tree changed; toggles and filters only change the view.
    fn write(&mut self, key: &WidgetKey, target: &Target, input: &Input) -> Result<bool, EditError> {
        let mismatch = || EditError::InputMismatch {
            control: key.to_string(),
            input: input.kind_name(),
        };
        match (target, input) {
            (Target::Toggle(rule), Input::Bool(on)) => {
                self.toggles.set(*rule, *on);
                Ok(false)
            }
            (Target::CharacterFilter, Input::Choice(v)) => {
                self.options.character_filter = CharacterFilter::from_choice(*v).ok_or_else(mismatch)?;
                Ok(false)
            }
            (Target::Toggle(_) | Target::CharacterFilter, _) => Err(mismatch()),
            _ => {
                let save = self
                    .save
                    .as_mut()
                    .ok_or_else(|| EditError::UnknownControl(key.to_string()))?;
                write_tree(&mut save.root, key, target, input)?;
                Ok(true)
            }
        }
    }

    fn refresh(&mut self, index: usize, key: &WidgetKey, binding: &Binding, input: &Input) {
        let Some(save) = &self.save else {
            return;
        };
        let field_key = self.view[index].key;
        match &binding.refresh {
            Refresh::Nothing => {
                let Some(control) = self.view[index].widget.find_control_mut(key) else {
                    return;
                };
                match &binding.target {
                    Target::Value { path, .. } => {
                        if let Some(stored) = path.resolve(&save.root) {
                            control.sync_from(stored);
                        }
                    }
                    _ => control.sync_input(input),
                }
            }
            Refresh::Keys(keys) => {
                let fresh = render_field(
                    &self.catalog,
                    &save.root,
                    &self.toggles,
                    &self.options,
                    self.group,
                    field_key,
                );
                if let Some(fresh) = fresh {
                    let n = self.view[index].widget.graft(&fresh, keys);
                    debug!("refreshed {n} of {} widgets in {field_key}", keys.len());
                }
            }
            Refresh::Field => {
                let fresh = render_field(
                    &self.catalog,
                    &save.root,
                    &self.toggles,
                    &self.options,
                    self.group,
                    field_key,
                );
                self.view[index].widget = fresh.unwrap_or(Widget::Empty);
            }
        }
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let save = self.save.as_mut().ok_or_else(|| anyhow!("no save loaded"))?;
        save.save_to_path(path)
    }

    /// Game-exact output bytes of the current tree.
    pub fn game_bytes(&self) -> Option<Vec<u8>> {
        self.save.as_ref().map(LoadedSave::to_game_bytes)
    }

    /// The currently loaded tree, for read-only inspection.
    pub fn root(&self) -> Option<&SaveValue> {
        self.save.as_ref().map(|s| &s.root)
    }

    pub fn describe(&self) -> String {
        match &self.save {
            Some(save) => {
                let name = save
                    .source_path
                    .as_deref()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| statics::EN_DEFAULT_SAVE_NAME.to_string());
                if save.dirty {
                    format!("{name} {}", statics::EN_LABEL_UNSAVED)
                } else {
                    name
                }
            }
            None => statics::EN_STATUS_READY.to_string(),
        }
    }
}

fn write_tree(root: &mut SaveValue, key: &WidgetKey, target: &Target, input: &Input) -> Result<(), EditError> {
    let mismatch = || EditError::InputMismatch {
        control: key.to_string(),
        input: input.kind_name(),
    };
    match (target, input) {
        (Target::Value { path, coerce: rule }, _) => {
            let value = coerce(*rule, input, key)?;
            apply_edit(root, path, value)
        }
        (Target::ItemRecord { path }, Input::Pick { item_no, use_cnt }) => {
            write_item(root, path, *item_no, *use_cnt)
        }
        (Target::ItemWithCount { path, use_cnt }, Input::Choice(item_no)) => {
            write_item(root, path, *item_no, *use_cnt)
        }
        (Target::CookOff { path }, Input::Choice(v)) => {
            let stage = COOK_OFF_STAGES
                .iter()
                .find(|s| s.stage == *v)
                .ok_or_else(mismatch)?;
            let (a, b) = COOK_OFF_FLAG_INDICES;
            let len = path
                .resolve(root)
                .and_then(SaveValue::as_array)
                .map(<[SaveValue]>::len)
                .ok_or_else(|| EditError::PathNotFound(path.to_string()))?;
            if len <= b {
                return Err(EditError::IndexOutOfRange {
                    path: path.to_string(),
                    index: b,
                    len,
                });
            }
            apply_edit(root, &path.index(a), SaveValue::int(stage.bytes.0))?;
            apply_edit(root, &path.index(b), SaveValue::int(stage.bytes.1))
        }
        _ => Err(mismatch()),
    }
}

/// Both ids land or neither does: the record must already be an object.
fn write_item(root: &mut SaveValue, path: &DataPath, item_no: i64, use_cnt: i64) -> Result<(), EditError> {
    match path.resolve(root) {
        Some(SaveValue::Object(_)) => {}
        Some(_) => return Err(EditError::NotAContainer(path.to_string())),
        None => return Err(EditError::PathNotFound(path.to_string())),
    }
    apply_edit(root, &path.key(statics::SK_ITEM_NO), SaveValue::int(item_no))?;
    apply_edit(root, &path.key(statics::SK_USE_CNT), SaveValue::int(use_cnt))?;
    debug!("{path} set to item {item_no} (use_cnt {use_cnt})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_item;
    use crate::{
        SaveValue,
        edit::{DataPath, EditError},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn item_writes_need_an_object_record() {
        let mut root = SaveValue::parse(r#"{"bag": [7, {"item_no": 0}]}"#).unwrap();
        let before = root.clone();
        let bag = DataPath::from_dotted("bag");

        assert_eq!(
            write_item(&mut root, &bag.index(0), 1, 32),
            Err(EditError::NotAContainer("bag[0]".to_string()))
        );
        assert_eq!(
            write_item(&mut root, &bag.index(5), 1, 32),
            Err(EditError::PathNotFound("bag[5]".to_string()))
        );
        assert_eq!(root, before);

        write_item(&mut root, &bag.index(1), 1, 32).unwrap();
        let record = root.get("bag").and_then(|b| b.at(1)).unwrap();
        assert_eq!(record.int_field("item_no"), 1);
        assert_eq!(record.int_field("use_cnt"), 32);
    }
}
