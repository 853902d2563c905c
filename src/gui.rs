use crate::{
    EditorSession,
    catalog::{Catalog, CatalogSource, Entry, PickEntry, PickerCategory, PickerScope, TableKind},
    prefs::{MemoryPreferences, PreferenceStore, SessionToggles},
    render::RuneSlotPolicy,
    schema::Group,
    session::FieldView,
    statics,
    widget::{Control, ControlKind, Input, Tone, Widget, WidgetKey},
};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use log::info;
use std::path::PathBuf;

pub fn run_gui(catalog: Catalog) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let prefs = stored_preferences(cc.storage);
            let theme_dark = prefs.get_bool(statics::PREF_DARK_MODE).unwrap_or(true);
            cc.egui_ctx.set_visuals(if theme_dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            let session = EditorSession::new(catalog, SessionToggles::load(&prefs));
            Ok(Box::new(GsdeApp::new(session, theme_dark)))
        }),
    )
}

/// Copy the persisted booleans out of eframe storage before the app exists.
fn stored_preferences(storage: Option<&dyn eframe::Storage>) -> MemoryPreferences {
    let mut prefs = MemoryPreferences::default();
    let Some(storage) = storage else {
        return prefs;
    };
    for key in [
        statics::PREF_PAIR_RULE,
        statics::PREF_CHAIN_RULE,
        statics::PREF_DARK_MODE,
    ] {
        if let Some(value) = storage.get_string(key).and_then(|s| s.parse::<bool>().ok()) {
            prefs.set_bool(key, value);
        }
    }
    prefs
}

struct EframeStore<'a>(&'a mut dyn eframe::Storage);

impl PreferenceStore for EframeStore<'_> {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get_string(key).and_then(|s| s.parse().ok())
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.0.set_string(key, value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Group(Group),
    DataValues,
}

/// The open item picker: which control receives the pick and what it offers.
struct PickerState {
    key: WidgetKey,
    scope: PickerScope,
    categories: Vec<PickerCategory>,
    category: Option<usize>,
    query: String,
}

/// Collects what the user changed while the widget tree is painted. Edits are
/// applied once painting is done, so the tree is never mutated mid-frame.
#[derive(Default)]
struct Painter {
    edits: Vec<(WidgetKey, Input)>,
    pick: Option<(WidgetKey, PickerScope)>,
}

/// The main application state: one editor session plus dialog and tab state.
struct GsdeApp {
    session: EditorSession,
    tab: Tab,
    dialog_dir: Option<PathBuf>,
    status: String,
    last_error: Option<String>,
    about_open: bool,
    theme_dark: bool,
    picker: Option<PickerState>,
    data_query: String,
}

impl GsdeApp {
    fn new(session: EditorSession, theme_dark: bool) -> Self {
        Self {
            session,
            tab: Tab::Group(Group::General),
            dialog_dir: None,
            status: statics::EN_STATUS_READY.to_string(),
            last_error: None,
            about_open: false,
            theme_dark,
            picker: None,
            data_query: String::new(),
        }
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new().add_filter(statics::EN_FILE_FILTER_SAVE, &["json"]);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn open_file(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };

        match self.session.open_path(&path) {
            Ok(()) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.status = format!("{} {}", statics::EN_STATUS_LOADED, path.display());
                self.last_error = None;
                self.picker = None;
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to load: {e}"));
            }
        }
    }

    fn save_file_as(&mut self) {
        let file_name = self
            .session
            .save()
            .and_then(|s| s.source_path.as_ref())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| statics::EN_DEFAULT_SAVE_NAME.to_string());
        let Some(path) = self.file_dialog().set_file_name(file_name).save_file() else {
            return;
        };

        if let Err(e) = self.session.save_to_path(&path) {
            self.last_error = Some(format!("Failed to save: {e:#}"));
        } else {
            self.dialog_dir = path.parent().map(PathBuf::from);
            self.status = format!("{} {}", statics::EN_STATUS_SAVED, path.display());
            self.last_error = None;
        }
    }

    fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if let Tab::Group(group) = tab {
            self.session.set_group(group);
        }
    }

    fn apply_edits(&mut self, edits: Vec<(WidgetKey, Input)>) {
        for (key, input) in edits {
            if let Err(e) = self.session.apply(&key, input) {
                self.last_error = Some(format!("{} {e}", statics::EN_LABEL_ERROR));
            }
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN).clicked() {
                    self.open_file();
                }

                let has_save = self.session.save().is_some();
                if ui
                    .add_enabled(has_save, egui::Button::new(statics::EN_BTN_SAVE_AS))
                    .clicked()
                {
                    self.save_file_as();
                }

                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }

                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                ui.separator();
                ui.label(self.session.describe());
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });
    }

    fn tab_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for group in Group::ALL {
                    let tab = Tab::Group(group);
                    if ui.selectable_label(self.tab == tab, group.title()).clicked() {
                        self.select_tab(tab);
                    }
                }
                ui.separator();
                if ui
                    .selectable_label(self.tab == Tab::DataValues, statics::EN_TAB_DATA_VALUES)
                    .clicked()
                {
                    self.select_tab(Tab::DataValues);
                }

                if self.tab == Tab::Group(Group::BattleCharacters) {
                    ui.separator();
                    ui.label(statics::EN_LABEL_RUNE_POLICY);
                    let mut policy = self.session.options().rune_policy;
                    egui::ComboBox::from_id_salt("rune_policy")
                        .selected_text(policy.label())
                        .show_ui(ui, |ui| {
                            for p in RuneSlotPolicy::ALL {
                                ui.selectable_value(&mut policy, p, p.label());
                            }
                        });
                    self.session.set_rune_policy(policy);
                }
            });
        });
    }

    fn about_window(&mut self, ctx: &egui::Context) {
        if !self.about_open {
            return;
        }
        let mut open = self.about_open;
        let catalog = match &self.session.catalog().source {
            CatalogSource::Bundled => statics::EN_ABOUT_CATALOG_BUNDLED.to_string(),
            CatalogSource::File(path) => path.display().to_string(),
        };
        egui::Window::new(statics::EN_WINDOW_ABOUT)
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.heading(statics::EN_ABOUT_HEADING);
                ui.label(format!(
                    "{} {}",
                    statics::EN_ABOUT_VERSION,
                    env!("CARGO_PKG_VERSION")
                ));
                ui.label(format!("{} {catalog}", statics::EN_ABOUT_CATALOG));
                if let Some(note) = catalog_note(&self.session.catalog().source) {
                    ui.label(note);
                }
                ui.separator();
                ui.label(statics::EN_ABOUT_LOGGING);
            });
        self.about_open = open;
    }

    fn error_bar(&mut self, ctx: &egui::Context) {
        let Some(err) = self.last_error.clone() else {
            return;
        };
        egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::RED, err);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                        self.last_error = None;
                    }
                });
            });
        });
    }

    fn picker_window(&mut self, ctx: &egui::Context, painter: &mut Painter) {
        let Some(state) = &mut self.picker else {
            return;
        };
        let title = match state.scope {
            PickerScope::Inventory => statics::EN_WINDOW_PICK_ITEM,
            PickerScope::Accessory => statics::EN_WINDOW_PICK_ACCESSORY,
        };
        let PickerState {
            key,
            categories,
            category,
            query,
            ..
        } = state;

        let mut open = true;
        let mut cancelled = false;
        let mut chosen = None;
        egui::Window::new(title)
            .collapsible(false)
            .default_width(420.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(statics::EN_PICKER_ITEM_TYPE);
                    let current = category
                        .and_then(|i| categories.get(i))
                        .map_or(statics::EN_PICKER_SELECT_TYPE, |c| c.title);
                    egui::ComboBox::from_id_salt("picker_category")
                        .selected_text(current)
                        .show_ui(ui, |ui| {
                            for (i, c) in categories.iter().enumerate() {
                                ui.selectable_value(&mut *category, Some(i), format!("{} ({})", c.title, c.hint));
                            }
                        });
                });

                if let Some(selected) = category.and_then(|i| categories.get(i)) {
                    ui.horizontal(|ui| {
                        ui.label(statics::EN_LABEL_SEARCH);
                        ui.add(egui::TextEdit::singleline(query).hint_text(statics::EN_HINT_SEARCH));
                    });
                    ui.separator();

                    let needle = query.as_str();
                    let hits: Vec<&PickEntry> = selected
                        .entries
                        .iter()
                        .filter(|e| matches_query(e.item_no, &e.label, needle))
                        .collect();
                    if hits.is_empty() {
                        ui.label(statics::EN_PICKER_NO_MATCHES);
                    }
                    ui.push_id("picker_scroll", |ui| {
                        egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                            for entry in hits {
                                let text = format!("{}: {}", entry.item_no, entry.label);
                                if ui.selectable_label(false, text).clicked() {
                                    chosen = Some(Input::Pick {
                                        item_no: entry.item_no,
                                        use_cnt: entry.use_cnt,
                                    });
                                }
                            }
                        });
                    });
                }

                ui.separator();
                if ui.button(statics::EN_BTN_CANCEL).clicked() {
                    cancelled = true;
                }
            });

        if let Some(input) = chosen {
            painter.edits.push((key.clone(), input));
        }
        if !open || cancelled || painter.edits.iter().any(|(k, _)| k == key) {
            self.picker = None;
        }
    }

    fn open_picker(&mut self, key: WidgetKey, scope: PickerScope) {
        info!("picking an item for {key}");
        self.picker = Some(PickerState {
            key,
            scope,
            categories: self.session.catalog().picker_categories(scope),
            category: None,
            query: String::new(),
        });
    }
}

fn matches_query(id: i64, name: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    if id.to_string() == query {
        return true;
    }
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Extra About text for catalogs that are known to be incomplete.
fn catalog_note(source: &CatalogSource) -> Option<&'static str> {
    match source {
        CatalogSource::Bundled => Some(statics::EN_ABOUT_CATALOG_PARTIAL),
        CatalogSource::File(_) => None,
    }
}

fn tone_color(tone: Tone) -> Option<egui::Color32> {
    match tone {
        Tone::Normal => None,
        Tone::Muted => Some(egui::Color32::GRAY),
        Tone::Good => Some(egui::Color32::from_rgb(0x4c, 0xaf, 0x50)),
        Tone::Info => Some(egui::Color32::LIGHT_BLUE),
        Tone::Warn => Some(egui::Color32::YELLOW),
        Tone::Bad => Some(egui::Color32::RED),
    }
}

fn gauge_text(filled: u32, total: u32) -> String {
    let filled = filled.min(total) as usize;
    let empty = total as usize - filled;
    format!("{}{}", "■".repeat(filled), "□".repeat(empty))
}

fn toned_label(ui: &mut egui::Ui, text: &str, tone: Tone) -> egui::Response {
    match tone_color(tone) {
        Some(color) => ui.colored_label(color, text),
        None => ui.label(text),
    }
}

impl Painter {
    fn field(&mut self, ui: &mut egui::Ui, field: &FieldView) {
        if field.widget == Widget::Empty {
            return;
        }
        self.widget(ui, &field.widget);
        ui.add_space(6.0);
    }

    fn children(&mut self, ui: &mut egui::Ui, children: &[Widget]) {
        for child in children {
            self.widget(ui, child);
        }
    }

    fn widget(&mut self, ui: &mut egui::Ui, widget: &Widget) {
        match widget {
            Widget::Section {
                key,
                title,
                badge,
                collapsible,
                default_open,
                children,
            } => {
                let header = |ui: &mut egui::Ui| {
                    ui.strong(title);
                    if let Some((text, tone)) = badge {
                        toned_label(ui, text, *tone);
                    }
                };
                if *collapsible {
                    let id = ui.make_persistent_id(key.as_str());
                    egui::collapsing_header::CollapsingState::load_with_default_open(
                        ui.ctx(),
                        id,
                        *default_open,
                    )
                    .show_header(ui, header)
                    .body(|ui| self.children(ui, children));
                } else {
                    ui.group(|ui| {
                        ui.horizontal(header);
                        self.children(ui, children);
                    });
                }
            }
            Widget::Row { children, .. } => {
                ui.horizontal(|ui| self.children(ui, children));
            }
            Widget::Control(control) => self.control(ui, control),
            Widget::Text { text, tone, .. } => {
                toned_label(ui, text, *tone);
            }
            Widget::Gauge { filled, total, .. } => {
                ui.label(gauge_text(*filled, *total));
            }
            Widget::Table { key, columns, rows } => self.table(ui, key, columns, rows),
            Widget::Empty => {}
        }
    }

    fn table(&mut self, ui: &mut egui::Ui, key: &WidgetKey, columns: &[String], rows: &[Widget]) {
        let row_h = ui.spacing().interact_size.y + 4.0;
        ui.push_id(key.as_str(), |ui| {
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
            for i in 0..columns.len() {
                table = if i + 1 == columns.len() {
                    table.column(Column::remainder())
                } else {
                    table.column(Column::auto().at_least(40.0).resizable(true))
                };
            }
            table
                .header(row_h, |mut header| {
                    for title in columns {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for row in rows {
                        let cells = match row {
                            Widget::Row { children, .. } => children.as_slice(),
                            other => std::slice::from_ref(other),
                        };
                        body.row(row_h, |mut table_row| {
                            for i in 0..columns.len() {
                                table_row.col(|ui| {
                                    if let Some(cell) = cells.get(i) {
                                        self.widget(ui, cell);
                                    }
                                });
                            }
                        });
                    }
                });
        });
    }

    fn control(&mut self, ui: &mut egui::Ui, control: &Control) {
        ui.horizontal(|ui| {
            let is_checkbox = matches!(control.kind, ControlKind::Checkbox { .. });
            if !control.label.is_empty() && !is_checkbox {
                ui.label(&control.label);
            }
            let response = ui
                .add_enabled_ui(control.is_editable(), |ui| self.control_body(ui, control))
                .inner;
            if let Some(hint) = &control.hint {
                response.on_hover_text(hint);
            }
        });
    }

    fn control_body(&mut self, ui: &mut egui::Ui, control: &Control) -> egui::Response {
        match &control.kind {
            ControlKind::Number { value, min, max } => {
                let integral = value.fract() == 0.0;
                let mut v = *value;
                let response = ui.add(
                    egui::DragValue::new(&mut v)
                        .speed(1.0)
                        .range(min.unwrap_or(f64::NEG_INFINITY)..=max.unwrap_or(f64::INFINITY)),
                );
                if integral {
                    v = v.round();
                }
                if response.changed() && v != *value {
                    self.edits.push((control.key.clone(), Input::Number(v)));
                }
                response
            }
            ControlKind::Text { value } => {
                let mut text = value.clone();
                let response = ui.add(egui::TextEdit::singleline(&mut text).desired_width(180.0));
                if response.changed() {
                    self.edits.push((control.key.clone(), Input::Text(text)));
                }
                response
            }
            ControlKind::Checkbox { value } => {
                let mut checked = *value;
                let response = ui.checkbox(&mut checked, &control.label);
                if response.changed() {
                    self.edits.push((control.key.clone(), Input::Bool(checked)));
                }
                response
            }
            ControlKind::Select { options, selected } => {
                let mut choice = *selected;
                let response = egui::ComboBox::from_id_salt(control.key.as_str())
                    .selected_text(control.selected_label().unwrap_or_default())
                    .height(360.0)
                    .show_ui(ui, |ui| {
                        for option in options {
                            ui.selectable_value(&mut choice, option.value, &option.label);
                        }
                    })
                    .response;
                if choice != *selected {
                    self.edits.push((control.key.clone(), Input::Choice(choice)));
                }
                response
            }
            ControlKind::ItemPicker { name, scope, .. } => {
                let response = ui.button(statics::EN_BTN_PICK);
                if response.clicked() {
                    self.pick = Some((control.key.clone(), *scope));
                }
                ui.label(name);
                response
            }
        }
    }
}

fn data_values(ui: &mut egui::Ui, catalog: &Catalog, query: &mut String) {
    ui.horizontal(|ui| {
        ui.label(statics::EN_LABEL_SEARCH);
        ui.add(egui::TextEdit::singleline(query).hint_text(statics::EN_HINT_SEARCH));
    });
    ui.separator();

    let needle = query.as_str();
    let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
    for kind in TableKind::ALL {
        let rows: Vec<(i64, &Entry)> = catalog
            .table(kind)
            .iter()
            .filter(|(id, e)| matches_query(*id, &e.name, needle))
            .collect();
        egui::CollapsingHeader::new(format!("{} ({})", kind.title(), rows.len()))
            .id_salt(kind.title())
            .show(ui, |ui| {
                ui.push_id(kind.title(), |ui| {
                    TableBuilder::new(ui)
                        .striped(true)
                        .vscroll(false)
                        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                        .column(Column::initial(60.0).resizable(false))
                        .column(Column::initial(260.0).resizable(true))
                        .column(Column::remainder())
                        .header(row_h, |mut header| {
                            header.col(|ui| {
                                ui.strong(statics::EN_COL_ID);
                            });
                            header.col(|ui| {
                                ui.strong(statics::EN_COL_NAME);
                            });
                            header.col(|ui| {
                                ui.strong(statics::EN_COL_ATTRS);
                            });
                        })
                        .body(|mut body| {
                            for (id, entry) in rows {
                                body.row(row_h, |mut row| {
                                    row.col(|ui| {
                                        ui.label(id.to_string());
                                    });
                                    row.col(|ui| {
                                        ui.label(&entry.name);
                                    });
                                    row.col(|ui| {
                                        ui.label(entry.attrs.join(", "));
                                    });
                                });
                            }
                        });
                });
            });
    }
}

impl eframe::App for GsdeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.top_bar(ctx);
        self.about_window(ctx);
        self.error_bar(ctx);

        if self.session.save().is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
            });
            return;
        }

        self.tab_bar(ctx);

        let mut painter = Painter::default();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.tab {
                    Tab::DataValues => data_values(ui, self.session.catalog(), &mut self.data_query),
                    Tab::Group(_) => {
                        for field in self.session.view() {
                            painter.field(ui, field);
                        }
                    }
                });
        });

        self.picker_window(ctx, &mut painter);
        let Painter { edits, pick } = painter;
        self.apply_edits(edits);
        if let Some((key, scope)) = pick {
            self.open_picker(key, scope);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let mut store = EframeStore(storage);
        self.session.toggles().store(&mut store);
        store.set_bool(statics::PREF_DARK_MODE, self.theme_dark);
    }
}
