//! Core library for GSDE, the Gensosuikoden II save editor.
//! Loads a save into an order-preserving tree, renders each field group as a
//! presentation-independent widget tree, and writes edits back byte-compatibly with
//! what the game expects.

pub mod catalog;
pub mod edit;
mod gui;
pub mod prefs;
pub mod render;
pub mod router;
mod save;
pub mod schema;
mod session;
pub mod statics;
mod value;
pub mod widget;

pub use catalog::{Catalog, CatalogError, CatalogSource};
pub use edit::{DataPath, EditError};
pub use gui::run_gui;
pub use save::{LoadError, LoadedSave, SourceEncoding};
pub use schema::Group;
pub use session::{EditorSession, FieldView};
pub use value::{SaveNumber, SaveValue};
pub use widget::{Control, ControlKind, Input, Widget, WidgetKey};
