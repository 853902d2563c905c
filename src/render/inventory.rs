use super::{BoundField, generic};
use crate::{
    SaveValue,
    catalog::{Catalog, ITEM_KIND_LEGEND, ItemKind, PickerScope},
    edit::DataPath,
    schema, statics,
    widget::{Coerce, Control, Refresh, Target, Tone, Widget, WidgetKey},
};

/// Rows beyond this are summarized instead of rendered.
pub const MAX_RENDERED_ITEMS: usize = 200;

pub(super) const ITEM_COLUMNS: &[&str] = &[statics::SK_ITEM_NO, statics::SK_USE_CNT];

fn legend() -> Widget {
    let lines: Vec<String> = ITEM_KIND_LEGEND
        .iter()
        .map(|(range, name)| format!("{range}: {name}"))
        .collect();
    Widget::note(
        format!("Item Type Classification by Count:\n{}", lines.join("\n")),
        Tone::Info,
    )
}

/// One row per item record, capped at [`MAX_RENDERED_ITEMS`].
pub(super) fn item_table(catalog: &Catalog, field: &BoundField) -> Widget {
    let Some(records) = field.value.as_array() else {
        return generic::bind_field(field);
    };
    let columns = if field.descriptor.columns.is_empty() {
        ITEM_COLUMNS
    } else {
        field.descriptor.columns
    };

    let mut children = Vec::new();
    if let Some(warning) = field.descriptor.warning {
        children.push(Widget::note(warning, Tone::Warn));
    }
    children.push(legend());

    let header = [statics::EN_COL_INDEX, statics::EN_COL_ITEM, statics::EN_COL_TYPE]
        .into_iter()
        .chain(columns.iter().map(|c| schema::label_for(c)))
        .map(str::to_string)
        .collect();
    let rows = records
        .iter()
        .take(MAX_RENDERED_ITEMS)
        .enumerate()
        .map(|(i, record)| {
            item_row(
                catalog,
                &field.path.index(i),
                i,
                record,
                columns,
                PickerScope::Inventory,
            )
        })
        .collect();
    children.push(Widget::Table {
        key: WidgetKey::tagged("table", &field.path),
        columns: header,
        rows,
    });

    if records.len() > MAX_RENDERED_ITEMS {
        children.push(Widget::note(
            format!(
                "... and {} more items (hidden)",
                records.len() - MAX_RENDERED_ITEMS
            ),
            Tone::Muted,
        ));
    }

    Widget::section(
        WidgetKey::tagged("sec", &field.path),
        format!("{} [{}]", field.label(), records.len()),
        children,
    )
}

/// Cells: index, picker (writes both ids), resolved type, then raw inputs per column.
/// Raw inputs may leave `item_no`/`use_cnt` inconsistent; the name then degrades
/// to a placeholder.
pub(super) fn item_row(
    catalog: &Catalog,
    path: &DataPath,
    index: usize,
    record: &SaveValue,
    columns: &[&str],
    scope: PickerScope,
) -> Widget {
    let row_key = WidgetKey::tagged("row", path);
    let Some(fields) = record.as_object() else {
        return Widget::row(
            Some(row_key),
            vec![
                Widget::text(index.to_string()),
                generic::bind_value(path, &index.to_string(), record, false),
            ],
        );
    };

    let item_no = record.int_field(statics::SK_ITEM_NO);
    let use_cnt = record.int_field(statics::SK_USE_CNT);
    let refresh = Refresh::Keys(vec![row_key.clone()]);

    let mut cells = vec![
        Widget::text(index.to_string()),
        Widget::Control(
            Control::item_picker(
                WidgetKey::at(path),
                statics::EN_EMPTY,
                item_no,
                use_cnt,
                catalog.item_name(item_no, use_cnt),
                scope,
            )
            .bind(Target::ItemRecord { path: path.clone() }, refresh.clone()),
        ),
        Widget::note(ItemKind::from_use_cnt(use_cnt).type_name(), Tone::Muted),
    ];
    for column in columns {
        let cell_path = path.key(column);
        let cell = match fields.get(*column) {
            Some(SaveValue::Number(n)) => Widget::Control(
                Control::number(WidgetKey::at(&cell_path), schema::label_for(column), n.as_f64())
                    .min(0.0)
                    .bind(
                        Target::Value {
                            path: cell_path,
                            coerce: Coerce::Number,
                        },
                        refresh.clone(),
                    ),
            ),
            Some(other) => generic::bind_value(&cell_path, column, other, false),
            None => Widget::note("-", Tone::Muted),
        };
        cells.push(cell);
    }
    Widget::row(Some(row_key), cells)
}
