//! Fields with no single backing key.

use super::{BoundField, RenderCtx, probe};
use crate::{
    edit::DataPath,
    schema, statics,
    widget::{Choice, Coerce, Control, Refresh, Target, Widget, WidgetKey},
};

/// Where each location part lives. An empty source is the root.
const LOCATION_PARTS: [(&str, &str); 5] = [
    ("area_no", statics::SK_GAME_DATA),
    ("town_no", statics::SK_GAME_DATA),
    ("map_no", statics::SK_GAME_DATA),
    ("px", ""),
    ("py", ""),
];

/// `event_flag` indices holding the two cook-off progress bytes.
pub const COOK_OFF_FLAG_INDICES: (usize, usize) = (152, 153);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookOffStage {
    pub stage: i64,
    pub opponent: &'static str,
    pub bytes: (i64, i64),
}

const fn stage(stage: i64, opponent: &'static str, first: i64, second: i64) -> CookOffStage {
    CookOffStage {
        stage,
        opponent,
        bytes: (first, second),
    }
}

pub const COOK_OFF_STAGES: [CookOffStage; 13] = [
    stage(0, "No matches", 0, 32),
    stage(1, "Ky Yun", 1, 32),
    stage(2, "Goetsu", 3, 32),
    stage(3, "Shinki", 7, 32),
    stage(4, "Ryuki", 15, 32),
    stage(5, "Bashok", 31, 32),
    stage(6, "Ryuko", 63, 32),
    stage(7, "Antonio", 127, 32),
    stage(8, "Gyokuran", 255, 32),
    stage(9, "Retso", 255, 33),
    stage(10, "Lester", 255, 35),
    stage(11, "Retso", 255, 39),
    stage(12, "Jinkai (Complete)", 255, 47),
];

/// Stage whose byte pair matches exactly; anything else reads as "not started".
pub fn cook_off_stage(first: i64, second: i64) -> &'static CookOffStage {
    COOK_OFF_STAGES
        .iter()
        .find(|s| s.bytes == (first, second))
        .unwrap_or(&COOK_OFF_STAGES[0])
}

/// Five numeric parts from two subtrees, each written back to its own source.
pub(super) fn location(ctx: &RenderCtx, field: &BoundField) -> Widget {
    let controls: Vec<Widget> = LOCATION_PARTS
        .iter()
        .filter_map(|(key, source)| {
            let container = DataPath::from_dotted(source);
            container.resolve(ctx.root)?.as_object()?;
            let path = container.key(key);
            let value = path.resolve(ctx.root).and_then(|v| v.as_f64()).unwrap_or(0.0);
            Some(Widget::Control(
                Control::number(WidgetKey::at(&path), schema::label_for(key), value).bind(
                    Target::Value {
                        path,
                        coerce: Coerce::Number,
                    },
                    Refresh::Nothing,
                ),
            ))
        })
        .collect();
    if controls.is_empty() {
        return Widget::Empty;
    }
    Widget::section(WidgetKey::new(format!("sec:{}", field.key())), field.label(), controls)
}

/// One dropdown over the stage table; selecting writes both bytes.
pub(super) fn cook_off_progress(ctx: &RenderCtx, field: &BoundField) -> Widget {
    let Some((path, flags)) = probe(ctx.root, statics::SK_EVENT_FLAG) else {
        return Widget::Empty;
    };
    let (a, b) = COOK_OFF_FLAG_INDICES;
    if flags.as_array().is_none_or(|f| f.len() <= b) {
        return Widget::Empty;
    }
    let current = cook_off_stage(flags.int_at(a), flags.int_at(b));
    let options = COOK_OFF_STAGES
        .iter()
        .map(|s| Choice::new(s.stage, format!("{}: {}", s.stage, s.opponent)))
        .collect();
    Widget::Control(
        Control::select(
            WidgetKey::new(field.key()),
            field.label(),
            options,
            current.stage,
        )
        .hint(format!("{path}[{a}] / {path}[{b}]"))
        .bind(Target::CookOff { path }, Refresh::Nothing),
    )
}

#[cfg(test)]
mod tests {
    use super::{COOK_OFF_STAGES, cook_off_stage};
    use crate::{
        SaveValue,
        catalog::tests::small,
        edit::DataPath,
        prefs::SessionToggles,
        render::test_support::render_at,
        widget::{ControlKind, Target, Widget, WidgetKey},
    };

    #[test]
    fn every_stage_reads_back_from_its_bytes() {
        for s in &COOK_OFF_STAGES {
            assert_eq!(cook_off_stage(s.bytes.0, s.bytes.1).stage, s.stage);
        }
        assert_eq!(cook_off_stage(7, 32).stage, 3);
    }

    #[test]
    fn unknown_bytes_read_as_not_started() {
        assert_eq!(cook_off_stage(8, 32).stage, 0);
        assert_eq!(cook_off_stage(255, 255).stage, 0);
    }

    #[test]
    fn location_binds_each_part_to_its_source() {
        let root = SaveValue::parse(
            r#"{"game_data": {"area_no": 4, "town_no": 2, "map_no": 9}, "px": 100, "py": 7}"#,
        )
        .unwrap();
        let w = render_at(
            &small(),
            &root,
            SessionToggles::default(),
            Default::default(),
            "location",
            DataPath::root(),
        );
        let targets: Vec<String> = w
            .controls()
            .iter()
            .filter_map(|c| match &c.binding.as_ref()?.target {
                Target::Value { path, .. } => Some(path.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            targets,
            vec!["game_data.area_no", "game_data.town_no", "game_data.map_no", "px", "py"]
        );
    }

    #[test]
    fn cook_off_selects_stage_from_event_flags() {
        let mut flags = vec!["0".to_string(); 160];
        flags[152] = "15".to_string();
        flags[153] = "32".to_string();
        let root = SaveValue::parse(&format!(
            r#"{{"game_data": {{"event_flag": [{}]}}}}"#,
            flags.join(",")
        ))
        .unwrap();
        let w = render_at(
            &small(),
            &root,
            SessionToggles::default(),
            Default::default(),
            "cook_off_progress",
            DataPath::root(),
        );
        let c = w.find_control(&WidgetKey::new("cook_off_progress")).unwrap();
        assert!(matches!(c.kind, ControlKind::Select { selected: 4, .. }));
    }

    #[test]
    fn cook_off_without_flags_renders_nothing() {
        let root = SaveValue::parse(r#"{"game_data": {"event_flag": [0, 1]}}"#).unwrap();
        let w = render_at(
            &small(),
            &root,
            SessionToggles::default(),
            Default::default(),
            "cook_off_progress",
            DataPath::root(),
        );
        assert_eq!(w, Widget::Empty);
    }
}
