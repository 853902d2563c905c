//! Recruitment flags with statuses derived across characters.

use super::{BoundField, RenderCtx, probe};
use crate::{
    SaveValue,
    prefs::{RecruitRule, SessionToggles},
    statics,
    widget::{Coerce, Control, Refresh, Target, Tone, Widget, WidgetKey},
};

pub(super) const MCDOHL: usize = 82;
pub(super) const GREMIO: usize = 125;
pub(super) const VALERIA: usize = 12;
pub(super) const KASUMI: usize = 73;
pub(super) const CHUCHARA: usize = 79;
pub(super) const ABIZBOAH: usize = 49;
pub(super) const RULODIA: usize = 74;

const FLAG_NOT_RECRUITED: i64 = 0;
const FLAG_SPOKE_TO: i64 = 1;
const FLAG_AUTO_JOIN: i64 = 70;
const FLAG_MANUAL_RECRUIT: i64 = 71;
const FLAG_EVENT_LOCKED: i64 = 86;
const FLAG_DECEASED: i64 = 212;
const FLAG_ON_LEAVE: i64 = 213;

const FLAG_LEGEND: &str = "Recruitment Status Values:\n\
    1: Spoke to\n\
    70: Auto Join\n\
    71: Manual Recruit\n\
    86: Event Locked Not Party\n\
    212: Deceased\n\
    213: On Leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecruitStatus {
    /// McDohl or Gremio, brought over by a first-game import.
    AvailableImport,
    RecruitedViaSubstitution,
    RecruitedViaChain,
    Recruited,
    OnLeave,
    Deceased,
    EventLocked,
    SpokeTo,
    NotRecruited,
}

impl RecruitStatus {
    pub fn label(self) -> &'static str {
        match self {
            RecruitStatus::AvailableImport => statics::EN_RECRUIT_IMPORT,
            RecruitStatus::RecruitedViaSubstitution => statics::EN_RECRUIT_SUBSTITUTION,
            RecruitStatus::RecruitedViaChain => statics::EN_RECRUIT_CHAIN,
            RecruitStatus::Recruited => statics::EN_RECRUIT_RECRUITED,
            RecruitStatus::OnLeave => statics::EN_RECRUIT_ON_LEAVE,
            RecruitStatus::Deceased => statics::EN_RECRUIT_DECEASED,
            RecruitStatus::EventLocked => statics::EN_RECRUIT_EVENT_LOCKED,
            RecruitStatus::SpokeTo => statics::EN_RECRUIT_SPOKE_TO,
            RecruitStatus::NotRecruited => statics::EN_RECRUIT_NOT_RECRUITED,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            RecruitStatus::AvailableImport
            | RecruitStatus::RecruitedViaSubstitution
            | RecruitStatus::RecruitedViaChain
            | RecruitStatus::Recruited => Tone::Good,
            RecruitStatus::OnLeave => Tone::Warn,
            RecruitStatus::Deceased | RecruitStatus::NotRecruited => Tone::Bad,
            RecruitStatus::EventLocked => Tone::Muted,
            RecruitStatus::SpokeTo => Tone::Info,
        }
    }
}

fn is_recruited(flag: i64) -> bool {
    flag == FLAG_AUTO_JOIN || flag == FLAG_MANUAL_RECRUIT
}

fn flag_at(flags: &[SaveValue], index: usize) -> i64 {
    flags.get(index).and_then(SaveValue::as_i64).unwrap_or(0)
}

/// Status of character `index`. Import availability wins over the optional rules,
/// and the optional rules win over the raw flag. Nothing here writes to the save.
pub fn derive_status(
    flags: &[SaveValue],
    index: usize,
    has_import_name: bool,
    toggles: &SessionToggles,
) -> RecruitStatus {
    let flag = flag_at(flags, index);

    if (index == MCDOHL || index == GREMIO)
        && has_import_name
        && (flag == FLAG_NOT_RECRUITED || flag == FLAG_SPOKE_TO)
    {
        return RecruitStatus::AvailableImport;
    }

    if toggles.get(RecruitRule::PairSubstitution) && !is_recruited(flag) {
        let partner = match index {
            VALERIA => Some(KASUMI),
            KASUMI => Some(VALERIA),
            _ => None,
        };
        if partner.is_some_and(|p| is_recruited(flag_at(flags, p))) {
            return RecruitStatus::RecruitedViaSubstitution;
        }
    }

    if toggles.get(RecruitRule::ChainUnlock)
        && !is_recruited(flag)
        && (index == ABIZBOAH || index == RULODIA)
        && is_recruited(flag_at(flags, CHUCHARA))
    {
        return RecruitStatus::RecruitedViaChain;
    }

    match flag {
        f if is_recruited(f) => RecruitStatus::Recruited,
        FLAG_ON_LEAVE => RecruitStatus::OnLeave,
        FLAG_DECEASED => RecruitStatus::Deceased,
        FLAG_EVENT_LOCKED => RecruitStatus::EventLocked,
        FLAG_SPOKE_TO => RecruitStatus::SpokeTo,
        _ => RecruitStatus::NotRecruited,
    }
}

/// Characters whose derived status reads the flag at `index`.
fn dependents(index: usize) -> &'static [usize] {
    match index {
        VALERIA => &[KASUMI],
        KASUMI => &[VALERIA],
        CHUCHARA => &[ABIZBOAH, RULODIA],
        _ => &[],
    }
}

/// A non-blank first-game hero name enables the import status.
pub(super) fn has_import_name(root: &SaveValue) -> bool {
    probe(root, statics::SK_MACD_NAME)
        .and_then(|(_, v)| v.as_str())
        .is_some_and(|s| !s.trim().is_empty())
}

fn toggle_control(ctx: &RenderCtx, rule: RecruitRule) -> Widget {
    Widget::Control(
        Control::checkbox(
            WidgetKey::new(format!("toggle:{}", rule.pref_key())),
            rule.label(),
            ctx.toggles.get(rule),
        )
        .bind(Target::Toggle(rule), Refresh::Field),
    )
}

pub(super) fn recruitment(ctx: &RenderCtx, field: &BoundField) -> Widget {
    let Some(flags) = field.value.as_array() else {
        return super::generic::bind_field(field);
    };
    let import = has_import_name(ctx.root);

    let rows = flags
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, flag)| {
            let path = field.path.index(index);
            let row_key = WidgetKey::tagged("row", &path);
            let status = derive_status(flags, index, import, ctx.toggles);
            let refresh = Refresh::Keys(
                std::iter::once(row_key.clone())
                    .chain(
                        dependents(index)
                            .iter()
                            .map(|&d| WidgetKey::tagged("row", &field.path.index(d))),
                    )
                    .collect(),
            );
            Widget::row(
                Some(row_key),
                vec![
                    Widget::text(index.to_string()),
                    Widget::text(ctx.catalog.character_name(index as i64)),
                    Widget::Control(
                        Control::number(WidgetKey::at(&path), statics::EN_EMPTY, flag.as_f64().unwrap_or(0.0))
                            .min(0.0)
                            .bind(
                                Target::Value {
                                    path: path.clone(),
                                    coerce: Coerce::Number,
                                },
                                refresh,
                            ),
                    ),
                    Widget::keyed_text(WidgetKey::tagged("status", &path), status.label(), status.tone()),
                ],
            )
        })
        .collect();

    Widget::section(
        WidgetKey::tagged("sec", &field.path),
        format!("{} [{} characters]", field.label(), flags.len()),
        vec![
            Widget::section(
                WidgetKey::tagged("sec:options", &field.path),
                "Recruitment Options",
                RecruitRule::ALL.iter().map(|&r| toggle_control(ctx, r)).collect(),
            ),
            Widget::note(FLAG_LEGEND, Tone::Muted),
            Widget::Table {
                key: WidgetKey::tagged("table", &field.path),
                columns: [
                    statics::EN_COL_INDEX,
                    statics::EN_COL_CHARACTER,
                    statics::EN_COL_FLAG,
                    statics::EN_COL_STATUS,
                ]
                .map(str::to_string)
                .to_vec(),
                rows,
            },
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::{RecruitStatus, derive_status};
    use crate::{
        SaveValue,
        catalog::tests::small,
        edit::DataPath,
        prefs::SessionToggles,
        render::test_support::render_at,
        widget::{Refresh, WidgetKey},
    };
    use pretty_assertions::assert_eq;

    fn flags(set: &[(usize, i64)]) -> Vec<SaveValue> {
        let mut v = vec![SaveValue::int(0); 130];
        for &(i, f) in set {
            v[i] = SaveValue::int(f);
        }
        v
    }

    fn both_rules() -> SessionToggles {
        SessionToggles {
            pair_substitution: true,
            chain_unlock: true,
        }
    }

    #[test]
    fn raw_flags_map_to_statuses() {
        let f = flags(&[(1, 70), (2, 71), (3, 213), (4, 212), (5, 86), (6, 1), (7, 5)]);
        let off = SessionToggles::default();
        let got: Vec<_> = (1..=8).map(|i| derive_status(&f, i, false, &off)).collect();
        assert_eq!(
            got,
            vec![
                RecruitStatus::Recruited,
                RecruitStatus::Recruited,
                RecruitStatus::OnLeave,
                RecruitStatus::Deceased,
                RecruitStatus::EventLocked,
                RecruitStatus::SpokeTo,
                RecruitStatus::NotRecruited,
                RecruitStatus::NotRecruited,
            ]
        );
    }

    #[test]
    fn pair_rule_only_applies_when_enabled() {
        let f = flags(&[(12, 70)]);
        assert_eq!(
            derive_status(&f, 73, false, &SessionToggles::default()),
            RecruitStatus::NotRecruited
        );
        assert_eq!(
            derive_status(&f, 73, false, &both_rules()),
            RecruitStatus::RecruitedViaSubstitution
        );
        assert_eq!(derive_status(&f, 12, false, &both_rules()), RecruitStatus::Recruited);
    }

    #[test]
    fn chain_rule_covers_both_followers() {
        let f = flags(&[(79, 71), (74, 212)]);
        assert_eq!(derive_status(&f, 49, false, &both_rules()), RecruitStatus::RecruitedViaChain);
        assert_eq!(derive_status(&f, 74, false, &both_rules()), RecruitStatus::RecruitedViaChain);
        assert_eq!(
            derive_status(&f, 74, false, &SessionToggles::default()),
            RecruitStatus::Deceased
        );
    }

    #[test]
    fn import_name_beats_the_other_rules() {
        let f = flags(&[(82, 1), (125, 70)]);
        let off = SessionToggles::default();
        assert_eq!(derive_status(&f, 82, true, &off), RecruitStatus::AvailableImport);
        assert_eq!(derive_status(&f, 82, false, &off), RecruitStatus::SpokeTo);
        assert_eq!(derive_status(&f, 125, true, &off), RecruitStatus::Recruited);
    }

    #[test]
    fn editing_a_pair_member_refreshes_its_partner_row() {
        let list: Vec<String> = (0..80).map(|_| "0".to_string()).collect();
        let root = SaveValue::parse(&format!(
            r#"{{"game_data": {{"chara_flag": [{}], "macd_name": "  "}}}}"#,
            list.join(",")
        ))
        .unwrap();
        let w = render_at(
            &small(),
            &root,
            both_rules(),
            Default::default(),
            "chara_flag",
            DataPath::from_dotted("game_data.chara_flag"),
        );
        let control = w
            .find_control(&WidgetKey::new("game_data.chara_flag[12]"))
            .unwrap();
        assert_eq!(
            control.binding.as_ref().unwrap().refresh,
            Refresh::Keys(vec![
                WidgetKey::new("row:game_data.chara_flag[12]"),
                WidgetKey::new("row:game_data.chara_flag[73]"),
            ])
        );
        assert!(w.find(&WidgetKey::new("row:game_data.chara_flag[0]")).is_none());
        assert_eq!(
            w.text_at(&WidgetKey::new("status:game_data.chara_flag[2]")),
            Some("Not Recruited")
        );
    }
}
