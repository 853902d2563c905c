//! The single place where the save tree is mutated.
//!
//! Renderers never write to the tree directly: they describe *where* a control writes
//! (a [`DataPath`]) and the session funnels every change through [`apply_edit`].

use crate::SaveValue;
use log::debug;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSeg {
    Key(String),
    Index(usize),
}

/// Address of a node in the save tree, e.g. `game_data.chara_flag[12]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DataPath(Vec<PathSeg>);

impl DataPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted path such as `game_data` or `chara_data.c_varia_dat`.
    pub fn from_dotted(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(|s| PathSeg::Key(s.to_string()))
                .collect(),
        )
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segs = self.0.clone();
        segs.push(PathSeg::Key(key.to_string()));
        Self(segs)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segs = self.0.clone();
        segs.push(PathSeg::Index(index));
        Self(segs)
    }

    pub fn resolve<'a>(&self, root: &'a SaveValue) -> Option<&'a SaveValue> {
        self.0.iter().try_fold(root, |node, seg| match seg {
            PathSeg::Key(k) => node.get(k),
            PathSeg::Index(i) => node.at(*i),
        })
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut SaveValue) -> Option<&'a mut SaveValue> {
        self.0.iter().try_fold(root, |node, seg| match seg {
            PathSeg::Key(k) => node.get_mut(k),
            PathSeg::Index(i) => node.as_array_mut().and_then(|a| a.get_mut(*i)),
        })
    }

    fn split_last(&self) -> Option<(DataPath, &PathSeg)> {
        let (last, parent) = self.0.split_last()?;
        Some((DataPath(parent.to_vec()), last))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSeg::Key(k) if i == 0 => write!(f, "{k}")?,
                PathSeg::Key(k) => write!(f, ".{k}")?,
                PathSeg::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("path {0} does not exist in the save")]
    PathNotFound(String),
    #[error("{0} is not an object or array")]
    NotAContainer(String),
    #[error("index {index} is out of range for {path} (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
    #[error("control {0} is read-only")]
    ReadOnly(String),
    #[error("control {control} does not accept {input} input")]
    InputMismatch { control: String, input: &'static str },
    #[error("no control {0} in the current view")]
    UnknownControl(String),
}

/// Write `value` at `path`. Object keys are inserted when missing (the game tolerates
/// extra keys), array slots must already exist.
pub fn apply_edit(root: &mut SaveValue, path: &DataPath, value: SaveValue) -> Result<(), EditError> {
    let Some((parent_path, last)) = path.split_last() else {
        return Err(EditError::NotAContainer(path.to_string()));
    };
    let parent = parent_path
        .resolve_mut(root)
        .ok_or_else(|| EditError::PathNotFound(parent_path.to_string()))?;

    match (parent, last) {
        (SaveValue::Object(map), PathSeg::Key(k)) => {
            map.insert(k.clone(), value);
        }
        (SaveValue::Array(values), PathSeg::Index(i)) => {
            let len = values.len();
            let slot = values.get_mut(*i).ok_or(EditError::IndexOutOfRange {
                path: parent_path.to_string(),
                index: *i,
                len,
            })?;
            *slot = value;
        }
        _ => return Err(EditError::NotAContainer(parent_path.to_string())),
    }
    debug!("edit {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DataPath, EditError, apply_edit};
    use crate::SaveValue;

    fn sample() -> SaveValue {
        SaveValue::parse(r#"{"game_data": {"chara_flag": [0, 1, 70]}, "px": 3}"#).unwrap()
    }

    #[test]
    fn display_reads_like_an_accessor() {
        let p = DataPath::from_dotted("game_data").key("chara_flag").index(2);
        assert_eq!(p.to_string(), "game_data.chara_flag[2]");
        assert_eq!(DataPath::root().to_string(), "$");
    }

    #[test]
    fn apply_writes_array_slot_and_object_key() {
        let mut root = sample();
        let flag = DataPath::from_dotted("game_data.chara_flag").index(1);
        apply_edit(&mut root, &flag, SaveValue::int(71)).unwrap();
        assert_eq!(flag.resolve(&root), Some(&SaveValue::int(71)));

        let py = DataPath::root().key("py");
        apply_edit(&mut root, &py, SaveValue::int(9)).unwrap();
        assert_eq!(root.get("py"), Some(&SaveValue::int(9)));
    }

    #[test]
    fn apply_rejects_out_of_range_and_missing_parent() {
        let mut root = sample();
        let err = apply_edit(
            &mut root,
            &DataPath::from_dotted("game_data.chara_flag").index(9),
            SaveValue::int(1),
        )
        .unwrap_err();
        assert!(matches!(err, EditError::IndexOutOfRange { len: 3, .. }));

        let err = apply_edit(
            &mut root,
            &DataPath::from_dotted("party_data.gold"),
            SaveValue::int(1),
        )
        .unwrap_err();
        assert_eq!(err, EditError::PathNotFound("party_data".to_string()));
    }

    #[test]
    fn apply_rejects_scalar_parent() {
        let mut root = sample();
        let err = apply_edit(&mut root, &DataPath::from_dotted("px.x"), SaveValue::Null).unwrap_err();
        assert_eq!(err, EditError::NotAContainer("px".to_string()));
    }
}
