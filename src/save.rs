use crate::{SaveValue, statics};
use anyhow::Context;
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Text encoding the save was read in. Output is always UTF-8 with a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Latin1,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("save file is not valid UTF-16")]
    Utf16,
    #[error("parsing save JSON: {0}")]
    Parse(String),
    #[error("save root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// A loaded save file. The tree is edited in place; there is no undo log,
/// a reload is the only way back.
#[derive(Debug, Clone)]
pub struct LoadedSave {
    pub source_path: Option<PathBuf>,
    pub encoding: SourceEncoding,
    pub original_len: usize,
    pub root: SaveValue,
    pub dirty: bool,
}

impl LoadedSave {
    pub fn load_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut save = Self::from_bytes(&bytes)?;
        save.source_path = Some(path.to_path_buf());
        info!("loaded {path:?} ({} bytes, {:?})", bytes.len(), save.encoding);
        Ok(save)
    }

    /// Decode and parse a save without touching the filesystem.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let (text, encoding) = decode_text(bytes)?;
        let root = SaveValue::parse(&text).map_err(|e| LoadError::Parse(e.to_string()))?;
        if !matches!(root, SaveValue::Object(_)) {
            return Err(LoadError::NotAnObject(root.type_name()));
        }
        Ok(Self {
            source_path: None,
            encoding,
            original_len: bytes.len(),
            root,
            dirty: false,
        })
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Bytes in the exact layout the game accepts: UTF-8 BOM, 2-space pretty print,
    /// ASCII-only with `\uXXXX` escapes, CRLF line endings.
    pub fn to_game_bytes(&self) -> Vec<u8> {
        let text = self.root.to_save_pretty_with_newline(statics::NL_CRLF);
        let mut out = Vec::with_capacity(statics::UTF8_BOM.len() + text.len());
        out.extend_from_slice(&statics::UTF8_BOM);
        out.extend_from_slice(text.as_bytes());
        out
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let bytes = self.to_game_bytes();
        fs::write(path, &bytes).with_context(|| format!("writing {path:?}"))?;
        info!("saved {path:?} ({} bytes)", bytes.len());

        self.source_path = Some(path.to_path_buf());
        self.original_len = bytes.len();
        self.dirty = false;
        Ok(())
    }
}

fn decode_text(bytes: &[u8]) -> Result<(String, SourceEncoding), LoadError> {
    if let Some(rest) = bytes.strip_prefix(&statics::UTF8_BOM) {
        return Ok((
            String::from_utf8_lossy(rest).into_owned(),
            SourceEncoding::Utf8Bom,
        ));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| (s, SourceEncoding::Utf16Le));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| (s, SourceEncoding::Utf16Be));
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok((text.to_owned(), SourceEncoding::Utf8)),
        // Every byte is a valid Latin-1 code point.
        Err(_) => Ok((
            bytes.iter().map(|&b| char::from(b)).collect(),
            SourceEncoding::Latin1,
        )),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, LoadError> {
    if bytes.len() % 2 != 0 {
        return Err(LoadError::Utf16);
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| LoadError::Utf16)
}

#[cfg(test)]
mod tests {
    use super::{LoadError, LoadedSave, SourceEncoding, decode_text};

    #[test]
    fn decode_detects_boms() {
        let (text, enc) = decode_text(b"\xEF\xBB\xBF{}").unwrap();
        assert_eq!((text.as_str(), enc), ("{}", SourceEncoding::Utf8Bom));

        let (text, enc) = decode_text(&[0xFF, 0xFE, b'{', 0, b'}', 0]).unwrap();
        assert_eq!((text.as_str(), enc), ("{}", SourceEncoding::Utf16Le));

        let (text, enc) = decode_text(&[0xFE, 0xFF, 0, b'{', 0, b'}']).unwrap();
        assert_eq!((text.as_str(), enc), ("{}", SourceEncoding::Utf16Be));
    }

    #[test]
    fn decode_falls_back_to_latin1() {
        let (text, enc) = decode_text(b"{\"a\": \"caf\xE9\"}").unwrap();
        assert_eq!(enc, SourceEncoding::Latin1);
        assert!(text.contains("caf\u{e9}"));
    }

    #[test]
    fn odd_utf16_length_is_rejected() {
        assert!(matches!(
            decode_text(&[0xFF, 0xFE, b'{']),
            Err(LoadError::Utf16)
        ));
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(matches!(
            LoadedSave::from_bytes(b"[1, 2]"),
            Err(LoadError::NotAnObject("array"))
        ));
    }

    #[test]
    fn game_bytes_start_with_bom_and_use_crlf() {
        let save = LoadedSave::from_bytes(b"{\"a\": 1}").unwrap();
        let bytes = save.to_game_bytes();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&bytes[3..], b"{\r\n  \"a\": 1\r\n}");
    }
}
