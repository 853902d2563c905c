use gsde::{LoadedSave, SaveValue, SourceEncoding};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const GAME_LAYOUT: &str = "{\r\n  \"game_data\": {\r\n    \"gold\": 1200,\r\n    \"bozu_name\": \"Riou\",\r\n    \"hon_flag\": [\r\n      0,\r\n      255\r\n    ],\r\n    \"room_item\": []\r\n  },\r\n  \"party_data\": {}\r\n}";

fn game_file(text: &str) -> Vec<u8> {
    let mut bytes = gsde::statics::UTF8_BOM.to_vec();
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

#[test]
fn unmodified_game_file_is_byte_identical() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("SAVE01.json");
    let input = game_file(GAME_LAYOUT);
    std::fs::write(&path, &input)?;

    let save = LoadedSave::load_path(&path)?;
    assert_eq!(save.encoding, SourceEncoding::Utf8Bom);
    assert!(!save.dirty);
    assert_eq!(save.to_game_bytes(), input);
    Ok(())
}

#[test]
fn lf_input_is_written_back_with_crlf_and_bom() -> Result<()> {
    let input = GAME_LAYOUT.replace("\r\n", "\n");
    let save = LoadedSave::from_bytes(input.as_bytes())?;
    assert_eq!(save.encoding, SourceEncoding::Utf8);
    assert_eq!(save.to_game_bytes(), game_file(GAME_LAYOUT));
    Ok(())
}

#[test]
fn non_ascii_is_escaped_in_lowercase_hex() -> Result<()> {
    let save = LoadedSave::from_bytes("{\"name\": \"Nanami ♥ 😀\", \"q\": \"a\\\"b\"}".as_bytes())?;
    let bytes = save.to_game_bytes();
    let text = std::str::from_utf8(&bytes[3..])?;
    assert_eq!(
        text,
        "{\r\n  \"name\": \"Nanami \\u2665 \\ud83d\\ude00\",\r\n  \"q\": \"a\\\"b\"\r\n}"
    );
    assert!(bytes[3..].is_ascii());
    Ok(())
}

#[test]
fn integers_stay_integers_and_floats_keep_their_fraction() -> Result<()> {
    let root = SaveValue::parse(r#"{"a": 42, "b": 0.5, "c": -3}"#)?;
    assert_eq!(root.to_compact(), r#"{"a": 42, "b": 0.5, "c": -3}"#);
    Ok(())
}

#[test]
fn utf16_saves_load_and_come_back_as_utf8() -> Result<()> {
    let mut input = vec![0xFF, 0xFE];
    for unit in "{\"gold\": 7}".encode_utf16() {
        input.extend_from_slice(&unit.to_le_bytes());
    }
    let save = LoadedSave::from_bytes(&input)?;
    assert_eq!(save.encoding, SourceEncoding::Utf16Le);
    assert_eq!(save.to_game_bytes(), game_file("{\r\n  \"gold\": 7\r\n}"));
    Ok(())
}

#[test]
fn save_to_path_clears_dirty_and_remembers_the_target() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("edited.json");
    let mut save = LoadedSave::from_bytes(b"{\"gold\": 7}")?;
    save.mark_dirty();

    save.save_to_path(&out)?;
    assert!(!save.dirty);
    assert_eq!(save.source_path.as_deref(), Some(out.as_path()));
    assert_eq!(std::fs::read(&out)?, save.to_game_bytes());
    Ok(())
}
