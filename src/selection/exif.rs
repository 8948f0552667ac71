use std::io::Cursor;

/// EXIFから撮影日時を取得
pub fn extract_date(bytes: &[u8]) -> Result<String, Box<dyn std::error::Error>> {
    let mut cursor = Cursor::new(bytes);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut cursor)?;

    // DateTimeOriginal を探す
    if let Some(field) = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY) {
        return Ok(field.display_value().to_string());
    }

    // DateTime を探す
    if let Some(field) = exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY) {
        return Ok(field.display_value().to_string());
    }

    Err("No date found in EXIF".into())
}
