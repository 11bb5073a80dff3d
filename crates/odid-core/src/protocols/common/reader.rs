/// Render a fixed-width, NUL-padded text field.
///
/// Trailing NUL padding is dropped; invalid UTF-8 is replaced rather than
/// rejected since broadcasters are not consistent about the character set.
pub(crate) fn padded_ascii(bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(bytes);
    raw.trim_end_matches('\0').to_string()
}
