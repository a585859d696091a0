//! Display-name identity for configuration profiles.
//!
//! A `.mobileconfig` profile is known remotely by its `PayloadDisplayName`,
//! not by its file name, so the loader reads the document to find it. Any
//! other profile, or one whose name cannot be extracted, falls back to the
//! file name without its extension.

use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Profiles larger than this are not inspected.
pub const MAX_PROFILE_BYTES: u64 = 10 * 1024 * 1024;

const DISPLAY_NAME_KEY: &str = "PayloadDisplayName";
const FALLBACK_EXTENSIONS: &[&str] = &[".mobileconfig", ".json", ".xml"];

/// Identity of the profile declared at `declared`, whose content lives at `real`.
///
/// The extension check and the file-name fallback use the declared path, so
/// a symlinked profile keeps the name it was declared under.
pub fn profile_name(declared: &Path, real: &Path) -> String {
    if has_extension(declared, ".mobileconfig") {
        if let Some(name) = read_display_name(real) {
            return name;
        }
    }
    name_from_file(declared)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_ascii_lowercase().ends_with(ext))
}

fn read_display_name(path: &Path) -> Option<String> {
    let size = fs::metadata(path).ok()?.len();
    if size > MAX_PROFILE_BYTES {
        tracing::debug!(path = %path.display(), size, "profile too large for name extraction");
        return None;
    }
    let bytes = fs::read(path).ok()?;
    display_name_from_bytes(&bytes)
}

/// Extract the top-level `PayloadDisplayName` from profile bytes.
///
/// A well-formed property list is read structurally; if it parses but has no
/// top-level name there is no identity to find. Anything else (a signed
/// profile wrapping its plist in a CMS envelope, say) is scanned as text.
pub fn display_name_from_bytes(bytes: &[u8]) -> Option<String> {
    match plist::Value::from_reader(Cursor::new(bytes)) {
        Ok(value) => value
            .as_dictionary()
            .and_then(|dict| dict.get(DISPLAY_NAME_KEY))
            .and_then(|v| v.as_string())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        Err(_) => scan_display_name(&String::from_utf8_lossy(bytes)),
    }
}

/// Textual scan for the last `PayloadDisplayName` key that has a string value.
fn scan_display_name(text: &str) -> Option<String> {
    let key = format!("<key>{}</key>", DISPLAY_NAME_KEY);
    let value = text
        .rmatch_indices(key.as_str())
        .find_map(|(at, _)| string_value(&text[at + key.len()..]))?;
    let name = unescape_xml(value.trim());
    (!name.is_empty()).then_some(name)
}

/// The `<string>` element directly following a key, whitespace aside.
fn string_value(after_key: &str) -> Option<&str> {
    let value = after_key.trim_start().strip_prefix("<string>")?;
    let close = value.find("</string>")?;
    Some(&value[..close])
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// File name with a known profile extension removed.
pub fn name_from_file(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = file.to_ascii_lowercase();
    FALLBACK_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| file[..file.len() - ext.len()].to_string())
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>PayloadContent</key>
  <array>
    <dict>
      <key>PayloadDisplayName</key>
      <string>Inner Payload</string>
    </dict>
  </array>
  <key>PayloadDisplayName</key>
  <string>Disk Encryption</string>
</dict>
</plist>
"#;

    #[test]
    fn test_structural_name_ignores_nested_payloads() {
        assert_eq!(
            display_name_from_bytes(PROFILE.as_bytes()),
            Some("Disk Encryption".to_string())
        );
    }

    #[test]
    fn test_text_scan_for_wrapped_profile() {
        let mut signed = b"\x30\x82\x01\x00garbage".to_vec();
        signed.extend_from_slice(PROFILE.as_bytes());
        signed.extend_from_slice(b"\x00\x01trailer");

        assert_eq!(
            display_name_from_bytes(&signed),
            Some("Disk Encryption".to_string())
        );
    }

    #[test]
    fn test_plist_without_name_yields_none() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict><key>PayloadType</key><string>Configuration</string></dict></plist>"#;
        assert_eq!(display_name_from_bytes(doc.as_bytes()), None);
    }

    #[test]
    fn test_name_from_file_strips_known_extensions() {
        assert_eq!(name_from_file(Path::new("lib/Firewall.mobileconfig")), "Firewall");
        assert_eq!(name_from_file(Path::new("lib/Defender.XML")), "Defender");
        assert_eq!(name_from_file(Path::new("lib/ddm.json")), "ddm");
        assert_eq!(name_from_file(Path::new("lib/notes.txt")), "notes.txt");
    }

    #[test]
    fn test_text_scan_skips_trailing_key_without_string() {
        let text = "<key>PayloadDisplayName</key><string>Kiosk</string>\
                    <key>PayloadDisplayName</key><integer>3</integer>";
        assert_eq!(scan_display_name(text), Some("Kiosk".to_string()));
    }

    #[test]
    fn test_xml_entities_are_unescaped() {
        assert_eq!(
            scan_display_name("<key>PayloadDisplayName</key> <string>A &amp; B</string>"),
            Some("A & B".to_string())
        );
    }
}
