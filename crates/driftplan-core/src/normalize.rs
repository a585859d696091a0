//! Text and identity normalization shared by the loader and the diff engine.

/// Marker that makes a config value an environment placeholder.
pub const PLACEHOLDER_MARKER: char = '$';

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when a value carries an unresolved environment placeholder.
pub fn is_placeholder(value: &str) -> bool {
    value.contains(PLACEHOLDER_MARKER)
}

/// Canonical form of a software package path.
///
/// Lower-cases, converts `\` to `/`, then strips any leading `./`, `../`
/// and `/` so that two spellings of the same repository-relative path
/// compare equal. URLs pass through unchanged apart from case.
pub fn normalize_software_path(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase().replace('\\', "/");
    loop {
        if let Some(rest) = s.strip_prefix("./") {
            s = rest.to_string();
        } else if let Some(rest) = s.strip_prefix("../") {
            s = rest.to_string();
        } else if let Some(rest) = s.strip_prefix('/') {
            s = rest.to_string();
        } else {
            break;
        }
    }
    s
}

/// Normalize a platform name for catalog matching (`macos` is `darwin`).
pub fn normalize_platform(raw: &str) -> String {
    let p = raw.trim().to_lowercase();
    if p == "macos" {
        "darwin".to_string()
    } else {
        p
    }
}

/// Key used to match software titles against catalog entries.
///
/// `None` when either the name or the platform is blank.
pub fn catalog_key(name: &str, platform: &str) -> Option<String> {
    let name = name.trim().to_lowercase();
    let platform = normalize_platform(platform);
    if name.is_empty() || platform.is_empty() {
        return None;
    }
    Some(format!("{}|{}", name, platform))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ws_collapses_runs() {
        assert_eq!(normalize_ws("  SELECT 1\n\tFROM   t  "), "SELECT 1 FROM t");
        assert_eq!(normalize_ws(""), "");
        assert_eq!(normalize_ws(" \n\t "), "");
    }

    #[test]
    fn test_normalize_software_path_variants() {
        let expected = "lib/software/firefox.yml";
        for raw in [
            "lib/software/firefox.yml",
            "./lib/software/firefox.yml",
            "../lib/software/firefox.yml",
            "../../lib/software/firefox.yml",
            "/lib/software/firefox.yml",
            "lib\\software\\Firefox.yml",
            " LIB/Software/firefox.yml ",
            "./../lib/software/firefox.yml",
        ] {
            assert_eq!(normalize_software_path(raw), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_software_path_keeps_urls_comparable() {
        assert_eq!(
            normalize_software_path("https://example.test/Pkg.dmg"),
            "https://example.test/pkg.dmg"
        );
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder("$FLEET_URL"));
        assert!(is_placeholder("prefix-${SECRET}"));
        assert!(!is_placeholder("plain"));
    }

    #[test]
    fn test_catalog_key_maps_macos_to_darwin() {
        assert_eq!(catalog_key(" Firefox ", "macOS").as_deref(), Some("firefox|darwin"));
        assert_eq!(catalog_key("Slack", "darwin"), catalog_key("slack", "macos"));
        assert_eq!(catalog_key("", "darwin"), None);
        assert_eq!(catalog_key("Slack", " "), None);
    }
}
