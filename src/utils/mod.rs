/// Longest filename, in bytes, most filesystems accept.
const MAX_FILENAME_BYTES: usize = 255;

/// Title as shown to the user: filesystem-hostile characters become `_`.
pub fn sanitize_title(title: &str) -> String {
    if title.is_empty() {
        return "Unknown_Title".to_string();
    }

    title
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

/// Filename stem derived from a video title, with unsafe characters dropped.
/// The result is at most `max_bytes` long and never splits a character.
pub fn safe_filename(title: &str, max_bytes: usize) -> String {
    let mut used = 0;
    let stem: String = title
        .chars()
        .filter(|c| {
            !c.is_control()
                && !matches!(
                    c,
                    '"' | '#' | '$' | '%' | '\'' | '*' | ',' | '.' | '/' | ':' | ';' | '<' | '>'
                        | '?' | '\\' | '^' | '|' | '~'
                )
        })
        .take_while(|c| {
            used += c.len_utf8();
            used <= max_bytes
        })
        .collect();

    let stem = stem.trim();
    if stem.is_empty() {
        "video".to_string()
    } else {
        stem.to_string()
    }
}

/// `<safe title>.<container>`, kept within the filename byte limit.
pub fn default_filename(title: &str, container: &str) -> String {
    let budget = MAX_FILENAME_BYTES.saturating_sub(container.len() + 1);
    format!("{}.{}", safe_filename(title, budget), container)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("AC/DC: Live?"), "AC_DC_ Live_");
        assert_eq!(sanitize_title(r#"a\b*c"d<e>f|g"#), "a_b_c_d_e_f_g");
        assert_eq!(sanitize_title("plain title"), "plain title");
        assert_eq!(sanitize_title(""), "Unknown_Title");
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Rick Astley - Never Gonna Give You Up (Official Video)", 255),
            "Rick Astley - Never Gonna Give You Up (Official Video)");
        assert_eq!(safe_filename("What's up? v1.0", 255), "Whats up v10");
        assert_eq!(safe_filename("  ...  ", 255), "video");
        assert_eq!(safe_filename("日本語", 7), "日本");
    }

    #[test]
    fn test_default_filename() {
        assert_eq!(default_filename("My Clip", "mp4"), "My Clip.mp4");
        assert_eq!(default_filename("a/b", "webm"), "ab.webm");
    }

    #[test]
    fn test_default_filename_fits_byte_limit() {
        let ascii = default_filename(&"x".repeat(300), "mp4");
        assert_eq!(ascii.len(), 255);
        assert!(ascii.ends_with(".mp4"));

        let cjk = default_filename(&"日本語のタイトル".repeat(20), "mp4");
        assert!(cjk.len() <= 255);
        assert!(cjk.ends_with(".mp4"));
        assert!(cjk.starts_with("日本語のタイトル"));

        let webm = default_filename(&"é".repeat(200), "webm");
        assert!(webm.len() <= 255);
        assert!(webm.ends_with(".webm"));
    }
}
