//! Portable filename sanitization.

use unicode_normalization::UnicodeNormalization;

/// Characters stripped outright. Covers what Windows and macOS reject plus `!`,
/// which shells treat as history expansion.
const STRIPPED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '!'];

/// Sanitizes a human-readable string into a filesystem-safe name.
///
/// - NFKD-decomposes, then drops every non-ASCII code point (accents are lost,
///   non-Latin scripts vanish entirely)
/// - Removes `/ \ : * ? " < > | !` and non-whitespace control characters
/// - Turns each whitespace run into a single `_`
/// - Collapses consecutive underscores and trims them from both ends
///
/// The result may be empty.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_underscore = false;

    for c in raw.nfkd() {
        if !c.is_ascii() || STRIPPED.contains(&c) {
            continue;
        }
        let c = if c.is_ascii_whitespace() || matches!(c, '\x0b' | '\x1c'..='\x1f') {
            '_'
        } else if c.is_ascii_control() {
            continue;
        } else {
            c
        };

        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    out.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_reserved_and_collapses_whitespace() {
        assert_eq!(
            sanitize("Summer Vacation!! / 1978.jpg"),
            "Summer_Vacation_1978.jpg"
        );
    }

    #[test]
    fn plain_ascii_only_gets_underscores() {
        assert_eq!(sanitize("retro diner at night.jpg"), "retro_diner_at_night.jpg");
        assert_eq!(sanitize("already_clean.png"), "already_clean.png");
    }

    #[test]
    fn separator_controls_count_as_whitespace() {
        assert_eq!(sanitize("a\x1cb"), "a_b");
        assert_eq!(sanitize("a\x1db\x1e c\x1fd"), "a_b_c_d");
        assert_eq!(sanitize("tab\x0bvt"), "tab_vt");
    }

    #[test]
    fn drops_diacritics() {
        assert_eq!(sanitize("Café Crème brûlée.jpg"), "Cafe_Creme_brulee.jpg");
    }

    #[test]
    fn non_latin_becomes_empty() {
        assert_eq!(sanitize("東京の夜"), "");
        assert_eq!(sanitize("  \t "), "");
    }

    #[test]
    fn no_reserved_characters_survive() {
        let out = sanitize(r#"a/b\c:d*e?f"g<h>i|j!k"#);
        assert_eq!(out, "abcdefghijk");
        for c in ['/', '\\', ':', '*', '?', '"', '<', '>', '|'] {
            assert!(!out.contains(c));
        }
    }

    #[test]
    fn collapses_and_trims_underscores() {
        assert_eq!(sanitize("__a___b  _ c__"), "a_b_c");
        assert_eq!(sanitize("line\nbreak\r\ttab"), "line_break_tab");
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(sanitize("nul\0byte\x07bell"), "nulbytebell");
    }

    #[test]
    fn deterministic() {
        let s = "Ünïcödé  //  mess ?? 70s.jpg";
        assert_eq!(sanitize(s), sanitize(s));
    }
}
