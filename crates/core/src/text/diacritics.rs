//! Diacritic correction over assembled text.
//!
//! Loose dots are resolved in order: doubled dots become the two-dot final,
//! single dots attach to the syllabic on their left (preferred) or right
//! when that syllabic has a dotted form, and any dot left over stays a
//! standalone dot. Finally a doubled aspirate stroke becomes the aspirate.

use super::tables::{
    ASPIRATE, ATTACHABLE_DOT, DOT, DOUBLE_DOT_FINAL, is_aspirate_stroke, with_dot_left,
    with_dot_right,
};

/// Applies every correction step to `text`.
pub fn fix_diacritics(text: &str) -> String {
    let mut buf = [0; 4];
    let doubled = text.replace(
        &String::from_iter([DOT, DOT]),
        DOUBLE_DOT_FINAL.encode_utf8(&mut buf),
    );
    let mut chars: Vec<char> = doubled
        .chars()
        .map(|c| if c == DOT { ATTACHABLE_DOT } else { c })
        .collect();

    attach_dots(&mut chars);

    let chars = chars
        .into_iter()
        .map(|c| if c == ATTACHABLE_DOT { DOT } else { c });
    collapse_aspirates(chars)
}

/// Folds each attachable dot into a neighbouring syllabic.
///
/// The left neighbour is tried first since the dot follows the syllabic it
/// was written after. Unattached dots are left in place.
pub fn attach_dots(chars: &mut Vec<char>) {
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ATTACHABLE_DOT {
            if let Some(dotted) = i.checked_sub(1).and_then(|p| with_dot_right(chars[p])) {
                chars[i - 1] = dotted;
                chars.remove(i);
                continue;
            }
            if let Some(dotted) = chars.get(i + 1).and_then(|&c| with_dot_left(c)) {
                chars[i + 1] = dotted;
                chars.remove(i);
                continue;
            }
        }
        i += 1;
    }
}

/// Replaces each pair of identical aspirate strokes with the aspirate.
fn collapse_aspirates<I: Iterator<Item = char>>(chars: I) -> String {
    let mut out = String::new();
    let mut chars = chars.peekable();
    while let Some(c) = chars.next() {
        if is_aspirate_stroke(c) && chars.next_if_eq(&c).is_some() {
            out.push(ASPIRATE);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_attaches_to_previous_syllabic() {
        assert_eq!(fix_diacritics("ᐁᐧ"), "ᐍ");
        assert_eq!(fix_diacritics("ᐁᐤ"), "ᐍ");
    }

    #[test]
    fn test_previous_syllabic_preferred_over_next() {
        assert_eq!(fix_diacritics("ᐊᐤᐃ"), "ᐘᐃ");
    }

    #[test]
    fn test_dot_attaches_to_next_syllabic() {
        assert_eq!(fix_diacritics("ᑲᐤᐊ"), "ᑲᐗ");
        assert_eq!(fix_diacritics("ᐤᐊ"), "ᐗ");
    }

    #[test]
    fn test_unattached_dot_becomes_canonical() {
        assert_eq!(fix_diacritics("ᑲᐤ"), "ᑲᐤ");
        assert_eq!(fix_diacritics("ᑲᐧ  ᒥ"), "ᑲᐤ  ᒥ");
    }

    #[test]
    fn test_double_dot_runs_before_attachment() {
        assert_eq!(fix_diacritics("ᐊᐤᐤ"), "ᐊᐝ");
        assert_eq!(fix_diacritics("ᐤᐤᐤᐊ"), "ᐝᐗ");
    }

    #[test]
    fn test_consecutive_dots_attach_in_turn() {
        assert_eq!(fix_diacritics("ᐊᐧᐧᐁ"), "ᐘᐌ");
    }

    #[test]
    fn test_aspirate_pairs() {
        assert_eq!(fix_diacritics("ᑊᑊ"), "ᐦ");
        assert_eq!(fix_diacritics("ᐟᐟᐟ"), "ᐦᐟ");
        assert_eq!(fix_diacritics("ᐠᐟ"), "ᐠᐟ");
    }

    #[test]
    fn test_dots_do_not_cross_lines() {
        assert_eq!(fix_diacritics("ᑲ\nᐤ\nᑲ"), "ᑲ\nᐤ\nᑲ");
    }
}
