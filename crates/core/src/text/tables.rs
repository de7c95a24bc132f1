//! Fixed glyph tables for Cree syllabics.
//!
//! Finals are the reduced forms of consonant syllabics; the dot tables give
//! the w-dotted form of a vowel syllabic for a dot on its right or left.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical dot glyph. Also emitted for dot-sized boxes, standing in for a
/// dot whose role is decided during correction.
pub const DOT: char = 'ᐤ';

/// A dot that may still attach to a neighbouring syllabic.
pub const ATTACHABLE_DOT: char = 'ᐧ';

/// Final written as two dots.
pub const DOUBLE_DOT_FINAL: char = 'ᐝ';

/// Aspirate final, written as a pair of small strokes.
pub const ASPIRATE: char = 'ᐦ';

/// Small strokes that read as the aspirate when doubled.
pub const ASPIRATE_STROKES: [char; 3] = ['ᑊ', 'ᐠ', 'ᐟ'];

static FINALS: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    HashMap::from([
        ('ᑕ', 'ᒼ'),
        ('ᑐ', 'ᐣ'),
        ('ᑎ', 'ᐢ'),
        ('ᐸ', 'ᑉ'),
        ('ᑲ', 'ᒃ'),
        ('ᒐ', 'ᒡ'),
        ('ᒪ', 'ᒻ'),
        ('ᓇ', 'ᓐ'),
        ('ᓴ', 'ᔅ'),
        ('ᔕ', 'ᔥ'),
        ('ᔭ', 'ᔾ'),
        ('ᕋ', 'ᕐ'),
        ('ᓚ', 'ᓪ'),
        ('ᕙ', 'ᕝ'),
        ('ᕦ', 'ᕪ'),
    ])
});

static DOT_RIGHT: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    HashMap::from([
        ('ᐁ', 'ᐍ'),
        ('ᐃ', 'ᐏ'),
        ('ᐅ', 'ᐓ'),
        ('ᐊ', 'ᐘ'),
        ('ᐄ', 'ᐑ'),
        ('ᐆ', 'ᐕ'),
        ('ᐋ', 'ᐚ'),
    ])
});

static DOT_LEFT: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    HashMap::from([
        ('ᐁ', 'ᐌ'),
        ('ᐃ', 'ᐎ'),
        ('ᐅ', 'ᐒ'),
        ('ᐊ', 'ᐗ'),
        ('ᐄ', 'ᐐ'),
        ('ᐆ', 'ᐔ'),
        ('ᐋ', 'ᐙ'),
    ])
});

/// Reduced form of a syllabic, if it has one.
pub fn final_form(glyph: char) -> Option<char> {
    FINALS.get(&glyph).copied()
}

/// The glyph with a dot attached on its right.
pub fn with_dot_right(glyph: char) -> Option<char> {
    DOT_RIGHT.get(&glyph).copied()
}

/// The glyph with a dot attached on its left.
pub fn with_dot_left(glyph: char) -> Option<char> {
    DOT_LEFT.get(&glyph).copied()
}

pub fn is_aspirate_stroke(glyph: char) -> bool {
    ASPIRATE_STROKES.contains(&glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        assert_eq!(final_form('ᑲ'), Some('ᒃ'));
        assert_eq!(final_form('ᐊ'), None);
        assert_eq!(with_dot_right('ᐊ'), Some('ᐘ'));
        assert_eq!(with_dot_left('ᐊ'), Some('ᐗ'));
        assert_eq!(with_dot_left('ᑲ'), None);
        assert!(is_aspirate_stroke('ᐟ'));
    }
}
