//! Greedy line wrapping against a `TextMeasurer`.
//!
//! Words are packed left to right, joined by single spaces. A line is closed as
//! soon as the next word would push it past `max_width`. A word that is wider
//! than `max_width` on its own is placed alone on its line and allowed to
//! overflow; words are never hyphenated or split.

use crate::layout::font_metrics::{FontFace, TextMeasurer};

/// Wraps `text` into lines no wider than `max_width` points.
///
/// Returns an empty vec for empty or whitespace-only input. The result depends
/// only on the arguments.
pub fn wrap(
    text: &str,
    measurer: &dyn TextMeasurer,
    face: FontFace,
    size_pt: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measurer.width_of(&candidate, face, size_pt) > max_width {
            // Current line is full. Start a new one with this word.
            lines.push(current.trim().to_string());
            current = word.to_string();
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current.trim().to_string());
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::testing::Monospace;
    use crate::layout::font_metrics::StandardFonts;

    // Monospace at 10pt: every char is 5pt wide.
    const SIZE: f32 = 10.0;

    #[test]
    fn test_wrap_empty_input_yields_no_lines() {
        assert!(wrap("", &Monospace, FontFace::Regular, SIZE, 100.0).is_empty());
        assert!(wrap("   \t ", &Monospace, FontFace::Regular, SIZE, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let lines = wrap("drive train", &Monospace, FontFace::Regular, SIZE, 100.0);
        assert_eq!(lines, vec!["drive train".to_string()]);
    }

    #[test]
    fn test_wrap_breaks_at_width() {
        // 20 chars per line at 100pt.
        let lines = wrap(
            "aaaa bbbb cccc dddd eeee ffff",
            &Monospace,
            FontFace::Regular,
            SIZE,
            100.0,
        );
        assert_eq!(lines, vec!["aaaa bbbb cccc dddd", "eeee ffff"]);
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        let lines = wrap("  a   b\n c ", &Monospace, FontFace::Regular, SIZE, 100.0);
        assert_eq!(lines, vec!["a b c"]);
    }

    #[test]
    fn test_wrap_overlong_word_sits_alone() {
        let lines = wrap(
            "ok supercalifragilisticexpialidocious ok",
            &Monospace,
            FontFace::Regular,
            SIZE,
            50.0,
        );
        assert_eq!(
            lines,
            vec!["ok", "supercalifragilisticexpialidocious", "ok"]
        );
    }

    #[test]
    fn test_wrap_preserves_words_in_order() {
        let text = "Mount the IMU on a vibration-damped plate, route the CAN bus away from \
                    the motor leads and verify every connector with a continuity test before \
                    applying power for the first time.";
        for width in [30.0_f32, 55.0, 120.0, 260.0, 1000.0] {
            let lines = wrap(text, &StandardFonts, FontFace::Regular, 11.0, width);
            let rejoined = lines.join(" ");
            let original: Vec<&str> = text.split_whitespace().collect();
            let wrapped: Vec<&str> = rejoined.split_whitespace().collect();
            assert_eq!(original, wrapped, "words lost or reordered at width {width}");
        }
    }

    #[test]
    fn test_wrap_lines_fit_unless_single_word() {
        let text = "A surprisingly long phrase with Pneumonoultramicroscopicsilicovolcanoconiosis \
                    tucked inside so that one word overflows the narrow column.";
        for width in [40.0_f32, 80.0, 150.0] {
            for line in wrap(text, &StandardFonts, FontFace::Bold, 12.0, width) {
                let line_width = StandardFonts.width_of(&line, FontFace::Bold, 12.0);
                if line_width > width {
                    assert_eq!(
                        line.split_whitespace().count(),
                        1,
                        "overflowing line {line:?} must hold exactly one word"
                    );
                }
            }
        }
    }

    #[test]
    fn test_wrap_is_deterministic() {
        let text = "same input same output every single time";
        let first = wrap(text, &StandardFonts, FontFace::Regular, 11.0, 90.0);
        let second = wrap(text, &StandardFonts, FontFace::Regular, 11.0, 90.0);
        assert_eq!(first, second);
    }
}
