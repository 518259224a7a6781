//! Minimal inline markdown for chat bubbles: bold, italic and code spans.

use once_cell::sync::Lazy;
use regex::Regex;

// Alternatives are tried left to right, so `**` wins over `*` at the same position.
static INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(.*?)\*\*|__(.*?)__|`(.*?)`|\*(.*?)\*|_(.*?)_").expect("static markdown pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    Plain,
    Bold,
    Italic,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

impl Segment {
    fn new(text: &str, style: SegmentStyle) -> Self {
        Segment {
            text: text.to_string(),
            style,
        }
    }
}

pub fn parse_inline(line: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in INLINE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            segments.push(Segment::new(&line[cursor..whole.start()], SegmentStyle::Plain));
        }
        let (inner, style) = if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            (m.as_str(), SegmentStyle::Bold)
        } else if let Some(m) = caps.get(3) {
            (m.as_str(), SegmentStyle::Code)
        } else if let Some(m) = caps.get(4).or_else(|| caps.get(5)) {
            (m.as_str(), SegmentStyle::Italic)
        } else {
            (whole.as_str(), SegmentStyle::Plain)
        };
        if !inner.is_empty() {
            segments.push(Segment::new(inner, style));
        }
        cursor = whole.end();
    }

    if cursor < line.len() {
        segments.push(Segment::new(&line[cursor..], SegmentStyle::Plain));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use SegmentStyle::*;

    fn styles(line: &str) -> Vec<(String, SegmentStyle)> {
        parse_inline(line).into_iter().map(|s| (s.text, s.style)).collect()
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(styles("hello there"), vec![("hello there".to_string(), Plain)]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_mixed_styles() {
        assert_eq!(
            styles("I'm **great**, _really_ `ok`"),
            vec![
                ("I'm ".to_string(), Plain),
                ("great".to_string(), Bold),
                (", ".to_string(), Plain),
                ("really".to_string(), Italic),
                (" ".to_string(), Plain),
                ("ok".to_string(), Code),
            ]
        );
        assert_eq!(styles("__b__ *i*"), vec![
            ("b".to_string(), Bold),
            (" ".to_string(), Plain),
            ("i".to_string(), Italic),
        ]);
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        assert_eq!(styles("2 * 3"), vec![("2 * 3".to_string(), Plain)]);
    }
}
