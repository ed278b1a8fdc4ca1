//! Filters for HTML ruby annotations (`<ruby><rb>漢字</rb>…<rt>かんじ</rt>…</ruby>`).

use once_cell::sync::Lazy;
use regex::Regex;

static RE_RUBY_BASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<ruby><rb>(.*?)</rb>.*?</ruby>").expect("ruby base pattern should compile")
});

static RE_RUBY_READING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<ruby><rb>.*?</rb><rp>（</rp><rt>(.*?)</rt><rp>）</rp></ruby>")
        .expect("ruby reading pattern should compile")
});

/// Replace each ruby annotation with its base text (keeps the kanji).
pub fn extract_base_text(text: &str) -> String {
    RE_RUBY_BASE.replace_all(text, "${1}").into_owned()
}

/// Replace each ruby annotation with its reading (keeps the furigana).
///
/// Only annotations using full-width parentheses in `<rp>` are recognized.
pub fn extract_readings(text: &str) -> String {
    RE_RUBY_READING.replace_all(text, "${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNOTATED: &str =
        "<ruby><rb>東京</rb><rp>（</rp><rt>とうきょう</rt><rp>）</rp></ruby>に<ruby><rb>行</rb><rp>（</rp><rt>い</rt><rp>）</rp></ruby>く";

    #[test]
    fn test_extract_base_text() {
        assert_eq!(extract_base_text(ANNOTATED), "東京に行く");
    }

    #[test]
    fn test_extract_readings() {
        assert_eq!(extract_readings(ANNOTATED), "とうきょうにいく");
    }

    #[test]
    fn test_base_text_without_rp() {
        let text = "<ruby><rb>漢字</rb><rt>かんじ</rt></ruby>";
        assert_eq!(extract_base_text(text), "漢字");
    }

    #[test]
    fn test_readings_require_fullwidth_parens() {
        let text = "<ruby><rb>漢字</rb><rp>(</rp><rt>かんじ</rt><rp>)</rp></ruby>";
        assert_eq!(extract_readings(text), text);
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(extract_base_text("ただの文章"), "ただの文章");
        assert_eq!(extract_readings("ただの文章"), "ただの文章");
    }

    #[test]
    fn test_annotation_does_not_span_lines() {
        let text = "<ruby><rb>東\n京</rb></ruby>";
        assert_eq!(extract_base_text(text), text);
    }
}
