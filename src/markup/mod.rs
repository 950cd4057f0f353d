//! # Rich-Text Markup
//!
//! Answer text may be stored as a small HTML fragment. The layout engine does
//! not read markup itself; it asks a [`MarkupParser`] for styled segments.
//!
//! Two parsers ship with the crate. [`XmlMarkupParser`] walks the fragment
//! with quick-xml and keeps inline formatting. [`StripTagsParser`] drops the
//! tags and keeps only the text; the structural parser falls back to it when
//! the fragment is not well-formed enough to read.
//!
//! Paragraph and line breaks come out as `"\n"` inside segment text, which the
//! line breaker treats as a mandatory break.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::sync::OnceLock;

/// A run of text with inline formatting applied on top of the base style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSegment {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<String>,
}

impl TextSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

pub trait MarkupParser {
    /// Split markup into styled segments. An empty result means the source
    /// holds no text.
    fn parse(&self, source: &str) -> Vec<TextSegment>;
}

/// Structural parser for `b/strong`, `i/em`, `br`, `p`/`div`, `span
/// style="color:…"` and `font color`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlMarkupParser;

/// Text-only parser: tags are removed, entities decoded, breaks kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripTagsParser;

impl MarkupParser for XmlMarkupParser {
    fn parse(&self, source: &str) -> Vec<TextSegment> {
        if !source.contains('<') && !source.contains('&') {
            return finish(vec![TextSegment::plain(source)]);
        }
        match parse_structural(source) {
            Ok(segments) => finish(segments),
            Err(e) => {
                log::warn!("Malformed rich text ({}), reading it as plain text", e);
                StripTagsParser.parse(source)
            }
        }
    }
}

impl MarkupParser for StripTagsParser {
    fn parse(&self, source: &str) -> Vec<TextSegment> {
        static BREAK: OnceLock<Regex> = OnceLock::new();
        static TAG: OnceLock<Regex> = OnceLock::new();
        static ENTITY: OnceLock<Regex> = OnceLock::new();
        let brk = BREAK.get_or_init(|| {
            Regex::new(r"(?i)<br\s*/?>|</(p|div)\s*>").expect("valid break pattern")
        });
        let tag = TAG.get_or_init(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid tag pattern"));
        let entity = ENTITY.get_or_init(|| {
            Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity pattern")
        });

        let text = brk.replace_all(source, "\n");
        let text = tag.replace_all(&text, "");
        let text = entity.replace_all(&text, |caps: &regex::Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        });
        finish(vec![TextSegment::plain(text)])
    }
}

#[derive(Debug, Clone, Default)]
struct Format {
    bold: bool,
    italic: bool,
    color: Option<String>,
}

fn parse_structural(source: &str) -> Result<Vec<TextSegment>, quick_xml::Error> {
    let wrapped = format!("<root>{}</root>", source);
    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().check_end_names = false;

    // One entry per open element; `root` sits at the bottom.
    let mut stack: Vec<(String, Format)> = Vec::new();
    let mut segments: Vec<TextSegment> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = tag_name(&e);
                match name.as_str() {
                    "br" => push_text(&mut segments, "\n", current(&stack)),
                    "p" | "div" => {
                        paragraph_break(&mut segments, current(&stack));
                        let format = apply_tag(&name, &e, current(&stack));
                        stack.push((name, format));
                    }
                    _ => {
                        let format = apply_tag(&name, &e, current(&stack));
                        stack.push((name, format));
                    }
                }
            }
            Event::Empty(e) => {
                let name = tag_name(&e);
                if matches!(name.as_str(), "br" | "p" | "div") {
                    push_text(&mut segments, "\n", current(&stack));
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                // Unclosed inner tags (`<i>` without `</i>`) close with their parent.
                if let Some(pos) = stack.iter().rposition(|(open, _)| *open == name) {
                    stack.truncate(pos);
                    if matches!(name.as_str(), "p" | "div") {
                        paragraph_break(&mut segments, current(&stack));
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape_with(named_entity)?;
                push_text(&mut segments, &text, current(&stack));
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).to_string();
                push_text(&mut segments, &text, current(&stack));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(segments)
}

fn current(stack: &[(String, Format)]) -> Format {
    stack.last().map(|(_, f)| f.clone()).unwrap_or_default()
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase()
}

fn apply_tag(name: &str, e: &BytesStart, mut format: Format) -> Format {
    match name {
        "b" | "strong" => format.bold = true,
        "i" | "em" => format.italic = true,
        "span" => {
            if let Some(color) = get_attr(e, "style").as_deref().and_then(style_color) {
                format.color = Some(color);
            }
        }
        "font" => {
            if let Some(color) = get_attr(e, "color").filter(|c| !c.trim().is_empty()) {
                format.color = Some(color.trim().to_string());
            }
        }
        _ => {}
    }
    format
}

fn get_attr(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref().eq_ignore_ascii_case(name.as_bytes()) {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

/// The `color` declaration of an inline style attribute.
fn style_color(style: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        (key.trim().eq_ignore_ascii_case("color") && !value.trim().is_empty())
            .then(|| value.trim().to_string())
    })
}

/// Append text, merging with the previous segment when the format matches.
fn push_text(segments: &mut Vec<TextSegment>, text: &str, format: Format) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = segments.last_mut() {
        if last.bold == format.bold && last.italic == format.italic && last.color == format.color {
            last.text.push_str(text);
            return;
        }
    }
    segments.push(TextSegment {
        text: text.to_string(),
        bold: format.bold,
        italic: format.italic,
        color: format.color,
    });
}

/// A newline unless the text so far is empty or already ends in one.
fn paragraph_break(segments: &mut Vec<TextSegment>, format: Format) {
    match segments.last() {
        Some(last) if !last.text.ends_with('\n') => push_text(segments, "\n", format),
        _ => {}
    }
}

/// Drop trailing breaks and empty segments.
fn finish(mut segments: Vec<TextSegment>) -> Vec<TextSegment> {
    while let Some(last) = segments.last_mut() {
        let trimmed = last.text.trim_end_matches('\n').len();
        last.text.truncate(trimmed);
        if last.text.is_empty() {
            segments.pop();
        } else {
            break;
        }
    }
    segments.retain(|s| !s.text.is_empty());
    segments
}

fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "copy" => "\u{a9}",
        _ => return None,
    })
}

fn decode_entity(body: &str) -> Option<String> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    named_entity(body).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[TextSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn plain_text_is_one_segment() {
        let segs = XmlMarkupParser.parse("just words");
        assert_eq!(segs, vec![TextSegment::plain("just words")]);
    }

    #[test]
    fn inline_formatting() {
        let segs = XmlMarkupParser.parse("a <b>bold</b> and <em>slanted</em> word");
        assert_eq!(texts(&segs), vec!["a ", "bold", " and ", "slanted", " word"]);
        assert!(segs[1].bold && !segs[1].italic);
        assert!(segs[3].italic && !segs[3].bold);
    }

    #[test]
    fn nested_formats_accumulate() {
        let segs = XmlMarkupParser.parse("<strong>x<i>y</i></strong>");
        assert!(segs[1].bold && segs[1].italic);
    }

    #[test]
    fn colors_from_span_and_font() {
        let segs = XmlMarkupParser.parse(
            r#"<span style="font-weight: 400; color: #ff0000">red</span><font color="blue">blue</font>"#,
        );
        assert_eq!(segs[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(segs[1].color.as_deref(), Some("blue"));
    }

    #[test]
    fn background_color_is_not_text_color() {
        assert_eq!(style_color("background-color: #fff"), None);
    }

    #[test]
    fn paragraphs_and_breaks_become_newlines() {
        let segs = XmlMarkupParser.parse("<p>one</p><p>two<br>three</p>");
        assert_eq!(texts(&segs), vec!["one\ntwo\nthree"]);

        let segs = XmlMarkupParser.parse("line<br/>next");
        assert_eq!(texts(&segs), vec!["line\nnext"]);
    }

    #[test]
    fn entities_are_decoded() {
        let segs = XmlMarkupParser.parse("fish &amp; chips&nbsp;&#33;");
        assert_eq!(texts(&segs), vec!["fish & chips\u{a0}!"]);
    }

    #[test]
    fn broken_markup_falls_back_to_stripping() {
        let segs = XmlMarkupParser.parse("<b>bold</b> &bogus; end");
        assert_eq!(segs.len(), 1);
        assert!(!segs[0].bold);
        assert_eq!(segs[0].text, "bold &bogus; end");
    }

    #[test]
    fn strip_tags_keeps_text_and_breaks() {
        let segs = StripTagsParser.parse("<div>a <b>b</b></div><div>c &lt;3</div>");
        assert_eq!(texts(&segs), vec!["a b\nc <3"]);
    }

    #[test]
    fn stray_angle_brackets_are_text() {
        assert_eq!(texts(&StripTagsParser.parse("I <3 you")), vec!["I <3 you"]);
        assert_eq!(
            texts(&StripTagsParser.parse("x < y and y > z")),
            vec!["x < y and y > z"]
        );
        assert_eq!(texts(&StripTagsParser.parse("a<b")), vec!["a<b"]);
        assert_eq!(texts(&StripTagsParser.parse("<i>a</i> < b")), vec!["a < b"]);
    }

    #[test]
    fn empty_paragraph_yields_nothing() {
        assert!(XmlMarkupParser.parse("<p></p>").is_empty());
        assert!(StripTagsParser.parse("<p><br></p>").is_empty());
    }
}
