//! A small tokenizer for the HTML subset the CMS emits in rich-text fields.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern is valid")
});

/// An opening (or self-closing) tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub self_closing: bool,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Serialize the tag back to HTML.
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.name);
        for (key, value) in &self.attributes {
            html.push_str(&format!(" {key}=\"{}\"", value.replace('"', "&quot;")));
        }
        html.push_str(if self.self_closing { " />" } else { ">" });
        html
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text with entities already decoded.
    Text(String),
    Open(Element),
    Close(String),
    Comment(String),
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Split `input` into tokens. Never fails: anything that does not look like a
/// tag is treated as text.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        let candidate = &rest[lt..];

        if let Some(body) = candidate.strip_prefix("<!--") {
            let (comment, consumed) = match body.find("-->") {
                Some(end) => (&body[..end], 4 + end + 3),
                None => (body, candidate.len()),
            };
            flush_text(&mut text, &mut tokens);
            tokens.push(Token::Comment(comment.to_string()));
            rest = &candidate[consumed..];
            continue;
        }

        match parse_tag(candidate) {
            Some((token, consumed)) => {
                flush_text(&mut text, &mut tokens);
                if let Some(token) = token {
                    tokens.push(token);
                }
                rest = &candidate[consumed..];
            }
            None => {
                text.push('<');
                rest = &candidate[1..];
            }
        }
    }
    text.push_str(rest);
    flush_text(&mut text, &mut tokens);
    tokens
}

fn flush_text(text: &mut String, tokens: &mut Vec<Token>) {
    if !text.is_empty() {
        tokens.push(Token::Text(decode_entities(text)));
        text.clear();
    }
}

/// Parse a tag starting at `<`. Returns the token (if any) and bytes consumed.
fn parse_tag(candidate: &str) -> Option<(Option<Token>, usize)> {
    let end = tag_end(candidate)?;
    let inner = &candidate[1..end];
    let consumed = end + 1;

    if let Some(name) = inner.strip_prefix('/') {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        return Some((Some(Token::Close(name)), consumed));
    }
    if inner.starts_with('!') || inner.starts_with('?') {
        // Doctype or processing instruction.
        return Some((None, consumed));
    }
    if !inner.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let name_len = inner
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();
    let trimmed = inner.trim_end();
    let explicit_self_close = trimmed.ends_with('/');
    let attr_source = trimmed[name_len..].trim_end_matches('/');

    let attributes = ATTRIBUTE
        .captures_iter(attr_source)
        .map(|caps| {
            let key = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (key, value)
        })
        .collect();

    let self_closing = explicit_self_close || VOID_ELEMENTS.contains(&name.as_str());
    Some((
        Some(Token::Open(Element {
            name,
            attributes,
            self_closing,
        })),
        consumed,
    ))
}

/// Index of the `>` closing the tag, skipping quoted attribute values.
fn tag_end(candidate: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, c) in candidate.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(index),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

/// Decode the named and numeric entities the CMS produces.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Re-encode text for inclusion in HTML.
pub fn encode_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(name: &str) -> Element {
        Element {
            name: name.to_string(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    #[test]
    fn tokenizes_tags_text_and_comments() {
        let tokens = tokenize("<p>Hello <strong>world</strong></p><!--note-->");
        assert_eq!(
            tokens,
            vec![
                Token::Open(open("p")),
                Token::Text("Hello ".to_string()),
                Token::Open(open("strong")),
                Token::Text("world".to_string()),
                Token::Close("strong".to_string()),
                Token::Close("p".to_string()),
                Token::Comment("note".to_string()),
            ]
        );
    }

    #[test]
    fn parses_quoted_attributes() {
        let tokens = tokenize(
            r#"<p type="application/kenticocloud" data-rel='link' data-codename=abc></p>"#,
        );
        match &tokens[0] {
            Token::Open(element) => {
                assert_eq!(element.attribute("type"), Some("application/kenticocloud"));
                assert_eq!(element.attribute("data-rel"), Some("link"));
                assert_eq!(element.attribute("data-codename"), Some("abc"));
                assert!(!element.self_closing);
            }
            other => panic!("expected open tag, got {other:?}"),
        }
    }

    #[test]
    fn void_and_self_closing_elements() {
        let tokens = tokenize("a<br>b<img src=\"x.png\" />");
        assert!(matches!(&tokens[1], Token::Open(e) if e.name == "br" && e.self_closing));
        assert!(matches!(&tokens[3], Token::Open(e) if e.name == "img" && e.self_closing));
    }

    #[test]
    fn stray_angle_brackets_are_text() {
        let tokens = tokenize("1 < 2 and 3 > 2");
        assert_eq!(tokens, vec![Token::Text("1 < 2 and 3 > 2".to_string())]);
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt; &#39;d&#x27;"), "a & b <c> 'd'");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }
}
