//! HTML to commonmark conversion for labelled rich text.

use super::html::{Element, Token, encode_text};
use super::labels::{Marker, Node};

/// Rendered output: markdown text interleaved with unresolved markers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    Text(String),
    Marker(Marker),
}

pub(crate) fn convert(nodes: Vec<Node>) -> Vec<Segment> {
    let mut writer = Writer::default();
    for node in nodes {
        match node {
            Node::Html(token) => writer.token(token),
            Node::Marker(marker) => writer.marker(marker),
        }
    }
    writer.finish()
}

struct List {
    ordered: bool,
    next: u64,
}

#[derive(Default)]
struct Writer {
    segments: Vec<Segment>,
    out: String,
    heading: Option<(u8, String)>,
    lists: Vec<List>,
    links: Vec<Option<String>>,
    pre: usize,
    table: usize,
}

impl Writer {
    fn token(&mut self, token: Token) {
        if self.table > 0 {
            self.table_token(token);
            return;
        }
        match token {
            Token::Text(text) => self.text(&text),
            Token::Open(element) => self.open(element),
            Token::Close(name) => self.close(&name),
            Token::Comment(_) => {}
        }
    }

    fn buffer(&mut self) -> &mut String {
        match &mut self.heading {
            Some((_, text)) => text,
            None => &mut self.out,
        }
    }

    fn push(&mut self, text: &str) {
        self.buffer().push_str(text);
    }

    fn text(&mut self, text: &str) {
        if self.pre > 0 {
            self.push(text);
            return;
        }
        let mut collapsed = String::with_capacity(text.len());
        let mut in_space = false;
        for c in text.chars() {
            if c.is_whitespace() {
                if !in_space {
                    collapsed.push(' ');
                }
                in_space = true;
            } else {
                collapsed.push(c);
                in_space = false;
            }
        }
        let buffer = self.buffer();
        let at_line_start = buffer.is_empty() || buffer.ends_with('\n') || buffer.ends_with(' ');
        let collapsed = if at_line_start {
            collapsed.trim_start()
        } else {
            collapsed.as_str()
        };
        buffer.push_str(collapsed);
    }

    fn open(&mut self, element: Element) {
        match element.name.as_str() {
            "p" | "div" => self.paragraph_break(),
            "br" => {
                if self.heading.is_some() {
                    self.push(" ");
                } else {
                    self.trim_trailing_spaces();
                    self.out.push('\n');
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.block();
                let level = element.name[1..].parse().unwrap_or(6);
                self.heading = Some((level, String::new()));
            }
            "strong" | "b" => self.push("**"),
            "em" | "i" => self.push("_"),
            "code" if self.pre == 0 => self.push("`"),
            "pre" => {
                self.block();
                self.out.push_str("```\n");
                self.pre += 1;
            }
            "a" => {
                let href = element.attribute("href").map(str::to_string);
                if href.is_some() {
                    self.push("[");
                }
                self.links.push(href);
            }
            "img" => {
                if let Some(src) = element.attribute("src") {
                    let alt = element.attribute("alt").unwrap_or_default();
                    let image = format!("![{alt}]({src})");
                    self.push(&image);
                }
            }
            "ul" | "ol" => {
                if self.lists.is_empty() {
                    self.block();
                } else {
                    self.line_break();
                }
                self.lists.push(List {
                    ordered: element.name == "ol",
                    next: element
                        .attribute("start")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(1),
                });
            }
            "li" => self.list_item(),
            "hr" => {
                self.block();
                self.out.push_str("* * *");
                self.block();
            }
            "table" => {
                self.block();
                self.table = 1;
                self.out.push_str(&element.to_html());
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "p" | "div" => self.paragraph_break(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if let Some((level, text)) = self.heading.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        let heading = match level {
                            1 => format!("{text}\n{}", "=".repeat(text.chars().count())),
                            2 => format!("{text}\n{}", "-".repeat(text.chars().count())),
                            n => format!("{} {text}", "#".repeat(usize::from(n))),
                        };
                        self.out.push_str(&heading);
                    }
                    self.block();
                }
            }
            "strong" | "b" => self.push("**"),
            "em" | "i" => self.push("_"),
            "code" if self.pre == 0 => self.push("`"),
            "pre" if self.pre > 0 => {
                self.pre -= 1;
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.out.push_str("```");
                self.block();
            }
            "a" => {
                if let Some(Some(href)) = self.links.pop() {
                    let target = format!("]({href})");
                    self.push(&target);
                }
            }
            "ul" | "ol" => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.block();
                } else {
                    self.line_break();
                }
            }
            "li" => self.line_break(),
            _ => {}
        }
    }

    fn list_item(&mut self) {
        self.line_break();
        let depth = self.lists.len().max(1);
        let indent = "    ".repeat(depth - 1);
        let bullet = match self.lists.last_mut() {
            Some(list) if list.ordered => {
                let bullet = format!("{}. ", list.next);
                list.next += 1;
                bullet
            }
            _ => "- ".to_string(),
        };
        self.out.push_str(&indent);
        self.out.push_str(&bullet);
    }

    fn table_token(&mut self, token: Token) {
        match token {
            Token::Text(text) => self.out.push_str(&encode_text(&text)),
            Token::Open(element) => {
                if element.name == "table" {
                    self.table += 1;
                }
                self.out.push_str(&element.to_html());
            }
            Token::Close(name) => {
                self.out.push_str(&format!("</{name}>"));
                if name == "table" {
                    self.table -= 1;
                    if self.table == 0 {
                        self.block();
                    }
                }
            }
            Token::Comment(_) => {}
        }
    }

    fn marker(&mut self, marker: Marker) {
        self.flush();
        self.segments.push(Segment::Marker(marker));
    }

    /// Paragraphs inside list items only end the current line.
    fn paragraph_break(&mut self) {
        if self.lists.is_empty() {
            self.block();
        } else {
            self.line_break();
        }
    }

    fn block(&mut self) {
        if self.heading.is_some() || self.pre > 0 {
            return;
        }
        self.trim_trailing_spaces();
        if !self.out.is_empty() {
            while !self.out.ends_with("\n\n") {
                self.out.push('\n');
            }
        }
    }

    fn line_break(&mut self) {
        self.trim_trailing_spaces();
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(trimmed);
    }

    fn flush(&mut self) {
        let text = std::mem::take(&mut self.out);
        if !text.trim().is_empty() {
            self.segments.push(Segment::Text(text));
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.flush();
        self.segments
    }
}

/// Normalize converter output: trailing whitespace, blank line runs, setext
/// headings and `{~ ~}` inline code.
pub(crate) fn fix_up(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_fence = false;
    let mut blank_run = 0;
    let source: Vec<&str> = text.lines().map(str::trim_end).collect();
    let mut index = 0;

    while index < source.len() {
        let line = source[index];
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        if line.is_empty() && !in_fence {
            blank_run += 1;
            if blank_run < 2 {
                lines.push(String::new());
            }
            index += 1;
            continue;
        }
        blank_run = 0;

        if !in_fence {
            if let Some(level) = source.get(index + 1).and_then(|next| setext_level(next)) {
                lines.push(format!("{} {}", "#".repeat(level), inline_code(line.trim())));
                index += 2;
                continue;
            }
        }

        if in_fence {
            lines.push(line.to_string());
        } else {
            lines.push(inline_code(line));
        }
        index += 1;
    }

    lines.join("\n").trim().to_string()
}

fn inline_code(line: &str) -> String {
    line.replace("{~", "`").replace("~}", "`")
}

fn setext_level(underline: &str) -> Option<usize> {
    let underline = underline.trim();
    if underline.is_empty() {
        None
    } else if underline.chars().all(|c| c == '=') {
        Some(1)
    } else if underline.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}
