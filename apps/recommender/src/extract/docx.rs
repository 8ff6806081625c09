use std::io::{Cursor, Read};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraph texts of the main document part, joined with `\n`.
pub(super) fn extract(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("not a valid DOCX container")?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .with_context(|| format!("missing {DOCUMENT_PART}"))?
        .read_to_string(&mut xml)
        .with_context(|| format!("{DOCUMENT_PART} is not valid UTF-8"))?;

    Ok(paragraphs(&xml).join("\n"))
}

/// Paragraphs in document order, each with only its own runs.
///
/// Text boxes (`w:txbxContent`) and VML fallbacks (`mc:Fallback`) carry paragraphs of
/// their own nested inside a run. Those subtrees are skipped, so they neither end the
/// enclosing paragraph early nor leak text into it.
fn paragraphs(xml: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut current: Option<String> = None;
    let mut skip_from: Option<usize> = None;

    for token in token_re().find_iter(xml).map(|m| m.as_str()) {
        match Token::parse(token) {
            Token::Ignored => {}
            Token::Text(raw) => {
                if skip_from.is_some() || stack.last() != Some(&"w:t") {
                    continue;
                }
                if let Some(text) = current.as_mut() {
                    if in_own_run(&stack[..stack.len() - 1]) {
                        text.push_str(&unescape(raw));
                    }
                }
            }
            Token::Open { name, empty } => {
                if skip_from.is_none() {
                    let own_run = in_own_run(&stack);
                    match name {
                        "w:p" if current.is_none() && empty => out.push(String::new()),
                        "w:p" if current.is_none() => current = Some(String::new()),
                        "w:tab" if own_run => push_char(&mut current, '\t'),
                        "w:br" | "w:cr" if own_run => push_char(&mut current, '\n'),
                        _ => {}
                    }
                }
                if !empty {
                    stack.push(name);
                    if skip_from.is_none() && SKIPPED_SUBTREES.contains(&name) {
                        skip_from = Some(stack.len());
                    }
                }
            }
            Token::Close { name } => {
                // Tolerate unbalanced markup by unwinding to the matching open tag.
                let Some(depth) = stack.iter().rposition(|open| *open == name) else {
                    continue;
                };
                stack.truncate(depth);
                match skip_from {
                    Some(from) if stack.len() < from => skip_from = None,
                    Some(_) => {}
                    None if name == "w:p" && !stack.contains(&"w:p") => {
                        if let Some(text) = current.take() {
                            out.push(text);
                        }
                    }
                    None => {}
                }
            }
        }
    }
    out
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(text) = current {
        text.push(c);
    }
}

const SKIPPED_SUBTREES: [&str; 2] = ["w:txbxContent", "mc:Fallback"];

/// Innermost element is a run belonging directly to the outermost paragraph.
fn in_own_run(stack: &[&str]) -> bool {
    stack.last() == Some(&"w:r") && stack.iter().filter(|name| **name == "w:p").count() == 1
}

enum Token<'a> {
    Open { name: &'a str, empty: bool },
    Close { name: &'a str },
    Text(&'a str),
    Ignored,
}

impl<'a> Token<'a> {
    fn parse(raw: &'a str) -> Self {
        let Some(tag) = raw.strip_prefix('<') else {
            return Token::Text(raw);
        };
        if tag.starts_with('?') || tag.starts_with('!') {
            return Token::Ignored;
        }
        let tag = tag.strip_suffix('>').unwrap_or(tag);
        if let Some(name) = tag.strip_prefix('/') {
            return Token::Close { name: name.trim() };
        }
        let empty = tag.ends_with('/');
        let name = tag
            .trim_end_matches('/')
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default();
        Token::Open { name, empty }
    }
}

fn unescape(text: &str) -> String {
    entity_re()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .and_then(|n| n.ok())
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>|[^<]+").expect("valid regex"))
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex"))
}
