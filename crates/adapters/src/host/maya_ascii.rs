// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document host operating directly on Maya ASCII (`.ma`) scene text.
//!
//! References appear in two kinds of MEL statements:
//!
//! ```text
//! file -rdi 1 -ns "hero" -rfn "heroRN" -typ "mayaAscii" "/proj/assets/chr/hero.ma";
//! file -r -ns "hero" -dr 1 -rfn "heroRN" -typ "mayaAscii" "/proj/assets/chr/hero.ma";
//! createNode reference -n "heroRN";
//! ```
//!
//! Re-targeting rewrites the path literal of every `file` statement bound to
//! the node through `-rfn`. Nothing referenced is ever read, so broken paths
//! are fine.
//!
//! Scenes are kept as raw bytes. Only quoted values are decoded, lossily, so
//! a scene in a legacy codepage still parses, and every byte outside a
//! rewritten path literal is saved back unchanged.

use std::borrow::Cow;
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::{DocumentHost, HostError};

/// Host that edits `.ma` files in place.
#[derive(Debug, Default)]
pub struct MayaAsciiHost {
    scene: Option<Scene>,
}

#[derive(Debug)]
struct Scene {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl MayaAsciiHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document from in-memory text (not read from disk).
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { scene: Some(Scene { path: path.into(), bytes: text.into().into_bytes() }) }
    }

    /// Current scene text, if a document is open. Invalid UTF-8 is replaced.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.scene.as_ref().map(|s| String::from_utf8_lossy(&s.bytes))
    }

    /// Current scene bytes, if a document is open.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.scene.as_ref().map(|s| s.bytes.as_slice())
    }

    fn scene(&self) -> Result<&Scene, HostError> {
        self.scene.as_ref().ok_or(HostError::NoDocument)
    }
}

impl DocumentHost for MayaAsciiHost {
    fn open(&mut self, path: &Path) -> Result<(), HostError> {
        let is_ascii_scene =
            path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("ma"));
        if !is_ascii_scene {
            return Err(HostError::Unsupported { path: path.to_path_buf() });
        }
        self.scene = None;
        let bytes = std::fs::read(path)
            .map_err(|e| HostError::Open { path: path.to_path_buf(), reason: e.to_string() })?;
        self.scene = Some(Scene { path: path.to_path_buf(), bytes });
        Ok(())
    }

    fn scene_path(&self) -> Option<&Path> {
        self.scene.as_ref().map(|s| s.path.as_path())
    }

    fn list_references(&self) -> Vec<String> {
        let Some(scene) = self.scene.as_ref() else {
            return Vec::new();
        };
        let parsed = ParsedScene::parse(&scene.bytes);
        let mut nodes: Vec<String> = Vec::new();
        let top_level = parsed.files.iter().filter(|f| f.top_level).map(|f| &f.node);
        for node in parsed.created.iter().chain(top_level) {
            if !nodes.contains(node) {
                nodes.push(node.clone());
            }
        }
        nodes
    }

    fn reference_path(&self, node: &str) -> Result<PathBuf, HostError> {
        let scene = self.scene()?;
        let parsed = ParsedScene::parse(&scene.bytes);
        if !parsed.knows(node) {
            return Err(HostError::UnknownReference { node: node.to_string() });
        }
        let bound: Vec<&FileStatement> = parsed.files.iter().filter(|f| f.node == node).collect();
        let path = bound
            .iter()
            .filter(|f| f.top_level)
            .find_map(|f| f.path.as_ref())
            .or_else(|| bound.iter().find_map(|f| f.path.as_ref()))
            .ok_or_else(|| HostError::NoPath { node: node.to_string() })?;
        Ok(PathBuf::from(strip_copy_number(&path.value)))
    }

    fn retarget(&mut self, node: &str, new_path: &Path) -> Result<(), HostError> {
        let scene = self.scene.as_mut().ok_or(HostError::NoDocument)?;
        let parsed = ParsedScene::parse(&scene.bytes);
        if !parsed.knows(node) {
            return Err(HostError::UnknownReference { node: node.to_string() });
        }
        let mut spans: Vec<Range<usize>> = parsed
            .files
            .iter()
            .filter(|f| f.node == node)
            .filter_map(|f| f.path.as_ref().map(|p| p.span.clone()))
            .collect();
        if spans.is_empty() {
            return Err(HostError::Rejected {
                node: node.to_string(),
                reason: "no file statement carries a path for this node".to_string(),
            });
        }

        let literal = escape(&new_path.to_string_lossy().replace('\\', "/"));
        spans.sort_by_key(|span| std::cmp::Reverse(span.start));
        for span in spans {
            scene.bytes.splice(span, literal.bytes());
        }
        Ok(())
    }

    fn rename(&mut self, path: &Path) -> Result<(), HostError> {
        let scene = self.scene.as_mut().ok_or(HostError::NoDocument)?;
        scene.path = path.to_path_buf();
        Ok(())
    }

    fn save(&mut self) -> Result<PathBuf, HostError> {
        let scene = self.scene()?;
        std::fs::write(&scene.path, &scene.bytes)
            .map_err(|source| HostError::Io { path: scene.path.clone(), source })?;
        Ok(scene.path.clone())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ParsedScene {
    /// Nodes created with `createNode reference`, in file order.
    created: Vec<String>,
    files: Vec<FileStatement>,
}

#[derive(Debug)]
struct FileStatement {
    node: String,
    /// `-r` (loaded reference) rather than `-rdi` (reference depth info).
    top_level: bool,
    path: Option<PathLiteral>,
}

#[derive(Debug)]
struct PathLiteral {
    value: String,
    /// Byte range of the literal's content, quotes excluded.
    span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted { value: String, span: Range<usize> },
}

impl Token {
    fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }

    fn is_flag(&self) -> bool {
        matches!(self, Token::Word(w) if w.starts_with('-'))
    }

    fn quoted(&self) -> Option<&str> {
        match self {
            Token::Quoted { value, .. } => Some(value),
            Token::Word(_) => None,
        }
    }
}

impl ParsedScene {
    fn parse(bytes: &[u8]) -> Self {
        let mut parsed = ParsedScene::default();
        for range in statement_ranges(bytes) {
            let tokens = tokenize(bytes, range);
            match tokens.first() {
                Some(first) if first.is_word("createNode") => {
                    if tokens.get(1).is_some_and(|t| t.is_word("reference")) {
                        if let Some(name) = flag_value(&tokens, "-n") {
                            parsed.created.push(name.to_string());
                        }
                    }
                }
                Some(first) if first.is_word("file") => {
                    if let Some(node) = flag_value(&tokens, "-rfn") {
                        parsed.files.push(FileStatement {
                            node: node.to_string(),
                            top_level: tokens.iter().any(|t| t.is_word("-r")),
                            path: path_literal(&tokens),
                        });
                    }
                }
                _ => {}
            }
        }
        parsed
    }

    fn knows(&self, node: &str) -> bool {
        self.created.iter().any(|n| n == node) || self.files.iter().any(|f| f.node == node)
    }
}

/// Quoted value following `flag`.
fn flag_value<'a>(tokens: &'a [Token], flag: &str) -> Option<&'a str> {
    tokens.windows(2).find(|pair| pair[0].is_word(flag)).and_then(|pair| pair[1].quoted())
}

/// The positional path argument: last quoted token not bound to a flag.
fn path_literal(tokens: &[Token]) -> Option<PathLiteral> {
    (1..tokens.len()).rev().find_map(|i| match &tokens[i] {
        Token::Quoted { value, span } if !tokens[i - 1].is_flag() => {
            Some(PathLiteral { value: value.clone(), span: span.clone() })
        }
        _ => None,
    })
}

/// Byte ranges of `;`-terminated statements, skipping quotes and `//` comments.
fn statement_ranges(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        match (in_quote, bytes[i]) {
            (true, b'\\') => i += 1,
            (true, b'"') => in_quote = false,
            (false, b'"') => in_quote = true,
            (false, b'/') if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            (false, b';') => {
                ranges.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    ranges
}

fn tokenize(bytes: &[u8], range: Range<usize>) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = range.start;
    while i < range.end {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < range.end && bytes[i] != b'\n' {
                i += 1;
            }
        } else if b == b'"' {
            let start = i + 1;
            let mut end = start;
            while end < range.end && bytes[end] != b'"' {
                if bytes[end] == b'\\' {
                    end += 1;
                }
                end += 1;
            }
            let end = end.min(range.end);
            let value = unescape(&String::from_utf8_lossy(&bytes[start..end]));
            tokens.push(Token::Quoted { value, span: start..end });
            i = end + 1;
        } else {
            let start = i;
            while i < range.end && !bytes[i].is_ascii_whitespace() && bytes[i] != b'"' {
                i += 1;
            }
            tokens.push(Token::Word(String::from_utf8_lossy(&bytes[start..i]).into_owned()));
        }
    }
    tokens
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Drop a trailing `{N}` copy number.
fn strip_copy_number(path: &str) -> &str {
    match path.strip_suffix('}').and_then(|p| p.rsplit_once('{')) {
        Some((head, digits))
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => path,
    }
}

#[cfg(test)]
#[path = "maya_ascii_tests.rs"]
mod tests;
