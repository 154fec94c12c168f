//! Tree-sitter highlighting for Python source.
//!
//! The tree is walked once per parse. Leaves (and whole string and comment
//! nodes) are classified by their own kind and, for identifiers, by where
//! they sit in the parent node. Spans are then cut at line boundaries so a
//! line-oriented editor widget can look them up by line index.

use std::collections::BTreeSet;
use std::ops::Range;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::python::{is_builtin, is_keyword, language};
use crate::{SyntaxError, SyntaxResult};

/// Types of syntax elements for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Keyword,
    String,
    Number,
    Comment,
    Function,
    Type,
    Constant,
    Operator,
    Decorator,
    Builtin,
}

impl HighlightKind {
    /// Returns the theme color key for this kind.
    pub fn theme_key(&self) -> &'static str {
        match self {
            HighlightKind::Keyword => "keyword",
            HighlightKind::String => "string",
            HighlightKind::Number => "number",
            HighlightKind::Comment => "comment",
            HighlightKind::Function => "function",
            HighlightKind::Type => "type_name",
            HighlightKind::Constant => "constant",
            HighlightKind::Operator => "operator",
            HighlightKind::Decorator => "decorator",
            HighlightKind::Builtin => "builtin",
        }
    }
}

/// A highlighted span of the whole source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
    /// Kind of syntax element
    pub kind: HighlightKind,
}

/// A highlighted span inside one line, in byte offsets of that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpan {
    pub range: Range<usize>,
    pub kind: HighlightKind,
}

/// Highlights of a whole source, indexed by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineHighlights {
    lines: Vec<Vec<LineSpan>>,
}

impl LineHighlights {
    /// Spans of line `idx`, empty past the end.
    pub fn line(&self, idx: usize) -> &[LineSpan] {
        self.lines.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of lines covered.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn from_spans(source: &str, spans: &[HighlightSpan]) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));

        let mut lines: Vec<Vec<LineSpan>> = vec![Vec::new(); starts.len()];
        for span in spans {
            let first = starts.partition_point(|&s| s <= span.start) - 1;
            for (idx, &line_start) in starts.iter().enumerate().skip(first) {
                if line_start >= span.end && idx != first {
                    break;
                }
                let line_end = starts
                    .get(idx + 1)
                    .map(|next| next - 1)
                    .unwrap_or(source.len());
                let start = span.start.max(line_start);
                let end = span.end.min(line_end);
                if start < end {
                    lines[idx].push(LineSpan {
                        range: start - line_start..end - line_start,
                        kind: span.kind,
                    });
                }
            }
        }

        Self { lines }
    }
}

/// A syntax highlighter for Python source.
pub struct Highlighter {
    parser: Parser,
    tree: Option<Tree>,
}

impl Highlighter {
    /// Creates a new highlighter for a language.
    pub fn new(lang: &str) -> SyntaxResult<Self> {
        let language =
            language(lang).ok_or_else(|| SyntaxError::UnknownLanguage(lang.to_string()))?;
        Self::with_language(&language)
    }

    /// The Python highlighter.
    pub fn python() -> SyntaxResult<Self> {
        Self::with_language(&tree_sitter_python::LANGUAGE.into())
    }

    fn with_language(language: &Language) -> SyntaxResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|_| SyntaxError::ParseError)?;

        Ok(Self { parser, tree: None })
    }

    /// Parses source code and keeps the syntax tree.
    pub fn parse(&mut self, source: &str) -> SyntaxResult<()> {
        // Edits are not tracked here, so the old tree cannot be reused.
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(SyntaxError::ParseError)?;
        self.tree = Some(tree);
        Ok(())
    }

    /// Returns the spans of the last parsed tree, in source order.
    ///
    /// `source` must be the text passed to the last `parse`.
    pub fn highlight(&self, source: &str) -> Vec<HighlightSpan> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };

        let mut spans = Vec::new();
        collect_highlights(tree.root_node(), source.as_bytes(), &mut spans);
        spans
    }

    /// Parses `source` and returns its highlights split per line.
    pub fn highlight_lines(&mut self, source: &str) -> SyntaxResult<LineHighlights> {
        self.parse(source)?;
        let spans = self.highlight(source);
        Ok(LineHighlights::from_spans(source, &spans))
    }

    /// Parses `source` and returns every distinct identifier used in code,
    /// sorted. Names inside strings and comments are not included.
    pub fn identifiers(&mut self, source: &str) -> SyntaxResult<Vec<String>> {
        self.parse(source)?;
        let mut names = BTreeSet::new();
        if let Some(tree) = &self.tree {
            collect_identifiers(tree.root_node(), source.as_bytes(), &mut names);
        }
        Ok(names.into_iter().collect())
    }

    /// Returns true if byte `offset` of the last parsed source lies inside a
    /// string or a comment.
    pub fn in_string_or_comment(&self, offset: usize) -> bool {
        let Some(tree) = &self.tree else {
            return false;
        };
        let mut node = tree.root_node().descendant_for_byte_range(offset, offset);
        while let Some(n) = node {
            if matches!(n.kind(), "string" | "comment") {
                return true;
            }
            node = n.parent();
        }
        false
    }

    /// Returns the syntax tree (for debugging).
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }
}

fn collect_highlights(node: Node, source: &[u8], spans: &mut Vec<HighlightSpan>) {
    // Strings are colored as one piece, interpolations included.
    let whole = matches!(node.kind(), "string" | "comment");

    if whole || node.child_count() == 0 {
        if let Some(kind) = classify(node, source) {
            if node.start_byte() < node.end_byte() {
                spans.push(HighlightSpan {
                    start: node.start_byte(),
                    end: node.end_byte(),
                    kind,
                });
            }
        }
        if whole {
            return;
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_highlights(child, source, spans);
    }
}

fn classify(node: Node, source: &[u8]) -> Option<HighlightKind> {
    let kind = node.kind();
    match kind {
        "string" => return Some(HighlightKind::String),
        "comment" => return Some(HighlightKind::Comment),
        "integer" | "float" => return Some(HighlightKind::Number),
        "true" | "false" | "none" => return Some(HighlightKind::Constant),
        "identifier" => return classify_identifier(node, source),
        _ => {}
    }

    if node.is_named() {
        return None;
    }
    if node.parent().is_some_and(|p| p.kind() == "decorator") {
        return Some(HighlightKind::Decorator);
    }
    if is_keyword(kind) {
        return Some(HighlightKind::Keyword);
    }
    if is_operator(kind) {
        return Some(HighlightKind::Operator);
    }
    None
}

fn classify_identifier(node: Node, source: &[u8]) -> Option<HighlightKind> {
    let text = node.utf8_text(source).ok()?;
    let parent = node.parent()?;
    let is_field = |owner: Node, field: &str| {
        owner
            .child_by_field_name(field)
            .is_some_and(|n| n.id() == node.id())
    };

    if has_ancestor(node, "decorator") {
        return Some(HighlightKind::Decorator);
    }

    match parent.kind() {
        "function_definition" if is_field(parent, "name") => {
            return Some(HighlightKind::Function);
        }
        "class_definition" if is_field(parent, "name") => return Some(HighlightKind::Type),
        "type" => return Some(HighlightKind::Type),
        "call" if is_field(parent, "function") => {
            return Some(if is_builtin(text) {
                HighlightKind::Builtin
            } else {
                HighlightKind::Function
            });
        }
        "attribute" if is_field(parent, "attribute") => {
            let called = parent.parent().is_some_and(|call| {
                call.kind() == "call"
                    && call
                        .child_by_field_name("function")
                        .is_some_and(|f| f.id() == parent.id())
            });
            return called.then_some(HighlightKind::Function);
        }
        _ => {}
    }

    if is_builtin(text) {
        Some(HighlightKind::Builtin)
    } else if is_constant_name(text) {
        Some(HighlightKind::Constant)
    } else {
        None
    }
}

fn has_ancestor(node: Node, kind: &str) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        if n.kind() == kind {
            return true;
        }
        current = n.parent();
    }
    false
}

/// `MAX_SIZE` style names.
fn is_constant_name(text: &str) -> bool {
    text.len() > 1
        && text.chars().any(|c| c.is_ascii_uppercase())
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn is_operator(kind: &str) -> bool {
    kind == "->"
        || (!kind.is_empty() && kind.chars().all(|c| "+-*/%=<>!&|^~".contains(c)))
}

fn collect_identifiers(node: Node, source: &[u8], names: &mut BTreeSet<String>) {
    if matches!(node.kind(), "string" | "comment") {
        return;
    }
    if node.kind() == "identifier" {
        if let Ok(text) = node.utf8_text(source) {
            names.insert(text.to_string());
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_identifiers(child, source, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_on_line(
        highlights: &LineHighlights,
        source: &str,
        line: usize,
    ) -> Vec<(String, HighlightKind)> {
        let text = source.lines().nth(line).unwrap();
        highlights
            .line(line)
            .iter()
            .map(|span| (text[span.range.clone()].to_string(), span.kind))
            .collect()
    }

    #[test]
    fn test_python_highlighting() {
        let mut highlighter = Highlighter::python().unwrap();
        let source = "def greet(name):\n    print(\"hi\", name)  # say hi\n    return 42\n";
        let highlights = highlighter.highlight_lines(source).unwrap();

        let first = kinds_on_line(&highlights, source, 0);
        assert!(first.contains(&("def".to_string(), HighlightKind::Keyword)));
        assert!(first.contains(&("greet".to_string(), HighlightKind::Function)));

        let second = kinds_on_line(&highlights, source, 1);
        assert!(second.contains(&("print".to_string(), HighlightKind::Builtin)));
        assert!(second.contains(&("\"hi\"".to_string(), HighlightKind::String)));
        assert!(second.contains(&("# say hi".to_string(), HighlightKind::Comment)));

        let third = kinds_on_line(&highlights, source, 2);
        assert!(third.contains(&("return".to_string(), HighlightKind::Keyword)));
        assert!(third.contains(&("42".to_string(), HighlightKind::Number)));
    }

    #[test]
    fn test_class_and_constants() {
        let mut highlighter = Highlighter::python().unwrap();
        let source = "class Point:\n    LIMIT = None\n";
        let highlights = highlighter.highlight_lines(source).unwrap();

        let first = kinds_on_line(&highlights, source, 0);
        assert!(first.contains(&("Point".to_string(), HighlightKind::Type)));

        let second = kinds_on_line(&highlights, source, 1);
        assert!(second.contains(&("LIMIT".to_string(), HighlightKind::Constant)));
        assert!(second.contains(&("None".to_string(), HighlightKind::Constant)));
        assert!(second.contains(&("=".to_string(), HighlightKind::Operator)));
    }

    #[test]
    fn test_multiline_string_split_per_line() {
        let mut highlighter = Highlighter::python().unwrap();
        let source = "x = \"\"\"one\ntwo\"\"\"\n";
        let highlights = highlighter.highlight_lines(source).unwrap();

        assert_eq!(highlights.len(), 3);
        let second = kinds_on_line(&highlights, source, 1);
        assert_eq!(second, vec![("two\"\"\"".to_string(), HighlightKind::String)]);
        assert!(highlights.line(2).is_empty());
        assert!(highlights.line(99).is_empty());
    }

    #[test]
    fn test_identifiers_skip_strings_and_comments() {
        let mut highlighter = Highlighter::python().unwrap();
        let source = "total = 0\nfor item in items:\n    total += item  # counter\nprint('hidden')\n";
        let names = highlighter.identifiers(source).unwrap();

        assert_eq!(names, vec!["item", "items", "print", "total"]);
    }

    #[test]
    fn test_in_string_or_comment() {
        let mut highlighter = Highlighter::python().unwrap();
        let source = "x = 'abc'  # note";
        highlighter.parse(source).unwrap();

        assert!(!highlighter.in_string_or_comment(0));
        assert!(highlighter.in_string_or_comment(6));
        assert!(highlighter.in_string_or_comment(14));
    }

    #[test]
    fn test_broken_code_still_highlights() {
        let mut highlighter = Highlighter::python().unwrap();
        let highlights = highlighter.highlight_lines("if x ==\n    print(").unwrap();
        assert!(!highlights.line(0).is_empty());
    }

    #[test]
    fn test_unknown_language() {
        assert!(matches!(
            Highlighter::new("cobol"),
            Err(SyntaxError::UnknownLanguage(_))
        ));
        assert!(Highlighter::new("py").is_ok());
    }
}
