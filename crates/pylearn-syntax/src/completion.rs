//! Completion candidates ("recommendations") for the identifier being typed.

use std::collections::HashMap;

use crate::highlight::Highlighter;
use crate::python::{BUILTINS, KEYWORDS};
use crate::SyntaxResult;

/// Where a candidate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompletionKind {
    Keyword,
    Builtin,
    Identifier,
}

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub label: String,
    pub kind: CompletionKind,
}

/// Candidates for the prefix ending at the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    /// Char offset where the prefix starts
    pub start: usize,
    /// The identifier prefix before the cursor
    pub prefix: String,
    pub items: Vec<Completion>,
}

impl CompletionSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Offers keywords, builtins and names already used in the source.
pub struct CompletionProvider {
    highlighter: Highlighter,
    max_results: usize,
}

impl CompletionProvider {
    pub fn new(max_results: usize) -> SyntaxResult<Self> {
        Ok(Self {
            highlighter: Highlighter::python()?,
            max_results,
        })
    }

    /// Returns candidates for the identifier ending at char offset `cursor`.
    ///
    /// Nothing is offered inside strings or comments, after a digit-led
    /// token or when no prefix has been typed yet.
    pub fn complete(&mut self, source: &str, cursor: usize) -> CompletionSet {
        let before: Vec<char> = source.chars().take(cursor).collect();
        let prefix_len = before
            .iter()
            .rev()
            .take_while(|c| c.is_alphanumeric() || **c == '_')
            .count();
        let start = before.len() - prefix_len;
        let prefix: String = before[start..].iter().collect();

        if prefix.is_empty() || prefix.starts_with(|c: char| c.is_ascii_digit()) {
            return CompletionSet::default();
        }

        let identifiers = match self.highlighter.identifiers(source) {
            Ok(names) => names,
            Err(e) => {
                tracing::debug!("completion parse failed: {}", e);
                Vec::new()
            }
        };

        let cursor_byte: usize = before.iter().map(|c| c.len_utf8()).sum();
        if self.highlighter.in_string_or_comment(cursor_byte.saturating_sub(1)) {
            return CompletionSet::default();
        }

        // Keywords win over builtins, builtins over buffer names.
        let mut best: HashMap<&str, CompletionKind> = HashMap::new();
        let sources = [
            (KEYWORDS, CompletionKind::Keyword),
            (BUILTINS, CompletionKind::Builtin),
        ];
        for (words, kind) in sources {
            for word in words {
                best.entry(*word).or_insert(kind);
            }
        }
        for name in &identifiers {
            best.entry(name.as_str()).or_insert(CompletionKind::Identifier);
        }

        let mut items: Vec<Completion> = best
            .into_iter()
            .filter(|(label, _)| label.starts_with(prefix.as_str()) && *label != prefix)
            .map(|(label, kind)| Completion {
                label: label.to_string(),
                kind,
            })
            .collect();
        items.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then(a.label.len().cmp(&b.label.len()))
                .then(a.label.cmp(&b.label))
        });
        items.truncate(self.max_results);

        CompletionSet {
            start,
            prefix,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(set: &CompletionSet) -> Vec<&str> {
        set.items.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_offers_keywords_builtins_and_names() {
        let mut provider = CompletionProvider::new(10).unwrap();
        let source = "price = 3\npr";
        let set = provider.complete(source, source.chars().count());

        assert_eq!(set.prefix, "pr");
        assert_eq!(set.start, 10);
        assert_eq!(labels(&set), vec!["print", "price"]);
        assert_eq!(set.items[0].kind, CompletionKind::Builtin);
        assert_eq!(set.items[1].kind, CompletionKind::Identifier);
    }

    #[test]
    fn test_keywords_rank_first() {
        let mut provider = CompletionProvider::new(5).unwrap();
        let source = "items = []
i";
        let set = provider.complete(source, source.chars().count());
        assert_eq!(labels(&set), vec!["if", "in", "is", "import", "id"]);
    }

    #[test]
    fn test_keyword_kind() {
        let mut provider = CompletionProvider::new(10).unwrap();
        let set = provider.complete("whi", 3);
        assert_eq!(
            set.items,
            vec![Completion {
                label: "while".to_string(),
                kind: CompletionKind::Keyword,
            }]
        );
    }

    #[test]
    fn test_nothing_without_prefix() {
        let mut provider = CompletionProvider::new(10).unwrap();
        assert!(provider.complete("x = ", 4).is_empty());
        assert!(provider.complete("x = 12", 6).is_empty());
    }

    #[test]
    fn test_nothing_inside_strings_or_comments() {
        let mut provider = CompletionProvider::new(10).unwrap();
        let source = "s = 'pri'";
        assert!(provider.complete(source, 8).is_empty());
        let source = "# pri";
        assert!(provider.complete(source, 5).is_empty());
    }

    #[test]
    fn test_result_limit() {
        let mut provider = CompletionProvider::new(2).unwrap();
        let set = provider.complete("s", 1);
        assert_eq!(set.items.len(), 2);
    }
}
