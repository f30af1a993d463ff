//! Scope-stack symbol extraction over tree-sitter query matches.
//!
//! Each query match contributes at most one symbol. Matches are put into document order
//! (extent start ascending, longer extents first on ties) and walked with a stack of
//! enclosing symbols: the stack is popped until its top contains the new symbol's extent,
//! and the dotted names left on the stack form the qualified name.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};
use tracing::{debug, warn};

use super::queries::symbol_query;
use crate::analyzer::parser::{Language, get_node_text, parse_tree};
use crate::types::{
    CodeSymbol, FILE_SCOPED_MODULE_TAG, Position, Range, Result, SymbolKind, WeaveError,
    last_segment,
};

const NAME: &str = "name";
const BODY: &str = "body";
const COMMENT: &str = "comment";
const RECEIVER: &str = "receiver";

/// Compiled query bound to one language. Reusable across files.
pub struct SymbolExtractor {
    language: Language,
    query: Query,
}

impl SymbolExtractor {
    /// Extractor using the built-in query for `language`.
    pub fn for_language(language: Language) -> Result<Self> {
        let source = symbol_query(language)
            .ok_or_else(|| WeaveError::UnsupportedLanguage(language.to_string()))?;
        Self::new(language, source)
    }

    /// Extractor using a caller-supplied query.
    pub fn new(language: Language, query_source: &str) -> Result<Self> {
        let grammar = language
            .grammar()
            .ok_or_else(|| WeaveError::UnsupportedLanguage(language.to_string()))?;
        let query = Query::new(&grammar, query_source).map_err(|e| WeaveError::Query {
            language: language.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { language, query })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Symbols of one file. Never fails: problems are logged and yield an empty list.
    pub fn extract(&self, path: &str, source: &str) -> Vec<CodeSymbol> {
        match self.try_extract(path, source) {
            Ok(symbols) => {
                debug!("{}: {} symbols", path, symbols.len());
                symbols
            }
            Err(e) => {
                warn!("Symbol extraction failed for {}: {}", path, e);
                Vec::new()
            }
        }
    }

    fn try_extract(&self, path: &str, source: &str) -> Result<Vec<CodeSymbol>> {
        let tree = parse_tree(self.language, source, path)?;
        let content = source.as_bytes();
        let end_of_file = end_of_source(source);

        let capture_names = self.query.capture_names();
        let mut candidates = Vec::new();

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), content);
        while let Some(m) = matches.next() {
            let mut name: Option<Node> = None;
            let mut body: Option<Node> = None;
            let mut comments: Vec<Node> = Vec::new();
            let mut receiver: Option<&str> = None;
            let mut extent: Option<(Node, &str)> = None;

            for cap in m.captures {
                match capture_names[cap.index as usize] {
                    NAME => name = Some(cap.node),
                    BODY => body = Some(cap.node),
                    COMMENT => comments.push(cap.node),
                    RECEIVER => receiver = Some(get_node_text(cap.node, content)),
                    tag => {
                        if extent.is_none() {
                            extent = Some((cap.node, tag));
                        }
                    }
                }
            }

            let (Some(name), Some((extent_node, tag))) = (name, extent) else {
                continue;
            };

            let mut extent_range = Range::of_node(extent_node);
            let mut body_range = body.map(Range::of_node);
            if tag == FILE_SCOPED_MODULE_TAG {
                extent_range.end = end_of_file;
                if let Some(body) = body_range.as_mut() {
                    body.end = end_of_file;
                }
            }

            candidates.push(Candidate {
                name: get_node_text(name, content),
                name_range: Range::of_node(name),
                extent_range,
                body_range,
                comment: leading_comment(comments),
                receiver,
                tag,
            });
        }

        let candidates = into_document_order(candidates);

        let mut stack: Vec<(Range, &str)> = Vec::new();
        let mut symbols = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            while let Some((top, _)) = stack.last() {
                if top.contains(&candidate.extent_range) {
                    break;
                }
                stack.pop();
            }
            stack.push((candidate.extent_range, candidate.name));

            let chain = stack
                .iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(".");
            let qualified_name = match candidate.receiver {
                Some(receiver) => format!("{}.{}", receiver, chain),
                None => chain,
            };

            symbols.push(CodeSymbol {
                uri: path.to_string(),
                qualified_name,
                name: last_segment(candidate.name).to_string(),
                comment: candidate
                    .comment
                    .map(|c| get_node_text(c, content).to_string())
                    .unwrap_or_default(),
                comment_range: candidate.comment.map(Range::of_node),
                name_range: candidate.name_range,
                body_range: candidate.body_range,
                extent_range: candidate.extent_range,
                kind: SymbolKind::from_tag_or_variable(candidate.tag),
                depth: 0,
            });
        }

        Ok(symbols)
    }
}

/// Extract with an ad-hoc query. An invalid query yields an empty list and a warning.
pub fn extract_symbols(
    language: Language,
    path: &str,
    source: &str,
    query_source: &str,
) -> Vec<CodeSymbol> {
    match SymbolExtractor::new(language, query_source) {
        Ok(extractor) => extractor.extract(path, source),
        Err(e) => {
            warn!("Symbol extraction failed for {}: {}", path, e);
            Vec::new()
        }
    }
}

struct Candidate<'t> {
    name: &'t str,
    name_range: Range,
    extent_range: Range,
    body_range: Option<Range>,
    comment: Option<Node<'t>>,
    receiver: Option<&'t str>,
    tag: &'t str,
}

/// Sort by extent (start ascending, end descending) and fold duplicate matches of the same
/// declaration into one, keeping the earliest comment.
///
/// Quantified comment patterns such as `(comment)* @comment . (decl)` report the same
/// declaration once per comment suffix.
fn into_document_order(mut candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    candidates.sort_by(|a, b| {
        a.extent_range
            .start
            .cmp(&b.extent_range.start)
            .then_with(|| b.extent_range.end.cmp(&a.extent_range.end))
    });

    let mut merged: Vec<Candidate> = Vec::with_capacity(candidates.len());
    let mut seen: HashMap<(Range, Range, &str), usize> = HashMap::new();
    for candidate in candidates {
        let key = (candidate.extent_range, candidate.name_range, candidate.tag);
        match seen.entry(key) {
            Entry::Occupied(slot) => {
                let existing = &mut merged[*slot.get()];
                if let Some(comment) = candidate.comment
                    && existing
                        .comment
                        .is_none_or(|c| comment.start_byte() < c.start_byte())
                {
                    existing.comment = Some(comment);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(candidate);
            }
        }
    }
    merged
}

/// First comment of the contiguous run directly above a declaration.
///
/// A quantified sibling pattern may skip nodes between repetitions, so comments separated
/// from the run by other code are dropped before the earliest one is taken.
fn leading_comment(mut comments: Vec<Node<'_>>) -> Option<Node<'_>> {
    comments.sort_by_key(|c| c.start_byte());
    comments.dedup_by_key(|c| c.id());

    let mut first = *comments.last()?;
    for comment in comments.iter().rev().skip(1) {
        if comment.next_sibling() != Some(first) {
            break;
        }
        first = *comment;
    }
    Some(first)
}

/// Position just past the last byte of `source`.
fn end_of_source(source: &str) -> Position {
    match source.rfind('\n') {
        Some(idx) => Position::new(source.matches('\n').count(), source.len() - idx - 1),
        None => Position::new(0, source.len()),
    }
}
