//! Selector matching
//!
//! Supports what page utilities use to find elements and their
//! containers: type, `#id`, `.class` and `*` simple selectors combined
//! into compounds (`img.hero#main`), the descendant combinator
//! (`.gallery img`) and comma-separated lists.

use std::str::FromStr;

use crate::{DomError, DomResult, DomTree, ElementData, NodeId};

/// One compound selector, e.g. `div.frame#main`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if !el.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| el.has_class(c))
    }
}

/// A complex selector: compounds joined by descendant combinators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Leftmost first; the last compound is the subject
    compounds: Vec<Compound>,
}

impl Selector {
    /// Check whether `node` matches this selector
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some((subject, rest)) = self.compounds.split_last() else {
            return false;
        };
        let Some(el) = tree.element(node) else {
            return false;
        };
        if !subject.matches(el) {
            return false;
        }

        // Descendant combinators only, so greedy right-to-left matching is exact.
        let mut ancestors = tree.ancestors(node);
        'outer: for compound in rest.iter().rev() {
            for ancestor in ancestors.by_ref() {
                if tree.element(ancestor).is_some_and(|el| compound.matches(el)) {
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }

    fn parse(text: &str, full: &str) -> DomResult<Self> {
        let compounds = text
            .split_whitespace()
            .map(|part| parse_compound(part, full))
            .collect::<DomResult<Vec<_>>>()?;
        if compounds.is_empty() {
            return Err(DomError::selector(full, "empty selector"));
        }
        Ok(Self { compounds })
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Selector>,
}

impl SelectorList {
    /// Parse selector text
    pub fn parse(text: &str) -> DomResult<Self> {
        let selectors = text
            .split(',')
            .map(|part| Selector::parse(part, text))
            .collect::<DomResult<Vec<_>>>()?;
        Ok(Self { selectors })
    }

    /// Check whether `node` matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(tree, node))
    }

    /// Nearest ancestor of `node` (excluding `node`) that matches
    pub fn closest_ancestor(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        tree.ancestors(node).find(|&a| self.matches(tree, a))
    }

    /// All matching descendants of `root`, in document order
    pub fn query_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .into_iter()
            .filter(|&n| self.matches(tree, n))
            .collect()
    }
}

impl FromStr for SelectorList {
    type Err = DomError;

    fn from_str(s: &str) -> DomResult<Self> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(part: &str, full: &str) -> DomResult<Compound> {
    let mut compound = Compound::default();
    let mut rest = part;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        if end > 0 {
            compound.tag = Some(rest[..end].to_ascii_lowercase());
            rest = &rest[end..];
        }
    }

    while let Some(marker) = rest.chars().next() {
        let body = &rest[marker.len_utf8()..];
        let end = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
        if end == 0 {
            return Err(DomError::selector(full, format!("unexpected {marker:?}")));
        }
        let ident = body[..end].to_string();
        match marker {
            '#' => compound.id = Some(ident),
            '.' => compound.classes.push(ident),
            other => {
                return Err(DomError::selector(full, format!("unsupported syntax {other:?}")));
            }
        }
        rest = &body[end..];
    }

    Ok(compound)
}
