//! CSS selector parsing and matching.
//!
//! Covers the grammar [§4.3 CSS model] names: type, universal, id, class,
//! attribute, descendant/child/adjacent/sibling combinators, a handful of
//! structural pseudo-classes, and `:not()`. No specificity is computed;
//! the cascade orders purely by declaration order (§9 open question).

use wisp_dom::{DomTree, Node, NodeId};

/// One condition within a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `div`, `span`, ... (already lowercased).
    Type(String),
    /// `*`.
    Universal,
    /// `#id`.
    Id(String),
    /// `.class`.
    Class(String),
    /// `[attr...]`.
    Attribute(AttributeSelector),
    /// `:first-child`, `:nth-child(...)`, `:not(...)`.
    PseudoClass(PseudoClass),
}

/// An attribute condition and how the value is compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name (case-sensitive, as HTML lowercases on parse anyway).
    pub name: String,
    /// How to compare the attribute's value, if at all.
    pub op: AttributeMatch,
}

/// The comparison an attribute selector performs against the element's
/// attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatch {
    /// `[name]` — attribute present, value unconstrained.
    Exists,
    /// `[name="v"]`.
    Equals(String),
    /// `[name~="v"]` — `v` is one of the whitespace-separated tokens.
    Includes(String),
    /// `[name|="v"]` — value equals `v` or starts with `v-`.
    DashMatch(String),
    /// `[name^="v"]`.
    Prefix(String),
    /// `[name$="v"]`.
    Suffix(String),
    /// `[name*="v"]`.
    Substring(String),
}

/// Structural pseudo-classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:first-child`.
    FirstChild,
    /// `:last-child`.
    LastChild,
    /// `:nth-child(an+b | odd | even)`.
    NthChild(NthExpr),
    /// `:not(<simple selector list>)`, matches if none of the compounds
    /// inside match.
    Not(Vec<Compound>),
}

/// The `an+b` micro-syntax used by `:nth-child()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpr {
    /// Step size. Zero means "match only the `b`-th element".
    pub a: i32,
    /// Offset.
    pub b: i32,
}

impl NthExpr {
    #[must_use]
    pub const fn matches(self, one_based_index: i32) -> bool {
        if self.a == 0 {
            return one_based_index == self.b;
        }
        let k = one_based_index - self.b;
        k % self.a == 0 && k / self.a >= 0
    }
}

/// A compound selector: all simple selectors must match the same element.
pub type Compound = Vec<SimpleSelector>;

/// Combinators joining compounds in a selector sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`.
    Descendant,
    /// `A > B`.
    Child,
    /// `A + B`.
    Adjacent,
    /// `A ~ B`.
    Sibling,
}

/// A full selector: a rightmost "key" compound plus ancestor compounds
/// joined by combinators, read left to right as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Compounds in source order, e.g. `a`, `>`, `b` gives `[a, b]`.
    pub compounds: Vec<Compound>,
    /// One combinator between each adjacent pair of compounds;
    /// `combinators.len() == compounds.len() - 1`.
    pub combinators: Vec<Combinator>,
}

/// A comma-separated selector group, e.g. `h1, h2, .title`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorGroup(pub Vec<Selector>);

impl SelectorGroup {
    /// Parse a comma-separated list of selectors.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self(split_top_level(input, ',').iter().filter_map(|s| parse_selector(s)).collect())
    }

    /// Whether any selector in the group matches `node`.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.0.iter().any(|sel| matches_selector(tree, node, sel))
    }
}

fn parse_selector(input: &str) -> Option<Selector> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let normalized = normalize_combinators(input);
    let tokens: Vec<&str> = normalized.split_ascii_whitespace().collect();

    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending_combinator = None;

    for token in tokens {
        match token {
            ">" => pending_combinator = Some(Combinator::Child),
            "+" => pending_combinator = Some(Combinator::Adjacent),
            "~" => pending_combinator = Some(Combinator::Sibling),
            compound_text => {
                if !compounds.is_empty() {
                    combinators.push(pending_combinator.take().unwrap_or(Combinator::Descendant));
                }
                compounds.push(parse_compound(compound_text)?);
            }
        }
    }

    if compounds.is_empty() {
        return None;
    }
    Some(Selector { compounds, combinators })
}

/// Insert whitespace around bare `>`, `+`, `~` combinators that sit outside
/// `[...]`/`(...)` so a later whitespace split separates them cleanly.
fn normalize_combinators(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut depth = 0i32;
    for c in input.chars() {
        match c {
            '[' | '(' => {
                depth += 1;
                out.push(c);
            }
            ']' | ')' => {
                depth -= 1;
                out.push(c);
            }
            '>' | '+' | '~' if depth == 0 => {
                out.push(' ');
                out.push(c);
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

fn parse_compound(input: &str) -> Option<Compound> {
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut out = Compound::new();

    if chars.first() == Some(&'*') {
        out.push(SimpleSelector::Universal);
        i = 1;
    } else {
        let start = i;
        while i < chars.len() && !matches!(chars[i], '#' | '.' | '[' | ':') {
            i += 1;
        }
        if i > start {
            out.push(SimpleSelector::Type(chars[start..i].iter().collect::<String>().to_ascii_lowercase()));
        }
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                i += 1;
                let start = i;
                while i < chars.len() && !matches!(chars[i], '#' | '.' | '[' | ':') {
                    i += 1;
                }
                out.push(SimpleSelector::Id(chars[start..i].iter().collect()));
            }
            '.' => {
                i += 1;
                let start = i;
                while i < chars.len() && !matches!(chars[i], '#' | '.' | '[' | ':') {
                    i += 1;
                }
                out.push(SimpleSelector::Class(chars[start..i].iter().collect()));
            }
            '[' => {
                let close = find_matching(&chars, i, '[', ']')?;
                let inner: String = chars[i + 1..close].iter().collect();
                out.push(SimpleSelector::Attribute(parse_attribute_selector(&inner)?));
                i = close + 1;
            }
            ':' => {
                let (pseudo, next) = parse_pseudo(&chars, i)?;
                out.push(SimpleSelector::PseudoClass(pseudo));
                i = next;
            }
            _ => return None,
        }
    }

    Some(out)
}

fn find_matching(chars: &[char], open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0i32;
    for (i, &c) in chars.iter().enumerate().skip(open_at) {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn parse_attribute_selector(inner: &str) -> Option<AttributeSelector> {
    for (op_str, make_op) in [
        ("~=", AttributeMatch::Includes as fn(String) -> AttributeMatch),
        ("|=", AttributeMatch::DashMatch),
        ("^=", AttributeMatch::Prefix),
        ("$=", AttributeMatch::Suffix),
        ("*=", AttributeMatch::Substring),
        ("=", AttributeMatch::Equals),
    ] {
        if let Some((name, value)) = inner.split_once(op_str) {
            let value = value.trim().trim_matches(['"', '\'']).to_string();
            return Some(AttributeSelector {
                name: name.trim().to_string(),
                op: make_op(value),
            });
        }
    }
    Some(AttributeSelector {
        name: inner.trim().to_string(),
        op: AttributeMatch::Exists,
    })
}

fn parse_pseudo(chars: &[char], colon_at: usize) -> Option<(PseudoClass, usize)> {
    let mut i = colon_at + 1;
    let start = i;
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
        i += 1;
    }
    let name: String = chars[start..i].iter().collect::<String>().to_ascii_lowercase();

    if chars.get(i) == Some(&'(') {
        let close = find_matching(chars, i, '(', ')')?;
        let arg: String = chars[i + 1..close].iter().collect();
        let pseudo = match name.as_str() {
            "nth-child" => PseudoClass::NthChild(parse_nth(&arg)?),
            "not" => PseudoClass::Not(split_top_level(&arg, ',').iter().filter_map(|s| parse_compound(s.trim())).collect()),
            _ => return None,
        };
        return Some((pseudo, close + 1));
    }

    let pseudo = match name.as_str() {
        "first-child" => PseudoClass::FirstChild,
        "last-child" => PseudoClass::LastChild,
        _ => return None,
    };
    Some((pseudo, i))
}

fn parse_nth(input: &str) -> Option<NthExpr> {
    let s = input.trim().to_ascii_lowercase().replace(' ', "");
    if s == "odd" {
        return Some(NthExpr { a: 2, b: 1 });
    }
    if s == "even" {
        return Some(NthExpr { a: 2, b: 0 });
    }
    if let Some(n_pos) = s.find('n') {
        let a_part = &s[..n_pos];
        let a = match a_part {
            "" | "+" => 1,
            "-" => -1,
            _ => a_part.parse().ok()?,
        };
        let b_part = &s[n_pos + 1..];
        let b = if b_part.is_empty() { 0 } else { b_part.parse().ok()? };
        Some(NthExpr { a, b })
    } else {
        s.parse().ok().map(|b| NthExpr { a: 0, b })
    }
}

/// Split `input` on `sep` at bracket/paren/quote depth zero.
fn split_top_level(input: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    for c in input.chars() {
        match c {
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth -= 1;
                current.push(c);
            }
            c if c == sep && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() || !parts.is_empty() {
        parts.push(current);
    }
    parts.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

/// Whether `sel` matches `node`. False for non-element nodes.
#[must_use]
pub fn matches_selector(tree: &DomTree, node: NodeId, sel: &Selector) -> bool {
    let Some(last) = sel.compounds.last() else { return false };
    if !matches_compound(tree, node, last) {
        return false;
    }
    match_ancestor_chain(tree, node, &sel.compounds[..sel.compounds.len() - 1], &sel.combinators)
}

fn match_ancestor_chain(tree: &DomTree, node: NodeId, remaining: &[Compound], combinators: &[Combinator]) -> bool {
    let Some(combinator) = combinators.last() else { return true };
    let Some(compound) = remaining.last() else { return true };
    let candidates = match combinator {
        Combinator::Descendant => ancestors(tree, node).collect::<Vec<_>>(),
        Combinator::Child => tree.parent(node).into_iter().collect(),
        Combinator::Adjacent => tree.prev_sibling(node).into_iter().collect(),
        Combinator::Sibling => preceding_siblings(tree, node),
    };

    for candidate in candidates {
        if matches_compound(tree, candidate, compound)
            && match_ancestor_chain(tree, candidate, &remaining[..remaining.len() - 1], &combinators[..combinators.len() - 1])
        {
            return true;
        }
    }
    false
}

fn ancestors(tree: &DomTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(tree.parent(node), move |&id| tree.parent(id))
}

fn preceding_siblings(tree: &DomTree, node: NodeId) -> Vec<NodeId> {
    let Some(parent) = tree.parent(node) else { return Vec::new() };
    let siblings = tree.children(parent);
    let Some(pos) = siblings.iter().position(|&c| c == node) else { return Vec::new() };
    siblings[..pos].to_vec()
}

fn matches_compound(tree: &DomTree, node: NodeId, compound: &Compound) -> bool {
    let Some(element) = tree.get(node).and_then(Node::as_element) else {
        return false;
    };
    compound.iter().all(|simple| matches_simple(tree, node, element, simple))
}

fn matches_simple(tree: &DomTree, node: NodeId, element: &wisp_dom::ElementData, simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(name) => &element.tag_name == name,
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),
        SimpleSelector::Class(class) => element.class_list().contains(&class.as_str()),
        SimpleSelector::Attribute(attr) => matches_attribute(element, attr),
        SimpleSelector::PseudoClass(pseudo) => matches_pseudo(tree, node, pseudo),
    }
}

fn matches_attribute(element: &wisp_dom::ElementData, attr: &AttributeSelector) -> bool {
    let Some(value) = element.attrs.get(&attr.name) else {
        return false;
    };
    match &attr.op {
        AttributeMatch::Exists => true,
        AttributeMatch::Equals(v) => value == v,
        AttributeMatch::Includes(v) => value.split_ascii_whitespace().any(|tok| tok == v),
        AttributeMatch::DashMatch(v) => value == v || value.starts_with(&format!("{v}-")),
        AttributeMatch::Prefix(v) => value.starts_with(v.as_str()),
        AttributeMatch::Suffix(v) => value.ends_with(v.as_str()),
        AttributeMatch::Substring(v) => value.contains(v.as_str()),
    }
}

fn matches_pseudo(tree: &DomTree, node: NodeId, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::FirstChild => element_index(tree, node) == Some(1),
        PseudoClass::LastChild => {
            let Some(parent) = tree.parent(node) else { return false };
            element_siblings(tree, parent).last() == Some(&node)
        }
        PseudoClass::NthChild(nth) => element_index(tree, node).is_some_and(|i| nth.matches(i as i32)),
        PseudoClass::Not(compounds) => !compounds.iter().any(|c| matches_compound(tree, node, c)),
    }
}

fn element_siblings(tree: &DomTree, parent: NodeId) -> Vec<NodeId> {
    tree.children(parent)
        .iter()
        .copied()
        .filter(|&c| tree.get(c).is_some_and(Node::is_element))
        .collect()
}

fn element_index(tree: &DomTree, node: NodeId) -> Option<usize> {
    let parent = tree.parent(node)?;
    element_siblings(tree, parent).iter().position(|&c| c == node).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "id", "main");
        tree.set_attribute(div, "class", "box highlighted");
        let p = tree.create_element(div, "p");
        let span = tree.create_element(p, "span");
        (tree, div, p, span)
    }

    #[test]
    fn matches_type_selector() {
        let (tree, div, ..) = build();
        let group = SelectorGroup::parse("div");
        assert!(group.matches(&tree, div));
    }

    #[test]
    fn matches_id_and_class() {
        let (tree, div, ..) = build();
        assert!(SelectorGroup::parse("#main").matches(&tree, div));
        assert!(SelectorGroup::parse(".highlighted").matches(&tree, div));
        assert!(!SelectorGroup::parse(".missing").matches(&tree, div));
    }

    #[test]
    fn matches_descendant_and_child_combinators() {
        let (tree, _div, p, span) = build();
        assert!(SelectorGroup::parse("div span").matches(&tree, span));
        assert!(!SelectorGroup::parse("div > span").matches(&tree, span));
        assert!(SelectorGroup::parse("div > p").matches(&tree, p));
    }

    #[test]
    fn matches_adjacent_and_general_sibling() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = tree.create_element(root, "a");
        let b = tree.create_element(root, "b");
        let c = tree.create_element(root, "c");
        let _ = a;
        assert!(SelectorGroup::parse("a + b").matches(&tree, b));
        assert!(!SelectorGroup::parse("a + c").matches(&tree, c));
        assert!(SelectorGroup::parse("a ~ c").matches(&tree, c));
    }

    #[test]
    fn matches_attribute_selectors() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = tree.create_element(root, "a");
        tree.set_attribute(a, "href", "https://example.com/page");
        assert!(SelectorGroup::parse("[href]").matches(&tree, a));
        assert!(SelectorGroup::parse("[href^=\"https\"]").matches(&tree, a));
        assert!(SelectorGroup::parse("[href$=\"page\"]").matches(&tree, a));
        assert!(SelectorGroup::parse("[href*=\"example\"]").matches(&tree, a));
        assert!(!SelectorGroup::parse("[href$=\"zzz\"]").matches(&tree, a));
    }

    #[test]
    fn matches_nth_child_odd_even_and_formula() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let items: Vec<_> = (0..4).map(|_| tree.create_element(root, "li")).collect();
        assert!(SelectorGroup::parse("li:nth-child(odd)").matches(&tree, items[0]));
        assert!(!SelectorGroup::parse("li:nth-child(odd)").matches(&tree, items[1]));
        assert!(SelectorGroup::parse("li:nth-child(2n+1)").matches(&tree, items[2]));
        assert!(SelectorGroup::parse("li:first-child").matches(&tree, items[0]));
        assert!(SelectorGroup::parse("li:last-child").matches(&tree, items[3]));
    }

    #[test]
    fn not_excludes_matching_compound() {
        let (tree, div, ..) = build();
        assert!(!SelectorGroup::parse("div:not(.highlighted)").matches(&tree, div));
        assert!(SelectorGroup::parse("div:not(.missing)").matches(&tree, div));
    }

    #[test]
    fn comma_separated_group_matches_if_any_selector_matches() {
        let (tree, div, p, _span) = build();
        let group = SelectorGroup::parse("span, p, h1");
        assert!(group.matches(&tree, p));
        assert!(!group.matches(&tree, div));
    }

    #[test]
    fn universal_selector_matches_any_element() {
        let (tree, div, ..) = build();
        assert!(SelectorGroup::parse("*").matches(&tree, div));
    }
}
