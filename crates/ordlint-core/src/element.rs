//! The normalized element record produced by extractors

use serde::{Deserialize, Serialize};

/// Opaque, position-stable identifier for an element within one evaluation.
///
/// Extractors assign ids densely in source order, so an element's id doubles
/// as its index into the element list handed to the engine. Ids are never
/// shared across evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The syntactic kind of an element. Closed set; anything an extractor
/// cannot name maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selector {
    Property,
    Method,
    Accessor,
    Constructor,
    IndexSignature,
    StaticBlock,
    Attribute,
    Spread,
    Unknown,
}

impl Selector {
    pub fn as_str(self) -> &'static str {
        match self {
            Selector::Property => "property",
            Selector::Method => "method",
            Selector::Accessor => "accessor",
            Selector::Constructor => "constructor",
            Selector::IndexSignature => "index-signature",
            Selector::StaticBlock => "static-block",
            Selector::Attribute => "attribute",
            Selector::Spread => "spread",
            Selector::Unknown => "unknown",
        }
    }

    /// Selectors this one also answers to during classification, most
    /// specific first. An accessor is still a property for grouping
    /// purposes, a constructor is still a method.
    pub fn specificity_chain(self) -> &'static [Selector] {
        match self {
            Selector::Accessor => &[Selector::Accessor, Selector::Property],
            Selector::Constructor => &[Selector::Constructor, Selector::Method],
            Selector::IndexSignature => &[Selector::IndexSignature, Selector::Property],
            Selector::Property => &[Selector::Property],
            Selector::Method => &[Selector::Method],
            Selector::StaticBlock => &[Selector::StaticBlock],
            Selector::Attribute => &[Selector::Attribute],
            Selector::Spread => &[Selector::Spread],
            Selector::Unknown => &[Selector::Unknown],
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single modifier carried by an element.
///
/// The discriminant order is not meaningful; classification priority lives
/// in the engine's ranked table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Static,
    Declare,
    Abstract,
    Override,
    Public,
    Protected,
    Private,
    Readonly,
    Optional,
    Async,
    Decorated,
    FunctionValued,
    Shorthand,
    Multiline,
}

impl Modifier {
    pub const ALL: [Modifier; 14] = [
        Modifier::Static,
        Modifier::Declare,
        Modifier::Abstract,
        Modifier::Override,
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Readonly,
        Modifier::Optional,
        Modifier::Async,
        Modifier::Decorated,
        Modifier::FunctionValued,
        Modifier::Shorthand,
        Modifier::Multiline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Static => "static",
            Modifier::Declare => "declare",
            Modifier::Abstract => "abstract",
            Modifier::Override => "override",
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Readonly => "readonly",
            Modifier::Optional => "optional",
            Modifier::Async => "async",
            Modifier::Decorated => "decorated",
            Modifier::FunctionValued => "function-valued",
            Modifier::Shorthand => "shorthand",
            Modifier::Multiline => "multiline",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compact modifier set backed by a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierSet(u16);

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn contains_all(self, modifiers: &[Modifier]) -> bool {
        modifiers.iter().all(|m| self.contains(*m))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate present modifiers in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = ModifierSet::new();
        for m in iter {
            set.insert(m);
        }
        set
    }
}

/// One orderable structural unit within a construct.
///
/// All fields are pre-computed by the extractor; the engine never touches
/// source text beyond what is carried here.
#[derive(Debug, Clone)]
pub struct Element {
    /// Position-stable id; equals the element's index in the evaluated list.
    pub id: ElementId,
    /// Declared name, as written (private names keep their `#` prefix).
    pub name: String,
    /// Raw rendered text of the whole element, used for line-length
    /// comparison and fix re-emission.
    pub text: String,
    /// Rendered value/initializer expression, if any. Dependency scanning
    /// and value patterns read this.
    pub value: Option<String>,
    pub selector: Selector,
    pub modifiers: ModifierSet,
    /// Names of decorators attached to the element, without `@`.
    pub decorators: Vec<String>,
    /// Position among siblings in source order.
    pub source_index: usize,
    /// Leading comments attached to the element, one entry per comment.
    pub comments: Vec<String>,
    /// Blank lines between this element and the previous sibling in source.
    pub blank_lines_before: usize,
    /// Excluded from reordering; acts as a fixed anchor splitting its
    /// neighborhood into independent runs.
    pub pinned: bool,
    /// Unrecognized extraction output. Behaves like a pinned anchor but is
    /// also skipped for classification and dependency purposes and never
    /// produces a violation.
    pub opaque: bool,
}

impl Element {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ElementId::new(id),
            text: name.clone(),
            name,
            value: None,
            selector: Selector::Property,
            modifiers: ModifierSet::new(),
            decorators: Vec::new(),
            source_index: id as usize,
            comments: Vec::new(),
            blank_lines_before: 0,
            pinned: false,
            opaque: false,
        }
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_modifiers<I: IntoIterator<Item = Modifier>>(mut self, modifiers: I) -> Self {
        for m in modifiers {
            self.modifiers.insert(m);
        }
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_decorator(mut self, name: impl Into<String>) -> Self {
        self.decorators.push(name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    pub fn with_blank_lines_before(mut self, count: usize) -> Self {
        self.blank_lines_before = count;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifier::Static)
    }

    /// Anchors never move and never participate in comparisons.
    pub fn is_anchor(&self) -> bool {
        self.pinned || self.opaque
    }
}
