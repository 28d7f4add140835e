//! Selector type definitions.

use std::fmt;

use cssparser::ToCss;

/// A complex selector such as `div.note > a[href]:hover`.
///
/// Parts are stored in source order; `combinators[i]` joins `parts[i]` to
/// `parts[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
    /// Combinators between parts (length = parts.len() - 1).
    pub combinators: Vec<Combinator>,
}

impl Selector {
    /// Create a simple type selector.
    pub fn type_selector(element: impl Into<String>) -> Self {
        Self {
            parts: vec![SelectorPart::type_only(element)],
            combinators: vec![],
        }
    }

    /// Create a universal selector (`*`).
    pub fn universal() -> Self {
        Self {
            parts: vec![SelectorPart::universal()],
            combinators: vec![],
        }
    }

    /// Create a class selector.
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            parts: vec![SelectorPart::class_only(class_name)],
            combinators: vec![],
        }
    }

    /// Create an ID selector.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            parts: vec![SelectorPart::id_only(id)],
            combinators: vec![],
        }
    }

    /// Append `part` joined by `combinator`.
    pub fn then(mut self, combinator: Combinator, part: SelectorPart) -> Self {
        if !self.parts.is_empty() {
            self.combinators.push(combinator);
        }
        self.parts.push(part);
        self
    }

    /// Add a descendant selector part.
    pub fn descendant(self, part: SelectorPart) -> Self {
        self.then(Combinator::Descendant, part)
    }

    /// Add a child selector part.
    pub fn child(self, part: SelectorPart) -> Self {
        self.then(Combinator::Child, part)
    }

    /// Get the rightmost (subject) selector part.
    pub fn subject(&self) -> Option<&SelectorPart> {
        self.parts.last()
    }

    /// Criteria groups for an element matcher, innermost first.
    ///
    /// Each part is paired with the combinator that relates it to the
    /// next group in the iteration (its left neighbour in source text);
    /// the outermost group has none.
    ///
    /// ```
    /// use horizon_lattice_grammar::selector::{Combinator, Selector, SelectorPart};
    ///
    /// let selector = Selector::type_selector("ul").child(SelectorPart::type_only("li"));
    /// let groups: Vec<_> = selector.criteria().map(|(p, c)| (p.to_string(), c)).collect();
    /// assert_eq!(
    ///     groups,
    ///     vec![("li".to_string(), Some(Combinator::Child)), ("ul".to_string(), None)]
    /// );
    /// ```
    pub fn criteria(&self) -> impl Iterator<Item = (&SelectorPart, Option<Combinator>)> {
        self.parts.iter().enumerate().rev().map(|(i, part)| {
            let combinator = i.checked_sub(1).and_then(|j| self.combinators.get(j)).copied();
            (part, combinator)
        })
    }
}

impl ToCss for Selector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                match &self.combinators[i - 1] {
                    Combinator::Descendant => dest.write_str(" ")?,
                    Combinator::Child => dest.write_str(" > ")?,
                    Combinator::AdjacentSibling => dest.write_str(" + ")?,
                    Combinator::GeneralSibling => dest.write_str(" ~ ")?,
                }
            }
            part.to_css(dest)?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// A compound selector (e.g., `a.external[href]:hover`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorPart {
    /// Element name or universal.
    pub type_selector: Option<TypeSelector>,
    /// ID selector (`#id`).
    pub id: Option<String>,
    /// Class selectors (`.class`).
    pub classes: Vec<String>,
    /// Attribute selectors (`[attr]`, `[attr=value]`).
    pub attributes: Vec<AttributeSelector>,
    /// Pseudo-class selectors (`:hover`, `:not(...)`).
    pub pseudo_classes: Vec<PseudoClass>,
    /// Pseudo-element (`::before`).
    pub pseudo_element: Option<String>,
}

impl SelectorPart {
    /// Create a new empty selector part.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a type-only selector.
    pub fn type_only(element: impl Into<String>) -> Self {
        Self {
            type_selector: Some(TypeSelector::Type(element.into())),
            ..Default::default()
        }
    }

    /// Create a universal selector part.
    pub fn universal() -> Self {
        Self {
            type_selector: Some(TypeSelector::Universal),
            ..Default::default()
        }
    }

    /// Create a class-only selector.
    pub fn class_only(class_name: impl Into<String>) -> Self {
        Self {
            classes: vec![class_name.into()],
            ..Default::default()
        }
    }

    /// Create an ID-only selector.
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Add a type selector.
    pub fn with_type(mut self, element: impl Into<String>) -> Self {
        self.type_selector = Some(TypeSelector::Type(element.into()));
        self
    }

    /// Add an ID selector.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class selector.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute selector.
    pub fn with_attribute(mut self, attribute: AttributeSelector) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a pseudo-class selector.
    pub fn with_pseudo(mut self, pseudo: PseudoClass) -> Self {
        self.pseudo_classes.push(pseudo);
        self
    }

    /// Whether no criteria have been added.
    pub fn is_empty(&self) -> bool {
        self.type_selector.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudo_classes.is_empty()
            && self.pseudo_element.is_none()
    }

    /// Check if this is a universal selector with no other constraints.
    pub fn is_universal_only(&self) -> bool {
        matches!(self.type_selector, Some(TypeSelector::Universal))
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudo_classes.is_empty()
            && self.pseudo_element.is_none()
    }
}

impl ToCss for SelectorPart {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match &self.type_selector {
            Some(TypeSelector::Universal) => dest.write_str("*")?,
            Some(TypeSelector::Type(t)) => dest.write_str(t)?,
            None => {}
        }
        if let Some(id) = &self.id {
            write!(dest, "#{id}")?;
        }
        for class in &self.classes {
            write!(dest, ".{class}")?;
        }
        for attribute in &self.attributes {
            attribute.to_css(dest)?;
        }
        for pseudo in &self.pseudo_classes {
            write!(dest, ":{pseudo}")?;
        }
        if let Some(element) = &self.pseudo_element {
            write!(dest, "::{element}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// Type selector - matches the element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSelector {
    /// Universal selector (`*`) - matches any element.
    Universal,
    /// Named element (e.g., `div`).
    Type(String),
}

/// Combinator between selector parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (space): matches any descendant.
    Descendant,
    /// Child combinator (`>`): matches direct child only.
    Child,
    /// Adjacent sibling (`+`): the element is immediately preceded by the other.
    AdjacentSibling,
    /// General sibling (`~`): the element is preceded by the other.
    GeneralSibling,
}

/// How an attribute value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `=`
    Equals,
    /// `~=`: one of a whitespace-separated list.
    Includes,
    /// `|=`: equal, or followed by `-`.
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl AttributeOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// `[name]` or `[name op value]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    pub name: String,
    /// Operator and value; `None` for a presence test.
    pub value: Option<(AttributeOperator, String)>,
}

impl AttributeSelector {
    /// Matches when the attribute is present.
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Matches when the attribute compares to `value` by `operator`.
    pub fn compare(name: impl Into<String>, operator: AttributeOperator, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some((operator, value.into())),
        }
    }
}

impl ToCss for AttributeSelector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        write!(dest, "[{}", self.name)?;
        if let Some((operator, value)) = &self.value {
            dest.write_str(operator.as_str())?;
            cssparser::serialize_string(value, dest)?;
        }
        dest.write_str("]")
    }
}

/// A pseudo-class with an optional raw argument (`:hover`, `:nth-child(2n)`).
///
/// Pseudo-classes are kept by name; interpreting them is up to the element
/// matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PseudoClass {
    pub name: String,
    /// Text between the parentheses of a functional pseudo-class.
    pub argument: Option<String>,
}

impl PseudoClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    pub fn function(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: Some(argument.into()),
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "{}({})", self.name, argument),
            None => f.write_str(&self.name),
        }
    }
}
