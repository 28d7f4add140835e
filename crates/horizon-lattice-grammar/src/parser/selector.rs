//! Selector list parsing using the `cssparser` crate.

use cssparser::{
    BasicParseErrorKind, ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, ToCss,
    Token,
};

use crate::selector::{
    AttributeOperator, AttributeSelector, Combinator, PseudoClass, Selector, SelectorPart,
    TypeSelector,
};
use crate::{Error, Result};

type SelectorResult<'i, T> = std::result::Result<T, CssParseError<'i, String>>;

/// Parse a comma-separated selector list.
///
/// Each item is returned with its source text, trimmed. The whole list
/// fails if any item is malformed.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::parser::parse_selector_list;
///
/// let list = parse_selector_list("ul > li.item, a[href^='http']:hover").unwrap();
/// assert_eq!(list.len(), 2);
/// assert_eq!(list[0].0, "ul > li.item");
/// assert_eq!(list[1].1.to_string(), "a[href^=\"http\"]:hover");
/// ```
pub fn parse_selector_list(text: &str) -> Result<Vec<(String, Selector)>> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parser
        .parse_comma_separated(|p| {
            let start = p.position();
            let selector = parse_selector(p)?;
            Ok((strip_comments(p.slice_from(start)).trim().to_string(), selector))
        })
        .map_err(|e| Error::invalid_selector(text.trim(), describe(e)))
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("/*") {
        out.push_str(&rest[..open]);
        match rest[open + 2..].find("*/") {
            Some(close) => rest = &rest[open + 2 + close + 2..],
            None => rest = "",
        }
    }
    out.push_str(rest);
    out
}

fn describe(error: CssParseError<'_, String>) -> String {
    match error.kind {
        ParseErrorKind::Custom(message) => message,
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("Unexpected '{}'", token.to_css_string())
        }
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "Unexpected end of selector".to_string()
        }
        ParseErrorKind::Basic(kind) => format!("{kind:?}"),
    }
}

/// Parse one complex selector: compound selectors joined by combinators.
fn parse_selector<'i>(parser: &mut Parser<'i, '_>) -> SelectorResult<'i, Selector> {
    let mut selector = Selector::default();
    let mut current = SelectorPart::default();
    let mut pending: Option<Combinator> = None;

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        let combinator = match token {
            Token::WhiteSpace(_) => {
                if !current.is_empty() && pending.is_none() {
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }
            Token::Delim('>') => Some(Combinator::Child),
            Token::Delim('+') => Some(Combinator::AdjacentSibling),
            Token::Delim('~') => Some(Combinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if current.is_empty() {
                return Err(parser.new_custom_error(format!(
                    "Combinator '{}' without a left-hand selector",
                    combinator_text(combinator)
                )));
            }
            if matches!(pending, Some(c) if c != Combinator::Descendant) {
                return Err(parser.new_custom_error("Consecutive combinators".to_string()));
            }
            pending = Some(combinator);
            continue;
        }

        // A simple selector after a combinator starts the next compound.
        if let Some(combinator) = pending.take() {
            selector.parts.push(std::mem::take(&mut current));
            selector.combinators.push(combinator);
        }

        match token {
            Token::Ident(name) => {
                if !current.is_empty() {
                    return Err(parser.new_custom_error(format!(
                        "Type selector '{name}' must come first in a compound selector"
                    )));
                }
                current.type_selector = Some(TypeSelector::Type(name.to_string()));
            }

            Token::Delim('*') => {
                if !current.is_empty() {
                    return Err(parser.new_custom_error(
                        "Universal selector must come first in a compound selector".to_string(),
                    ));
                }
                current.type_selector = Some(TypeSelector::Universal);
            }

            Token::Delim('.') => match parser.next_including_whitespace()?.clone() {
                Token::Ident(class) => current.classes.push(class.to_string()),
                _ => return Err(parser.new_custom_error("Expected class name after '.'".to_string())),
            },

            Token::IDHash(id) => {
                if current.id.is_some() {
                    return Err(parser.new_custom_error(format!("Second id '#{id}'")));
                }
                current.id = Some(id.to_string());
            }

            Token::SquareBracketBlock => {
                let attribute = parser.parse_nested_block(|p| parse_attribute(p))?;
                current.attributes.push(attribute);
            }

            Token::Colon => parse_pseudo(parser, &mut current)?,

            other => {
                return Err(parser.new_custom_error(format!(
                    "Unexpected '{}' in selector",
                    other.to_css_string()
                )));
            }
        }
    }

    if let Some(combinator) = pending {
        if combinator != Combinator::Descendant {
            return Err(parser.new_custom_error(format!(
                "Dangling combinator '{}'",
                combinator_text(combinator)
            )));
        }
    }
    if current.is_empty() {
        return Err(parser.new_custom_error("Empty selector".to_string()));
    }
    selector.parts.push(current);
    Ok(selector)
}

/// Parse what follows a `:`: a pseudo-class, a functional pseudo-class,
/// or (after `::`) a pseudo-element.
fn parse_pseudo<'i>(parser: &mut Parser<'i, '_>, part: &mut SelectorPart) -> SelectorResult<'i, ()> {
    let token = parser.next_including_whitespace()?.clone();
    match token {
        Token::Ident(name) => {
            part.pseudo_classes.push(PseudoClass::new(name.to_string()));
        }
        Token::Function(name) => {
            let argument = parser.parse_nested_block(|p| {
                let start = p.position();
                while p.next().is_ok() {}
                Ok::<_, CssParseError<'i, String>>(p.slice_from(start).trim().to_string())
            })?;
            part.pseudo_classes
                .push(PseudoClass::function(name.to_string(), argument));
        }
        Token::Colon => {
            let name = match parser.next_including_whitespace()?.clone() {
                Token::Ident(name) => name.to_string(),
                _ => {
                    return Err(
                        parser.new_custom_error("Expected pseudo-element name after '::'".to_string())
                    );
                }
            };
            if part.pseudo_element.is_some() {
                return Err(parser.new_custom_error(format!("Second pseudo-element '::{name}'")));
            }
            part.pseudo_element = Some(name);
        }
        _ => {
            return Err(parser.new_custom_error("Expected pseudo-class name after ':'".to_string()));
        }
    }
    Ok(())
}

/// Parse the inside of `[...]`.
fn parse_attribute<'i>(parser: &mut Parser<'i, '_>) -> SelectorResult<'i, AttributeSelector> {
    let name = parser.expect_ident()?.to_string();
    if parser.is_exhausted() {
        return Ok(AttributeSelector::exists(name));
    }

    let operator = match parser.next()?.clone() {
        Token::Delim('=') => AttributeOperator::Equals,
        Token::IncludeMatch => AttributeOperator::Includes,
        Token::DashMatch => AttributeOperator::DashMatch,
        Token::PrefixMatch => AttributeOperator::Prefix,
        Token::SuffixMatch => AttributeOperator::Suffix,
        Token::SubstringMatch => AttributeOperator::Substring,
        _ => {
            return Err(parser.new_custom_error(format!(
                "Expected an attribute operator after '{name}'"
            )));
        }
    };
    let value = parser.expect_ident_or_string()?.to_string();
    Ok(AttributeSelector::compare(name, operator, value))
}

fn combinator_text(combinator: Combinator) -> &'static str {
    match combinator {
        Combinator::Descendant => " ",
        Combinator::Child => ">",
        Combinator::AdjacentSibling => "+",
        Combinator::GeneralSibling => "~",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Selector {
        let mut list = parse_selector_list(text).unwrap();
        assert_eq!(list.len(), 1);
        list.remove(0).1
    }

    #[test]
    fn parse_compound_selector() {
        let selector = single("a.cls#main.other");
        assert_eq!(selector.parts.len(), 1);
        let part = &selector.parts[0];
        assert_eq!(part.type_selector, Some(TypeSelector::Type("a".into())));
        assert_eq!(part.id.as_deref(), Some("main"));
        assert_eq!(part.classes, vec!["cls".to_string(), "other".to_string()]);
    }

    #[test]
    fn parse_combinators() {
        let selector = single("div  p > span + em ~ b");
        assert_eq!(
            selector.combinators,
            vec![
                Combinator::Descendant,
                Combinator::Child,
                Combinator::AdjacentSibling,
                Combinator::GeneralSibling,
            ]
        );
        assert_eq!(selector.to_string(), "div p > span + em ~ b");

        let tight = single("ul>li");
        assert_eq!(tight.combinators, vec![Combinator::Child]);
    }

    #[test]
    fn parse_attributes() {
        let selector = single("input[type=text][disabled][lang|='en']");
        let attributes = &selector.parts[0].attributes;
        assert_eq!(attributes.len(), 3);
        assert_eq!(
            attributes[0],
            AttributeSelector::compare("type", AttributeOperator::Equals, "text")
        );
        assert_eq!(attributes[1], AttributeSelector::exists("disabled"));
        assert_eq!(
            attributes[2],
            AttributeSelector::compare("lang", AttributeOperator::DashMatch, "en")
        );
    }

    #[test]
    fn parse_pseudo_classes_and_elements() {
        let selector = single("li:nth-child(2n + 1):hover::before");
        let part = &selector.parts[0];
        assert_eq!(
            part.pseudo_classes,
            vec![
                PseudoClass::function("nth-child", "2n + 1"),
                PseudoClass::new("hover"),
            ]
        );
        assert_eq!(part.pseudo_element.as_deref(), Some("before"));

        let bare = single(":focus");
        assert!(bare.parts[0].type_selector.is_none());
    }

    #[test]
    fn list_keeps_item_text() {
        let list = parse_selector_list(" h1 , h2.title ").unwrap();
        let texts: Vec<_> = list.iter().map(|(text, _)| text.as_str()).collect();
        assert_eq!(texts, vec!["h1", "h2.title"]);
    }

    #[test]
    fn comments_are_not_part_of_the_text() {
        let list = parse_selector_list("ul /* menu */ > li").unwrap();
        assert_eq!(list[0].0, "ul  > li");
        assert_eq!(list[0].1.combinators, vec![Combinator::Child]);
    }

    #[test]
    fn malformed_selectors() {
        for text in ["", "a,", "a >", "> a", "a > > b", "a..b", "a[=x]", "a b:", "a{"] {
            let result = parse_selector_list(text);
            assert!(
                matches!(result, Err(Error::InvalidSelector { .. })),
                "{text:?} should be rejected"
            );
        }
    }
}
