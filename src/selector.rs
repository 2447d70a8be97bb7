//! Simple CSS selector subset used by [`crate::dom::MemoryDocument`] queries.
//! The browser backend leaves selectors to the engine.
//!
//! Supported: selector lists (`a, b`; commas inside brackets or quotes do not
//! split) of compound selectors built from an
//! optional tag name or `*`, `#id`, `.class`, `[attr]` and `[attr=value]`
//! (value bare, single- or double-quoted). Combinators and pseudo-classes are
//! rejected with [`SelectorError::Unsupported`].
//!
//! Tag and attribute names compare case-insensitively; ids, classes, and
//! attribute values compare exactly.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::SelectorError;

/// Read-only view of an element, as needed for matching.
pub trait Matchable {
    /// Lower-case tag name.
    fn tag_name(&self) -> &str;
    /// Attribute value by lower-case name.
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// A parsed selector list. Matches when any of its compounds matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(String),
    Class(String),
    Has(String),
    Equals(String, String),
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for empty, malformed, or unsupported input.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut compounds = Vec::new();
        for item in split_list(input)? {
            compounds.push(parse_compound(item.trim(), input)?);
        }
        Ok(Self { compounds })
    }

    /// Whether `element` matches any compound of this selector.
    #[must_use]
    pub fn matches<M: Matchable + ?Sized>(&self, element: &M) -> bool {
        self.compounds.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn matches<M: Matchable + ?Sized>(&self, element: &M) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.conditions.iter().all(|cond| match cond {
            Condition::Id(id) => element.attribute("id") == Some(id.as_str()),
            Condition::Class(class) => element
                .attribute("class")
                .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class)),
            Condition::Has(name) => element.attribute(name).is_some(),
            Condition::Equals(name, value) => element.attribute(name) == Some(value.as_str()),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn malformed(selector: &str, reason: &'static str) -> SelectorError {
    SelectorError::Malformed { selector: selector.to_owned(), reason }
}

fn unsupported(selector: &str, reason: &'static str) -> SelectorError {
    SelectorError::Unsupported { selector: selector.to_owned(), reason }
}

/// Split a selector list at commas outside `[...]` and outside quotes.
fn split_list(input: &str) -> Result<Vec<&str>, SelectorError> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                items.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(malformed(input, "unterminated quoted value"));
    }
    items.push(&input[start..]);
    Ok(items)
}

fn read_ident(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut out = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

fn parse_compound(item: &str, whole: &str) -> Result<Compound, SelectorError> {
    if item.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut chars = item.char_indices().peekable();
    let mut tag = None;
    let mut conditions = Vec::new();

    match chars.peek() {
        Some(&(_, '*')) => {
            chars.next();
        }
        Some(&(_, c)) if is_ident_char(c) => {
            tag = Some(read_ident(&mut chars).to_ascii_lowercase());
        }
        _ => {}
    }

    while let Some((_, c)) = chars.next() {
        match c {
            '#' => {
                let id = read_ident(&mut chars);
                if id.is_empty() {
                    return Err(malformed(whole, "empty id"));
                }
                conditions.push(Condition::Id(id));
            }
            '.' => {
                let class = read_ident(&mut chars);
                if class.is_empty() {
                    return Err(malformed(whole, "empty class"));
                }
                conditions.push(Condition::Class(class));
            }
            '[' => conditions.push(parse_attribute(&mut chars, whole)?),
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(unsupported(whole, "combinators are not supported"));
            }
            ':' => return Err(unsupported(whole, "pseudo-classes are not supported")),
            _ => return Err(malformed(whole, "unexpected character")),
        }
    }

    Ok(Compound { tag, conditions })
}

fn skip_spaces(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
}

fn parse_attribute(chars: &mut Peekable<CharIndices<'_>>, whole: &str) -> Result<Condition, SelectorError> {
    skip_spaces(chars);
    let name = read_ident(chars).to_ascii_lowercase();
    if name.is_empty() {
        return Err(malformed(whole, "empty attribute name"));
    }
    skip_spaces(chars);

    match chars.next() {
        Some((_, ']')) => Ok(Condition::Has(name)),
        Some((_, '=')) => {
            skip_spaces(chars);
            let value = match chars.peek() {
                Some(&(_, quote @ ('"' | '\''))) => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some((_, c)) if c == quote => break,
                            Some((_, c)) => value.push(c),
                            None => return Err(malformed(whole, "unterminated quoted value")),
                        }
                    }
                    value
                }
                _ => read_ident(chars),
            };
            skip_spaces(chars);
            match chars.next() {
                Some((_, ']')) => Ok(Condition::Equals(name, value)),
                _ => Err(malformed(whole, "expected ']' after attribute value")),
            }
        }
        Some((_, '~' | '|' | '^' | '$' | '*')) => {
            Err(unsupported(whole, "only [attr] and [attr=value] are supported"))
        }
        _ => Err(malformed(whole, "unterminated attribute selector")),
    }
}
