//! A small CSS selector subset for node lookups.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! compound selectors, the descendant combinator and selector lists.

use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{tag, take_till, take_while1},
	character::complete::{char, multispace0, multispace1},
	combinator::{map, opt},
	error::{Error, ErrorKind},
	multi::{many0, separated_list1},
	sequence::{delimited, preceded},
};

use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::node::{NodeId, NodeKind};

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
	alternatives: Vec<Complex>,
}

/// Compound selectors joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
	compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
	tag: Option<String>,
	conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
	Id(String),
	Class(String),
	Attr { name: String, value: Option<String> },
}

impl Selector {
	/// Parses a selector list such as `ul li` or `p.note, #main`.
	pub fn parse(source: &str) -> DomResult<Self> {
		let invalid = |message: &str| DomError::InvalidSelector {
			selector: source.to_string(),
			message: message.to_string(),
		};
		match delimited(multispace0, selector_list, multispace0).parse(source) {
			Ok(("", alternatives)) => Ok(Self { alternatives }),
			Ok((rest, _)) => Err(invalid(&format!("unexpected '{}'", rest))),
			Err(_) => Err(invalid("expected a selector")),
		}
	}

	/// Returns whether the node is an element matching any alternative.
	pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
		doc.kind(node) == NodeKind::Element && self.alternatives.iter().any(|c| c.matches(doc, node))
	}
}

impl Complex {
	fn matches(&self, doc: &Document, node: NodeId) -> bool {
		let Some((last, ancestors)) = self.compounds.split_last() else {
			return false;
		};
		if !last.matches(doc, node) {
			return false;
		}
		let mut current = doc.parent(node);
		for compound in ancestors.iter().rev() {
			loop {
				let Some(candidate) = current else {
					return false;
				};
				current = doc.parent(candidate);
				if doc.kind(candidate) == NodeKind::Element && compound.matches(doc, candidate) {
					break;
				}
			}
		}
		true
	}
}

impl Compound {
	fn matches(&self, doc: &Document, node: NodeId) -> bool {
		if self
			.tag
			.as_deref()
			.is_some_and(|tag| doc.tag_name(node) != Some(tag))
		{
			return false;
		}
		self.conditions.iter().all(|condition| match condition {
			Condition::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
			Condition::Class(class) => doc
				.attribute(node, "class")
				.is_some_and(|list| list.split_whitespace().any(|c| c == class)),
			Condition::Attr { name, value } => match (doc.attribute(node, name), value) {
				(Some(actual), Some(expected)) => actual == expected,
				(Some(_), None) => true,
				(None, _) => false,
			},
		})
	}
}

fn ident(input: &str) -> IResult<&str, &str> {
	take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')).parse(input)
}

fn condition(input: &str) -> IResult<&str, Condition> {
	alt((
		map(preceded(char('#'), ident), |id| Condition::Id(id.to_string())),
		map(preceded(char('.'), ident), |class| {
			Condition::Class(class.to_string())
		}),
		attribute_condition,
	))
	.parse(input)
}

fn attribute_condition(input: &str) -> IResult<&str, Condition> {
	let value = alt((
		delimited(char('"'), take_till(|c| c == '"'), char('"')),
		delimited(char('\''), take_till(|c| c == '\''), char('\'')),
		ident,
	));
	map(
		delimited(
			(char('['), multispace0),
			(
				ident,
				opt(preceded((multispace0, char('='), multispace0), value)),
			),
			(multispace0, char(']')),
		),
		|(name, value): (&str, Option<&str>)| Condition::Attr {
			name: name.to_ascii_lowercase(),
			value: value.map(str::to_string),
		},
	)
	.parse(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
	let (rest, tag_name) = opt(alt((tag("*"), ident))).parse(input)?;
	let (rest, conditions) = many0(condition).parse(rest)?;
	if tag_name.is_none() && conditions.is_empty() {
		return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)));
	}
	let tag_name = tag_name
		.filter(|t| *t != "*")
		.map(str::to_ascii_lowercase);
	Ok((
		rest,
		Compound {
			tag: tag_name,
			conditions,
		},
	))
}

fn complex(input: &str) -> IResult<&str, Complex> {
	map(separated_list1(multispace1, compound), |compounds| Complex {
		compounds,
	})
	.parse(input)
}

fn selector_list(input: &str) -> IResult<&str, Vec<Complex>> {
	separated_list1(delimited(multispace0, char(','), multispace0), complex).parse(input)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn fixture() -> (Document, NodeId) {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(
			root,
			r#"<section id="main"><p class="note big">a</p><p data-x="1">b</p></section><p>c</p>"#,
		)
		.unwrap();
		(doc, root)
	}

	#[rstest]
	#[case("p", 3)]
	#[case("*", 4)]
	#[case("#main p", 2)]
	#[case("p.note", 1)]
	#[case(".note.big", 1)]
	#[case("[data-x]", 1)]
	#[case("[data-x='1']", 1)]
	#[case("[data-x=2]", 0)]
	#[case("section, p.note", 2)]
	#[case("div p", 3)]
	fn test_selector_match_counts(#[case] selector: &str, #[case] expected: usize) {
		let (doc, root) = fixture();
		assert_eq!(doc.query_selector_all(root, selector).unwrap().len(), expected);
	}

	#[rstest]
	#[case("")]
	#[case("p >")]
	#[case("[unterminated")]
	fn test_invalid_selectors(#[case] selector: &str) {
		assert!(matches!(
			Selector::parse(selector),
			Err(DomError::InvalidSelector { .. })
		));
	}

	#[rstest]
	fn test_selector_never_matches_text() {
		let mut doc = Document::new();
		let text = doc.create_text("p");
		assert!(!Selector::parse("*").unwrap().matches(&doc, text));
	}
}
