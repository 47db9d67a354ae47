//! HTML fragment parser built on nom parser combinators.
//!
//! The grammar covers the markup a server renders for enhancement: elements
//! with quoted, unquoted or valueless attributes, void and self-closing
//! elements, text and comments. Malformed markup is rejected rather than
//! repaired.

use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{tag, take_till, take_till1, take_until, take_while1},
	character::complete::{char, multispace0, multispace1},
	combinator::{map, opt},
	error::{Error, ErrorKind},
	multi::many0,
	sequence::{delimited, preceded},
};

use crate::error::{DomError, DomResult};

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParsedNode {
	Element {
		tag: String,
		attrs: Vec<(String, String)>,
		children: Vec<ParsedNode>,
	},
	Text(String),
	Comment(String),
}

/// Parses a fragment into a list of top-level nodes.
pub(crate) fn parse_fragment(source: &str) -> DomResult<Vec<ParsedNode>> {
	match many0(node).parse(source) {
		Ok(("", nodes)) => Ok(nodes),
		Ok((rest, _)) => Err(parse_error(source, rest, "unexpected markup")),
		Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
			Err(parse_error(source, e.input, "mismatched closing tag"))
		}
		Err(nom::Err::Incomplete(_)) => Err(parse_error(source, "", "unexpected end of input")),
	}
}

fn parse_error(source: &str, rest: &str, message: &str) -> DomError {
	DomError::Parse {
		position: source.len() - rest.len(),
		message: message.to_string(),
	}
}

fn node(input: &str) -> IResult<&str, ParsedNode> {
	alt((comment, element, text)).parse(input)
}

fn comment(input: &str) -> IResult<&str, ParsedNode> {
	map(delimited(tag("<!--"), take_until("-->"), tag("-->")), |body: &str| {
		ParsedNode::Comment(body.to_string())
	})
	.parse(input)
}

fn text(input: &str) -> IResult<&str, ParsedNode> {
	map(take_till1(|c| c == '<'), |raw: &str| {
		ParsedNode::Text(decode_entities(raw))
	})
	.parse(input)
}

fn name(input: &str) -> IResult<&str, &str> {
	take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
		.parse(input)
}

fn attribute(input: &str) -> IResult<&str, (String, String)> {
	let (input, _) = multispace1(input)?;
	let (input, attr_name) = take_while1(|c: char| {
		!c.is_whitespace() && !matches!(c, '"' | '\'' | '>' | '/' | '=' | '<')
	})
	.parse(input)?;
	let (input, value) = opt(preceded(
		(multispace0, char('='), multispace0),
		attribute_value,
	))
	.parse(input)?;
	Ok((
		input,
		(
			attr_name.to_ascii_lowercase(),
			value.map(decode_entities).unwrap_or_default(),
		),
	))
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
	alt((
		delimited(char('"'), take_till(|c| c == '"'), char('"')),
		delimited(char('\''), take_till(|c| c == '\''), char('\'')),
		take_while1(|c: char| !c.is_whitespace() && !matches!(c, '"' | '\'' | '>' | '<' | '`')),
	))
	.parse(input)
}

fn element(input: &str) -> IResult<&str, ParsedNode> {
	let (input, _) = char('<').parse(input)?;
	let (input, open) = name(input)?;
	let (input, attrs) = many0(attribute).parse(input)?;
	let (input, _) = multispace0(input)?;
	let tag_name = open.to_ascii_lowercase();

	if let Ok((input, _)) = tag::<_, _, Error<&str>>("/>").parse(input) {
		return Ok((input, element_node(tag_name, attrs, Vec::new())));
	}
	let (input, _) = char('>').parse(input)?;
	if VOID_ELEMENTS.contains(&tag_name.as_str()) {
		return Ok((input, element_node(tag_name, attrs, Vec::new())));
	}

	let (input, children) = many0(node).parse(input)?;
	let (rest, close) = delimited(tag("</"), name, preceded(multispace0, char('>'))).parse(input)?;
	if !close.eq_ignore_ascii_case(&tag_name) {
		return Err(nom::Err::Failure(Error::new(input, ErrorKind::Tag)));
	}
	Ok((rest, element_node(tag_name, attrs, children)))
}

fn element_node(tag: String, attrs: Vec<(String, String)>, children: Vec<ParsedNode>) -> ParsedNode {
	ParsedNode::Element {
		tag,
		attrs,
		children,
	}
}

/// Decodes the character references servers commonly emit.
pub(crate) fn decode_entities(raw: &str) -> String {
	if !raw.contains('&') {
		return raw.to_string();
	}
	let mut out = String::with_capacity(raw.len());
	let mut rest = raw;
	while let Some(pos) = rest.find('&') {
		out.push_str(&rest[..pos]);
		rest = &rest[pos..];
		let decoded = rest.find(';').and_then(|end| {
			let entity = &rest[1..end];
			let ch = match entity {
				"amp" => Some('&'),
				"lt" => Some('<'),
				"gt" => Some('>'),
				"quot" => Some('"'),
				"apos" | "#39" => Some('\''),
				"nbsp" => Some('\u{a0}'),
				_ => entity
					.strip_prefix("#x")
					.and_then(|hex| u32::from_str_radix(hex, 16).ok())
					.or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
					.and_then(char::from_u32),
			};
			ch.map(|c| (c, end + 1))
		});
		match decoded {
			Some((c, len)) => {
				out.push(c);
				rest = &rest[len..];
			}
			None => {
				out.push('&');
				rest = &rest[1..];
			}
		}
	}
	out.push_str(rest);
	out
}
