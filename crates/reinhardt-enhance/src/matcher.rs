//! Decides whether the next existing node can stand in for a template item.

use reinhardt_enhance_dom::{Document, NodeId, NodeKind};

use crate::cursor::Cursor;

/// What a template item needs from the existing DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation<'a> {
	/// An element with this tag name.
	Element(&'a str),
	/// A text node.
	Text,
}

/// The outcome of matching one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
	/// The node was claimed and must be reused.
	Adopted(NodeId),
	/// Nothing suitable; the caller creates a node and inserts it with
	/// [`Cursor::insert`].
	Fresh,
}

/// Matches an expectation against the next node of the cursor.
///
/// Kind and tag name (case-insensitive) are the whole predicate. When an
/// element is expected, comments and whitespace-only text nodes in front of
/// it are passed over, but only once the element is found. A mismatch never
/// advances the cursor.
pub fn match_item(doc: &Document, expectation: Expectation<'_>, cursor: &mut Cursor) -> MatchResult {
	let mut skipped = 0;
	let mut found = false;
	for node in cursor.upcoming() {
		if is_acceptable(doc, expectation, node) {
			found = true;
			break;
		}
		if matches!(expectation, Expectation::Element(_)) && is_ignorable(doc, node) {
			skipped += 1;
			continue;
		}
		tracing::trace!(node = %node, ?expectation, "Existing node does not match");
		break;
	}
	if !found {
		return MatchResult::Fresh;
	}
	for _ in 0..skipped {
		cursor.pass();
	}
	match cursor.claim() {
		Some(node) => MatchResult::Adopted(node),
		None => MatchResult::Fresh,
	}
}

fn is_acceptable(doc: &Document, expectation: Expectation<'_>, node: NodeId) -> bool {
	match (expectation, doc.kind(node)) {
		(Expectation::Element(tag), NodeKind::Element) => doc
			.tag_name(node)
			.is_some_and(|actual| actual.eq_ignore_ascii_case(tag)),
		(Expectation::Text, NodeKind::Text) => true,
		_ => false,
	}
}

fn is_ignorable(doc: &Document, node: NodeId) -> bool {
	match doc.kind(node) {
		NodeKind::Comment => true,
		NodeKind::Text => doc
			.text(node)
			.is_some_and(|text| text.chars().all(char::is_whitespace)),
		NodeKind::Element | NodeKind::Fragment => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn cursor_over(html: &str) -> (Document, NodeId, Cursor) {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(root, html).unwrap();
		let cursor = Cursor::over_children(&doc, root);
		(doc, root, cursor)
	}

	#[rstest]
	#[case("<p></p>", Expectation::Element("p"), true)]
	#[case("<P></P>", Expectation::Element("p"), true)]
	#[case("<p></p>", Expectation::Element("P"), true)]
	#[case("<div></div>", Expectation::Element("p"), false)]
	#[case("text", Expectation::Element("p"), false)]
	#[case("text", Expectation::Text, true)]
	#[case("<p></p>", Expectation::Text, false)]
	#[case(" <!-- c --> <p></p>", Expectation::Element("p"), true)]
	fn test_match_predicate(
		#[case] html: &str,
		#[case] expectation: Expectation<'static>,
		#[case] adopted: bool,
	) {
		let (doc, _, mut cursor) = cursor_over(html);
		let result = match_item(&doc, expectation, &mut cursor);
		assert_eq!(matches!(result, MatchResult::Adopted(_)), adopted);
	}

	#[rstest]
	fn test_mismatch_does_not_advance() {
		let (doc, root, mut cursor) = cursor_over("<div></div>");
		let div = doc.children(root)[0];

		assert_eq!(match_item(&doc, Expectation::Element("p"), &mut cursor), MatchResult::Fresh);
		assert_eq!(cursor.peek(), Some(div));
		assert_eq!(
			match_item(&doc, Expectation::Element("div"), &mut cursor),
			MatchResult::Adopted(div)
		);
	}

	#[rstest]
	fn test_whitespace_is_kept_for_text_expectations() {
		let (doc, root, mut cursor) = cursor_over(" ");
		let space = doc.children(root)[0];
		assert_eq!(
			match_item(&doc, Expectation::Text, &mut cursor),
			MatchResult::Adopted(space)
		);
	}

	#[rstest]
	fn test_whitespace_stays_pending_when_no_element_follows() {
		let (doc, root, mut cursor) = cursor_over(" <p></p>");
		let space = doc.children(root)[0];
		let p = doc.children(root)[1];

		assert_eq!(
			match_item(&doc, Expectation::Element("span"), &mut cursor),
			MatchResult::Fresh
		);
		assert_eq!(cursor.peek(), Some(space));
		assert_eq!(
			match_item(&doc, Expectation::Text, &mut cursor),
			MatchResult::Adopted(space)
		);
		assert_eq!(
			match_item(&doc, Expectation::Element("p"), &mut cursor),
			MatchResult::Adopted(p)
		);
	}

	#[rstest]
	fn test_skipped_whitespace_becomes_surplus_once_the_element_is_claimed() {
		let (mut doc, root, mut cursor) = cursor_over(" <!--c--><p></p>");
		let p = doc.children(root)[2];

		assert_eq!(
			match_item(&doc, Expectation::Element("p"), &mut cursor),
			MatchResult::Adopted(p)
		);
		assert!(cursor.is_exhausted());
		assert_eq!(cursor.finish(&mut doc), 2);
		assert_eq!(doc.children(root), &[p]);
	}
}
