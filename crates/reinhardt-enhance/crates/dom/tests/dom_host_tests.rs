//! DOM host scenario tests
//!
//! Success Criteria:
//! 1. Parsed markup serializes back unchanged and keeps node identities stable
//! 2. Mutations (split, remove, re-insert) are visible to queries and markup
//! 3. Invalid input is rejected without touching the document
//!
//! Test Categories:
//! - Happy Path: 4 tests
//! - Error Path: 3 tests

use reinhardt_enhance_dom::{Document, DomError, NodeId, NodeKind};
use rstest::*;

#[fixture]
fn page() -> (Document, NodeId) {
	let mut doc = Document::new();
	let root = doc.create_element("div");
	doc.set_inner_html(
		root,
		r#"<form id="signup"><input name="email" value="a@b.c"><p class="hint">hello, world!</p></form><!--end-->"#,
	)
	.unwrap();
	(doc, root)
}

// ============================================================================
// Happy Path
// ============================================================================

#[rstest]
fn test_split_keeps_head_identity_and_markup(page: (Document, NodeId)) {
	let (mut doc, root) = page;
	let hint = doc.query_selector(root, "p.hint").unwrap().unwrap();
	let text = doc.children(hint)[0];
	let before = doc.inner_html(root);

	let tail = doc.split_text(text, 7).unwrap();
	let rest = doc.split_text(tail, 5).unwrap();

	assert_eq!(doc.children(hint), &[text, tail, rest]);
	assert_eq!(doc.text(text), Some("hello, "));
	assert_eq!(doc.text(tail), Some("world"));
	assert_eq!(doc.text(rest), Some("!"));
	assert_eq!(doc.inner_html(root), before);
}

#[rstest]
fn test_removed_nodes_leave_queries_until_reinserted(page: (Document, NodeId)) {
	let (mut doc, root) = page;
	let form = doc.query_selector(root, "#signup").unwrap().unwrap();
	let input = doc.query_selector(root, "form input").unwrap().unwrap();

	assert!(doc.remove(input));
	assert!(!doc.remove(input));
	assert_eq!(doc.query_selector(root, "input").unwrap(), None);

	let hint = doc.children(form)[0];
	doc.insert_before(form, input, Some(hint)).unwrap();
	assert_eq!(doc.query_selector(root, "[name=email]").unwrap(), Some(input));
	assert_eq!(doc.value_property(input).unwrap(), "a@b.c");
}

#[rstest]
fn test_fragment_root_holds_parsed_children() {
	let mut doc = Document::new();
	let fragment = doc.create_fragment();
	doc.set_inner_html(fragment, "<li>a</li><li>b</li>").unwrap();

	let items = doc.query_selector_all(fragment, "li").unwrap();
	assert_eq!(items.len(), 2);
	assert!(items.iter().all(|&li| doc.parent(li) == Some(fragment)));
	assert_eq!(doc.kind(fragment), NodeKind::Fragment);
	assert_eq!(doc.text_content(fragment), "ab");
}

#[rstest]
fn test_comment_survives_round_trip(page: (Document, NodeId)) {
	let (doc, root) = page;
	let last = *doc.children(root).last().unwrap();
	assert_eq!(doc.kind(last), NodeKind::Comment);
	assert!(doc.inner_html(root).ends_with("<!--end-->"));
}

// ============================================================================
// Error Path
// ============================================================================

#[rstest]
fn test_malformed_markup_leaves_children_alone(page: (Document, NodeId)) {
	let (mut doc, root) = page;
	let before = doc.children(root).to_vec();

	let err = doc.set_inner_html(root, "<p>unclosed").unwrap_err();

	assert!(matches!(err, DomError::Parse { .. }));
	assert_eq!(doc.children(root), before.as_slice());
}

#[rstest]
fn test_text_nodes_cannot_hold_markup(page: (Document, NodeId)) {
	let (mut doc, root) = page;
	let hint = doc.query_selector(root, ".hint").unwrap().unwrap();
	let text = doc.children(hint)[0];

	let err = doc.set_inner_html(text, "<b>x</b>").unwrap_err();
	assert!(matches!(err, DomError::NotAContainer(id) if id == text));
}

#[rstest]
#[case("p >")]
#[case("[unterminated")]
fn test_bad_selector_is_an_error(page: (Document, NodeId), #[case] selector: &str) {
	let (doc, root) = page;
	assert!(matches!(
		doc.query_selector_all(root, selector),
		Err(DomError::InvalidSelector { .. })
	));
}
