//! Adoption of runs of adjacent text and interpolator items.
//!
//! A server renders `hello, {{name}}!` as one text node, while the template
//! needs one node per item. The run claims the adjacent existing text nodes,
//! locates each segment's expected text inside them, and splits the nodes so
//! every segment ends up with a node of its own. Segments whose text is not
//! found get a fresh node; their neighbours keep theirs.

use std::collections::BTreeSet;

use reinhardt_enhance_dom::{Document, NodeId};

use crate::cursor::Cursor;
use crate::matcher::{Expectation, MatchResult, match_item};
use crate::render_tree::{NodeOrigin, NodeRef};
use crate::report::EnhanceReport;

/// One item of a text run with its expected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	/// The text the item renders.
	pub text: String,
	/// Whether the item is literal text rather than an interpolator.
	pub literal: bool,
}

impl Segment {
	/// A literal text segment.
	pub fn literal(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			literal: true,
		}
	}

	/// An interpolated segment.
	pub fn dynamic(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			literal: false,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
	start: usize,
	end: usize,
	matched: bool,
}

#[derive(Debug, Clone, Copy)]
struct Piece {
	id: NodeId,
	start: usize,
	end: usize,
	origin: NodeOrigin,
}

impl Piece {
	fn within(&self, span: &Span) -> bool {
		self.start >= span.start && self.end <= span.end
	}
}

/// Adopts existing text for a run of segments, returning one node per
/// segment in order.
pub fn adopt_text_run(
	doc: &mut Document,
	cursor: &mut Cursor,
	segments: &[Segment],
	report: &mut EnhanceReport,
) -> Vec<NodeRef> {
	let mut group = Vec::new();
	while let MatchResult::Adopted(node) = match_item(doc, Expectation::Text, cursor) {
		group.push(node);
	}
	if group.is_empty() {
		return segments
			.iter()
			.map(|segment| create(doc, cursor, None, &segment.text, report))
			.collect();
	}

	let mut existing = String::new();
	let mut pieces = Vec::with_capacity(group.len());
	for id in group {
		let start = existing.len();
		existing.push_str(doc.text(id).unwrap_or_default());
		pieces.push(Piece {
			id,
			start,
			end: existing.len(),
			origin: NodeOrigin::Adopted,
		});
	}

	let spans = plan_spans(&existing, segments);
	let consumed = spans.last().map_or(0, |s| s.end);
	let cuts: BTreeSet<usize> = spans.iter().flat_map(|s| [s.start, s.end]).collect();
	let pieces = cut(doc, pieces, &cuts, report);

	let mut assigned = vec![false; pieces.len()];
	let mut nodes = Vec::with_capacity(segments.len());
	for (segment, span) in segments.iter().zip(&spans) {
		let mine: Vec<usize> = (0..pieces.len())
			.filter(|&i| pieces[i].start < pieces[i].end && pieces[i].within(span))
			.collect();
		for &i in &mine {
			assigned[i] = true;
		}
		let anchor = pieces
			.iter()
			.find(|p| p.start >= span.end && p.start < p.end)
			.map(|p| p.id);

		let node = match (span.matched, mine.split_first()) {
			(true, Some((&first, rest))) => {
				for &i in rest {
					merge_into(doc, pieces[first].id, pieces[i].id, report);
				}
				let node = NodeRef::new(pieces[first].id, pieces[first].origin);
				report.record(node.origin);
				node
			}
			(true, None) => create(doc, cursor, anchor, &segment.text, report),
			(false, _) => {
				for &i in &mine {
					remove(doc, pieces[i].id, report);
				}
				let stale = &existing[span.start..span.end];
				tracing::debug!(
					expected = %segment.text,
					literal = segment.literal,
					%stale,
					"Replacing stale text segment"
				);
				create(doc, cursor, anchor, &segment.text, report)
			}
		};
		nodes.push(node);
	}

	let mut leftover = Vec::new();
	for (piece, used) in pieces.iter().zip(assigned) {
		if used {
			continue;
		}
		if piece.start >= consumed && piece.start < piece.end {
			leftover.push(piece.id);
		} else {
			remove(doc, piece.id, report);
		}
	}
	if !leftover.is_empty() {
		tracing::trace!(count = leftover.len(), "Handing leftover text back to the cursor");
		cursor.hand_back(leftover);
	}
	nodes
}

/// Locates each segment inside the existing text.
///
/// A segment matches when its text appears at the current offset. An
/// interpolated value also needs the literal after it to line up. A stale segment
/// extends to where the next non-empty segment's text is found, or to the end
/// of the existing text.
fn plan_spans(existing: &str, segments: &[Segment]) -> Vec<Span> {
	let mut spans = Vec::with_capacity(segments.len());
	let mut offset = 0;
	for (i, segment) in segments.iter().enumerate() {
		let rest = &existing[offset..];
		let next = segments[i + 1..].iter().find(|s| !s.text.is_empty());
		let end = offset + segment.text.len();
		let matched = rest.starts_with(segment.text.as_str())
			&& match next {
				Some(next) if next.literal && !segment.literal => {
					existing[end..].starts_with(next.text.as_str())
				}
				_ => true,
			};
		if matched {
			spans.push(Span {
				start: offset,
				end,
				matched: true,
			});
			offset = end;
			continue;
		}
		let end = next
			.and_then(|next| rest.find(next.text.as_str()))
			.map_or(existing.len(), |pos| offset + pos);
		spans.push(Span {
			start: offset,
			end,
			matched: false,
		});
		offset = end;
	}
	spans
}

/// Splits pieces at every cut strictly inside them. The original node keeps
/// the leading part.
fn cut(
	doc: &mut Document,
	pieces: Vec<Piece>,
	cuts: &BTreeSet<usize>,
	report: &mut EnhanceReport,
) -> Vec<Piece> {
	let mut out = Vec::with_capacity(pieces.len());
	for piece in pieces {
		if piece.end <= piece.start + 1 {
			out.push(piece);
			continue;
		}
		let mut current = piece;
		for &at in cuts.range(piece.start + 1..piece.end) {
			match doc.split_text(current.id, at - current.start) {
				Ok(tail) => {
					tracing::trace!(node = %current.id, tail = %tail, at, "Split text node");
					report.split += 1;
					out.push(Piece { end: at, ..current });
					current = Piece {
						id: tail,
						start: at,
						end: piece.end,
						origin: NodeOrigin::Split,
					};
				}
				Err(err) => {
					report.failure(format!("split of {}: {}", current.id, err));
					break;
				}
			}
		}
		out.push(current);
	}
	out
}

fn merge_into(doc: &mut Document, target: NodeId, source: NodeId, report: &mut EnhanceReport) {
	let text = doc.text(source).unwrap_or_default().to_string();
	match doc.append_text(target, &text) {
		Ok(()) => {
			doc.remove(source);
			report.merged += 1;
		}
		Err(err) => report.failure(format!("merge of {} into {}: {}", source, target, err)),
	}
}

fn remove(doc: &mut Document, node: NodeId, report: &mut EnhanceReport) {
	if doc.remove(node) {
		report.removed += 1;
	}
}

fn create(
	doc: &mut Document,
	cursor: &Cursor,
	anchor: Option<NodeId>,
	text: &str,
	report: &mut EnhanceReport,
) -> NodeRef {
	let id = doc.create_text(text);
	let inserted = match anchor {
		Some(anchor) => doc.insert_before(cursor.parent(), id, Some(anchor)),
		None => cursor.insert(doc, id),
	};
	if let Err(err) = inserted {
		report.failure(format!("insertion of text {:?}: {}", text, err));
	}
	report.record(NodeOrigin::Created);
	NodeRef::new(id, NodeOrigin::Created)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn run(html: &str, segments: &[Segment]) -> (Document, NodeId, Vec<NodeId>, Vec<NodeRef>, EnhanceReport) {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(root, html).unwrap();
		let before = doc.children(root).to_vec();
		let mut cursor = Cursor::over_children(&doc, root);
		let mut report = EnhanceReport::default();
		let nodes = adopt_text_run(&mut doc, &mut cursor, segments, &mut report);
		report.removed += cursor.finish(&mut doc);
		(doc, root, before, nodes, report)
	}

	fn texts(doc: &Document, nodes: &[NodeRef]) -> Vec<String> {
		nodes
			.iter()
			.map(|n| doc.text(n.id).unwrap_or_default().to_string())
			.collect()
	}

	#[rstest]
	fn test_matching_run_splits_one_node_per_segment() {
		let segments = [
			Segment::literal(" hello, "),
			Segment::dynamic("world"),
			Segment::literal("! "),
		];
		let (doc, root, before, nodes, report) = run(" hello, world! ", &segments);

		assert_eq!(texts(&doc, &nodes), vec![" hello, ", "world", "! "]);
		assert_eq!(nodes[0], NodeRef::new(before[0], NodeOrigin::Adopted));
		assert_eq!(nodes[1].origin, NodeOrigin::Split);
		assert_eq!(report.split, 2);
		assert_eq!(report.created, 0);
		assert_eq!(doc.children(root), nodes.iter().map(|n| n.id).collect::<Vec<_>>().as_slice());
	}

	#[rstest]
	fn test_stale_interpolator_is_replaced_and_neighbours_survive() {
		let segments = [
			Segment::literal(" hello, "),
			Segment::dynamic("everybody"),
			Segment::literal("! "),
		];
		let (doc, root, before, nodes, report) = run(" hello, world! ", &segments);

		assert_eq!(doc.inner_html(root), " hello, everybody! ");
		assert_eq!(nodes[0].id, before[0]);
		assert_eq!(nodes[1].origin, NodeOrigin::Created);
		assert_eq!(nodes[2].origin, NodeOrigin::Split);
		assert_eq!(report.removed, 1);
		assert_eq!(report.created, 1);
	}

	#[rstest]
	fn test_segment_spanning_nodes_is_merged() {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		let a = doc.create_text("hel");
		let b = doc.create_text("lo");
		doc.append_child(root, a).unwrap();
		doc.append_child(root, b).unwrap();

		let mut cursor = Cursor::over_children(&doc, root);
		let mut report = EnhanceReport::default();
		let nodes = adopt_text_run(&mut doc, &mut cursor, &[Segment::dynamic("hello")], &mut report);

		assert_eq!(nodes, vec![NodeRef::new(a, NodeOrigin::Adopted)]);
		assert_eq!(doc.text(a), Some("hello"));
		assert_eq!(doc.parent(b), None);
		assert_eq!(report.merged, 1);
	}

	#[rstest]
	fn test_leftover_text_is_handed_back() {
		let mut doc = Document::new();
		let root = doc.create_element("div");
		doc.set_inner_html(root, "ab<p></p>").unwrap();

		let mut cursor = Cursor::over_children(&doc, root);
		let mut report = EnhanceReport::default();
		let nodes = adopt_text_run(&mut doc, &mut cursor, &[Segment::literal("a")], &mut report);

		assert_eq!(texts(&doc, &nodes), vec!["a"]);
		let tail = cursor.peek().unwrap();
		assert_eq!(doc.text(tail), Some("b"));

		let again = adopt_text_run(&mut doc, &mut cursor, &[Segment::literal("b")], &mut report);
		assert_eq!(again, vec![NodeRef::new(tail, NodeOrigin::Split)]);
		assert_eq!(doc.inner_html(root), "ab<p></p>");
	}

	#[rstest]
	fn test_run_without_existing_text_is_created() {
		let (doc, root, before, nodes, report) = run(
			"<p></p>",
			&[Segment::literal("x"), Segment::dynamic("y")],
		);
		assert!(nodes.iter().all(|n| n.origin == NodeOrigin::Created));
		assert_eq!(report.created, 2);
		assert_eq!(report.removed, 1);
		assert_eq!(doc.inner_html(root), "xy");
		assert_eq!(doc.parent(before[0]), None);
	}

	#[rstest]
	#[case::prefix_of_old_value("Bob")]
	#[case::empty_value("")]
	#[case::unrelated_value("Al")]
	fn test_trailing_literal_keeps_its_node_when_value_changes(#[case] value: &str) {
		let segments = [
			Segment::literal("Hi "),
			Segment::dynamic(value),
			Segment::literal("!"),
		];
		let (doc, root, before, nodes, report) = run("Hi Bobby!", &segments);

		assert_eq!(doc.text_content(root), format!("Hi {}!", value));
		assert_eq!(nodes[0], NodeRef::new(before[0], NodeOrigin::Adopted));
		assert_eq!(nodes[1].origin, NodeOrigin::Created);
		assert_eq!(nodes[2].origin, NodeOrigin::Split);
		assert_eq!(doc.text(nodes[2].id), Some("!"));
		assert_eq!(report.created, 1);
		assert_eq!(report.removed, 1);
	}

	#[rstest]
	#[case("Hi Bobby!", "Bob", vec![(0, 3, true), (3, 8, false), (8, 9, true)])]
	#[case("Hi Bobby!", "", vec![(0, 3, true), (3, 8, false), (8, 9, true)])]
	#[case("Hi Bob!", "Bob", vec![(0, 3, true), (3, 6, true), (6, 7, true)])]
	fn test_plan_spans_checks_the_following_literal(
		#[case] existing: &str,
		#[case] value: &str,
		#[case] spans: Vec<(usize, usize, bool)>,
	) {
		let segments = [
			Segment::literal("Hi "),
			Segment::dynamic(value),
			Segment::literal("!"),
		];
		let planned: Vec<(usize, usize, bool)> = plan_spans(existing, &segments)
			.into_iter()
			.map(|s| (s.start, s.end, s.matched))
			.collect();
		assert_eq!(planned, spans);
	}

	#[rstest]
	#[case(" hello, world! ", &["hello"], vec![(0, 15, false)])]
	#[case("ab", &["a", "b"], vec![(0, 1, true), (1, 2, true)])]
	#[case("a-b", &["a", "x", "b"], vec![(0, 1, true), (1, 2, false), (2, 3, true)])]
	#[case("ab", &["a", "", "b"], vec![(0, 1, true), (1, 1, true), (1, 2, true)])]
	fn test_plan_spans(
		#[case] existing: &str,
		#[case] expected: &[&str],
		#[case] spans: Vec<(usize, usize, bool)>,
	) {
		let segments: Vec<Segment> = expected.iter().map(|t| Segment::dynamic(*t)).collect();
		let planned: Vec<(usize, usize, bool)> = plan_spans(existing, &segments)
			.into_iter()
			.map(|s| (s.start, s.end, s.matched))
			.collect();
		assert_eq!(planned, spans);
	}
}
