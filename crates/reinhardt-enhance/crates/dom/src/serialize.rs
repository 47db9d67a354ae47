//! HTML serialization.

use crate::document::Document;
use crate::node::{NodeId, NodeKind};
use crate::parser::VOID_ELEMENTS;

pub(crate) fn serialize_children(doc: &Document, id: NodeId, out: &mut String) {
	for &child in doc.children(id) {
		serialize_node(doc, child, out);
	}
}

fn serialize_node(doc: &Document, id: NodeId, out: &mut String) {
	match doc.kind(id) {
		NodeKind::Fragment => serialize_children(doc, id, out),
		NodeKind::Text => out.push_str(&escape_text(doc.text(id).unwrap_or_default())),
		NodeKind::Comment => {
			out.push_str("<!--");
			out.push_str(doc.text(id).unwrap_or_default());
			out.push_str("-->");
		}
		NodeKind::Element => {
			let tag = doc.tag_name(id).unwrap_or_default();
			out.push('<');
			out.push_str(tag);
			for (name, value) in doc.attributes(id) {
				out.push(' ');
				out.push_str(name);
				out.push_str("=\"");
				out.push_str(&escape_attr(value));
				out.push('"');
			}
			out.push('>');
			if VOID_ELEMENTS.contains(&tag) {
				return;
			}
			serialize_children(doc, id, out);
			out.push_str("</");
			out.push_str(tag);
			out.push('>');
		}
	}
}

fn escape_text(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}
