//! Conversion of the nvidia-smi XML report into the generic [`Node`] tree.
//!
//! The mapping keeps the report's untyped shape: an element with only text
//! becomes [`Node::Text`], an element with children becomes [`Node::Map`],
//! and a child element name that repeats becomes [`Node::List`] in document
//! order. Attributes are stored as `@name` entries. This is exactly the
//! shape that makes a one-device report look like a bare map where a
//! multi-device report holds a list; the normalizer resolves that ambiguity
//! with [`Node::as_sequence`].

use gpuwho_core::error::{GpuWhoError, Result};
use gpuwho_core::node::Node;
use quick_xml::events::Event;
use quick_xml::Reader;

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse an XML document into a [`Node`].
///
/// The root element appears as the single entry of the returned map, so a
/// report starts with `parsed.get("nvidia_smi_log")`.
pub fn parse(xml: &str) -> Result<Node> {
    if xml.trim().is_empty() {
        return Err(GpuWhoError::XmlParse("empty report".to_string()));
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Vec<(String, Node)> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let mut frame = Frame::new(element_name(start.name().as_ref()));
                collect_attributes(&start, &mut frame.entries)?;
                stack.push(frame);
            }

            Ok(Event::Empty(start)) => {
                let mut frame = Frame::new(element_name(start.name().as_ref()));
                collect_attributes(&start, &mut frame.entries)?;
                let (name, node) = frame.close();
                attach(&mut stack, &mut root, name, node);
            }

            Ok(Event::Text(text)) => {
                if let Some(frame) = stack.last_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|e| GpuWhoError::XmlParse(e.to_string()))?;
                    if !frame.text.is_empty() {
                        frame.text.push(' ');
                    }
                    frame.text.push_str(unescaped.trim());
                }
            }

            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| GpuWhoError::XmlParse("unbalanced end tag".to_string()))?;
                let (name, node) = frame.close();
                attach(&mut stack, &mut root, name, node);
            }

            Ok(Event::Eof) => break,

            // Declaration, comments, processing instructions, doctype.
            Ok(_) => {}

            Err(e) => return Err(GpuWhoError::XmlParse(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(GpuWhoError::XmlParse("truncated document".to_string()));
    }
    if root.is_empty() {
        return Err(GpuWhoError::XmlParse("no root element".to_string()));
    }
    Ok(Node::Map(root))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One open element while walking the event stream.
struct Frame {
    name: String,
    entries: Vec<(String, Node)>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            entries: Vec::new(),
            text: String::new(),
        }
    }

    /// Collapse the frame into its final node form.
    fn close(self) -> (String, Node) {
        let node = if self.entries.is_empty() {
            Node::Text(self.text)
        } else {
            let mut entries = self.entries;
            if !self.text.is_empty() {
                entries.push(("#text".to_string(), Node::Text(self.text)));
            }
            Node::Map(entries)
        };
        (self.name, node)
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn collect_attributes(
    start: &quick_xml::events::BytesStart<'_>,
    entries: &mut Vec<(String, Node)>,
) -> Result<()> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| GpuWhoError::XmlParse(e.to_string()))?;
        let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr
            .unescape_value()
            .map_err(|e| GpuWhoError::XmlParse(e.to_string()))?
            .into_owned();
        insert_child(entries, key, Node::Text(value));
    }
    Ok(())
}

/// Place a closed child under its parent, or at the document root.
fn attach(stack: &mut [Frame], root: &mut Vec<(String, Node)>, name: String, node: Node) {
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.entries, name, node),
        None => insert_child(root, name, node),
    }
}

/// Insert preserving first-seen key order; a repeated key upgrades the
/// existing entry to a list.
fn insert_child(entries: &mut Vec<(String, Node)>, name: String, node: Node) {
    if let Some((_, existing)) = entries.iter_mut().find(|(k, _)| k == &name) {
        match existing {
            Node::List(items) => items.push(node),
            _ => {
                let first = std::mem::replace(existing, Node::List(Vec::new()));
                if let Node::List(items) = existing {
                    items.push(first);
                    items.push(node);
                }
            }
        }
    } else {
        entries.push((name, node));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
