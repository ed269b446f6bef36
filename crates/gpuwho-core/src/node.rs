//! Generic nested node structure produced from the nvidia-smi XML report.
//!
//! The vendor report is untyped: any element may hold text, a set of named
//! children, or (when a child name repeats) a list. `Node` mirrors that shape
//! so the normalizer can probe it without advance knowledge of cardinality.

/// One node of the parsed vendor report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Leaf text content. Empty for self-closing or content-free elements.
    Text(String),
    /// Named children in document order. Keys are element names; attribute
    /// entries are stored under `@name` keys.
    Map(Vec<(String, Node)>),
    /// Repeated sibling elements of the same name, in document order.
    List(Vec<Node>),
}

impl Node {
    /// Look up a child by key. Returns `None` for text and list nodes.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Return the text content of a leaf node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// `true` when the node carries no usable content: empty/whitespace text,
    /// an empty map, or an empty list.
    ///
    /// An idle device reports `<processes></processes>`, which parses to
    /// empty text; this is how the normalizer recognises it.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Text(s) => s.trim().is_empty(),
            Node::Map(entries) => entries.is_empty(),
            Node::List(items) => items.is_empty(),
        }
    }

    /// The single coerce-to-sequence rule: a list yields its elements, any
    /// other node yields itself as a one-element sequence.
    ///
    /// The vendor report represents a lone device (or a lone process within
    /// a device) as a bare map rather than a one-element list. Every
    /// ingestion point goes through this method so the two shapes are
    /// indistinguishable downstream.
    pub fn as_sequence(&self) -> Vec<&Node> {
        match self {
            Node::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}
