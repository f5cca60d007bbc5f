//! Content tree of the editable field.
//!
//! Positions are measured in rendered units: one per text character, one per
//! line break, and one per character of a mention label (`@` + display name).

use crate::domain::token::{NBSP_MARKER, TRIGGER};
use crate::domain::user::{User, UserId};

/// Committed, non-editable mention of a user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MentionElement {
    pub display_name: String,
    pub user_id: UserId,
}

impl MentionElement {
    /// Builds the element for `user`.
    pub fn from_user(user: &User) -> Self {
        Self {
            display_name: user.display_name.clone(),
            user_id: user.id.clone(),
        }
    }

    /// Returns the visible label, the display name behind the trigger.
    pub fn label(&self) -> String {
        format!("{TRIGGER}{}", self.display_name)
    }

    /// Returns the label length in rendered units.
    pub fn label_len(&self) -> usize {
        1 + self.display_name.chars().count()
    }
}

/// One node of the field content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Text(String),
    Mention(MentionElement),
    LineBreak,
}

impl Node {
    /// Returns the node length in rendered units.
    pub fn unit_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Mention(element) => element.label_len(),
            Self::LineBreak => 1,
        }
    }

    fn is_atomic(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

/// A resolved `(node, offset)` position.
///
/// `node == nodes.len()` with `offset == 0` addresses the end of a document
/// whose last node is not text (or an empty document).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CursorPosition {
    pub node: usize,
    pub offset: usize,
}

/// Location of a mention node in rendered units, `start..end`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MentionSpan {
    pub end: usize,
    pub node: usize,
    pub start: usize,
}

/// What a single-unit removal took out of the document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Removed {
    Character(char),
    LineBreak,
    Mention(MentionElement),
}

/// Kind of a rendered unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnitKind<'a> {
    Text,
    Mention {
        element: &'a MentionElement,
        position: usize,
    },
    LineBreak,
}

/// A single rendered unit and the caret offset in front of it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Unit<'a> {
    pub caret: usize,
    pub ch: char,
    pub kind: UnitKind<'a>,
}

/// Ordered, normalized sequence of content nodes.
///
/// After every mutation there are no empty text nodes and no two adjacent
/// text nodes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates a document from plain text; `\n` becomes a line break node.
    pub fn from_text(text: &str) -> Self {
        let mut document = Self {
            nodes: text_nodes(text),
        };
        document.normalize();

        document
    }

    /// Returns the content nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the document length in rendered units.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(Node::unit_len).sum()
    }

    /// Returns whether the document has no content.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of mention elements.
    pub fn mention_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Mention(_)))
            .count()
    }

    /// Returns the rendered text, one character per unit.
    pub fn rendered_text(&self) -> String {
        let mut text = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(content) => text.push_str(content),
                Node::Mention(element) => text.push_str(&element.label()),
                Node::LineBreak => text.push('\n'),
            }
        }

        text
    }

    /// Returns rendered text between two caret offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.rendered_text()
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }

    /// Returns every rendered unit in order.
    pub fn units(&self) -> Vec<Unit<'_>> {
        let mut units = Vec::with_capacity(self.len());
        let mut caret = 0;

        for node in &self.nodes {
            match node {
                Node::Text(text) => {
                    for ch in text.chars() {
                        units.push(Unit {
                            caret,
                            ch,
                            kind: UnitKind::Text,
                        });
                        caret += 1;
                    }
                }
                Node::Mention(element) => {
                    for (position, ch) in element.label().chars().enumerate() {
                        units.push(Unit {
                            caret,
                            ch,
                            kind: UnitKind::Mention { element, position },
                        });
                        caret += 1;
                    }
                }
                Node::LineBreak => {
                    units.push(Unit {
                        caret,
                        ch: '\n',
                        kind: UnitKind::LineBreak,
                    });
                    caret += 1;
                }
            }
        }

        units
    }

    /// Resolves a caret offset into a `(node, offset)` pair.
    ///
    /// At a boundary between two nodes the position is anchored at the end of
    /// a preceding text node when there is one, otherwise at the start of the
    /// following node.
    pub fn cursor_position(&self, caret: usize) -> CursorPosition {
        let caret = caret.min(self.len());
        let mut start = 0;

        for (index, node) in self.nodes.iter().enumerate() {
            let end = start + node.unit_len();

            if caret == start {
                let previous = index.checked_sub(1).and_then(|i| self.nodes.get(i));
                if let Some(Node::Text(text)) = previous {
                    return CursorPosition {
                        node: index - 1,
                        offset: text.chars().count(),
                    };
                }

                return CursorPosition {
                    node: index,
                    offset: 0,
                };
            }

            if caret < end {
                return CursorPosition {
                    node: index,
                    offset: caret - start,
                };
            }

            start = end;
        }

        match self.nodes.last() {
            Some(Node::Text(text)) => CursorPosition {
                node: self.nodes.len() - 1,
                offset: text.chars().count(),
            },
            _ => CursorPosition {
                node: self.nodes.len(),
                offset: 0,
            },
        }
    }

    /// Returns the mention whose label contains the unit at `unit`.
    pub fn mention_span(&self, unit: usize) -> Option<MentionSpan> {
        self.spans()
            .find(|(_, start, end)| *start <= unit && unit < *end)
            .and_then(|(node, start, end)| self.as_mention_span(node, start, end))
    }

    /// Returns the mention the caret sits strictly inside of.
    pub fn mention_around(&self, caret: usize) -> Option<MentionSpan> {
        self.spans()
            .find(|(_, start, end)| *start < caret && caret < *end)
            .and_then(|(node, start, end)| self.as_mention_span(node, start, end))
    }

    /// Returns the mention that ends exactly at `caret` and is still followed
    /// by its marker.
    pub fn mention_ending_at(&self, caret: usize) -> Option<MentionSpan> {
        let span = self.mention_span(caret.checked_sub(1)?)?;
        let followed_by_marker = span.end == caret
            && matches!(
                self.nodes.get(span.node + 1),
                Some(Node::Text(text)) if text.starts_with(NBSP_MARKER)
            );

        followed_by_marker.then_some(span)
    }

    /// Returns the offset where scanning for a mention token may start: the
    /// end of the last atomic node at or before `caret`.
    pub fn scan_start(&self, caret: usize) -> usize {
        self.spans()
            .filter(|(node, _, end)| self.nodes[*node].is_atomic() && *end <= caret)
            .map(|(_, _, end)| end)
            .last()
            .unwrap_or(0)
    }

    /// Inserts plain text at `caret`. A caret strictly inside a mention
    /// inserts after that mention.
    pub fn insert_text(&mut self, caret: usize, text: &str) {
        if text.is_empty() {
            return;
        }

        self.insert_nodes(caret, text_nodes(text));
    }

    /// Inserts `nodes` at `caret`, splitting a text node when needed.
    pub fn insert_nodes(&mut self, caret: usize, nodes: Vec<Node>) {
        let index = self.split_at(caret);
        self.nodes.splice(index..index, nodes);
        self.normalize();
    }

    /// Removes the text between `start` and `end`.
    ///
    /// Returns `false` and leaves the document untouched unless the range
    /// lies inside a single text node.
    pub fn remove_text_range(&mut self, start: usize, end: usize) -> bool {
        let Some((index, node_start, _)) = self
            .spans()
            .find(|(_, node_start, node_end)| *node_start <= start && end <= *node_end)
        else {
            return false;
        };
        let Some(Node::Text(text)) = self.nodes.get_mut(index) else {
            return false;
        };

        let from = byte_offset_at(text, start - node_start);
        let to = byte_offset_at(text, end - node_start);
        text.replace_range(from..to, "");
        self.normalize();

        true
    }

    /// Removes the unit at `unit`. Mentions go as a whole together with their
    /// trailing marker.
    pub fn remove_unit(&mut self, unit: usize) -> Option<Removed> {
        let (index, start, _) = self
            .spans()
            .find(|(_, start, end)| *start <= unit && unit < *end)?;

        let removed = match self.nodes.get_mut(index)? {
            Node::Text(text) => {
                let from = byte_offset_at(text, unit - start);
                Removed::Character(text.remove(from))
            }
            Node::LineBreak => {
                self.nodes.remove(index);
                Removed::LineBreak
            }
            Node::Mention(_) => return self.remove_mention(index).map(Removed::Mention),
        };
        self.normalize();

        Some(removed)
    }

    /// Removes the mention at node `index` and its trailing marker.
    pub fn remove_mention(&mut self, index: usize) -> Option<MentionElement> {
        if !matches!(self.nodes.get(index), Some(Node::Mention(_))) {
            return None;
        }
        let Node::Mention(element) = self.nodes.remove(index) else {
            return None;
        };

        if let Some(Node::Text(text)) = self.nodes.get_mut(index)
            && text.starts_with(NBSP_MARKER)
        {
            text.remove(0);
        }
        self.normalize();

        Some(element)
    }

    fn spans(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .scan(0, |start, (index, node)| {
                let node_start = *start;
                *start += node.unit_len();

                Some((index, node_start, *start))
            })
    }

    fn as_mention_span(&self, node: usize, start: usize, end: usize) -> Option<MentionSpan> {
        matches!(self.nodes.get(node), Some(Node::Mention(_))).then_some(MentionSpan {
            end,
            node,
            start,
        })
    }

    /// Splits the node under `caret` and returns the index new nodes should be
    /// inserted at. Atomic nodes are never split.
    fn split_at(&mut self, caret: usize) -> usize {
        let mut start = 0;

        for index in 0..self.nodes.len() {
            let len = self.nodes[index].unit_len();
            if caret <= start {
                return index;
            }

            if caret < start + len {
                if let Node::Text(text) = &mut self.nodes[index] {
                    let tail = text.split_off(byte_offset_at(text, caret - start));
                    self.nodes.insert(index + 1, Node::Text(tail));
                }

                return index + 1;
            }

            start += len;
        }

        self.nodes.len()
    }

    fn normalize(&mut self) {
        let mut normalized: Vec<Node> = Vec::with_capacity(self.nodes.len());

        for node in self.nodes.drain(..) {
            match node {
                Node::Text(text) if text.is_empty() => {}
                Node::Text(text) => {
                    if let Some(Node::Text(previous)) = normalized.last_mut() {
                        previous.push_str(&text);
                    } else {
                        normalized.push(Node::Text(text));
                    }
                }
                other => normalized.push(other),
            }
        }

        self.nodes = normalized;
    }
}

fn text_nodes(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            nodes.push(Node::LineBreak);
        }
        if !line.is_empty() {
            nodes.push(Node::Text(line.to_string()));
        }
    }

    nodes
}

fn byte_offset_at(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(index, _)| index)
}
