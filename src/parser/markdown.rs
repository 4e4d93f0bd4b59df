//! Markdown sectioning.
//!
//! Turns a raw markdown body into typed block nodes and groups them into
//! sections keyed by the text of the nearest preceding heading. Grouping is by
//! document order between two consecutive headings of any level, so a `###`
//! heading closes the section opened by a preceding `#` heading.
//!
//! Headings nested in block quotes, list items or raw HTML open sections too.
//! Such a section holds the blocks that follow the heading inside the same
//! container, and its title counts towards the document-wide duplicate check.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::HashMap;

/// Errors raised while sectioning a document or looking up a section
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Body contains multiple headings '{0}'")]
    DuplicateHeading(String),

    #[error("PR body should have a section titled `{0}`.")]
    MissingSection(String),
}

/// A block-level markdown node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    /// ATX or setext heading; `text` is already trimmed
    Heading { level: u8, text: String },
    Paragraph(String),
    List(Vec<ListItem>),
    Quote(Vec<BlockNode>),
    Code(String),
    /// Raw HTML with comments removed, plus the text left after stripping tags
    Html { raw: String, text: String },
    /// Thematic break
    Rule,
}

/// One item of a bullet or ordered list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<BlockNode>,
}

impl ListItem {
    /// Visible text of the item, including nested lists
    pub fn visible_text(&self) -> String {
        join_visible(&self.blocks)
    }
}

impl BlockNode {
    /// Flattened text a reader would see when the node is rendered
    pub fn visible_text(&self) -> String {
        match self {
            BlockNode::Heading { text, .. } => text.clone(),
            BlockNode::Paragraph(text) | BlockNode::Code(text) => text.clone(),
            BlockNode::List(items) => items
                .iter()
                .map(ListItem::visible_text)
                .collect::<Vec<_>>()
                .join("\n"),
            BlockNode::Quote(blocks) => join_visible(blocks),
            BlockNode::Html { text, .. } => text.clone(),
            BlockNode::Rule => String::new(),
        }
    }

    /// True for nodes that carry text only and can't contain list items
    pub fn is_text_leaf(&self) -> bool {
        matches!(
            self,
            BlockNode::Paragraph(_)
                | BlockNode::Code(_)
                | BlockNode::Html { .. }
                | BlockNode::Rule
        )
    }

    /// Every list item nested anywhere inside this node, in document order
    pub fn list_items(&self) -> Vec<&ListItem> {
        let mut out = Vec::new();
        collect_items(self, &mut out);
        out
    }
}

fn collect_items<'a>(node: &'a BlockNode, out: &mut Vec<&'a ListItem>) {
    match node {
        BlockNode::List(items) => {
            for item in items {
                out.push(item);
                for child in &item.blocks {
                    collect_items(child, out);
                }
            }
        }
        BlockNode::Quote(blocks) => {
            for child in blocks {
                collect_items(child, out);
            }
        }
        _ => {}
    }
}

fn join_visible(blocks: &[BlockNode]) -> String {
    blocks
        .iter()
        .map(BlockNode::visible_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recognises headings and lists inside raw HTML blocks.
///
/// Only closed `<hN>`, `<ul>`/`<ol>` and `<li>` elements are recognised, and
/// a nested list ends its parent list early.
struct HtmlScanner {
    comment: Regex,
    markup: Regex,
    structure: Regex,
    item: Regex,
}

impl HtmlScanner {
    fn new() -> Self {
        Self {
            comment: Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"),
            markup: Regex::new(r"(?s)<!--.*?-->|<[A-Za-z/!][^>]*>").expect("valid tag pattern"),
            structure: Regex::new(
                r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>|<(?:ul|ol)\b[^>]*>(.*?)</(?:ul|ol)\s*>",
            )
            .expect("valid structure pattern"),
            item: Regex::new(r"(?is)<li\b[^>]*>(.*?)</li\s*>").expect("valid item pattern"),
        }
    }

    /// Text a reader would see, without tags or comments
    fn strip(&self, raw: &str) -> String {
        self.markup.replace_all(raw, "").trim().to_string()
    }

    /// Split an HTML block into headings, lists and the markup between them
    fn split(&self, raw: &str) -> Vec<BlockNode> {
        let cleaned = self.comment.replace_all(raw, "");
        let raw: &str = &cleaned;
        let mut nodes = Vec::new();
        let mut last = 0;

        for caps in self.structure.captures_iter(raw) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            self.push_markup(&raw[last..whole.start()], &mut nodes);
            last = whole.end();

            if let (Some(level), Some(inner)) = (caps.get(1), caps.get(2)) {
                nodes.push(BlockNode::Heading {
                    level: level.as_str().parse().unwrap_or(1),
                    text: self.strip(inner.as_str()),
                });
            } else if let Some(inner) = caps.get(3) {
                let items = self
                    .item
                    .captures_iter(inner.as_str())
                    .filter_map(|c| c.get(1))
                    .map(|m| ListItem {
                        blocks: vec![BlockNode::Paragraph(self.strip(m.as_str()))],
                    })
                    .collect();
                nodes.push(BlockNode::List(items));
            }
        }
        self.push_markup(&raw[last..], &mut nodes);

        nodes
    }

    fn push_markup(&self, raw: &str, nodes: &mut Vec<BlockNode>) {
        if raw.trim().is_empty() {
            return;
        }
        nodes.push(BlockNode::Html {
            raw: raw.to_string(),
            text: self.strip(raw),
        });
    }
}

/// Markdown content grouped under one heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub level: u8,
    pub blocks: Vec<BlockNode>,
}

impl Section {
    /// List items nested inside the section's container nodes.
    ///
    /// Text-only leaves (paragraphs, code, html) are skipped.
    pub fn list_items(&self) -> Vec<&ListItem> {
        self.blocks
            .iter()
            .filter(|b| !b.is_text_leaf())
            .flat_map(BlockNode::list_items)
            .collect()
    }

    /// Visible text of every block, joined with single spaces
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(BlockNode::visible_text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A markdown body split into sections by title.
///
/// Titles are unique across the whole document regardless of heading level.
///
/// # Example
/// ```
/// use prcheck::parser::Document;
/// let doc = Document::parse("# Intro\n\nHello\n\n## Details\n").unwrap();
/// assert!(doc.contains("Intro"));
/// assert!(doc.get("Details").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl Document {
    /// Parse and section a raw markdown body
    pub fn parse(raw: &str) -> Result<Self, DocumentError> {
        Self::from_blocks(parse_blocks(raw))
    }

    /// Group already-parsed blocks into sections.
    ///
    /// Blocks before the first heading of their container are dropped, but
    /// containers among them are still searched for headings.
    pub fn from_blocks(blocks: Vec<BlockNode>) -> Result<Self, DocumentError> {
        let mut doc = Document::default();
        doc.collect(&blocks)?;
        Ok(doc)
    }

    /// Section one container's children, then descend into nested containers
    fn collect(&mut self, blocks: &[BlockNode]) -> Result<(), DocumentError> {
        let mut current = None;

        for block in blocks {
            if let BlockNode::Heading { level, text } = block {
                if self.index.contains_key(text) {
                    return Err(DocumentError::DuplicateHeading(text.clone()));
                }
                current = Some(self.sections.len());
                self.index.insert(text.clone(), self.sections.len());
                self.sections.push(Section {
                    title: text.clone(),
                    level: *level,
                    blocks: Vec::new(),
                });
                continue;
            }

            if let Some(i) = current {
                self.sections[i].blocks.push(block.clone());
            }
            match block {
                BlockNode::Quote(children) => self.collect(children)?,
                BlockNode::List(items) => {
                    for item in items {
                        self.collect(&item.blocks)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Whether a section with exactly this title exists
    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title)
    }

    /// Content nodes of the section titled `title`
    pub fn get(&self, title: &str) -> Result<&[BlockNode], DocumentError> {
        self.section(title).map(|s| s.blocks.as_slice())
    }

    /// The section titled `title`
    pub fn section(&self, title: &str) -> Result<&Section, DocumentError> {
        self.index
            .get(title)
            .map(|&i| &self.sections[i])
            .ok_or_else(|| DocumentError::MissingSection(title.to_string()))
    }

    /// Sections in document order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

enum Frame {
    Quote(Vec<BlockNode>),
    List(Vec<ListItem>),
    // `pending` holds tight-list text that isn't wrapped in a paragraph
    Item {
        blocks: Vec<BlockNode>,
        pending: String,
    },
}

enum LeafKind {
    Paragraph,
    Heading(u8),
    Code,
    Html,
}

struct Leaf {
    kind: LeafKind,
    text: String,
}

/// Parse a markdown body into top-level block nodes, preserving order
pub fn parse_blocks(raw: &str) -> Vec<BlockNode> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut builder = BlockBuilder::new();
    for event in Parser::new_ext(raw, options) {
        builder.handle(event);
    }
    builder.roots
}

struct BlockBuilder {
    roots: Vec<BlockNode>,
    stack: Vec<Frame>,
    leaf: Option<Leaf>,
    image_depth: usize,
    html: HtmlScanner,
}

impl BlockBuilder {
    fn new() -> Self {
        Self {
            roots: Vec::new(),
            stack: Vec::new(),
            leaf: None,
            image_depth: 0,
            html: HtmlScanner::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => self.open_leaf(LeafKind::Paragraph),
            Event::Start(Tag::Heading { level, .. }) => {
                self.open_leaf(LeafKind::Heading(heading_level(level)))
            }
            Event::Start(Tag::CodeBlock(_)) => self.open_leaf(LeafKind::Code),
            Event::Start(Tag::HtmlBlock) => self.open_leaf(LeafKind::Html),
            Event::Start(Tag::BlockQuote(_)) => {
                self.flush_pending();
                self.stack.push(Frame::Quote(Vec::new()));
            }
            Event::Start(Tag::List(_)) => {
                self.flush_pending();
                self.stack.push(Frame::List(Vec::new()));
            }
            Event::Start(Tag::Item) => self.stack.push(Frame::Item {
                blocks: Vec::new(),
                pending: String::new(),
            }),
            Event::Start(Tag::Image { .. }) => self.image_depth += 1,
            Event::Start(_) => {}

            Event::End(TagEnd::Image) => self.image_depth = self.image_depth.saturating_sub(1),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::CodeBlock)
            | Event::End(TagEnd::HtmlBlock) => self.close_leaf(),
            Event::End(TagEnd::Item) => {
                self.flush_pending();
                if let Some(Frame::Item { blocks, .. }) = self.stack.pop() {
                    if let Some(Frame::List(items)) = self.stack.last_mut() {
                        items.push(ListItem { blocks });
                    }
                }
            }
            Event::End(TagEnd::List(_)) => {
                if let Some(Frame::List(items)) = self.stack.pop() {
                    self.push_block(BlockNode::List(items));
                }
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                if matches!(self.stack.last(), Some(Frame::Quote(_))) {
                    if let Some(Frame::Quote(blocks)) = self.stack.pop() {
                        self.push_block(BlockNode::Quote(blocks));
                    }
                }
            }
            Event::End(_) => {}

            Event::Text(text) | Event::Code(text) => {
                if self.image_depth == 0 {
                    self.push_text(&text);
                }
            }
            Event::Html(html) => {
                if let Some(Leaf {
                    kind: LeafKind::Html,
                    text,
                }) = self.leaf.as_mut()
                {
                    text.push_str(&html);
                }
            }
            Event::SoftBreak | Event::HardBreak => self.push_text("\n"),
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " })
            }
            Event::Rule => {
                self.flush_pending();
                self.push_block(BlockNode::Rule);
            }
            _ => {}
        }
    }

    fn open_leaf(&mut self, kind: LeafKind) {
        self.flush_pending();
        self.leaf = Some(Leaf {
            kind,
            text: String::new(),
        });
    }

    fn close_leaf(&mut self) {
        let Some(Leaf { kind, text }) = self.leaf.take() else {
            return;
        };
        let node = match kind {
            LeafKind::Paragraph => BlockNode::Paragraph(text),
            LeafKind::Heading(level) => BlockNode::Heading {
                level,
                text: text.trim().to_string(),
            },
            LeafKind::Code => BlockNode::Code(text),
            LeafKind::Html => {
                for node in self.html.split(&text) {
                    self.push_block(node);
                }
                return;
            }
        };
        self.push_block(node);
    }

    fn push_text(&mut self, text: &str) {
        if let Some(leaf) = self.leaf.as_mut() {
            leaf.text.push_str(text);
        } else if let Some(Frame::Item { pending, .. }) = self.stack.last_mut() {
            pending.push_str(text);
        }
    }

    /// Turn tight-list text collected so far into a paragraph of the item
    fn flush_pending(&mut self) {
        if let Some(Frame::Item { blocks, pending }) = self.stack.last_mut() {
            if !pending.is_empty() {
                blocks.push(BlockNode::Paragraph(std::mem::take(pending)));
            }
        }
    }

    fn push_block(&mut self, node: BlockNode) {
        match self.stack.last_mut() {
            Some(Frame::Quote(blocks)) | Some(Frame::Item { blocks, .. }) => blocks.push(node),
            // lists only hold items
            Some(Frame::List(_)) => {}
            None => self.roots.push(node),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
