//! Final briefing document decoding
//!
//! The terminal payload arrives as a single event whose real newlines were
//! replaced by the `|||` token, with a light markup convention on top:
//! `### ` opens a heading line and `- ` opens a list item. Decoding restores
//! the newlines first and only then interprets the markup line by line —
//! never the other way around.

use crate::domain::protocol::LINE_SEPARATOR;
use serde::Serialize;

const HEADING_PREFIX: &str = "### ";
const BULLET_PREFIX: &str = "- ";

/// One rendered line of the briefing document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "text")]
pub enum BriefingBlock {
    /// A `### ` heading line
    Heading(String),

    /// A `- ` list item line
    Bullet(String),

    /// Any other non-empty line
    Text(String),

    /// A blank line between sections
    Blank,
}

/// A decoded briefing document, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BriefingDocument {
    blocks: Vec<BriefingBlock>,
}

impl BriefingDocument {
    /// Decode an encoded payload into renderable blocks
    pub fn decode(payload: &str) -> Self {
        let restored = payload.replace(LINE_SEPARATOR, "\n");
        let blocks = restored
            .lines()
            .map(|line| {
                if let Some(text) = line.strip_prefix(HEADING_PREFIX) {
                    BriefingBlock::Heading(text.to_string())
                } else if let Some(text) = line.strip_prefix(BULLET_PREFIX) {
                    BriefingBlock::Bullet(text.to_string())
                } else if line.trim().is_empty() {
                    BriefingBlock::Blank
                } else {
                    BriefingBlock::Text(line.to_string())
                }
            })
            .collect();
        Self { blocks }
    }

    pub fn blocks(&self) -> &[BriefingBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
