//! The visual tree: a styled, backend-neutral description of a rendered resume.
//!
//! The same tree feeds the HTML preview and the off-screen layout used for export,
//! so both surfaces always agree on content and styling.

use serde::Serialize;

use crate::models::options::{Section, Theme};
use crate::models::resume::SkillCategory;
use crate::render::color::Color;

/// What a node represents. Lets callers (and tests) query the tree without
/// depending on styling details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Document,
    Header,
    Name,
    Title,
    Contacts,
    Contact,
    Section(Section),
    SectionHeading(Section),
    Summary,
    Entries,
    Entry,
    EntryHeading,
    EntryTitle,
    EntryDates,
    Company,
    Degree,
    Details,
    Achievement,
    SkillCategory(SkillCategory),
    SkillCategoryLabel,
    SkillTags,
    SkillTag,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    #[default]
    Normal,
    Medium,
    Semibold,
    Bold,
}

impl Weight {
    pub fn is_bold(&self) -> bool {
        matches!(self, Weight::Semibold | Weight::Bold)
    }

    pub fn css(&self) -> u16 {
        match self {
            Weight::Normal => 400,
            Weight::Medium => 500,
            Weight::Semibold => 600,
            Weight::Bold => 700,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    /// CSS pixels.
    pub size: f32,
    pub weight: Weight,
    pub italic: bool,
    pub uppercase: bool,
    pub color: Color,
    pub align: Align,
    /// Multiplier of `size`.
    pub line_height: f32,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            weight: Weight::Normal,
            italic: false,
            uppercase: false,
            color,
            align: Align::Start,
            line_height: 1.5,
        }
    }

    pub fn weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn line_px(&self) -> f32 {
        self.size * self.line_height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub role: Role,
    pub text: String,
    pub style: TextStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// List marker drawn in the hanging indent, e.g. a bullet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<char>,
}

impl TextRun {
    pub fn new(role: Role, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            role,
            text: text.into(),
            style,
            href: None,
            marker: None,
        }
    }

    pub fn link(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn marker(mut self, marker: char) -> Self {
        self.marker = Some(marker);
        self
    }

    /// The text as painted, after case transforms.
    pub fn display_text(&self) -> String {
        if self.style.uppercase {
            self.text.to_uppercase()
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Edges = Edges {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn bottom(v: f32) -> Self {
        Self {
            bottom: v,
            ..Self::ZERO
        }
    }

    pub fn left(v: f32) -> Self {
        Self {
            left: v,
            ..Self::ZERO
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderSide {
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Border {
    pub side: BorderSide,
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    pub padding: Edges,
    /// Space after this node inside its parent.
    pub margin_bottom: f32,
    /// Vertical space between children.
    pub gap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub role: Role,
    pub style: BoxStyle,
    pub children: Vec<Node>,
}

/// A left run and a right-aligned run sharing one baseline ("justify-between").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Split {
    pub role: Role,
    pub left: TextRun,
    pub right: TextRun,
    pub margin_bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pill {
    pub background: Color,
    pub pad_x: f32,
    pub pad_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowItem {
    pub run: TextRun,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pill: Option<Pill>,
}

/// Inline items laid left to right, wrapping onto new lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub role: Role,
    pub items: Vec<FlowItem>,
    pub align: Align,
    pub gap_x: f32,
    pub gap_y: f32,
    pub margin_bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Block(Block),
    Text(TextRun),
    Split(Split),
    Flow(Flow),
}

impl Node {
    pub fn role(&self) -> Role {
        match self {
            Node::Block(b) => b.role,
            Node::Text(t) => t.role,
            Node::Split(s) => s.role,
            Node::Flow(f) => f.role,
        }
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        if let Node::Block(block) = self {
            for child in &block.children {
                child.walk(visit);
            }
        }
    }

    /// Every text run under this node, in document order.
    pub fn runs(&self) -> Vec<&TextRun> {
        let mut out = Vec::new();
        self.walk(&mut |node| match node {
            Node::Text(run) => out.push(run),
            Node::Split(split) => {
                out.push(&split.left);
                out.push(&split.right);
            }
            Node::Flow(flow) => out.extend(flow.items.iter().map(|item| &item.run)),
            Node::Block(_) => {}
        });
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualTree {
    pub theme: Theme,
    pub root: Node,
}

impl VisualTree {
    pub fn background(&self) -> Option<Color> {
        match &self.root {
            Node::Block(block) => block.style.background,
            _ => None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        let mut found = false;
        self.root.walk(&mut |node| found |= node.role() == role);
        found || self.runs().iter().any(|run| run.role == role)
    }

    pub fn runs(&self) -> Vec<&TextRun> {
        self.root.runs()
    }

    pub fn runs_with_role(&self, role: Role) -> Vec<&TextRun> {
        self.runs().into_iter().filter(|run| run.role == role).collect()
    }
}
