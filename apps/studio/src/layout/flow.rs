//! Box layout of a visual tree at a fixed width.
//!
//! Blocks stack vertically with padding, borders and gaps; text wraps greedily
//! at word boundaries; split rows put a right-aligned run beside a wrapped left
//! run; flows place inline items (skill tags, contacts) and wrap them into rows.
//!
//! Output is a flat display list in paint order, in CSS pixels.

use serde::Serialize;

use crate::layout::font_metrics::TextMeasure;
use crate::render::color::Color;
use crate::render::tree::{
    Align, Block, BorderSide, Flow, Node, Split, TextRun, TextStyle, VisualTree, Weight,
};

const MARKER_GAP_EM: f32 = 0.75;
const SPLIT_GAP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DisplayItem {
    Fill {
        rect: Rect,
        color: Color,
        /// Corner radius; pills use half their height.
        radius: f32,
    },
    /// One laid-out line of text. `rect` is the line box.
    Text {
        rect: Rect,
        text: String,
        size: f32,
        weight: Weight,
        italic: bool,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn text_lines(&self) -> impl Iterator<Item = (&Rect, &str)> {
        self.items.iter().filter_map(|item| match item {
            DisplayItem::Text { rect, text, .. } => Some((rect, text.as_str())),
            DisplayItem::Fill { .. } => None,
        })
    }
}

/// Lays `tree` out at `width` px. Height grows to fit the content.
pub fn layout_tree(tree: &VisualTree, width: f32, measure: &dyn TextMeasure) -> DisplayList {
    let mut engine = Engine {
        measure,
        items: Vec::new(),
    };
    let height = engine.node(&tree.root, 0.0, 0.0, width);
    DisplayList {
        width,
        height: height.ceil().max(1.0),
        background: tree.background().unwrap_or(Color::rgb(255, 255, 255)),
        items: engine.items,
    }
}

/// Greedy word wrap: as many words per line as fit in `max_width`. A single
/// word wider than the line overflows on a line of its own.
pub fn wrap_lines(
    text: &str,
    max_width: f32,
    measure: &dyn TextMeasure,
    size: f32,
    bold: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.width(&candidate, size, bold) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Engine<'a> {
    measure: &'a dyn TextMeasure,
    items: Vec<DisplayItem>,
}

impl Engine<'_> {
    /// Lays out `node` with its top-left at (x, y). Returns the height it
    /// occupies, excluding its own bottom margin.
    fn node(&mut self, node: &Node, x: f32, y: f32, width: f32) -> f32 {
        match node {
            Node::Block(block) => self.block(block, x, y, width),
            Node::Text(run) => self.text(run, x, y, width),
            Node::Split(split) => self.split(split, x, y, width),
            Node::Flow(flow) => self.flow(flow, x, y, width),
        }
    }

    fn block(&mut self, block: &Block, x: f32, y: f32, width: f32) -> f32 {
        let style = &block.style;
        let left_border = match style.border {
            Some(b) if b.side == BorderSide::Left => b.width,
            _ => 0.0,
        };
        let bottom_border = match style.border {
            Some(b) if b.side == BorderSide::Bottom => b.width,
            _ => 0.0,
        };

        // Background must paint beneath children, so reserve its slot now.
        let background_slot = self.items.len();

        let inner_x = x + left_border + style.padding.left;
        let inner_w = (width - left_border - style.padding.left - style.padding.right).max(0.0);
        let mut cursor = y + style.padding.top;

        for (i, child) in block.children.iter().enumerate() {
            if i > 0 {
                cursor += style.gap;
            }
            cursor += self.node(child, inner_x, cursor, inner_w);
            cursor += margin_of(child);
        }

        let height = cursor - y + style.padding.bottom + bottom_border;

        if let Some(background) = style.background {
            self.items.insert(
                background_slot,
                DisplayItem::Fill {
                    rect: Rect { x, y, w: width, h: height },
                    color: background,
                    radius: 0.0,
                },
            );
        }
        if let Some(border) = style.border {
            let rect = match border.side {
                BorderSide::Bottom => Rect {
                    x,
                    y: y + height - border.width,
                    w: width,
                    h: border.width,
                },
                BorderSide::Left => Rect {
                    x,
                    y,
                    w: border.width,
                    h: height,
                },
            };
            self.items.push(DisplayItem::Fill {
                rect,
                color: border.color,
                radius: 0.0,
            });
        }
        height
    }

    fn text(&mut self, run: &TextRun, x: f32, y: f32, width: f32) -> f32 {
        let style = &run.style;
        let bold = style.weight.is_bold();
        let line_px = style.line_px();

        let indent = match run.marker {
            Some(marker) => {
                let marker_text = marker.to_string();
                self.push_line(&marker_text, x, y, style);
                self.measure.width(&marker_text, style.size, bold) + style.size * MARKER_GAP_EM
            }
            None => 0.0,
        };

        let text_x = x + indent;
        let text_w = (width - indent).max(0.0);
        let lines = wrap_lines(&run.display_text(), text_w, self.measure, style.size, bold);
        for (i, line) in lines.iter().enumerate() {
            let line_w = self.measure.width(line, style.size, bold);
            let line_x = match style.align {
                Align::Start => text_x,
                Align::Center => text_x + ((text_w - line_w) / 2.0).max(0.0),
            };
            self.push_line(line, line_x, y + i as f32 * line_px, style);
        }
        lines.len() as f32 * line_px
    }

    fn split(&mut self, split: &Split, x: f32, y: f32, width: f32) -> f32 {
        let right = &split.right;
        let right_text = right.display_text();
        let right_w = self
            .measure
            .width(&right_text, right.style.size, right.style.weight.is_bold());
        let left_w = (width - right_w - SPLIT_GAP).max(0.0);

        let left_h = self.text(&split.left, x, y, left_w);

        // centre the right run on the left run's first line
        let first_line = split.left.style.line_px();
        let right_y = y + ((first_line - right.style.line_px()) / 2.0).max(0.0);
        self.push_line(&right_text, x + width - right_w, right_y, &right.style);

        left_h.max(right_y - y + right.style.line_px())
    }

    fn flow(&mut self, flow: &Flow, x: f32, y: f32, width: f32) -> f32 {
        struct Placed<'r> {
            run: &'r TextRun,
            text: String,
            w: f32,
            h: f32,
            pad_x: f32,
            pad_y: f32,
            pill: Option<Color>,
        }

        let placed: Vec<Placed> = flow
            .items
            .iter()
            .map(|item| {
                let text = item.run.display_text();
                let style = &item.run.style;
                let text_w = self.measure.width(&text, style.size, style.weight.is_bold());
                let (pad_x, pad_y) = item.pill.map_or((0.0, 0.0), |p| (p.pad_x, p.pad_y));
                Placed {
                    run: &item.run,
                    text,
                    w: text_w + 2.0 * pad_x,
                    h: style.line_px() + 2.0 * pad_y,
                    pad_x,
                    pad_y,
                    pill: item.pill.map(|p| p.background),
                }
            })
            .collect();

        // Break into rows first so centred rows can be offset as a whole.
        let mut rows: Vec<Vec<&Placed>> = Vec::new();
        let mut row_w = 0.0;
        for item in &placed {
            let fits = !rows.is_empty() && row_w + flow.gap_x + item.w <= width;
            match rows.last_mut() {
                Some(row) if fits => {
                    row_w += flow.gap_x + item.w;
                    row.push(item);
                    continue;
                }
                _ => {}
            }
            row_w = item.w;
            rows.push(vec![item]);
        }

        let mut cursor = y;
        for (r, row) in rows.iter().enumerate() {
            if r > 0 {
                cursor += flow.gap_y;
            }
            let total: f32 =
                row.iter().map(|p| p.w).sum::<f32>() + flow.gap_x * (row.len() as f32 - 1.0);
            let row_h = row.iter().map(|p| p.h).fold(0.0, f32::max);
            let mut item_x = match flow.align {
                Align::Start => x,
                Align::Center => x + ((width - total) / 2.0).max(0.0),
            };
            for item in row {
                if let Some(color) = item.pill {
                    self.items.push(DisplayItem::Fill {
                        rect: Rect {
                            x: item_x,
                            y: cursor,
                            w: item.w,
                            h: item.h,
                        },
                        color,
                        radius: item.h / 2.0,
                    });
                }
                self.push_line(&item.text, item_x + item.pad_x, cursor + item.pad_y, &item.run.style);
                item_x += item.w + flow.gap_x;
            }
            cursor += row_h;
        }
        cursor - y
    }

    fn push_line(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        let w = self.measure.width(text, style.size, style.weight.is_bold());
        self.items.push(DisplayItem::Text {
            rect: Rect {
                x,
                y,
                w,
                h: style.line_px(),
            },
            text: text.to_string(),
            size: style.size,
            weight: style.weight,
            italic: style.italic,
            color: style.color,
        });
    }
}

fn margin_of(node: &Node) -> f32 {
    match node {
        Node::Block(b) => b.style.margin_bottom,
        Node::Split(s) => s.margin_bottom,
        Node::Flow(f) => f.margin_bottom,
        Node::Text(_) => 0.0,
    }
}
