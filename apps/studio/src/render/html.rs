//! HTML backend for the live preview. Every style is inlined so the markup can be
//! dropped into any page without a stylesheet.

use std::fmt::Write;

use crate::render::tree::{
    Align, Block, BorderSide, BoxStyle, Edges, Flow, FlowItem, Node, Role, Split, TextRun,
    TextStyle, VisualTree,
};

const FONT_STACK: &str = "Inter, ui-sans-serif, system-ui, -apple-system, sans-serif";

/// The tree as a standalone HTML page.
pub fn to_html_document(tree: &VisualTree, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body style=\"margin:0;background:#f3f4f6\">\n\
         <div style=\"max-width:800px;margin:0 auto\">\n{}</div>\n</body>\n</html>\n",
        escape(title),
        to_html(tree)
    )
}

/// The tree as an HTML fragment rooted at a single `<div>`.
pub fn to_html(tree: &VisualTree) -> String {
    let mut out = String::new();
    write_node(&mut out, &tree.root, true);
    out
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_node(out: &mut String, node: &Node, root: bool) {
    match node {
        Node::Block(block) => write_block(out, block, root),
        Node::Text(run) => {
            let tag = text_tag(run.role);
            let mut css = text_css(&run.style);
            if run.marker.is_some() {
                css.push_str("padding-left:1.25em;text-indent:-1.25em;");
            }
            let _ = write!(out, "<{tag} data-role=\"{}\" style=\"{css}\">", role_name(run.role));
            if let Some(marker) = run.marker {
                let _ = write!(out, "<span aria-hidden=\"true\">{marker}&nbsp;&nbsp;</span>");
            }
            write_inline(out, run);
            let _ = writeln!(out, "</{tag}>");
        }
        Node::Split(split) => write_split(out, split),
        Node::Flow(flow) => write_flow(out, flow),
    }
}

fn write_block(out: &mut String, block: &Block, root: bool) {
    let tag = match block.role {
        Role::Header => "header",
        Role::Section(_) => "section",
        Role::Entry => "article",
        _ => "div",
    };
    let mut css = box_css(&block.style);
    if root {
        let _ = write!(css, "font-family:{FONT_STACK};");
    }
    let _ = writeln!(out, "<{tag} data-role=\"{}\" style=\"{css}\">", role_name(block.role));
    for child in &block.children {
        write_node(out, child, false);
    }
    let _ = writeln!(out, "</{tag}>");
}

fn write_split(out: &mut String, split: &Split) {
    let _ = writeln!(
        out,
        "<div data-role=\"{}\" style=\"display:flex;justify-content:space-between;\
         align-items:baseline;gap:8px;margin-bottom:{}px;\">",
        role_name(split.role),
        split.margin_bottom
    );
    for run in [&split.left, &split.right] {
        let _ = write!(
            out,
            "<span data-role=\"{}\" style=\"{}\">",
            role_name(run.role),
            text_css(&run.style)
        );
        write_inline(out, run);
        let _ = writeln!(out, "</span>");
    }
    let _ = writeln!(out, "</div>");
}

fn write_flow(out: &mut String, flow: &Flow) {
    let justify = match flow.align {
        Align::Start => "flex-start",
        Align::Center => "center",
    };
    let _ = writeln!(
        out,
        "<div data-role=\"{}\" style=\"display:flex;flex-wrap:wrap;justify-content:{justify};\
         column-gap:{}px;row-gap:{}px;margin-bottom:{}px;\">",
        role_name(flow.role),
        flow.gap_x,
        flow.gap_y,
        flow.margin_bottom
    );
    for FlowItem { run, pill } in &flow.items {
        let mut css = text_css(&run.style);
        if let Some(pill) = pill {
            let _ = write!(
                css,
                "background-color:{};padding:{}px {}px;border-radius:9999px;",
                pill.background.css(),
                pill.pad_y,
                pill.pad_x
            );
        }
        let _ = write!(out, "<span data-role=\"{}\" style=\"{css}\">", role_name(run.role));
        write_inline(out, run);
        let _ = writeln!(out, "</span>");
    }
    let _ = writeln!(out, "</div>");
}

/// Text content, wrapped in an anchor when the run links to a web or mail
/// address. Any other scheme is shown as plain text.
fn write_inline(out: &mut String, run: &TextRun) {
    match run.href.as_deref().filter(|href| is_safe_href(href)) {
        Some(href) => {
            let external = if href.starts_with("mailto:") {
                ""
            } else {
                " target=\"_blank\" rel=\"noopener noreferrer\""
            };
            let _ = write!(
                out,
                "<a href=\"{}\"{external} style=\"color:inherit;text-decoration:none;\">{}</a>",
                escape(href),
                escape(&run.text)
            );
        }
        None => out.push_str(&escape(&run.text)),
    }
}

fn is_safe_href(href: &str) -> bool {
    let href = href.trim_start().to_ascii_lowercase();
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| href.starts_with(scheme))
}

fn text_tag(role: Role) -> &'static str {
    match role {
        Role::Name => "h1",
        Role::SectionHeading(_) => "h2",
        _ => "p",
    }
}

fn text_css(style: &TextStyle) -> String {
    let mut css = format!(
        "margin:0;font-size:{}px;font-weight:{};line-height:{};color:{};",
        style.size,
        style.weight.css(),
        style.line_height,
        style.color.css()
    );
    if style.italic {
        css.push_str("font-style:italic;");
    }
    if style.uppercase {
        css.push_str("text-transform:uppercase;letter-spacing:0.05em;");
    }
    if style.align == Align::Center {
        css.push_str("text-align:center;");
    }
    css
}

fn box_css(style: &BoxStyle) -> String {
    let mut css = String::new();
    if let Some(bg) = style.background {
        let _ = write!(css, "background-color:{};", bg.css());
    }
    if let Some(border) = style.border {
        let side = match border.side {
            BorderSide::Bottom => "bottom",
            BorderSide::Left => "left",
        };
        let _ = write!(css, "border-{side}:{}px solid {};", border.width, border.color.css());
    }
    if style.padding != Edges::ZERO {
        let Edges {
            top,
            right,
            bottom,
            left,
        } = style.padding;
        let _ = write!(css, "padding:{top}px {right}px {bottom}px {left}px;");
    }
    if style.gap > 0.0 {
        let _ = write!(css, "display:flex;flex-direction:column;gap:{}px;", style.gap);
    }
    if style.margin_bottom > 0.0 {
        let _ = write!(css, "margin-bottom:{}px;", style.margin_bottom);
    }
    css
}

fn role_name(role: Role) -> String {
    let name = match serde_json::to_value(role) {
        Ok(serde_json::Value::String(name)) => name,
        // data-carrying roles serialize as {"section": "skills"}
        Ok(serde_json::Value::Object(map)) => map
            .into_iter()
            .next()
            .map(|(kind, value)| format!("{kind}-{}", value.as_str().unwrap_or_default()))
            .unwrap_or_default(),
        _ => String::new(),
    };
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::{RenderConfig, Theme};
    use crate::models::resume::fixtures::jane_doe;
    use crate::render::renderer::render;

    #[test]
    fn test_escape_html_specials() {
        assert_eq!(
            escape(r#"<b>"R&D" & 'ops'</b>"#),
            "&lt;b&gt;&quot;R&amp;D&quot; &amp; &#39;ops&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_preview_contains_content_and_links() {
        let html = to_html(&render(&jane_doe(), &RenderConfig::default()));
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("href=\"mailto:jane.doe@email.com\""));
        assert!(html.contains(">linkedin.com/in/janedoe</a>"));
        assert!(html.contains("data-role=\"section-skills\""));
        assert!(html.contains("rgba(13, 148, 136, 0.15)"));
    }

    #[test]
    fn test_only_web_and_mail_links_are_live() {
        let mut doc = jane_doe();
        doc.personal_info.linkedin = "javascript:alert(document.cookie)".to_string();
        let html = to_html(&render(&doc, &RenderConfig::default()));
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("javascript:alert(document.cookie)"));
        assert!(html.contains("href=\"mailto:jane.doe@email.com\""));

        assert!(is_safe_href("HTTPS://www.linkedin.com/in/janedoe"));
        assert!(!is_safe_href("data:text/html,hi"));
        assert!(!is_safe_href(" javascript:void(0)"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut doc = jane_doe();
        doc.summary = "<script>alert(1)</script>".to_string();
        let html = to_html(&render(&doc, &RenderConfig::default()));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_dark_theme_background_inlined() {
        let config = RenderConfig {
            theme: Theme::Dark,
            ..Default::default()
        };
        let html = to_html(&render(&jane_doe(), &config));
        assert!(html.contains("background-color:#1e293b;"));
    }

    #[test]
    fn test_document_wraps_fragment() {
        let tree = render(&jane_doe(), &RenderConfig::default());
        let page = to_html_document(&tree, "Jane & co");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Jane &amp; co</title>"));
        assert!(page.contains(&to_html(&tree)));
    }
}
