//! Graphviz DOT backend.
//!
//! Labels use Graphviz HTML-like syntax. `URL`, `tooltip` and `target`
//! attributes make nodes clickable in SVG output.

use std::fmt::Write;

use crate::diagram::{Diagram, EdgeStyle, Label, LabelLine, NodeIds};
use crate::theme::{FONT_FAMILY, MUTED_TEXT, Theme};

/// Render a diagram as a DOT `digraph`.
#[must_use]
pub fn render(diagram: &Diagram, theme: &Theme) -> String {
    let ids = NodeIds::new(diagram);
    let mut out = String::from("digraph architecture {\n");
    let _ = writeln!(
        out,
        "    graph [rankdir=LR, bgcolor=\"#ffffff\", pad=0.3, nodesep=0.6, ranksep=0.9, fontname=\"{FONT_FAMILY}\"];"
    );
    let _ = writeln!(
        out,
        "    node [shape=box, style=\"rounded,filled\", fontname=\"{FONT_FAMILY}\", fontsize=12, margin=\"0.2,0.1\"];"
    );
    let _ = writeln!(
        out,
        "    edge [color=\"{}\", penwidth=1.5, arrowsize=0.7];",
        theme.line_color
    );

    for node in diagram.nodes() {
        let mut attrs = vec![format!("label=<{}>", render_label(&node.label))];
        if let Some(class) = theme.class(&node.class) {
            attrs.push(format!("fillcolor=\"{}\"", class.fill));
            attrs.push(format!("color=\"{}\"", class.stroke));
            attrs.push(format!("fontcolor=\"{}\"", class.text));
            attrs.push(format!(
                "penwidth={}",
                class.stroke_width.trim_end_matches("px")
            ));
            if class.dashed {
                attrs.push("style=\"rounded,filled,dashed\"".to_owned());
            }
        }
        if let Some(link) = &node.link {
            attrs.push(format!("URL=\"{}\"", quote(&link.url)));
            attrs.push(format!("tooltip=\"{}\"", quote(&link.tooltip)));
            attrs.push("target=\"_blank\"".to_owned());
        }
        let _ = writeln!(out, "    {} [{}];", ids.get(&node.id), attrs.join(", "));
    }

    for edge in diagram.edges() {
        let from = ids.get(&edge.from);
        let to = ids.get(&edge.to);
        match edge.style {
            EdgeStyle::Normal => {
                let _ = writeln!(out, "    {from} -> {to};");
            }
            EdgeStyle::Added | EdgeStyle::Removed => {
                let text = if edge.style == EdgeStyle::Added {
                    "new"
                } else {
                    "removed"
                };
                let _ = writeln!(
                    out,
                    "    {from} -> {to} [style=dashed, color=\"{color}\", fontcolor=\"{color}\", label=\"{text}\"];",
                    color = theme.edge_color(edge.style)
                );
            }
        }
    }

    out.push_str("}\n");
    out
}

fn render_label(label: &Label) -> String {
    let title = html_escape(&label.title);
    let mut parts = vec![if label.bold {
        format!("<b>{title}</b>")
    } else {
        title
    }];
    for line in &label.lines {
        parts.push(match line {
            LabelLine::Plain(text) => html_escape(text),
            LabelLine::Muted(text) => {
                format!("<font color=\"{MUTED_TEXT}\">{}</font>", html_escape(text))
            }
        });
    }
    parts.join("<br/>")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
