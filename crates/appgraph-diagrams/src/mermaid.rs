//! Mermaid flowchart backend.

use crate::diagram::{Diagram, EdgeStyle, Label, LabelLine, NodeIds};
use crate::theme::{MUTED_TEXT, Theme};

/// Render a diagram as a Mermaid `graph LR` flowchart.
///
/// Output order: init directive, `classDef`s, nodes, edges, click
/// directives, then `linkStyle` lines. Link style indices refer to positions
/// in [`Diagram::edges`], which is also the edge output order.
#[must_use]
pub fn render(diagram: &Diagram, theme: &Theme) -> String {
    let ids = NodeIds::new(diagram);
    let mut lines = vec![init_directive(theme), "graph LR".to_owned()];

    for class in theme.classes {
        lines.push(format!(
            "    classDef {} {}",
            class.name,
            class.mermaid_style()
        ));
    }

    for node in diagram.nodes() {
        lines.push(format!(
            "    {}[\"{}\"]:::{}",
            ids.get(&node.id),
            render_label(&node.label),
            node.class
        ));
    }

    for edge in diagram.edges() {
        let arrow = match edge.style {
            EdgeStyle::Normal => "-->",
            EdgeStyle::Added => "-. new .->",
            EdgeStyle::Removed => "-. removed .->",
        };
        lines.push(format!(
            "    {} {arrow} {}",
            ids.get(&edge.from),
            ids.get(&edge.to)
        ));
    }

    for node in diagram.nodes() {
        if let Some(link) = &node.link {
            lines.push(format!(
                "    click {} href \"{}\" \"{}\" _blank",
                ids.get(&node.id),
                link.url,
                escape(&link.tooltip)
            ));
        }
    }

    for (index, edge) in diagram.edges().iter().enumerate() {
        if let Some(style) = theme.link_style(edge.style) {
            lines.push(format!("    linkStyle {index} {style}"));
        }
    }

    lines.join("\n")
}

fn init_directive(theme: &Theme) -> String {
    let variables = theme
        .variables
        .iter()
        .map(|(key, value)| format!("'{key}': '{value}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("%%{{ init: {{ 'theme': 'base', 'themeVariables': {{ {variables} }} }} }}%%")
}

/// Label markup: `<b>` title, `<br/>`-separated detail lines.
#[must_use]
pub fn render_label(label: &Label) -> String {
    let title = escape(&label.title);
    let mut parts = vec![if label.bold {
        format!("<b>{title}</b>")
    } else {
        title
    }];
    for line in &label.lines {
        parts.push(match line {
            LabelLine::Plain(text) => escape(text),
            LabelLine::Muted(text) => {
                format!("<span style=\"color:{MUTED_TEXT}\">{}</span>", escape(text))
            }
        });
    }
    parts.join("<br/>")
}

/// Double quotes end a Mermaid string; use the entity instead.
fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
}
