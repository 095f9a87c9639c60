//! GitHub-styled palettes shared by the Mermaid and Graphviz backends.

use crate::diagram::EdgeStyle;

/// GitHub's default font stack.
pub const FONT_FAMILY: &str =
    "-apple-system, BlinkMacSystemFont, Segoe UI, Noto Sans, Helvetica, Arial, sans-serif";

/// Muted text color for secondary label lines.
pub const MUTED_TEXT: &str = "#656d76";

/// Style of one node class (`classDef` in Mermaid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeClass {
    pub name: &'static str,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: &'static str,
    pub text: &'static str,
    pub dashed: bool,
}

impl NodeClass {
    const fn outlined(name: &'static str, stroke: &'static str) -> Self {
        Self {
            name,
            fill: "#ffffff",
            stroke,
            stroke_width: "1.5px",
            text: "#1f2328",
            dashed: false,
        }
    }

    /// Mermaid `classDef` style list.
    #[must_use]
    pub fn mermaid_style(&self) -> String {
        let dash = if self.dashed {
            "stroke-dasharray:5 5,"
        } else {
            ""
        };
        format!(
            "fill:{},stroke:{},stroke-width:{},{dash}color:{},rx:6,ry:6",
            self.fill, self.stroke, self.stroke_width, self.text
        )
    }
}

/// Colors and classes for one kind of diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Mermaid `themeVariables`, in output order.
    pub variables: &'static [(&'static str, &'static str)],
    pub classes: &'static [NodeClass],
    /// Default edge color.
    pub line_color: &'static str,
    /// `linkStyle` per edge style; `None` leaves the edge unstyled.
    pub normal_link: Option<&'static str>,
    pub added_link: Option<&'static str>,
    pub removed_link: Option<&'static str>,
}

const CATEGORY_CLASSES: &[NodeClass] = &[
    NodeClass::outlined("container", "#2da44e"),
    NodeClass::outlined("datastore", "#d4a72c"),
    NodeClass::outlined("other", "#d1d9e0"),
];

const DIFF_CLASSES: &[NodeClass] = &[
    NodeClass {
        name: "added",
        fill: "#dafbe1",
        stroke: "#1a7f37",
        stroke_width: "2px",
        text: "#1a7f37",
        dashed: false,
    },
    NodeClass {
        name: "modified",
        fill: "#fff8c5",
        stroke: "#d4a72c",
        stroke_width: "2px",
        text: "#9a6700",
        dashed: false,
    },
    NodeClass {
        name: "removed",
        fill: "#ffebe9",
        stroke: "#d1242f",
        stroke_width: "2px",
        text: "#d1242f",
        dashed: true,
    },
    NodeClass {
        name: "unchanged",
        fill: "#ffffff",
        stroke: "#d1d9e0",
        stroke_width: "1px",
        text: MUTED_TEXT,
        dashed: false,
    },
];

impl Theme {
    /// README architecture diagram.
    pub const README: Self = Self {
        variables: &[
            ("primaryColor", "#ffffff"),
            ("primaryTextColor", "#1f2328"),
            ("primaryBorderColor", "#d1d9e0"),
            ("lineColor", "#2da44e"),
            ("secondaryColor", "#f6f8fa"),
            ("tertiaryColor", "#ffffff"),
            ("background", "#ffffff"),
            ("mainBkg", "#ffffff"),
            ("nodeBorder", "#d1d9e0"),
            ("clusterBkg", "#f6f8fa"),
            ("clusterBorder", "#d1d9e0"),
            ("fontSize", "14px"),
            ("fontFamily", FONT_FAMILY),
        ],
        classes: CATEGORY_CLASSES,
        line_color: "#2da44e",
        normal_link: Some("stroke:#2da44e,stroke-width:1.5px"),
        added_link: Some("stroke:#2da44e,stroke-width:1.5px"),
        removed_link: Some("stroke:#2da44e,stroke-width:1.5px"),
    };

    /// Base and head diagrams in a pull request report.
    pub const COMPACT: Self = Self {
        variables: &[
            ("primaryColor", "#ffffff"),
            ("primaryTextColor", "#1f2328"),
            ("primaryBorderColor", "#d1d9e0"),
            ("lineColor", "#2da44e"),
            ("background", "#ffffff"),
            ("mainBkg", "#ffffff"),
            ("fontSize", "13px"),
        ],
        classes: CATEGORY_CLASSES,
        line_color: "#2da44e",
        normal_link: None,
        added_link: None,
        removed_link: None,
    };

    /// Unified diff diagram.
    pub const DIFF: Self = Self {
        variables: &[
            ("primaryColor", "#ffffff"),
            ("primaryTextColor", "#1f2328"),
            ("primaryBorderColor", "#d1d9e0"),
            ("lineColor", MUTED_TEXT),
            ("background", "#ffffff"),
            ("mainBkg", "#ffffff"),
            ("fontSize", "13px"),
        ],
        classes: DIFF_CLASSES,
        line_color: MUTED_TEXT,
        normal_link: None,
        added_link: Some("stroke:#1a7f37,stroke-width:1.5px"),
        removed_link: Some("stroke:#d1242f,stroke-width:1.5px"),
    };

    #[must_use]
    pub fn class(&self, name: &str) -> Option<&NodeClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn link_style(&self, style: EdgeStyle) -> Option<&'static str> {
        match style {
            EdgeStyle::Normal => self.normal_link,
            EdgeStyle::Added => self.added_link,
            EdgeStyle::Removed => self.removed_link,
        }
    }

    /// Edge color for Graphviz output.
    #[must_use]
    pub fn edge_color(&self, style: EdgeStyle) -> &'static str {
        match style {
            EdgeStyle::Normal => self.line_color,
            EdgeStyle::Added => "#1a7f37",
            EdgeStyle::Removed => "#d1242f",
        }
    }
}
