//! Markdown section replacement.
//!
//! Headings are located with `pulldown-cmark`, so a `## Architecture` line
//! inside a fenced code block is not mistaken for the section heading.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug)]
struct Heading {
    level: HeadingLevel,
    /// Byte range of the heading line(s), without the trailing newline.
    span: Range<usize>,
    text: String,
}

fn headings(document: &str) -> Vec<Heading> {
    let mut found = Vec::new();
    let mut current: Option<Heading> = None;

    for (event, range) in Parser::new_ext(document, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                let end = range.start
                    + document[range.clone()]
                        .trim_end_matches(['\n', '\r'])
                        .len();
                current = Some(Heading {
                    level,
                    span: range.start..end,
                    text: String::new(),
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = &mut current {
                    heading.text.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut heading) = current.take() {
                    heading.text = heading.text.trim().to_owned();
                    found.push(heading);
                }
            }
            _ => {}
        }
    }

    found
}

/// Replace the body of the level-2 section titled `heading`.
///
/// The heading line is kept; everything after it up to the next heading of
/// level 1 or 2 (or the end of the document) becomes `body`. When no such
/// section exists, `\n## {heading}\n\n{body}` is appended.
#[must_use]
pub fn patch_section(document: &str, heading: &str, body: &str) -> String {
    let body = body.trim_matches('\n');
    let all = headings(document);

    let Some(index) = all
        .iter()
        .position(|h| h.level == HeadingLevel::H2 && h.text == heading)
    else {
        tracing::debug!(heading, "Section not found, appending");
        let mut out = document.to_owned();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("\n## {heading}\n\n{body}\n"));
        return out;
    };

    let target = &all[index];
    let next = all[index + 1..]
        .iter()
        .find(|h| h.level <= HeadingLevel::H2)
        .map(|h| h.span.start);

    let mut out = String::with_capacity(document.len() + body.len());
    out.push_str(&document[..target.span.end]);
    out.push_str("\n\n");
    out.push_str(body);
    out.push('\n');
    if let Some(next) = next {
        out.push('\n');
        out.push_str(&document[next..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_replaces_existing_section() {
        let doc = "# Shop\n\nIntro.\n\n## Architecture\n\nold diagram\n\nmore old text\n\n## Usage\n\nRun it.\n";
        let patched = patch_section(doc, "Architecture", "new diagram");
        assert_eq!(
            patched,
            "# Shop\n\nIntro.\n\n## Architecture\n\nnew diagram\n\n## Usage\n\nRun it.\n"
        );
    }

    #[test]
    fn test_replaces_section_at_end() {
        let doc = "# Shop\n\n## Architecture\n\nold\n";
        assert_eq!(
            patch_section(doc, "Architecture", "new"),
            "# Shop\n\n## Architecture\n\nnew\n"
        );
    }

    #[test]
    fn test_subsections_are_replaced() {
        let doc = "## Architecture\n\nold\n\n### Details\n\nold details\n\n# Appendix\n";
        assert_eq!(
            patch_section(doc, "Architecture", "new"),
            "## Architecture\n\nnew\n\n# Appendix\n"
        );
    }

    #[test]
    fn test_appends_missing_section() {
        let doc = "# Shop\n\nIntro.";
        assert_eq!(
            patch_section(doc, "Architecture", "diagram"),
            "# Shop\n\nIntro.\n\n## Architecture\n\ndiagram\n"
        );
    }

    #[test]
    fn test_heading_in_code_fence_is_ignored() {
        let doc = "# Shop\n\n```markdown\n## Architecture\n```\n";
        let patched = patch_section(doc, "Architecture", "diagram");
        assert_eq!(
            patched,
            "# Shop\n\n```markdown\n## Architecture\n```\n\n## Architecture\n\ndiagram\n"
        );
    }

    #[test]
    fn test_other_level_is_not_matched() {
        let doc = "### Architecture\n\nkeep\n";
        let patched = patch_section(doc, "Architecture", "diagram");
        assert!(patched.starts_with("### Architecture\n\nkeep\n"));
        assert!(patched.ends_with("\n## Architecture\n\ndiagram\n"));
    }

    #[test]
    fn test_patch_is_idempotent() {
        let doc = "# Shop\n\n## Architecture\n\nold\n\n## Usage\n";
        let once = patch_section(doc, "Architecture", "```mermaid\ngraph LR\n```\n");
        let twice = patch_section(&once, "Architecture", "```mermaid\ngraph LR\n```\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_headings_found() {
        let found = headings("# A\n\n## B `code`\n\ntext\n");
        let texts: Vec<_> = found.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B code"]);
        assert_eq!(found[1].level, HeadingLevel::H2);
    }
}
