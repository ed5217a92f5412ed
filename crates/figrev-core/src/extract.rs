use crate::document::DesignNode;

// ---------------------------------------------------------------------------
// Tree extraction: Figma pages -> annotated markdown
// ---------------------------------------------------------------------------

/// Name used when a text node has no FRAME/COMPONENT/GROUP ancestor.
const ROOT_FRAME_NAME: &str = "Root";

/// Flatten every text node in the given pages into an annotated markdown
/// document.
///
/// Each non-empty TEXT node becomes one block: an anchor line
/// `[#page:<page>][#frame:<frame>][#node:<id>]` followed by the node's
/// normalized text. Blocks appear in pre-order traversal order, so output is
/// deterministic for identical input. A file with no text nodes yields just
/// the title line.
pub fn extract_markdown(file_key: &str, pages: &[DesignNode]) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for page in pages {
        let page_name = if page.name.is_empty() {
            "Untitled Page"
        } else {
            page.name.as_str()
        };
        let mut ancestors: Vec<&DesignNode> = Vec::new();
        collect_blocks(page, page_name, &mut ancestors, &mut blocks);
    }

    format!("# Figma Extract ({file_key})\n\n{}", blocks.join("\n"))
}

/// Pre-order walk: visit `node`, then descend with `node` pushed onto the
/// ancestor stack.
fn collect_blocks<'a>(
    node: &'a DesignNode,
    page_name: &str,
    ancestors: &mut Vec<&'a DesignNode>,
    blocks: &mut Vec<String>,
) {
    if node.is_text() {
        if let Some(characters) = &node.characters {
            if !characters.trim().is_empty() {
                // Nearest enclosing container, searching from the immediate
                // parent outward.
                let frame_name = ancestors
                    .iter()
                    .rev()
                    .find(|a| a.is_container())
                    .map(|a| a.name.as_str())
                    .unwrap_or(ROOT_FRAME_NAME);

                let text = normalize_text(characters);
                if !text.is_empty() {
                    let anchor = format!(
                        "[#page:{}][#frame:{}][#node:{}]",
                        escape_brackets(page_name),
                        escape_brackets(frame_name),
                        node.id
                    );
                    blocks.push(format!("{anchor}\n{text}\n"));
                }
            }
        }
    }

    ancestors.push(node);
    for child in &node.children {
        collect_blocks(child, page_name, ancestors, blocks);
    }
    ancestors.pop();
}

/// Split on any line-ending style, trim each line, rejoin with single
/// newlines, trim overall.
fn normalize_text(s: &str) -> String {
    s.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// `[` and `]` would break the anchor syntax, so they become `_` in names.
fn escape_brackets(s: &str) -> String {
    s.replace(['[', ']'], "_")
}
