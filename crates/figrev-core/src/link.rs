use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Result of parsing a Figma share link or bare file key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLink {
    pub file_key: Option<String>,
    pub node_id: Option<String>,
}

static BARE_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn bare_key_re() -> &'static Regex {
    BARE_KEY_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{10,}$").expect("valid regex"))
}

/// Extract the file key (and optional `node-id`) from a Figma link.
///
/// Accepts either a bare file key (alphanumeric/hyphen/underscore, at least
/// 10 chars) or a full share URL with a `/file/<key>` or `/design/<key>`
/// path segment. Never fails: unparseable input yields `None` for both
/// fields.
pub fn parse_figma_link(link_or_key: &str) -> ParsedLink {
    if link_or_key.is_empty() {
        return ParsedLink::default();
    }

    if bare_key_re().is_match(link_or_key) && !link_or_key.contains("figma.com") {
        return ParsedLink {
            file_key: Some(link_or_key.to_string()),
            node_id: None,
        };
    }

    let Ok(url) = Url::parse(link_or_key) else {
        return ParsedLink::default();
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let file_key = segments
        .iter()
        .position(|p| *p == "file" || *p == "design")
        .and_then(|i| segments.get(i + 1))
        .map(|s| (*s).to_string());

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| v.into_owned());

    ParsedLink { file_key, node_id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_url_with_node_id() {
        let parsed = parse_figma_link("https://www.figma.com/file/ABC123xyz?node-id=1:2");
        assert_eq!(parsed.file_key.as_deref(), Some("ABC123xyz"));
        assert_eq!(parsed.node_id.as_deref(), Some("1:2"));
    }

    #[test]
    fn parses_design_url() {
        let parsed = parse_figma_link("https://www.figma.com/design/XyZ987abc0/My-Design");
        assert_eq!(parsed.file_key.as_deref(), Some("XyZ987abc0"));
        assert_eq!(parsed.node_id, None);
    }

    #[test]
    fn accepts_bare_key() {
        let parsed = parse_figma_link("ABC123xyz0");
        assert_eq!(parsed.file_key.as_deref(), Some("ABC123xyz0"));
        assert_eq!(parsed.node_id, None);
    }

    #[test]
    fn short_key_is_not_a_bare_key() {
        // under 10 chars and not a URL
        let parsed = parse_figma_link("ABC123");
        assert_eq!(parsed, ParsedLink::default());
    }

    #[test]
    fn garbage_yields_none() {
        assert_eq!(parse_figma_link("not a url"), ParsedLink::default());
        assert_eq!(parse_figma_link(""), ParsedLink::default());
    }

    #[test]
    fn url_without_file_segment_yields_none() {
        let parsed = parse_figma_link("https://www.figma.com/community/whatever");
        assert_eq!(parsed.file_key, None);
    }
}
