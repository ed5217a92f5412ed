use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Review post-processing
// ---------------------------------------------------------------------------

/// Heading label of the section whose body gets sentence-level reflow.
const SUMMARY_LABEL: &str = "Summary";

/// A `📋 Summary` line starts the summary region even without `##`.
const SUMMARY_MARKER: &str = "📋";

/// Lines starting with one of these mark the beginning of the next section
/// and therefore end the summary region.
const SECTION_MARKERS: [&str; 5] = ["✅", "🔧", "⚠", "🚀", "📈"];

static MULTI_NEWLINE_RE: OnceLock<Regex> = OnceLock::new();

fn multi_newline_re() -> &'static Regex {
    MULTI_NEWLINE_RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

/// Normalize generated review markdown for display.
///
/// Two passes: every ATX heading gets a blank line after it, and the body of
/// the summary region is reflowed so each sentence sits on its own line.
/// Idempotent: running it on its own output changes nothing.
pub fn prettify_markdown(md: &str) -> String {
    let spaced = ensure_heading_spacing(md);
    reflow_summary(&spaced)
}

/// Insert a blank line after every heading line that is not already followed
/// by one.
fn ensure_heading_spacing(md: &str) -> String {
    let lines: Vec<&str> = md.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        out.push(*line);
        if is_heading(line) {
            if let Some(next) = lines.get(i + 1) {
                if !next.is_empty() {
                    out.push("");
                }
            }
        }
    }
    out.join("\n")
}

/// ATX heading: 1-6 `#`, a whitespace char, then at least one more char.
fn is_heading(line: &str) -> bool {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return false;
    }
    let mut rest = line[hashes..].chars();
    matches!(rest.next(), Some(c) if c.is_whitespace()) && rest.next().is_some()
}

fn is_summary_start(line: &str) -> bool {
    let after_prefix = line
        .strip_prefix("##")
        .or_else(|| line.strip_prefix(SUMMARY_MARKER));
    match after_prefix {
        Some(rest) => rest.trim_start().starts_with(SUMMARY_LABEL),
        None => false,
    }
}

fn is_region_end(line: &str) -> bool {
    is_heading(line) || SECTION_MARKERS.iter().any(|m| line.starts_with(m))
}

/// Locate the summary region with a line-based scan and reflow its body.
///
/// The region starts at the first `## Summary...` or `📋 Summary...` line
/// and ends just before the next heading, the next section-marker line, or
/// the end of the document. Everything outside the region is untouched.
fn reflow_summary(md: &str) -> String {
    let lines: Vec<&str> = md.split('\n').collect();

    let Some(start) = lines.iter().position(|l| is_summary_start(l)) else {
        return md.to_string();
    };
    let end = lines[start + 1..]
        .iter()
        .position(|l| is_region_end(l))
        .map(|i| start + 1 + i)
        .unwrap_or(lines.len());

    let body = lines[start + 1..end].join("\n");
    let reflowed = reflow_body(&body);

    let mut out: Vec<&str> = lines[..=start].to_vec();
    out.extend(reflowed.lines());
    if end < lines.len() {
        out.push("");
        out.extend(&lines[end..]);
    }
    out.join("\n")
}

/// Break after sentence-terminating punctuation, collapse runs of blank
/// lines, trim.
fn reflow_body(body: &str) -> String {
    let broken = break_sentences(&body.replace('\r', ""));
    multi_newline_re()
        .replace_all(&broken, "\n\n")
        .trim()
        .to_string()
}

fn is_western_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_cjk_terminator(c: char) -> bool {
    matches!(
        c,
        '。' | '．' | '！' | '？' | '」' | '］' | '）' | '〕' | '〉' | '》' | '’' | '”'
    )
}

/// Insert a line break after each sentence terminator that is not already at
/// the end of a line.
///
/// Western terminators must be followed by whitespace and then more text;
/// the whitespace run is replaced by the break. CJK terminators and closers
/// break immediately when the next char is not a newline.
fn break_sentences(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len() + 16);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        if is_western_terminator(c) {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j > i + 1 && j < chars.len() {
                out.push('\n');
                i = j;
                continue;
            }
        } else if is_cjk_terminator(c) {
            if let Some(&next) = chars.get(i + 1) {
                if next != '\n' {
                    out.push('\n');
                }
            }
        }
        i += 1;
    }
    out
}
