//! HTML → Markdown conversion for extracted article bodies

/// Convert cleaned article HTML to Markdown (ATX headings, fenced code).
///
/// Runs of blank lines are collapsed to one and the result is trimmed.
pub fn to_markdown(html: &str) -> String {
    let raw = html2md::parse_html(html);
    collapse_blank_lines(&atx_headings(&raw))
}

/// Rewrite setext headings (`Title` over `===`/`---`) as `#`/`##` headings.
fn atx_headings(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out = String::with_capacity(markdown.len());
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let level = lines.get(i + 1).and_then(|next| setext_level(next));
        match level {
            Some(level) if !line.trim().is_empty() => {
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(line.trim());
                i += 2;
            }
            _ => {
                out.push_str(line);
                i += 1;
            }
        }
        out.push('\n');
    }
    out
}

fn setext_level(underline: &str) -> Option<usize> {
    let underline = underline.trim();
    if underline.len() < 3 {
        return None;
    }
    if underline.chars().all(|c| c == '=') {
        Some(1)
    } else if underline.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn collapse_blank_lines(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut blank_run = 0;
    for line in markdown.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push('\n');
        } else {
            blank_run = 0;
            out.push_str(line);
            out.push('\n');
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_are_atx() {
        let md = to_markdown("<h2>Setup</h2><p>Install the toolchain.</p>");
        assert!(md.starts_with("## Setup"), "{md}");
        assert!(md.contains("Install the toolchain."));
    }

    #[test]
    fn code_blocks_are_fenced() {
        let md = to_markdown("<pre><code>fn main() {}</code></pre>");
        assert!(md.contains("```"), "{md}");
        assert!(md.contains("fn main() {}"));
    }

    #[test]
    fn setext_underlines_become_hashes() {
        assert_eq!(atx_headings("Title\n=====\n\nBody\n\n---\n\nNext\n----\n"), "# Title\n\nBody\n\n---\n\n## Next\n");
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n b\n  \n\nc\n\n"), "a\n\n b\n\nc");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(to_markdown(""), "");
    }
}
