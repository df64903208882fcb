//! A deliberately small Markdown dialect rendered to HTML by staged text
//! substitution: header lines, then inline emphasis and code spans, then a
//! line-state machine for lists and paragraphs.
//!
//! The renderer is a pure function of its input, but it is not idempotent:
//! markers that survive one pass unmatched can pair up with substituted
//! output on a second pass, so a body must be rendered exactly once.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Longest marker first, so `###` is never consumed by the `#` rule.
    static ref H3: Regex = Regex::new(r"(?m)^### (.+)$").unwrap();
    static ref H2: Regex = Regex::new(r"(?m)^## (.+)$").unwrap();
    static ref H1: Regex = Regex::new(r"(?m)^# (.+)$").unwrap();
    // Strong must run before emphasis, so a `**` run is not half-eaten by
    // the single-`*` rule. All three are non-greedy: they stop at the
    // nearest closing marker.
    static ref STRONG: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref EM: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref CODE: Regex = Regex::new(r"`(.+?)`").unwrap();
    static ref ORDERED_ITEM: Regex = Regex::new(r"^\d+\. ").unwrap();
}

/// Renders a post body to an HTML fragment.
///
/// Unterminated markers are left in place (the patterns simply do not
/// match), an empty body renders to an empty fragment, and lines that
/// start with `<` pass through verbatim so pre-rendered HTML blocks
/// survive untouched.
pub fn render(body: &str) -> String {
    let html = H3.replace_all(body, "<h3>$1</h3>");
    let html = H2.replace_all(&html, "<h2>$1</h2>");
    let html = H1.replace_all(&html, "<h1>$1</h1>");
    let html = STRONG.replace_all(&html, "<strong>$1</strong>");
    let html = EM.replace_all(&html, "<em>$1</em>");
    let html = CODE.replace_all(&html, "<code>$1</code>");
    classify_blocks(&html)
}

/// The block-level pass: a line-state machine that opens and closes list
/// tags and wraps loose text lines in paragraphs.
///
/// The two list flags are mutually exclusive; switching list kinds closes
/// the open list before opening the other. This operates on the line
/// sequence produced by the header and inline substitutions, so the `<`
/// check sees substituted text: a line that begins with an emphasis or
/// code span already starts with a tag and is emitted without a paragraph
/// wrapper.
fn classify_blocks(html: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_ul = false;
    let mut in_ol = false;

    for line in html.split('\n') {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("- ") {
            if !in_ul {
                if in_ol {
                    out.push(String::from("</ol>"));
                    in_ol = false;
                }
                out.push(String::from("<ul>"));
                in_ul = true;
            }
            out.push(format!("<li>{}</li>", rest.trim()));
        } else if ORDERED_ITEM.is_match(trimmed) {
            if !in_ol {
                if in_ul {
                    out.push(String::from("</ul>"));
                    in_ul = false;
                }
                out.push(String::from("<ol>"));
                in_ol = true;
            }
            out.push(format!("<li>{}</li>", ORDERED_ITEM.replace(trimmed, "")));
        } else {
            if in_ul {
                out.push(String::from("</ul>"));
                in_ul = false;
            }
            if in_ol {
                out.push(String::from("</ol>"));
                in_ol = false;
            }
            if !trimmed.is_empty() && !trimmed.starts_with('<') {
                out.push(format!("<p>{}</p>", trimmed));
            } else {
                // Blank lines and lines already carrying markup keep their
                // original form, indentation included.
                out.push(line.to_owned());
            }
        }
    }

    if in_ul {
        out.push(String::from("</ul>"));
    }
    if in_ol {
        out.push(String::from("</ol>"));
    }

    out.join("\n")
}
