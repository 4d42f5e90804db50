//! Text normalization applied to raw extracted resume/job text before any field extraction.

/// Characters dropped outright: BOM, zero-width joiners/spaces, soft hyphen.
const INVISIBLE: &[char] = &['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{ad}'];

/// Cleans raw text: unified line breaks, no control characters, re-joined
/// hyphenation, collapsed whitespace, at most one blank line between paragraphs.
pub fn normalize_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let cleaned: String = unified
        .chars()
        .filter(|c| !INVISIBLE.contains(c))
        .map(|c| {
            if c == '\n' {
                c
            } else if c.is_control() || c.is_whitespace() {
                ' '
            } else {
                c
            }
        })
        .collect();

    let lines: Vec<String> = cleaned.split('\n').map(collapse_spaces).collect();
    let lines = join_hyphenated(lines);

    let mut out = String::with_capacity(cleaned.len());
    let mut pending_blank = false;
    for line in lines {
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        out.push_str(&line);
        pending_blank = false;
    }
    out
}

fn collapse_spaces(line: &str) -> String {
    line.split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merges `experi-` + `ence` across a line break when both sides are letters.
fn join_hyphenated(lines: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(prev) = merged.last_mut() {
            let continues_word = line.chars().next().is_some_and(|c| c.is_lowercase());
            let broken = prev.len() > 1
                && prev.ends_with('-')
                && prev[..prev.len() - 1]
                    .chars()
                    .last()
                    .is_some_and(|c| c.is_alphabetic());
            if broken && continues_word {
                prev.pop();
                match line.split_once(' ') {
                    Some((head, tail)) => {
                        prev.push_str(head);
                        merged.push(tail.to_string());
                    }
                    None => prev.push_str(&line),
                }
                continue;
            }
        }
        merged.push(line);
    }
    merged
}
