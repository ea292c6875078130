//! Best-effort normalization of near-valid JSON text prior to parsing.
//!
//! The output is not guaranteed to parse; callers must still run a real
//! parser over it and surface that parser's error on failure. Fence and
//! quote cleanup is not string-literal aware, so only reach for this after
//! a plain parse of the raw text has already failed.

/// Clean up common artifacts in uploaded JSON text: UTF-8 BOM, markdown
/// code fences, smart quotes, and trailing commas. Pure, no I/O.
pub fn repair(text: &str) -> String {
    let text = text.trim_start_matches('\u{feff}').trim();
    let text = strip_code_fence(text);
    let text = normalize_quotes(text);
    strip_trailing_commas(&text)
}

/// Unwrap ```json ... ``` or ``` ... ``` blocks around the payload.
fn strip_code_fence(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let body_start = start + 7;
        if let Some(end) = text[body_start..].find("```") {
            return text[body_start..body_start + end].trim();
        }
    }
    if let Some(start) = text.find("```") {
        let body_start = start + 3;
        if let Some(end) = text[body_start..].find("```") {
            return text[body_start..body_start + end].trim();
        }
    }
    text
}

/// Replace typographic quotes produced by word processors with ASCII ones.
fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Drop commas that directly precede a closing brace or bracket.
/// Commas inside string literals are left alone.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                match next {
                    Some('}') | Some(']') => {}
                    _ => out.push(c),
                }
            }
            _ => out.push(c),
        }
    }

    out
}
