//! Turning an analyze response into region content.

use crate::masking::wrap_tokens;
use serde_json::{Number, Value};

/// Entry shown in the list region when nothing was detected.
pub const NO_SENSITIVE_DATA: &str = "No sensitive data detected.";

const MASKED_SPAN_OPEN: &str = "<span class=\"masked\">";
const MASKED_SPAN_CLOSE: &str = "</span>";

/// Escapes text for inclusion in HTML markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders masked text as markup, wrapping each `[MASKED_<label>]` token in
/// a `masked` span. Everything else is escaped.
#[must_use]
pub fn render_masked_markup(ai_view: &str) -> String {
    wrap_tokens(&escape_html(ai_view), MASKED_SPAN_OPEN, MASKED_SPAN_CLOSE)
}

/// Renders the list region entries.
#[must_use]
pub fn render_label_entries(detected: &[String]) -> Vec<String> {
    if detected.is_empty() {
        vec![NO_SENSITIVE_DATA.to_string()]
    } else {
        detected.to_vec()
    }
}

/// Pretty-prints the analysis with two-space indentation, formatting numbers
/// the way the browser page's `JSON.stringify` does.
#[must_use]
pub fn render_analysis(analysis: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, analysis, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => write_string(out, s),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push(']');
        },
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_string(out, key);
                out.push_str(": ");
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push('}');
        },
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    out.push_str(&"  ".repeat(depth));
}

fn write_string(out: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => out.push_str("\"\""),
    }
}

/// Formats a number as JavaScript's `Number.prototype.toString` would.
fn format_number(n: &Number) -> String {
    if n.is_u64() || n.is_i64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64().filter(|f| f.is_finite()) else {
        return "null".to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if f.fract() == 0.0 && magnitude < 1e21 {
        return format!("{f:.0}");
    }
    if magnitude >= 1e21 || magnitude < 1e-6 {
        // Rust writes `1e21` and `1e-7`; JavaScript signs positive exponents.
        let exp = format!("{f:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    f.to_string()
}

/// Converts masked markup into terminal text, optionally highlighting
/// masked tokens with ANSI bold yellow.
#[must_use]
pub fn markup_to_terminal(markup: &str, color: bool) -> String {
    let (open, close) = if color {
        ("\x1b[1;33m", "\x1b[0m")
    } else {
        ("", "")
    };

    unescape_html(
        &markup
            .replace(MASKED_SPAN_OPEN, open)
            .replace(MASKED_SPAN_CLOSE, close),
    )
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
