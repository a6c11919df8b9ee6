//! Keyword-indented SQL layout.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Keywords that start a new indented line, in application order.
///
/// Order matters: each rule runs on the output of the previous ones, so
/// `join` splits `left join` before the `left join` rule gets to see it.
pub const LINE_BREAK_KEYWORDS: [&str; 13] = [
    "ALTER",
    "ALGORITHM",
    "DEFINER",
    "SQL SECURITY",
    "VIEW",
    "AS select",
    "from",
    "join",
    "left join",
    "where",
    "group by",
    "having",
    "order by",
];

const INDENT: &str = "\n    ";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("static regex"));

static KEYWORD_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    LINE_BREAK_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw))).expect("keyword regex"))
        .collect()
});

/// Lay out a statement one clause per line.
///
/// Whitespace is collapsed first, then a newline and four spaces go in front
/// of every whole-word, case-insensitive keyword match (the matched text is
/// kept as written). Blank lines are dropped, lines right-trimmed, and a
/// trailing `;` added when missing. Blank input gives an empty string.
pub fn format_sql(sql: &str) -> String {
    let sql = sql.trim();
    if sql.is_empty() {
        return String::new();
    }

    let mut out = WHITESPACE.replace_all(sql, " ").into_owned();
    for rule in KEYWORD_RULES.iter() {
        out = rule
            .replace_all(&out, |caps: &Captures| format!("{}{}", INDENT, &caps[0]))
            .into_owned();
    }

    let out = BLANK_LINES.replace_all(out.trim(), "\n");
    let mut out = out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    if !out.ends_with(';') {
        out.push(';');
    }
    out
}
