//! Line vocabulary of the dumper transcript.
//!
//! Both the [`TranscriptWriter`](super::TranscriptWriter) and the
//! [`ReportParser`](super::ReportParser) use these markers, so the two sides
//! cannot drift apart.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, rest},
    sequence::{preceded, separated_pair},
    IResult,
};

pub const SERVER_PREFIX: &str = "Source server:";
pub const DATABASE_LABEL: &str = "Database:";
pub const OBJECT_PREFIX: &str = "Processing view:";
pub const CREATE_HEADER: &str = "Create Statement:";
pub const ALTER_HEADER: &str = "ALTER VIEW Statement:";
pub const CONNECTED_PREFIX: &str = "Connected to";
pub const OBJECT_LABEL: &str = "Object:";
pub const TYPE_LABEL: &str = "Type:";

/// Width of the dash rule framing a statement section.
pub const RULE_WIDTH: usize = 80;

/// Shortest run of dashes accepted as a rule line.
const MIN_RULE: usize = 3;

/// Classification of one trimmed transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Server { server: &'a str, database: &'a str },
    Object(&'a str),
    CreateHeader,
    AlterHeader,
    Rule,
    /// Banner, `Object:`/`Type:` echo, or an unusable server line.
    Metadata,
    Blank,
    Text(&'a str),
}

/// Classify a line. The caller trims it first.
pub fn classify(line: &str) -> Line<'_> {
    if line.is_empty() {
        return Line::Blank;
    }

    if line.starts_with(SERVER_PREFIX) {
        return match server_announcement(line) {
            Ok((_, (server, database))) => Line::Server {
                server: server.trim(),
                database: strip_database_label(database.trim()),
            },
            Err(_) => Line::Metadata,
        };
    }

    if let Ok((_, name)) = object_announcement(line) {
        return Line::Object(name.trim());
    }

    if line == CREATE_HEADER {
        return Line::CreateHeader;
    }
    if line == ALTER_HEADER {
        return Line::AlterHeader;
    }
    if is_rule(line) {
        return Line::Rule;
    }
    if metadata(line).is_ok() {
        return Line::Metadata;
    }

    Line::Text(line)
}

/// `Source server: <host>, Database: <db>`
fn server_announcement(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        tag(SERVER_PREFIX),
        separated_pair(
            take_till(|c: char| c == ','),
            char(','),
            take_till(|c: char| c == ','),
        ),
    )(input)
}

/// `Processing view: <name>`
fn object_announcement(input: &str) -> IResult<&str, &str> {
    preceded(tag(OBJECT_PREFIX), rest)(input)
}

fn metadata(input: &str) -> IResult<&str, &str> {
    alt((tag(CONNECTED_PREFIX), tag(OBJECT_LABEL), tag(TYPE_LABEL)))(input)
}

/// A line made only of dashes, at least three long. Unlike a plain
/// `---` prefix check, `--- note` is not a rule and stays section text.
pub fn is_rule(line: &str) -> bool {
    all_consuming(take_while_m_n::<_, _, nom::error::Error<&str>>(
        MIN_RULE,
        usize::MAX,
        |c: char| c == '-',
    ))(line)
    .is_ok()
}

fn strip_database_label(part: &str) -> &str {
    part.strip_prefix(DATABASE_LABEL)
        .map(str::trim)
        .unwrap_or(part)
}

/// The dash rule framing statement sections.
pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_line() {
        assert_eq!(
            classify("Source server: db-01, Database: sales"),
            Line::Server {
                server: "db-01",
                database: "sales"
            }
        );
    }

    #[test]
    fn test_server_line_without_label() {
        assert_eq!(
            classify("Source server: db-01,sales"),
            Line::Server {
                server: "db-01",
                database: "sales"
            }
        );
    }

    #[test]
    fn test_server_line_without_comma_is_dropped() {
        assert_eq!(classify("Source server: db-01"), Line::Metadata);
    }

    #[test]
    fn test_rules() {
        assert!(is_rule("---"));
        assert!(is_rule(&rule()));
        assert!(!is_rule("--"));
        assert!(!is_rule("--- trailing comment"));
        assert_eq!(classify(&rule()), Line::Rule);
    }

    #[test]
    fn test_headers_are_exact() {
        assert_eq!(classify("Create Statement:"), Line::CreateHeader);
        assert_eq!(classify("ALTER VIEW Statement:"), Line::AlterHeader);
        assert_eq!(
            classify("create statement:"),
            Line::Text("create statement:")
        );
    }

    #[test]
    fn test_metadata_and_text() {
        assert_eq!(classify("Connected to db-01 (ip-10-0-0-1): ✓"), Line::Metadata);
        assert_eq!(classify("Object: v_sales"), Line::Metadata);
        assert_eq!(classify("Type: VIEW"), Line::Metadata);
        assert_eq!(classify("select 1"), Line::Text("select 1"));
        assert_eq!(classify(""), Line::Blank);
    }

    #[test]
    fn test_object_line() {
        assert_eq!(classify("Processing view:  v_sales "), Line::Object("v_sales"));
    }
}
