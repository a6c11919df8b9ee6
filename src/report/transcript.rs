//! Writer for the dumper transcript read back by [`ReportParser`](super::ReportParser).

use std::io::{self, Write};

use colored::*;

use super::markers::{
    rule, ALTER_HEADER, CONNECTED_PREFIX, CREATE_HEADER, DATABASE_LABEL, OBJECT_LABEL,
    OBJECT_PREFIX, SERVER_PREFIX, TYPE_LABEL,
};

/// Writes transcript lines. Labels are colored only when asked to, so a
/// transcript sent to a file stays parseable.
pub struct TranscriptWriter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TranscriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, color: false }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: &str, paint: fn(&str) -> ColoredString) -> String {
        if self.color {
            paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// `Connected to <source> (<hostname>): ✓`
    pub fn connected(&mut self, source: &str, hostname: &str) -> io::Result<()> {
        let tick = self.paint("✓", |s| s.green());
        writeln!(self.out, "{} {} ({}): {}", CONNECTED_PREFIX, source, hostname, tick)?;
        writeln!(self.out)
    }

    pub fn server(&mut self, server: &str, database: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{} {}, {} {}",
            SERVER_PREFIX, server, DATABASE_LABEL, database
        )
    }

    pub fn object(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{} {}", OBJECT_PREFIX, name)
    }

    /// Object/Type echo followed by the framed CREATE statement.
    pub fn create_statement(&mut self, name: &str, kind: &str, sql: &str) -> io::Result<()> {
        let object = self.paint(OBJECT_LABEL.trim_end_matches(':'), |s| s.yellow());
        let typ = self.paint(TYPE_LABEL.trim_end_matches(':'), |s| s.yellow());
        writeln!(self.out, "{}: {}", object, name)?;
        writeln!(self.out, "{}: {}", typ, kind)?;
        self.section(CREATE_HEADER, sql)
    }

    pub fn alter_statement(&mut self, sql: &str) -> io::Result<()> {
        self.section(ALTER_HEADER, sql)
    }

    fn section(&mut self, header: &str, body: &str) -> io::Result<()> {
        let title = self.paint(header.trim_end_matches(':'), |s| s.green());
        writeln!(self.out, "{}:", title)?;
        writeln!(self.out, "{}", rule())?;
        writeln!(self.out, "{}", body)?;
        writeln!(self.out, "{}", rule())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
