//! Streaming transcript parser.

use tracing::{debug, warn};

use super::markers::{classify, Line};
use super::ObjectRecord;

/// Where the scan is relative to the statement sections of the current object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    AwaitingCreateDelim,
    InCreate,
    AwaitingAlterDelim,
    InAlter,
}

impl Section {
    /// Transition on a dash rule: the first rule after a header opens the
    /// capture, the next one closes it. Stray rules are ignored.
    fn on_rule(self) -> Self {
        match self {
            Section::AwaitingCreateDelim => Section::InCreate,
            Section::AwaitingAlterDelim => Section::InAlter,
            Section::InCreate | Section::InAlter | Section::None => Section::None,
        }
    }
}

/// Record under construction. Buffers hold the captured lines in order.
#[derive(Debug)]
struct PendingRecord {
    server: String,
    database: String,
    name: String,
    create: Vec<String>,
    alter: Vec<String>,
}

impl PendingRecord {
    fn finish(self) -> ObjectRecord {
        ObjectRecord {
            server: self.server,
            database: self.database,
            name: self.name,
            create_sql: self.create.join("\n").trim().to_string(),
            alter_sql: self.alter.join("\n").trim().to_string(),
        }
    }
}

/// Left-to-right transcript scanner.
///
/// Feed lines with [`feed_line`](Self::feed_line) and collect the records with
/// [`finish`](Self::finish). Malformed input never fails the scan: a section
/// whose delimiters never show up simply ends with an empty buffer.
#[derive(Debug, Default)]
pub struct ReportParser {
    server: String,
    database: String,
    announced: bool,
    current: Option<PendingRecord>,
    section: Section,
    records: Vec<ObjectRecord>,
}

impl ReportParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Records finalized so far (the in-progress one is not included).
    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    pub fn feed_line(&mut self, raw: &str) {
        match classify(raw.trim()) {
            Line::Server { server, database } => {
                debug!(server, database, "server announcement");
                self.server = server.to_string();
                self.database = database.to_string();
                self.announced = true;
            }
            Line::Object(name) => {
                self.flush();
                if !self.announced {
                    warn!(view = name, "view announced before any source server line");
                }
                debug!(view = name, database = %self.database, "starting view");
                self.current = Some(PendingRecord {
                    server: self.server.clone(),
                    database: self.database.clone(),
                    name: name.to_string(),
                    create: Vec::new(),
                    alter: Vec::new(),
                });
                self.section = Section::None;
            }
            Line::CreateHeader => self.section = Section::AwaitingCreateDelim,
            Line::AlterHeader => self.section = Section::AwaitingAlterDelim,
            Line::Rule => {
                let next = self.section.on_rule();
                debug!(from = ?self.section, to = ?next, "rule line");
                self.section = next;
            }
            Line::Metadata | Line::Blank => {}
            Line::Text(text) => self.capture(text),
        }
    }

    fn capture(&mut self, text: &str) {
        let Some(record) = self.current.as_mut() else {
            return;
        };
        match self.section {
            Section::InCreate => record.create.push(text.to_string()),
            Section::InAlter => record.alter.push(text.to_string()),
            _ => {}
        }
    }

    fn flush(&mut self) {
        if let Some(pending) = self.current.take() {
            if pending.name.is_empty() {
                return;
            }
            let record = pending.finish();
            debug!(
                view = %record.name,
                create_len = record.create_sql.len(),
                alter_len = record.alter_sql.len(),
                "parsed view"
            );
            self.records.push(record);
        }
    }

    /// Finalize the open record, if any, and return everything in first-seen order.
    pub fn finish(mut self) -> Vec<ObjectRecord> {
        self.flush();
        self.records
    }
}
