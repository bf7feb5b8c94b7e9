//! Plain-text rendering of the delta.

use std::io::{self, Write};

use crate::models::CandidateRecord;

const HEADER_TEMPLATE: &str = "{url}\n{language} | stars {stars} | forks {forks} | via {source}";

/// Render one record as a block of lines.
pub fn render_record(record: &CandidateRecord) -> String {
    let mut out = record.format(HEADER_TEMPLATE);
    if let Some(homepage) = &record.homepage {
        out.push('\n');
        out.push_str(homepage);
    }
    if let Some(description) = &record.description {
        out.push_str("\n\n");
        out.push_str(description);
    }
    out
}

/// Render the delta as numbered blocks separated by blank lines.
pub fn render(records: &[CandidateRecord]) -> String {
    if records.is_empty() {
        return "No new repositories.\n".to_string();
    }

    let total = records.len();
    let width = total.to_string().len();
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!("[{:>width$}/{}] {}\n", i + 1, total, record.id));
        out.push_str(&render_record(record));
        out.push_str("\n\n");
    }
    out
}

/// Write rendered output, treating a closed reader (`gh-watch run | head`)
/// as success.
pub fn write_output<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}
