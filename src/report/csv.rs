//! CSV rendering, one file per non-empty category

use crate::findings::Finding;
use ::csv::{Terminator, WriterBuilder};

/// Header from the first finding's field names, then one row per finding,
/// CRLF-terminated and quoted where needed. Returns `None` for an empty
/// slice; empty categories get no file.
pub fn render_csv(findings: &[Finding]) -> Option<String> {
    let first = findings.first()?;
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(vec![]);

    let header: Vec<&str> = first.columns().into_iter().map(|(name, _)| name).collect();
    wtr.write_record(&header).ok()?;

    for finding in findings {
        let values: Vec<String> = finding.columns().into_iter().map(|(_, v)| v).collect();
        wtr.write_record(&values).ok()?;
    }

    wtr.into_inner()
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}
