//! JSON Lines input and output.
//!
//! Input is one [`Document`] object per line; blank lines are skipped.
//! Output is one object per line, in input order.

use std::io::{BufRead, Write};

use matcher::{Decision, Document};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(serde_json::Error),
}

/// Read every document from `reader`.
pub fn read_documents<R: BufRead>(reader: R) -> Result<Vec<Document>, JsonlError> {
    let mut docs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc = serde_json::from_str(&line).map_err(|source| JsonlError::Parse {
            line: idx + 1,
            source,
        })?;
        docs.push(doc);
    }
    Ok(docs)
}

/// Write one decision per line.
pub fn write_decisions<W: Write>(writer: W, decisions: &[Decision]) -> Result<(), JsonlError> {
    write_lines(writer, decisions)
}

/// Write the documents whose decision is `Kept`, in input order.
///
/// `docs` and `decisions` are matched by position, as produced by one run.
pub fn write_kept<W: Write>(
    writer: W,
    docs: &[Document],
    decisions: &[Decision],
) -> Result<(), JsonlError> {
    let kept: Vec<&Document> = docs
        .iter()
        .zip(decisions)
        .filter(|(_, decision)| decision.is_kept())
        .map(|(doc, _)| doc)
        .collect();
    write_lines(writer, &kept)
}

fn write_lines<W: Write, T: Serialize>(mut writer: W, records: &[T]) -> Result<(), JsonlError> {
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(JsonlError::Encode)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
