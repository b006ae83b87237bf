//! Fixed-width return-file parsing

use serde::{Deserialize, Serialize};

use crate::types::ChargeStatus;

/// Marker of a transaction record; other prefixes are header/trailer records
const TRANSACTION_MARKER: char = 'T';

/// Character offset and width of the charge identifier field
const IDENTIFIER_START: usize = 1;
const IDENTIFIER_WIDTH: usize = 16;

/// Character offset and width of the occurrence code field
const OCCURRENCE_START: usize = 17;
const OCCURRENCE_WIDTH: usize = 2;

/// Occurrence codes the bank reports for settled charges
const PAID_OCCURRENCE_CODES: [&str; 2] = ["00", "PG"];

/// Outcome of one transaction record in a return file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// Identifier of the charge the record refers to
    pub charge_id: String,
    /// Two-character occurrence code reported by the bank
    pub occurrence_code: String,
}

impl ReconciliationOutcome {
    /// A record missing its identifier or occurrence code must never be
    /// applied to a charge.
    pub fn is_well_formed(&self) -> bool {
        !self.charge_id.is_empty() && !self.occurrence_code.is_empty()
    }

    /// Status the occurrence code resolves to, or `None` for a malformed
    /// record.
    pub fn resolved_status(&self) -> Option<ChargeStatus> {
        if !self.is_well_formed() {
            return None;
        }

        if PAID_OCCURRENCE_CODES.contains(&self.occurrence_code.as_str()) {
            Some(ChargeStatus::Paid)
        } else {
            Some(ChargeStatus::Rejected(self.occurrence_code.clone()))
        }
    }
}

/// Lazy cursor over the transaction records of a return file.
///
/// The cursor holds no state beyond its position in the buffer, so re-parsing
/// the same bytes always yields the same sequence.
#[derive(Debug, Clone)]
pub struct ReturnFileParser {
    text: String,
    pos: usize,
}

/// Parse raw return-file bytes into reconciliation outcomes.
///
/// Input is decoded as UTF-8 with invalid bytes replaced; records are
/// separated by `\n` or `\r\n`. Blank lines and lines not starting with the
/// transaction marker are skipped. Fields shorter than their fixed width come
/// out empty and make the outcome malformed.
pub fn parse_return_file(content: &[u8]) -> ReturnFileParser {
    ReturnFileParser {
        text: String::from_utf8_lossy(content).into_owned(),
        pos: 0,
    }
}

impl Iterator for ReturnFileParser {
    type Item = ReconciliationOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let rest = &self.text[self.pos..];
            let (line, advance) = match rest.find('\n') {
                Some(index) => (&rest[..index], index + 1),
                None => (rest, rest.len()),
            };
            self.pos += advance;

            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() || !line.starts_with(TRANSACTION_MARKER) {
                continue;
            }

            return Some(ReconciliationOutcome {
                charge_id: field(line, IDENTIFIER_START, IDENTIFIER_WIDTH),
                occurrence_code: field(line, OCCURRENCE_START, OCCURRENCE_WIDTH),
            });
        }

        None
    }
}

/// Extract a trimmed fixed-width field by character offset
fn field(line: &str, start: usize, width: usize) -> String {
    line.chars()
        .skip(start)
        .take(width)
        .collect::<String>()
        .trim()
        .to_string()
}
