//! Scan buffer for barcode/QR triggered checkout
//!
//! A scanner types an identifier one character at a time into a text field.
//! Once the buffer reaches the minimum length it is compared against the
//! active identifiers; an exact match fires a checkout.

use crate::types::{normalize_scan, Sku};

/// Shortest identifier a scanner can produce ("H" + brand prefix + 4 digits)
pub const DEFAULT_SCAN_MIN_LENGTH: usize = 7;

/// What the current buffer content amounts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// Still below the minimum length
    Pending,
    /// Long enough but not an active identifier
    NoMatch,
    /// Exactly matches an active identifier
    Match(Sku),
}

/// Incrementally filled scan input
#[derive(Debug, Clone)]
pub struct ScanBuffer {
    buffer: String,
    min_length: usize,
}

impl Default for ScanBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_MIN_LENGTH)
    }
}

impl ScanBuffer {
    pub fn new(min_length: usize) -> Self {
        Self {
            buffer: String::new(),
            min_length: min_length.max(1),
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Current normalized content; inner spaces of padded prefixes are kept
    pub fn value(&self) -> &str {
        self.buffer.trim()
    }

    /// Replace the whole buffer (text field `onChange`)
    pub fn set(&mut self, raw: &str) {
        self.buffer = normalize_scan(raw);
    }

    /// Append scanner keystrokes; trimming waits until the buffer is read
    pub fn push_str(&mut self, raw: &str) {
        self.buffer.push_str(&raw.to_uppercase());
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn is_ready(&self) -> bool {
        self.value().chars().count() >= self.min_length
    }

    /// Compare the buffer against the active identifiers
    pub fn evaluate<'a, I>(&self, active: I) -> ScanState
    where
        I: IntoIterator<Item = &'a Sku>,
    {
        if !self.is_ready() {
            return ScanState::Pending;
        }
        active
            .into_iter()
            .find(|id| id.as_str() == self.value())
            .map(|id| ScanState::Match(id.clone()))
            .unwrap_or(ScanState::NoMatch)
    }
}
