//! Incremental extraction of `contents` array elements from a growing,
//! possibly truncated `{"contents":[ ... ]}` document.
//!
//! The scanner only looks at ASCII structural bytes (`{ } [ ] " \ ,`), so byte
//! offsets it produces always fall on UTF-8 character boundaries.

use serde_json::Value;
use thiserror::Error;
use crate::config::constants::CONTENTS_KEY;
use crate::structs::extracted_element::ExtractedElement;
use crate::structs::extraction_batch::ExtractionBatch;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("element #{index} is not valid JSON: {reason}")]
    Malformed { index: usize, reason: String },
}

impl FragmentError {
    pub fn index(&self) -> usize {
        match self {
            Self::Malformed { index, .. } => *index,
        }
    }
}

/// Scan state carried between calls. Everything before `scan_offset` has
/// already been surfaced; nothing is global.
#[derive(Debug, Clone, Default)]
pub struct FragmentParser {
    array_start: Option<usize>,
    scan_offset: usize,
    emitted_count: usize,
    array_closed: bool,
}

impl FragmentParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted_count(&self) -> usize {
        self.emitted_count
    }

    pub fn is_array_located(&self) -> bool {
        self.array_start.is_some()
    }

    pub fn is_array_closed(&self) -> bool {
        self.array_closed
    }

    /// Extract elements that became complete once `chunk` is appended to
    /// `previous`. Repeating a call with the same pair yields nothing new.
    pub fn try_extract_new_elements(&mut self, previous: &str, chunk: &str) -> ExtractionBatch {
        let mut buffer = String::with_capacity(previous.len() + chunk.len());
        buffer.push_str(previous);
        buffer.push_str(chunk);

        let elements = self.extract_from(&buffer);
        ExtractionBatch { elements, buffer }
    }

    /// Same as [`Self::try_extract_new_elements`] for callers that already
    /// hold the accumulated buffer.
    pub fn extract_from(&mut self, buffer: &str) -> Vec<ExtractedElement> {
        let mut found = Vec::new();

        if self.array_start.is_none() {
            match locate_contents_array(buffer) {
                Some(start) => {
                    log::debug!("📍 contents array located at byte {}", start);
                    self.array_start = Some(start);
                    self.scan_offset = start;
                }
                None => return found,
            }
        }

        if !buffer.is_char_boundary(self.scan_offset) {
            log::warn!(
                "⚠️ Buffer no longer matches scanned offset {} ({} bytes), ignoring",
                self.scan_offset,
                buffer.len()
            );
            return found;
        }

        let bytes = buffer.as_bytes();
        let mut cursor = self.scan_offset;

        while !self.array_closed {
            cursor = skip_separators(bytes, cursor);
            if cursor >= bytes.len() {
                break;
            }

            if bytes[cursor] == b']' {
                self.array_closed = true;
                self.scan_offset = cursor + 1;
                break;
            }

            // An object closer can't start an element; the model closed `{` without `]`.
            if bytes[cursor] == b'}' {
                log::warn!("⚠️ Skipping stray '}}' at byte {} in contents array", cursor);
                cursor += 1;
                self.scan_offset = cursor;
                continue;
            }

            let Some(end) = find_element_end(bytes, cursor) else {
                break;
            };

            found.push(self.cut_element(&buffer[cursor..end], false));
            self.scan_offset = end;
            cursor = end;
        }

        found
    }

    /// Unconsumed content after the last closed element, if any.
    pub fn trailing<'a>(&self, buffer: &'a str) -> Option<&'a str> {
        if self.array_closed {
            return None;
        }

        let start = match self.array_start {
            Some(_) => skip_separators(buffer.as_bytes(), self.scan_offset.min(buffer.len())),
            None => 0,
        };

        let rest = buffer.get(start..)?.trim();
        (!rest.is_empty()).then_some(rest)
    }

    /// Best-effort recovery of a truncated trailing element. Returns `None`
    /// when nothing parseable can be made of it.
    pub fn recover_trailing(&mut self, buffer: &str) -> Option<ExtractedElement> {
        self.array_start?;
        let trailing = self.trailing(buffer)?;
        let repaired = repair_truncated(trailing)?;

        serde_json::from_str::<Value>(&repaired).ok()?;
        let element = self.cut_element(&repaired, true);
        self.array_closed = true;
        self.scan_offset = buffer.len();
        Some(element)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn cut_element(&mut self, raw: &str, repaired: bool) -> ExtractedElement {
        let index = self.emitted_count;
        self.emitted_count += 1;

        let parsed = serde_json::from_str::<Value>(raw).map_err(|e| FragmentError::Malformed {
            index,
            reason: e.to_string(),
        });

        ExtractedElement {
            index,
            raw: raw.to_string(),
            parsed,
            repaired,
        }
    }
}

/// Byte offset just past the `[` that opens the top-level `contents` array.
fn locate_contents_array(buffer: &str) -> Option<usize> {
    let bytes = buffer.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = find_string_end(bytes, i)?;
                if depth == 1 && &buffer[i + 1..end] == CONTENTS_KEY {
                    let colon = skip_whitespace(bytes, end + 1);
                    if colon >= bytes.len() {
                        return None;
                    }
                    if bytes[colon] == b':' {
                        let open = skip_whitespace(bytes, colon + 1);
                        if open >= bytes.len() {
                            return None;
                        }
                        if bytes[open] == b'[' {
                            return Some(open + 1);
                        }
                    }
                }
                i = end + 1;
            }
            b'{' | b'[' => {
                depth += 1;
                i += 1;
            }
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            _ => i += 1,
        }
    }

    None
}

/// Index of the closing quote of the string opening at `start`.
fn find_string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Exclusive end of the value starting at `start`, or `None` while it is
/// still open.
fn find_element_end(bytes: &[u8], start: usize) -> Option<usize> {
    match bytes[start] {
        b'{' | b'[' => {
            let mut depth = 0usize;
            let mut i = start;
            while i < bytes.len() {
                match bytes[i] {
                    b'"' => i = find_string_end(bytes, i)?,
                    b'{' | b'[' => depth += 1,
                    b'}' | b']' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i + 1);
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            None
        }
        b'"' => find_string_end(bytes, start).map(|end| end + 1),
        _ => {
            // Bare scalar: only complete once a delimiter follows it. The first
            // byte is never a delimiter, so the element is never empty.
            let mut i = start + 1;
            while i < bytes.len() {
                match bytes[i] {
                    b',' | b']' | b'}' => return Some(i),
                    b if b.is_ascii_whitespace() => return Some(i),
                    _ => i += 1,
                }
            }
            None
        }
    }
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn skip_separators(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b',') {
        i += 1;
    }
    i
}

/// Close an open string, drop a dangling separator and balance brackets.
fn repair_truncated(fragment: &str) -> Option<String> {
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in fragment.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                if closers.pop() != Some(c) {
                    return None;
                }
            }
            _ => {}
        }
    }

    let mut repaired = fragment.to_string();
    if in_string {
        if escaped {
            repaired.pop();
        }
        repaired.push('"');
    }

    let trimmed_len = repaired.trim_end().len();
    repaired.truncate(trimmed_len);
    if repaired.ends_with(',') {
        repaired.pop();
    } else if repaired.ends_with(':') {
        repaired.push_str("null");
    }

    repaired.extend(closers.iter().rev());
    Some(repaired)
}
