// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Translation from producer offsets to byte offsets.
//!
//! ESTree producers written in JavaScript (acorn, espree) report `start`
//! and `end` in UTF-16 code units. Node spans keep those units so positions
//! in reports match the producer; slicing the UTF-8 source goes through a
//! [`SourceIndex`] first.

use shapefinder_core::Span;

/// Maps UTF-16 offsets in a source text to UTF-8 byte offsets.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    /// Byte offset for each UTF-16 offset, `None` between the halves of a
    /// surrogate pair. Empty for ASCII sources, where both units agree.
    utf16_to_byte: Vec<Option<usize>>,
}

impl SourceIndex {
    pub fn new(source: &str) -> Self {
        if source.is_ascii() {
            return SourceIndex::default();
        }
        let mut utf16_to_byte = Vec::with_capacity(source.len() + 1);
        for (byte, ch) in source.char_indices() {
            utf16_to_byte.push(Some(byte));
            if ch.len_utf16() == 2 {
                utf16_to_byte.push(None);
            }
        }
        utf16_to_byte.push(Some(source.len()));
        SourceIndex { utf16_to_byte }
    }

    /// Byte offset of a UTF-16 offset, or `None` past the end of the source
    /// or inside a surrogate pair.
    pub fn byte_offset(&self, offset: u64) -> Option<u64> {
        if self.utf16_to_byte.is_empty() {
            return Some(offset);
        }
        let index = usize::try_from(offset).ok()?;
        let byte = (*self.utf16_to_byte.get(index)?)?;
        u64::try_from(byte).ok()
    }

    /// The byte span covering the same text as a producer span.
    pub fn byte_span(&self, span: Span) -> Option<Span> {
        Span::try_new(self.byte_offset(span.start)?, self.byte_offset(span.end)?)
    }
}
