//! Streaming parser for delimited text

use std::io::Read;

use super::config::TextConfig;
use crate::common::Result;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Streaming parser for delimited text formats.
///
/// Every field is returned as text; no type inference is applied because the
/// pipeline needs the cell exactly as exported.
pub struct TextParser<R: Read> {
    reader: R,
    config: TextConfig,
    buffer: Vec<u8>,
    buffer_pos: usize,
    buffer_len: usize,
    at_start: bool,
    /// Byte read ahead while resolving a quote, replayed before the buffer
    pending: Option<u8>,
}

impl<R: Read> TextParser<R> {
    /// Create a new text parser
    pub fn new(reader: R, config: TextConfig) -> Self {
        let buffer_size = config.buffer_size.max(1);
        TextParser {
            reader,
            config,
            buffer: vec![0; buffer_size],
            buffer_pos: 0,
            buffer_len: 0,
            at_start: true,
            pending: None,
        }
    }

    /// Read the next byte, refilling the buffer as needed.
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }
        if self.buffer_pos >= self.buffer_len {
            self.buffer_len = self.reader.read(&mut self.buffer)?;
            self.buffer_pos = 0;
            if self.buffer_len == 0 {
                return Ok(None);
            }
        }
        let byte = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Ok(Some(byte))
    }

    /// Skip a UTF-8 byte order mark at the very start of the input.
    fn skip_bom(&mut self) -> Result<()> {
        self.at_start = false;
        let mut seen = Vec::with_capacity(UTF8_BOM.len());
        while seen.len() < UTF8_BOM.len() {
            match self.next_byte()? {
                Some(byte) if byte == UTF8_BOM[seen.len()] => seen.push(byte),
                Some(byte) => {
                    seen.push(byte);
                    break;
                }
                None => break,
            }
        }
        if seen != UTF8_BOM {
            // Not a BOM: put the bytes back in front of the buffer
            let rest = self.buffer[self.buffer_pos..self.buffer_len].to_vec();
            let mut replay = seen;
            replay.extend_from_slice(&rest);
            self.buffer = replay;
            self.buffer_len = self.buffer.len();
            self.buffer_pos = 0;
            if self.buffer.len() < self.config.buffer_size {
                self.buffer.resize(self.config.buffer_size, 0);
            }
        }
        Ok(())
    }

    /// Parse the next row from the input
    pub fn parse_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.at_start {
            self.skip_bom()?;
        }

        let mut fields = Vec::new();
        let mut current_field = Vec::new();
        let mut field_start = true;
        let mut in_quotes = false;
        let mut saw_any = false;

        loop {
            let Some(byte) = self.next_byte()? else {
                if in_quotes {
                    return Err(crate::common::Error::Parse(
                        "unterminated quoted field at end of input".to_string(),
                    ));
                }
                if saw_any {
                    self.finish_field(&mut current_field, &mut fields);
                    return Ok(Some(fields));
                }
                return Ok(None);
            };
            saw_any = true;

            match byte {
                b'\n' if !in_quotes => {
                    self.finish_field(&mut current_field, &mut fields);
                    return Ok(Some(fields));
                }
                b'\r' if !in_quotes => {
                    // Handle CRLF - just skip CR, let LF handle the line end
                    continue;
                }
                quote if quote == self.config.quote => {
                    if in_quotes {
                        match self.next_byte()? {
                            // Escaped quote (doubled quote)
                            Some(next) if next == self.config.quote => current_field.push(quote),
                            // Closing quote
                            Some(next) => {
                                in_quotes = false;
                                self.pending = Some(next);
                            }
                            None => in_quotes = false,
                        }
                    } else if field_start {
                        in_quotes = true;
                        field_start = false;
                    } else {
                        // Stray quote inside an unquoted field is literal
                        current_field.push(quote);
                    }
                }
                delim if delim == self.config.delimiter && !in_quotes => {
                    self.finish_field(&mut current_field, &mut fields);
                    field_start = true;
                }
                _ => {
                    if field_start && fields.is_empty() && self.config.comment == Some(byte) {
                        // Comment line, skip to end of line
                        while let Some(b) = self.next_byte()? {
                            if b == b'\n' {
                                break;
                            }
                        }
                        return self.parse_row();
                    }
                    current_field.push(byte);
                    field_start = false;
                }
            }
        }
    }

    /// Finish parsing a field and add it to the fields vector
    fn finish_field(&self, current_field: &mut Vec<u8>, fields: &mut Vec<String>) {
        let field_bytes = std::mem::take(current_field);

        // Handle invalid UTF-8 by replacing invalid sequences
        let field_str = match String::from_utf8(field_bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        if self.config.trim_whitespace {
            fields.push(field_str.trim().to_string());
        } else {
            fields.push(field_str);
        }
    }
}

impl<R: Read> Iterator for TextParser<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_row().transpose()
    }
}
