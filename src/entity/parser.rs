// src/entity/parser.rs
//! Reader for the entity lump.
//!
//! The lump is plain text: zero or more `{ ... }` blocks, each holding
//! `"key" "value"` pairs separated by whitespace. There are no escapes. Bytes
//! between blocks (and the NUL padding after the last one) are ignored.

use log::debug;

use crate::entity::Entity;
use crate::error::{FormatError, FormatResult};

/// A position in the entity text that never moves past `end`.
struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Scanner {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            Some(self.data[self.pos])
        } else {
            None
        }
    }

    /// Control characters count as whitespace, NUL included.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c <= b' ') {
            self.pos += 1;
        }
    }

    /// Moves to the next `{`. Returns false when the text runs out first.
    fn skip_to_block(&mut self) -> bool {
        while let Some(c) = self.peek() {
            if c == b'{' {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    /// Reads a quoted string; the scanner must sit on the opening quote.
    fn read_quoted(&mut self, block_start: usize) -> FormatResult<String> {
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => break,
                Some(_) => self.pos += 1,
                None => {
                    return Err(FormatError::UnterminatedEntity {
                        offset: block_start,
                    })
                }
            }
        }
        let text = String::from_utf8_lossy(&self.data[start..self.pos]).into_owned();
        self.pos += 1;
        Ok(text)
    }

    /// Skips whitespace and reads the next quoted string of a block.
    fn expect_quoted(&mut self, block_start: usize) -> FormatResult<String> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'"') => self.read_quoted(block_start),
            Some(_) => Err(FormatError::MalformedEntity { offset: self.pos }),
            None => Err(FormatError::UnterminatedEntity {
                offset: block_start,
            }),
        }
    }
}

/// Parses every entity block in `data`, in file order.
pub fn parse_entities(data: &[u8]) -> FormatResult<Vec<Entity>> {
    let mut scanner = Scanner::new(data);
    let mut entities = Vec::new();

    while scanner.skip_to_block() {
        let block_start = scanner.pos;
        scanner.pos += 1;

        let mut entity = Entity::default();
        loop {
            scanner.skip_whitespace();
            match scanner.peek() {
                Some(b'}') => {
                    scanner.pos += 1;
                    break;
                }
                None => {
                    return Err(FormatError::UnterminatedEntity {
                        offset: block_start,
                    })
                }
                Some(_) => {
                    let key = scanner.expect_quoted(block_start)?;
                    let value = scanner.expect_quoted(block_start)?;
                    entity.insert(key, value);
                }
            }
        }
        entities.push(entity);
    }

    debug!("parsed {} entities from {} bytes", entities.len(), data.len());
    Ok(entities)
}
