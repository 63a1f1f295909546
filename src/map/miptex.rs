// src/map/miptex.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::error::{FormatError, FormatResult};
use crate::lump::LumpKind;
use crate::utils::util::read_fixed_name;

/// Header of one mip-texture inside the texture lump (40 bytes).
///
/// ```text
///  0-15   name      [u8; 16]  NUL padded
/// 16-19   width     u32
/// 20-23   height    u32
/// 24-39   offsets   [u32; 4]  one per mip level, relative to the header
/// ```
///
/// When all offsets are zero the pixels are not stored in the map and have
/// to be found by name in one of the WAD packages listed by `worldspawn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiptexHeader {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub offsets: [u32; 4],
}

impl MiptexHeader {
    pub const SIZE: usize = 40;

    pub fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut name = [0u8; 16];
        reader.read_exact(&mut name)?;
        let width = reader.read_u32::<LE>()?;
        let height = reader.read_u32::<LE>()?;
        let mut offsets = [0u32; 4];
        for offset in offsets.iter_mut() {
            *offset = reader.read_u32::<LE>()?;
        }
        Ok(MiptexHeader {
            name: read_fixed_name(&name),
            width,
            height,
            offsets,
        })
    }

    /// Whether the texture's pixels are embedded in the map file.
    pub fn is_embedded(&self) -> bool {
        self.offsets[0] != 0
    }
}

/// The offset table at the start of the texture lump.
#[derive(Debug, Clone)]
pub struct MiptexTable<'a> {
    data: &'a [u8],
    offsets: Vec<i32>,
}

impl<'a> MiptexTable<'a> {
    /// Reads the table. An empty lump is an empty table.
    pub fn parse(data: &'a [u8]) -> FormatResult<Self> {
        if data.is_empty() {
            return Ok(MiptexTable {
                data,
                offsets: Vec::new(),
            });
        }

        let mut reader = data;
        let count = reader.read_i32::<LE>().map_err(|_| table_error(0, data.len()))?;
        let count = usize::try_from(count).map_err(|_| table_error(count as i64, 0))?;
        if 4 + count.saturating_mul(4) > data.len() {
            return Err(table_error(count as i64, (data.len() - 4) / 4));
        }

        let mut offsets = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = reader
                .read_i32::<LE>()
                .map_err(|_| table_error(count as i64, 0))?;
            offsets.push(offset);
        }
        Ok(MiptexTable { data, offsets })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Header of texture `index`. `Ok(None)` when the table marks the slot
    /// as absent (offset `-1`).
    pub fn header(&self, index: usize) -> FormatResult<Option<MiptexHeader>> {
        let offset = *self.offsets.get(index).ok_or(FormatError::IndexOutOfRange {
            kind: LumpKind::Textures,
            index: index as i64,
            count: self.offsets.len(),
            context: "mip-texture index",
        })?;
        if offset < 0 {
            return Ok(None);
        }

        let start = offset as usize;
        let bytes = self
            .data
            .get(start..start.saturating_add(MiptexHeader::SIZE))
            .ok_or(FormatError::IndexOutOfRange {
                kind: LumpKind::Textures,
                index: offset as i64,
                count: self.data.len(),
                context: "mip-texture header offset",
            })?;

        let mut reader = bytes;
        // The slice is exactly SIZE bytes, so the read cannot run short.
        MiptexHeader::from_bsp(&mut reader)
            .map(Some)
            .map_err(|_| FormatError::IndexOutOfRange {
                kind: LumpKind::Textures,
                index: offset as i64,
                count: self.data.len(),
                context: "mip-texture header offset",
            })
    }
}

fn table_error(index: i64, count: usize) -> FormatError {
    FormatError::IndexOutOfRange {
        kind: LumpKind::Textures,
        index,
        count,
        context: "mip-texture table",
    }
}
