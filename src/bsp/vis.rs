// src/bsp/vis.rs
//! Potentially visible set decoding.
//!
//! Each leaf with a non-negative vis offset owns a run-length compressed bit
//! row in the visibility lump. Bit `n` set means leaf `n + 1` may be seen
//! from this one (leaf 0 is the shared solid leaf and has no bit). A zero
//! byte is followed by a count of zero bytes it stands for.

use crate::error::{FormatError, FormatResult};
use crate::lump::{BspFile, LumpKind};

/// Leaves visible from `leaf`, in ascending order.
pub fn visible_leaves(file: &BspFile, leaf: usize) -> FormatResult<Vec<usize>> {
    let offset = file.leaves().try_get(leaf as i64, "visibility leaf")?.vis_offset;
    let Ok(offset) = usize::try_from(offset) else {
        return Ok(Vec::new());
    };
    let leaf_count = file
        .models()
        .get(0)
        .map_or(0, |world| usize::try_from(world.vis_leaves).unwrap_or(0));

    decompress_row(file.lump_bytes(LumpKind::Visibility), offset, leaf_count)
}

fn decompress_row(vis: &[u8], offset: usize, leaf_count: usize) -> FormatResult<Vec<usize>> {
    let row_len = leaf_count.div_ceil(8);
    let read = |pos: usize| {
        vis.get(pos).copied().ok_or(FormatError::IndexOutOfRange {
            kind: LumpKind::Visibility,
            index: pos as i64,
            count: vis.len(),
            context: "visibility row",
        })
    };

    let mut visible = Vec::new();
    let mut pos = offset;
    let mut row_byte = 0;
    while row_byte < row_len {
        let bits = read(pos)?;
        pos += 1;
        if bits == 0 {
            row_byte += read(pos)? as usize;
            pos += 1;
            continue;
        }
        for bit in 0..8 {
            let index = row_byte * 8 + bit;
            if bits & (1 << bit) != 0 && index < leaf_count {
                visible.push(index + 1);
            }
        }
        row_byte += 1;
    }
    Ok(visible)
}
