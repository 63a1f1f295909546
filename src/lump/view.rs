// src/lump/view.rs

use std::marker::PhantomData;

use crate::error::{FormatError, FormatResult};
use crate::map::Record;

/// A typed, read-only window onto a homogeneous lump.
///
/// Records are decoded on access, so building a view is free and the file
/// buffer is the only copy of the data.
#[derive(Debug, Clone, Copy)]
pub struct LumpView<'a, T> {
    bytes: &'a [u8],
    _marker: PhantomData<T>,
}

impl<'a, T: Record> LumpView<'a, T> {
    pub fn new(bytes: &'a [u8]) -> Self {
        LumpView {
            bytes,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / T::SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes record `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<T> {
        let start = index.checked_mul(T::SIZE)?;
        let mut chunk = self.bytes.get(start..start.checked_add(T::SIZE)?)?;
        T::from_bsp(&mut chunk).ok()
    }

    /// Like `get`, but takes the raw (possibly negative) index from the file
    /// and reports which lookup failed.
    pub fn try_get(&self, index: i64, context: &'static str) -> FormatResult<T> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i))
            .ok_or(FormatError::IndexOutOfRange {
                kind: T::KIND,
                index,
                count: self.len(),
                context,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + 'a
    where
        T: 'a,
    {
        self.bytes
            .chunks_exact(T::SIZE)
            .filter_map(|mut chunk| T::from_bsp(&mut chunk).ok())
    }
}
