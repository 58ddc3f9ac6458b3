//! Generic wrapper over typed ELF tables.

use core::{fmt, marker::PhantomData};

use crate::{encoding::Encoding, medium::Medium};

/// A table of `count` fixed-stride `T`s at `offset` in a [`Medium`].
pub struct Table<'slice, M: ?Sized, E, T> {
    /// The underlying [`Medium`] of the ELF file.
    medium: &'slice M,
    /// The offset of the start of the [`Table`].
    offset: u64,
    /// The number of `T`s in the [`Table`].
    count: u64,
    /// The stride between each `T`.
    stride: u64,
    /// The [`Encoding`] used to decode the ELF file.
    encoding: E,
    /// Phantom type.
    phantom: PhantomData<T>,
}

impl<'slice, M: Medium + ?Sized, E: Encoding, T: TableItem<'slice, M, E>> Table<'slice, M, E, T> {
    /// Creates a new [`Table`] of `count` entries of `stride` bytes at `offset`.
    ///
    /// Returns [`None`] if `stride` is smaller than a `T` or if the table does not fit inside the
    /// [`Medium`].
    pub fn new(
        encoding: E,
        medium: &'slice M,
        offset: u64,
        count: u64,
        stride: u64,
    ) -> Option<Self> {
        if stride < T::expected_size() {
            return None;
        }

        let total_size = count.checked_mul(stride)?;
        let max_offset = offset.checked_add(total_size)?;
        if max_offset > medium.size() {
            return None;
        }

        Some(Self {
            medium,
            offset,
            count,
            stride,
            encoding,
            phantom: PhantomData,
        })
    }

    /// Returns the `T` located at `index`.
    pub fn get(&self, index: u64) -> Option<T> {
        if index >= self.count {
            return None;
        }

        let offset = self.offset + index * self.stride;
        Some(T::new_panicking(self.encoding, offset, self.medium))
    }

    /// Returns the number of `T`s in the [`Table`].
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<M: ?Sized, E: Copy, T> Clone for Table<'_, M, E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized, E: Copy, T> Copy for Table<'_, M, E, T> {}

impl<'slice, M: Medium + ?Sized, E: Encoding, T: TableItem<'slice, M, E>> IntoIterator
    for Table<'slice, M, E, T>
{
    type Item = T;
    type IntoIter = IntoIter<'slice, M, E, T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table: self,
            next: 0,
        }
    }
}

impl<'slice, M: Medium + ?Sized, E: Encoding, T: TableItem<'slice, M, E> + fmt::Debug> fmt::Debug
    for Table<'slice, M, E, T>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(*self).finish()
    }
}

/// An [`Iterator`] over the contents of a [`Table`].
pub struct IntoIter<'slice, M: ?Sized, E, T> {
    /// The [`Table`] to iterate over.
    table: Table<'slice, M, E, T>,
    /// The next index in the [`Table`].
    next: u64,
}

impl<M: ?Sized, E: Copy, T> Clone for IntoIter<'_, M, E, T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            next: self.next,
        }
    }
}

impl<'slice, M: Medium + ?Sized, E: Encoding, T: TableItem<'slice, M, E>> Iterator
    for IntoIter<'slice, M, E, T>
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.table.get(self.next)?;
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.count.saturating_sub(self.next);
        match usize::try_from(remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// An item that can appear in a [`Table`].
pub trait TableItem<'slice, M: Medium + ?Sized, E: Encoding> {
    /// Creates a new [`Self`], panicking if it would not fit inside `medium`.
    ///
    /// [`Table`] only calls this with offsets it has already bounds checked.
    fn new_panicking(encoding: E, offset: u64, medium: &'slice M) -> Self;

    /// Returns the minimum stride of the [`TableItem`].
    fn expected_size() -> u64;
}
