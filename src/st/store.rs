use crate::core::{Counter, StoreError, WeightedCell, Width};
use crate::st::backing_array::BackingArray;
use std::alloc::{self, Layout};
use std::{fmt, mem, ptr};

/// A fixed number of non-negative counters whose storage width adapts to
/// the values they hold.
///
/// A store starts out with one byte per element. When an element would
/// overflow, the whole store is promoted to the next wider integer width,
/// up to eight bytes per element, and finally to [`Width::Weighted`], where
/// every element tracks a sum of weights and a sum of squared weights. A
/// weighted fill moves the store to `Weighted` right away. Promotion never
/// goes backwards, and never changes a value, except that counts above
/// 2^53 round to the nearest f64 once the store becomes `Weighted`.
///
/// Indices are not validated beyond the slice bounds checks: an index
/// `>= len()` panics.
pub struct Store {
    len: usize,
    width: Width,
    counts: BackingArray,
}

#[inline]
fn allocate(len: usize, width: Width) -> Result<BackingArray, StoreError> {
    let byte_len = width
        .byte_len(len)
        .ok_or(StoreError::AllocationFailure { requested_bytes: None })?;
    BackingArray::zeroed(byte_len)
}

#[inline]
fn copy_widened<T: Counter, U: Counter>(narrow: &[T], wide: &mut [U]) {
    for (w, n) in wide.iter_mut().zip(narrow) {
        *w = U::truncate_from_u64(n.as_u64());
    }
}

// fill `wide`, laid out for `target`, with the values of `narrow`
fn widen<T: Counter>(narrow: &[T], wide: &mut BackingArray, target: Width) {
    match target {
        Width::W1 => copy_widened::<T, u8>(narrow, wide.as_slice_mut()),
        Width::W2 => copy_widened::<T, u16>(narrow, wide.as_slice_mut()),
        Width::W4 => copy_widened::<T, u32>(narrow, wide.as_slice_mut()),
        Width::W8 => copy_widened::<T, u64>(narrow, wide.as_slice_mut()),
        Width::Weighted => {
            for (cell, count) in wide.as_slice_mut::<WeightedCell>().iter_mut().zip(narrow) {
                *cell = WeightedCell::from_count(count.as_u64());
            }
        }
    }
}

// `target` must be able to hold every sum
#[inline]
fn add_all<T: Counter, U: Counter>(sums: &mut [U], counts: &[T]) {
    for (sum, count) in sums.iter_mut().zip(counts) {
        *sum += U::truncate_from_u64(count.as_u64());
    }
}

// construction
impl Store {
    /// Creates a store of `len` zeroed elements at the narrowest width.
    pub fn new(len: usize) -> Result<Store, StoreError> {
        Store::with_width(len, Width::NARROWEST)
    }

    /// Creates a store of `len` zeroed elements at `width`.
    ///
    /// Decoders holding a raw byte image use
    /// [`from_raw_parts`](Store::from_raw_parts) instead.
    pub fn with_width(len: usize, width: Width) -> Result<Store, StoreError> {
        Ok(Store {
            len,
            width,
            counts: allocate(len, width)?,
        })
    }

    /// Creates a store of `len` elements at `width` from its raw byte image,
    /// as returned by [`raw_buffer`](Store::raw_buffer).
    ///
    /// Fails with `SizeMismatch`, counted in bytes, if `bytes` is not exactly
    /// `len * width.element_size()` long.
    pub fn from_raw_parts(len: usize, width: Width, bytes: &[u8]) -> Result<Store, StoreError> {
        let expected = width
            .byte_len(len)
            .ok_or(StoreError::AllocationFailure { requested_bytes: None })?;
        if bytes.len() != expected {
            return Err(StoreError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let mut store = Store::with_width(len, width)?;
        store.counts.as_bytes_mut().copy_from_slice(bytes);
        Ok(store)
    }

    /// Copies the store into an independent buffer, reporting allocation
    /// failure instead of aborting like `clone` does.
    pub fn try_clone(&self) -> Result<Store, StoreError> {
        Ok(Store {
            len: self.len,
            width: self.width,
            counts: self.counts.try_clone()?,
        })
    }

    /// Moves the contents out, leaving `self` empty at the narrowest width.
    pub fn take(&mut self) -> Store {
        mem::take(self)
    }
}

// read methods
impl Store {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline(always)]
    pub fn is_weighted(&self) -> bool {
        self.width.is_weighted()
    }

    /// Size in bytes of one element at the current width.
    #[inline(always)]
    pub fn element_size(&self) -> usize {
        self.width.element_size()
    }

    /// The elements as `len() * element_size()` contiguous bytes in native
    /// byte order. Weighted elements are laid out as two f64, sum of weights
    /// first.
    #[inline]
    pub fn raw_buffer(&self) -> &[u8] {
        self.counts.as_bytes()
    }

    /// Value at `index`: the count for integer widths, the sum of weights
    /// for `Weighted`.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        match self.width {
            Width::W1 => self.counts::<u8>()[index].as_f64(),
            Width::W2 => self.counts::<u16>()[index].as_f64(),
            Width::W4 => self.counts::<u32>()[index].as_f64(),
            Width::W8 => self.counts::<u64>()[index].as_f64(),
            Width::Weighted => self.cells()[index].sum_of_weights,
        }
    }

    /// Variance estimate at `index`. Unit counts are Poisson distributed, so
    /// integer widths return the count itself; `Weighted` returns the sum of
    /// squared weights.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[inline]
    pub fn variance(&self, index: usize) -> f64 {
        match self.width {
            Width::Weighted => self.cells()[index].sum_of_weights_squared,
            _ => self.value(index),
        }
    }

    /// `(value, variance)` for every element in index order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..self.len).map(move |i| (self.value(i), self.variance(i)))
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        match self.width {
            Width::W1 => self.counts::<u8>().iter().map(Counter::as_f64).sum(),
            Width::W2 => self.counts::<u16>().iter().map(Counter::as_f64).sum(),
            Width::W4 => self.counts::<u32>().iter().map(Counter::as_f64).sum(),
            Width::W8 => self.counts::<u64>().iter().map(Counter::as_f64).sum(),
            Width::Weighted => self.cells().iter().map(|c| c.sum_of_weights).sum(),
        }
    }

    #[inline(always)]
    fn counts<T: Counter>(&self) -> &[T] {
        debug_assert_eq!(T::width(), self.width);
        self.counts.as_slice()
    }

    #[inline(always)]
    fn cells(&self) -> &[WeightedCell] {
        debug_assert!(self.width.is_weighted());
        self.counts.as_slice()
    }

    // integer count at `index`, only meaningful for integer widths
    #[inline]
    fn count_at(&self, index: usize) -> u64 {
        match self.width {
            Width::W1 => self.counts::<u8>()[index].as_u64(),
            Width::W2 => self.counts::<u16>()[index].as_u64(),
            Width::W4 => self.counts::<u32>()[index].as_u64(),
            Width::W8 => self.counts::<u64>()[index].as_u64(),
            Width::Weighted => self.cells()[index].sum_of_weights as u64,
        }
    }
}

// write methods
impl Store {
    /// Adds one to the element at `index`, promoting the store first if the
    /// element is at the ceiling of the current width.
    ///
    /// On allocation failure the store is left as it was.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[inline]
    pub fn increase(&mut self, index: usize) -> Result<(), StoreError> {
        match self.width {
            Width::W1 => self.increase_counter::<u8>(index),
            Width::W2 => self.increase_counter::<u16>(index),
            Width::W4 => self.increase_counter::<u32>(index),
            Width::W8 => self.increase_counter::<u64>(index),
            Width::Weighted => {
                self.cells_mut()[index].add_weight(1.0);
                Ok(())
            }
        }
    }

    /// Adds `weight` to the sum of weights and `weight * weight` to the sum
    /// of squared weights at `index`.
    ///
    /// An integer store is converted to `Weighted` in a single step first,
    /// and stays weighted for the rest of its life. Counts above 2^53 are
    /// rounded to the nearest f64 by that conversion.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    #[inline]
    pub fn increase_by_weight(&mut self, index: usize, weight: f64) -> Result<(), StoreError> {
        if !self.width.is_weighted() {
            // check before converting so a bad index leaves the store alone
            assert!(index < self.len, "index {} out of range for store of {}", index, self.len);
            self.promote_to(Width::Weighted)?;
        }
        self.cells_mut()[index].add_weight(weight);
        Ok(())
    }

    /// Adds `count` unit fills to the element at `index`.
    ///
    /// If the sum does not fit, the store is promoted straight to the
    /// narrowest width that holds it, or to `Weighted` past `u64::MAX`.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub fn add_count(&mut self, index: usize, count: u64) -> Result<(), StoreError> {
        match self.width {
            Width::W1 => self.add_to_counter::<u8>(index, count),
            Width::W2 => self.add_to_counter::<u16>(index, count),
            Width::W4 => self.add_to_counter::<u32>(index, count),
            Width::W8 => self.add_to_counter::<u64>(index, count),
            Width::Weighted => {
                self.cells_mut()[index].add_count(count);
                Ok(())
            }
        }
    }

    /// Adds `other` into `self` element by element. `other` is unchanged.
    ///
    /// The width `self` ends up at is the narrowest one that holds every
    /// sum, and at least as wide as both operands. It is worked out before
    /// any element is touched, so a failure leaves `self` unchanged.
    pub fn combine(&mut self, other: &Store) -> Result<(), StoreError> {
        if self.len != other.len {
            return Err(StoreError::SizeMismatch {
                expected: self.len,
                actual: other.len,
            });
        }
        let target = self.combined_width(other);
        self.promote_to(target)?;
        match other.width {
            Width::W1 => self.accumulate(other.counts::<u8>()),
            Width::W2 => self.accumulate(other.counts::<u16>()),
            Width::W4 => self.accumulate(other.counts::<u32>()),
            Width::W8 => self.accumulate(other.counts::<u64>()),
            Width::Weighted => {
                for (cell, other_cell) in self.cells_mut().iter_mut().zip(other.cells()) {
                    *cell += *other_cell;
                }
            }
        }
        Ok(())
    }

    /// Zeroes every element. The width is kept.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    #[inline(always)]
    fn counts_mut<T: Counter>(&mut self) -> &mut [T] {
        debug_assert_eq!(T::width(), self.width);
        self.counts.as_slice_mut()
    }

    #[inline(always)]
    fn cells_mut(&mut self) -> &mut [WeightedCell] {
        debug_assert!(self.width.is_weighted());
        self.counts.as_slice_mut()
    }

    #[inline(always)]
    fn increase_counter<T: Counter>(&mut self, index: usize) -> Result<(), StoreError> {
        let count = &mut self.counts_mut::<T>()[index];
        if *count < T::max_value() {
            *count += T::one();
            return Ok(());
        }
        self.promote()?;
        self.increase(index)
    }

    fn add_to_counter<T: Counter>(&mut self, index: usize, count: u64) -> Result<(), StoreError> {
        let current = self.counts::<T>()[index].as_u64();
        if T::max_count() - current >= count {
            self.counts_mut::<T>()[index] += T::truncate_from_u64(count);
            return Ok(());
        }
        let target = match current.checked_add(count) {
            Some(total) => Width::narrowest_for(total),
            None => Width::Weighted,
        };
        self.promote_to(target)?;
        self.add_count(index, count)
    }

    fn combined_width(&self, other: &Store) -> Width {
        let mut width = self.width.max(other.width);
        if width.is_weighted() {
            return width;
        }
        for index in 0..self.len {
            match self.count_at(index).checked_add(other.count_at(index)) {
                Some(total) => width = width.max(Width::narrowest_for(total)),
                None => return Width::Weighted,
            }
        }
        width
    }

    // `self` must already be wide enough for every sum
    fn accumulate<T: Counter>(&mut self, counts: &[T]) {
        match self.width {
            Width::W1 => add_all(self.counts_mut::<u8>(), counts),
            Width::W2 => add_all(self.counts_mut::<u16>(), counts),
            Width::W4 => add_all(self.counts_mut::<u32>(), counts),
            Width::W8 => add_all(self.counts_mut::<u64>(), counts),
            Width::Weighted => {
                for (cell, count) in self.cells_mut().iter_mut().zip(counts) {
                    cell.add_count(count.as_u64());
                }
            }
        }
    }
}

// promotion
impl Store {
    #[inline]
    fn promote(&mut self) -> Result<(), StoreError> {
        match self.width.next() {
            Some(next) => self.promote_to(next),
            None => Ok(()),
        }
    }

    /// Widens every element to `target`. Does nothing if the store is
    /// already at least that wide.
    ///
    /// The wider block is filled completely before it replaces the current
    /// one, so on allocation failure the store keeps its width and values.
    /// Integer targets are exact; a `Weighted` target stores counts as f64,
    /// exact only up to 2^53.
    pub(crate) fn promote_to(&mut self, target: Width) -> Result<(), StoreError> {
        if target <= self.width {
            return Ok(());
        }
        let mut counts = allocate(self.len, target)?;
        match self.width {
            Width::W1 => widen(self.counts::<u8>(), &mut counts, target),
            Width::W2 => widen(self.counts::<u16>(), &mut counts, target),
            Width::W4 => widen(self.counts::<u32>(), &mut counts, target),
            Width::W8 => widen(self.counts::<u64>(), &mut counts, target),
            // nothing is wider, handled above
            Width::Weighted => return Ok(()),
        }
        tracing::trace!(len = self.len, from = ?self.width, to = ?target, "Promoted counter storage.");
        self.counts = counts;
        self.width = target;
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Store {
        Store {
            len: 0,
            width: Width::NARROWEST,
            counts: BackingArray::empty(),
        }
    }
}

impl Clone for Store {
    fn clone(&self) -> Store {
        match self.try_clone() {
            Ok(store) => store,
            Err(_) => alloc::handle_alloc_error(
                Layout::from_size_align(self.counts.byte_len(), 8).unwrap_or_else(|_| Layout::new::<u64>()),
            ),
        }
    }

    fn clone_from(&mut self, source: &Store) {
        if self.len == source.len && self.width == source.width {
            self.counts.as_bytes_mut().copy_from_slice(source.counts.as_bytes());
        } else {
            *self = source.clone();
        }
    }
}

/// Stores compare by value and variance per element, whatever their widths.
impl PartialEq for Store {
    fn eq(&self, other: &Store) -> bool {
        if ptr::eq(self, other) {
            return true;
        }
        if self.len != other.len {
            return false;
        }
        (0..self.len).all(|i| self.value(i) == other.value(i) && self.variance(i) == other.variance(i))
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Store")
            .field("len", &self.len)
            .field("width", &self.width)
            .finish()
    }
}
