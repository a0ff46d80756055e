mod left;
mod right;
mod stride;

pub use left::*;
pub use right::*;
pub use stride::*;

use crate::{Extents, MdspanError};
use std::fmt::Debug;
use std::hash::Hash;

/// # LayoutMapping
///
/// Maps a multi-index within [`LayoutMapping::extents`] to an offset into the
/// underlying storage.
pub trait LayoutMapping: Copy + Debug + Eq + Hash + Send + Sync + 'static {
    type Extents: Extents;
    type Layout: Layout;

    /// No two indices map to the same offset.
    const ALWAYS_UNIQUE: bool;
    /// Every offset in `0..required_span_size()` is reached by some index.
    const ALWAYS_EXHAUSTIVE: bool;
    /// Offsets are a linear function of the index.
    const ALWAYS_STRIDED: bool;

    fn extents(&self) -> &Self::Extents;

    /// `index.len()` must equal the rank.
    fn offset(&self, index: &[usize]) -> usize;

    /// One past the largest offset, 0 if the index space is empty. `None` if
    /// that does not fit in a `usize`.
    fn checked_span_size(&self) -> Option<usize>;

    /// Panics if the span overflows, which no constructed view allows.
    fn required_span_size(&self) -> usize {
        match self.checked_span_size() {
            Some(span) => span,
            None => panic!("required span size of {:?} overflows usize", self),
        }
    }

    fn stride(&self, r: usize) -> usize;

    fn strides(&self) -> <Self::Extents as Extents>::Index {
        let mut strides = <Self::Extents as Extents>::zero_index();
        for (r, s) in strides.as_mut().iter_mut().enumerate() {
            *s = self.stride(r);
        }
        strides
    }

    fn is_unique(&self) -> bool {
        Self::ALWAYS_UNIQUE
    }

    fn is_exhaustive(&self) -> bool {
        Self::ALWAYS_EXHAUSTIVE
    }

    fn is_strided(&self) -> bool {
        Self::ALWAYS_STRIDED
    }

    /// Same extents and the same offset for every index, regardless of layout.
    fn is_equivalent<M: LayoutMapping>(&self, other: &M) -> bool {
        self.extents().same_extents(other.extents())
            && self.strides().as_ref() == other.strides().as_ref()
    }
}

/// A layout policy, naming the mapping type for any extents.
pub trait Layout: Copy + Debug + Default + Eq + Hash + Send + Sync + 'static {
    type Mapping<E: Extents>: LayoutMapping<Extents = E, Layout = Self>;

    /// Re-expresses `mapping` over compatible extents `E2`.
    fn remap<E: Extents, E2: Extents>(
        mapping: &Self::Mapping<E>,
    ) -> Result<Self::Mapping<E2>, MdspanError>;
}

/// Row-major offset of `index` within `extents`.
pub const fn right_offset(extents: &[usize], index: &[usize]) -> usize {
    let mut offset = 0;
    let mut r = 0;
    while r < extents.len() {
        offset = offset * extents[r] + index[r];
        r += 1;
    }
    offset
}

/// Column-major offset of `index` within `extents`.
pub const fn left_offset(extents: &[usize], index: &[usize]) -> usize {
    let mut offset = 0;
    let mut r = extents.len();
    while r > 0 {
        r -= 1;
        offset = offset * extents[r] + index[r];
    }
    offset
}

/// Product of the extents after `r`.
pub const fn right_stride(extents: &[usize], r: usize) -> usize {
    let mut stride = 1;
    let mut k = r + 1;
    while k < extents.len() {
        stride *= extents[k];
        k += 1;
    }
    stride
}

/// Product of the extents before `r`.
pub const fn left_stride(extents: &[usize], r: usize) -> usize {
    let mut stride = 1;
    let mut k = 0;
    while k < r {
        stride *= extents[k];
        k += 1;
    }
    stride
}

pub const fn strided_offset(strides: &[usize], index: &[usize]) -> usize {
    let mut offset = 0;
    let mut r = 0;
    while r < strides.len() {
        offset += strides[r] * index[r];
        r += 1;
    }
    offset
}

/// `None` if the span overflows `usize`.
pub const fn strided_span_size(extents: &[usize], strides: &[usize]) -> Option<usize> {
    let mut r = 0;
    while r < extents.len() {
        if extents[r] == 0 {
            return Some(0);
        }
        r += 1;
    }
    let mut span: usize = 1;
    r = 0;
    while r < extents.len() {
        let step = match (extents[r] - 1).checked_mul(strides[r]) {
            Some(step) => step,
            None => return None,
        };
        span = match span.checked_add(step) {
            Some(span) => span,
            None => return None,
        };
        r += 1;
    }
    Some(span)
}

/// Every component of `index` lies within its extent.
pub const fn in_bounds(extents: &[usize], index: &[usize]) -> bool {
    if extents.len() != index.len() {
        return false;
    }
    let mut r = 0;
    while r < extents.len() {
        if index[r] >= extents[r] {
            return false;
        }
        r += 1;
    }
    true
}
