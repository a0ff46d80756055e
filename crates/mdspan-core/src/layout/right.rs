use super::{in_bounds, right_offset, right_stride, Layout, LayoutMapping, LeftMapping, StrideMapping};
use crate::{Dextents, Enforcer, Extents, MdspanError};

/// Row-major layout, the rightmost index varies fastest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayoutRight;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RightMapping<E: Extents> {
    extents: E,
}

impl<E: Extents> RightMapping<E> {
    pub const fn new(extents: E) -> Self {
        Self { extents }
    }

    pub fn from_right<O: Extents>(other: &RightMapping<O>) -> Result<Self, MdspanError> {
        Ok(Self::new(E::try_from_extents(other.extents())?))
    }

    pub fn from_left<O: Extents>(other: &LeftMapping<O>) -> Result<Self, MdspanError> {
        const {
            assert!(
                E::RANK <= 1,
                "layout conversion between left and right requires rank <= 1"
            )
        };
        Ok(Self::new(E::try_from_extents(other.extents())?))
    }

    pub fn from_stride<O: Extents>(other: &StrideMapping<O>) -> Result<Self, MdspanError> {
        let mapping = Self::new(E::try_from_extents(other.extents())?);
        Enforcer::check_strides(mapping.strides().as_ref(), other.strides().as_ref())?;
        Ok(mapping)
    }
}

/// Compile time evaluable paths for fully dynamic extents.
impl<const R: usize> RightMapping<Dextents<R>> {
    pub const fn dims(&self) -> [usize; R] {
        *self.extents.as_array()
    }

    /// `None` if `index` is out of bounds.
    pub const fn checked_offset(&self, index: [usize; R]) -> Option<usize> {
        let extents = self.extents.as_array();
        if !in_bounds(extents, &index) {
            return None;
        }
        Some(right_offset(extents, &index))
    }
}

impl<E: Extents> From<E> for RightMapping<E> {
    fn from(extents: E) -> Self {
        Self::new(extents)
    }
}

impl<E: Extents> std::fmt::Debug for RightMapping<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LayoutRight{:?}", self.extents)
    }
}

impl<E: Extents> LayoutMapping for RightMapping<E> {
    type Extents = E;
    type Layout = LayoutRight;

    const ALWAYS_UNIQUE: bool = true;
    const ALWAYS_EXHAUSTIVE: bool = true;
    const ALWAYS_STRIDED: bool = true;

    fn extents(&self) -> &E {
        &self.extents
    }

    #[inline]
    fn offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), E::RANK);
        right_offset(self.extents.to_index().as_ref(), index)
    }

    fn checked_span_size(&self) -> Option<usize> {
        self.extents.checked_size()
    }

    fn stride(&self, r: usize) -> usize {
        debug_assert!(r < E::RANK);
        right_stride(self.extents.to_index().as_ref(), r)
    }
}

impl Layout for LayoutRight {
    type Mapping<E: Extents> = RightMapping<E>;

    fn remap<E: Extents, E2: Extents>(
        mapping: &RightMapping<E>,
    ) -> Result<RightMapping<E2>, MdspanError> {
        RightMapping::from_right(mapping)
    }
}
