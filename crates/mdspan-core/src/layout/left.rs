use super::{in_bounds, left_offset, left_stride, Layout, LayoutMapping, RightMapping, StrideMapping};
use crate::{Dextents, Enforcer, Extents, MdspanError};

/// Column-major layout, the leftmost index varies fastest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayoutLeft;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LeftMapping<E: Extents> {
    extents: E,
}

impl<E: Extents> LeftMapping<E> {
    pub const fn new(extents: E) -> Self {
        Self { extents }
    }

    pub fn from_left<O: Extents>(other: &LeftMapping<O>) -> Result<Self, MdspanError> {
        Ok(Self::new(E::try_from_extents(other.extents())?))
    }

    /// Only defined up to rank 1, where both dense layouts coincide.
    pub fn from_right<O: Extents>(other: &RightMapping<O>) -> Result<Self, MdspanError> {
        const {
            assert!(
                E::RANK <= 1,
                "layout conversion between left and right requires rank <= 1"
            )
        };
        Ok(Self::new(E::try_from_extents(other.extents())?))
    }

    /// Fails unless `other` has exactly the column-major strides.
    pub fn from_stride<O: Extents>(other: &StrideMapping<O>) -> Result<Self, MdspanError> {
        let mapping = Self::new(E::try_from_extents(other.extents())?);
        Enforcer::check_strides(mapping.strides().as_ref(), other.strides().as_ref())?;
        Ok(mapping)
    }
}

/// Compile time evaluable paths for fully dynamic extents.
impl<const R: usize> LeftMapping<Dextents<R>> {
    pub const fn dims(&self) -> [usize; R] {
        *self.extents.as_array()
    }

    /// `None` if `index` is out of bounds.
    pub const fn checked_offset(&self, index: [usize; R]) -> Option<usize> {
        let extents = self.extents.as_array();
        if !in_bounds(extents, &index) {
            return None;
        }
        Some(left_offset(extents, &index))
    }
}

impl<E: Extents> From<E> for LeftMapping<E> {
    fn from(extents: E) -> Self {
        Self::new(extents)
    }
}

impl<E: Extents> std::fmt::Debug for LeftMapping<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LayoutLeft{:?}", self.extents)
    }
}

impl<E: Extents> LayoutMapping for LeftMapping<E> {
    type Extents = E;
    type Layout = LayoutLeft;

    const ALWAYS_UNIQUE: bool = true;
    const ALWAYS_EXHAUSTIVE: bool = true;
    const ALWAYS_STRIDED: bool = true;

    fn extents(&self) -> &E {
        &self.extents
    }

    #[inline]
    fn offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), E::RANK);
        left_offset(self.extents.to_index().as_ref(), index)
    }

    fn checked_span_size(&self) -> Option<usize> {
        self.extents.checked_size()
    }

    fn stride(&self, r: usize) -> usize {
        debug_assert!(r < E::RANK);
        left_stride(self.extents.to_index().as_ref(), r)
    }
}

impl Layout for LayoutLeft {
    type Mapping<E: Extents> = LeftMapping<E>;

    fn remap<E: Extents, E2: Extents>(
        mapping: &LeftMapping<E>,
    ) -> Result<LeftMapping<E2>, MdspanError> {
        LeftMapping::from_left(mapping)
    }
}
