use super::{strided_offset, strided_span_size, Layout, LayoutMapping, LeftMapping, RightMapping};
use crate::{Extents, MdspanError};

/// Arbitrary per-dimension strides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayoutStride;

/// # StrideMapping
///
/// `offset(i) = sum(i[r] * stride(r))`. The strides are assumed to give every
/// index a distinct offset, this is not checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrideMapping<E: Extents> {
    extents: E,
    strides: E::Index,
}

impl<E: Extents> StrideMapping<E> {
    pub fn new(extents: E, strides: E::Index) -> Self {
        Self { extents, strides }
    }

    /// Copies the extents and strides of any unique, strided mapping.
    pub fn from_mapping<M: LayoutMapping>(other: &M) -> Result<Self, MdspanError> {
        const {
            assert!(
                M::ALWAYS_UNIQUE && M::ALWAYS_STRIDED,
                "source mapping must be unique and strided"
            )
        };
        let extents = E::try_from_extents(other.extents())?;
        let strides = E::index_from_slice(other.strides().as_ref())?;
        Ok(Self::new(extents, strides))
    }
}

impl<E: Extents> Default for StrideMapping<E> {
    fn default() -> Self {
        RightMapping::<E>::default().into()
    }
}

impl<E: Extents> From<RightMapping<E>> for StrideMapping<E> {
    fn from(mapping: RightMapping<E>) -> Self {
        Self::new(*mapping.extents(), mapping.strides())
    }
}

impl<E: Extents> From<LeftMapping<E>> for StrideMapping<E> {
    fn from(mapping: LeftMapping<E>) -> Self {
        Self::new(*mapping.extents(), mapping.strides())
    }
}

impl<E: Extents> std::fmt::Debug for StrideMapping<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStride")
            .field("extents", &self.extents)
            .field("strides", &self.strides)
            .finish()
    }
}

impl<E: Extents> LayoutMapping for StrideMapping<E> {
    type Extents = E;
    type Layout = LayoutStride;

    const ALWAYS_UNIQUE: bool = true;
    const ALWAYS_EXHAUSTIVE: bool = false;
    const ALWAYS_STRIDED: bool = true;

    fn extents(&self) -> &E {
        &self.extents
    }

    #[inline]
    fn offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), E::RANK);
        strided_offset(self.strides.as_ref(), index)
    }

    fn checked_span_size(&self) -> Option<usize> {
        strided_span_size(self.extents.to_index().as_ref(), self.strides.as_ref())
    }

    fn stride(&self, r: usize) -> usize {
        self.strides.as_ref()[r]
    }

    fn strides(&self) -> E::Index {
        self.strides
    }

    fn is_exhaustive(&self) -> bool {
        self.checked_span_size() == self.extents.checked_size()
    }
}

impl Layout for LayoutStride {
    type Mapping<E: Extents> = StrideMapping<E>;

    fn remap<E: Extents, E2: Extents>(
        mapping: &StrideMapping<E>,
    ) -> Result<StrideMapping<E2>, MdspanError> {
        StrideMapping::from_mapping(mapping)
    }
}
