use crate::{
    rvec, Accessor, Dextents, Enforcer, Extents, Layout, LayoutMapping, LayoutStride, Mdspan,
    MdspanError, MdspanMut, RVec, StrideMapping,
};
use std::ops::{Range, RangeFull};

/// Selects part of one dimension when carving a sub-view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceSpecifier {
    /// Fixes the dimension to a single index, removing it from the result.
    Index(usize),
    Range(Range<usize>),
    Full,
}

impl From<usize> for SliceSpecifier {
    fn from(index: usize) -> Self {
        SliceSpecifier::Index(index)
    }
}

impl From<Range<usize>> for SliceSpecifier {
    fn from(range: Range<usize>) -> Self {
        SliceSpecifier::Range(range)
    }
}

impl From<RangeFull> for SliceSpecifier {
    fn from(_: RangeFull) -> Self {
        SliceSpecifier::Full
    }
}

/// Offset of the first selected element, `None` for an empty selection, and
/// the strided mapping of the selection relative to that offset.
fn select<M: LayoutMapping, const R: usize>(
    mapping: &M,
    slices: &[SliceSpecifier],
) -> Result<(Option<usize>, StrideMapping<Dextents<R>>), MdspanError> {
    const {
        assert!(M::ALWAYS_STRIDED, "submdspan requires a strided layout")
    };
    Enforcer::check_rank(<M::Extents as Extents>::RANK, slices.len())?;

    let extents = mapping.extents().to_index();
    let mut first = <M::Extents as Extents>::zero_index();
    let mut sub_extents: RVec<usize> = rvec![];
    let mut sub_strides: RVec<usize> = rvec![];
    for (dim, slice) in slices.iter().enumerate() {
        let extent = extents.as_ref()[dim];
        match slice {
            SliceSpecifier::Index(index) => {
                if *index >= extent {
                    return Err(MdspanError::IndexOutOfBounds {
                        dim,
                        index: *index,
                        extent,
                    });
                }
                first.as_mut()[dim] = *index;
            }
            SliceSpecifier::Range(range) => {
                Enforcer::check_slice(dim, range, extent)?;
                first.as_mut()[dim] = range.start;
                sub_extents.push(range.len());
                sub_strides.push(mapping.stride(dim));
            }
            SliceSpecifier::Full => {
                sub_extents.push(extent);
                sub_strides.push(mapping.stride(dim));
            }
        }
    }
    Enforcer::check_rank(R, sub_extents.len())?;

    let sub = StrideMapping::new(
        Dextents::<R>::from_dynamic(&sub_extents)?,
        Dextents::<R>::index_from_slice(&sub_strides)?,
    );
    log::trace!("submdspan {:?} -> {:?}", mapping, sub);
    // An empty selection may start past the end of the data.
    let start = match sub.checked_span_size() {
        Some(0) => None,
        _ => Some(mapping.offset(first.as_ref())),
    };
    Ok((start, sub))
}

impl<'a, T, E, L, A> Mdspan<'a, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    /// # Submdspan
    ///
    /// Views the part of `self` selected by one [`SliceSpecifier`] per dimension.
    /// Dimensions fixed by [`SliceSpecifier::Index`] are dropped, the rest keep
    /// their order and their stride, so the result has rank `R`.
    pub fn submdspan<const R: usize>(
        &self,
        slices: &[SliceSpecifier],
    ) -> Result<Mdspan<'a, T, Dextents<R>, LayoutStride, A>, MdspanError> {
        let (start, mapping) = select::<_, R>(&self.mapping, slices)?;
        let data: &'a [T] = self.data;
        let data = match start {
            Some(start) => &data[start..],
            None => &data[..0],
        };
        Mdspan::from_parts(data, mapping, self.accessor.clone())
    }
}

impl<T, E, L, A> MdspanMut<'_, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    /// Mutable counterpart of [`Mdspan::submdspan`], borrowing `self` for the
    /// lifetime of the sub-view.
    pub fn submdspan<const R: usize>(
        &mut self,
        slices: &[SliceSpecifier],
    ) -> Result<MdspanMut<'_, T, Dextents<R>, LayoutStride, A>, MdspanError> {
        let (start, mapping) = select::<_, R>(&self.mapping, slices)?;
        let accessor = self.accessor.clone();
        let data = match start {
            Some(start) => &mut self.data[start..],
            None => &mut self.data[..0],
        };
        MdspanMut::from_parts(data, mapping, accessor)
    }
}
