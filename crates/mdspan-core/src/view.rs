use crate::{
    checked_size, Accessor, AccessorMut, DefaultAccessor, Dextents, Enforcer, Extents, Layout,
    LayoutLeft, LayoutMapping, LayoutRight, LayoutStride, LeftMapping, MdspanError, RightMapping,
    StrideMapping,
};

/// Observers shared by [`Mdspan`] and [`MdspanMut`].
macro_rules! view_observers {
    () => {
        pub fn rank(&self) -> usize {
            E::RANK
        }

        pub fn rank_dynamic(&self) -> usize {
            E::RANK_DYNAMIC
        }

        pub fn static_extent(r: usize) -> usize {
            E::static_extent(r)
        }

        pub fn extent(&self, r: usize) -> usize {
            self.extents().extent(r)
        }

        pub fn extents(&self) -> &E {
            self.mapping.extents()
        }

        /// Number of indices in the view, not the length of the data.
        pub fn size(&self) -> usize {
            self.extents().size()
        }

        pub fn is_empty(&self) -> bool {
            self.size() == 0
        }

        pub fn mapping(&self) -> &L::Mapping<E> {
            &self.mapping
        }

        pub fn accessor(&self) -> &A {
            &self.accessor
        }

        pub fn stride(&self, r: usize) -> usize {
            self.mapping.stride(r)
        }

        pub fn is_unique(&self) -> bool {
            self.mapping.is_unique()
        }

        pub fn is_exhaustive(&self) -> bool {
            self.mapping.is_exhaustive()
        }

        pub fn is_strided(&self) -> bool {
            self.mapping.is_strided()
        }

        pub fn is_always_unique() -> bool {
            <L::Mapping<E> as LayoutMapping>::ALWAYS_UNIQUE
        }

        pub fn is_always_exhaustive() -> bool {
            <L::Mapping<E> as LayoutMapping>::ALWAYS_EXHAUSTIVE
        }

        pub fn is_always_strided() -> bool {
            <L::Mapping<E> as LayoutMapping>::ALWAYS_STRIDED
        }
    };
}

/// # Mdspan
///
/// A non-owning multidimensional view over a slice.
///
/// The view composes the index space `E`, a layout `L` mapping each index of
/// `E` to an offset into `data`, and an accessor `A` turning that offset into
/// an element reference. Construction checks that `data` covers the mapping's
/// `required_span_size`, so every in-bounds index can be accessed.
pub struct Mdspan<'a, T, E, L = LayoutRight, A = DefaultAccessor<T>>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    pub(crate) data: &'a [T],
    pub(crate) mapping: L::Mapping<E>,
    pub(crate) accessor: A,
}

impl<'a, T, E, L, A> Mdspan<'a, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    pub fn from_parts(
        data: &'a [T],
        mapping: L::Mapping<E>,
        accessor: A,
    ) -> Result<Self, MdspanError> {
        Enforcer::check_span(mapping.checked_span_size(), data.len())?;
        Ok(Self {
            data,
            mapping,
            accessor,
        })
    }

    pub fn from_mapping(data: &'a [T], mapping: L::Mapping<E>) -> Result<Self, MdspanError>
    where
        A: Default,
    {
        Self::from_parts(data, mapping, A::default())
    }

    pub fn new(data: &'a [T], extents: E) -> Result<Self, MdspanError>
    where
        A: Default,
        L::Mapping<E>: From<E>,
    {
        Self::from_mapping(data, extents.into())
    }

    /// Supplies only the dynamic extents, in order.
    pub fn from_dynamic(data: &'a [T], dynamic: &[usize]) -> Result<Self, MdspanError>
    where
        A: Default,
        L::Mapping<E>: From<E>,
    {
        Self::new(data, E::from_dynamic(dynamic)?)
    }

    /// Every extent must be static.
    pub fn from_static(data: &'a [T]) -> Result<Self, MdspanError>
    where
        A: Default,
        L::Mapping<E>: From<E>,
    {
        const { assert!(E::RANK_DYNAMIC == 0, "extents have dynamic dimensions") };
        Self::new(data, E::default())
    }

    view_observers!();

    pub fn data_handle(&self) -> &'a [T] {
        self.data
    }

    /// Returns `None` if any component of `index` is outside its extent.
    pub fn get(&self, index: E::Index) -> Option<A::Reference<'a>>
    where
        A: 'a,
    {
        Enforcer::check_index(index.as_ref(), self.extents().to_index().as_ref()).ok()?;
        Some(self.accessor.access(self.data, self.mapping.offset(index.as_ref())))
    }

    /// Panics if any component of `index` is outside its extent.
    pub fn at(&self, index: E::Index) -> A::Reference<'a>
    where
        A: 'a,
    {
        if let Err(e) = Enforcer::check_index(index.as_ref(), self.extents().to_index().as_ref())
        {
            panic!("{}", e);
        }
        self.accessor.access(self.data, self.mapping.offset(index.as_ref()))
    }

    pub fn try_into_extents<E2: Extents>(self) -> Result<Mdspan<'a, T, E2, L, A>, MdspanError> {
        let mapping = L::remap::<E, E2>(&self.mapping)?;
        Ok(Mdspan {
            data: self.data,
            mapping,
            accessor: self.accessor,
        })
    }

    pub fn into_strided(self) -> Mdspan<'a, T, E, LayoutStride, A> {
        Mdspan {
            data: self.data,
            mapping: strided(&self.mapping),
            accessor: self.accessor,
        }
    }

    pub fn with_accessor<A2: Accessor<Element = T>>(self, accessor: A2) -> Mdspan<'a, T, E, L, A2> {
        Mdspan {
            data: self.data,
            mapping: self.mapping,
            accessor,
        }
    }
}

fn strided<M: LayoutMapping>(mapping: &M) -> StrideMapping<M::Extents> {
    const { assert!(M::ALWAYS_STRIDED, "layout is not strided") };
    StrideMapping::new(*mapping.extents(), mapping.strides())
}

/// Construction and element access usable in constant evaluation, for the
/// dense layouts over fully dynamic extents.
macro_rules! impl_const_dense {
    ($layout:ident, $mapping:ident) => {
        impl<'a, T, const R: usize> Mdspan<'a, T, Dextents<R>, $layout, DefaultAccessor<T>> {
            /// Panics if the span overflows or `data` is shorter than it.
            pub const fn new_const(data: &'a [T], extents: Dextents<R>) -> Self {
                match checked_size(extents.as_array()) {
                    Some(size) if size <= data.len() => {}
                    Some(_) => panic!("data is shorter than the required span"),
                    None => panic!("required span size overflows usize"),
                }
                Self {
                    data,
                    mapping: $mapping::new(extents),
                    accessor: DefaultAccessor::new(),
                }
            }

            pub const fn dims(&self) -> [usize; R] {
                self.mapping.dims()
            }

            pub const fn get_const(&self, index: [usize; R]) -> Option<&'a T> {
                let data: &'a [T] = self.data;
                match self.mapping.checked_offset(index) {
                    Some(offset) => Some(&data[offset]),
                    None => None,
                }
            }

            pub const fn at_const(&self, index: [usize; R]) -> &'a T {
                match self.get_const(index) {
                    Some(element) => element,
                    None => panic!("index out of bounds"),
                }
            }
        }
    };
}

impl_const_dense!(LayoutRight, RightMapping);
impl_const_dense!(LayoutLeft, LeftMapping);

impl<'a, T, E, L> Mdspan<'a, T, E, L, DefaultAccessor<T>>
where
    E: Extents,
    L: Layout,
{
    /// Shares the same memory with `ndarray`.
    #[cfg(feature = "ndarray")]
    pub fn as_array_view(&self) -> Result<ndarray::ArrayViewD<'a, T>, ndarray::ShapeError> {
        use ndarray::ShapeBuilder;
        let shape = ndarray::IxDyn(self.extents().to_index().as_ref());
        let strides = ndarray::IxDyn(self.mapping.strides().as_ref());
        ndarray::ArrayView::from_shape(shape.strides(strides), self.data)
    }
}

impl<T, E, L, A> Clone for Mdspan<'_, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            mapping: self.mapping,
            accessor: self.accessor.clone(),
        }
    }
}

impl<T, E, L, A> Copy for Mdspan<'_, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T> + Copy,
{
}

impl<T, E, L, A> std::fmt::Debug for Mdspan<'_, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mdspan")
            .field("mapping", &self.mapping)
            .field("accessor", &self.accessor)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<T, E, L> std::ops::Index<E::Index> for Mdspan<'_, T, E, L, DefaultAccessor<T>>
where
    E: Extents,
    L: Layout,
{
    type Output = T;

    fn index(&self, index: E::Index) -> &T {
        if let Err(e) = Enforcer::check_index(index.as_ref(), self.extents().to_index().as_ref())
        {
            panic!("{}", e);
        }
        &self.data[self.mapping.offset(index.as_ref())]
    }
}

/// # MdspanMut
///
/// [`Mdspan`] over a mutable slice.
pub struct MdspanMut<'a, T, E, L = LayoutRight, A = DefaultAccessor<T>>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    pub(crate) data: &'a mut [T],
    pub(crate) mapping: L::Mapping<E>,
    pub(crate) accessor: A,
}

impl<'a, T, E, L, A> MdspanMut<'a, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    pub fn from_parts(
        data: &'a mut [T],
        mapping: L::Mapping<E>,
        accessor: A,
    ) -> Result<Self, MdspanError> {
        Enforcer::check_span(mapping.checked_span_size(), data.len())?;
        Ok(Self {
            data,
            mapping,
            accessor,
        })
    }

    pub fn from_mapping(data: &'a mut [T], mapping: L::Mapping<E>) -> Result<Self, MdspanError>
    where
        A: Default,
    {
        Self::from_parts(data, mapping, A::default())
    }

    pub fn new(data: &'a mut [T], extents: E) -> Result<Self, MdspanError>
    where
        A: Default,
        L::Mapping<E>: From<E>,
    {
        Self::from_mapping(data, extents.into())
    }

    pub fn from_dynamic(data: &'a mut [T], dynamic: &[usize]) -> Result<Self, MdspanError>
    where
        A: Default,
        L::Mapping<E>: From<E>,
    {
        Self::new(data, E::from_dynamic(dynamic)?)
    }

    pub fn from_static(data: &'a mut [T]) -> Result<Self, MdspanError>
    where
        A: Default,
        L::Mapping<E>: From<E>,
    {
        const { assert!(E::RANK_DYNAMIC == 0, "extents have dynamic dimensions") };
        Self::new(data, E::default())
    }

    view_observers!();

    pub fn data_handle(&self) -> &[T] {
        &*self.data
    }

    pub fn data_handle_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> Mdspan<'_, T, E, L, A> {
        Mdspan {
            data: &*self.data,
            mapping: self.mapping,
            accessor: self.accessor.clone(),
        }
    }

    pub fn into_view(self) -> Mdspan<'a, T, E, L, A> {
        Mdspan {
            data: self.data,
            mapping: self.mapping,
            accessor: self.accessor,
        }
    }

    /// Returns `None` if any component of `index` is outside its extent.
    pub fn get(&self, index: E::Index) -> Option<A::Reference<'_>> {
        Enforcer::check_index(index.as_ref(), self.extents().to_index().as_ref()).ok()?;
        Some(self.accessor.access(&*self.data, self.mapping.offset(index.as_ref())))
    }

    /// Panics if any component of `index` is outside its extent.
    pub fn at(&self, index: E::Index) -> A::Reference<'_> {
        if let Err(e) = Enforcer::check_index(index.as_ref(), self.extents().to_index().as_ref())
        {
            panic!("{}", e);
        }
        self.accessor.access(&*self.data, self.mapping.offset(index.as_ref()))
    }

    pub fn get_mut(&mut self, index: E::Index) -> Option<&mut T>
    where
        A: AccessorMut,
    {
        Enforcer::check_index(index.as_ref(), self.extents().to_index().as_ref()).ok()?;
        let offset = self.mapping.offset(index.as_ref());
        Some(self.accessor.access_mut(self.data, offset))
    }

    pub fn at_mut(&mut self, index: E::Index) -> &mut T
    where
        A: AccessorMut,
    {
        if let Err(e) = Enforcer::check_index(index.as_ref(), self.extents().to_index().as_ref())
        {
            panic!("{}", e);
        }
        let offset = self.mapping.offset(index.as_ref());
        self.accessor.access_mut(self.data, offset)
    }

    pub fn try_into_extents<E2: Extents>(
        self,
    ) -> Result<MdspanMut<'a, T, E2, L, A>, MdspanError> {
        let mapping = L::remap::<E, E2>(&self.mapping)?;
        Ok(MdspanMut {
            data: self.data,
            mapping,
            accessor: self.accessor,
        })
    }

    pub fn into_strided(self) -> MdspanMut<'a, T, E, LayoutStride, A> {
        MdspanMut {
            mapping: strided(&self.mapping),
            data: self.data,
            accessor: self.accessor,
        }
    }
}

impl<T, E, L, A> std::fmt::Debug for MdspanMut<'_, T, E, L, A>
where
    E: Extents,
    L: Layout,
    A: Accessor<Element = T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MdspanMut")
            .field("mapping", &self.mapping)
            .field("accessor", &self.accessor)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<T, E, L> std::ops::Index<E::Index> for MdspanMut<'_, T, E, L, DefaultAccessor<T>>
where
    E: Extents,
    L: Layout,
{
    type Output = T;

    fn index(&self, index: E::Index) -> &T {
        self.at(index)
    }
}

impl<T, E, L> std::ops::IndexMut<E::Index> for MdspanMut<'_, T, E, L, DefaultAccessor<T>>
where
    E: Extents,
    L: Layout,
{
    fn index_mut(&mut self, index: E::Index) -> &mut T {
        self.at_mut(index)
    }
}
