use crate::{Enforcer, MdspanError};
use std::fmt::Debug;
use std::hash::Hash;

/// Marks a dimension whose extent is only known at run time.
pub const DYNAMIC_EXTENT: usize = usize::MAX;

/// Static extents `a` and `b` can describe the same shape.
pub const fn static_extents_compatible(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut r = 0;
    while r < a.len() {
        if a[r] != DYNAMIC_EXTENT && b[r] != DYNAMIC_EXTENT && a[r] != b[r] {
            return false;
        }
        r += 1;
    }
    true
}

/// Product of the static extents, if none of them is dynamic.
pub const fn static_size(extents: &[usize]) -> Option<usize> {
    let mut size = 1;
    let mut r = 0;
    while r < extents.len() {
        if extents[r] == DYNAMIC_EXTENT {
            return None;
        }
        size *= extents[r];
        r += 1;
    }
    Some(size)
}

/// Product of `extents`, `None` if the product of the non-zero extents
/// overflows `usize`.
pub const fn checked_size(extents: &[usize]) -> Option<usize> {
    let mut size: usize = 1;
    let mut empty = false;
    let mut r = 0;
    while r < extents.len() {
        if extents[r] == 0 {
            empty = true;
        } else {
            match size.checked_mul(extents[r]) {
                Some(s) => size = s,
                None => return None,
            }
        }
        r += 1;
    }
    if empty {
        Some(0)
    } else {
        Some(size)
    }
}

/// A single dimension of an [`Extents`] type.
pub trait Dimension: Copy + Debug + Default + Eq + Hash + Send + Sync + 'static {
    /// The compile time extent, or [`DYNAMIC_EXTENT`].
    const STATIC: usize;

    fn get(&self) -> usize;

    /// Pulls the next dynamic value, static dimensions consume nothing.
    fn take<I: Iterator<Item = usize>>(dynamic: &mut I) -> Self;
}

/// A dimension fixed at compile time. Occupies no storage.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Static<const N: usize>;

impl<const N: usize> Dimension for Static<N> {
    const STATIC: usize = {
        assert!(N != DYNAMIC_EXTENT, "static extent cannot be DYNAMIC_EXTENT");
        N
    };

    #[inline]
    fn get(&self) -> usize {
        Self::STATIC
    }

    #[inline]
    fn take<I: Iterator<Item = usize>>(_dynamic: &mut I) -> Self {
        Static
    }
}

impl<const N: usize> Debug for Static<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", N)
    }
}

/// A dimension known only at run time.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dyn(pub usize);

impl Dimension for Dyn {
    const STATIC: usize = DYNAMIC_EXTENT;

    #[inline]
    fn get(&self) -> usize {
        self.0
    }

    #[inline]
    fn take<I: Iterator<Item = usize>>(dynamic: &mut I) -> Self {
        Dyn(dynamic.next().unwrap_or(0))
    }
}

impl Debug for Dyn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}?", self.0)
    }
}

/// # Extents
///
/// The shape of a multidimensional index space. Each dimension is either
/// [`Static`], fixed by the type, or [`Dyn`], stored in the value. Only dynamic
/// extents take up space.
///
/// Implemented for tuples of [`Dimension`]s up to rank 8 (see [`extents!`](crate::extents))
/// and for [`Dextents`] of any rank.
pub trait Extents: Copy + Debug + Default + Eq + Hash + Send + Sync + 'static {
    const RANK: usize;
    const RANK_DYNAMIC: usize;
    /// Per dimension compile time extent, [`DYNAMIC_EXTENT`] where dynamic.
    const STATIC_EXTENTS: &'static [usize];

    /// A multi-index into this index space, `[usize; RANK]`.
    type Index: Copy
        + Debug
        + Eq
        + Hash
        + Send
        + Sync
        + AsRef<[usize]>
        + AsMut<[usize]>
        + 'static;

    /// All extents, static and dynamic.
    fn to_index(&self) -> Self::Index;

    fn zero_index() -> Self::Index;

    /// Builds the extents from a stream of exactly `RANK_DYNAMIC` values.
    #[doc(hidden)]
    fn build<I: Iterator<Item = usize>>(dynamic: &mut I) -> Self;

    fn rank(&self) -> usize {
        Self::RANK
    }

    fn rank_dynamic(&self) -> usize {
        Self::RANK_DYNAMIC
    }

    fn static_extent(r: usize) -> usize {
        Self::STATIC_EXTENTS[r]
    }

    /// Position of dimension `r` among the dynamic dimensions.
    fn dynamic_index(r: usize) -> usize {
        Self::STATIC_EXTENTS[..r]
            .iter()
            .filter(|&&e| e == DYNAMIC_EXTENT)
            .count()
    }

    fn static_size() -> Option<usize> {
        static_size(Self::STATIC_EXTENTS)
    }

    #[inline]
    fn extent(&self, r: usize) -> usize {
        self.to_index().as_ref()[r]
    }

    /// Number of points in the index space.
    fn size(&self) -> usize {
        self.to_index().as_ref().iter().product()
    }

    /// [`Extents::size`], `None` if it cannot be represented.
    fn checked_size(&self) -> Option<usize> {
        checked_size(self.to_index().as_ref())
    }

    fn index_from_slice(values: &[usize]) -> Result<Self::Index, MdspanError> {
        Enforcer::check_rank(Self::RANK, values.len())?;
        let mut index = Self::zero_index();
        index.as_mut().copy_from_slice(values);
        Ok(index)
    }

    /// Constructs from the dynamic extents only.
    fn from_dynamic(values: &[usize]) -> Result<Self, MdspanError> {
        Enforcer::check_rank_dynamic(Self::RANK_DYNAMIC, values.len())?;
        Ok(Self::build(&mut values.iter().copied()))
    }

    /// Constructs from every extent, static ones must agree with the type.
    fn from_values(values: &[usize]) -> Result<Self, MdspanError> {
        Enforcer::check_rank(Self::RANK, values.len())?;
        for (dim, (&expected, &actual)) in Self::STATIC_EXTENTS.iter().zip(values).enumerate() {
            if expected != DYNAMIC_EXTENT && expected != actual {
                return Err(MdspanError::StaticExtentMismatch {
                    dim,
                    expected,
                    actual,
                });
            }
        }
        let mut dynamic = Self::STATIC_EXTENTS
            .iter()
            .zip(values)
            .filter(|(&e, _)| e == DYNAMIC_EXTENT)
            .map(|(_, &v)| v);
        Ok(Self::build(&mut dynamic))
    }

    /// Converts between extents types of equal rank.
    ///
    /// Mismatched ranks or conflicting static extents fail to compile. A static
    /// extent of `Self` backed by a dynamic extent of `other` is checked here.
    fn try_from_extents<O: Extents>(other: &O) -> Result<Self, MdspanError> {
        const {
            assert!(
                static_extents_compatible(Self::STATIC_EXTENTS, O::STATIC_EXTENTS),
                "extents have different ranks or conflicting static extents"
            )
        };
        Self::from_values(other.to_index().as_ref()).inspect_err(|e| {
            log::debug!("Cannot convert extents {:?}: {}", other, e);
        })
    }

    /// Equality across extents types.
    fn same_extents<O: Extents>(&self, other: &O) -> bool {
        Self::RANK == O::RANK && self.to_index().as_ref() == other.to_index().as_ref()
    }
}

macro_rules! impl_extents {
    ($rank:literal; $($D:ident $idx:tt),*) => {
        impl<$($D: Dimension),*> Extents for ($($D,)*) {
            const RANK: usize = $rank;
            const RANK_DYNAMIC: usize = 0 $(+ (<$D as Dimension>::STATIC == DYNAMIC_EXTENT) as usize)*;
            const STATIC_EXTENTS: &'static [usize] = &[$(<$D as Dimension>::STATIC),*];

            type Index = [usize; $rank];

            #[inline]
            #[allow(clippy::unused_unit)]
            fn to_index(&self) -> Self::Index {
                [$(self.$idx.get()),*]
            }

            fn zero_index() -> Self::Index {
                [0; $rank]
            }

            #[allow(unused_variables, clippy::unused_unit)]
            fn build<I: Iterator<Item = usize>>(dynamic: &mut I) -> Self {
                ($(<$D as Dimension>::take(dynamic),)*)
            }
        }
    };
}

impl_extents!(0;);
impl_extents!(1; D0 0);
impl_extents!(2; D0 0, D1 1);
impl_extents!(3; D0 0, D1 1, D2 2);
impl_extents!(4; D0 0, D1 1, D2 2, D3 3);
impl_extents!(5; D0 0, D1 1, D2 2, D3 3, D4 4);
impl_extents!(6; D0 0, D1 1, D2 2, D3 3, D4 4, D5 5);
impl_extents!(7; D0 0, D1 1, D2 2, D3 3, D4 4, D5 5, D6 6);
impl_extents!(8; D0 0, D1 1, D2 2, D3 3, D4 4, D5 5, D6 6, D7 7);

/// Extents of rank `R` where every dimension is dynamic.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dextents<const R: usize>([usize; R]);

impl<const R: usize> Dextents<R> {
    pub const fn new(extents: [usize; R]) -> Self {
        Self(extents)
    }

    pub const fn as_array(&self) -> &[usize; R] {
        &self.0
    }
}

impl<const R: usize> Default for Dextents<R> {
    fn default() -> Self {
        Self([0; R])
    }
}

impl<const R: usize> From<[usize; R]> for Dextents<R> {
    fn from(extents: [usize; R]) -> Self {
        Self(extents)
    }
}

impl<const R: usize> Debug for Dextents<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (r, dim) in self.0.iter().enumerate() {
            if r > 0 {
                write!(f, "x")?;
            }
            write!(f, "{}", dim)?;
        }
        write!(f, "]")
    }
}

impl<const R: usize> Extents for Dextents<R> {
    const RANK: usize = R;
    const RANK_DYNAMIC: usize = R;
    const STATIC_EXTENTS: &'static [usize] = &[DYNAMIC_EXTENT; R];

    type Index = [usize; R];

    #[inline]
    fn to_index(&self) -> Self::Index {
        self.0
    }

    fn zero_index() -> Self::Index {
        [0; R]
    }

    fn build<I: Iterator<Item = usize>>(dynamic: &mut I) -> Self {
        let mut extents = [0; R];
        for e in extents.iter_mut() {
            *e = dynamic.next().unwrap_or(0);
        }
        Self(extents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extents;
    use proptest::prelude::*;
    use test_strategy::proptest;

    type Mixed = extents![3, _, 4];

    #[test]
    fn test_static_properties() {
        assert_eq!(Mixed::RANK, 3);
        assert_eq!(Mixed::RANK_DYNAMIC, 1);
        assert_eq!(Mixed::STATIC_EXTENTS, &[3, DYNAMIC_EXTENT, 4]);
        assert_eq!(Mixed::static_extent(2), 4);
        assert_eq!(Mixed::dynamic_index(1), 0);
        assert_eq!(Mixed::dynamic_index(2), 1);
        assert_eq!(Mixed::static_size(), None);
        assert_eq!(<extents![2, 3]>::static_size(), Some(6));
        assert_eq!(<()>::RANK, 0);
        assert_eq!(<()>::default().size(), 1);
    }

    #[test]
    fn test_only_dynamic_extents_are_stored() {
        assert_eq!(std::mem::size_of::<extents![3, 4, 5]>(), 0);
        assert_eq!(
            std::mem::size_of::<extents![3, _, 5]>(),
            std::mem::size_of::<usize>()
        );
        assert_eq!(
            std::mem::size_of::<Dextents<3>>(),
            3 * std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_from_dynamic() -> anyhow::Result<()> {
        let e = Mixed::from_dynamic(&[5])?;
        assert_eq!(e.to_index(), [3, 5, 4]);
        assert_eq!(e.extent(1), 5);
        assert_eq!(e.size(), 60);
        assert_eq!(
            Mixed::from_dynamic(&[]),
            Err(MdspanError::DynamicRankMismatch {
                expected: 1,
                actual: 0
            })
        );
        Ok(())
    }

    #[test]
    fn test_from_values() -> anyhow::Result<()> {
        let e = Mixed::from_values(&[3, 7, 4])?;
        assert_eq!(e.to_index(), [3, 7, 4]);
        assert_eq!(
            Mixed::from_values(&[3, 7, 5]),
            Err(MdspanError::StaticExtentMismatch {
                dim: 2,
                expected: 4,
                actual: 5
            })
        );
        assert_eq!(
            Mixed::from_values(&[3, 7]),
            Err(MdspanError::RankMismatch {
                expected: 3,
                actual: 2
            })
        );
        Ok(())
    }

    #[test]
    fn test_default_dynamic_extents_are_zero() {
        let e = <extents![_, 10]>::default();
        assert_eq!(e.to_index(), [0, 10]);
        assert_eq!(e.size(), 0);
        assert_eq!(Dextents::<2>::default().to_index(), [0, 0]);
    }

    #[test]
    fn test_compatible_conversion() -> anyhow::Result<()> {
        let src = <extents![5, _]>::from_dynamic(&[10])?;
        let dst = <extents![_, 10]>::try_from_extents(&src)?;
        assert!(dst.same_extents(&src));
        assert_eq!(dst.to_index(), [5, 10]);

        let dynamic = Dextents::<2>::try_from_extents(&dst)?;
        assert_eq!(dynamic, Dextents::new([5, 10]));

        let back = <extents![5, 10]>::try_from_extents(&dynamic)?;
        assert!(back.same_extents(&dynamic));
        Ok(())
    }

    #[test]
    fn test_incompatible_dynamic_value() {
        let src = Dextents::new([5, 11]);
        assert_eq!(
            <extents![5, 10]>::try_from_extents(&src),
            Err(MdspanError::StaticExtentMismatch {
                dim: 1,
                expected: 10,
                actual: 11
            })
        );
    }

    #[test]
    fn test_same_extents_across_ranks() {
        let a = Dextents::new([2, 3]);
        let b = Dextents::new([2, 3, 1]);
        assert!(!a.same_extents(&b));
        assert!(a.same_extents(&<extents![2, 3]>::default()));
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(Static::<3>.get(), 3);
        assert_eq!(Dyn(4).get(), 4);
        assert_eq!(format!("{:?}", <extents![3, _]>::default()), "(3, 0?)");
    }

    #[test]
    fn test_dextents_debug() {
        assert_eq!(format!("{:?}", Dextents::new([2, 3])), "[2x3]");
        assert_eq!(format!("{:?}", Dextents::new([7])), "[7]");
        assert_eq!(format!("{:?}", Dextents::<0>::default()), "[]");
    }

    #[test]
    fn test_checked_size() {
        assert_eq!(checked_size(&[]), Some(1));
        assert_eq!(checked_size(&[3, 4]), Some(12));
        assert_eq!(checked_size(&[1 << 63, 2]), None);
        assert_eq!(checked_size(&[0, 1 << 63, 2]), None);
        assert_eq!(checked_size(&[0, 1 << 62]), Some(0));
        assert_eq!(Dextents::new([usize::MAX, 2]).checked_size(), None);
        assert_eq!(<extents![3, _]>::from_dynamic(&[5]).unwrap().checked_size(), Some(15));
    }

    #[test]
    fn test_static_compatibility() {
        assert!(static_extents_compatible(&[DYNAMIC_EXTENT, 10], &[5, DYNAMIC_EXTENT]));
        assert!(!static_extents_compatible(&[5, 10], &[5, 11]));
        assert!(!static_extents_compatible(&[5], &[5, 10]));
    }

    #[proptest(cases = 64)]
    fn test_dynamic_positions(#[strategy(proptest::collection::vec(0..16usize, 3))] dims: Vec<usize>) {
        let e = <extents![_, 4, _]>::from_dynamic(&[dims[0], dims[2]]).unwrap();
        prop_assert_eq!(e.to_index(), [dims[0], 4, dims[2]]);
        prop_assert_eq!(e.size(), dims[0] * 4 * dims[2]);
        prop_assert!(e.same_extents(&Dextents::new([dims[0], 4, dims[2]])));
    }
}
