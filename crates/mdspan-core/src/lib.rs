#![allow(non_snake_case)]
mod accessor;
mod enforcer;
mod extents;
mod layout;
mod submdspan;
mod view;

pub use accessor::*;
pub use enforcer::*;
pub use extents::*;
pub use layout::*;
pub use submdspan::*;
pub use view::*;

use smallvec::SmallVec;
pub type RVec<T> = SmallVec<[T; 4]>;

//https://github.com/sonos/tract/blob/main/data/src/macros.rs#L2
#[macro_export]
macro_rules! rvec {
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::RVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ rvec![@one $x])*;
        #[allow(unused_mut)]
        let mut vec = $crate::RVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::RVec::from_vec(vec![$($x,)*])
        }
    });
}

/// Names an extents type, `_` marks a dynamic dimension.
///
/// ```
/// use mdspan::{extents, Dyn, Static};
/// let _: extents![3, _, 4] = (Static::<3>, Dyn(7), Static::<4>);
/// ```
#[macro_export]
macro_rules! extents {
    (@dim _) => { $crate::Dyn };
    (@dim $n:expr) => { $crate::Static<{ $n }> };
    ($($d:tt),* $(,)?) => { ( $($crate::extents!(@dim $d),)* ) };
}

pub mod prelude {
    pub use crate::{
        extents, Accessor, DefaultAccessor, Dextents, Dyn, Extents, Layout, LayoutLeft,
        LayoutMapping, LayoutRight, LayoutStride, Mdspan, MdspanMut, SliceSpecifier, Static,
        DYNAMIC_EXTENT,
    };
}
