use derive_new::new;
use num_traits::NumOps;
use std::fmt::Debug;
use std::marker::PhantomData;

/// # Accessor
///
/// Turns an offset produced by a layout mapping into an element reference.
pub trait Accessor: Clone + Debug {
    type Element;
    type Reference<'a>
    where
        Self: 'a;

    fn access<'a>(&self, data: &'a [Self::Element], offset: usize) -> Self::Reference<'a>
    where
        Self: 'a;
}

/// An accessor whose elements can be written through.
pub trait AccessorMut: Accessor {
    fn access_mut<'a>(&self, data: &'a mut [Self::Element], offset: usize)
        -> &'a mut Self::Element;
}

/// Plain references into the data.
pub struct DefaultAccessor<T>(PhantomData<fn() -> T>);

impl<T> DefaultAccessor<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for DefaultAccessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for DefaultAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DefaultAccessor<T> {}

impl<T> Debug for DefaultAccessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DefaultAccessor<{}>", std::any::type_name::<T>())
    }
}

impl<T> Accessor for DefaultAccessor<T> {
    type Element = T;
    type Reference<'a>
        = &'a T
    where
        Self: 'a;

    #[inline]
    fn access<'a>(&self, data: &'a [T], offset: usize) -> &'a T
    where
        Self: 'a,
    {
        &data[offset]
    }
}

impl<T> AccessorMut for DefaultAccessor<T> {
    #[inline]
    fn access_mut<'a>(&self, data: &'a mut [T], offset: usize) -> &'a mut T {
        &mut data[offset]
    }
}

/// Read-only accessor yielding every element multiplied by `scale`.
#[derive(new, Debug, Clone, Copy, PartialEq)]
pub struct ScaledAccessor<T> {
    scale: T,
}

impl<T> ScaledAccessor<T> {
    pub fn scale(&self) -> &T {
        &self.scale
    }
}

impl<T> Accessor for ScaledAccessor<T>
where
    T: NumOps + Copy + Debug,
{
    type Element = T;
    type Reference<'a>
        = T
    where
        Self: 'a;

    #[inline]
    fn access<'a>(&self, data: &'a [T], offset: usize) -> T
    where
        Self: 'a,
    {
        self.scale * data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accessor() {
        let mut data = [1, 2, 3];
        let acc = DefaultAccessor::<i32>::new();
        assert_eq!(*acc.access(&data, 2), 3);
        *acc.access_mut(&mut data, 0) = 10;
        assert_eq!(data, [10, 2, 3]);
    }

    #[test]
    fn test_scaled_accessor() {
        let data = [1.5f32, -2.0, 4.0];
        let acc = ScaledAccessor::new(2.0f32);
        assert_eq!(acc.access(&data, 0), 3.0);
        assert_eq!(acc.access(&data, 1), -4.0);
        assert_eq!(*acc.scale(), 2.0);
    }
}
