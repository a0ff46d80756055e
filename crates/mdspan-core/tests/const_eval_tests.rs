use mdspan::{extents, Dextents, Extents, Layout, LayoutLeft, LayoutRight, Mdspan};

const ROW_MAJOR: [i32; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
// Rows of three, each padded to four.
const PADDED: [i32; 12] = [1, 2, 3, 0, 4, 5, 6, 0, 7, 8, 9, 0];
const COLUMN_MAJOR: [i32; 12] = [1, 4, 7, 2, 5, 8, 3, 6, 9, 0, 0, 0];

const fn static_sum(add_to_row: i32) -> i32 {
    let s = Mdspan::<i32, Dextents<2>>::new_const(&ROW_MAJOR, Dextents::new([3, 3]));
    let mut result = 0;
    let mut col = 0;
    while col < 3 {
        let mut row = 0;
        while row < 3 {
            result += *s.at_const([row, col]) * (row as i32 + add_to_row);
            row += 1;
        }
        col += 1;
    }
    result
}

/// Sums the leading 3x3 block of a 3x4 view.
const fn padded_sum(add_to_row: i32) -> i32 {
    let s = Mdspan::<i32, Dextents<2>>::new_const(&PADDED, Dextents::new([3, 4]));
    let mut result = 0;
    let mut col = 0;
    while col < 3 {
        let mut row = 0;
        while row < s.dims()[0] {
            result += *s.at_const([row, col]) * (row as i32 + add_to_row);
            row += 1;
        }
        col += 1;
    }
    result
}

const fn left_sum(add_to_row: i32) -> i32 {
    let s = Mdspan::<i32, Dextents<2>, LayoutLeft>::new_const(&COLUMN_MAJOR, Dextents::new([3, 4]));
    let mut result = 0;
    let mut col = 0;
    while col < 3 {
        let mut row = 0;
        while row < 3 {
            result += *s.at_const([row, col]) * (row as i32 + add_to_row);
            row += 1;
        }
        col += 1;
    }
    result
}

// 1 + 2 + 3 + 2*(4 + 5 + 6) + 3*(7 + 8 + 9) = 108
const _: () = assert!(static_sum(1) == 108);
// -1 - 2 - 3 + 7 + 8 + 9 = 18
const _: () = assert!(static_sum(-1) == 18);
const _: () = assert!(padded_sum(1) == 108);
const _: () = assert!(padded_sum(-1) == 18);
const _: () = assert!(left_sum(1) == 108);
const _: () = assert!(left_sum(-1) == 18);

// A dense 3x3 view over padded rows reads the padding as data.
const DENSE_OVER_PADDED: i32 =
    *Mdspan::<i32, Dextents<2>>::new_const(&PADDED, Dextents::new([3, 3])).at_const([1, 0]);
const _: () = assert!(DENSE_OVER_PADDED == 0);
const _: () = assert!(Mdspan::<i32, Dextents<2>>::new_const(&PADDED, Dextents::new([3, 4]))
    .get_const([3, 0])
    .is_none());

type Computed = extents![{ static_sum(-1) as usize }];

const _: () = assert!(<Computed as Extents>::RANK_DYNAMIC == 0);

fn weighted_sum<E: Extents, L: Layout>(s: &Mdspan<'_, i32, E, L>, add_to_row: i32) -> i32
where
    E: Extents<Index = [usize; 2]>,
{
    let mut result = 0;
    for col in 0..3 {
        for row in 0..3 {
            result += s[[row, col]] * (row as i32 + add_to_row);
        }
    }
    result
}

#[test]
fn test_static_sum() -> anyhow::Result<()> {
    let data = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    let s = Mdspan::<i32, extents![3, 3]>::from_static(&data)?;
    assert_eq!(weighted_sum(&s, 1), 108);
    assert_eq!(weighted_sum(&s, -1), 18);
    assert_eq!(weighted_sum(&s, 1), static_sum(1));
    Ok(())
}

#[test]
fn test_extent_computed_in_type() -> anyhow::Result<()> {
    let data = [0.0; 18];
    let s = Mdspan::<f64, Computed>::from_static(&data)?;
    assert_eq!(s.extent(0), 18);
    assert_eq!(Mdspan::<f64, Computed>::static_extent(0), 18);
    Ok(())
}

#[test]
fn test_1d_with_extent_computed_in_type() -> anyhow::Result<()> {
    let data = (1..=18).collect::<Vec<i32>>();
    let s = Mdspan::<i32, Computed>::from_static(&data)?;
    // 4 + 14 + 18 + 1 = 37
    assert_eq!(s[[3]] + s[[13]] + s[[17]] + s[[0]], 37);
    Ok(())
}

#[test]
fn test_dynamic_sum() -> anyhow::Result<()> {
    let data = [1, 2, 3, 0, 4, 5, 6, 0, 7, 8, 9, 0];
    let s = Mdspan::<i32, extents![_, _]>::from_dynamic(&data, &[3, 4])?;
    assert_eq!(weighted_sum(&s, 1), padded_sum(1));
    assert_eq!(weighted_sum(&s, -1), padded_sum(-1));
    Ok(())
}

#[test]
fn test_mixed_layout_left_sum() -> anyhow::Result<()> {
    let data = [1, 4, 7, 2, 5, 8, 3, 6, 9, 0, 0, 0];
    let s = Mdspan::<i32, extents![_, _], LayoutLeft>::from_dynamic(&data, &[3, 4])?;
    assert_eq!(weighted_sum(&s, 1), 108);
    assert_eq!(weighted_sum(&s, 1), left_sum(1));
    assert_eq!(weighted_sum(&s, -1), left_sum(-1));
    Ok(())
}

fn single_element<E: Extents, L: Layout>() -> anyhow::Result<bool>
where
    <L as Layout>::Mapping<E>: From<E>,
{
    let data = [42];
    let ones = vec![1; E::RANK];
    let s = Mdspan::<i32, E, L>::new(&data, E::from_values(&ones)?)?;
    Ok(*s.at(E::zero_index()) == 42 && s.size() == 1)
}

macro_rules! single_element_stress {
    ($layout:ty; $($ext:ty),* $(,)?) => {
        $(assert!(single_element::<$ext, $layout>()?, "{}", stringify!($ext));)*
    };
}

#[test]
fn test_multidimensional_single_element_stress() -> anyhow::Result<()> {
    single_element_stress!(LayoutLeft;
        extents![],
        extents![1],
        extents![1, 1],
        extents![1, 1, 1],
        extents![1, 1, 1, 1],
        extents![1, 1, 1, 1, 1],
        extents![1, 1, 1, 1, 1, 1],
        extents![1, 1, 1, 1, 1, 1, 1],
        extents![1, 1, 1, 1, 1, 1, 1, 1],
        extents![_, _, _, _, _, _, _, _],
        Dextents<22>,
    );
    single_element_stress!(LayoutRight;
        extents![],
        extents![_],
        extents![_, 1],
        extents![1, _, 1],
        extents![_, _, _, _],
        extents![1, 1, 1, 1, 1, 1, 1, 1],
        Dextents<22>,
    );
    Ok(())
}
