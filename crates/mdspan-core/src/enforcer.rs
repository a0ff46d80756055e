use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MdspanError {
    #[error("Rank mismatch, expected {expected}, got {actual}.")]
    RankMismatch { expected: usize, actual: usize },
    #[error("Dynamic rank mismatch, expected {expected} dynamic extents, got {actual}.")]
    DynamicRankMismatch { expected: usize, actual: usize },
    #[error("Static extent mismatch at dim {dim}, {expected} != {actual}.")]
    StaticExtentMismatch {
        dim: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Stride mismatch at dim {dim}, expected {expected}, got {actual}.")]
    StrideMismatch {
        dim: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Required span size overflows usize.")]
    SizeOverflow,
    #[error("Mapping requires a span of {required} elements, data has {actual}.")]
    SpanTooSmall { required: usize, actual: usize },
    #[error("Index {index} out of bounds for dim {dim} with extent {extent}.")]
    IndexOutOfBounds {
        dim: usize,
        index: usize,
        extent: usize,
    },
    #[error("Invalid slice {range:?} for dim {dim} with extent {extent}.")]
    InvalidSlice {
        dim: usize,
        range: Range<usize>,
        extent: usize,
    },
}

/// # Enforcer
///
/// Enforcer checks the run-time preconditions shared by extents, mappings and views.
pub struct Enforcer;

impl Enforcer {
    pub fn check_rank(expected: usize, actual: usize) -> Result<(), MdspanError> {
        if expected != actual {
            return Err(MdspanError::RankMismatch { expected, actual });
        }
        Ok(())
    }

    pub fn check_rank_dynamic(expected: usize, actual: usize) -> Result<(), MdspanError> {
        if expected != actual {
            return Err(MdspanError::DynamicRankMismatch { expected, actual });
        }
        Ok(())
    }

    /// `required` is `None` when the span size overflowed.
    pub fn check_span(required: Option<usize>, actual: usize) -> Result<(), MdspanError> {
        let Some(required) = required else {
            log::debug!("Rejecting mapping whose span size overflows");
            return Err(MdspanError::SizeOverflow);
        };
        if required > actual {
            log::debug!("Rejecting span of {} elements, {} required", actual, required);
            return Err(MdspanError::SpanTooSmall { required, actual });
        }
        Ok(())
    }

    pub fn check_index(index: &[usize], extents: &[usize]) -> Result<(), MdspanError> {
        Self::check_rank(extents.len(), index.len())?;
        for (dim, (&index, &extent)) in index.iter().zip(extents.iter()).enumerate() {
            if index >= extent {
                return Err(MdspanError::IndexOutOfBounds { dim, index, extent });
            }
        }
        Ok(())
    }

    pub fn check_slice(dim: usize, range: &Range<usize>, extent: usize) -> Result<(), MdspanError> {
        if range.start > range.end || range.end > extent {
            return Err(MdspanError::InvalidSlice {
                dim,
                range: range.clone(),
                extent,
            });
        }
        Ok(())
    }

    pub fn check_strides(expected: &[usize], actual: &[usize]) -> Result<(), MdspanError> {
        Self::check_rank(expected.len(), actual.len())?;
        for (dim, (&expected, &actual)) in expected.iter().zip(actual.iter()).enumerate() {
            if expected != actual {
                log::debug!("Stride mismatch at dim {}: {} != {}", dim, expected, actual);
                return Err(MdspanError::StrideMismatch {
                    dim,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}
