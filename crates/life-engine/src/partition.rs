//! Row-band partitioning for parallel generation stepping.

use std::ops::Range;

use crate::error::ConfigError;

/// A contiguous half-open row range `[start, end)` owned exclusively by one
/// worker for writes.
///
/// Read access to the whole grid is shared; only writes are partitioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Band {
    pub start: usize,
    pub end: usize,
}

impl Band {
    /// Number of rows in the band.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the band holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Iterate over the band's row indices.
    #[must_use]
    pub const fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

pub(crate) fn check_dimensions(size: usize, workers: usize) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::ZeroSize);
    }
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    if workers > size {
        return Err(ConfigError::TooManyWorkers { workers, size });
    }
    Ok(())
}

/// Split row range `[0, size)` into `workers` contiguous bands.
///
/// Every worker gets `size / workers` rows except the last, whose band runs
/// to `size` and absorbs the remainder. Bands cover `[0, size)` exactly once
/// with no gaps and no overlaps; this disjointness is what lets the write
/// phase run without a lock.
pub fn partition(size: usize, workers: usize) -> Result<Vec<Band>, ConfigError> {
    check_dimensions(size, workers)?;

    let rows_per_worker = size / workers;
    let mut bands = Vec::with_capacity(workers);
    for i in 0..workers {
        let start = i * rows_per_worker;
        let end = if i == workers - 1 { size } else { start + rows_per_worker };
        bands.push(Band { start, end });
    }
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_cover_rows_exactly_once() {
        for size in 1..=12 {
            for workers in 1..=size {
                let bands = partition(size, workers).unwrap();
                assert_eq!(bands.len(), workers);
                assert_eq!(bands[0].start, 0);
                assert_eq!(bands[workers - 1].end, size);
                for band in &bands {
                    assert!(!band.is_empty(), "degenerate band for {size}/{workers}");
                }
                for pair in bands.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start, "gap or overlap at {pair:?}");
                }
            }
        }
    }

    #[test]
    fn last_band_absorbs_the_remainder() {
        let bands = partition(10, 4).unwrap();
        assert_eq!(
            bands,
            vec![
                Band { start: 0, end: 2 },
                Band { start: 2, end: 4 },
                Band { start: 4, end: 6 },
                Band { start: 6, end: 10 },
            ]
        );
    }

    #[test]
    fn even_division_has_equal_bands() {
        let bands = partition(8, 4).unwrap();
        assert!(bands.iter().all(|band| band.len() == 2));
    }

    #[test]
    fn rejects_zero_workers() {
        assert_eq!(partition(8, 0), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn rejects_more_workers_than_rows() {
        assert_eq!(
            partition(4, 5),
            Err(ConfigError::TooManyWorkers { workers: 5, size: 4 })
        );
    }

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(partition(0, 1), Err(ConfigError::ZeroSize));
    }
}
