// SPDX-License-Identifier: MIT

//! Logarithmic size classes.

/// Size class of a non-empty file: `floor(log2(bytes))`.
///
/// Zero-byte files have no class; callers filter them out first.
#[inline]
pub fn size_bucket(bytes: u64) -> u32 {
    debug_assert!(bytes > 0, "size_bucket called on an empty file");
    bytes.checked_ilog2().unwrap_or(0)
}

/// Same as [`size_bucket`] but total: `None` for zero bytes.
#[inline]
pub fn try_size_bucket(bytes: u64) -> Option<u32> {
    bytes.checked_ilog2()
}

/// Smallest size (inclusive) falling in `bucket`.
#[inline]
pub fn bucket_floor(bucket: u32) -> u64 {
    1u64.checked_shl(bucket).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(size_bucket(1), 0);
        assert_eq!(size_bucket(2), 1);
        assert_eq!(size_bucket(3), 1);
        assert_eq!(size_bucket(1023), 9);
        assert_eq!(size_bucket(1024), 10);
        assert_eq!(size_bucket(1500), 10);
        assert_eq!(size_bucket(u64::MAX), 63);
    }

    #[test]
    fn test_zero_has_no_bucket() {
        assert_eq!(try_size_bucket(0), None);
        assert_eq!(try_size_bucket(10), Some(3));
    }

    #[test]
    fn test_bucket_floor_is_inverse() {
        for bucket in 0..64 {
            let floor = bucket_floor(bucket);
            assert_eq!(size_bucket(floor), bucket, "floor of bucket {bucket}");
            if floor > 1 {
                assert_eq!(size_bucket(floor - 1), bucket - 1);
            }
        }
        assert_eq!(bucket_floor(64), 0, "out of range bucket");
    }
}
