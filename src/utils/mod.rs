mod bench;

pub mod black_box;
pub use black_box::black_box;

/// Byte-string equality whose running time depends only on the lengths.
///
/// Every byte pair is folded into one accumulator before the single
/// comparison; the accumulator goes through [`black_box`] so the fold cannot
/// be turned back into an early-exit loop.
#[inline(always)]
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut x = 0u8;

    for (l, r) in a.iter().zip(b.iter()) {
        x |= black_box(*l ^ *r);
    }

    black_box(x) == 0
}

/// Converts a size in bytes to a human-readable string. For benchmarking
pub fn human_readable_size(size: usize) -> String {
    let mut cal_size = size;
    let mut unit = 0;
    while cal_size >= 1024 && cal_size % 1024 == 0 {
        cal_size >>= 10;
        unit += 1;
    }
    let unit = match unit {
        0 => "B",
        1 => "KiB",
        2 => "MiB",
        _ => "GiB",
    };
    format!("{}{}", cal_size, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        let a = [0x5au8; 16];
        let mut b = a;
        assert!(constant_time_eq(&a, &b));

        for i in 0..16 {
            b[i] ^= 0x01;
            assert!(!constant_time_eq(&a, &b));
            b[i] ^= 0x01;
        }

        assert!(!constant_time_eq(&a, &b[..15]));
        assert!(constant_time_eq(&[], &[]));
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable_size(64), "64B");
        assert_eq!(human_readable_size(1024), "1KiB");
        assert_eq!(human_readable_size(65536), "64KiB");
        assert_eq!(human_readable_size(1000), "1000B");
    }
}
