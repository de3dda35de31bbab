//! Little-endian 32-bit word access for key, block and tag bytes.
//!
//! Two interchangeable routines exist: `NativeWords` reads and writes whole
//! words in host order and is only correct on little-endian hosts,
//! `PortableWords` assembles every word byte by byte. The host is probed once
//! per process and the answer cached.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::utils::black_box;

pub(crate) trait Words {
    fn load_u32(bytes: &[u8], offset: usize) -> u32;
    fn store_u32(out: &mut [u8], offset: usize, word: u32);
}

pub(crate) struct NativeWords;

impl Words for NativeWords {
    #[inline(always)]
    fn load_u32(bytes: &[u8], offset: usize) -> u32 {
        let word = &bytes[offset..offset + 4];
        // SAFETY: `word` is exactly four initialized bytes.
        unsafe { core::ptr::read_unaligned(word.as_ptr() as *const u32) }
    }

    #[inline(always)]
    fn store_u32(out: &mut [u8], offset: usize, word: u32) {
        let dst = &mut out[offset..offset + 4];
        // SAFETY: `dst` is exactly four writable bytes.
        unsafe { core::ptr::write_unaligned(dst.as_mut_ptr() as *mut u32, word) }
    }
}

pub(crate) struct PortableWords;

impl Words for PortableWords {
    #[inline(always)]
    fn load_u32(bytes: &[u8], offset: usize) -> u32 {
        let word = &bytes[offset..offset + 4];
        u32::from(word[0])
            | (u32::from(word[1]) << 8)
            | (u32::from(word[2]) << 16)
            | (u32::from(word[3]) << 24)
    }

    #[inline(always)]
    fn store_u32(out: &mut [u8], offset: usize, word: u32) {
        let dst = &mut out[offset..offset + 4];
        dst[0] = word as u8;
        dst[1] = (word >> 8) as u8;
        dst[2] = (word >> 16) as u8;
        dst[3] = (word >> 24) as u8;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WordCodec {
    Native,
    Portable,
}

const UNPROBED: u8 = 0;
const NATIVE: u8 = 1;
const PORTABLE: u8 = 2;

static CODEC: AtomicU8 = AtomicU8::new(UNPROBED);

impl WordCodec {
    /// The codec for this host, probed on first use.
    #[inline]
    pub(crate) fn detect() -> Self {
        match CODEC.load(Ordering::Relaxed) {
            NATIVE => WordCodec::Native,
            PORTABLE => WordCodec::Portable,
            _ => {
                let codec = if !cfg!(feature = "portable") && host_is_little_endian() {
                    WordCodec::Native
                } else {
                    WordCodec::Portable
                };
                let tag = match codec {
                    WordCodec::Native => NATIVE,
                    WordCodec::Portable => PORTABLE,
                };
                CODEC.store(tag, Ordering::Relaxed);
                codec
            }
        }
    }
}

/// Byte-order-mark probe: the UTF-32LE BOM read as a host word.
pub(crate) fn host_is_little_endian() -> bool {
    let bom = [0xffu8, 0xfe, 0x00, 0x00];
    black_box(u32::from_ne_bytes(bom)) == 0x0000_feff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_matches_target() {
        assert_eq!(host_is_little_endian(), cfg!(target_endian = "little"));
    }

    #[test]
    fn test_detect_is_stable() {
        let first = WordCodec::detect();
        for _ in 0..8 {
            assert_eq!(WordCodec::detect(), first);
        }
        if cfg!(feature = "portable") || !host_is_little_endian() {
            assert_eq!(first, WordCodec::Portable);
        } else {
            assert_eq!(first, WordCodec::Native);
        }
    }

    #[test]
    fn test_native_and_portable_agree() {
        if !host_is_little_endian() {
            return;
        }
        let bytes = (0..32).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        for offset in 0..=28 {
            let native = NativeWords::load_u32(&bytes, offset);
            let portable = PortableWords::load_u32(&bytes, offset);
            assert_eq!(native, portable);
            assert_eq!(portable, u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]));

            let mut a = [0u8; 8];
            let mut b = [0u8; 8];
            NativeWords::store_u32(&mut a, offset % 5, native);
            PortableWords::store_u32(&mut b, offset % 5, portable);
            assert_eq!(a, b);
        }
    }
}
