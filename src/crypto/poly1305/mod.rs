//! Poly1305 one-time authenticator (RFC 8439).
//!
//! The accumulator is kept modulo `2^130 - 5` in five 26-bit limbs, so every
//! limb product fits a `u64` with room for the five-term sums of a schoolbook
//! multiply. Partial products that land past `2^130` are folded back through
//! the precomputed `5 * r` limbs, since `x * 2^130 = 5 * x (mod 2^130 - 5)`.
//!
//! A key authenticates exactly one message. [`Poly1305::finalize`] consumes
//! the engine and wipes it, and [`Poly1305::reset`] refuses to hand back a
//! reusable state.

mod codec;
mod error;

pub use error::Poly1305Error;

use codec::{NativeWords, PortableWords, WordCodec, Words};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::utils::{black_box, constant_time_eq};

/// Poly1305 key size in bytes.
pub const KEY_LEN: usize = 32;
/// Poly1305 tag size in bytes.
pub const TAG_LEN: usize = 16;
/// Poly1305 block size in bytes.
pub const BLOCK_LEN: usize = 16;

const LIMB_MASK: u32 = 0x3ffffff;
/// `2^128` expressed in the top limb.
const HIBIT: u32 = 1 << 24;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Poly1305 {
    r: [u32; 5],
    /// `5 * r[1..5]`
    s: [u32; 4],
    h: [u32; 5],
    pad: [u32; 4],
    buffer: [u8; BLOCK_LEN],
    leftover: usize,
    finalized: bool,
    /// Set by `reset`; every later use of the engine panics.
    spent: bool,
    #[zeroize(skip)]
    codec: WordCodec,
}

impl Poly1305 {
    pub const KEY_LEN: usize = KEY_LEN;
    pub const TAG_LEN: usize = TAG_LEN;
    pub const BLOCK_LEN: usize = BLOCK_LEN;

    #[inline(always)]
    pub fn new(mut key: [u8; KEY_LEN]) -> Self {
        let st = Self::with_codec(&key, WordCodec::detect());
        key.zeroize();
        st
    }

    /// Keys the engine from a slice, which must hold exactly [`KEY_LEN`] bytes.
    #[inline(always)]
    pub fn from_slice(key: &[u8]) -> Result<Self, Poly1305Error> {
        if key.len() != KEY_LEN {
            return Err(Poly1305Error::InvalidKeySize { len: key.len() });
        }
        Ok(Self::with_codec(key, WordCodec::detect()))
    }

    pub(crate) fn with_codec(key: &[u8], codec: WordCodec) -> Self {
        debug_assert_eq!(key.len(), KEY_LEN);

        let mut st = Self {
            r: [0; 5],
            s: [0; 4],
            h: [0; 5],
            pad: [0; 4],
            buffer: [0; BLOCK_LEN],
            leftover: 0,
            finalized: false,
            spent: false,
            codec,
        };
        match codec {
            WordCodec::Native => st.init::<NativeWords>(key),
            WordCodec::Portable => st.init::<PortableWords>(key),
        }
        st
    }

    #[inline(always)]
    fn init<W: Words>(&mut self, key: &[u8]) {
        // r &= 0xffffffc0ffffffc0ffffffc0fffffff
        self.r[0] = W::load_u32(key, 0) & 0x3ffffff;
        self.r[1] = (W::load_u32(key, 3) >> 2) & 0x3ffff03;
        self.r[2] = (W::load_u32(key, 6) >> 4) & 0x3ffc0ff;
        self.r[3] = (W::load_u32(key, 9) >> 6) & 0x3f03fff;
        self.r[4] = (W::load_u32(key, 12) >> 8) & 0x00fffff;

        #[crate::loop_unroll(i, 0, 4)]
        fn loop_unroll() {
            self.s[i] = self.r[i + 1] * 5;
            self.pad[i] = W::load_u32(key, 16 + 4 * i);
        }
    }

    #[inline(always)]
    fn blocks(&mut self, m: &[u8]) {
        match self.codec {
            WordCodec::Native => self.blocks_with::<NativeWords>(m),
            WordCodec::Portable => self.blocks_with::<PortableWords>(m),
        }
    }

    /// Absorbs every whole block of `m`; a trailing partial block is ignored.
    fn blocks_with<W: Words>(&mut self, m: &[u8]) {
        let hibit = if self.finalized { 0 } else { HIBIT };

        let [r0, r1, r2, r3, r4] = self.r;
        let [s1, s2, s3, s4] = self.s;
        let [mut h0, mut h1, mut h2, mut h3, mut h4] = self.h;

        for block in m.chunks_exact(BLOCK_LEN) {
            /* h += m[i] */
            h0 += W::load_u32(block, 0) & LIMB_MASK;
            h1 += (W::load_u32(block, 3) >> 2) & LIMB_MASK;
            h2 += (W::load_u32(block, 6) >> 4) & LIMB_MASK;
            h3 += (W::load_u32(block, 9) >> 6) & LIMB_MASK;
            h4 += (W::load_u32(block, 12) >> 8) | hibit;

            /* h *= r */
            let d0 = mul(h0, r0) + mul(h1, s4) + mul(h2, s3) + mul(h3, s2) + mul(h4, s1);
            let mut d1 = mul(h0, r1) + mul(h1, r0) + mul(h2, s4) + mul(h3, s3) + mul(h4, s2);
            let mut d2 = mul(h0, r2) + mul(h1, r1) + mul(h2, r0) + mul(h3, s4) + mul(h4, s3);
            let mut d3 = mul(h0, r3) + mul(h1, r2) + mul(h2, r1) + mul(h3, r0) + mul(h4, s4);
            let mut d4 = mul(h0, r4) + mul(h1, r3) + mul(h2, r2) + mul(h3, r1) + mul(h4, r0);

            /* (partial) h %= p */
            let mut c = (d0 >> 26) as u32;
            h0 = d0 as u32 & LIMB_MASK;

            d1 += c as u64;
            c = (d1 >> 26) as u32;
            h1 = d1 as u32 & LIMB_MASK;

            d2 += c as u64;
            c = (d2 >> 26) as u32;
            h2 = d2 as u32 & LIMB_MASK;

            d3 += c as u64;
            c = (d3 >> 26) as u32;
            h3 = d3 as u32 & LIMB_MASK;

            d4 += c as u64;
            c = (d4 >> 26) as u32;
            h4 = d4 as u32 & LIMB_MASK;

            h0 += c * 5;
            c = h0 >> 26;
            h0 &= LIMB_MASK;

            h1 += c;
        }

        self.h = [h0, h1, h2, h3, h4];
    }

    /// Absorbs `data` into the running MAC and returns `data.len()`.
    ///
    /// The tag depends only on the concatenation of everything absorbed, not
    /// on how it was split across calls. Bytes that do not complete a block
    /// are held back (at most 15) until more input arrives or the engine is
    /// finalized.
    pub fn update(&mut self, data: &[u8]) -> usize {
        self.assert_live();
        let mut m = data;

        if self.leftover > 0 {
            let want = core::cmp::min(BLOCK_LEN - self.leftover, m.len());
            self.buffer[self.leftover..self.leftover + want].copy_from_slice(&m[..want]);
            m = &m[want..];
            self.leftover += want;
            if self.leftover < BLOCK_LEN {
                return data.len();
            }

            let mut block = core::mem::replace(&mut self.buffer, [0u8; BLOCK_LEN]);
            self.blocks(&block);
            block.zeroize();
            self.leftover = 0;
        }

        if m.len() >= BLOCK_LEN {
            let want = m.len() & !(BLOCK_LEN - 1);
            self.blocks(&m[..want]);
            m = &m[want..];
        }

        if !m.is_empty() {
            self.buffer[..m.len()].copy_from_slice(m);
            self.leftover = m.len();
        }

        data.len()
    }

    #[inline(always)]
    fn finish(&mut self) -> [u8; TAG_LEN] {
        self.assert_live();
        match self.codec {
            WordCodec::Native => self.finish_with::<NativeWords>(),
            WordCodec::Portable => self.finish_with::<PortableWords>(),
        }
    }

    fn finish_with<W: Words>(&mut self) -> [u8; TAG_LEN] {
        // Pad the last partial block with a single 1 byte; no 2^128 bit.
        if self.leftover > 0 {
            self.buffer[self.leftover] = 1;
            for b in self.buffer[self.leftover + 1..].iter_mut() {
                *b = 0;
            }
            self.finalized = true;

            let mut block = core::mem::replace(&mut self.buffer, [0u8; BLOCK_LEN]);
            self.blocks_with::<W>(&block);
            block.zeroize();
            self.leftover = 0;
        }

        /* fully carry h */
        let [mut h0, mut h1, mut h2, mut h3, mut h4] = self.h;

        let mut c = h1 >> 26;
        h1 &= LIMB_MASK;
        h2 += c;
        c = h2 >> 26;
        h2 &= LIMB_MASK;
        h3 += c;
        c = h3 >> 26;
        h3 &= LIMB_MASK;
        h4 += c;
        c = h4 >> 26;
        h4 &= LIMB_MASK;
        h0 += c * 5;
        c = h0 >> 26;
        h0 &= LIMB_MASK;
        h1 += c;

        /* compute h + -p */
        let mut g0 = h0 + 5;
        c = g0 >> 26;
        g0 &= LIMB_MASK;
        let mut g1 = h1 + c;
        c = g1 >> 26;
        g1 &= LIMB_MASK;
        let mut g2 = h2 + c;
        c = g2 >> 26;
        g2 &= LIMB_MASK;
        let mut g3 = h3 + c;
        c = g3 >> 26;
        g3 &= LIMB_MASK;
        let g4 = (h4 + c).wrapping_sub(1 << 26);

        /* select h if h < p, or h + -p if h >= p */
        // g4 borrowed iff h < p, so the sign bit decides without a branch.
        let mask = black_box((g4 >> 31).wrapping_sub(1));
        let mut g = [g0, g1, g2, g3, g4];
        let mut h = [h0, h1, h2, h3, h4];

        #[crate::loop_unroll(i, 0, 5)]
        fn loop_unroll() {
            h[i] = (h[i] & !mask) | (g[i] & mask);
        }

        /* h = h % (2^128) */
        let mut w = [
            h[0] | (h[1] << 26),
            (h[1] >> 6) | (h[2] << 20),
            (h[2] >> 12) | (h[3] << 14),
            (h[3] >> 18) | (h[4] << 8),
        ];

        /* mac = (h + pad) % (2^128) */
        let mut tag = [0u8; TAG_LEN];
        let mut f = 0u64;

        #[crate::loop_unroll(i, 0, 4)]
        fn loop_unroll() {
            f = u64::from(w[i]) + u64::from(self.pad[i]) + (f >> 32);
            W::store_u32(&mut tag, 4 * i, f as u32);
        }

        g.zeroize();
        h.zeroize();
        w.zeroize();
        f.zeroize();
        self.clear();

        tag
    }

    #[inline(always)]
    fn assert_live(&self) {
        if self.spent {
            panic!("poly1305: engine was reset, key a new one");
        }
    }

    /// Wipes every secret limb, the pad and the buffered input.
    fn clear(&mut self) {
        self.h.zeroize();
        self.r.zeroize();
        self.s.zeroize();
        self.pad.zeroize();
        self.buffer.zeroize();
        self.leftover.zeroize();
    }

    /// Returns the tag of everything absorbed so far.
    ///
    /// A copy of the state is finalized; `self` keeps absorbing as if this
    /// had never been called.
    #[inline]
    pub fn peek(&self) -> [u8; TAG_LEN] {
        self.assert_live();
        let mut snapshot = self.clone();
        snapshot.finish()
    }

    /// Consumes the engine and returns the tag. All secret state is wiped.
    #[inline]
    pub fn finalize(mut self) -> [u8; TAG_LEN] {
        self.finish()
    }

    /// Always panics after wiping the state.
    ///
    /// A Poly1305 key must never authenticate a second message, so there is
    /// no way to rewind an engine. Key a new one instead. If the panic is
    /// caught, the engine stays spent and any further `update`, `peek` or
    /// `finalize` panics too.
    pub fn reset(&mut self) -> ! {
        self.clear();
        self.spent = true;
        panic!("poly1305: reset is not supported, keys are one-time use");
    }

    /// `new(*key)` + `update(data)` + `finalize()`.
    pub fn oneshot(key: &[u8; KEY_LEN], data: &[u8]) -> [u8; TAG_LEN] {
        let mut st = Self::with_codec(key, WordCodec::detect());
        st.update(data);
        st.finish()
    }

    /// Recomputes the tag of `data` and compares it with `tag` in constant time.
    pub fn verify(tag: &[u8; TAG_LEN], data: &[u8], key: &[u8; KEY_LEN]) -> bool {
        let mut expected = Self::oneshot(key, data);
        let ok = constant_time_eq(&expected, tag);
        expected.zeroize();
        ok
    }
}

#[inline(always)]
fn mul(a: u32, b: u32) -> u64 {
    a as u64 * b as u64
}

impl core::fmt::Debug for Poly1305 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Poly1305 {{ [protected] }}")
    }
}

impl std::io::Write for Poly1305 {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(self.update(buf))
    }

    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// One-shot MAC of `message` under a slice key.
pub fn compute(message: &[u8], key: &[u8]) -> Result<[u8; TAG_LEN], Poly1305Error> {
    let mut st = Poly1305::from_slice(key)?;
    st.update(message);
    Ok(st.finalize())
}

/// Checks `tag` against the MAC of `message` in constant time.
///
/// Only the boolean outcome is returned; the recomputed tag is wiped.
pub fn verify(tag: &[u8], message: &[u8], key: &[u8]) -> Result<bool, Poly1305Error> {
    if tag.len() != TAG_LEN {
        return Err(Poly1305Error::InvalidTagSize { len: tag.len() });
    }

    let mut expected = compute(message, key)?;
    let ok = constant_time_eq(&expected, tag);
    expected.zeroize();
    Ok(ok)
}
