//! Integer to text.
//!
//! Digits are written back to front into a fixed buffer,
//! two decimal digits at a time.

#![allow(clippy::indexing_slicing)]

use core::{fmt, str};

/// `"00"` through `"99"`.
const DIGIT_PAIRS: [u8; 200] = {
    let mut t = [0; 200];
    let mut i = 0;
    while i < 100 {
        t[2 * i] = b'0' + (i / 10) as u8;
        t[2 * i + 1] = b'0' + (i % 10) as u8;
        i += 1;
    }
    t
};

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";
const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";

/// The largest power of ten in a `u64`.
const TEN_19: u128 = 10_000_000_000_000_000_000;

/// Holds the text of one integer.
///
/// Large enough for a `u128` in binary.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Buffer {
    buf: [u8; 128],
}

impl Buffer {
    pub const fn new() -> Self {
        Self { buf: [0; 128] }
    }

    /// Formats `n` in base 10.
    pub fn format_dec(&mut self, mut n: u128) -> &str {
        let mut pos = self.buf.len();
        // u128 division is slow, so split into u64 chunks of
        // exactly 19 digits.
        while n > u128::from(u64::MAX) {
            let chunk = (n % TEN_19) as u64;
            n /= TEN_19;
            let start = pos - 19;
            let first = write_u64(&mut self.buf[start..pos], chunk);
            self.buf[start..start + first].fill(b'0');
            pos = start;
        }
        pos = write_u64(&mut self.buf[..pos], n as u64);
        as_str(&self.buf[pos..])
    }

    /// Formats `n` in base 16.
    pub fn format_hex(&mut self, n: u128, upper: bool) -> &str {
        let table = if upper { HEX_UPPER } else { HEX_LOWER };
        self.format_pow2(n, 4, table)
    }

    /// Formats `n` in base 2.
    pub fn format_bin(&mut self, n: u128) -> &str {
        self.format_pow2(n, 1, b"01")
    }

    fn format_pow2(&mut self, mut n: u128, shift: u32, table: &[u8]) -> &str {
        let mask = (1 << shift) - 1;
        let mut pos = self.buf.len();
        loop {
            pos -= 1;
            self.buf[pos] = table[(n & mask) as usize];
            n >>= shift;
            if n == 0 {
                break;
            }
        }
        as_str(&self.buf[pos..])
    }
}

/// Writes `n` right aligned in `buf` and returns the index of
/// the first digit.
fn write_u64(buf: &mut [u8], mut n: u64) -> usize {
    let mut pos = buf.len();
    while n >= 10_000 {
        let rem = (n % 10_000) as usize;
        n /= 10_000;
        let hi = (rem / 100) * 2;
        let lo = (rem % 100) * 2;
        buf[pos - 4..pos - 2].copy_from_slice(&DIGIT_PAIRS[hi..hi + 2]);
        buf[pos - 2..pos].copy_from_slice(&DIGIT_PAIRS[lo..lo + 2]);
        pos -= 4;
    }
    let mut n = n as usize;
    if n >= 100 {
        let lo = (n % 100) * 2;
        n /= 100;
        buf[pos - 2..pos].copy_from_slice(&DIGIT_PAIRS[lo..lo + 2]);
        pos -= 2;
    }
    if n >= 10 {
        let d = n * 2;
        buf[pos - 2..pos].copy_from_slice(&DIGIT_PAIRS[d..d + 2]);
        pos -= 2;
    } else {
        pos -= 1;
        buf[pos] = b'0' + n as u8;
    }
    pos
}

fn as_str(digits: &[u8]) -> &str {
    debug_assert!(digits.is_ascii());
    str::from_utf8(digits).unwrap_or_default()
}

/// Writes `n` ASCII zeros.
pub(crate) fn write_zeros<W: fmt::Write + ?Sized>(w: &mut W, mut n: usize) -> fmt::Result {
    const ZEROS: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    while n > 0 {
        let k = n.min(ZEROS.len());
        w.write_str(ZEROS.get(..k).unwrap_or_default())?;
        n -= k;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_digit_pairs() {
        assert_eq!(&DIGIT_PAIRS[..6], b"000102");
        assert_eq!(&DIGIT_PAIRS[198..], b"99");
    }

    #[test]
    fn test_format_dec() {
        let mut buf = Buffer::new();
        let mut want = ::itoa::Buffer::new();
        let edges = [
            0,
            9,
            10,
            99,
            100,
            9999,
            10_000,
            u128::from(u64::MAX),
            u128::from(u64::MAX) + 1,
            TEN_19,
            TEN_19 * TEN_19,
            u128::MAX,
        ];
        for n in edges {
            assert_eq!(buf.format_dec(n), want.format(n), "{n}");
        }
        let mut rng = SmallRng::seed_from_u64(10);
        for _ in 0..10_000 {
            let n = rng.gen::<u128>() >> rng.gen_range(0..128);
            assert_eq!(buf.format_dec(n), want.format(n), "{n}");
            let n = rng.gen::<u32>();
            assert_eq!(buf.format_dec(n.into()), want.format(n), "{n}");
        }
    }

    #[test]
    fn test_format_pow2() {
        let mut buf = Buffer::new();
        let mut rng = SmallRng::seed_from_u64(2);
        for n in [0, 1, 0xf, 0x10, u128::MAX] {
            assert_eq!(buf.format_hex(n, true), format!("{n:X}"));
            assert_eq!(buf.format_hex(n, false), format!("{n:x}"));
            assert_eq!(buf.format_bin(n), format!("{n:b}"));
        }
        for _ in 0..1000 {
            let n = rng.gen::<u128>() >> rng.gen_range(0..128);
            assert_eq!(buf.format_hex(n, true), format!("{n:X}"));
            assert_eq!(buf.format_bin(n), format!("{n:b}"));
        }
    }

    #[test]
    fn test_write_zeros() {
        let mut s = String::new();
        write_zeros(&mut s, 0).unwrap();
        assert_eq!(s, "");
        write_zeros(&mut s, 150).unwrap();
        assert_eq!(s, "0".repeat(150));
    }
}
