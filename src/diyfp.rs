//! Extended precision floats: a 64-bit significand and an
//! unbounded binary exponent.

/// `f * 2^e`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Fp {
    /// The significand.
    pub f: u64,
    /// The binary exponent.
    pub e: i16,
}

impl Fp {
    pub const fn new(f: u64, e: i16) -> Self {
        Self { f, e }
    }

    /// Returns the correctly rounded product of `self` and
    /// `other`.
    ///
    /// Only the upper 64 bits of the 128-bit product are kept,
    /// so the result carries at most half a unit of error.
    pub const fn mul(self, other: Self) -> Self {
        let z = (self.f as u128) * (other.f as u128);
        let hi = (z >> 64) as u64;
        let lo = z as u64;
        Self {
            f: hi + (lo >> 63),
            e: self.e + other.e + 64,
        }
    }

    /// Shifts the significand so that its top bit is set.
    pub const fn normalize(self) -> Self {
        debug_assert!(self.f != 0);
        let lz = self.f.leading_zeros();
        Self {
            f: self.f << lz,
            e: self.e - lz as i16,
        }
    }

    /// Rescales `self` to the exponent `e`, which must not be
    /// greater than `self.e`.
    pub const fn normalize_to(self, e: i16) -> Self {
        let delta = self.e - e;
        debug_assert!(delta >= 0);
        let delta = delta as u32;
        debug_assert!((self.f << delta) >> delta == self.f);
        Self {
            f: self.f << delta,
            e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul() {
        // 2^63 * 2^63 = 2^126 = 2^62 * 2^64.
        let x = Fp::new(1 << 63, 0);
        assert_eq!(x.mul(x), Fp::new(1 << 62, 64));

        // Less than half of the low word is dropped.
        let x = Fp::new(u64::MAX, -64);
        let z = x.mul(x);
        assert_eq!(z.f, u64::MAX - 1);
        assert_eq!(z.e, -64);

        // Half of the low word rounds up.
        let z = Fp::new(u64::MAX, 0).mul(Fp::new(1 << 63, 0));
        assert_eq!(z, Fp::new(1 << 63, 64));
    }

    #[test]
    fn test_normalize() {
        let x = Fp::new(1, 0).normalize();
        assert_eq!(x, Fp::new(1 << 63, -63));
        let x = Fp::new(0b1011, 10).normalize();
        assert_eq!(x.f >> 60, 0b1011);
        assert_eq!(x.e, 10 - 60);
        assert_eq!(x.normalize(), x);
    }

    #[test]
    fn test_normalize_to() {
        let x = Fp::new(3, 5).normalize_to(2);
        assert_eq!(x, Fp::new(24, 2));
    }
}
