//! Fixed capacity arbitrary precision unsigned integers.
//!
//! [`Big`] never allocates. Its capacity covers the widest
//! values the exact formatter and the exact parser produce for
//! `f64`; exceeding it is a bug and panics.

#![allow(clippy::indexing_slicing)]

use core::{cmp::Ordering, fmt};

/// `5^n` for `n` in `0..=13`.
const SMALL_POW5: [u32; 14] = [
    1,
    5,
    25,
    125,
    625,
    3125,
    15625,
    78125,
    390625,
    1953125,
    9765625,
    48828125,
    244140625,
    1220703125,
];

/// `10^n` for `n` in `0..=9`.
const SMALL_POW10: [u32; 10] = [
    1, 10, 100, 1000, 10000, 100000, 1000000, 10000000, 100000000, 1000000000,
];

/// An unsigned integer stored as little endian 32-bit limbs.
///
/// Limbs at or above `len` are always zero, and
/// `blocks[len - 1]` is never zero.
#[derive(Clone)]
pub(crate) struct Big {
    len: usize,
    blocks: [u32; Big::CAPACITY],
}

impl Big {
    /// The number of limbs.
    ///
    /// The largest intermediate is the exact `f64` parser's
    /// shifted numerator: about 3750 bits.
    pub const CAPACITY: usize = 128;

    /// Returns zero.
    pub const fn zero() -> Self {
        Self {
            len: 0,
            blocks: [0; Self::CAPACITY],
        }
    }

    pub fn from_u32(v: u32) -> Self {
        let mut x = Self::zero();
        x.blocks[0] = v;
        x.len = 1;
        x.trim();
        x
    }

    pub fn from_u64(v: u64) -> Self {
        let mut x = Self::zero();
        x.blocks[0] = v as u32;
        x.blocks[1] = (v >> 32) as u32;
        x.len = 2;
        x.trim();
        x
    }

    /// Parses a run of ASCII digits.
    pub fn from_digits(digits: &[u8]) -> Self {
        crate::util::debug_assert_all_digits(digits);

        let mut x = Self::zero();
        for chunk in digits.chunks(9) {
            let v = chunk
                .iter()
                .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'));
            x.mul_small(SMALL_POW10[chunk.len()]);
            x.add_small(v);
        }
        x
    }

    /// Returns `10^n`.
    pub fn pow10(n: usize) -> Self {
        let mut x = Self::from_u32(1);
        x.mul_pow10(n);
        x
    }

    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    /// Returns the significant limbs.
    pub fn limbs(&self) -> &[u32] {
        &self.blocks[..self.len]
    }

    /// Returns the number of significant bits.
    pub fn bit_length(&self) -> usize {
        match self.len {
            0 => 0,
            n => n * 32 - self.blocks[n - 1].leading_zeros() as usize,
        }
    }

    /// Returns the low 32 bits.
    pub fn to_u32(&self) -> u32 {
        self.blocks[0]
    }

    /// Returns the low 64 bits.
    pub fn to_u64(&self) -> u64 {
        u64::from(self.blocks[0]) | (u64::from(self.blocks[1]) << 32)
    }

    fn trim(&mut self) {
        while self.len > 0 && self.blocks[self.len - 1] == 0 {
            self.len -= 1;
        }
    }

    #[track_caller]
    fn reserve(&self, len: usize) {
        assert!(
            len <= Self::CAPACITY,
            "big integer overflow: {len} limbs > {}",
            Self::CAPACITY
        );
    }

    #[track_caller]
    fn push(&mut self, v: u32) {
        self.reserve(self.len + 1);
        self.blocks[self.len] = v;
        self.len += 1;
    }

    /// Computes `self += other`.
    pub fn add(&mut self, other: &Self) -> &mut Self {
        let n = self.len.max(other.len);
        let mut carry = 0;
        for (x, &y) in self.blocks[..n].iter_mut().zip(&other.blocks[..n]) {
            let s = u64::from(*x) + u64::from(y) + carry;
            *x = s as u32;
            carry = s >> 32;
        }
        self.len = n;
        if carry != 0 {
            self.push(carry as u32);
        }
        self
    }

    /// Computes `self += v`.
    pub fn add_small(&mut self, v: u32) -> &mut Self {
        let mut carry = u64::from(v);
        let mut i = 0;
        while carry != 0 {
            if i == self.len {
                self.push(carry as u32);
                break;
            }
            let s = u64::from(self.blocks[i]) + carry;
            self.blocks[i] = s as u32;
            carry = s >> 32;
            i += 1;
        }
        self
    }

    /// Computes `self -= other`.
    ///
    /// `other` must not be greater than `self`.
    pub fn sub(&mut self, other: &Self) -> &mut Self {
        debug_assert!(*self >= *other);

        let mut borrow = 0i64;
        for (x, &y) in self.blocks[..self.len].iter_mut().zip(&other.blocks) {
            let d = i64::from(*x) - i64::from(y) + borrow;
            *x = d as u32;
            borrow = d >> 32;
        }
        debug_assert_eq!(borrow, 0);
        self.trim();
        self
    }

    /// Computes `self *= v`.
    pub fn mul_small(&mut self, v: u32) -> &mut Self {
        let mut carry = 0;
        for x in &mut self.blocks[..self.len] {
            let p = u64::from(*x) * u64::from(v) + carry;
            *x = p as u32;
            carry = p >> 32;
        }
        if carry != 0 {
            self.push(carry as u32);
        }
        self.trim();
        self
    }

    /// Computes `self *= other`.
    pub fn mul(&mut self, other: &Self) -> &mut Self {
        if self.is_zero() || other.is_zero() {
            *self = Self::zero();
            return self;
        }
        let n = self.len + other.len;
        self.reserve(n);

        let mut out = [0u32; Self::CAPACITY];
        for (i, &a) in self.limbs().iter().enumerate() {
            let mut carry = 0;
            for (j, &b) in other.limbs().iter().enumerate() {
                let t = u64::from(a) * u64::from(b) + u64::from(out[i + j]) + carry;
                out[i + j] = t as u32;
                carry = t >> 32;
            }
            out[i + other.len] = carry as u32;
        }
        self.blocks = out;
        self.len = n;
        self.trim();
        self
    }

    /// Computes `self <<= bits`, i.e. `self *= 2^bits`.
    pub fn mul_pow2(&mut self, bits: usize) -> &mut Self {
        if self.is_zero() {
            return self;
        }
        let digits = bits / 32;
        let bits = (bits % 32) as u32;

        if digits > 0 {
            self.reserve(self.len + digits);
            self.blocks.copy_within(..self.len, digits);
            self.blocks[..digits].fill(0);
            self.len += digits;
        }
        if bits > 0 {
            let last = self.len;
            let overflow = self.blocks[last - 1] >> (32 - bits);
            for i in (digits + 1..last).rev() {
                self.blocks[i] = (self.blocks[i] << bits) | (self.blocks[i - 1] >> (32 - bits));
            }
            self.blocks[digits] <<= bits;
            if overflow != 0 {
                self.push(overflow);
            }
        }
        self
    }

    /// Computes `self *= 5^n`.
    pub fn mul_pow5(&mut self, mut n: usize) -> &mut Self {
        if n >= 128 {
            // Squaring wins once the power spans a few limbs.
            let p = Self::pow5(n);
            return self.mul(&p);
        }
        while n >= 13 {
            self.mul_small(SMALL_POW5[13]);
            n -= 13;
        }
        self.mul_small(SMALL_POW5[n])
    }

    /// Computes `self *= 10^n`.
    pub fn mul_pow10(&mut self, n: usize) -> &mut Self {
        self.mul_pow5(n).mul_pow2(n)
    }

    fn pow5(mut n: usize) -> Self {
        let mut result = Self::from_u32(1);
        let mut base = Self::from_u32(5);
        loop {
            if n & 1 == 1 {
                result.mul(&base);
            }
            n >>= 1;
            if n == 0 {
                break result;
            }
            let b = base.clone();
            base.mul(&b);
        }
    }

    /// Computes `self >>= bits` for `bits < 32`.
    fn shr_small(&mut self, bits: u32) -> &mut Self {
        debug_assert!(bits < 32);
        if bits == 0 {
            return self;
        }
        for i in 0..self.len {
            let hi = if i + 1 < self.len {
                self.blocks[i + 1] << (32 - bits)
            } else {
                0
            };
            self.blocks[i] = (self.blocks[i] >> bits) | hi;
        }
        self.trim();
        self
    }

    /// Computes `self /= v` and returns the remainder.
    pub fn div_rem_small(&mut self, v: u32) -> u32 {
        assert!(v != 0, "division by zero");
        let v = u64::from(v);
        let mut rem = 0;
        for x in self.blocks[..self.len].iter_mut().rev() {
            let cur = (rem << 32) | u64::from(*x);
            *x = (cur / v) as u32;
            rem = cur % v;
        }
        self.trim();
        rem as u32
    }

    /// Returns `(self / divisor, self % divisor)`.
    ///
    /// This is Knuth's Algorithm D: each quotient limb is
    /// estimated from the top two limbs of the running
    /// remainder, the estimate is corrected against the next
    /// divisor limb, and at most one add back fixes what
    /// remains.
    #[track_caller]
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        assert!(!divisor.is_zero(), "division by zero");

        if *self < *divisor {
            return (Self::zero(), self.clone());
        }
        if divisor.len == 1 {
            let mut q = self.clone();
            let r = q.div_rem_small(divisor.to_u32());
            return (q, Self::from_u32(r));
        }

        // Normalize so that the divisor's top bit is set. The
        // dividend gets one extra limb.
        let shift = divisor.blocks[divisor.len - 1].leading_zeros();
        let mut v = divisor.clone();
        v.mul_pow2(shift as usize);
        let mut u = self.clone();
        self.reserve(self.len + 1);
        u.mul_pow2(shift as usize);

        let n = v.len;
        let m = self.len - n;
        let vtop = u64::from(v.blocks[n - 1]);
        let vnext = u64::from(v.blocks[n - 2]);
        let base = 1u64 << 32;

        let mut q = Self::zero();
        for j in (0..=m).rev() {
            let num = (u64::from(u.blocks[j + n]) << 32) | u64::from(u.blocks[j + n - 1]);
            let mut qhat = num / vtop;
            let mut rhat = num % vtop;
            while qhat >= base || qhat * vnext > ((rhat << 32) | u64::from(u.blocks[j + n - 2])) {
                qhat -= 1;
                rhat += vtop;
                if rhat >= base {
                    break;
                }
            }

            // u[j..=j+n] -= qhat * v
            let mut borrow = 0i64;
            let mut carry = 0;
            for i in 0..n {
                let p = qhat * u64::from(v.blocks[i]) + carry;
                carry = p >> 32;
                let t = i64::from(u.blocks[i + j]) - i64::from(p as u32) + borrow;
                u.blocks[i + j] = t as u32;
                borrow = t >> 32;
            }
            let t = i64::from(u.blocks[j + n]) - carry as i64 + borrow;
            u.blocks[j + n] = t as u32;

            if t < 0 {
                // The estimate was one too big.
                qhat -= 1;
                let mut carry = 0;
                for i in 0..n {
                    let s = u64::from(u.blocks[i + j]) + u64::from(v.blocks[i]) + carry;
                    u.blocks[i + j] = s as u32;
                    carry = s >> 32;
                }
                u.blocks[j + n] = u.blocks[j + n].wrapping_add(carry as u32);
            }
            q.blocks[j] = qhat as u32;
        }
        q.len = m + 1;
        q.trim();

        let mut r = Self::zero();
        r.blocks[..n].copy_from_slice(&u.blocks[..n]);
        r.len = n;
        r.trim();
        r.shr_small(shift);
        (q, r)
    }
}

impl PartialEq for Big {
    fn eq(&self, other: &Self) -> bool {
        self.limbs() == other.limbs()
    }
}

impl Eq for Big {}

impl PartialOrd for Big {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Big {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| self.limbs().iter().rev().cmp(other.limbs().iter().rev()))
    }
}

impl fmt::Debug for Big {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut limbs = self.limbs().iter().rev();
        match limbs.next() {
            None => write!(f, "0x0"),
            Some(top) => {
                write!(f, "{top:#x}")?;
                for x in limbs {
                    write!(f, "_{x:08x}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    fn to_biguint(x: &Big) -> BigUint {
        BigUint::from_slice(x.limbs())
    }

    fn random(rng: &mut SmallRng, limbs: usize) -> Big {
        let mut x = Big::zero();
        for _ in 0..limbs {
            x.mul_pow2(32);
            x.add_small(rng.gen());
        }
        x
    }

    #[test]
    fn test_basic() {
        assert!(Big::zero().is_zero());
        assert!(Big::from_u32(0).is_zero());
        assert!(Big::from_u64(0).is_zero());
        assert_eq!(Big::from_u64(1 << 40).limbs(), &[0, 1 << 8]);
        assert_eq!(Big::from_u64(u64::MAX).to_u64(), u64::MAX);
        assert_eq!(Big::from_u64(u64::MAX).to_u32(), u32::MAX);
        assert_eq!(Big::from_u64(1 << 40).to_u32(), 0);
        assert_eq!(Big::from_u64(u64::MAX).bit_length(), 64);
        assert_eq!(Big::zero().bit_length(), 0);
        assert_eq!(Big::from_u32(1).bit_length(), 1);
        assert_eq!(Big::from_digits(b"12345678901234567890").to_u64(), 12345678901234567890);
        assert_eq!(Big::from_digits(b"000").limbs(), &[] as &[u32]);
        assert_eq!(Big::pow10(19).to_u64(), 10_000_000_000_000_000_000);
    }

    #[test]
    fn test_cmp() {
        let a = Big::from_u64(1 << 32);
        let b = Big::from_u64(u64::from(u32::MAX));
        assert!(a > b);
        assert!(b < a);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
        assert_eq!(Big::from_u32(3).cmp(&Big::from_u32(4)), Ordering::Less);
    }

    #[test]
    fn test_sub_to_zero() {
        let mut a = Big::from_u64(u64::MAX);
        a.sub(&Big::from_u64(u64::MAX));
        assert!(a.is_zero());
        assert_eq!(a, Big::zero());
    }

    #[test]
    fn test_pow10() {
        for n in [0, 1, 9, 13, 27, 100, 127, 128, 129, 300, 343, 1110] {
            let want = BigUint::from(10u32).pow(n as u32);
            assert_eq!(to_biguint(&Big::pow10(n)), want, "10^{n}");
        }
    }

    #[test]
    fn test_random_ops() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let xl = rng.gen_range(0..=40);
            let yl = rng.gen_range(0..=40);
            let x = random(&mut rng, xl);
            let y = random(&mut rng, yl);
            let (bx, by) = (to_biguint(&x), to_biguint(&y));

            assert_eq!(to_biguint(x.clone().add(&y)), &bx + &by);
            assert_eq!(to_biguint(x.clone().mul(&y)), &bx * &by);

            let small: u32 = rng.gen();
            assert_eq!(to_biguint(x.clone().mul_small(small)), &bx * small);
            assert_eq!(to_biguint(x.clone().add_small(small)), &bx + small);

            let shift = rng.gen_range(0..1024);
            assert_eq!(to_biguint(x.clone().mul_pow2(shift)), &bx << shift);

            if x >= y {
                assert_eq!(to_biguint(x.clone().sub(&y)), &bx - &by);
            }
            if !y.is_zero() {
                let (q, r) = x.div_rem(&y);
                assert_eq!(to_biguint(&q), &bx / &by, "{x:?} / {y:?}");
                assert_eq!(to_biguint(&r), &bx % &by, "{x:?} % {y:?}");
            }
            if small != 0 {
                let mut q = x.clone();
                let r = q.div_rem_small(small);
                assert_eq!(to_biguint(&q), &bx / small);
                assert_eq!(BigUint::from(r), &bx % small);
            }
        }
    }

    #[test]
    fn test_div_rem_add_back() {
        // Divisors whose top limb sits just above a power of two
        // make the first estimate too big.
        let x = Big::from_digits(b"79228162514264337589248983040");
        let mut y = Big::from_u64(0x8000_0000_0000_0001);
        y.mul_pow2(1);
        let (q, r) = x.div_rem(&y);
        let (bx, by) = (to_biguint(&x), to_biguint(&y));
        assert_eq!(to_biguint(&q), &bx / &by);
        assert_eq!(to_biguint(&r), &bx % &by);

        let x = Big::from_digits(b"340282366920938463463374607431768211455");
        let y = Big::from_digits(b"18446744073709551617");
        let (q, r) = x.div_rem(&y);
        assert_eq!(q.to_u64(), u64::MAX);
        assert!(r.is_zero());
    }

    #[test]
    #[should_panic(expected = "big integer overflow")]
    fn test_overflow_panics() {
        let mut x = Big::from_u32(1);
        x.mul_pow2(Big::CAPACITY * 32);
    }
}
