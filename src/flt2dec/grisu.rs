//! Grisu3: shortest and fixed-length digits with 64-bit
//! arithmetic only.
//!
//! Every entry point returns `None` when it cannot prove its
//! digits correct. The caller then falls back to
//! [`dragon`][super::dragon].

#![allow(clippy::indexing_slicing)]

use super::{round_up, Decoded, MAX_SIG_DIGITS};
use crate::diyfp::Fp;

/// The scaled exponent must land in `ALPHA..=GAMMA` so that
/// the integral part fits in 32 bits.
const ALPHA: i16 = -60;
const GAMMA: i16 = -32;

/// `(f, e, k)` such that `f * 2^e` is `10^k` rounded to 64
/// bits, for every eighth `k` in `-308..=332`.
///
/// Generated with:
///
/// ```text
/// for k in range(-308, 333, 8):
///     x, e = Fraction(10) ** k, 0
///     while x >= 2**64: x, e = x / 2, e + 1
///     while x < 2**63: x, e = x * 2, e - 1
///     emit(round(x), e, k)
/// ```
static CACHED_POW10: [(u64, i16, i16); 81] = [
    (0xe61acf033d1a45df, -1087, -308),
    (0xab70fe17c79ac6ca, -1060, -300),
    (0xff77b1fcbebcdc4f, -1034, -292),
    (0xbe5691ef416bd60c, -1007, -284),
    (0x8dd01fad907ffc3c,  -980, -276),
    (0xd3515c2831559a83,  -954, -268),
    (0x9d71ac8fada6c9b5,  -927, -260),
    (0xea9c227723ee8bcb,  -901, -252),
    (0xaecc49914078536d,  -874, -244),
    (0x823c12795db6ce57,  -847, -236),
    (0xc21094364dfb5637,  -821, -228),
    (0x9096ea6f3848984f,  -794, -220),
    (0xd77485cb25823ac7,  -768, -212),
    (0xa086cfcd97bf97f4,  -741, -204),
    (0xef340a98172aace5,  -715, -196),
    (0xb23867fb2a35b28e,  -688, -188),
    (0x84c8d4dfd2c63f3b,  -661, -180),
    (0xc5dd44271ad3cdba,  -635, -172),
    (0x936b9fcebb25c996,  -608, -164),
    (0xdbac6c247d62a584,  -582, -156),
    (0xa3ab66580d5fdaf6,  -555, -148),
    (0xf3e2f893dec3f126,  -529, -140),
    (0xb5b5ada8aaff80b8,  -502, -132),
    (0x87625f056c7c4a8b,  -475, -124),
    (0xc9bcff6034c13053,  -449, -116),
    (0x964e858c91ba2655,  -422, -108),
    (0xdff9772470297ebd,  -396, -100),
    (0xa6dfbd9fb8e5b88f,  -369,  -92),
    (0xf8a95fcf88747d94,  -343,  -84),
    (0xb94470938fa89bcf,  -316,  -76),
    (0x8a08f0f8bf0f156b,  -289,  -68),
    (0xcdb02555653131b6,  -263,  -60),
    (0x993fe2c6d07b7fac,  -236,  -52),
    (0xe45c10c42a2b3b06,  -210,  -44),
    (0xaa242499697392d3,  -183,  -36),
    (0xfd87b5f28300ca0e,  -157,  -28),
    (0xbce5086492111aeb,  -130,  -20),
    (0x8cbccc096f5088cc,  -103,  -12),
    (0xd1b71758e219652c,   -77,   -4),
    (0x9c40000000000000,   -50,    4),
    (0xe8d4a51000000000,   -24,   12),
    (0xad78ebc5ac620000,     3,   20),
    (0x813f3978f8940984,    30,   28),
    (0xc097ce7bc90715b3,    56,   36),
    (0x8f7e32ce7bea5c70,    83,   44),
    (0xd5d238a4abe98068,   109,   52),
    (0x9f4f2726179a2245,   136,   60),
    (0xed63a231d4c4fb27,   162,   68),
    (0xb0de65388cc8ada8,   189,   76),
    (0x83c7088e1aab65db,   216,   84),
    (0xc45d1df942711d9a,   242,   92),
    (0x924d692ca61be758,   269,  100),
    (0xda01ee641a708dea,   295,  108),
    (0xa26da3999aef774a,   322,  116),
    (0xf209787bb47d6b85,   348,  124),
    (0xb454e4a179dd1877,   375,  132),
    (0x865b86925b9bc5c2,   402,  140),
    (0xc83553c5c8965d3d,   428,  148),
    (0x952ab45cfa97a0b3,   455,  156),
    (0xde469fbd99a05fe3,   481,  164),
    (0xa59bc234db398c25,   508,  172),
    (0xf6c69a72a3989f5c,   534,  180),
    (0xb7dcbf5354e9bece,   561,  188),
    (0x88fcf317f22241e2,   588,  196),
    (0xcc20ce9bd35c78a5,   614,  204),
    (0x98165af37b2153df,   641,  212),
    (0xe2a0b5dc971f303a,   667,  220),
    (0xa8d9d1535ce3b396,   694,  228),
    (0xfb9b7cd9a4a7443c,   720,  236),
    (0xbb764c4ca7a44410,   747,  244),
    (0x8bab8eefb6409c1a,   774,  252),
    (0xd01fef10a657842c,   800,  260),
    (0x9b10a4e5e9913129,   827,  268),
    (0xe7109bfba19c0c9d,   853,  276),
    (0xac2820d9623bf429,   880,  284),
    (0x80444b5e7aa7cf85,   907,  292),
    (0xbf21e44003acdd2d,   933,  300),
    (0x8e679c2f5e44ff8f,   960,  308),
    (0xd433179d9c8cb841,   986,  316),
    (0x9e19db92b4e31ba9,  1013,  324),
    (0xeb96bf6ebadf77d9,  1039,  332),
];

const CACHED_POW10_FIRST_E: i16 = -1087;
const CACHED_POW10_LAST_E: i16 = 1039;

/// Returns `(k, 10^-k)` where the exponent of the cached
/// power is in `alpha..=gamma`.
fn cached_power(alpha: i16, gamma: i16) -> (i16, Fp) {
    let offset = i32::from(CACHED_POW10_FIRST_E);
    let range = (CACHED_POW10.len() as i32) - 1;
    let domain = i32::from(CACHED_POW10_LAST_E - CACHED_POW10_FIRST_E);
    let idx = (i32::from(gamma) - offset) * range / domain;
    let (f, e, k) = CACHED_POW10[idx as usize];
    debug_assert!(alpha <= e && e <= gamma);
    (k, Fp::new(f, e))
}

/// Returns `(n, 10^n)` for the largest `n` with
/// `10^n <= x`.
fn max_pow10_no_more_than(x: u32) -> (u8, u32) {
    debug_assert!(x > 0);

    const X9: u32 = 1_000_000_000;
    const X8: u32 = 100_000_000;
    const X7: u32 = 10_000_000;
    const X6: u32 = 1_000_000;
    const X5: u32 = 100_000;
    const X4: u32 = 10_000;
    const X3: u32 = 1000;
    const X2: u32 = 100;
    const X1: u32 = 10;

    if x < X4 {
        if x < X2 {
            if x < X1 {
                (0, 1)
            } else {
                (1, X1)
            }
        } else if x < X3 {
            (2, X2)
        } else {
            (3, X3)
        }
    } else if x < X6 {
        if x < X5 {
            (4, X4)
        } else {
            (5, X5)
        }
    } else if x < X8 {
        if x < X7 {
            (6, X6)
        } else {
            (7, X7)
        }
    } else if x < X9 {
        (8, X8)
    } else {
        (9, X9)
    }
}

/// Writes the shortest digits of `d` into `buf` and returns
/// `(len, exp)` such that the value is `0.buf[..len] * 10^exp`.
pub(super) fn format_shortest_opt(d: &Decoded, buf: &mut [u8]) -> Option<(usize, i16)> {
    assert!(d.mant > 0);
    assert!(d.minus > 0);
    assert!(d.plus > 0);
    assert!(buf.len() >= MAX_SIG_DIGITS);
    // Three spare bits for the boundaries.
    assert!(d.mant + d.plus < (1 << 61));

    let plus = Fp::new(d.mant + d.plus, d.exp).normalize();
    let minus = Fp::new(d.mant - d.minus, d.exp).normalize_to(plus.e);
    let v = Fp::new(d.mant, d.exp).normalize_to(plus.e);

    let (minusk, cached) = cached_power(ALPHA - plus.e - 64, GAMMA - plus.e - 64);
    let plus = plus.mul(cached);
    let minus = minus.mul(cached);
    let v = v.mul(cached);
    debug_assert_eq!(plus.e, minus.e);
    debug_assert_eq!(plus.e, v.e);

    // Each product is off by at most one unit, so widen the
    // interval by one unit on both sides: anything outside
    // `minus1..plus1` is certainly unsafe.
    let plus1 = plus.f + 1;
    let minus1 = minus.f - 1;
    let e = (-plus.e) as u32;

    let plus1int = (plus1 >> e) as u32;
    let plus1frac = plus1 & ((1 << e) - 1);

    let (max_kappa, max_ten_kappa) = max_pow10_no_more_than(plus1int);

    let mut i = 0;
    let exp = i16::from(max_kappa) - minusk + 1;

    let delta1 = plus1 - minus1;
    let delta1frac = delta1 & ((1 << e) - 1);

    // Integral digits.
    let mut ten_kappa = max_ten_kappa;
    let mut remainder = plus1int;
    loop {
        let q = remainder / ten_kappa;
        let r = remainder % ten_kappa;
        debug_assert!(q < 10);
        buf[i] = b'0' + q as u8;
        i += 1;

        let plus1rem = (u64::from(r) << e) + plus1frac;
        if plus1rem < delta1 {
            let ten_kappa = u64::from(ten_kappa) << e;
            let len = round_and_weed(
                &mut buf[..i],
                plus1rem,
                delta1,
                plus1 - v.f,
                ten_kappa,
                1,
            )?;
            return Some((len, exp));
        }

        if i > usize::from(max_kappa) {
            debug_assert_eq!(ten_kappa, 1);
            break;
        }
        ten_kappa /= 10;
        remainder = r;
    }

    // Fractional digits. The error grows tenfold with each
    // digit, so the loop always ends.
    let mut remainder = plus1frac;
    let mut threshold = delta1frac;
    let mut ulp = 1;
    loop {
        remainder *= 10;
        threshold *= 10;
        ulp *= 10;

        let q = remainder >> e;
        let r = remainder & ((1 << e) - 1);
        debug_assert!(q < 10);
        buf[i] = b'0' + q as u8;
        i += 1;

        if r < threshold {
            let len = round_and_weed(&mut buf[..i], r, threshold, (plus1 - v.f) * ulp, 1 << e, ulp)?;
            return Some((len, exp));
        }
        remainder = r;
    }
}

/// Moves the last digit of `buf` down toward `v` while the
/// result stays inside the safe interval, then checks that
/// the result is provably the closest shortest candidate.
///
/// All quantities are distances from `plus1` in units of
/// `2^-e`.
fn round_and_weed(
    buf: &mut [u8],
    remainder: u64,
    threshold: u64,
    plus1v: u64,
    ten_kappa: u64,
    ulp: u64,
) -> Option<usize> {
    let (last, _) = buf.split_last_mut()?;

    // The true `v` is somewhere in `plus1v_up..=plus1v_down`.
    let plus1v_down = plus1v + ulp;
    let plus1v_up = plus1v - ulp;

    let mut plus1w = remainder;
    while plus1w < plus1v_up
        && threshold - plus1w >= ten_kappa
        && (plus1w + ten_kappa < plus1v_up
            || plus1v_up - plus1w >= plus1w + ten_kappa - plus1v_up)
    {
        *last -= 1;
        debug_assert!(*last > b'0');
        plus1w += ten_kappa;
    }

    // If the candidate could still be improved for some `v`
    // in the error range we cannot decide.
    if plus1w < plus1v_down
        && threshold - plus1w >= ten_kappa
        && (plus1w + ten_kappa < plus1v_down
            || plus1v_down - plus1w >= plus1w + ten_kappa - plus1v_down)
    {
        return None;
    }

    // The candidate must be safely inside the interval even
    // after accounting for the error in `plus1` and `minus1`.
    if 2 * ulp <= plus1w && plus1w <= threshold - 4 * ulp {
        Some(buf.len())
    } else {
        None
    }
}

/// Writes `buf.len()` correctly rounded digits of `d` into
/// `buf`, stopping early at the digit for `10^limit`.
///
/// Returns `(len, exp)` such that the value is
/// `0.buf[..len] * 10^exp`.
pub(super) fn format_exact_opt(d: &Decoded, buf: &mut [u8], limit: i16) -> Option<(usize, i16)> {
    assert!(d.mant > 0);
    assert!(d.mant < (1 << 61));
    assert!(!buf.is_empty());

    let v = Fp::new(d.mant, d.exp).normalize();
    let (minusk, cached) = cached_power(ALPHA - v.e - 64, GAMMA - v.e - 64);
    let v = v.mul(cached);

    let e = (-v.e) as u32;
    let vint = (v.f >> e) as u32;
    let vfrac = v.f & ((1 << e) - 1);

    // With no fractional part `vint` alone must supply every
    // requested digit, and it cannot if it is too small.
    const POW10_UP_TO_9: [u32; 10] = [
        1,
        10,
        100,
        1000,
        10_000,
        100_000,
        1_000_000,
        10_000_000,
        100_000_000,
        1_000_000_000,
    ];
    let requested = buf.len();
    if vfrac == 0 && (requested >= 11 || vint < POW10_UP_TO_9[requested - 1]) {
        return None;
    }

    // `v` is off by at most one unit.
    let mut err = 1;

    let (max_kappa, max_ten_kappa) = max_pow10_no_more_than(vint);
    let mut i = 0;
    let exp = i16::from(max_kappa) - minusk + 1;

    // Stop at `limit` up front; rounding twice would be wrong.
    let len = if exp <= limit {
        // Not even one digit. Only rounding up to `10^limit`
        // can produce one.
        return possibly_round(
            buf,
            0,
            exp,
            limit,
            v.f / 10,
            u64::from(max_ten_kappa) << e,
            err << e,
        );
    } else if ((i32::from(exp) - i32::from(limit)) as usize) < buf.len() {
        (exp - limit) as usize
    } else {
        buf.len()
    };
    debug_assert!(len > 0);

    let mut ten_kappa = max_ten_kappa;
    let mut remainder = vint;
    loop {
        let q = remainder / ten_kappa;
        let r = remainder % ten_kappa;
        debug_assert!(q < 10);
        buf[i] = b'0' + q as u8;
        i += 1;

        if i == len {
            let vrem = (u64::from(r) << e) + vfrac;
            return possibly_round(buf, len, exp, limit, vrem, u64::from(ten_kappa) << e, err << e);
        }

        if i > usize::from(max_kappa) {
            debug_assert_eq!(ten_kappa, 1);
            break;
        }
        ten_kappa /= 10;
        remainder = r;
    }

    let mut remainder = vfrac;
    let maxerr = 1 << (e - 1);
    while err < maxerr {
        remainder *= 10;
        err *= 10;

        let q = remainder >> e;
        let r = remainder & ((1 << e) - 1);
        debug_assert!(q < 10);
        buf[i] = b'0' + q as u8;
        i += 1;

        if i == len {
            return possibly_round(buf, len, exp, limit, r, 1 << e, err);
        }
        remainder = r;
    }

    // The error now exceeds half a digit.
    None
}

/// Rounds `buf[..len]` given the scaled `remainder` below the
/// last digit, whose unit is `ten_kappa`, and the error
/// bound `ulp`. Fails unless the direction is certain.
fn possibly_round(
    buf: &mut [u8],
    mut len: usize,
    mut exp: i16,
    limit: i16,
    remainder: u64,
    ten_kappa: u64,
    ulp: u64,
) -> Option<(usize, i16)> {
    debug_assert!(remainder < ten_kappa);

    if ulp >= ten_kappa {
        return None;
    }
    if ten_kappa - ulp <= ulp {
        return None;
    }

    // Down: `remainder + ulp < ten_kappa / 2`.
    if ten_kappa - remainder > remainder && ten_kappa - 2 * remainder >= 2 * ulp {
        return Some((len, exp));
    }

    // Up: `remainder - ulp >= ten_kappa / 2`.
    if remainder > ulp && ten_kappa - (remainder - ulp) <= remainder - ulp {
        if let Some(c) = round_up(&mut buf[..len]) {
            // The carry adds a digit only when one more is
            // allowed.
            exp += 1;
            if exp > limit && len < buf.len() {
                buf[len] = c;
                len += 1;
            }
        }
        return Some((len, exp));
    }

    None
}
