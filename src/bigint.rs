//! This module contains the implementation of the big-int data structure that
//! we use for exact comparisons when the fast conversion paths can't decide
//! how to round.

use core::cmp::Ordering;
use std::borrow::Cow;
use std::sync::OnceLock;

/// This is an arbitrary-size unsigned big number implementation that only
/// supports the operations that the exact conversion paths need. The number
/// is backed by `Vec<u32>` in little-endian order. The `offset` field counts
/// the implicit zero words below `data`, which keeps numbers with large
/// powers of two cheap to store and to shift.
///
/// Powers of five are cached and shared (see `pow5`). Cached values are only
/// handed out by reference, so they are never mutated. A freshly constructed
/// number is owned by its caller and is mutated in place.
///
/// # Examples
///
/// ```
///    use fpdecimal::BigInt;
///
///    // 10^30 = 5^30 * 2^30.
///    let x = BigInt::value_of_pow52(30, 30);
///    let y = BigInt::from_decimal(b"1000000000000000000000000000000");
///    assert_eq!(x, y);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BigInt {
    data: Vec<u32>,
    offset: usize,
}

/// Powers of five that fit in a u32.
const SMALL_POW5: [u32; 14] = [
    1,
    5,
    25,
    125,
    625,
    3_125,
    15_625,
    78_125,
    390_625,
    1_953_125,
    9_765_625,
    48_828_125,
    244_140_625,
    1_220_703_125,
];

/// Powers of five up to this exponent are computed by repeated
/// multiplication.
const POW5_SMALL_MAX: u32 = 340;

/// The largest cached power of five. This covers the largest exponent that
/// the binary64 parser needs (1076).
const POW5_CACHE_MAX: u32 = 1100;

impl BigInt {
    /// Create a new zero big int number.
    pub fn zero() -> Self {
        BigInt {
            data: Vec::new(),
            offset: 0,
        }
    }

    /// Create a number with the value `val`.
    pub fn from_u64(val: u64) -> Self {
        let mut x = BigInt {
            data: Vec::from([val as u32, (val >> 32) as u32]),
            offset: 0,
        };
        x.trim();
        x
    }

    /// Create a number with the value `val`.
    pub fn from_u128(val: u128) -> Self {
        let mut x = BigInt {
            data: (0..4).map(|i| (val >> (32 * i)) as u32).collect(),
            offset: 0,
        };
        x.trim();
        x
    }

    /// Create a number from a run of ASCII decimal digits, most significant
    /// first.
    pub fn from_decimal(digits: &[u8]) -> Self {
        let mut x = BigInt::zero();
        for chunk in digits.chunks(9) {
            let mut val = 0;
            for d in chunk {
                debug_assert!(d.is_ascii_digit());
                val = val * 10 + (d - b'0') as u32;
            }
            x.inplace_mul_add(10u32.pow(chunk.len() as u32), val);
        }
        x
    }

    /// Returns 5^p5 * 2^p2.
    pub fn value_of_pow52(p5: u32, p2: u32) -> Self {
        let mut x = pow5(p5).into_owned();
        x.shift_left(p2 as usize);
        x
    }

    /// Returns v * 5^p5 * 2^p2.
    pub fn value_of_mul_pow52(v: u64, p5: u32, p2: u32) -> Self {
        let mut x = BigInt::from_u64(v);
        x.inplace_mul_pow52(p5, p2);
        x
    }

    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of significant bits in the number.
    pub fn bit_len(&self) -> usize {
        match self.data.last() {
            None => 0,
            Some(top) => {
                let words = self.offset + self.data.len();
                32 * words - top.leading_zeros() as usize
            }
        }
    }

    /// Returns the number as little-endian words, including the words that
    /// the offset represents.
    pub fn to_words(&self) -> Vec<u32> {
        let mut words = vec![0; self.offset];
        words.extend_from_slice(&self.data);
        words
    }

    /// Returns the word at index `i`, counting the implicit zero words.
    fn word(&self, i: usize) -> u32 {
        if i < self.offset {
            return 0;
        }
        self.data.get(i - self.offset).copied().unwrap_or(0)
    }

    /// Returns the number of words, counting the implicit zero words.
    fn size(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        self.offset + self.data.len()
    }

    /// Remove the leading zero words. Zero is represented by empty data and
    /// a zero offset.
    fn trim(&mut self) {
        while let Some(&0) = self.data.last() {
            self.data.pop();
        }
        if self.data.is_empty() {
            self.offset = 0;
        }
    }

    /// Make the offset no larger than `offset` by materializing zero words.
    fn lower_offset(&mut self, offset: usize) {
        if self.offset > offset {
            let extra = self.offset - offset;
            self.data.splice(0..0, core::iter::repeat(0).take(extra));
            self.offset = offset;
        }
    }

    /// Multiply the number by `m` and add `a`.
    fn inplace_mul_add(&mut self, m: u32, a: u32) {
        self.lower_offset(0);
        let mut carry = a as u64;
        for w in self.data.iter_mut() {
            let p = *w as u64 * m as u64 + carry;
            *w = p as u32;
            carry = p >> 32;
        }
        if carry != 0 {
            self.data.push(carry as u32);
        }
        self.trim();
    }

    /// Multiply the number by `m`.
    pub fn inplace_mul_u32(&mut self, m: u32) {
        if m == 0 {
            *self = BigInt::zero();
            return;
        }
        let mut carry = 0;
        for w in self.data.iter_mut() {
            let p = *w as u64 * m as u64 + carry;
            *w = p as u32;
            carry = p >> 32;
        }
        if carry != 0 {
            self.data.push(carry as u32);
        }
    }

    /// Multiply the number by `m`.
    pub fn inplace_mul_u64(&mut self, m: u64) {
        let hi = (m >> 32) as u32;
        if hi == 0 {
            self.inplace_mul_u32(m as u32);
            return;
        }
        *self = self.mul(&BigInt::from_u64(m));
    }

    /// Returns the product of the two numbers.
    pub fn mul(&self, other: &BigInt) -> BigInt {
        if self.is_zero() || other.is_zero() {
            return BigInt::zero();
        }
        let mut data = vec![0u32; self.data.len() + other.data.len()];
        for (i, a) in self.data.iter().enumerate() {
            let mut carry = 0u64;
            for (j, b) in other.data.iter().enumerate() {
                let p = *a as u64 * *b as u64 + data[i + j] as u64 + carry;
                data[i + j] = p as u32;
                carry = p >> 32;
            }
            data[i + other.data.len()] = carry as u32;
        }
        let mut x = BigInt {
            data,
            offset: self.offset + other.offset,
        };
        x.trim();
        x
    }

    /// Multiply the number by 5^p5 * 2^p2.
    pub fn inplace_mul_pow52(&mut self, p5: u32, p2: u32) {
        if p5 != 0 {
            if let Some(small) = SMALL_POW5.get(p5 as usize) {
                self.inplace_mul_u32(*small);
            } else {
                *self = self.mul(&pow5(p5));
            }
        }
        self.shift_left(p2 as usize);
    }

    /// Shift the number left by `bits` bits.
    pub fn shift_left(&mut self, bits: usize) {
        if self.is_zero() {
            return;
        }
        self.offset += bits / 32;
        let bits = (bits % 32) as u32;
        if bits == 0 {
            return;
        }
        let mut carry = 0;
        for w in self.data.iter_mut() {
            let next = *w >> (32 - bits);
            *w = (*w << bits) | carry;
            carry = next;
        }
        if carry != 0 {
            self.data.push(carry);
        }
    }

    /// Subtract `rhs` from the number. The result must be non-negative.
    pub fn inplace_sub(&mut self, rhs: &BigInt) {
        debug_assert!(*self >= *rhs, "Subtraction underflow");
        if rhs.is_zero() {
            return;
        }
        self.lower_offset(rhs.offset);
        let base = self.offset;
        let mut borrow = 0i64;
        for i in (rhs.offset - base)..self.data.len() {
            let r = rhs.word(base + i) as i64;
            if r == 0 && borrow == 0 && base + i >= rhs.size() {
                break;
            }
            let d = self.data[i] as i64 - r - borrow;
            self.data[i] = d as u32;
            borrow = if d < 0 { 1 } else { 0 };
        }
        debug_assert!(borrow == 0);
        self.trim();
    }

    /// Returns the 64 bits of the number that start at bit `lo`.
    fn bits_from(&self, lo: usize) -> u64 {
        let i = lo / 32;
        let window = self.word(i) as u128
            | (self.word(i + 1) as u128) << 32
            | (self.word(i + 2) as u128) << 64;
        (window >> (lo % 32)) as u64
    }

    /// One step of the digit extraction: sets the number to 10 * (self % s)
    /// and returns the quotient self / s, which must be a single decimal
    /// digit.
    pub fn quo_rem_iteration(&mut self, s: &BigInt) -> u32 {
        debug_assert!(!s.is_zero());
        // Estimate the quotient from the top 32 bits of s. The estimate is
        // exact when s fits in 32 bits, and is otherwise low by at most one.
        let lo = s.bit_len().saturating_sub(32);
        let top = self.bits_from(lo);
        let s_top = s.bits_from(lo);
        let mut q = if lo == 0 { top / s_top } else { top / (s_top + 1) };
        debug_assert!(q <= 9, "The quotient is not a digit");
        if q != 0 {
            let mut qs = s.clone();
            qs.inplace_mul_u32(q as u32);
            self.inplace_sub(&qs);
        }
        if *self >= *s {
            self.inplace_sub(s);
            q += 1;
        }
        debug_assert!(*self < *s && q <= 9, "The quotient is not a digit");
        self.inplace_mul_u32(10);
        q as u32
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        let size = self.size();
        match size.cmp(&other.size()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        // The words below both offsets are zero.
        let low = self.offset.min(other.offset);
        for i in (low..size).rev() {
            match self.word(i).cmp(&other.word(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

/// Returns the cached powers of five. The first entries are built by
/// multiplying by five, the rest by multiplying two smaller cached powers.
fn pow5_cache() -> &'static [BigInt] {
    static CACHE: OnceLock<Vec<BigInt>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let mut cache = Vec::with_capacity(POW5_CACHE_MAX as usize + 1);
        let mut x = BigInt::from_u64(1);
        for _ in 0..=POW5_SMALL_MAX {
            cache.push(x.clone());
            x.inplace_mul_u32(5);
        }
        for p in (POW5_SMALL_MAX + 1)..=POW5_CACHE_MAX {
            let a = (p / 2) as usize;
            let b = p as usize - a;
            let x = cache[a].mul(&cache[b]);
            cache.push(x);
        }
        cache
    })
}

/// Returns 5^p. Cached powers are borrowed, larger ones are computed by
/// recombining cached powers.
pub fn pow5(p: u32) -> Cow<'static, BigInt> {
    let cache = pow5_cache();
    if let Some(x) = cache.get(p as usize) {
        return Cow::Borrowed(x);
    }
    let x = cache[POW5_CACHE_MAX as usize].mul(&pow5(p - POW5_CACHE_MAX));
    Cow::Owned(x)
}

#[cfg(test)]
mod reference {
    //! A simple and slow big-int implementation that the tests compare
    //! against.
    #[derive(Clone, Debug)]
    pub struct Ref(pub Vec<u64>);

    impl Ref {
        pub fn new(v: u64) -> Ref {
            let mut r = Ref(vec![v]);
            r.trim();
            r
        }
        fn trim(&mut self) {
            while let Some(&0) = self.0.last() {
                self.0.pop();
            }
        }
        pub fn mul_small(&self, m: u64) -> Ref {
            let mut out = Vec::new();
            let mut carry: u128 = 0;
            for w in &self.0 {
                let p = *w as u128 * m as u128 + carry;
                out.push(p as u64);
                carry = p >> 64;
            }
            out.push(carry as u64);
            let mut r = Ref(out);
            r.trim();
            r
        }
        pub fn mul(&self, other: &Ref) -> Ref {
            let mut r = Ref(vec![]);
            for (i, w) in other.0.iter().enumerate() {
                let mut part = self.mul_small(*w);
                if part.0.is_empty() {
                    continue;
                }
                part.0.splice(0..0, core::iter::repeat(0).take(i));
                r = r.add(&part);
            }
            r
        }
        pub fn add(&self, other: &Ref) -> Ref {
            let len = self.0.len().max(other.0.len());
            let mut out = Vec::new();
            let mut carry = 0u128;
            for i in 0..len {
                let a = *self.0.get(i).unwrap_or(&0) as u128;
                let b = *other.0.get(i).unwrap_or(&0) as u128;
                let s = a + b + carry;
                out.push(s as u64);
                carry = s >> 64;
            }
            out.push(carry as u64);
            let mut r = Ref(out);
            r.trim();
            r
        }
        pub fn sub(&self, other: &Ref) -> Ref {
            let mut out = Vec::new();
            let mut borrow = 0u64;
            for i in 0..self.0.len() {
                let b = *other.0.get(i).unwrap_or(&0);
                let (d, o1) = self.0[i].overflowing_sub(b);
                let (d, o2) = d.overflowing_sub(borrow);
                out.push(d);
                borrow = (o1 || o2) as u64;
            }
            assert_eq!(borrow, 0);
            let mut r = Ref(out);
            r.trim();
            r
        }
        pub fn shl(&self, bits: usize) -> Ref {
            let mut r = Ref(vec![0; bits / 64]);
            let bits = bits % 64;
            let mut carry = 0;
            for w in &self.0 {
                if bits == 0 {
                    r.0.push(*w);
                } else {
                    r.0.push((*w << bits) | carry);
                    carry = *w >> (64 - bits);
                }
            }
            r.0.push(carry);
            r.trim();
            r
        }
        pub fn cmp_value(&self, other: &Ref) -> core::cmp::Ordering {
            self.0
                .len()
                .cmp(&other.0.len())
                .then_with(|| self.0.iter().rev().cmp(other.0.iter().rev()))
        }
        pub fn pow5(p: u32) -> Ref {
            let mut r = Ref::new(1);
            for _ in 0..p {
                r = r.mul_small(5);
            }
            r
        }
        pub fn words(&self) -> Vec<u32> {
            let mut out = Vec::new();
            for w in &self.0 {
                out.push(*w as u32);
                out.push((*w >> 32) as u32);
            }
            while let Some(&0) = out.last() {
                out.pop();
            }
            out
        }
    }
}

#[cfg(test)]
fn assert_same(x: &BigInt, r: &reference::Ref) {
    assert_eq!(x.to_words(), r.words());
}

#[test]
fn test_basic_construction() {
    assert!(BigInt::zero().is_zero());
    assert!(BigInt::from_u64(0).is_zero());
    assert_eq!(BigInt::from_u64(0), BigInt::zero());
    assert_eq!(BigInt::from_u64(1 << 40).bit_len(), 41);
    assert_eq!(BigInt::from_u128(1 << 100).bit_len(), 101);
    assert_eq!(BigInt::from_u128(u128::MAX).to_words(), vec![u32::MAX; 4]);
    assert_eq!(BigInt::zero().bit_len(), 0);
    assert_eq!(BigInt::from_decimal(b"0000"), BigInt::zero());
    assert_eq!(
        BigInt::from_decimal(b"18446744073709551615"),
        BigInt::from_u64(u64::MAX)
    );
    assert_eq!(
        BigInt::from_decimal(b"340282366920938463463374607431768211455"),
        BigInt::from_u128(u128::MAX)
    );
}

#[test]
fn test_pow5_cache() {
    let mut r = reference::Ref::new(1);
    for p in 0..=(POW5_CACHE_MAX + 50) {
        assert_same(&pow5(p), &r);
        r = r.mul_small(5);
    }
    assert!(matches!(pow5(POW5_CACHE_MAX), Cow::Borrowed(_)));
    assert!(matches!(pow5(POW5_CACHE_MAX + 1), Cow::Owned(_)));
}

#[test]
fn test_shift_and_offset() {
    let mut x = BigInt::from_u64(0xdead_beef);
    x.shift_left(100);
    assert_eq!(x.offset, 3);
    assert_eq!(x.bit_len(), 132);
    assert_same(&x, &reference::Ref::new(0xdead_beef).shl(100));

    // Shifting by whole words only changes the offset.
    let mut y = BigInt::from_u64(7);
    y.shift_left(64);
    assert_eq!(y.data, vec![7]);
    assert_eq!(y.offset, 2);
    assert_eq!(y, BigInt::from_u128(7 << 64));

    let mut z = BigInt::zero();
    z.shift_left(1000);
    assert!(z.is_zero());
}

#[test]
fn test_random_against_reference() {
    use crate::utils::Lfsr;
    use reference::Ref;
    let mut lfsr = Lfsr::new();

    for _ in 0..300 {
        let v = lfsr.get64();
        let p5 = lfsr.below(1100) as u32;
        let p2 = lfsr.below(1100) as u32;
        let x = BigInt::value_of_mul_pow52(v, p5, p2);
        let rx = Ref::new(v).mul(&Ref::pow5(p5)).shl(p2 as usize);
        assert_same(&x, &rx);

        let w = lfsr.get64();
        let q5 = lfsr.below(1100) as u32;
        let q2 = lfsr.below(1100) as u32;
        let y = BigInt::value_of_mul_pow52(w, q5, q2);
        let ry = Ref::new(w).mul(&Ref::pow5(q5)).shl(q2 as usize);

        // Compare.
        assert_eq!(x.cmp(&y), rx.cmp_value(&ry));

        // Multiply.
        assert_same(&x.mul(&y), &rx.mul(&ry));
        let m = lfsr.get64();
        let mut xm = x.clone();
        xm.inplace_mul_u64(m);
        assert_same(&xm, &rx.mul_small(m));
        let mut xm = x.clone();
        xm.inplace_mul_u32(m as u32);
        assert_same(&xm, &rx.mul_small(m as u32 as u64));

        // Subtract the smaller from the larger.
        let x_ge_y = rx.cmp_value(&ry) != core::cmp::Ordering::Less;
        let (mut big, small, rbig, rsmall) = if x_ge_y {
            (x.clone(), y.clone(), rx.clone(), ry.clone())
        } else {
            (y.clone(), x.clone(), ry.clone(), rx.clone())
        };
        big.inplace_sub(&small);
        assert_same(&big, &rbig.sub(&rsmall));

        // Shift.
        let s = lfsr.below(200) as usize;
        let mut xs = x.clone();
        xs.shift_left(s);
        assert_same(&xs, &rx.shl(s));
    }
}

#[test]
fn test_sub_to_zero() {
    let mut x = BigInt::value_of_pow52(100, 100);
    let y = BigInt::value_of_pow52(100, 100);
    x.inplace_sub(&y);
    assert!(x.is_zero());
    assert_eq!(x.bit_len(), 0);

    // Different offsets, same value.
    let mut a = BigInt::from_u64(1);
    a.shift_left(96);
    let mut b = BigInt::from_u128(1 << 64);
    b.shift_left(32);
    assert_eq!(a, b);
    a.inplace_sub(&b);
    assert!(a.is_zero());
}

#[test]
fn test_quo_rem_iteration() {
    // Extract the digits of 1/7 = 0.142857...
    let s = BigInt::from_u64(7);
    let mut x = BigInt::from_u64(10);
    let mut digits = Vec::new();
    for _ in 0..12 {
        digits.push(x.quo_rem_iteration(&s));
    }
    assert_eq!(digits, [1, 4, 2, 8, 5, 7, 1, 4, 2, 8, 5, 7]);

    // Extract the digits of 2^-20 = 0.00000095367431640625, scaled so that
    // the first quotient is the first digit.
    let s = BigInt::value_of_pow52(0, 20);
    let mut x = BigInt::value_of_pow52(7, 7);
    let mut digits = Vec::new();
    while !x.is_zero() {
        digits.push(x.quo_rem_iteration(&s));
    }
    assert_eq!(digits, [9, 5, 3, 6, 7, 4, 3, 1, 6, 4, 0, 6, 2, 5]);
}

#[test]
fn test_quo_rem_multi_word() {
    use crate::utils::Lfsr;
    let mut lfsr = Lfsr::new_with_seed(3);

    // With x = w * m and s = v * m the quotient is w / v, and the
    // remainder is (w % v) * m.
    for i in 0..500 {
        let v = (1 << 59) | lfsr.below(1 << 59);
        let w = if i % 10 == 0 { v * 9 + v - 1 } else { lfsr.below(10 * v) };
        let p5 = lfsr.below(400) as u32;
        let p2 = lfsr.below(400) as u32;
        let s = BigInt::value_of_mul_pow52(v, p5, p2);
        let mut x = BigInt::value_of_mul_pow52(w, p5, p2);
        assert_eq!(x.quo_rem_iteration(&s) as u64, w / v);
        assert_eq!(x, BigInt::value_of_mul_pow52(10 * (w % v), p5, p2));
    }

    // Small divisors take the exact estimate.
    let s = BigInt::from_u64(0xffff_ffff);
    let mut x = BigInt::from_u64(0xffff_ffff * 9 + 7);
    assert_eq!(x.quo_rem_iteration(&s), 9);
    assert_eq!(x, BigInt::from_u64(70));
}
