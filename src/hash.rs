//! Key hashing: the 32-bit MurmurHash3 string hash every dictionary key
//! reduces to, and the `KeyHash` capability keys implement.
//!
//! Strings are hashed over their UTF-16 code units, keeping the low byte of
//! each unit; the length mixed into the finalizer is the number of code
//! units. For ASCII this is the plain byte-wise MurmurHash3_x86_32. Numbers
//! hash as their script-engine text and booleans as `0`/`1`, so `5_i32`,
//! `5_u64` and `5.0_f64` all land in the same bucket. Integer keys hash
//! through their nearest `f64`; wide integers that round together collide
//! and are told apart by `Eq`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use std::rc::Rc;
use std::sync::Arc;

/// Seed used when callers do not supply one.
pub const DEFAULT_SEED: u32 = 37;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Capability required of dictionary keys.
///
/// `hash_code` must be a pure function of the value: two keys that compare
/// equal must return the same code, and a key's code must not change while
/// it is stored. Collisions are allowed; the dictionary resolves them with
/// `Eq`.
pub trait KeyHash {
    fn hash_code(&self) -> u32;

    /// `false` for the "no key" value of a type (e.g. `None`). Unspecified
    /// keys are rejected on insertion.
    fn is_specified(&self) -> bool {
        true
    }
}

/// `1` for `true`, `0` for `false`.
#[inline]
pub fn hash_boolean(b: bool) -> u32 {
    b as u32
}

/// Hash a number through its script-engine text using [`DEFAULT_SEED`].
pub fn hash_number(n: f64) -> u32 {
    hash_number_seeded(n, DEFAULT_SEED)
}

pub fn hash_number_seeded(n: f64, seed: u32) -> u32 {
    let mut buf = ryu_js::Buffer::new();
    hash_string_seeded(number_text(&mut buf, n), seed)
}

/// Hash a string using [`DEFAULT_SEED`].
pub fn hash_string(s: &str) -> u32 {
    hash_string_seeded(s, DEFAULT_SEED)
}

/// MurmurHash3 (x86, 32-bit) over the low bytes of the UTF-16 code units of `s`.
pub fn hash_string_seeded(s: &str, seed: u32) -> u32 {
    let mut h1 = seed;
    let mut block = [0u8; 4];
    let mut filled = 0usize;
    let mut len = 0u32;

    for unit in s.encode_utf16() {
        block[filled] = (unit & 0xff) as u8;
        filled += 1;
        len = len.wrapping_add(1);
        if filled == 4 {
            h1 ^= mix_block(u32::from_le_bytes(block));
            h1 = h1
                .rotate_left(13)
                .wrapping_mul(5)
                .wrapping_add(0xe654_6b64);
            filled = 0;
        }
    }

    if filled > 0 {
        let tail = block[..filled]
            .iter()
            .enumerate()
            .fold(0u32, |k, (i, &b)| k | (u32::from(b) << (8 * i)));
        h1 ^= mix_block(tail);
    }

    h1 ^= len;
    avalanche(h1)
}

#[inline]
fn mix_block(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

#[inline]
fn avalanche(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Script-engine text for `n`: shortest round-trip digits, exponent form
/// outside `1e-7..1e21`, `NaN`, `Infinity`, and `-0` as `0`.
fn number_text(buf: &mut ryu_js::Buffer, n: f64) -> &str {
    if n == 0.0 {
        "0"
    } else {
        buf.format(n)
    }
}

const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Milliseconds since the Unix epoch at midnight of `date`.
pub(crate) fn date_millis(date: &NaiveDate) -> i64 {
    (i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE) * MILLIS_PER_DAY
}

macro_rules! integer_key_hash {
    ($($t:ty),* $(,)?) => {
        $(
            impl KeyHash for $t {
                #[inline]
                fn hash_code(&self) -> u32 {
                    hash_number(*self as f64)
                }
            }
        )*
    };
}

integer_key_hash!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl KeyHash for bool {
    #[inline]
    fn hash_code(&self) -> u32 {
        hash_boolean(*self)
    }
}

impl KeyHash for char {
    fn hash_code(&self) -> u32 {
        let mut utf8 = [0u8; 4];
        hash_string(self.encode_utf8(&mut utf8))
    }
}

impl KeyHash for str {
    #[inline]
    fn hash_code(&self) -> u32 {
        hash_string(self)
    }
}

impl KeyHash for String {
    #[inline]
    fn hash_code(&self) -> u32 {
        hash_string(self)
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    #[inline]
    fn hash_code(&self) -> u32 {
        (**self).hash_code()
    }
    fn is_specified(&self) -> bool {
        (**self).is_specified()
    }
}

impl<T: KeyHash + ?Sized> KeyHash for Box<T> {
    #[inline]
    fn hash_code(&self) -> u32 {
        (**self).hash_code()
    }
    fn is_specified(&self) -> bool {
        (**self).is_specified()
    }
}

impl<T: KeyHash + ?Sized> KeyHash for Rc<T> {
    #[inline]
    fn hash_code(&self) -> u32 {
        (**self).hash_code()
    }
    fn is_specified(&self) -> bool {
        (**self).is_specified()
    }
}

impl<T: KeyHash + ?Sized> KeyHash for Arc<T> {
    #[inline]
    fn hash_code(&self) -> u32 {
        (**self).hash_code()
    }
    fn is_specified(&self) -> bool {
        (**self).is_specified()
    }
}

impl<T: KeyHash> KeyHash for Option<T> {
    fn hash_code(&self) -> u32 {
        self.as_ref().map_or(0, KeyHash::hash_code)
    }
    fn is_specified(&self) -> bool {
        self.as_ref().is_some_and(KeyHash::is_specified)
    }
}

impl<Tz: TimeZone> KeyHash for DateTime<Tz> {
    fn hash_code(&self) -> u32 {
        hash_number(self.timestamp_millis() as f64)
    }
}

impl KeyHash for NaiveDateTime {
    fn hash_code(&self) -> u32 {
        hash_number(self.and_utc().timestamp_millis() as f64)
    }
}

impl KeyHash for NaiveDate {
    fn hash_code(&self) -> u32 {
        hash_number(date_millis(self) as f64)
    }
}
