use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest magnitude below which every integer is exactly representable as
/// an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A numeric leaf.
///
/// Numbers read from a querystring are IEEE-754 doubles and print the way
/// the web platform prints them: integral values without a fractional part,
/// everything else in the shortest form that round-trips. Numbers built from
/// Rust integers keep their exact value.
#[derive(Clone, Copy)]
pub struct Number {
    n: N,
}

#[derive(Clone, Copy)]
enum N {
    PosInt(u64),
    /// Always less than zero.
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub const fn from_f64(f: f64) -> Self {
        Number { n: N::Float(f) }
    }

    pub fn as_f64(&self) -> f64 {
        match self.n {
            N::PosInt(u) => u as f64,
            N::NegInt(i) => i as f64,
            N::Float(f) => f,
        }
    }

    /// Returns the value as an `i64` if it is integral and in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            N::PosInt(u) => i64::try_from(u).ok(),
            N::NegInt(i) => Some(i),
            // i64::MAX is not representable, `<` excludes the rounded-up bound
            N::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Some(f as i64)
            }
            N::Float(_) => None,
        }
    }

    /// Returns the value as a `u64` if it is integral, non-negative and in
    /// range.
    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            N::PosInt(u) => Some(u),
            N::NegInt(_) => None,
            N::Float(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => Some(f as u64),
            N::Float(_) => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        match self.n {
            N::PosInt(_) | N::NegInt(_) => true,
            N::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number { n: N::PosInt(0) }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.n, other.n) {
            (N::PosInt(a), N::PosInt(b)) => a == b,
            (N::NegInt(a), N::NegInt(b)) => a == b,
            (N::Float(a), N::Float(b)) => a == b,
            (N::Float(_), N::PosInt(u)) | (N::PosInt(u), N::Float(_)) => {
                self.as_u64() == Some(u) && other.as_u64() == Some(u)
            }
            (N::Float(_), N::NegInt(i)) | (N::NegInt(i), N::Float(_)) => {
                self.as_i64() == Some(i) && other.as_i64() == Some(i)
            }
            (N::PosInt(_), N::NegInt(_)) | (N::NegInt(_), N::PosInt(_)) => false,
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.n {
            N::PosInt(u) => return f.write_str(itoa::Buffer::new().format(u)),
            N::NegInt(i) => return f.write_str(itoa::Buffer::new().format(i)),
            N::Float(v) => v,
        };
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
        }
        if v == 0.0 {
            // covers -0 as well
            return f.write_str("0");
        }
        if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
            let mut buffer = itoa::Buffer::new();
            return f.write_str(buffer.format(v as i64));
        }
        let mut buffer = ryu::Buffer::new();
        write_shortest(f, buffer.format_finite(v))
    }
}

/// Rewrites the output of `ryu` into the canonical number-to-string form of
/// the querystring world: plain decimal notation for exponents in
/// `(-7, 21)`, otherwise `d.ddde+x`.
fn write_shortest(f: &mut fmt::Formatter<'_>, ryu: &str) -> fmt::Result {
    let (negative, ryu) = match ryu.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, ryu),
    };
    let (mantissa, exp) = match ryu.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (ryu, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    // value = 0.<digits> * 10^point
    let mut point = int_part.len() as i32 + exp;
    let all_digits = format!("{int_part}{frac_part}");
    let trimmed = all_digits.trim_start_matches('0');
    point -= (all_digits.len() - trimmed.len()) as i32;
    let digits = trimmed.trim_end_matches('0');
    let k = digits.len() as i32;

    if negative {
        f.write_str("-")?;
    }
    if k <= point && point <= 21 {
        f.write_str(digits)?;
        for _ in 0..(point - k) {
            f.write_str("0")?;
        }
    } else if 0 < point && point <= 21 {
        let (head, tail) = digits.split_at(point as usize);
        write!(f, "{head}.{tail}")?;
    } else if -6 < point && point <= 0 {
        f.write_str("0.")?;
        for _ in 0..(-point) {
            f.write_str("0")?;
        }
        f.write_str(digits)?;
    } else {
        let e = point - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            write!(f, "{head}e{sign}{}", e.abs())?;
        } else {
            write!(f, "{head}.{tail}e{sign}{}", e.abs())?;
        }
    }
    Ok(())
}

macro_rules! from_unsigned {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Number {
                fn from(u: $ty) -> Self {
                    Number { n: N::PosInt(u as u64) }
                }
            }
        )*
    };
}

macro_rules! from_signed {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Number {
                fn from(i: $ty) -> Self {
                    let n = if i < 0 {
                        N::NegInt(i as i64)
                    } else {
                        N::PosInt(i as u64)
                    };
                    Number { n }
                }
            }
        )*
    };
}

from_unsigned!(u8 u16 u32 u64 usize);
from_signed!(i8 i16 i32 i64 isize);

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::from_f64(f)
    }
}

impl From<f32> for Number {
    /// Keeps the shortest decimal form of the `f32`, so `0.1f32` prints as
    /// `0.1` rather than its widened `f64` digits.
    fn from(f: f32) -> Self {
        let widened = if f.is_finite() {
            ryu::Buffer::new()
                .format_finite(f)
                .parse::<f64>()
                .unwrap_or(f64::from(f))
        } else {
            f64::from(f)
        };
        Number::from_f64(widened)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.n {
            N::PosInt(u) => serializer.serialize_u64(u),
            N::NegInt(i) => serializer.serialize_i64(i),
            N::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(f as i64)
            }
            N::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}

struct NumberVisitor;

impl Visitor<'_> for NumberVisitor {
    type Value = Number;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
        Ok(v.into())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
        Ok(v.into())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
        Ok(v.into())
    }
}
