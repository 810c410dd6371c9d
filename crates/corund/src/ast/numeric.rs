use std::cmp::Ordering;

use malachite::num::arithmetic::traits::{Abs, Pow};
use malachite::num::basic::traits::{One, Zero};
use malachite::num::conversion::traits::RoundingFrom;
use malachite::num::float::NiceFloat;
use malachite::rounding_modes::RoundingMode;
use malachite::{Integer, Natural, Rational};

/// A real number in one of three tiers: exact integer, exact rational, or
/// machine float. Undefined results are the float NaN, which every tier can
/// degrade to, so "not a number" flows through arithmetic like any value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Num {
    Integer(Integer),
    Rational(Rational),
    Small(NiceFloat<f64>),
}

use Num::*;

impl Num {
    pub const ZERO: Self = Integer(Integer::ZERO);
    pub const ONE: Self = Integer(Integer::ONE);
    pub const NAN: Self = Small(NiceFloat(f64::NAN));

    pub fn is_zero(&self) -> bool {
        match self {
            Integer(int) => *int == 0,
            Rational(rat) => *rat == 0,
            Small(float) => float.0 == 0.0,
        }
    }

    /// Zero in an exact tier. Floats never count, since a float zero may be
    /// a rounded nonzero value.
    pub fn is_exact_zero(&self) -> bool {
        matches!(self, Integer(_) | Rational(_)) && self.is_zero()
    }

    pub fn is_one(&self) -> bool {
        match self {
            Integer(int) => *int == 1,
            Rational(rat) => *rat == 1,
            Small(float) => float.0 == 1.0,
        }
    }

    pub fn is_exact_one(&self) -> bool {
        matches!(self, Integer(_) | Rational(_)) && self.is_one()
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Small(float) if float.0.is_nan())
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Integer(int) => *int < 0,
            Rational(rat) => *rat < 0,
            Small(float) => float.0 < 0.0,
        }
    }

    pub fn is_integer_value(&self) -> bool {
        match self {
            Integer(_) => true,
            Rational(rat) => rat.denominator_ref() == &Natural::ONE,
            Small(float) => float.0.is_finite() && float.0.fract() == 0.0,
        }
    }

    /// Exactness ranking used to pick the common tier of a pair.
    fn exactness(&self) -> u8 {
        match self {
            Integer(_) => 2,
            Rational(_) => 1,
            Small(_) => 0,
        }
    }

    #[must_use]
    pub fn smallify(&self) -> Self {
        let val = match self {
            Integer(int) => f64::rounding_from(int, RoundingMode::Nearest).0,
            Rational(rat) => f64::rounding_from(rat, RoundingMode::Nearest).0,
            Small(float) => float.0,
        };
        Small(NiceFloat(val))
    }

    #[must_use]
    pub fn rationalify(&self) -> Self {
        match self {
            Integer(int) => Rational(malachite::Rational::from(int)),
            Rational(_) | Small(_) => self.clone(),
        }
    }

    /// Demotes a whole rational back to the integer tier.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Rational(rat) if rat.denominator_ref() == &Natural::ONE => {
                Integer(Integer::try_from(rat).expect("denominator is one"))
            }
            other => other,
        }
    }

    /// Brings a pair into the least exact tier of the two.
    fn common_pair(a: &Self, b: &Self) -> (Self, Self) {
        match a.exactness().min(b.exactness()) {
            0 => (a.smallify(), b.smallify()),
            1 => (a.rationalify(), b.rationalify()),
            _ => (a.clone(), b.clone()),
        }
    }

    /// Value comparison across tiers. Distinct from `PartialEq`, which is
    /// structural: `cmp_values` puts `1` and `1.0` in the same place.
    pub fn cmp_values(&self, other: &Self) -> Ordering {
        match Self::common_pair(self, other) {
            (Integer(a), Integer(b)) => a.cmp(&b),
            (Rational(a), Rational(b)) => a.cmp(&b),
            (Small(a), Small(b)) => a.cmp(&b),
            _ => unreachable!(),
        }
    }

    pub fn eq_value(&self, other: &Self) -> bool {
        self.cmp_values(other) == Ordering::Equal
    }

    /// Division with the engine's undefined-result policy: exact division by
    /// exact zero is NaN rather than an error.
    #[must_use]
    pub fn div(&self, rhs: &Self) -> Self {
        if rhs.is_exact_zero() {
            return Self::NAN;
        }
        match Self::common_pair(self, rhs) {
            (Integer(a), Integer(b)) => {
                Rational(malachite::Rational::from_integers(a, b)).normalized()
            }
            (Rational(a), Rational(b)) => Rational(a / b).normalized(),
            (Small(a), Small(b)) => Small(NiceFloat(a.0 / b.0)),
            _ => unreachable!(),
        }
    }

    #[must_use]
    pub fn powi(&self, pow: i64) -> Self {
        match self {
            #[allow(clippy::cast_sign_loss)]
            Integer(int) if pow >= 0 => Integer(int.clone().pow(pow as u64)),
            Integer(int) if *int == 0 => Self::NAN,
            Integer(int) => Rational(malachite::Rational::from(int).pow(pow)),
            Rational(rat) if *rat == 0 && pow < 0 => Self::NAN,
            Rational(rat) => Rational(rat.clone().pow(pow)).normalized(),
            #[allow(clippy::cast_possible_truncation)]
            Small(float) => Small(NiceFloat(float.0.powi(pow as i32))),
        }
    }

    /// General power through the float tier. Exact when the exponent is a
    /// small integer, approximate otherwise; negative base with a fractional
    /// exponent comes out as NaN, which is the intended sentinel.
    #[must_use]
    pub fn pow(&self, exponent: &Self) -> Self {
        if let Some(int_pow) = exponent.to_i64() {
            return self.powi(int_pow);
        }
        let (Small(base), Small(exp)) = (self.smallify(), exponent.smallify()) else {
            unreachable!()
        };
        Small(NiceFloat(base.0.powf(exp.0)))
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Integer(int) => i64::try_from(int).ok(),
            Rational(rat) if rat.denominator_ref() == &Natural::ONE => {
                i64::try_from(&Integer::try_from(rat.clone()).ok()?).ok()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Integer(int) => Integer(int.clone().abs()),
            Rational(rat) => Rational(rat.clone().abs()),
            Small(float) => Small(NiceFloat(float.0.abs())),
        }
    }
}

impl std::ops::Add for &Num {
    type Output = Num;
    fn add(self, rhs: Self) -> Num {
        match Num::common_pair(self, rhs) {
            (Integer(a), Integer(b)) => Integer(a + b),
            (Rational(a), Rational(b)) => Rational(a + b).normalized(),
            (Small(a), Small(b)) => Small(NiceFloat(a.0 + b.0)),
            _ => unreachable!(),
        }
    }
}

impl std::ops::Mul for &Num {
    type Output = Num;
    fn mul(self, rhs: Self) -> Num {
        match Num::common_pair(self, rhs) {
            (Integer(a), Integer(b)) => Integer(a * b),
            (Rational(a), Rational(b)) => Rational(a * b).normalized(),
            (Small(a), Small(b)) => Small(NiceFloat(a.0 * b.0)),
            _ => unreachable!(),
        }
    }
}

impl std::ops::Neg for &Num {
    type Output = Num;
    fn neg(self) -> Num {
        match self {
            Integer(int) => Integer(-int.clone()),
            Rational(rat) => Rational(-rat.clone()),
            Small(float) => Small(NiceFloat(-float.0)),
        }
    }
}

impl std::ops::Sub for &Num {
    type Output = Num;
    fn sub(self, rhs: Self) -> Num {
        self + &-rhs
    }
}

impl From<i64> for Num {
    fn from(value: i64) -> Self {
        Integer(Integer::from(value))
    }
}

impl From<f64> for Num {
    fn from(value: f64) -> Self {
        Small(NiceFloat(value))
    }
}

impl TryFrom<&Num> for i64 {
    type Error = &'static str;

    fn try_from(num: &Num) -> Result<Self, Self::Error> {
        num.to_i64().ok_or("not representable as a 64-bit integer")
    }
}

pub fn rational(numerator: i64, denominator: i64) -> Num {
    assert!(denominator != 0, "rational constant with zero denominator");
    Rational(malachite::Rational::from_integers(
        Integer::from(numerator),
        Integer::from(denominator),
    ))
    .normalized()
}
