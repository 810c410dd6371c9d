use super::Num;

/// A complex number as a pair of real parts. Kept deliberately small: the
/// engine only needs enough complex arithmetic for constant folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComplexNum {
    pub real: Num,
    pub imag: Num,
}

impl ComplexNum {
    pub const I: Self = Self {
        real: Num::ZERO,
        imag: Num::ONE,
    };

    pub fn new(real: Num, imag: Num) -> Self {
        Self { real, imag }
    }

    pub fn is_zero(&self) -> bool {
        self.real.is_zero() && self.imag.is_zero()
    }

    pub fn is_real(&self) -> bool {
        self.imag.is_zero()
    }

    pub fn is_nan(&self) -> bool {
        self.real.is_nan() || self.imag.is_nan()
    }

    #[must_use]
    pub fn div(&self, rhs: &Self) -> Self {
        let norm = &(&rhs.real * &rhs.real) + &(&rhs.imag * &rhs.imag);
        if norm.is_exact_zero() {
            return Self::new(Num::NAN, Num::NAN);
        }
        let real = &(&self.real * &rhs.real) + &(&self.imag * &rhs.imag);
        let imag = &(&self.imag * &rhs.real) - &(&self.real * &rhs.imag);
        Self::new(real.div(&norm), imag.div(&norm))
    }

    #[must_use]
    pub fn powi(&self, pow: i64) -> Self {
        if pow < 0 {
            let positive = self.powi(-pow);
            return Self::from(Num::ONE).div(&positive);
        }
        let mut acc = Self::from(Num::ONE);
        for _ in 0..pow {
            acc = &acc * self;
        }
        acc
    }
}

impl From<Num> for ComplexNum {
    fn from(real: Num) -> Self {
        Self {
            real,
            imag: Num::ZERO,
        }
    }
}

impl std::ops::Add for &ComplexNum {
    type Output = ComplexNum;
    fn add(self, rhs: Self) -> ComplexNum {
        ComplexNum::new(&self.real + &rhs.real, &self.imag + &rhs.imag)
    }
}

impl std::ops::Sub for &ComplexNum {
    type Output = ComplexNum;
    fn sub(self, rhs: Self) -> ComplexNum {
        ComplexNum::new(&self.real - &rhs.real, &self.imag - &rhs.imag)
    }
}

impl std::ops::Mul for &ComplexNum {
    type Output = ComplexNum;
    fn mul(self, rhs: Self) -> ComplexNum {
        let real = &(&self.real * &rhs.real) - &(&self.imag * &rhs.imag);
        let imag = &(&self.real * &rhs.imag) + &(&self.imag * &rhs.real);
        ComplexNum::new(real, imag)
    }
}

impl std::ops::Neg for &ComplexNum {
    type Output = ComplexNum;
    fn neg(self) -> ComplexNum {
        ComplexNum::new(-&self.real, -&self.imag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i_squared_is_negative_one() {
        let squared = ComplexNum::I.powi(2);
        assert_eq!(squared, ComplexNum::from(Num::from(-1)));
    }

    #[test]
    fn division_by_zero_is_nan() {
        let one = ComplexNum::from(Num::ONE);
        assert!(one.div(&ComplexNum::from(Num::ZERO)).is_nan());
    }

    #[test]
    fn division_inverts_multiplication() {
        let a = ComplexNum::new(Num::from(3), Num::from(2));
        let b = ComplexNum::new(Num::from(1), Num::from(-1));
        let product = &a * &b;
        assert_eq!(product.div(&b), a);
    }
}
