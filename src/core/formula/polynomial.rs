use rug::{Complex, Float};

/// A polynomial in `z` with arbitrary-precision complex coefficients.
///
/// `coefficients[k]` multiplies `z^k`. Trailing zero coefficients are trimmed,
/// so the zero polynomial has no coefficients at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<Complex>,
    prec: u32,
}

impl Polynomial {
    #[must_use]
    pub fn zero(prec: u32) -> Self {
        Self {
            coefficients: Vec::new(),
            prec,
        }
    }

    #[must_use]
    pub fn constant(value: Complex) -> Self {
        let prec = value.prec().0;
        Self::from_coefficients(vec![value], prec)
    }

    /// The monomial `z`.
    #[must_use]
    pub fn identity(prec: u32) -> Self {
        Self::from_coefficients(
            vec![Complex::new(prec), Complex::with_val(prec, (1, 0))],
            prec,
        )
    }

    #[must_use]
    pub fn from_coefficients(coefficients: Vec<Complex>, prec: u32) -> Self {
        let mut polynomial = Self { coefficients, prec };
        polynomial.trim();
        polynomial
    }

    #[must_use]
    pub fn coefficients(&self) -> &[Complex] {
        &self.coefficients
    }

    #[must_use]
    pub fn prec(&self) -> u32 {
        self.prec
    }

    /// Degree of the polynomial; the zero polynomial reports 0.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.coefficients.len() <= 1
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The constant term (zero for the zero polynomial).
    #[must_use]
    pub fn constant_term(&self) -> Complex {
        self.coefficients
            .first()
            .cloned()
            .unwrap_or_else(|| Complex::new(self.prec))
    }

    pub fn set_prec(&mut self, prec: u32) {
        for coefficient in &mut self.coefficients {
            coefficient.set_prec(prec);
        }
        self.prec = prec;
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.combine(other, |a, b| Complex::with_val(self.prec, a + b))
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.combine(other, |a, b| Complex::with_val(self.prec, a - b))
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .map(|c| Complex::with_val(self.prec, -c))
            .collect();

        Self::from_coefficients(coefficients, self.prec)
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.prec);
        }

        let len = self.coefficients.len() + other.coefficients.len() - 1;
        let mut product: Vec<Complex> = (0..len).map(|_| Complex::new(self.prec)).collect();

        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                product[i + j] += Complex::with_val(self.prec, a * b);
            }
        }

        Self::from_coefficients(product, self.prec)
    }

    /// Divides every coefficient by a scalar. The caller guarantees the
    /// divisor is non-zero.
    #[must_use]
    pub fn div_scalar(&self, divisor: &Complex) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .map(|c| Complex::with_val(self.prec, c / divisor))
            .collect();

        Self::from_coefficients(coefficients, self.prec)
    }

    #[must_use]
    pub fn pow(&self, exponent: u32) -> Self {
        let mut result = Self::constant(Complex::with_val(self.prec, (1, 0)));
        for _ in 0..exponent {
            result = result.mul(self);
        }
        result
    }

    #[must_use]
    pub fn derivative(&self) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, c)| Complex::with_val(self.prec, c * &Float::with_val(self.prec, k as u32)))
            .collect();

        Self::from_coefficients(coefficients, self.prec)
    }

    /// Horner evaluation at `z`.
    #[must_use]
    pub fn evaluate(&self, z: &Complex) -> Complex {
        let mut acc = Complex::new(self.prec);
        for coefficient in self.coefficients.iter().rev() {
            acc *= z;
            acc += coefficient;
        }
        acc
    }

    /// Taylor coefficients `f^(i)(center) / i!` for `i` in `0..count`.
    ///
    /// Uses the ladder `g_0 = f`, `g_{i+1} = g_i' / (i + 1)`, so `g_i(center)`
    /// is the i-th coefficient without ever forming a factorial.
    #[must_use]
    pub fn taylor_coefficients(&self, center: &Complex, count: usize) -> Vec<Complex> {
        let mut ladder = self.clone();
        let mut result = Vec::with_capacity(count);

        for i in 0..count {
            result.push(ladder.evaluate(center));
            let divisor = Complex::with_val(self.prec, ((i + 1) as u32, 0));
            ladder = ladder.derivative().div_scalar(&divisor);
        }

        result
    }

    fn combine(&self, other: &Self, op: impl Fn(&Complex, &Complex) -> Complex) -> Self {
        let len = self.coefficients.len().max(other.coefficients.len());
        let zero = Complex::new(self.prec);

        let coefficients = (0..len)
            .map(|k| {
                let a = self.coefficients.get(k).unwrap_or(&zero);
                let b = other.coefficients.get(k).unwrap_or(&zero);
                op(a, b)
            })
            .collect();

        Self::from_coefficients(coefficients, self.prec)
    }

    fn trim(&mut self) {
        while self
            .coefficients
            .last()
            .is_some_and(|c| c.real().is_zero() && c.imag().is_zero())
        {
            self.coefficients.pop();
        }
    }
}
