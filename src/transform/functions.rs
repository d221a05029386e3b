//! Numeric evaluation of the Gating-ML 2.0 transform definitions.
//!
//! Logicle and hyperlog are defined as the inverse of a monotone increasing
//! function `B(y)` / `EH(y)` scaled so that `B(1) = T`; both are evaluated
//! here by bracketing and bisection on `y`.

use std::f64::consts::LN_10;

use super::{Transform, TransformError, TransformFunction, TransformKind};

const BISECTION_STEPS: usize = 200;
const BRACKET_EXPANSIONS: usize = 64;

/// Precomputed coefficients for the biexponential `B(y) = a e^{by} - c e^{-dy} - f`
#[derive(Debug, Clone, Copy)]
pub(super) struct LogicleCoefficients {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    f: f64,
}

impl LogicleCoefficients {
    fn new(t: f64, a: f64, m: f64, w: f64) -> Self {
        let w_scaled = w / (m + a);
        let x2 = a / (m + a);
        let x1 = x2 + w_scaled;
        let x0 = x2 + 2.0 * w_scaled;
        let b = (m + a) * LN_10;
        let d = solve_logicle_d(b, w_scaled);

        let ca = (x0 * (b + d)).exp();
        let fa = (b * x1).exp() - ca / (d * x1).exp();
        let big_a = t / ((b.exp() - fa) - ca / d.exp());

        Self {
            a: big_a,
            b,
            c: ca * big_a,
            d,
            f: fa * big_a,
        }
    }

    fn biexponential(&self, y: f64) -> f64 {
        self.a * (self.b * y).exp() - self.c * (-self.d * y).exp() - self.f
    }
}

/// Solve `2 (ln d - ln b) + w (b + d) = 0` for `d` in `(0, b]`
fn solve_logicle_d(b: f64, w: f64) -> f64 {
    if w == 0.0 {
        return b;
    }
    let g = |d: f64| 2.0 * (d.ln() - b.ln()) + w * (b + d);
    let mut lo = 0.0_f64;
    let mut hi = b;
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if g(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Precomputed coefficients for `EH(y) = a e^{by} + c y - f`
#[derive(Debug, Clone, Copy)]
pub(super) struct HyperlogCoefficients {
    a: f64,
    b: f64,
    c: f64,
    f: f64,
}

impl HyperlogCoefficients {
    fn new(t: f64, a: f64, m: f64, w: f64) -> Self {
        let w_scaled = w / (m + a);
        let x2 = a / (m + a);
        let x1 = x2 + w_scaled;
        let x0 = x2 + 2.0 * w_scaled;
        let b = (m + a) * LN_10;
        let e0 = (b * x0).exp();
        let ca = e0 / w_scaled;
        let fa = (b * x1).exp() + ca * x1;
        let big_a = t / (b.exp() + ca - fa);

        Self {
            a: big_a,
            b,
            c: ca * big_a,
            f: fa * big_a,
        }
    }

    fn linear_exponential(&self, y: f64) -> f64 {
        self.a * (self.b * y).exp() + self.c * y - self.f
    }
}

/// Find `y` with `g(y) = x` for a monotone increasing `g`
fn invert_monotone<G: Fn(f64) -> f64>(g: G, x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }

    let mut lo = -1.0_f64;
    let mut hi = 1.0_f64;
    for _ in 0..BRACKET_EXPANSIONS {
        if g(lo) <= x {
            break;
        }
        lo *= 2.0;
    }
    for _ in 0..BRACKET_EXPANSIONS {
        if g(hi) >= x {
            break;
        }
        hi *= 2.0;
    }

    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if g(mid) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Per-transform evaluator with precomputed coefficients, for repeated use
pub(super) enum Evaluator {
    Linear { t: f64, a: f64 },
    Logarithmic { t: f64, m: f64 },
    Asinh { t: f64, a: f64, m: f64 },
    Logicle(LogicleCoefficients),
    Hyperlog(HyperlogCoefficients),
}

impl Evaluator {
    pub(super) fn new(function: &TransformFunction) -> Option<Self> {
        Some(match *function {
            TransformFunction::ParameterizedLinear { t, a } => Evaluator::Linear { t, a },
            TransformFunction::ParameterizedLogarithmic { t, m } => Evaluator::Logarithmic { t, m },
            TransformFunction::ParameterizedInverseHyperbolicSine { t, a, m } => {
                Evaluator::Asinh { t, a, m }
            }
            TransformFunction::Logicle { t, a, m, w } => {
                Evaluator::Logicle(LogicleCoefficients::new(t, a, m, w))
            }
            TransformFunction::Hyperlog { t, a, m, w } => {
                Evaluator::Hyperlog(HyperlogCoefficients::new(t, a, m, w))
            }
            TransformFunction::Custom { .. } => return None,
        })
    }

    pub(super) fn eval(&self, x: f64) -> f64 {
        match *self {
            Evaluator::Linear { t, a } => (x + a) / (t + a),
            Evaluator::Logarithmic { t, m } => (x / t).log10() / m + 1.0,
            Evaluator::Asinh { t, a, m } => {
                ((x * (m * LN_10).sinh() / t).asinh() + a * LN_10) / ((m + a) * LN_10)
            }
            Evaluator::Logicle(ref k) => invert_monotone(|y| k.biexponential(y), x),
            Evaluator::Hyperlog(ref k) => invert_monotone(|y| k.linear_exponential(y), x),
        }
    }
}

pub(super) fn apply(function: &TransformFunction, x: f64) -> Option<f64> {
    Evaluator::new(function).map(|e| e.eval(x))
}

fn check(
    kind: TransformKind,
    argument: char,
    value: f64,
    ok: bool,
    reason: &'static str,
) -> Result<(), TransformError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(TransformError::InvalidArgument {
            kind,
            argument,
            value,
            reason,
        })
    }
}

fn check_biexponential_family(
    kind: TransformKind,
    t: f64,
    a: f64,
    m: f64,
    w: f64,
    w_must_be_positive: bool,
) -> Result<(), TransformError> {
    check(kind, 't', t, t > 0.0, "must be positive")?;
    check(kind, 'm', m, m > 0.0, "must be positive")?;
    if w_must_be_positive {
        check(kind, 'w', w, w > 0.0 && w <= m / 2.0, "must lie in (0, m/2]")?;
    } else {
        check(kind, 'w', w, w >= 0.0 && w <= m / 2.0, "must lie in [0, m/2]")?;
    }
    check(kind, 'a', a, a >= -w && a <= m - 2.0 * w, "must lie in [-w, m - 2w]")
}

pub(super) fn validate(transform: &Transform) -> Result<(), TransformError> {
    match transform.function {
        TransformFunction::ParameterizedLinear { t, a } => {
            let kind = TransformKind::ParameterizedLinear;
            check(kind, 't', t, t > 0.0, "must be positive")?;
            check(kind, 'a', a, a >= 0.0 && a <= t, "must lie in [0, t]")
        }
        TransformFunction::ParameterizedLogarithmic { t, m } => {
            let kind = TransformKind::ParameterizedLogarithmic;
            check(kind, 't', t, t > 0.0, "must be positive")?;
            check(kind, 'm', m, m > 0.0, "must be positive")
        }
        TransformFunction::ParameterizedInverseHyperbolicSine { t, a, m } => {
            let kind = TransformKind::ParameterizedInverseHyperbolicSine;
            check(kind, 't', t, t > 0.0, "must be positive")?;
            check(kind, 'm', m, m > 0.0, "must be positive")?;
            check(kind, 'a', a, a >= 0.0 && a <= m, "must lie in [0, m]")
        }
        TransformFunction::Logicle { t, a, m, w } => {
            check_biexponential_family(TransformKind::Logicle, t, a, m, w, false)
        }
        TransformFunction::Hyperlog { t, a, m, w } => {
            check_biexponential_family(TransformKind::Hyperlog, t, a, m, w, true)
        }
        TransformFunction::Custom { ref type_name } => {
            Err(TransformError::NotEvaluable(type_name.clone()))
        }
    }
}
