//! Root finding for curve bootstrapping.

/// Errors from the numerical layer.
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    InvalidInput(&'static str),
    /// `f(a)` and `f(b)` have the same sign.
    NoBracket { a: f64, b: f64, fa: f64, fb: f64 },
    NonConvergence,
}

impl std::fmt::Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::NoBracket { a, b, fa, fb } => {
                write!(f, "root not bracketed: f({a}) = {fa}, f({b}) = {fb}")
            }
            Self::NonConvergence => write!(f, "root finder did not converge"),
        }
    }
}

impl std::error::Error for MathError {}

/// Finds a root of `f` in `[a, b]` with Brent's method.
///
/// Combines bisection with the secant method and inverse quadratic
/// interpolation: guaranteed convergence from a valid bracket, superlinear
/// near the root. Returns when `|f| <= tol` or the bracket width shrinks
/// below `tol`.
pub fn brent<F>(mut f: F, a: f64, b: f64, tol: f64, max_iter: usize) -> Result<f64, MathError>
where
    F: FnMut(f64) -> f64,
{
    if tol <= 0.0 {
        return Err(MathError::InvalidInput("tol must be positive"));
    }
    if max_iter == 0 {
        return Err(MathError::InvalidInput("max_iter must be > 0"));
    }

    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(MathError::NoBracket { a, b, fa, fb });
    }

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iter {
        if fb.abs() <= tol || (b - a).abs() <= tol {
            return Ok(b);
        }

        // Interpolation step, falling back to bisection when the candidate
        // is outside the half-bracket or shrinks too slowly.
        let mut use_bisection = true;
        let mut s = 0.0;

        if (fa - fc).abs() > 1.0e-15 && (fb - fc).abs() > 1.0e-15 {
            let r = fb / fc;
            let p = fa / fc;
            let q = fa / fb;
            s = b
                - (q * (q - r) * (b - a) + (1.0 - r) * (b - c) * p)
                    / ((q - 1.0) * (r - 1.0) * (p - 1.0));

            let m = 0.5 * (a + b);
            if s > m.min(b) && s < m.max(b) && (s - b).abs() < 0.5 * e.abs() {
                use_bisection = false;
            }
        } else if (fb - fa).abs() > 1.0e-15 {
            s = b - fb * (b - a) / (fb - fa);

            let m = 0.5 * (a + b);
            if s > m.min(b) && s < m.max(b) && (s - b).abs() < 0.5 * e.abs() {
                use_bisection = false;
            }
        }

        if use_bisection {
            s = 0.5 * (a + b);
            e = b - a;
            d = e;
        } else {
            e = d;
            d = s - b;
        }

        c = b;
        fc = fb;

        let fs = f(s);
        if fa.signum() != fs.signum() {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    Err(MathError::NonConvergence)
}
