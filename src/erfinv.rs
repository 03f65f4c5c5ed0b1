use anyhow::{Result, bail};

const BISECTION_ITERATIONS: u32 = 100;

/// Inverse error function: returns `y` with `erf(y) = x` for `x` in (-1, 1).
///
/// Solved by bisection over `[0, 4x]` (the root always lies inside that
/// bracket for `|x| < 1`). The ranking formula keeps its argument strictly
/// inside the domain for any valid rank, so an out-of-range input here is a
/// data-integrity failure rather than a recoverable condition.
pub fn erfinv(x: f64) -> Result<f64> {
    if x <= -1.0 || x >= 1.0 {
        bail!("erfinv domain error: {x} is outside (-1, 1)");
    }
    if x == 0.0 {
        return Ok(0.0);
    }

    let mut lo = 0.0;
    let mut hi = 4.0 * x;
    if x < 0.0 {
        std::mem::swap(&mut lo, &mut hi);
    }
    let mut mid = (lo + hi) / 2.0;
    for _ in 0..BISECTION_ITERATIONS {
        mid = (lo + hi) / 2.0;
        if libm::erf(mid) > x {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(mid)
}
