//! Vector norms used by the nonlinear convergence tests.

use crate::core::traits::{InnerProduct, Real};
use crate::error::KError;

/// Kind of vector norm.
///
/// - `One`: ‖x‖ = Σ |xᵢ|
/// - `Two`: ‖x‖ = sqrt(Σ xᵢ²)
/// - `Max`: ‖x‖ = maxᵢ |xᵢ|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormType {
    One,
    #[default]
    Two,
    Max,
}

/// Whether a residual norm is scaled by the problem size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleType {
    #[default]
    Unscaled,
    /// One-norm divided by n, two-norm divided by sqrt(n); max-norm unchanged.
    Scaled,
}

pub fn norm<T: Real>(v: &[T], kind: NormType) -> T {
    match kind {
        NormType::One => v.iter().map(|x| x.abs()).sum(),
        NormType::Two => {
            let ip = ();
            ip.norm(&v.to_vec())
        }
        NormType::Max => v.iter().fold(T::zero(), |m, x| m.max(x.abs())),
    }
}

pub fn scaled_norm<T: Real>(v: &[T], kind: NormType, scale: ScaleType) -> T {
    let raw = norm(v, kind);
    let n = T::from_usize(v.len()).unwrap_or_else(T::one);
    match (scale, kind) {
        (ScaleType::Unscaled, _) | (_, NormType::Max) => raw,
        _ if v.is_empty() => raw,
        (ScaleType::Scaled, NormType::One) => raw / n,
        (ScaleType::Scaled, NormType::Two) => raw / n.sqrt(),
    }
}

/// Weighted root-mean-square norm of a step.
///
/// wᵢ = 1 / (atol + rtol·|xᵢ|), value = sqrt(mean((δxᵢ·wᵢ)²)).
pub fn wrms_norm<T: Real>(delta: &[T], x: &[T], rtol: T, atol: T) -> Result<T, KError> {
    if delta.len() != x.len() {
        return Err(KError::Configuration(format!(
            "step has {} entries, reference vector has {}",
            delta.len(),
            x.len()
        )));
    }
    if delta.is_empty() {
        return Ok(T::zero());
    }
    let sum: T = delta
        .iter()
        .zip(x)
        .map(|(&d, &xi)| {
            let scaled = d / (atol + rtol * xi.abs());
            scaled * scaled
        })
        .sum();
    let n = T::from_usize(delta.len()).unwrap_or_else(T::one);
    Ok((sum / n).sqrt())
}
