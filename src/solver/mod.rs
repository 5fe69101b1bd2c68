//! Krylov & direct solver interfaces.

use crate::core::traits::MatVec;
use crate::error::KError;
use crate::preconditioner::Preconditioner;
use crate::utils::convergence::SolveStats;
use num_traits::Float;

/// Common interface for any direct or iterative solver.
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Solve A·x = b, writing result into `x` (which holds the initial guess on entry).
    /// Returns iteration stats (including convergence info).
    fn solve(
        &mut self,
        a: &M,
        pc: Option<&dyn Preconditioner<M, V>>,
        b: &V,
        x: &mut V,
    ) -> Result<SolveStats<Self::Scalar>, Self::Error>;
}

/// r = b - A x
pub(crate) fn residual<M, V, T>(a: &M, b: &V, x: &[T]) -> V
where
    M: MatVec<V>,
    V: AsRef<[T]> + From<Vec<T>>,
    T: Float,
{
    let n = b.as_ref().len();
    let mut ax = V::from(vec![T::zero(); n]);
    a.matvec(&V::from(x.to_vec()), &mut ax);
    V::from(b.as_ref().iter().zip(ax.as_ref()).map(|(&bi, &axi)| bi - axi).collect())
}

/// z = M⁻¹ r, or z = r without a preconditioner.
pub(crate) fn precondition<M, V: Clone>(
    pc: Option<&dyn Preconditioner<M, V>>,
    r: &V,
    z: &mut V,
) -> Result<(), KError> {
    match pc {
        Some(pc) => pc.apply(r, z),
        None => {
            z.clone_from(r);
            Ok(())
        }
    }
}

pub mod direct_lu;
pub use direct_lu::LuSolver;

pub mod cg;
pub use cg::CgSolver;

pub mod gmres;
pub use gmres::GmresSolver;

pub mod bicgstab;
pub use bicgstab::BiCgStabSolver;

pub mod cgs;
pub use cgs::CgsSolver;

pub mod tfqmr;
pub use tfqmr::TfqmrSolver;
