//! Interface to the external quantum-chemistry solver.
//!
//! The solve itself, a ground-state self-consistent-field calculation followed by an
//! active-space multi-configurational solve and a natural-orbital transformation of the
//! resulting density, is an external collaborator behind the [`OrbitalSolver`] trait. This
//! crate only consumes its output: a natural-orbital coefficient matrix, the matching
//! occupation numbers, and a total energy. [`minimal::MinimalBasisSolver`] is a deterministic
//! stand-in honouring the contract so that the server and the tests run end to end.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use derive_builder::Builder;
use ndarray::{Array1, Array2};
use thiserror::Error;

use crate::auxiliary::molecule::Molecule;
use crate::basis::eval::BasisEvaluator;
use crate::presets::MoleculePreset;

pub mod minimal;


/// Errors raised by the external solver collaborator.
///
/// A failed solve is fatal for the request that triggered it and is never retried
/// automatically: re-running an unconverged solve with identical inputs cannot change the
/// outcome.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The solver did not converge for the given molecule.
    #[error("solver did not converge: {0}")]
    NotConverged(String),

    /// The solve exceeded the configured wall-clock budget.
    #[error("solver timed out after {:.1} s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Any other solver-side failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The converged output of one solve, immutable once constructed.
///
/// Column $`i`$ of [`Self::coefficients`] is the coefficient vector of natural orbital $`i`$ in
/// the atomic-orbital basis; the columns are orthonormal in the AO metric. Orbital indices are
/// valid exactly in `[0, n_orbitals)`.
#[derive(Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SolveResult {
    /// The molecular geometry the solve was carried out for.
    pub molecule: Molecule,

    /// The evaluator for the atomic-orbital basis underlying the coefficient matrix.
    pub basis: Arc<dyn BasisEvaluator>,

    /// The name of the basis set.
    pub basis_name: String,

    /// The (AO-count × MO-count) natural-orbital coefficient matrix.
    pub coefficients: Array2<f64>,

    /// The natural-orbital occupation numbers, each in `[0, 2]`.
    pub occupations: Array1<f64>,

    /// The total energy in Hartree.
    pub energy: f64,
}

impl SolveResultBuilder {
    fn validate(&self) -> Result<(), String> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or("`coefficients` has not been set.")?;
        let occupations = self
            .occupations
            .as_ref()
            .ok_or("`occupations` has not been set.")?;
        let basis = self.basis.as_ref().ok_or("`basis` has not been set.")?;
        if coefficients.ncols() != occupations.len() {
            return Err(format!(
                "Mismatched column count ({}) and occupation count ({}).",
                coefficients.ncols(),
                occupations.len()
            ));
        }
        if coefficients.nrows() != basis.n_funcs() {
            return Err(format!(
                "Mismatched row count ({}) and basis-function count ({}).",
                coefficients.nrows(),
                basis.n_funcs()
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for SolveResult {
    // The basis evaluator is a trait object without `Debug`; its size stands in for it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveResult")
            .field("molecule", &self.molecule)
            .field("basis_name", &self.basis_name)
            .field("n_basis_funcs", &self.basis.n_funcs())
            .field("coefficients", &self.coefficients)
            .field("occupations", &self.occupations)
            .field("energy", &self.energy)
            .finish()
    }
}

impl SolveResult {
    /// Returns a builder to construct a new [`SolveResult`].
    pub fn builder() -> SolveResultBuilder {
        SolveResultBuilder::default()
    }

    /// Returns the number of natural orbitals.
    pub fn n_orbitals(&self) -> usize {
        self.coefficients.ncols()
    }
}

/// A trait abstracting the external quantum-chemistry solve.
///
/// Implementations must be deterministic for a given preset: the result cache relies on a
/// repeated solve producing an identical outcome.
pub trait OrbitalSolver: Send + Sync {
    /// Carries out the full solve pipeline for one preset.
    fn solve(&self, preset: &MoleculePreset) -> Result<SolveResult, SolverError>;
}
