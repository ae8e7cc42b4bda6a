//! A deterministic stand-in for the external quantum-chemistry solver.

use std::sync::Arc;

use anyhow::format_err;
use ndarray::{Array1, Array2};

use crate::basis::eval::{BasisEvaluator, GaussianBasis, ANGSTROM_TO_BOHR};
use crate::presets::MoleculePreset;
use crate::solver::{OrbitalSolver, SolveResult, SolverError};

/// A solver stand-in producing shape-correct, deterministic results over the minimal STO-3G
/// basis.
///
/// The natural-orbital coefficient matrix is the identity over the AO basis (the basis is
/// treated as orthonormal), occupations follow the aufbau filling of the neutral molecule, and
/// the reported energy is the nuclear-repulsion energy only. This honours every contract of
/// [`OrbitalSolver`] (determinism, matching coefficient/occupation shapes, occupations in
/// `[0, 2]`) without re-deriving any self-consistent-field machinery, and is meant to be
/// replaced by a real SCF/CASSCF engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimalBasisSolver;

impl MinimalBasisSolver {
    /// Constructs a new [`MinimalBasisSolver`].
    pub fn new() -> Self {
        MinimalBasisSolver
    }
}

impl OrbitalSolver for MinimalBasisSolver {
    fn solve(&self, preset: &MoleculePreset) -> Result<SolveResult, SolverError> {
        let molecule = preset.molecule.clone();
        let basis = GaussianBasis::sto3g(&molecule)
            .map_err(|err| SolverError::NotConverged(err.to_string()))?;
        let n_ao = basis.n_funcs();
        let coefficients = Array2::<f64>::eye(n_ao);

        let mut occupations = Array1::<f64>::zeros(n_ao);
        let mut remaining = f64::from(molecule.n_electrons());
        for occ in occupations.iter_mut() {
            if remaining <= 0.0 {
                break;
            }
            *occ = remaining.min(2.0);
            remaining -= *occ;
        }

        let energy = nuclear_repulsion(&molecule).map_err(SolverError::Other)?;

        SolveResult::builder()
            .molecule(molecule)
            .basis(Arc::new(basis) as Arc<dyn BasisEvaluator>)
            .basis_name(preset.basis_name.clone())
            .coefficients(coefficients)
            .occupations(occupations)
            .energy(energy)
            .build()
            .map_err(|err| SolverError::Other(format_err!(err)))
    }
}

/// Computes the nuclear-repulsion energy of a molecule in Hartree.
fn nuclear_repulsion(molecule: &crate::auxiliary::molecule::Molecule) -> Result<f64, anyhow::Error> {
    let atoms = &molecule.atoms;
    let mut energy = 0.0;
    for i in 0..atoms.len() {
        for j in (i + 1)..atoms.len() {
            let distance =
                (atoms[i].coordinates - atoms[j].coordinates).norm() * ANGSTROM_TO_BOHR;
            if distance <= f64::EPSILON {
                return Err(format_err!(
                    "Coincident nuclei at atom indices {i} and {j}."
                ));
            }
            energy += f64::from(atoms[i].atomic_number * atoms[j].atomic_number) / distance;
        }
    }
    Ok(energy)
}
