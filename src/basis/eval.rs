//! Evaluation of atomic-orbital basis functions at arbitrary Cartesian points.
//!
//! The grid-sampling pipeline only requires the ability to evaluate every basis function of a
//! molecule at a set of Cartesian points; this is captured by the [`BasisEvaluator`] trait.
//! [`GaussianBasis`] provides a concrete contracted-Gaussian implementation with STO-3G
//! parameters for the elements used by the built-in molecule presets.

use std::f64::consts::PI;

use anyhow::{self, format_err};
use nalgebra::Point3;
use ndarray::{Array2, ArrayView2};

use crate::auxiliary::molecule::Molecule;
use crate::basis::{AoDescriptor, BasisLayout, BasisShell};

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;

/// Conversion factor from Ångström to Bohr.
pub const ANGSTROM_TO_BOHR: f64 = 1.889_725_988_6;

/// A trait for evaluating all basis functions of a molecule at arbitrary Cartesian points.
///
/// This is the only orbital-evaluation primitive the grid sampler depends on; any external
/// quantum-chemistry backend can be plugged in by implementing this trait.
pub trait BasisEvaluator: Send + Sync {
    /// Returns the number of basis functions.
    fn n_funcs(&self) -> usize;

    /// Returns the atomic-orbital layout of the basis.
    fn layout(&self) -> &BasisLayout;

    /// Evaluates every basis function at every point.
    ///
    /// # Arguments
    ///
    /// * `points` - An `(n_points, 3)` array of Cartesian coordinates in Ångström.
    ///
    /// # Returns
    ///
    /// An `(n_points, n_funcs)` array of basis-function amplitudes, columns in the order fixed
    /// by [`BasisLayout::descriptors`].
    fn eval(&self, points: ArrayView2<f64>) -> Array2<f64>;

    /// Flattens the layout into one descriptor per basis function.
    fn descriptors(&self) -> Vec<AoDescriptor> {
        self.layout().descriptors()
    }
}

/// A primitive Gaussian with its contraction coefficient.
#[derive(Clone, Copy, Debug)]
pub struct GaussianPrimitive {
    /// The Gaussian exponent in Bohr⁻².
    pub exponent: f64,

    /// The contraction coefficient with respect to the normalised primitive.
    pub coefficient: f64,
}

/// A contracted shell of pure Gaussians centred on one atom.
#[derive(Clone, Debug)]
pub struct ContractedShell {
    /// The shell structure giving the principal quantum number and angular momentum.
    pub shell: BasisShell,

    /// The centre of the shell in Bohr.
    pub center: Point3<f64>,

    /// The primitives constituting the contraction.
    pub primitives: Vec<GaussianPrimitive>,
}

/// A contracted-Gaussian basis over a whole molecule.
#[derive(Clone, Debug)]
pub struct GaussianBasis {
    layout: BasisLayout,
    shells: Vec<ContractedShell>,
    n_funcs: usize,
}

// STO-3G s-type contraction coefficients shared by all first- and second-row 1s shells.
const STO3G_1S_COEFFS: [f64; 3] = [0.154_328_97, 0.535_328_14, 0.444_634_54];
const STO3G_2S_COEFFS: [f64; 3] = [-0.099_967_23, 0.399_512_83, 0.700_115_47];
const STO3G_2P_COEFFS: [f64; 3] = [0.155_916_27, 0.607_683_72, 0.391_957_39];

/// STO-3G exponents: 1s shell, then the shared 2s/2p exponents for second-row elements.
fn sto3g_exponents(element: &str) -> Option<(&'static [f64; 3], Option<&'static [f64; 3]>)> {
    match element {
        "H" => Some((&[3.425_250_91, 0.623_913_73, 0.168_855_40], None)),
        "C" => Some((
            &[71.616_837_0, 13.045_096_0, 3.530_512_2],
            Some(&[2.941_249_4, 0.683_483_1, 0.222_289_9]),
        )),
        "N" => Some((
            &[99.106_169_0, 18.052_312_0, 4.885_660_2],
            Some(&[3.780_455_9, 0.878_496_6, 0.285_714_4]),
        )),
        "O" => Some((
            &[130.709_320_0, 23.808_861_0, 6.443_608_3],
            Some(&[5.033_151_3, 1.169_596_1, 0.380_389_0]),
        )),
        _ => None,
    }
}

/// Normalisation constant of a primitive s-type Gaussian.
fn norm_s(alpha: f64) -> f64 {
    (2.0 * alpha / PI).powf(0.75)
}

/// Normalisation constant of a primitive p-type Gaussian.
fn norm_p(alpha: f64) -> f64 {
    (128.0 * alpha.powi(5) / PI.powi(3)).powf(0.25)
}

impl GaussianBasis {
    /// Constructs an STO-3G basis for a molecule.
    ///
    /// Only H, C, N, and O are parameterised; these cover the built-in molecule presets.
    ///
    /// # Errors
    ///
    /// Errors if the molecule contains an element without STO-3G parameters.
    pub fn sto3g(molecule: &Molecule) -> Result<Self, anyhow::Error> {
        let mut shells = Vec::new();
        let mut shells_per_atom = Vec::with_capacity(molecule.n_atoms());
        for atom in &molecule.atoms {
            let (exps_1s, exps_2sp) =
                sto3g_exponents(&atom.atomic_symbol).ok_or_else(|| {
                    format_err!(
                        "No STO-3G parameters for element `{}`.",
                        atom.atomic_symbol
                    )
                })?;
            let center = atom.coordinates * ANGSTROM_TO_BOHR;
            let mut atom_shells = vec![BasisShell::new(1, 0)];
            shells.push(ContractedShell {
                shell: BasisShell::new(1, 0),
                center,
                primitives: contraction(exps_1s, &STO3G_1S_COEFFS),
            });
            if let Some(exps) = exps_2sp {
                atom_shells.push(BasisShell::new(2, 0));
                atom_shells.push(BasisShell::new(2, 1));
                shells.push(ContractedShell {
                    shell: BasisShell::new(2, 0),
                    center,
                    primitives: contraction(exps, &STO3G_2S_COEFFS),
                });
                shells.push(ContractedShell {
                    shell: BasisShell::new(2, 1),
                    center,
                    primitives: contraction(exps, &STO3G_2P_COEFFS),
                });
            }
            shells_per_atom.push(atom_shells);
        }
        let layout = BasisLayout::new(&molecule.atoms, shells_per_atom);
        let n_funcs = layout.n_funcs();
        Ok(GaussianBasis {
            layout,
            shells,
            n_funcs,
        })
    }
}

fn contraction(exponents: &[f64; 3], coefficients: &[f64; 3]) -> Vec<GaussianPrimitive> {
    exponents
        .iter()
        .zip(coefficients)
        .map(|(&exponent, &coefficient)| GaussianPrimitive {
            exponent,
            coefficient,
        })
        .collect()
}

impl BasisEvaluator for GaussianBasis {
    fn n_funcs(&self) -> usize {
        self.n_funcs
    }

    fn layout(&self) -> &BasisLayout {
        &self.layout
    }

    fn eval(&self, points: ArrayView2<f64>) -> Array2<f64> {
        let n_points = points.nrows();
        let mut values = Array2::<f64>::zeros((n_points, self.n_funcs));
        for (ipt, point) in points.rows().into_iter().enumerate() {
            let pt = Point3::new(point[0], point[1], point[2]) * ANGSTROM_TO_BOHR;
            let mut col = 0;
            for cshell in &self.shells {
                let d = pt - cshell.center;
                let r2 = d.norm_squared();
                match cshell.shell.l {
                    0 => {
                        let radial: f64 = cshell
                            .primitives
                            .iter()
                            .map(|p| p.coefficient * norm_s(p.exponent) * (-p.exponent * r2).exp())
                            .sum();
                        values[[ipt, col]] = radial;
                        col += 1;
                    }
                    1 => {
                        let radial: f64 = cshell
                            .primitives
                            .iter()
                            .map(|p| p.coefficient * norm_p(p.exponent) * (-p.exponent * r2).exp())
                            .sum();
                        // Increasing-m order: py, pz, px.
                        values[[ipt, col]] = d[1] * radial;
                        values[[ipt, col + 1]] = d[2] * radial;
                        values[[ipt, col + 2]] = d[0] * radial;
                        col += 3;
                    }
                    l => unreachable!("Unsupported angular momentum l = {l} in a Gaussian basis."),
                }
            }
        }
        values
    }
}
