//! Regular 3D sampling grids for orbital amplitudes.
//!
//! A grid is placed over the margin-padded bounding box of a molecule and every natural-orbital
//! amplitude is evaluated at each grid point by contracting the atomic-orbital values with the
//! orbital's coefficient vector. Only raw scalar-field samples are produced here; no
//! normalisation, smoothing, or isosurfacing.

use anyhow::{self, ensure, format_err};
use ndarray::{Array2, Array3, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::auxiliary::molecule::Molecule;
use crate::basis::eval::BasisEvaluator;


/// The default margin in Ångström added around the molecular bounding box.
///
/// This is the single supported default; earlier revisions of the protocol used 3.0 Å. Callers
/// that want a different padding must pass it explicitly.
pub const DEFAULT_MARGIN: f64 = 5.0;

/// The Cartesian bounds of a sampling grid in Ångström.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    /// The minimum corner, per axis.
    pub min: [f64; 3],

    /// The maximum corner, per axis.
    pub max: [f64; 3],
}

impl GridBounds {
    /// Computes the bounds of the margin-padded bounding box of a molecule: the elementwise
    /// minimum of the atomic positions minus `margin`, and the elementwise maximum plus
    /// `margin`, per axis independently.
    ///
    /// # Errors
    ///
    /// Errors if the molecule contains no atoms.
    pub fn around(molecule: &Molecule, margin: f64) -> Result<Self, anyhow::Error> {
        let (min, max) = molecule.bounding_box()?;
        Ok(GridBounds {
            min: [min[0] - margin, min[1] - margin, min[2] - margin],
            max: [max[0] + margin, max[1] + margin, max[2] + margin],
        })
    }
}

/// The geometry of a cubic sampling grid: the number of points per axis and the bounds they
/// span.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// The number of grid points along each axis.
    pub size: usize,

    /// The Cartesian bounds spanned by the grid.
    pub bounds: GridBounds,
}

impl GridSpec {
    /// Constructs the grid of a given size over the margin-padded bounding box of a molecule.
    ///
    /// # Errors
    ///
    /// Errors if `size` is zero or the molecule contains no atoms.
    pub fn around(molecule: &Molecule, size: usize, margin: f64) -> Result<Self, anyhow::Error> {
        ensure!(size >= 1, format_err!("The grid size must be positive."));
        Ok(GridSpec {
            size,
            bounds: GridBounds::around(molecule, margin)?,
        })
    }

    /// Returns the total number of grid points.
    pub fn n_points(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Returns the evenly spaced sample positions along one axis, inclusive of both endpoints.
    ///
    /// A single-point axis samples at the minimum bound.
    pub fn axis_points(&self, axis: usize) -> Vec<f64> {
        let min = self.bounds.min[axis];
        let max = self.bounds.max[axis];
        if self.size == 1 {
            return vec![min];
        }
        let step = (max - min) / ((self.size - 1) as f64);
        (0..self.size).map(|i| min + step * (i as f64)).collect()
    }
}

/// Samples one orbital on a grid.
///
/// Sample locations are the Cartesian product of the three axis point-sets, enumerated with the
/// x axis varying slowest and the z axis fastest; the output array uses the same `(x, y, z)`
/// order. Amplitudes are computed in 64-bit precision and cast to `f32` for output; the cast is
/// one-way lossy.
///
/// # Arguments
///
/// * `spec` - The grid geometry.
/// * `basis` - The evaluator for the atomic-orbital basis.
/// * `coefficients` - The orbital's coefficient vector over that basis.
///
/// # Errors
///
/// Errors if the coefficient vector's length does not match the basis size.
pub fn sample_orbital(
    spec: &GridSpec,
    basis: &dyn BasisEvaluator,
    coefficients: ArrayView1<f64>,
) -> Result<Array3<f32>, anyhow::Error> {
    ensure!(
        coefficients.len() == basis.n_funcs(),
        format_err!(
            "Mismatched coefficient count ({}) and basis-function count ({}).",
            coefficients.len(),
            basis.n_funcs()
        )
    );
    let n = spec.size;
    let xs = spec.axis_points(0);
    let ys = spec.axis_points(1);
    let zs = spec.axis_points(2);

    // One x slab per task keeps the enumeration order while bounding the size of each AO block.
    let slabs = (0..n)
        .into_par_iter()
        .map(|ix| {
            let mut points = Array2::<f64>::zeros((n * n, 3));
            for (row, (iy, iz)) in (0..n).flat_map(|iy| (0..n).map(move |iz| (iy, iz))).enumerate()
            {
                points[[row, 0]] = xs[ix];
                points[[row, 1]] = ys[iy];
                points[[row, 2]] = zs[iz];
            }
            basis.eval(points.view()).dot(&coefficients)
        })
        .collect::<Vec<_>>();

    let mut data = Vec::with_capacity(spec.n_points());
    for slab in slabs {
        data.extend(slab.iter().map(|&v| v as f32));
    }
    Array3::from_shape_vec((n, n, n), data).map_err(|err| format_err!(err))
}
