//! Molecular geometries.

use std::fmt;

use anyhow::{ensure, format_err};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::auxiliary::atom::{Atom, ElementMap};

#[cfg(test)]
#[path = "molecule_tests.rs"]
mod molecule_tests;

/// A struct containing the atoms constituting a molecule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Molecule {
    /// The atoms constituting this molecule, in a fixed order.
    pub atoms: Vec<Atom>,
}

impl Molecule {
    /// Constructs a molecule from a sequence of atoms.
    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Molecule { atoms }
    }

    /// Constructs a molecule from `(symbol, coordinates)` records with coordinates in Ångström.
    ///
    /// # Errors
    ///
    /// Errors if any element symbol is not recognised.
    pub fn from_geometry(geometry: &[(&str, [f64; 3])]) -> Result<Self, anyhow::Error> {
        let emap = ElementMap::new();
        let atoms = geometry
            .iter()
            .map(|(symbol, coords)| {
                Atom::new(symbol, Point3::new(coords[0], coords[1], coords[2]), &emap)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Molecule { atoms })
    }

    /// Returns the number of atoms in this molecule.
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Returns the total number of electrons of the neutral molecule.
    pub fn n_electrons(&self) -> u32 {
        self.atoms.iter().map(|atom| atom.atomic_number).sum()
    }

    /// Computes the axis-aligned bounding box of the atomic positions, in Ångström.
    ///
    /// # Returns
    ///
    /// The elementwise minimum and maximum corners of the bounding box.
    ///
    /// # Errors
    ///
    /// Errors if the molecule contains no atoms.
    pub fn bounding_box(&self) -> Result<(Point3<f64>, Point3<f64>), anyhow::Error> {
        ensure!(
            !self.atoms.is_empty(),
            format_err!("The bounding box of an empty molecule is undefined.")
        );
        let mut min = self.atoms[0].coordinates;
        let mut max = self.atoms[0].coordinates;
        for atom in &self.atoms[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(atom.coordinates[axis]);
                max[axis] = max[axis].max(atom.coordinates[axis]);
            }
        }
        Ok((min, max))
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for atom in &self.atoms {
            writeln!(f, "{atom}")?;
        }
        Ok(())
    }
}
