//! Atomic-orbital basis metadata.
//!
//! Every atomic-orbital basis function is described by the atom it is centred on, a shell label
//! such as `2p` combining the principal quantum number and the angular-momentum letter, and a
//! magnetic-quantum-number label such as `2py`. The flattened per-function sequence of
//! [`AoDescriptor`]s fixes the row order of coefficient matrices throughout the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auxiliary::atom::Atom;

pub mod eval;

#[cfg(test)]
#[path = "basis_tests.rs"]
mod basis_tests;

/// Alphabetical labels of angular momenta.
pub static ANGMOM_LABELS: [&str; 5] = ["s", "p", "d", "f", "g"];

/// A shell of pure (spherical-harmonic) basis functions on one atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasisShell {
    /// The principal quantum number of the shell.
    pub n: u32,

    /// The angular momentum of the shell.
    pub l: u32,
}

impl BasisShell {
    /// Constructs a new [`BasisShell`].
    pub fn new(n: u32, l: u32) -> Self {
        BasisShell { n, l }
    }

    /// Returns the shell label, *e.g.* `2p`.
    pub fn label(&self) -> String {
        format!("{}{}", self.n, ANGMOM_LABELS[self.l as usize])
    }

    /// Returns the number of pure basis functions in this shell.
    pub fn n_funcs(&self) -> usize {
        (2 * self.l + 1) as usize
    }

    /// Returns the magnetic-quantum-number labels of the functions in this shell, in
    /// increasing-$`m_l`$ order.
    pub fn m_labels(&self) -> Vec<String> {
        match self.l {
            0 => vec![format!("{}s", self.n)],
            1 => ["py", "pz", "px"]
                .iter()
                .map(|m| format!("{}{m}", self.n))
                .collect(),
            _ => {
                let l_i32 = i32::try_from(self.l).expect("`l` cannot be converted to `i32`.");
                (-l_i32..=l_i32)
                    .map(|m| format!("{}{}[{m:+}]", self.n, ANGMOM_LABELS[self.l as usize]))
                    .collect()
            }
        }
    }
}

impl fmt::Display for BasisShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The ordered shells centred on one atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasisAtom {
    /// The index of the owning atom in the parent molecule.
    pub atom_index: usize,

    /// The element symbol of the owning atom.
    pub element: String,

    /// The shells centred on the owning atom, in flattening order.
    pub shells: Vec<BasisShell>,
}

/// The full atomic-orbital layout of a basis set: which function sits on which atom, and with
/// which shell and magnetic labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasisLayout {
    /// The per-atom shell structures, in atom order.
    pub basis_atoms: Vec<BasisAtom>,
}

/// The descriptor of a single atomic-orbital basis function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AoDescriptor {
    /// The index of the owning atom in the parent molecule.
    pub atom_index: usize,

    /// The element symbol of the owning atom.
    pub element: String,

    /// The shell label, *e.g.* `2p`.
    pub shell: String,

    /// The magnetic-quantum-number label, *e.g.* `2py`.
    pub m_label: String,
}

impl BasisLayout {
    /// Constructs a layout placing the given shells on each atom of a molecule, in atom order.
    pub fn new(atoms: &[Atom], shells_per_atom: Vec<Vec<BasisShell>>) -> Self {
        let basis_atoms = atoms
            .iter()
            .zip(shells_per_atom)
            .enumerate()
            .map(|(atom_index, (atom, shells))| BasisAtom {
                atom_index,
                element: atom.atomic_symbol.clone(),
                shells,
            })
            .collect();
        BasisLayout { basis_atoms }
    }

    /// Returns the total number of basis functions in this layout.
    pub fn n_funcs(&self) -> usize {
        self.basis_atoms
            .iter()
            .map(|batm| batm.shells.iter().map(BasisShell::n_funcs).sum::<usize>())
            .sum()
    }

    /// Flattens the layout into one [`AoDescriptor`] per basis function, in the row order of
    /// coefficient matrices: atoms in molecule order, shells in layout order, functions in
    /// increasing-$`m_l`$ order within each shell.
    pub fn descriptors(&self) -> Vec<AoDescriptor> {
        self.basis_atoms
            .iter()
            .flat_map(|batm| {
                batm.shells.iter().flat_map(|shell| {
                    shell.m_labels().into_iter().map(|m_label| AoDescriptor {
                        atom_index: batm.atom_index,
                        element: batm.element.clone(),
                        shell: shell.label(),
                        m_label,
                    })
                })
            })
            .collect()
    }
}
