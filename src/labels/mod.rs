//! Heuristic orbital-character labels.
//!
//! Each natural orbital receives a short human-readable label derived from its coefficient
//! vector and the atomic-orbital layout: a bonding or antibonding two-atom label such as
//! `σ(O-H)` or `σ*(C-C)` when the weight is shared between atoms, a dominant-shell label such
//! as `O1 2p` otherwise, and a bare `MO {i}` fallback for degenerate columns. This is a
//! heuristic classifier, not a symmetry analysis; the grouping, sorting, and cutoff rules
//! below are fixed and reproduced exactly by the tests.

use counter::Counter;
use indexmap::IndexMap;
use itertools::Itertools;
use ndarray::{Array2, ArrayView1};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

use crate::auxiliary::atom::Atom;
use crate::basis::AoDescriptor;


/// Total squared-coefficient weight below which a column is considered degenerate and receives
/// the numeric fallback label.
const DEGENERATE_WEIGHT_THRESHOLD: f64 = 1e-10;

/// Weight fraction below which further shell contributions are ignored, once at least one has
/// been collected.
const SHELL_FRACTION_CUTOFF: f64 = 0.10;

/// The maximum number of shell contributions retained per orbital.
const MAX_SHELL_CONTRIBUTIONS: usize = 2;

/// Weight fraction an atom must carry for the orbital to count as delocalised over that atom.
const MAJOR_ATOM_FRACTION: f64 = 0.15;

/// One aggregated (atom, shell) contribution to an orbital.
#[derive(Clone, Debug, PartialEq)]
pub struct ShellContribution {
    /// The display label of the contributing atom.
    pub atom: String,

    /// The shell label, *e.g.* `2p`.
    pub shell: String,

    /// The fraction of the orbital's total weight carried by this (atom, shell) group.
    pub fraction: f64,

    /// The per-magnetic-quantum-number weight breakdown within the group, in basis order.
    pub m_weights: Vec<(String, f64)>,
}

/// The classified character of one orbital.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalCharacter {
    /// The display label of the orbital.
    pub label: String,

    /// The retained shell contributions, strongest first.
    pub contributions: Vec<ShellContribution>,
}

/// Assigns each atom a display label used in orbital labels.
///
/// An atom label carries its 1-based index iff its element's count strictly exceeds half the
/// atom count; otherwise the bare element symbol is used. An element count exactly equal to
/// half the atom count therefore stays bare. This disambiguation rule is a usability shortcut,
/// not a chemistry-principled one; bare labels may collide when an infrequent element still
/// occurs more than once.
pub fn atom_display_labels(atoms: &[Atom]) -> Vec<String> {
    let counts = atoms
        .iter()
        .map(|atom| atom.atomic_symbol.as_str())
        .collect::<Counter<_>>();
    atoms
        .iter()
        .enumerate()
        .map(|(index, atom)| {
            let count = counts[&atom.atomic_symbol.as_str()];
            if 2 * count > atoms.len() {
                format!("{}{}", atom.atomic_symbol, index + 1)
            } else {
                atom.atomic_symbol.clone()
            }
        })
        .collect()
}

struct ShellGroup {
    weight: f64,
    m_weights: Vec<(String, f64)>,
}

/// Classifies every orbital column of a coefficient matrix.
///
/// # Arguments
///
/// * `coefficients` - The (AO-count × MO-count) coefficient matrix.
/// * `descriptors` - One descriptor per coefficient-matrix row.
/// * `atoms` - The atoms of the molecule, indexed by the descriptors.
///
/// # Returns
///
/// One [`OrbitalCharacter`] per column, in column order.
pub fn classify_orbitals(
    coefficients: &Array2<f64>,
    descriptors: &[AoDescriptor],
    atoms: &[Atom],
) -> Vec<OrbitalCharacter> {
    let atom_labels = atom_display_labels(atoms);
    (0..coefficients.ncols())
        .map(|i| classify_column(coefficients.column(i), i, descriptors, &atom_labels))
        .collect()
}

/// Returns the display label of every orbital column, in column order.
pub fn label_orbitals(
    coefficients: &Array2<f64>,
    descriptors: &[AoDescriptor],
    atoms: &[Atom],
) -> Vec<String> {
    classify_orbitals(coefficients, descriptors, atoms)
        .into_iter()
        .map(|character| character.label)
        .collect()
}

fn classify_column(
    column: ArrayView1<f64>,
    orbital_index: usize,
    descriptors: &[AoDescriptor],
    atom_labels: &[String],
) -> OrbitalCharacter {
    let weights = column.iter().map(|&c| c * c).collect::<Vec<_>>();
    let total: f64 = weights.iter().sum();
    if total < DEGENERATE_WEIGHT_THRESHOLD {
        return OrbitalCharacter {
            label: format!("MO {}", orbital_index + 1),
            contributions: Vec::new(),
        };
    }

    // Aggregate by atom label and by (atom label, shell), keeping per-m breakdowns. Insertion
    // order (basis order) breaks weight ties deterministically under the stable sorts below.
    let mut atom_weights: IndexMap<&str, f64> = IndexMap::new();
    let mut shell_groups: IndexMap<(&str, &str), ShellGroup> = IndexMap::new();
    for (j, descriptor) in descriptors.iter().enumerate() {
        let atom_label = atom_labels[descriptor.atom_index].as_str();
        *atom_weights.entry(atom_label).or_insert(0.0) += weights[j];
        let group = shell_groups
            .entry((atom_label, descriptor.shell.as_str()))
            .or_insert_with(|| ShellGroup {
                weight: 0.0,
                m_weights: Vec::new(),
            });
        group.weight += weights[j];
        group
            .m_weights
            .push((descriptor.m_label.clone(), weights[j]));
    }

    let contributions = shell_groups
        .into_iter()
        .sorted_by_key(|(_, group)| Reverse(OrderedFloat(group.weight)))
        .scan(0usize, |collected, ((atom, shell), group)| {
            if *collected >= MAX_SHELL_CONTRIBUTIONS {
                return None;
            }
            let fraction = group.weight / total;
            if *collected >= 1 && fraction < SHELL_FRACTION_CUTOFF {
                return None;
            }
            *collected += 1;
            Some(ShellContribution {
                atom: atom.to_string(),
                shell: shell.to_string(),
                fraction,
                m_weights: group.m_weights,
            })
        })
        .collect::<Vec<_>>();

    let major_atoms = atom_weights
        .iter()
        .sorted_by_key(|(_, &weight)| Reverse(OrderedFloat(weight)))
        .filter(|(_, &weight)| weight > MAJOR_ATOM_FRACTION * total)
        .map(|(&atom_label, _)| atom_label)
        .collect::<Vec<_>>();

    let label = if major_atoms.len() >= 2 {
        // Delocalised orbital: classify as bonding or antibonding from the signs of the
        // dominant coefficient on each of the two strongest atoms.
        let first = major_atoms[0];
        let second = major_atoms[1];
        let sign_first = dominant_sign(column, descriptors, atom_labels, first);
        let sign_second = dominant_sign(column, descriptors, atom_labels, second);
        if sign_first * sign_second < 0.0 {
            format!("σ*({first}-{second})")
        } else {
            format!("σ({first}-{second})")
        }
    } else if let Some(contribution) = contributions.first() {
        format!("{} {}", contribution.atom, contribution.shell)
    } else {
        format!("MO {}", orbital_index + 1)
    };

    OrbitalCharacter {
        label,
        contributions,
    }
}

/// Returns the sign of the largest-magnitude coefficient among the basis functions whose atom
/// carries the given display label.
fn dominant_sign(
    column: ArrayView1<f64>,
    descriptors: &[AoDescriptor],
    atom_labels: &[String],
    atom_label: &str,
) -> f64 {
    descriptors
        .iter()
        .enumerate()
        .filter(|(_, descriptor)| atom_labels[descriptor.atom_index] == atom_label)
        .max_by_key(|&(j, _)| OrderedFloat(column[j].abs()))
        .map(|(j, _)| column[j].signum())
        .unwrap_or(0.0)
}
