//! Built-in molecule presets.
//!
//! Each preset fixes a molecular geometry, a basis-set name, and an active space for the
//! multi-configurational solve. Presets are immutable and registered once at process start.

use indexmap::IndexMap;
use lazy_static::lazy_static;

use crate::auxiliary::molecule::Molecule;


/// A static description of one solvable molecule.
#[derive(Clone, Debug)]
pub struct MoleculePreset {
    /// The identifier used as a cache and request key.
    pub id: String,

    /// The human-readable display name.
    pub name: String,

    /// The molecular geometry in Ångström.
    pub molecule: Molecule,

    /// The name of the basis set used by the solver.
    pub basis_name: String,

    /// The number of orbitals in the active space of the multi-configurational solve.
    pub active_orbitals: usize,

    /// The number of electrons in the active space of the multi-configurational solve.
    pub active_electrons: usize,
}

/// The registry of all molecule presets, keyed by identifier and iterated in registration order.
#[derive(Debug, Default)]
pub struct PresetRegistry {
    presets: IndexMap<String, MoleculePreset>,
}

impl PresetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a preset under its identifier. An existing preset with the same identifier is
    /// replaced.
    pub fn register(&mut self, preset: MoleculePreset) {
        self.presets.insert(preset.id.clone(), preset);
    }

    /// Looks up a preset by identifier.
    pub fn get(&self, id: &str) -> Option<&MoleculePreset> {
        self.presets.get(id)
    }

    /// Returns `true` if the identifier names a registered preset.
    pub fn contains(&self, id: &str) -> bool {
        self.presets.contains_key(id)
    }

    /// Iterates over the presets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MoleculePreset> {
        self.presets.values()
    }

    /// Returns the number of registered presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Returns `true` if no presets are registered.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Constructs the standard registry shipped with the server.
    pub fn standard() -> Self {
        let mut registry = PresetRegistry::new();
        registry.register(MoleculePreset {
            id: "water".to_string(),
            name: "Water".to_string(),
            molecule: Molecule::from_geometry(&[
                ("O", [0.0, 0.0, 0.0]),
                ("H", [0.0, -0.757, 0.587]),
                ("H", [0.0, 0.757, 0.587]),
            ])
            .expect("The water geometry could not be constructed."),
            basis_name: "sto-3g".to_string(),
            active_orbitals: 4,
            active_electrons: 4,
        });
        registry.register(MoleculePreset {
            id: "ammonia".to_string(),
            name: "Ammonia".to_string(),
            molecule: Molecule::from_geometry(&[
                ("N", [0.0, 0.0, 0.0]),
                ("H", [0.0, -0.9377, -0.3816]),
                ("H", [0.8121, 0.4689, -0.3816]),
                ("H", [-0.8121, 0.4689, -0.3816]),
            ])
            .expect("The ammonia geometry could not be constructed."),
            basis_name: "sto-3g".to_string(),
            active_orbitals: 6,
            active_electrons: 6,
        });
        registry.register(MoleculePreset {
            id: "dihydrogen".to_string(),
            name: "Dihydrogen".to_string(),
            molecule: Molecule::from_geometry(&[
                ("H", [0.0, 0.0, 0.0]),
                ("H", [0.0, 0.0, 0.74]),
            ])
            .expect("The dihydrogen geometry could not be constructed."),
            basis_name: "sto-3g".to_string(),
            active_orbitals: 2,
            active_electrons: 2,
        });
        registry
    }
}

lazy_static! {
    /// The process-wide standard preset registry.
    pub static ref STANDARD_PRESETS: PresetRegistry = PresetRegistry::standard();
}
