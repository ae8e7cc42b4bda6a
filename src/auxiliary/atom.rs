//! Atoms and element data.

use std::collections::HashMap;
use std::fmt;

use anyhow::format_err;
use nalgebra::Point3;
use periodic_table;
use serde::{Deserialize, Serialize};

/// A struct storing a look-up of element symbols to give atomic numbers.
pub struct ElementMap<'a> {
    /// A [`HashMap`] from an element symbol to its atomic number.
    map: HashMap<&'a str, u32>,
}

impl Default for ElementMap<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementMap<'static> {
    /// Creates a new [`ElementMap`] for all elements in the periodic table.
    #[must_use]
    pub fn new() -> ElementMap<'static> {
        let mut map = HashMap::new();
        let elements = periodic_table::periodic_table();
        for element in elements {
            map.insert(element.symbol, element.atomic_number);
        }
        ElementMap { map }
    }
}

impl<'a> ElementMap<'a> {
    /// Returns the atomic number of an element, or `None` if the symbol is not recognised.
    pub fn atomic_number(&self, symbol: &str) -> Option<u32> {
        self.map.get(symbol).copied()
    }
}

/// A struct representing an atom in a molecular geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Atom {
    /// The atomic symbol of the atom.
    pub atomic_symbol: String,

    /// The atomic number of the atom.
    pub atomic_number: u32,

    /// The position of the atom in Ångström.
    pub coordinates: Point3<f64>,
}

impl Atom {
    /// Constructs an [`Atom`] from an element symbol and Cartesian coordinates in Ångström.
    ///
    /// # Arguments
    ///
    /// * `symbol` - An element symbol as found in the periodic table.
    /// * `coordinates` - The position of the atom in Ångström.
    /// * `emap` - A hash map between element symbols and atomic numbers.
    ///
    /// # Errors
    ///
    /// Errors if `symbol` does not name a known element.
    pub fn new(
        symbol: &str,
        coordinates: Point3<f64>,
        emap: &ElementMap,
    ) -> Result<Atom, anyhow::Error> {
        let atomic_number = emap
            .atomic_number(symbol)
            .ok_or_else(|| format_err!("Unknown element symbol `{symbol}`."))?;
        Ok(Atom {
            atomic_symbol: symbol.to_string(),
            atomic_number,
            coordinates,
        })
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:+.7} {:+.7} {:+.7}",
            self.atomic_symbol, self.coordinates[0], self.coordinates[1], self.coordinates[2]
        )
    }
}
