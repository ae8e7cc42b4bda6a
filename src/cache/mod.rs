//! The per-molecule result cache.
//!
//! [`SolveCache`] guarantees that the expensive quantum-chemistry solve runs at most once per
//! registered molecule identifier for the lifetime of the process. The cache map is
//! append-only: entries are never evicted or invalidated, and a reader only ever observes a
//! fully populated [`SolveResult`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::presets::PresetRegistry;
use crate::solver::{OrbitalSolver, SolveResult, SolverError};

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;

/// Errors raised when fetching a solve result from the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The identifier does not name a registered molecule preset.
    #[error("unknown molecule id `{0}`")]
    UnknownMolecule(String),

    /// The solver collaborator failed for this molecule.
    #[error("solver failure for molecule `{id}`: {source}")]
    Solver {
        /// The molecule identifier the solve was attempted for.
        id: String,
        /// The underlying solver error.
        #[source]
        source: SolverError,
    },
}

type Slot = Arc<Mutex<Option<Arc<SolveResult>>>>;

/// A process-wide memoisation of solver output, keyed by molecule identifier.
pub struct SolveCache {
    registry: Arc<PresetRegistry>,
    solver: Arc<dyn OrbitalSolver>,
    solver_timeout: Option<Duration>,
    entries: Mutex<HashMap<String, Slot>>,
}

impl SolveCache {
    /// Constructs a cache over a preset registry and a solver collaborator.
    ///
    /// # Arguments
    ///
    /// * `registry` - The registry of solvable molecules; identifiers absent from it fail fast
    ///   without touching the solver.
    /// * `solver` - The external solver collaborator.
    /// * `solver_timeout` - An optional wall-clock budget per solve. On expiry the request
    ///   fails with [`SolverError::Timeout`]; the solve itself runs on a blocking thread and is
    ///   abandoned rather than interrupted.
    pub fn new(
        registry: Arc<PresetRegistry>,
        solver: Arc<dyn OrbitalSolver>,
        solver_timeout: Option<Duration>,
    ) -> Self {
        SolveCache {
            registry,
            solver,
            solver_timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the preset registry backing this cache.
    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    /// Returns the solve result for a molecule identifier, computing it on first use.
    ///
    /// Concurrent calls for the same uncached identifier are serialised per key: exactly one
    /// solve executes and every caller observes the same completed result. Failed solves are
    /// not cached, so a later request may retry.
    ///
    /// # Errors
    ///
    /// [`CacheError::UnknownMolecule`] if the identifier is not registered (checked before any
    /// solver invocation), or [`CacheError::Solver`] if the solve fails or times out.
    pub async fn get(&self, id: &str) -> Result<Arc<SolveResult>, CacheError> {
        let preset = self
            .registry
            .get(id)
            .ok_or_else(|| CacheError::UnknownMolecule(id.to_string()))?
            .clone();

        let slot = {
            let mut entries = self.entries.lock().await;
            entries.entry(id.to_string()).or_default().clone()
        };

        // Holding the per-key slot lock across the solve gives single-flight semantics: late
        // arrivals for the same key block here and then read the populated slot.
        let mut guard = slot.lock().await;
        if let Some(result) = guard.as_ref() {
            return Ok(Arc::clone(result));
        }

        log::info!("Starting solve for molecule `{id}`.");
        let started = Instant::now();
        let solver = Arc::clone(&self.solver);
        let task = tokio::task::spawn_blocking(move || solver.solve(&preset));
        let outcome = match self.solver_timeout {
            Some(budget) => match tokio::time::timeout(budget, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    log::warn!(
                        "Solve for molecule `{id}` exceeded its {:.1} s budget; abandoning it.",
                        budget.as_secs_f64()
                    );
                    return Err(CacheError::Solver {
                        id: id.to_string(),
                        source: SolverError::Timeout(budget),
                    });
                }
            },
            None => task.await,
        };
        let result = outcome
            .map_err(|err| CacheError::Solver {
                id: id.to_string(),
                source: SolverError::Other(anyhow::anyhow!(
                    "The solver task panicked or was cancelled: {err}"
                )),
            })?
            .map_err(|source| CacheError::Solver {
                id: id.to_string(),
                source,
            })?;
        log::info!(
            "Solve for molecule `{id}` finished in {:.3} s ({} orbitals).",
            started.elapsed().as_secs_f64(),
            result.n_orbitals()
        );

        let result = Arc::new(result);
        *guard = Some(Arc::clone(&result));
        Ok(result)
    }
}
