use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheError, SolveCache};
use crate::presets::{MoleculePreset, PresetRegistry};
use crate::solver::minimal::MinimalBasisSolver;
use crate::solver::{OrbitalSolver, SolveResult, SolverError};

/// A solver wrapper counting invocations, with an optional artificial delay.
struct CountingSolver {
    inner: MinimalBasisSolver,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingSolver {
    fn new(delay: Option<Duration>) -> Self {
        CountingSolver {
            inner: MinimalBasisSolver::new(),
            calls: AtomicUsize::new(0),
            delay,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OrbitalSolver for CountingSolver {
    fn solve(&self, preset: &MoleculePreset) -> Result<SolveResult, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.inner.solve(preset)
    }
}

fn cache_with(
    solver: Arc<CountingSolver>,
    timeout: Option<Duration>,
) -> SolveCache {
    SolveCache::new(Arc::new(PresetRegistry::standard()), solver, timeout)
}

#[tokio::test]
async fn test_cache_unknown_molecule_short_circuits() {
    let solver = Arc::new(CountingSolver::new(None));
    let cache = cache_with(Arc::clone(&solver), None);
    let err = cache.get("benzene").await.unwrap_err();
    assert!(matches!(err, CacheError::UnknownMolecule(ref id) if id == "benzene"));
    // The solver collaborator must never have been invoked.
    assert_eq!(solver.calls(), 0);
}

#[tokio::test]
async fn test_cache_solves_at_most_once_per_key() {
    let solver = Arc::new(CountingSolver::new(None));
    let cache = cache_with(Arc::clone(&solver), None);
    let first = cache.get("water").await.unwrap();
    let second = cache.get("water").await.unwrap();
    assert_eq!(solver.calls(), 1);
    // Both callers observe the very same result.
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.occupations, second.occupations);

    cache.get("dihydrogen").await.unwrap();
    assert_eq!(solver.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cache_single_flight_under_concurrency() {
    let solver = Arc::new(CountingSolver::new(Some(Duration::from_millis(50))));
    let cache = Arc::new(cache_with(Arc::clone(&solver), None));
    let handles = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get("water").await.map(|r| r.n_orbitals()) })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 7);
    }
    assert_eq!(solver.calls(), 1);
}

#[tokio::test]
async fn test_cache_timeout_surfaces_as_solver_failure() {
    let solver = Arc::new(CountingSolver::new(Some(Duration::from_millis(200))));
    let cache = cache_with(Arc::clone(&solver), Some(Duration::from_millis(20)));
    let err = cache.get("water").await.unwrap_err();
    match err {
        CacheError::Solver {
            id,
            source: SolverError::Timeout(budget),
        } => {
            assert_eq!(id, "water");
            assert_eq!(budget, Duration::from_millis(20));
        }
        other => panic!("Unexpected error: {other}"),
    }
}

/// A solver failing on its first invocation and delegating afterwards.
struct FlakySolver {
    inner: MinimalBasisSolver,
    calls: AtomicUsize,
}

impl OrbitalSolver for FlakySolver {
    fn solve(&self, preset: &MoleculePreset) -> Result<SolveResult, SolverError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(SolverError::NotConverged(
                "CASSCF did not converge".to_string(),
            ));
        }
        self.inner.solve(preset)
    }
}

#[tokio::test]
async fn test_cache_failures_are_not_cached() {
    let solver = Arc::new(FlakySolver {
        inner: MinimalBasisSolver::new(),
        calls: AtomicUsize::new(0),
    });
    let cache = SolveCache::new(
        Arc::new(PresetRegistry::standard()),
        Arc::clone(&solver) as Arc<dyn OrbitalSolver>,
        None,
    );
    let err = cache.get("water").await.unwrap_err();
    assert!(matches!(
        err,
        CacheError::Solver {
            source: SolverError::NotConverged(_),
            ..
        }
    ));
    // The failure was not cached: the same cache retries and succeeds.
    assert!(cache.get("water").await.is_ok());
    assert_eq!(solver.calls.load(Ordering::SeqCst), 2);
}
