//! Request handlers mapping HTTP parameters onto the grid pipeline.
//!
//! All validation (molecule identifier, orbital indices, grid size) happens before any
//! expensive computation, and a request either yields a complete binary buffer or a plain-text
//! 4xx error; no partial results are ever returned.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheError;
use crate::grid::{sample_orbital, GridSpec};
use crate::interfaces::web::SharedState;
use crate::io::grids::{encode_batch, encode_grid};
use crate::labels::label_orbitals;
use crate::solver::SolveResult;

/// Errors surfaced to HTTP clients as plain-text responses.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request named a molecule absent from the preset registry.
    #[error("unknown molecule id `{0}`")]
    UnknownMolecule(String),

    /// The request named an orbital index outside the molecule's valid range.
    #[error("orbital index {index} out of range; valid indices are 0..{n_orbitals}")]
    OrbitalIndexOutOfRange { index: usize, n_orbitals: usize },

    /// The `indices` parameter was missing or not a comma-separated list of non-negative
    /// integers.
    #[error("malformed `indices` parameter: {0}")]
    MalformedIndices(String),

    /// The requested grid size was not a positive integer.
    #[error("grid size must be a positive integer")]
    InvalidGridSize,

    /// The solver collaborator failed; the request is not retried.
    #[error("solver failure: {0}")]
    Solver(String),

    /// An unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RequestError {
    fn status(&self) -> StatusCode {
        match self {
            RequestError::UnknownMolecule(_)
            | RequestError::OrbitalIndexOutOfRange { .. }
            | RequestError::MalformedIndices(_)
            | RequestError::InvalidGridSize => StatusCode::BAD_REQUEST,
            RequestError::Solver(_) => StatusCode::BAD_GATEWAY,
            RequestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<CacheError> for RequestError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::UnknownMolecule(id) => RequestError::UnknownMolecule(id),
            CacheError::Solver { source, .. } => RequestError::Solver(source.to_string()),
        }
    }
}

/// Query parameters of the molecule-info endpoint.
#[derive(Deserialize)]
pub struct InfoQuery {
    pub molecule: Option<String>,
}

/// Query parameters of the single-orbital endpoint.
#[derive(Deserialize)]
pub struct OrbitalQuery {
    pub grid_size: Option<usize>,
    pub margin: Option<f64>,
    pub molecule: Option<String>,
}

/// Query parameters of the batch endpoint.
#[derive(Deserialize)]
pub struct BatchQuery {
    pub indices: Option<String>,
    pub grid_size: Option<usize>,
    pub margin: Option<f64>,
    pub molecule: Option<String>,
}

/// One entry of the molecule listing.
#[derive(Serialize)]
pub struct MoleculeSummary {
    pub id: String,
    pub name: String,
}

/// One atom of the molecule-info response.
#[derive(Serialize)]
pub struct AtomInfo {
    pub element: String,
    pub coords: [f64; 3],
}

/// The molecule-info response body.
#[derive(Serialize)]
pub struct MoleculeInfo {
    pub atoms: Vec<AtomInfo>,
    pub num_orbitals: usize,
    pub basis: String,
    pub occupations: Vec<f64>,
    pub orbital_labels: Vec<String>,
    pub energy: f64,
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "casgrid natural-orbital grid server"
    }))
}

pub async fn list_molecules(State(state): State<SharedState>) -> Json<Vec<MoleculeSummary>> {
    let molecules = state
        .cache
        .registry()
        .iter()
        .map(|preset| MoleculeSummary {
            id: preset.id.clone(),
            name: preset.name.clone(),
        })
        .collect();
    Json(molecules)
}

pub async fn molecule_info(
    State(state): State<SharedState>,
    Query(query): Query<InfoQuery>,
) -> Result<Json<MoleculeInfo>, RequestError> {
    let id = query
        .molecule
        .unwrap_or_else(|| state.defaults.molecule.clone());
    let result = state.cache.get(&id).await?;
    let descriptors = result.basis.descriptors();
    let orbital_labels =
        label_orbitals(&result.coefficients, &descriptors, &result.molecule.atoms);
    Ok(Json(MoleculeInfo {
        atoms: result
            .molecule
            .atoms
            .iter()
            .map(|atom| AtomInfo {
                element: atom.atomic_symbol.clone(),
                coords: [
                    atom.coordinates[0],
                    atom.coordinates[1],
                    atom.coordinates[2],
                ],
            })
            .collect(),
        num_orbitals: result.n_orbitals(),
        basis: result.basis_name.clone(),
        occupations: result.occupations.to_vec(),
        orbital_labels,
        energy: result.energy,
    }))
}

pub async fn orbital(
    State(state): State<SharedState>,
    Path(orbital_index): Path<usize>,
    Query(query): Query<OrbitalQuery>,
) -> Result<Response, RequestError> {
    let id = query
        .molecule
        .unwrap_or_else(|| state.defaults.molecule.clone());
    let grid_size = query.grid_size.unwrap_or(state.defaults.grid_size);
    let margin = query.margin.unwrap_or(state.defaults.margin);
    if grid_size == 0 {
        return Err(RequestError::InvalidGridSize);
    }

    let result = state.cache.get(&id).await?;
    let n_orbitals = result.n_orbitals();
    if orbital_index >= n_orbitals {
        return Err(RequestError::OrbitalIndexOutOfRange {
            index: orbital_index,
            n_orbitals,
        });
    }

    let (buf, spec) = tokio::task::spawn_blocking(move || -> Result<_, RequestError> {
        let spec = spec_for(&result, grid_size, margin)?;
        let grid = sample_one(&result, &spec, orbital_index)?;
        let buf = encode_grid(&grid, &spec.bounds)
            .map_err(|err| RequestError::Internal(err.to_string()))?;
        Ok((buf, spec))
    })
    .await
    .map_err(|err| RequestError::Internal(err.to_string()))??;

    binary_response(buf, &spec)
}

pub async fn orbitals_batch(
    State(state): State<SharedState>,
    Query(query): Query<BatchQuery>,
) -> Result<Response, RequestError> {
    let id = query
        .molecule
        .unwrap_or_else(|| state.defaults.molecule.clone());
    let grid_size = query.grid_size.unwrap_or(state.defaults.batch_grid_size);
    let margin = query.margin.unwrap_or(state.defaults.margin);
    if grid_size == 0 {
        return Err(RequestError::InvalidGridSize);
    }
    let indices = parse_indices(query.indices.as_deref())?;

    let result = state.cache.get(&id).await?;
    let n_orbitals = result.n_orbitals();
    // Report the first out-of-range index, if any, before any sampling.
    if let Some(&bad) = indices.iter().find(|&&index| index >= n_orbitals) {
        return Err(RequestError::OrbitalIndexOutOfRange {
            index: bad,
            n_orbitals,
        });
    }

    let (buf, spec) = tokio::task::spawn_blocking(move || -> Result<_, RequestError> {
        // All orbitals of a batch share one grid geometry.
        let spec = spec_for(&result, grid_size, margin)?;
        let grids = indices
            .iter()
            .map(|&index| sample_one(&result, &spec, index))
            .collect::<Result<Vec<_>, _>>()?;
        let wire_indices = indices
            .iter()
            .map(|&index| {
                i32::try_from(index)
                    .map_err(|_| RequestError::Internal(format!("index {index} overflows i32")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let buf = encode_batch(&wire_indices, &grids, &spec.bounds)
            .map_err(|err| RequestError::Internal(err.to_string()))?;
        Ok((buf, spec))
    })
    .await
    .map_err(|err| RequestError::Internal(err.to_string()))??;

    binary_response(buf, &spec)
}

fn spec_for(
    result: &SolveResult,
    grid_size: usize,
    margin: f64,
) -> Result<GridSpec, RequestError> {
    GridSpec::around(&result.molecule, grid_size, margin)
        .map_err(|err| RequestError::Internal(err.to_string()))
}

fn sample_one(
    result: &SolveResult,
    spec: &GridSpec,
    orbital_index: usize,
) -> Result<Array3<f32>, RequestError> {
    sample_orbital(
        spec,
        result.basis.as_ref(),
        result.coefficients.column(orbital_index),
    )
    .map_err(|err| RequestError::Internal(err.to_string()))
}

/// Parses the comma-separated `indices` parameter, allowing surrounding whitespace per element.
fn parse_indices(raw: Option<&str>) -> Result<Vec<usize>, RequestError> {
    let raw = raw.ok_or_else(|| {
        RequestError::MalformedIndices("the parameter is required".to_string())
    })?;
    let indices = raw
        .split(',')
        .map(|element| {
            element
                .trim()
                .parse::<usize>()
                .map_err(|_| RequestError::MalformedIndices(format!("`{}`", element.trim())))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if indices.is_empty() {
        return Err(RequestError::MalformedIndices(
            "at least one index is required".to_string(),
        ));
    }
    Ok(indices)
}

fn binary_response(buf: Vec<u8>, spec: &GridSpec) -> Result<Response, RequestError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    let bounds = spec.bounds;
    for (name, value) in [
        ("X-Grid-Size", spec.size.to_string()),
        (
            "X-Min-Coords",
            format!("{},{},{}", bounds.min[0], bounds.min[1], bounds.min[2]),
        ),
        (
            "X-Max-Coords",
            format!("{},{},{}", bounds.max[0], bounds.max[1], bounds.max[2]),
        ),
    ] {
        headers.insert(
            name,
            HeaderValue::from_str(&value)
                .map_err(|err| RequestError::Internal(err.to_string()))?,
        );
    }
    Ok((headers, buf).into_response())
}
