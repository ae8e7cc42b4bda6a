//! # casgrid: a grid server for multi-configurational natural orbitals
//!
//! casgrid serves pre-computed molecular-orbital data sampled on regular three-dimensional
//! grids as compact binary buffers, ready for volume rendering in a browser. It provides:
//! - a registry of built-in molecule presets, each with a fixed geometry, basis set, and
//!   active space,
//! - a process-wide solve cache that runs the quantum-chemistry solve at most once per
//!   molecule,
//! - grid sampling of natural orbitals over the molecular bounding box with a configurable
//!   margin,
//! - a self-describing little-endian wire format for single grids and batches of grids,
//! - a heuristic orbital labeller assigning chemically meaningful labels such as `O 1s` or
//!   `σ*(H1-H2)`, and
//! - an HTTP interface exposing all of the above to browser-based renderers on any origin.
//!
//! This documentation details the public API of the `casgrid` crate.

pub mod auxiliary;
pub mod basis;
pub mod cache;
pub mod grid;
pub mod interfaces;
pub mod io;
pub mod labels;
pub mod presets;
pub mod solver;
