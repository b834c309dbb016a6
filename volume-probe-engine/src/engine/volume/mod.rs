//! Volumetric dataset access for probe placement.
//!
//! Holds the affine grid-to-world mapping, the integer grid extent, and the
//! raycastable mid-slice surface built once per session when the volume
//! manifest finishes loading.

/// Integer grid dimensions and bound queries.
pub mod extent;

/// Affine IJK to LPS mapping with cached inverse.
pub mod grid_transform;

/// Volume manifest JSON asset and loaded-volume resource.
pub mod manifest;

/// World-space mid-slice rectangle the probe widget raycasts against.
pub mod surface;
