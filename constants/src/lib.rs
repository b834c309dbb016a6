/// Default probe palette and pool sizing.
pub mod probe_settings;

/// Mesh and overlay sizing for probe visualisation.
pub mod render_settings;
