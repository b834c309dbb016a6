//! Interactive probes tracked across grid, world, and screen space.
//!
//! A fixed pool of roaming markers bounces across a 2D slice of the volume
//! grid while a single user-driven widget is positioned by raycasting the
//! dataset's surface. Both expose a flat style property set the settings
//! panel edits through `PanelUpdate` events.
//!
//! Per-frame ordering is a single chain: widget input, panel updates, marker
//! advance (grid step + world recompute), screen projection, then overlay
//! sync. A state transition therefore always reaches the overlay before the
//! next render.

/// Settings panel surface: JSON property updates and keyboard toggles.
pub mod panel;

/// Roaming probe markers with the axis-wise bounce rule.
pub mod probe_marker;

/// The interactive probe widget and its pointer state machine.
pub mod probe_widget;
