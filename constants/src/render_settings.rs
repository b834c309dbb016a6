/// Edge length of a marker's voxel cube in world units (LPS millimetres).
pub const MARKER_MESH_SIZE: f32 = 2.0;

/// Radius of the probe widget sphere in world units.
pub const WIDGET_MESH_RADIUS: f32 = 1.5;

/// Pixel size of the square overlay glyph anchored at a probe's screen position.
pub const OVERLAY_GLYPH_SIZE: f32 = 10.0;

/// Pixel offset from the glyph to its measurement readout.
pub const OVERLAY_TEXT_OFFSET: f32 = 14.0;

/// Font size of the overlay measurement readout.
pub const OVERLAY_FONT_SIZE: f32 = 12.0;
