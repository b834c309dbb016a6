use bevy::prelude::*;

/// Number of roaming probe markers seeded when the volume loads.
pub const MARKER_POOL_SIZE: usize = 10;

/// Default marker colour (#00B0FF).
pub const MARKER_COLOUR: Color = Color::Srgba(Srgba {
    red: 0.0,
    green: 0.690,
    blue: 1.0,
    alpha: 1.0,
});

/// Widget colour while idle (#00B0FF).
pub const WIDGET_DEFAULT_COLOUR: Color = MARKER_COLOUR;

/// Widget colour while hovered (#F50057).
pub const WIDGET_HOVER_COLOUR: Color = Color::Srgba(Srgba {
    red: 0.961,
    green: 0.0,
    blue: 0.341,
    alpha: 1.0,
});

/// Widget colour while actively dragged (#FFEB3B).
pub const WIDGET_ACTIVE_COLOUR: Color = Color::Srgba(Srgba {
    red: 1.0,
    green: 0.922,
    blue: 0.231,
    alpha: 1.0,
});

/// Widget colour once a position is committed (#76FF03).
pub const WIDGET_SELECTED_COLOUR: Color = Color::Srgba(Srgba {
    red: 0.463,
    green: 1.0,
    blue: 0.012,
    alpha: 1.0,
});

/// World-space radius around the widget within which a surface hit counts as hover.
pub const WIDGET_HOVER_RADIUS: f32 = 6.0;
