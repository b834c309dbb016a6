use bevy::prelude::*;
use serde_json::json;

use super::probe_marker::MarkerStyle;
use super::probe_widget::ProbeWidget;

/// Which probe set a panel edit addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTarget {
    Markers,
    Widget,
}

/// Flat property update from the settings panel. Recognized keys are
/// `color`, `defaultColor`, `activeColor`, `hoverColor`, `selectedColor`,
/// `showMesh`, `showDomSVG`, and `showDomMeasurements`; anything else is
/// ignored.
#[derive(Event, Debug, Clone)]
pub struct PanelUpdate {
    pub target: PanelTarget,
    pub properties: serde_json::Value,
}

/// Parse a `#RRGGBB` panel colour.
pub fn parse_hex_colour(value: &str) -> Option<Color> {
    Srgba::hex(value).ok().map(Color::Srgba)
}

/// Apply queued panel edits to marker styles and the widget.
pub fn apply_panel_updates(
    mut events: EventReader<PanelUpdate>,
    mut markers: Query<&mut MarkerStyle>,
    mut widgets: Query<&mut ProbeWidget>,
) {
    for update in events.read() {
        match update.target {
            PanelTarget::Markers => {
                for mut style in &mut markers {
                    apply_marker_properties(&mut style, &update.properties);
                }
            }
            PanelTarget::Widget => {
                if let Ok(mut widget) = widgets.single_mut() {
                    apply_widget_properties(&mut widget, &update.properties);
                }
            }
        }
    }
}

fn bool_property(properties: &serde_json::Value, key: &str) -> Option<bool> {
    properties.get(key).and_then(|v| v.as_bool())
}

fn colour_property(properties: &serde_json::Value, key: &str) -> Option<Color> {
    let hex = properties.get(key)?.as_str()?;
    match parse_hex_colour(hex) {
        Some(colour) => Some(colour),
        None => {
            warn!("ignoring malformed panel colour {hex:?} for {key}");
            None
        }
    }
}

pub fn apply_marker_properties(style: &mut MarkerStyle, properties: &serde_json::Value) {
    if let Some(colour) = colour_property(properties, "color") {
        style.colour = colour;
    }
    if let Some(v) = bool_property(properties, "showMesh") {
        style.show_mesh = v;
    }
    if let Some(v) = bool_property(properties, "showDomSVG") {
        style.show_overlay = v;
    }
    if let Some(v) = bool_property(properties, "showDomMeasurements") {
        style.show_measurement = v;
    }
}

pub fn apply_widget_properties(widget: &mut ProbeWidget, properties: &serde_json::Value) {
    if let Some(colour) = colour_property(properties, "defaultColor") {
        widget.palette.idle = colour;
    }
    if let Some(colour) = colour_property(properties, "hoverColor") {
        widget.palette.hovered = colour;
    }
    if let Some(colour) = colour_property(properties, "activeColor") {
        widget.palette.active = colour;
    }
    if let Some(colour) = colour_property(properties, "selectedColor") {
        widget.palette.selected = colour;
    }
    if let Some(v) = bool_property(properties, "showMesh") {
        widget.show_mesh = v;
    }
    if let Some(v) = bool_property(properties, "showDomSVG") {
        widget.show_overlay = v;
    }
    if let Some(v) = bool_property(properties, "showDomMeasurements") {
        widget.show_measurement = v;
    }
}

/// Tracked values behind the native keyboard toggles.
#[derive(Resource)]
pub struct PanelToggles {
    pub show_mesh: bool,
    pub show_overlay: bool,
    pub show_measurement: bool,
}

impl Default for PanelToggles {
    fn default() -> Self {
        Self {
            show_mesh: true,
            show_overlay: true,
            show_measurement: true,
        }
    }
}

/// Native stand-in for the settings panel: M toggles probe meshes, O the
/// overlay glyphs, L the measurement readouts. Each toggle goes through the
/// same `PanelUpdate` path an external panel would use.
pub fn panel_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut toggles: ResMut<PanelToggles>,
    mut events: EventWriter<PanelUpdate>,
) {
    let mut edits: Vec<serde_json::Value> = Vec::new();
    if keyboard.just_pressed(KeyCode::KeyM) {
        toggles.show_mesh = !toggles.show_mesh;
        edits.push(json!({ "showMesh": toggles.show_mesh }));
    }
    if keyboard.just_pressed(KeyCode::KeyO) {
        toggles.show_overlay = !toggles.show_overlay;
        edits.push(json!({ "showDomSVG": toggles.show_overlay }));
    }
    if keyboard.just_pressed(KeyCode::KeyL) {
        toggles.show_measurement = !toggles.show_measurement;
        edits.push(json!({ "showDomMeasurements": toggles.show_measurement }));
    }

    for properties in edits {
        events.write(PanelUpdate {
            target: PanelTarget::Markers,
            properties: properties.clone(),
        });
        events.write(PanelUpdate {
            target: PanelTarget::Widget,
            properties,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colours() {
        let colour = parse_hex_colour("#00B0FF").expect("valid hex");
        let Color::Srgba(srgba) = colour else {
            panic!("expected srgba");
        };
        assert!((srgba.red - 0.0).abs() < 1e-3);
        assert!((srgba.green - 176.0 / 255.0).abs() < 1e-3);
        assert!((srgba.blue - 1.0).abs() < 1e-3);

        assert!(parse_hex_colour("not a colour").is_none());
    }

    #[test]
    fn marker_properties_apply_recognized_keys() {
        let mut style = MarkerStyle::default();
        apply_marker_properties(
            &mut style,
            &json!({
                "color": "#FF0000",
                "showMesh": false,
                "showDomMeasurements": false,
                "unknownKey": 42,
            }),
        );
        assert!(!style.show_mesh);
        assert!(!style.show_measurement);
        assert!(style.show_overlay);
        let Color::Srgba(srgba) = style.colour else {
            panic!("expected srgba");
        };
        assert!((srgba.red - 1.0).abs() < 1e-3);
    }

    #[test]
    fn malformed_colour_leaves_style_unchanged() {
        let mut style = MarkerStyle::default();
        let before = style.colour;
        apply_marker_properties(&mut style, &json!({ "color": "#ZZZZZZ" }));
        assert_eq!(style.colour, before);
    }

    #[test]
    fn widget_palette_updates_per_state() {
        let mut widget = ProbeWidget::new(Vec3::ZERO);
        apply_widget_properties(
            &mut widget,
            &json!({
                "hoverColor": "#123456",
                "selectedColor": "#654321",
                "showDomSVG": false,
            }),
        );
        assert_eq!(widget.palette.hovered, parse_hex_colour("#123456").unwrap());
        assert_eq!(
            widget.palette.selected,
            parse_hex_colour("#654321").unwrap()
        );
        assert!(!widget.show_overlay);
    }
}
