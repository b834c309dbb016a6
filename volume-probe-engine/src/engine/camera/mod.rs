//! Viewport camera for probe scene navigation.
//!
//! Orbit controls around the dataset's world center with smooth
//! interpolation, mouse orbit/dolly input, and load-time framing.

/// Viewport camera resource and controller system.
pub mod viewport_camera;
