pub mod camera;
pub mod overlay;
pub mod projection;
pub mod volume;
