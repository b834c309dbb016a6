use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::extent::BoundingExtent;
use super::grid_transform::{GridTransform, InvalidTransformError};

/// Volume metadata emitted by the dataset loader: the grid-to-world matrix
/// (column major, 16 floats) and the grid dimensions. This JSON file is the
/// whole interface to the out-of-process volume pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Asset, TypePath)]
pub struct VolumeManifest {
    pub grid_to_world: [f32; 16],
    pub dimensions: BoundingExtent,
}

impl VolumeManifest {
    pub fn grid_transform(&self) -> Result<GridTransform, InvalidTransformError> {
        GridTransform::new(Mat4::from_cols_array(&self.grid_to_world))
    }
}

/// Loaded-volume state shared by the probe systems. Built once when the
/// manifest asset resolves; `is_loaded` gates marker seeding and widget
/// spawning.
#[derive(Resource, Default)]
pub struct VolumeAssets {
    pub transform: Option<GridTransform>,
    pub extent: Option<BoundingExtent>,
    pub world_center: Vec3,
    pub is_loaded: bool,
}

impl VolumeAssets {
    pub fn from_manifest(manifest: &VolumeManifest) -> Result<Self, InvalidTransformError> {
        let transform = manifest.grid_transform()?;
        let world_center = transform.apply(manifest.dimensions.center_grid());
        Ok(Self {
            transform: Some(transform),
            extent: Some(manifest.dimensions),
            world_center,
            is_loaded: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_assets_from_manifest() {
        let manifest = VolumeManifest {
            grid_to_world: Mat4::from_scale(Vec3::splat(2.0)).to_cols_array(),
            dimensions: BoundingExtent::new(100, 100, 50),
        };
        let assets = VolumeAssets::from_manifest(&manifest).expect("valid manifest");
        assert!(assets.is_loaded);
        assert_eq!(assets.extent, Some(BoundingExtent::new(100, 100, 50)));
        assert_eq!(assets.world_center, Vec3::new(100.0, 100.0, 50.0));
    }

    #[test]
    fn singular_manifest_is_rejected() {
        let manifest = VolumeManifest {
            grid_to_world: [0.0; 16],
            dimensions: BoundingExtent::new(10, 10, 10),
        };
        assert!(VolumeAssets::from_manifest(&manifest).is_err());
    }
}
