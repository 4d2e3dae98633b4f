//! Volume loading by path
//!
//! Picks the reader from the path: `.lvol` files, single label images, or a
//! directory of images read as a z stack in file-name order.

use log::info;
use std::path::Path;

use crate::extractor::errors::{RegionError, RegionKitResult};
use super::array_volume::ArrayVolume;
use super::{image_stack, lvol};

/// Loads label volumes from the supported on-disk formats
pub struct VolumeLoader;

impl VolumeLoader {
    /// Loads the volume at `path`
    ///
    /// # Arguments
    /// * `path` - An `.lvol` file, a grayscale image, or a directory of images
    ///
    /// # Returns
    /// The loaded volume, or `InvalidFormat` for unrecognised paths
    pub fn load<P: AsRef<Path>>(path: P) -> RegionKitResult<ArrayVolume> {
        let path = path.as_ref();

        if path.is_dir() {
            let paths = image_stack::list_stack_dir(path)?;
            if paths.is_empty() {
                return Err(RegionError::InvalidFormat(format!(
                    "Directory {} contains no label images",
                    path.display()
                )));
            }
            info!("Reading {} as a stack of {} images", path.display(), paths.len());
            return image_stack::load_stack(&paths);
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if extension == lvol::LVOL_EXTENSION {
            lvol::load(path)
        } else if image_stack::is_image_path(path) {
            image_stack::load_image(path)
        } else {
            Err(RegionError::InvalidFormat(format!(
                "Don't know how to read a label volume from {}",
                path.display()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::byte_order::ByteOrder;
    use crate::volume::LabelVolume;

    #[test]
    fn test_dispatch_on_extension() {
        let dir = std::env::temp_dir().join(format!("regionkit_loader_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let volume = ArrayVolume::filled(&[2, 3, 4], 300).unwrap();
        let path = dir.join("cells.LVOL");
        lvol::save(&path, &volume, ByteOrder::BigEndian).unwrap();
        assert_eq!(VolumeLoader::load(&path).unwrap().label_at(&[1, 2, 3]), 300);

        let unknown = dir.join("cells.csv");
        std::fs::write(&unknown, "1,2,3").unwrap();
        assert!(matches!(VolumeLoader::load(&unknown), Err(RegionError::InvalidFormat(_))));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
