//! PNG export

use image::{ImageResult, RgbaImage};
use std::path::Path;

/// Write `image` as PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> ImageResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image.save_with_format(path, image::ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn writes_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figures").join("dot.png");
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        save_png(&img, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
