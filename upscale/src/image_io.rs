use std::path::Path;

use anyhow::{Context, Result, ensure};
use common::Buffer3;

/// Image file extensions accepted for input and output.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif", "bmp", "webp"];

/// Loads an image as 8-bit RGB. Alpha is dropped; most models don't take it.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<Buffer3<u8>> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_rgb8();

    let (width, height) = (img.width() as usize, img.height() as usize);
    ensure!(
        width > 0 && height > 0,
        "Image {} is empty",
        path.display()
    );

    Ok(Buffer3::new(width, height, 3, img.into_raw()))
}

/// Saves an RGB or RGBA buffer; the format follows the file extension.
pub fn save<P: AsRef<Path>>(buffer: &Buffer3<u8>, path: P) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .with_context(|| format!("Missing file extension: {}", path.display()))?;
    ensure!(
        SUPPORTED_EXTENSIONS.contains(&extension.as_str()),
        "Unsupported file extension: {}",
        extension
    );

    let color_type = match buffer.channels() {
        1 => image::ExtendedColorType::L8,
        3 => image::ExtendedColorType::Rgb8,
        4 => image::ExtendedColorType::Rgba8,
        other => anyhow::bail!("Cannot save a buffer with {} channels", other),
    };

    image::save_buffer(
        path,
        buffer.pixels(),
        buffer.width() as u32,
        buffer.height() as u32,
        color_type,
    )
    .with_context(|| format!("Failed to save image {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_utils::test_output_path;

    fn checker(width: usize, height: usize) -> Buffer3<u8> {
        let mut buffer = Buffer3::new_default(width, height, 3);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 20 };
                buffer
                    .pixel_mut(x, y)
                    .copy_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        buffer
    }

    #[test]
    fn png_save_then_load() {
        let path = test_output_path("image_io_checker.png");
        let buffer = checker(24, 16);

        save(&buffer, &path).expect("save png");
        let loaded = load_rgb(&path).expect("load png");

        assert_eq!(loaded, buffer);
    }

    #[test]
    fn rgba_input_loads_as_rgb() {
        let path = test_output_path("image_io_rgba.png");
        let rgba = Buffer3::new(2, 1, 4, vec![10, 20, 30, 0, 40, 50, 60, 255]);

        save(&rgba, &path).expect("save rgba");
        let loaded = load_rgb(&path).expect("load");

        assert_eq!(loaded.channels(), 3);
        assert_eq!(loaded.pixels(), &[10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let path = test_output_path("image_io_bad.xyz");
        assert!(save(&checker(4, 4), &path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_rgb(test_output_path("image_io_missing.png")).is_err());
    }
}
