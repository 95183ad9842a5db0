pub mod image_helper {
    use crate::core_modules::pixel::pixel::PixelBuffer;
    use crate::error::Result;
    use image::ImageEncoder;
    use std::path::Path;

    /// Decodes any format the `image` crate understands into an RGBA8 buffer.
    pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        PixelBuffer::new(width as usize, height as usize, decoded.into_raw())
    }

    /// Encodes an RGBA8 buffer as PNG.
    pub fn save(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<()> {
        let output = std::io::BufWriter::new(std::fs::File::create(path)?);
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            buffer.as_bytes(),
            buffer.width() as u32,
            buffer.height() as u32,
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::image_helper::*;
    use crate::core_modules::pixel::pixel::{Pixel, PixelBuffer};

    #[test]
    fn save_and_reload_gradient_file() {
        let width = 50usize;
        let height = 30usize;
        let mut buffer = PixelBuffer::filled(width, height, Pixel::default()).expect("valid buffer");
        for row in 0..height {
            for col in 0..width {
                let intensity = ((row * width + col) % 255) as u8;
                buffer.set_pixel(row, col, Pixel::new(intensity, intensity, intensity, 255));
            }
        }
        let name = std::env::temp_dir().join("slic_pixelator_gradient_file.png");

        save(&name, &buffer).expect("Error Saving File.");
        let reloaded = load(&name).expect("Error Loading File.");
        let _ = std::fs::remove_file(&name);

        assert_eq!(reloaded, buffer);
    }

    #[test]
    fn missing_file_is_an_error() {
        let name = std::env::temp_dir().join("slic_pixelator_does_not_exist.png");
        assert!(load(name).is_err());
    }
}
