//! PNG encoding of debug preview images.

use std::path::Path;

use strata_terrain::DebugImage;

/// Encode `image` as an 8-bit RGBA PNG.
pub fn encode_png(image: &DebugImage) -> Result<Vec<u8>, png::EncodingError> {
    let mut png_buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(
            std::io::Cursor::new(&mut png_buf),
            image.width,
            image.height,
        );
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
        writer.finish()?;
    }
    Ok(png_buf)
}

/// Encode `image` and write it to `path`.
pub fn write_png(path: &Path, image: &DebugImage) -> Result<(), png::EncodingError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), width = image.width, height = image.height, "preview written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        let mut image = DebugImage::new(4, 3);
        image.set_rgb(1, 1, [200, 10, 10]);
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_png_decodes_to_same_pixels() {
        let mut image = DebugImage::new(5, 2);
        image.set_rgb(4, 1, [1, 2, 3]);
        let bytes = encode_png(&image).unwrap();

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (5, 2));
        assert_eq!(&buf[..info.buffer_size()], image.pixels.as_slice());
    }

    #[test]
    fn test_write_png_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        write_png(&path, &DebugImage::new(2, 2)).unwrap();
        assert!(path.exists());
    }
}
