//! Writes a finished image as a plain-text (`P3`) pixmap.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::buffer::ImageBuffer;
use crate::color::colorize;
use crate::errors::Result;

/// Colours `image` and writes it to `output`.  Refuses an image that
/// still has rows missing.
pub fn write_ppm<W: Write>(output: W, image: &ImageBuffer, max_iterations: u32) -> Result<()> {
    let samples = colorize(image, max_iterations)?;
    let side = image.dim() as u32;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Ascii));
    encoder.encode(&samples[..], side, side, ColorType::RGB(8))?;
    Ok(())
}

/// Writes `image` to the file at `path`.
pub fn save<P: AsRef<Path>>(path: P, image: &ImageBuffer, max_iterations: u32) -> Result<()> {
    let mut output = BufWriter::new(File::create(path)?);
    write_ppm(&mut output, image, max_iterations)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .split_whitespace()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn writes_a_plain_pixmap() {
        let mut image = ImageBuffer::new(2).unwrap();
        image.write_row(1, &[10, 3]).unwrap();
        image.write_row(2, &[0, 10]).unwrap();
        let mut out = vec![];
        write_ppm(&mut out, &image, 10).unwrap();
        assert_eq!(
            tokens(&out),
            vec![
                "P3", "2", "2", "255", "0", "0", "255", "96", "96", "159", "0", "0", "255", "0",
                "0", "255",
            ]
        );
    }

    #[test]
    fn refuses_a_partial_image() {
        let mut image = ImageBuffer::new(2).unwrap();
        image.write_row(1, &[1, 1]).unwrap();
        let mut out = vec![];
        assert!(write_ppm(&mut out, &image, 10).is_err());
        assert!(out.is_empty());
    }
}
