//! Turns iteration counts into colours.  The palette is a ramp that
//! repeats every eight iterations, running from blue toward grey, with
//! the interior of the set painted solid blue.

use crate::buffer::ImageBuffer;
use crate::errors::Result;

/// An 8-bit-per-channel colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The colour of a pixel that took `iterations` out of a possible
/// `max_iterations`.
pub fn color(iterations: u32, max_iterations: u32) -> Rgb {
    if iterations == max_iterations {
        return Rgb(0, 0, 255);
    }
    let band = 32 * (iterations % 8) as u8;
    Rgb(band, band, 255 - band)
}

/// Colours a complete image, producing interleaved RGB samples in
/// row-major order.
pub fn colorize(buffer: &ImageBuffer, max_iterations: u32) -> Result<Vec<u8>> {
    let counts = buffer.counts()?;
    let mut samples = Vec::with_capacity(counts.len() * 3);
    for &iterations in counts {
        let Rgb(r, g, b) = color(iterations, max_iterations);
        samples.extend_from_slice(&[r, g, b]);
    }
    Ok(samples)
}
