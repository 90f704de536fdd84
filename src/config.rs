//! The knobs of a render, all fixed for the lifetime of a run.

use num::Complex;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::planes::{ComplexPlane, PlaneMapper};

/// Everything needed to describe one render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// The side length of the square image.
    pub dim: usize,
    /// The escape-time cap.
    pub max_iterations: u32,
    /// Opposite corners of the region of the complex plane to draw.
    pub plane: ComplexPlane,
    /// How many workers to farm the rows out to.
    pub workers: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            dim: 512,
            max_iterations: 255,
            plane: ComplexPlane(Complex::new(-1.5, -1.0), Complex::new(0.5, 1.0)),
            workers: num_cpus::get(),
        }
    }
}

impl RenderConfig {
    /// Checks every setting, including that the corners describe a
    /// real rectangle.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::NoIterations);
        }
        if self.workers == 0 {
            return Err(Error::NoWorkers);
        }
        self.plane_mapper().map(|_| ())
    }

    /// The pixel-to-point mapping this configuration describes.
    pub fn plane_mapper(&self) -> Result<PlaneMapper> {
        let ComplexPlane(c1, c2) = self.plane;
        PlaneMapper::new(self.dim, c1, c2)
    }
}

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}
