//! Contains the PlaneMapper struct, which describes a relationship
//! between a square grid of pixels and a rectangle on the complex
//! plane whose opposite corners are `c1` and `c2`.
//!
//! Rows are numbered the way the work is handed out, `1..=dim`, and
//! walk from `c2`'s imaginary part toward `c1`'s.  Columns are
//! numbered the way the image is stored, `0..dim`, and walk from
//! `c1`'s real part toward `c2`'s.  With the default corners that
//! puts positive imaginary values at the top of the picture.
use crate::errors::{Error, Result};
use num::Complex;

/// Describes the two opposite corners of the rectangle on the
/// complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Describes a column (0-based) and a row (1-based) of the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: a square integral grid and
/// a rectangle on the complex plane.  Maps pixels of the one onto
/// points of the other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The side length of the grid.
    pub dim: usize,
    /// The two corners defining the rectangle on the complex plane.
    pub complex_plane: ComplexPlane,
    // How far one pixel moves along each axis.
    steps: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Fails when the grid is empty or when the corners
    /// don't span an actual rectangle.
    pub fn new(dim: usize, c1: Complex<f64>, c2: Complex<f64>) -> Result<PlaneMapper> {
        if dim == 0 {
            return Err(Error::EmptyImage);
        }

        let finite = c1.re.is_finite() && c1.im.is_finite() && c2.re.is_finite() && c2.im.is_finite();
        if !finite || c1.re == c2.re || c1.im == c2.im {
            return Err(Error::DegeneratePlane(c1, c2));
        }

        let steps = (
            (c2.re - c1.re) / (dim as f64),
            (c1.im - c2.im) / (dim as f64),
        );

        Ok(PlaneMapper {
            dim,
            complex_plane: ComplexPlane(c1, c2),
            steps,
        })
    }

    /// The total number of points in the grid.
    pub fn len(&self) -> usize {
        self.dim * self.dim
    }

    /// Always false once constructed; here for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Given the column and row of a pixel, return the complex number
    /// it stands for.  A pure affine function of its inputs.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let ComplexPlane(c1, c2) = self.complex_plane;
        Complex::new(
            c1.re + (pixel.0 as f64) * self.steps.0,
            c2.im + (pixel.1 as f64) * self.steps.1,
        )
    }
}
