//! The escape-time kernel: the unit of arithmetic every pixel costs.

use num::Complex;

/// Iterates `z = z * z + c`, starting from `z = c`, for as long as
/// `|z|² < 4` and the cap hasn't been reached.  Returns the number of
/// iterations performed: zero if `c` is already outside the radius-2
/// disc, `max_iterations` if the orbit never left it, which is taken
/// to mean `c` is in the Mandelbrot set.
#[inline]
pub fn escape_time(c: Complex<f64>, max_iterations: u32) -> u32 {
    let mut z = c;
    let mut i = 0;
    while i < max_iterations && z.norm_sqr() < 4.0 {
        z = z * z + c;
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 255), 255);
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 10), 10);
    }

    #[test]
    fn radius_two_escapes_immediately() {
        assert_eq!(escape_time(Complex::new(2.0, 0.0), 255), 0);
        assert_eq!(escape_time(Complex::new(0.0, -2.0), 255), 0);
        assert_eq!(escape_time(Complex::new(3.0, 3.0), 255), 0);
    }

    #[test]
    fn one_escapes_after_a_single_step() {
        // 1 -> 2, and |2|² is not below 4.
        assert_eq!(escape_time(Complex::new(1.0, 0.0), 255), 1);
    }

    #[test]
    fn period_two_cycle_stays_inside() {
        // -1 -> 0 -> -1 -> ...
        assert_eq!(escape_time(Complex::new(-1.0, 0.0), 1000), 1000);
    }

    #[test]
    fn zero_cap_does_no_work() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 0), 0);
    }

    #[test]
    fn kernel_is_pure() {
        let c = Complex::new(-0.743_643_9, 0.131_825_9);
        assert_eq!(escape_time(c, 500), escape_time(c, 500));
    }
}
