//! Bounded bilinear interpolation over a calibration grid.

use crate::table::Grid;

/// A piecewise-bilinear surface over two strictly increasing axes.
///
/// Evaluation clamps both coordinates to the axis ranges, so querying
/// outside the tabulated domain returns the value at the nearest boundary
/// instead of extrapolating or failing.
#[derive(Debug, Clone)]
pub(crate) struct BilinearSurface {
    /// First axis (rows of `z`), strictly increasing.
    x: Vec<f64>,
    /// Second axis (columns of `z`), strictly increasing.
    y: Vec<f64>,
    /// Values of shape `(x.len(), y.len())`.
    z: Grid,
}

impl BilinearSurface {
    /// Build a surface from pre-validated axes and grid.
    ///
    /// The calibration loader guarantees the shape and ordering invariants,
    /// so violations here are programming errors.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Grid) -> Self {
        debug_assert!(x.len() >= 2 && y.len() >= 2);
        debug_assert_eq!(z.len(), x.len());
        debug_assert!(z.iter().all(|row| row.len() == y.len()));

        Self { x, y, z }
    }

    /// Evaluate the surface at `(x, y)`, clamping both coordinates to the
    /// tabulated ranges first.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        let x = x.clamp(self.x[0], *self.x.last().unwrap());
        let y = y.clamp(self.y[0], *self.y.last().unwrap());

        let (i, t) = segment(&self.x, x);
        let (j, u) = segment(&self.y, y);

        (1.0 - t) * ((1.0 - u) * self.z[i][j] + u * self.z[i][j + 1])
            + t * ((1.0 - u) * self.z[i + 1][j] + u * self.z[i + 1][j + 1])
    }
}

/// Find the segment of `axis` containing `v` and the fractional position of
/// `v` within it. `v` must already be clamped to the axis range.
fn segment(axis: &[f64], v: f64) -> (usize, f64) {
    for i in 0..axis.len() - 1 {
        if v >= axis[i] && v <= axis[i + 1] {
            return (i, (v - axis[i]) / (axis[i + 1] - axis[i]));
        }
    }

    // Should never reach here once the input is clamped
    unreachable!()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn surface() -> BilinearSurface {
        BilinearSurface::new(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 10.0],
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        )
    }

    #[test]
    fn test_exact_at_nodes() {
        let s = surface();

        assert_eq!(s.eval(0.0, 0.0), 1.0);
        assert_eq!(s.eval(1.0, 10.0), 4.0);
        assert_eq!(s.eval(2.0, 0.0), 5.0);
    }

    #[test]
    fn test_interpolates_between_nodes() {
        let s = surface();

        // Midpoint of the first cell: average of its four corners.
        assert_relative_eq!(s.eval(0.5, 5.0), 2.5, epsilon = 1e-12);

        // Linear along one axis.
        assert_relative_eq!(s.eval(1.5, 0.0), 4.0, epsilon = 1e-12);
        assert_relative_eq!(s.eval(0.0, 2.5), 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let s = surface();

        assert_eq!(s.eval(-100.0, -100.0), s.eval(0.0, 0.0));
        assert_eq!(s.eval(1e100, 1e100), s.eval(2.0, 10.0));
        assert_eq!(s.eval(0.5, 1e100), s.eval(0.5, 10.0));
    }
}
