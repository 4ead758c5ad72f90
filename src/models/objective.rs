use std::f64::consts::PI;

/// Pure scoring function over decoded variable values.
///
/// Roulette-wheel selection divides by the fitness total, so an objective
/// must stay non-negative over its configured domain.
pub trait Objective {
    fn evaluate(&self, variables: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, variables: &[f64]) -> f64 {
        self(variables)
    }
}

/// The bundled two-variable surface
/// `f(x1, x2) = 21.5 + x1·sin(4π·x1) + x2·sin(20π·x2)`.
///
/// Strictly positive over the published bounds, which makes it safe for
/// fitness-proportionate selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigSurface;

impl TrigSurface {
    pub const X1_BOUNDS: (f64, f64) = (-3.0, 12.1);
    pub const X2_BOUNDS: (f64, f64) = (4.1, 5.8);
    pub const PRECISION: f64 = 0.0001;
}

impl Objective for TrigSurface {
    fn evaluate(&self, variables: &[f64]) -> f64 {
        let x1 = variables[0];
        let x2 = variables[1];

        21.5 + x1 * (4.0 * PI * x1).sin() + x2 * (20.0 * PI * x2).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_evaluates_the_surface_at_the_origin_of_its_terms() {
        // both sine terms vanish at x1 = 0, x2 = 0
        assert!((TrigSurface.evaluate(&[0.0, 0.0]) - 21.5).abs() < 1e-12);
    }

    #[test]
    fn it_stays_positive_over_the_published_bounds() {
        // |x1·sin| <= 12.1 and |x2·sin| <= 5.8, so the worst case is above 3.6
        let mut x1 = TrigSurface::X1_BOUNDS.0;
        while x1 <= TrigSurface::X1_BOUNDS.1 {
            let mut x2 = TrigSurface::X2_BOUNDS.0;
            while x2 <= TrigSurface::X2_BOUNDS.1 {
                assert!(TrigSurface.evaluate(&[x1, x2]) > 0.0);
                x2 += 0.01;
            }
            x1 += 0.1;
        }
    }

    #[test]
    fn it_accepts_closures_as_objectives() {
        let objective = |variables: &[f64]| variables[0] + variables[1];

        assert_eq!(objective.evaluate(&[1.0, 2.5]), 3.5);
    }
}
