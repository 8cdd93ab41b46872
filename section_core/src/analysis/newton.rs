//! Damped Newton iteration for section equilibrium
//!
//! Unknowns are scaled so both are strain-like: `u = (e0, k * depth)`.
//! Residuals are scaled by the squash load `F` and `F * depth`, so a single
//! tolerance applies to force and moment alike.
//!
//! A target the section cannot carry is reported as `SectionUnstable` when
//! the stiffness is singular, when an iterate strains a fiber past every
//! material's failure strain, or when the residual stops dropping. Running
//! out of iterations while the residual still drops is a recoverable
//! `ConvergenceFailure`.

use log::debug;

use crate::errors::{SectionError, SectionResult};
use crate::section::Section;
use crate::settings::SolverSettings;
use crate::state::{SectionForces, StrainPlane};

/// Relative determinant threshold below which the Jacobian is singular
const SINGULAR_RATIO: f64 = 1.0e-12;

/// Moment row of the Jacobian, relative to the axial row, below which the
/// section has no bending stiffness (all fibers at one height)
const FLAT_RATIO: f64 = 1.0e-10;

/// Smallest scaled axial stiffness accepted by the 1-D iteration
const MIN_AXIAL_STIFFNESS: f64 = 1.0e-12;

/// An iteration makes progress when it cuts the residual norm below this
/// fraction of its previous value
const STALL_REDUCTION: f64 = 0.99;

/// Consecutive iterations without progress after which the target is
/// treated as unreachable
const STALL_ITERATIONS: usize = 5;

/// A converged equilibrium state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Equilibrium {
    pub plane: StrainPlane,
    pub forces: SectionForces,
    pub iterations: usize,
}

/// Equilibrium of one section against one target.
pub(crate) struct EquilibriumProblem<'a> {
    section: &'a Section,
    settings: &'a SolverSettings,
    target: SectionForces,
    y_ref: f64,
    extent: (f64, f64),
    depth: f64,
    force_scale: f64,
    strain_limit: f64,
}

impl<'a> EquilibriumProblem<'a> {
    /// Set up the problem, rejecting targets no plane can reach.
    pub fn new(section: &'a Section, target: SectionForces, settings: &'a SolverSettings) -> SectionResult<Self> {
        let y_ref = section.centroid()?.y;
        let force_scale = section.force_scale();
        if !(force_scale > 0.0) || !force_scale.is_finite() {
            return Err(SectionError::unstable("section has no load-bearing material"));
        }
        let (min, max) = section.axial_limits();
        if target.normal < min || target.normal > max {
            return Err(SectionError::unstable(format!(
                "axial force {:.4e} N outside attainable range [{min:.4e}, {max:.4e}] N",
                target.normal
            )));
        }
        Ok(EquilibriumProblem {
            section,
            settings,
            target,
            y_ref,
            extent: section.extent()?,
            depth: section.depth()?,
            force_scale,
            strain_limit: settings.divergence_strain.min(section.failure_strain()),
        })
    }

    fn plane(&self, u: [f64; 2]) -> StrainPlane {
        StrainPlane::new(u[0], u[1] / self.depth)
    }

    fn forces(&self, plane: &StrainPlane) -> SectionForces {
        self.section.integrate(plane, self.y_ref)
    }

    fn residual(&self, u: [f64; 2]) -> [f64; 2] {
        let forces = self.forces(&self.plane(u));
        [
            (forces.normal - self.target.normal) / self.force_scale,
            (forces.moment - self.target.moment) / (self.force_scale * self.depth),
        ]
    }

    fn physical_residual(&self, r: [f64; 2]) -> (f64, f64) {
        (r[0] * self.force_scale, r[1] * self.force_scale * self.depth)
    }

    fn check_strain_limit(&self, plane: &StrainPlane) -> SectionResult<()> {
        let (lo, hi) = self.extent;
        let extreme = plane
            .strain_at(lo, self.y_ref)
            .abs()
            .max(plane.strain_at(hi, self.y_ref).abs());
        if !extreme.is_finite() || extreme > self.strain_limit {
            return Err(SectionError::unstable(format!(
                "extreme fiber strain {extreme:.4e} exceeds the failure strain {:.4e}",
                self.strain_limit
            )));
        }
        Ok(())
    }

    fn clamp_step(&self, step: &mut [f64]) {
        let largest = step.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        if largest > self.settings.max_strain_step {
            let factor = self.settings.max_strain_step / largest;
            step.iter_mut().for_each(|s| *s *= factor);
        }
    }

    /// Solve for `(e0, k)` starting from `guess`.
    pub fn solve(&self, analysis: &str, guess: StrainPlane, max_iterations: usize) -> SectionResult<Equilibrium> {
        let h = self.settings.perturbation;
        let mut u = [guess.e0, guess.k * self.depth];
        let mut r = self.residual(u);
        let mut progress = Progress::default();

        for iteration in 0..max_iterations {
            if !(r[0].is_finite() && r[1].is_finite()) {
                return Err(SectionError::unstable("non-finite section response"));
            }
            if max_norm(&r) < self.settings.tolerance {
                return Ok(self.converged(u, iteration));
            }

            let mut jacobian = [[0.0; 2]; 2];
            for j in 0..2 {
                let mut forward = u;
                let mut backward = u;
                forward[j] += h;
                backward[j] -= h;
                let rf = self.residual(forward);
                let rb = self.residual(backward);
                for i in 0..2 {
                    jacobian[i][j] = (rf[i] - rb[i]) / (2.0 * h);
                }
            }

            let axial_row = jacobian[0][0].abs() + jacobian[0][1].abs();
            let moment_row = jacobian[1][0].abs() + jacobian[1][1].abs();
            if axial_row > 0.0 && moment_row <= FLAT_RATIO * axial_row {
                if r[1].abs() < self.settings.tolerance {
                    return self.solve_flat(analysis, u, iteration, max_iterations);
                }
                return Err(SectionError::unstable(format!(
                    "section has no bending stiffness, moment residual {:.4e} Nm",
                    self.physical_residual(r).1
                )));
            }

            let det = jacobian[0][0] * jacobian[1][1] - jacobian[0][1] * jacobian[1][0];
            let magnitude = (jacobian[0][0] * jacobian[1][1]).abs() + (jacobian[0][1] * jacobian[1][0]).abs();
            if !det.is_finite() || det.abs() <= SINGULAR_RATIO * magnitude {
                return Err(SectionError::unstable(format!(
                    "singular section stiffness at e0 = {:.4e}, k = {:.4e}",
                    u[0],
                    u[1] / self.depth
                )));
            }

            let mut step = [
                -(jacobian[1][1] * r[0] - jacobian[0][1] * r[1]) / det,
                -(jacobian[0][0] * r[1] - jacobian[1][0] * r[0]) / det,
            ];
            self.clamp_step(&mut step);

            let (trial, trial_r) = self.line_search(&r, |alpha| {
                let t = [u[0] + alpha * step[0], u[1] + alpha * step[1]];
                (t, self.residual(t))
            });
            self.check_strain_limit(&self.plane(trial))?;
            if progress.stalled(two_norm(&r), two_norm(&trial_r)) {
                let (rn, rm) = self.physical_residual(trial_r);
                return Err(SectionError::unstable(format!(
                    "no equilibrium: residual stalled at N = {rn:.4e} N, M = {rm:.4e} Nm after {} iterations",
                    iteration + 1
                )));
            }

            debug!(
                "{analysis} iteration {}: e0 = {:.6e}, k = {:.6e}, |r| = {:.3e}",
                iteration + 1,
                trial[0],
                trial[1] / self.depth,
                max_norm(&trial_r)
            );
            u = trial;
            r = trial_r;
        }

        if max_norm(&r) < self.settings.tolerance {
            return Ok(self.converged(u, max_iterations));
        }
        let (rn, rm) = self.physical_residual(r);
        Err(SectionError::convergence_failure(analysis, max_iterations, rn, rm))
    }

    /// Solve for `e0` at a fixed curvature `k`; only the axial force is
    /// balanced.
    pub fn solve_axial(&self, analysis: &str, k: f64, guess_e0: f64, max_iterations: usize) -> SectionResult<Equilibrium> {
        let h = self.settings.perturbation;
        let ks = k * self.depth;
        let residual = |e0: f64| self.residual([e0, ks])[0];
        let mut e0 = guess_e0;
        let mut r = residual(e0);
        let mut progress = Progress::default();

        for iteration in 0..max_iterations {
            if !r.is_finite() {
                return Err(SectionError::unstable("non-finite section response"));
            }
            if r.abs() < self.settings.tolerance {
                return Ok(self.equilibrium(StrainPlane::new(e0, k), iteration));
            }

            let slope = (residual(e0 + h) - residual(e0 - h)) / (2.0 * h);
            if !(slope.abs() > MIN_AXIAL_STIFFNESS) || !slope.is_finite() {
                return Err(SectionError::unstable(format!(
                    "zero axial stiffness at e0 = {e0:.4e}, k = {k:.4e}"
                )));
            }
            let mut step = [-r / slope];
            self.clamp_step(&mut step);

            let (trial, trial_r) = self.line_search(&[r], |alpha| {
                let t = e0 + alpha * step[0];
                (t, [residual(t)])
            });
            self.check_strain_limit(&StrainPlane::new(trial, k))?;
            if progress.stalled(r.abs(), trial_r[0].abs()) {
                return Err(SectionError::unstable(format!(
                    "no equilibrium at k = {k:.4e}: residual stalled at N = {:.4e} N",
                    trial_r[0] * self.force_scale
                )));
            }

            debug!(
                "{analysis} k = {k:.6e} iteration {}: e0 = {trial:.6e}, |r| = {:.3e}",
                iteration + 1,
                trial_r[0].abs()
            );
            e0 = trial;
            r = trial_r[0];
        }

        if r.abs() < self.settings.tolerance {
            return Ok(self.equilibrium(StrainPlane::new(e0, k), max_iterations));
        }
        Err(SectionError::convergence_failure(
            analysis,
            max_iterations,
            r * self.force_scale,
            0.0,
        ))
    }

    /// Balance the axial force alone on a section whose fibers share one
    /// height. The moment is already in equilibrium and has to stay there.
    fn solve_flat(
        &self,
        analysis: &str,
        u: [f64; 2],
        iteration: usize,
        max_iterations: usize,
    ) -> SectionResult<Equilibrium> {
        let k = u[1] / self.depth;
        let state = self.solve_axial(analysis, k, u[0], max_iterations - iteration)?;
        let r = self.residual([state.plane.e0, k * self.depth]);
        if max_norm(&r) >= self.settings.tolerance {
            return Err(SectionError::unstable(format!(
                "section has no bending stiffness, moment residual {:.4e} Nm",
                self.physical_residual(r).1
            )));
        }
        Ok(Equilibrium {
            iterations: iteration + state.iterations,
            ..state
        })
    }

    /// Halve the step until the residual norm drops. The last trial is
    /// kept when none does.
    fn line_search<T, const N: usize>(
        &self,
        current: &[f64; N],
        mut trial_at: impl FnMut(f64) -> (T, [f64; N]),
    ) -> (T, [f64; N]) {
        let reference = two_norm(current);
        let mut alpha = 1.0;
        let mut trial = trial_at(alpha);
        for _ in 0..self.settings.line_search_steps {
            if two_norm(&trial.1) < reference {
                break;
            }
            alpha *= 0.5;
            trial = trial_at(alpha);
        }
        trial
    }

    fn converged(&self, u: [f64; 2], iterations: usize) -> Equilibrium {
        self.equilibrium(self.plane(u), iterations)
    }

    fn equilibrium(&self, plane: StrainPlane, iterations: usize) -> Equilibrium {
        Equilibrium {
            plane,
            forces: self.forces(&plane),
            iterations,
        }
    }
}

/// Counts consecutive iterations that failed to cut the residual.
#[derive(Debug, Default)]
struct Progress {
    stalled: usize,
}

impl Progress {
    /// Record one accepted step; true once the residual has stopped dropping.
    fn stalled(&mut self, before: f64, after: f64) -> bool {
        if after < STALL_REDUCTION * before {
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.stalled >= STALL_ITERATIONS
    }
}

fn max_norm(r: &[f64]) -> f64 {
    r.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

fn two_norm(r: &[f64]) -> f64 {
    r.iter().map(|v| v * v).sum::<f64>().sqrt()
}
