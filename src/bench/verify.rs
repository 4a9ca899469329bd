//! Output checks for every benchmark case
//!
//! Runs each case once and compares its output buffer against the arithmetic
//! the case claims to perform. Timings are meaningless if a representation is
//! quietly computing something else.

use serde::Serialize;
use tracing::{debug, warn};

use super::cases::{BenchCase, Representation, Section};
use crate::core::{BenchConfig, BenchResult};
use crate::workload::{Buffers, Workload};

/// Relative tolerance for single-precision results.
const EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, Copy)]
enum Slot {
    X,
    X2,
    Y,
}

/// Check result for one case.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOutcome {
    pub name: &'static str,
    pub section: Section,
    pub checked: usize,
    /// First mismatching element, if any
    pub failure: Option<String>,
}

impl VerifyOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Build a workload from `config`, run every given case once and check it.
pub fn verify_cases(
    config: &BenchConfig,
    cases: &[&BenchCase],
) -> BenchResult<Vec<VerifyOutcome>> {
    config.validate()?;
    let mut workload = Workload::new(config)?;

    let outcomes = cases
        .iter()
        .map(|case| {
            (case.run)(&mut workload);
            let outcome = check_case(&workload, case);
            match &outcome.failure {
                Some(msg) => warn!(case = case.name, "Verification failed: {}", msg),
                None => debug!(case = case.name, checked = outcome.checked, "Verified"),
            }
            outcome
        })
        .collect();

    Ok(outcomes)
}

/// Check a case whose output has already been written into `workload`.
pub fn check_case(workload: &Workload, case: &BenchCase) -> VerifyOutcome {
    let x = components(workload, case.repr, Slot::X);
    let y = components(workload, case.repr, Slot::Y);
    let k = workload.scale as f64;

    let failure = match case.section {
        Section::Scale => first_mismatch(&x, &y, |xi, _| xi.iter().map(|c| c * k).collect()),
        Section::Add | Section::Add2d => {
            let x2 = components(workload, case.repr, Slot::X2);
            first_mismatch(&x, &y, |xi, i| {
                xi.iter().zip(&x2[i]).map(|(a, b)| a + b).collect()
            })
        }
        Section::Normalize => x.iter().zip(&y).enumerate().find_map(|(i, (xi, yi))| {
            if xi.iter().all(|&c| c == 0.0) {
                return None;
            }
            let norm = yi.iter().map(|c| c * c).sum::<f64>().sqrt();
            ((norm - 1.0).abs() > EPSILON)
                .then(|| format!("element {}: |y| = {:.9}, expected 1", i, norm))
        }),
    };

    VerifyOutcome {
        name: case.name,
        section: case.section,
        checked: x.len(),
        failure,
    }
}

fn first_mismatch<F>(x: &[Vec<f64>], y: &[Vec<f64>], expected: F) -> Option<String>
where
    F: Fn(&[f64], usize) -> Vec<f64>,
{
    if x.len() != y.len() {
        return Some(format!("output has {} elements, input has {}", y.len(), x.len()));
    }
    x.iter().zip(y).enumerate().find_map(|(i, (xi, yi))| {
        let want = expected(xi, i);
        want.iter().zip(yi).enumerate().find_map(|(j, (w, got))| {
            let tol = EPSILON * w.abs().max(1.0);
            ((w - got).abs() > tol)
                .then(|| format!("element {} component {}: got {}, expected {}", i, j, got, w))
        })
    })
}

/// Logical components of every vector in one buffer, widened to f64.
fn components(w: &Workload, repr: Representation, slot: Slot) -> Vec<Vec<f64>> {
    fn pick<T>(b: &Buffers<T>, slot: Slot) -> &[T] {
        match slot {
            Slot::X => &b.x,
            Slot::X2 => &b.x2,
            Slot::Y => &b.y,
        }
    }
    let widen = |v: &[f32]| v.iter().map(|&c| c as f64).collect::<Vec<f64>>();

    match repr {
        Representation::MyVec => {
            pick(&w.my_vec, slot).iter().map(|v| widen(&v.to_array())).collect()
        }
        Representation::NaVector4 => {
            pick(&w.na_vec4, slot).iter().map(|v| widen(v.as_slice())).collect()
        }
        Representation::Float4 => pick(&w.float4, slot).iter().map(|v| widen(&v.0)).collect(),
        Representation::Wide => pick(&w.wide, slot).iter().map(|v| widen(&v.0[..4])).collect(),
        Representation::FlatArray => pick(&w.flat, slot).chunks_exact(4).map(widen).collect(),
        Representation::NdArray => {
            let m = match slot {
                Slot::X => &w.matrix.x,
                Slot::X2 => &w.matrix.x2,
                Slot::Y => &w.matrix.y,
            };
            m.rows()
                .into_iter()
                .map(|row| row.iter().map(|&c| c as f64).collect::<Vec<f64>>())
                .collect()
        }
        Representation::MyVec2d => {
            pick(&w.my_vec2d, slot).iter().map(|v| v.to_array().to_vec()).collect()
        }
        Representation::NaVector2d => {
            pick(&w.na_vec2d, slot).iter().map(|v| v.as_slice().to_vec()).collect()
        }
        Representation::Wide2d => pick(&w.wide2d, slot).iter().map(|v| v.0[..2].to_vec()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::cases::{self, CASES};

    fn config() -> BenchConfig {
        BenchConfig { array_size: 128, ..Default::default() }
    }

    #[test]
    fn test_every_case_verifies() {
        let outcomes = verify_cases(&config(), &cases::select(None)).unwrap();
        assert_eq!(outcomes.len(), CASES.len());
        for outcome in outcomes {
            assert!(outcome.passed(), "{}: {:?}", outcome.name, outcome.failure);
            assert_eq!(outcome.checked, 128);
        }
    }

    #[test]
    fn test_full_size_workload_verifies() {
        let selected = cases::select(Some("2dadd"));
        let outcomes = verify_cases(&BenchConfig::default(), &selected).unwrap();
        assert!(outcomes.iter().all(|o| o.passed() && o.checked == 16384));
    }

    #[test]
    fn test_detects_wrong_output() {
        let mut w = Workload::new(&config()).unwrap();
        let case = cases::select(Some("MyVecAdd"))[0];
        (case.run)(&mut w);
        w.my_vec.y[3].z += 1.0;

        let outcome = check_case(&w, case);
        let msg = outcome.failure.expect("tampered output must fail");
        assert!(msg.contains("element 3 component 2"));
    }

    #[test]
    fn test_unrun_normalize_fails() {
        let w = Workload::new(&config()).unwrap();
        let case = cases::select(Some("Float4Norm"))[0];
        assert!(!check_case(&w, case).passed());
    }

    #[test]
    fn test_zero_input_skipped_by_normalize() {
        let mut w = Workload::new(&config()).unwrap();
        w.my_vec.x[0] = crate::vectors::Vec4::default();
        let case = cases::select(Some("MyVecNorm"))[0];
        (case.run)(&mut w);
        assert!(check_case(&w, case).passed());
    }
}
