//! Bundled example instances.

use crate::error::RobustResult;
use crate::instance::{PathInstance, ProjectInstance};

/// Default OWA weights for two-scenario examples.
pub const DEFAULT_OWA_WEIGHTS: [f64; 2] = [2.0, 1.0];

/// `k` values of the `[k, 1]` OWA weight sweep.
pub const OWA_SWEEP_K: [f64; 4] = [2.0, 4.0, 8.0, 16.0];

/// `[k, 1]` weight vectors of the sweep.
pub fn owa_sweep() -> Vec<Vec<f64>> {
    OWA_SWEEP_K.iter().map(|&k| vec![k, 1.0]).collect()
}

/// Ten projects, two opposed scenarios, budget 100.
pub fn portfolio_example() -> RobustResult<ProjectInstance> {
    ProjectInstance::new(
        vec![60.0, 10.0, 15.0, 20.0, 25.0, 20.0, 5.0, 15.0, 20.0, 60.0],
        vec![
            vec![70.0, 18.0, 16.0, 14.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0],
            vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 70.0],
        ],
        100.0,
    )
}

/// Six nodes `a..f`, ten arcs, two scenarios, `a` to `f`.
pub fn path_instance_1() -> RobustResult<PathInstance> {
    PathInstance::from_named(
        &["a", "b", "c", "d", "e", "f"],
        &[
            ("a", "b", &[4.0, 3.0]),
            ("a", "c", &[5.0, 1.0]),
            ("b", "c", &[2.0, 1.0]),
            ("b", "d", &[1.0, 4.0]),
            ("b", "e", &[2.0, 2.0]),
            ("b", "f", &[7.0, 5.0]),
            ("c", "d", &[5.0, 1.0]),
            ("c", "e", &[2.0, 7.0]),
            ("d", "f", &[3.0, 2.0]),
            ("e", "f", &[5.0, 2.0]),
        ],
        "a",
        "f",
    )
}

/// Seven nodes `a..g`, twelve arcs, two scenarios, `a` to `g`.
pub fn path_instance_2() -> RobustResult<PathInstance> {
    PathInstance::from_named(
        &["a", "b", "c", "d", "e", "f", "g"],
        &[
            ("a", "b", &[5.0, 3.0]),
            ("a", "c", &[10.0, 4.0]),
            ("a", "d", &[2.0, 6.0]),
            ("b", "c", &[4.0, 2.0]),
            ("b", "d", &[1.0, 3.0]),
            ("b", "e", &[4.0, 6.0]),
            ("c", "e", &[3.0, 1.0]),
            ("c", "f", &[1.0, 2.0]),
            ("d", "c", &[1.0, 4.0]),
            ("d", "f", &[3.0, 5.0]),
            ("e", "g", &[1.0, 1.0]),
            ("f", "g", &[1.0, 1.0]),
        ],
        "a",
        "g",
    )
}
