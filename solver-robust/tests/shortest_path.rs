//! Robust shortest paths against enumeration of simple paths.

use solver_mip::{MipSettings, MipStatus};
use solver_robust::owa::owa_value;
use solver_robust::{data, shortest_paths, solve_path, PathCriterion, PathInstance};

/// All simple source-to-sink paths as arc lists.
fn simple_paths(inst: &PathInstance) -> Vec<Vec<usize>> {
    fn walk(inst: &PathInstance, node: usize, seen: &mut Vec<bool>, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if node == inst.sink() {
            out.push(path.clone());
            return;
        }
        for (a, arc) in inst.arcs().iter().enumerate() {
            if arc.from == node && !seen[arc.to] {
                seen[arc.to] = true;
                path.push(a);
                walk(inst, arc.to, seen, path, out);
                path.pop();
                seen[arc.to] = false;
            }
        }
    }

    let mut seen = vec![false; inst.num_nodes()];
    seen[inst.source()] = true;
    let mut out = Vec::new();
    walk(inst, inst.source(), &mut seen, &mut Vec::new(), &mut out);
    out
}

fn brute_min(inst: &PathInstance, f: impl Fn(&[f64]) -> f64) -> f64 {
    simple_paths(inst)
        .iter()
        .map(|p| f(&inst.path_costs(p)))
        .fold(f64::INFINITY, f64::min)
}

fn regrets(optima: &[f64], costs: &[f64]) -> Vec<f64> {
    costs.iter().zip(optima).map(|(c, z)| c - z).collect()
}

fn worst(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[test]
fn test_instance_1_scenario_paths() {
    let inst = data::path_instance_1().unwrap();
    assert_eq!(simple_paths(&inst).len(), 7);

    let results = shortest_paths(&inst, &MipSettings::default()).unwrap();
    assert_eq!(results[0].route(), "a -> b -> d -> f");
    assert!((results[0].objective - 8.0).abs() < 1e-6);
    assert_eq!(results[1].route(), "a -> c -> d -> f");
    assert!((results[1].objective - 4.0).abs() < 1e-6);

    for (s, r) in results.iter().enumerate() {
        assert!((r.objective - brute_min(&inst, |c| c[s])).abs() < 1e-6);
        assert_eq!(r.status, MipStatus::Optimal);
    }
}

#[test]
fn test_instance_1_robust_criteria() {
    let inst = data::path_instance_1().unwrap();
    let settings = MipSettings::default();

    let r = solve_path(&inst, &PathCriterion::Maximin, &settings).unwrap();
    assert_eq!(r.route(), "a -> b -> d -> f");
    assert!((r.objective - 9.0).abs() < 1e-6);
    assert!((r.max_cost() - brute_min(&inst, worst)).abs() < 1e-6);

    let r = solve_path(&inst, &PathCriterion::MinimaxRegret, &settings).unwrap();
    assert_eq!(r.route(), "a -> b -> e -> f");
    assert!((r.objective - 3.0).abs() < 1e-6);
    assert_eq!(r.scenario_costs, vec![11.0, 7.0]);
    for regret in r.regrets.unwrap() {
        assert!((regret - 3.0).abs() < 1e-6);
    }

    let r = solve_path(&inst, &PathCriterion::WeightedSum(vec![2.0, 1.0]), &settings).unwrap();
    assert!((r.objective - 25.0).abs() < 1e-6);
}

#[test]
fn test_instance_1_owa_sweep() {
    let inst = data::path_instance_1().unwrap();
    let settings = MipSettings::default();
    let optima = [8.0, 4.0];

    for (weights, (owa, owa_regret)) in data::owa_sweep()
        .into_iter()
        .zip([(26.0, 9.0), (44.0, 15.0), (80.0, 27.0), (152.0, 51.0)])
    {
        let r = solve_path(&inst, &PathCriterion::Owa(weights.clone()), &settings).unwrap();
        assert_eq!(r.route(), "a -> b -> d -> f");
        assert!((r.objective - owa).abs() < 1e-6);
        assert!((brute_min(&inst, |c| owa_value(&weights, c)) - owa).abs() < 1e-9);

        let r = solve_path(&inst, &PathCriterion::MinOwaRegret(weights.clone()), &settings).unwrap();
        assert_eq!(r.route(), "a -> b -> e -> f");
        assert!((r.objective - owa_regret).abs() < 1e-6);
        assert!((brute_min(&inst, |c| owa_value(&weights, &regrets(&optima, c))) - owa_regret).abs() < 1e-9);
    }
}

#[test]
fn test_instance_2_criteria() {
    let inst = data::path_instance_2().unwrap();
    let settings = MipSettings::default();

    let results = shortest_paths(&inst, &settings).unwrap();
    assert_eq!(results[0].route(), "a -> d -> c -> f -> g");
    assert!((results[0].objective - 5.0).abs() < 1e-6);
    assert_eq!(results[1].route(), "a -> c -> e -> g");
    assert!((results[1].objective - 6.0).abs() < 1e-6);

    let r = solve_path(&inst, &PathCriterion::Maximin, &settings).unwrap();
    assert_eq!(r.route(), "a -> b -> e -> g");
    assert!((r.objective - 10.0).abs() < 1e-6);

    let r = solve_path(&inst, &PathCriterion::MinimaxRegret, &settings).unwrap();
    assert_eq!(r.route(), "a -> b -> e -> g");
    assert!((r.objective - 5.0).abs() < 1e-6);

    // three paths tie at 30 for [2, 1]
    let r = solve_path(&inst, &PathCriterion::Owa(vec![2.0, 1.0]), &settings).unwrap();
    assert!((r.objective - 30.0).abs() < 1e-6);
    assert!((owa_value(&[2.0, 1.0], &r.scenario_costs) - 30.0).abs() < 1e-6);

    let r = solve_path(&inst, &PathCriterion::MinOwaRegret(vec![2.0, 1.0]), &settings).unwrap();
    assert_eq!(r.route(), "a -> d -> f -> g");
    assert!((r.objective - 13.0).abs() < 1e-6);

    let r = solve_path(&inst, &PathCriterion::WeightedSum(vec![2.0, 1.0]), &settings).unwrap();
    assert!((r.objective - 23.0).abs() < 1e-6);
}

#[test]
fn test_instance_2_matches_enumeration() {
    let inst = data::path_instance_2().unwrap();
    let settings = MipSettings::default();
    let optima = [5.0, 6.0];

    for weights in data::owa_sweep() {
        let r = solve_path(&inst, &PathCriterion::Owa(weights.clone()), &settings).unwrap();
        assert!((r.objective - brute_min(&inst, |c| owa_value(&weights, c))).abs() < 1e-6);

        let r = solve_path(&inst, &PathCriterion::MinOwaRegret(weights.clone()), &settings).unwrap();
        let best = brute_min(&inst, |c| owa_value(&weights, &regrets(&optima, c)));
        assert!((r.objective - best).abs() < 1e-6);
    }
}

#[test]
fn test_path_arcs_connect_source_to_sink() {
    let inst = data::path_instance_2().unwrap();
    let r = solve_path(&inst, &PathCriterion::Maximin, &MipSettings::default()).unwrap();

    let arcs = inst.arcs();
    assert_eq!(arcs[r.arcs[0]].from, inst.source());
    assert_eq!(arcs[*r.arcs.last().unwrap()].to, inst.sink());
    for pair in r.arcs.windows(2) {
        assert_eq!(arcs[pair[0]].to, arcs[pair[1]].from);
    }
    assert_eq!(r.nodes.len(), r.arcs.len() + 1);
}
