//! Hypervolume indicator
//!
//! WFG exclusive-hypervolume recursion (While, Bradstreet & Barone 2012) with
//! a sweep-line base case for two objectives. Points are in minimization
//! space; only points strictly better than the reference point in every
//! objective contribute.

use super::dominance::dominates;

/// Volume of the region dominated by `points` and bounded by `reference`
pub fn hypervolume(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let inside: Vec<Vec<f64>> = points
        .iter()
        .filter(|p| p.len() == reference.len() && p.iter().zip(reference).all(|(x, r)| x < r))
        .cloned()
        .collect();
    wfg(non_dominated(inside), reference)
}

fn wfg(mut front: Vec<Vec<f64>>, reference: &[f64]) -> f64 {
    if front.is_empty() {
        return 0.0;
    }
    match reference.len() {
        1 => {
            let best = front.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
            reference[0] - best
        }
        2 => sweep_2d(&mut front, reference),
        _ => {
            // Processing in order of the last objective keeps limit sets small
            front.sort_by(|a, b| b[b.len() - 1].total_cmp(&a[a.len() - 1]));
            (0..front.len())
                .map(|i| exclusive(&front[i], &front[i + 1..], reference))
                .sum()
        }
    }
}

fn exclusive(point: &[f64], rest: &[Vec<f64>], reference: &[f64]) -> f64 {
    let limited: Vec<Vec<f64>> = rest
        .iter()
        .map(|q| q.iter().zip(point).map(|(a, b)| a.max(*b)).collect())
        .collect();
    inclusive(point, reference) - wfg(non_dominated(limited), reference)
}

fn inclusive(point: &[f64], reference: &[f64]) -> f64 {
    point.iter().zip(reference).map(|(p, r)| r - p).product()
}

fn sweep_2d(front: &mut [Vec<f64>], reference: &[f64]) -> f64 {
    front.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    let mut volume = 0.0;
    let mut ceiling = reference[1];
    for p in front.iter() {
        if p[1] < ceiling {
            volume += (reference[0] - p[0]) * (ceiling - p[1]);
            ceiling = p[1];
        }
    }
    volume
}

// Drops dominated points and repeated copies
fn non_dominated(points: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    let mut kept: Vec<Vec<f64>> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let dominated = points.iter().any(|q| dominates(q, p));
        let repeated = points[..i].iter().any(|q| q == p);
        if !dominated && !repeated {
            kept.push(p.clone());
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_point() {
        assert_relative_eq!(hypervolume(&[vec![0.0, 0.0, 0.0]], &[1.0, 1.0, 1.0]), 1.0);
        assert_relative_eq!(hypervolume(&[vec![0.5, 0.25]], &[1.0, 1.0]), 0.375);
    }

    #[test]
    fn test_two_objectives() {
        let points = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert_relative_eq!(hypervolume(&points, &[3.0, 3.0]), 3.0);
    }

    #[test]
    fn test_three_objectives_overlap() {
        let points = vec![vec![0.0, 0.0, 0.5], vec![0.5, 0.5, 0.0]];
        assert_relative_eq!(hypervolume(&points, &[1.0, 1.0, 1.0]), 0.625, epsilon = 1e-12);
    }

    #[test]
    fn test_four_objectives_matches_inclusion_exclusion() {
        let points = vec![vec![0.0, 0.5, 0.5, 0.5], vec![0.5, 0.0, 0.5, 0.5]];
        // 0.125 + 0.125 - 0.0625
        assert_relative_eq!(hypervolume(&points, &[1.0; 4]), 0.1875, epsilon = 1e-12);
    }

    #[test]
    fn test_dominated_and_duplicate_points_ignored() {
        let base = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        let mut noisy = base.clone();
        noisy.push(vec![2.5, 2.5]);
        noisy.push(vec![1.0, 2.0]);
        assert_relative_eq!(hypervolume(&noisy, &[3.0, 3.0]), hypervolume(&base, &[3.0, 3.0]));

        let points = vec![vec![0.5, 0.5, 0.5], vec![0.5, 0.5, 0.5]];
        assert_relative_eq!(hypervolume(&points, &[1.0; 3]), 0.125);
    }

    #[test]
    fn test_points_outside_reference_ignored() {
        let points = vec![vec![4.0, 0.0], vec![3.0, 1.0]];
        assert_eq!(hypervolume(&points, &[3.0, 3.0]), 0.0);
        assert_eq!(hypervolume(&[], &[1.0, 1.0]), 0.0);
    }
}
