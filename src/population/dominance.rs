//! Pareto dominance
//!
//! All comparisons are in minimization space. Feasibility is compared before
//! objective values.

/// `a` dominates `b`: no worse in every objective and strictly better in one
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b.iter()) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Dominance with constraint handling
///
/// A feasible row dominates any infeasible row. Between two infeasible rows
/// the smaller violation dominates, and equal violations leave both
/// incomparable regardless of objective values.
pub fn constrained_dominates(a: &[f64], violation_a: f64, b: &[f64], violation_b: f64) -> bool {
    let feasible_a = violation_a <= 0.0;
    let feasible_b = violation_b <= 0.0;
    match (feasible_a, feasible_b) {
        (true, true) => dominates(a, b),
        (true, false) => true,
        (false, true) => false,
        (false, false) => violation_a < violation_b,
    }
}

/// For each row, whether no other row dominates it
pub fn non_dominated_mask(fitness: &[Vec<f64>], violations: &[f64]) -> Vec<bool> {
    let n = fitness.len();
    (0..n)
        .map(|i| {
            !(0..n).any(|j| {
                j != i && constrained_dominates(&fitness[j], violations[j], &fitness[i], violations[i])
            })
        })
        .collect()
}

/// Fast non-dominated sort
///
/// Returns fronts where `fronts[0]` holds the rows of [`non_dominated_mask`].
/// Row indices within a front are ascending.
pub fn non_dominated_fronts(fitness: &[Vec<f64>], violations: &[f64]) -> Vec<Vec<usize>> {
    let n = fitness.len();
    if n == 0 {
        return vec![];
    }

    // domination_count[i] = number of rows that dominate i
    let mut domination_count = vec![0usize; n];
    // dominated_set[i] = rows that i dominates
    let mut dominated_set: Vec<Vec<usize>> = vec![vec![]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if constrained_dominates(&fitness[i], violations[i], &fitness[j], violations[j]) {
                dominated_set[i].push(j);
                domination_count[j] += 1;
            } else if constrained_dominates(&fitness[j], violations[j], &fitness[i], violations[i])
            {
                dominated_set[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut fronts: Vec<Vec<usize>> = vec![];
    let mut current_front: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    while !current_front.is_empty() {
        let mut next_front = vec![];
        for &i in &current_front {
            for &j in &dominated_set[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next_front.push(j);
                }
            }
        }
        next_front.sort_unstable();
        fronts.push(current_front);
        current_front = next_front;
    }

    fronts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominates() {
        assert!(dominates(&[1.0, 2.0], &[2.0, 3.0]));
        assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
        assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
        assert!(!dominates(&[1.0, 3.0], &[2.0, 2.0]));
    }

    #[test]
    fn test_feasible_beats_infeasible() {
        // Objectively worse but feasible
        assert!(constrained_dominates(&[9.0, 9.0], 0.0, &[0.0, 0.0], 0.1));
        assert!(!constrained_dominates(&[0.0, 0.0], 0.1, &[9.0, 9.0], 0.0));
    }

    #[test]
    fn test_infeasible_compared_by_violation() {
        assert!(constrained_dominates(&[9.0, 9.0], 1.0, &[0.0, 0.0], 2.0));
        assert!(!constrained_dominates(&[0.0, 0.0], 2.0, &[9.0, 9.0], 1.0));
        // Equal violation: objectives do not matter
        assert!(!constrained_dominates(&[0.0, 0.0], 1.0, &[9.0, 9.0], 1.0));
    }

    #[test]
    fn test_non_dominated_mask() {
        let fitness = vec![
            vec![1.0, 4.0],
            vec![2.0, 2.0],
            vec![3.0, 3.0],
            vec![4.0, 1.0],
        ];
        let mask = non_dominated_mask(&fitness, &[0.0; 4]);
        assert_eq!(mask, vec![true, true, false, true]);
    }

    #[test]
    fn test_duplicates_are_both_non_dominated() {
        let fitness = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        assert_eq!(non_dominated_mask(&fitness, &[0.0, 0.0]), vec![true, true]);
    }

    #[test]
    fn test_non_dominated_fronts() {
        let fitness = vec![
            vec![1.0, 5.0], // front 0
            vec![2.0, 3.0], // front 0
            vec![3.0, 4.0], // front 1
            vec![4.0, 1.0], // front 0
            vec![5.0, 5.0], // front 2
        ];
        let fronts = non_dominated_fronts(&fitness, &[0.0; 5]);
        assert_eq!(fronts, vec![vec![0, 1, 3], vec![2], vec![4]]);

        let mask = non_dominated_mask(&fitness, &[0.0; 5]);
        let front0: Vec<usize> = (0..5).filter(|&i| mask[i]).collect();
        assert_eq!(fronts[0], front0);
    }

    #[test]
    fn test_fronts_with_infeasible_rows() {
        let fitness = vec![vec![0.0, 0.0], vec![5.0, 5.0], vec![1.0, 1.0]];
        let violations = [2.0, 0.0, 1.0];
        let fronts = non_dominated_fronts(&fitness, &violations);
        assert_eq!(fronts, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_empty() {
        assert!(non_dominated_fronts(&[], &[]).is_empty());
        assert!(non_dominated_mask(&[], &[]).is_empty());
    }
}
