//! Minimum-cost assignment for header mapping.
//!
//! Hand-written O(n³) Hungarian algorithm (potentials formulation) so the
//! header mapper finds the globally optimal column-to-field assignment
//! instead of a greedy first-come matching.

/// Cost charged for pairing with a padding row/column when the matrix is
/// rectangular. Constant, so padding never skews the choice among real cells.
const PAD_COST: f64 = 1.0;

/// Solves the minimum-cost assignment over a rectangular cost matrix.
///
/// `cost[i][j]` is the cost of assigning row `i` to column `j`. Returns one
/// entry per row: the assigned column, or `None` when the row was matched to
/// a padding column (more rows than columns). Each real column is used at
/// most once.
pub fn minimum_cost_assignment(cost: &[Vec<f64>]) -> Vec<Option<usize>> {
    let rows = cost.len();
    if rows == 0 {
        return Vec::new();
    }
    let cols = cost[0].len();
    if cols == 0 {
        return vec![None; rows];
    }

    let n = rows.max(cols);
    let at = |i: usize, j: usize| -> f64 {
        if i < rows && j < cols {
            cost[i][j]
        } else {
            PAD_COST
        }
    };

    // Potentials formulation, 1-indexed internally.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut assigned_row = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        assigned_row[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = assigned_row[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = at(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[assigned_row[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if assigned_row[j0] == 0 {
                break;
            }
        }

        // Walk the augmenting path back.
        loop {
            let j1 = way[j0];
            assigned_row[j0] = assigned_row[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut result = vec![None; rows];
    for j in 1..=n {
        let i = assigned_row[j];
        if i >= 1 && i <= rows && j <= cols {
            result[i - 1] = Some(j - 1);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_cost(cost: &[Vec<f64>], assignment: &[Option<usize>]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.map(|j| cost[i][j]))
            .sum()
    }

    #[test]
    fn test_identity_matrix_prefers_diagonal() {
        let cost = vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ];
        let assignment = minimum_cost_assignment(&cost);
        assert_eq!(assignment, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_beats_greedy_choice() {
        // Greedy takes (0,0)=1 then forces (1,1)=10 for total 11.
        // Optimal is (0,1)=2 and (1,0)=2 for total 4.
        let cost = vec![vec![1.0, 2.0], vec![2.0, 10.0]];
        let assignment = minimum_cost_assignment(&cost);
        assert_eq!(assignment, vec![Some(1), Some(0)]);
        assert_eq!(total_cost(&cost, &assignment), 4.0);
    }

    #[test]
    fn test_rectangular_more_rows_than_columns() {
        let cost = vec![vec![0.9], vec![0.1], vec![0.5]];
        let assignment = minimum_cost_assignment(&cost);
        assert_eq!(assignment[1], Some(0));
        assert_eq!(assignment[0], None);
        assert_eq!(assignment[2], None);
    }

    #[test]
    fn test_rectangular_more_columns_than_rows() {
        let cost = vec![vec![0.7, 0.2, 0.9]];
        let assignment = minimum_cost_assignment(&cost);
        assert_eq!(assignment, vec![Some(1)]);
    }

    #[test]
    fn test_empty_matrix() {
        assert!(minimum_cost_assignment(&[]).is_empty());
    }

    #[test]
    fn test_known_4x4_optimum() {
        let cost = vec![
            vec![9.0, 2.0, 7.0, 8.0],
            vec![6.0, 4.0, 3.0, 7.0],
            vec![5.0, 8.0, 1.0, 8.0],
            vec![7.0, 6.0, 9.0, 4.0],
        ];
        let assignment = minimum_cost_assignment(&cost);
        // Known optimum: 2 + 6 + 1 + 4 = 13.
        assert_eq!(total_cost(&cost, &assignment), 13.0);
    }
}
