use crate::{Node, Partition, WeightedGraph};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum InitialPartitioningMethod {
    /// Vertices alternate between the two sides based on their index (idx % 2).
    Modulo,
    /// Vertices are put on a random side.
    Random,
    /// The first half of the vertices reached by breadth first search goes to side A.
    Bfs,
}

pub(crate) fn divide_round_up(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

/// Returns a two-sided starting assignment (`false` = side A, `true` = side B).
/// For graphs with at least two vertices both sides are non-empty.
pub fn initial_assignment(
    graph: &WeightedGraph,
    method: InitialPartitioningMethod,
    rng: &mut StdRng,
) -> Vec<bool> {
    let n = graph.node_count();
    let mut assignment: Vec<bool> = match method {
        InitialPartitioningMethod::Modulo => (0..n).map(|i| i % 2 == 1).collect(),
        InitialPartitioningMethod::Random => (0..n).map(|_| rng.gen_bool(0.5)).collect(),
        InitialPartitioningMethod::Bfs => {
            let mut assignment = vec![true; n];
            let target_size = divide_round_up(n, 2);

            let mut visited = vec![false; n];
            let mut taken = 0;
            let mut queue = VecDeque::new();
            while taken < target_size {
                let Some(start) = visited.iter().position(|v| !v) else {
                    break;
                };
                queue.clear();
                queue.push_back(start);
                visited[start] = true;

                while let Some(vx) = queue.pop_front() {
                    assignment[vx] = false;
                    taken += 1;
                    if taken >= target_size {
                        break;
                    }
                    for e in graph.neighbors(vx).iter() {
                        if !visited[e.dst] {
                            visited[e.dst] = true;
                            queue.push_back(e.dst);
                        }
                    }
                }
            }
            log::trace!("bfs placed {taken} of {n} vertices on side A");
            assignment
        }
    };

    if n >= 2 {
        // Random draws can land everything on one side.
        if assignment.iter().all(|&side| side) {
            assignment[0] = false;
        } else if assignment.iter().all(|&side| !side) {
            assignment[0] = true;
        }
    }
    assignment
}

/// Splits an assignment into (side A, side B), each in ascending node order.
pub fn groups_from_assignment(assignment: &[bool]) -> (Partition, Partition) {
    let mut group_a = Vec::new();
    let mut group_b = Vec::new();
    for (node, &side) in assignment.iter().enumerate() {
        if side {
            group_b.push(node);
        } else {
            group_a.push(node);
        }
    }
    (group_a, group_b)
}

/// Interprets bit `i` of `bits` as the side of node `i`.
pub fn assignment_from_bits(bits: u64, node_count: usize) -> Vec<bool> {
    (0..node_count).map(|i| (bits >> i) & 1 == 1).collect()
}

/// Inverse of [`groups_from_assignment`]. Nodes listed in neither group stay on side A.
pub fn assignment_from_groups(node_count: usize, group_b: &[Node]) -> Vec<bool> {
    let mut assignment = vec![false; node_count];
    for &n in group_b.iter() {
        if n < node_count {
            assignment[n] = true;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn path(n: usize) -> WeightedGraph {
        WeightedGraph::new(n, (1..n).map(|i| (i - 1, i, 1.0))).unwrap()
    }

    #[test]
    fn test_divide_round_up() {
        assert_eq!(divide_round_up(7, 2), 4);
        assert_eq!(divide_round_up(8, 2), 4);
    }

    #[test]
    fn test_initial_assignment_is_two_sided() {
        let graph = path(6);
        let mut rng = StdRng::seed_from_u64(7);
        for method in [
            InitialPartitioningMethod::Modulo,
            InitialPartitioningMethod::Random,
            InitialPartitioningMethod::Bfs,
        ] {
            let assignment = initial_assignment(&graph, method, &mut rng);
            assert_eq!(assignment.len(), 6);
            assert!(assignment.iter().any(|&s| s));
            assert!(assignment.iter().any(|&s| !s));
        }
    }

    #[test]
    fn test_bfs_takes_a_connected_half() {
        let graph = path(5);
        let mut rng = StdRng::seed_from_u64(0);
        let assignment = initial_assignment(&graph, InitialPartitioningMethod::Bfs, &mut rng);
        assert_eq!(assignment, vec![false, false, false, true, true]);
    }

    #[test]
    fn test_bits_and_groups() {
        let assignment = assignment_from_bits(0b0110, 4);
        assert_eq!(assignment, vec![false, true, true, false]);
        let (a, b) = groups_from_assignment(&assignment);
        assert_eq!(a, vec![0, 3]);
        assert_eq!(b, vec![1, 2]);
        assert_eq!(assignment_from_groups(4, &b), assignment);
    }
}
