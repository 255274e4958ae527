use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use crate::error::SearchError;
use crate::grid::{Grid, Point};

/// Topology the search runs over: a node type, weighted moves out of a node,
/// and dense per-node scratch storage.
pub trait Map {
    /// The type that can be used to reference nodes in the map
    type Node: Copy + Eq + 'static;

    /// The type that the map uses for search-local storage
    type Storage<T: Default + Copy + 'static>: MapStorage<T, Node = Self::Node>;

    /// Return an iterator over the neighbors of the provided node and the
    /// cost required to step there
    fn neighbors_of(&self, node: Self::Node) -> impl Iterator<Item = (Self::Node, usize)>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Node: Copy + Eq + 'static;

    fn get(&self, node: Self::Node) -> T;
    fn get_mut(&mut self, node: Self::Node) -> &mut T;
}

/// Best-known way to a node: accumulated cost plus the node it was entered
/// from. `from` is `None` exactly for the start node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reached<R> {
    pub cost: usize,
    pub from: Option<R>,
}

/// A frontier entry. Ordered by cost alone.
#[derive(Debug)]
struct Candidate<R> {
    cost: usize,
    node: R,
}

impl<R> Ord for Candidate<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost.cmp(&other.cost).reverse() // reverse for BinaryHeap to be a min-heap
    }
}

impl<R> PartialOrd for Candidate<R> {
    fn partial_cmp(&self, other: &Candidate<R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> PartialEq for Candidate<R> {
    fn eq(&self, other: &Candidate<R>) -> bool {
        self.cost == other.cost
    }
}

impl<R> Eq for Candidate<R> {}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState<R> {
    Running,
    Exhausted,
    Complete(PathResult<R>),
}

/// Uniform-cost search driven one frontier pop at a time.
///
/// `start` and `goal` must be nodes of the map the finder is stepped with.
/// Costs of reachable cells are strictly positive, so a node's cost is final
/// the first time it is popped unstale.
pub struct PathFinder<M: Map> {
    start: M::Node,
    goal: M::Node,
    visited: M::Storage<Option<Reached<M::Node>>>,
    frontier: BinaryHeap<Candidate<M::Node>>,
    state: SearchState<M::Node>,
}

impl<M: Map> PathFinder<M> {
    pub fn new(
        start: M::Node,
        goal: M::Node,
        mut visited: M::Storage<Option<Reached<M::Node>>>,
    ) -> Self {
        *visited.get_mut(start) = Some(Reached {
            cost: 0,
            from: None,
        });
        Self {
            start,
            goal,
            visited,
            frontier: BinaryHeap::from([Candidate {
                cost: 0,
                node: start,
            }]),
            state: SearchState::Running,
        }
    }

    /// Runs the search to one of its terminal states.
    pub fn finish(mut self, map: &M) -> Result<SearchState<M::Node>, SearchError> {
        loop {
            match self.step(map)? {
                SearchState::Running => {}
                state => return Ok(state),
            }
        }
    }

    /// Processes a single frontier pop.
    pub fn step(&mut self, map: &M) -> Result<SearchState<M::Node>, SearchError> {
        if self.state != SearchState::Running {
            return Ok(self.state.clone());
        }

        let Some(visit) = self.frontier.pop() else {
            self.state = SearchState::Exhausted;
            return Ok(self.state.clone());
        };

        // An entry superseded by a later, cheaper relaxation is stale and is
        // dropped here rather than being removed from the heap on update.
        match self.visited.get(visit.node) {
            Some(reached) if reached.cost < visit.cost => return Ok(self.state.clone()),
            _ => {}
        }

        if visit.node == self.goal {
            let path = reconstruct(&self.visited, self.start, self.goal)?;
            debug!(
                "route found: {} node(s), total cost {}",
                path.len(),
                visit.cost
            );
            self.state = SearchState::Complete(PathResult {
                path,
                start: self.start,
                goal: self.goal,
                total_cost: visit.cost,
            });
            return Ok(self.state.clone());
        }

        for (node, step_cost) in map.neighbors_of(visit.node) {
            let candidate = visit.cost + step_cost;
            let better = match self.visited.get(node) {
                None => true,
                Some(reached) => candidate < reached.cost,
            };
            if better {
                *self.visited.get_mut(node) = Some(Reached {
                    cost: candidate,
                    from: Some(visit.node),
                });
                self.frontier.push(Candidate {
                    cost: candidate,
                    node,
                });
            }
        }

        Ok(self.state.clone())
    }
}

/// Walks the reached records backward from `goal` and returns the node
/// sequence start-to-goal inclusive.
///
/// A node without a record, or without a predecessor before `start` is
/// reached, means the records were not produced by a completed search over
/// the same endpoints; that breaks off with [`SearchError::BrokenTrail`].
pub fn reconstruct<R, S>(visited: &S, start: R, goal: R) -> Result<Vec<R>, SearchError>
where
    R: Copy + Eq + 'static,
    S: MapStorage<Option<Reached<R>>, Node = R>,
{
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        let Some(Reached {
            from: Some(from), ..
        }) = visited.get(current)
        else {
            return Err(SearchError::BrokenTrail);
        };
        path.push(from);
        current = from;
    }

    path.reverse();
    Ok(path)
}

/// Validates the endpoints and runs the search to completion over a maze.
///
/// The total cost of the returned path is the sum of the costs of all entered
/// cells; the start cell's own cost is never charged.
pub fn find_path(grid: &Grid, start: Point, goal: Point) -> Result<PathResult<Point>, SearchError> {
    for point in [start, goal] {
        if !grid.contains(point) {
            return Err(SearchError::OutOfBounds(point));
        }
        if !grid.is_open(point) {
            return Err(SearchError::BlockedEndpoint(point));
        }
    }

    match PathFinder::new(start, goal, grid.create_storage()).finish(grid)? {
        SearchState::Complete(result) => Ok(result),
        _ => Err(SearchError::NoRoute { start, goal }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::CellStorage;

    fn p(row: usize, col: usize) -> Point {
        Point { row, col }
    }

    /// A ring corridor with a closed-off branch in the middle; `center` sets
    /// the cost of the cell at (3, 2) that can open a shortcut through it.
    fn corridor_maze(center: usize) -> Grid {
        Grid::from_costs(
            7,
            7,
            vec![
                vec![0, 0, 0, 0, 0, 0, 0],
                vec![0, 1, 0, 0, 0, 1, 0],
                vec![0, 1, 0, 0, 0, 1, 0],
                vec![0, 1, center, 1, 1, 1, 0],
                vec![0, 1, 0, 1, 0, 0, 0],
                vec![0, 1, 1, 1, 1, 1, 1],
                vec![0, 0, 0, 0, 0, 0, 0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn basic_route() {
        let result = find_path(&corridor_maze(0), p(1, 1), p(1, 5)).unwrap();

        assert_eq!(result.total_cost, 12);
        assert_eq!(result.path.first(), Some(&p(1, 1)));
        assert_eq!(result.path.last(), Some(&p(1, 5)));
    }

    #[test]
    fn shortcut_wins_only_while_cheap() {
        // cheap shortcut through the center
        assert!(matches!(
            find_path(&corridor_maze(2), p(1, 1), p(1, 5)),
            Ok(PathResult { total_cost: 9, .. })
        ));

        // costlier, but still better than the ring
        assert!(matches!(
            find_path(&corridor_maze(4), p(1, 1), p(1, 5)),
            Ok(PathResult { total_cost: 11, .. })
        ));

        // too expensive, the long way around wins again
        assert!(matches!(
            find_path(&corridor_maze(10), p(1, 1), p(1, 5)),
            Ok(PathResult { total_cost: 12, .. })
        ));
    }

    #[test]
    fn two_by_two_costs_two() {
        let grid = Grid::from_costs(2, 2, vec![vec![1, 1], vec![1, 1]]).unwrap();

        let result = find_path(&grid, p(0, 0), p(1, 1)).unwrap();

        assert_eq!(result.path.len(), 3);
        assert_eq!(result.total_cost, 2);
        assert_eq!(result.path.first(), Some(&p(0, 0)));
        assert_eq!(result.path.last(), Some(&p(1, 1)));
    }

    #[test]
    fn blocked_corridor_has_no_route() {
        let grid = Grid::from_costs(1, 3, vec![vec![1, 0, 1]]).unwrap();

        assert_eq!(
            find_path(&grid, p(0, 0), p(0, 2)),
            Err(SearchError::NoRoute {
                start: p(0, 0),
                goal: p(0, 2),
            })
        );
    }

    #[test]
    fn walled_off_region_has_no_route() {
        let grid =
            Grid::from_costs(3, 3, vec![vec![1, 0, 1], vec![0, 0, 1], vec![1, 1, 1]]).unwrap();

        assert!(matches!(
            find_path(&grid, p(0, 0), p(2, 2)),
            Err(SearchError::NoRoute { .. })
        ));
    }

    #[test]
    fn wall_endpoints_are_rejected_up_front() {
        let grid = Grid::from_costs(2, 2, vec![vec![0, 1], vec![1, 1]]).unwrap();

        assert_eq!(
            find_path(&grid, p(0, 0), p(1, 1)),
            Err(SearchError::BlockedEndpoint(p(0, 0)))
        );
        assert_eq!(
            find_path(&grid, p(1, 1), p(0, 0)),
            Err(SearchError::BlockedEndpoint(p(0, 0)))
        );
    }

    #[test]
    fn out_of_bounds_endpoints_are_rejected_up_front() {
        let grid = Grid::from_costs(2, 2, vec![vec![1, 1], vec![1, 1]]).unwrap();

        assert_eq!(
            find_path(&grid, p(5, 0), p(1, 1)),
            Err(SearchError::OutOfBounds(p(5, 0)))
        );
        assert_eq!(
            find_path(&grid, p(0, 0), p(0, 2)),
            Err(SearchError::OutOfBounds(p(0, 2)))
        );
    }

    #[test]
    fn start_equals_goal() {
        let grid = Grid::from_costs(2, 2, vec![vec![1, 1], vec![1, 1]]).unwrap();

        let result = find_path(&grid, p(1, 0), p(1, 0)).unwrap();

        assert_eq!(result.path, vec![p(1, 0)]);
        assert_eq!(result.total_cost, 0);
    }

    #[test]
    fn expensive_cells_force_a_detour() {
        let grid =
            Grid::from_costs(3, 3, vec![vec![1, 9, 1], vec![1, 9, 1], vec![1, 1, 1]]).unwrap();

        let result = find_path(&grid, p(0, 0), p(0, 2)).unwrap();

        assert_eq!(result.total_cost, 6);
        assert_eq!(result.path.len(), 7);
        assert!(!result.path.contains(&p(0, 1)));
        assert!(!result.path.contains(&p(1, 1)));
    }

    #[test]
    fn consecutive_path_nodes_are_adjacent() {
        let result = find_path(&corridor_maze(2), p(1, 1), p(1, 5)).unwrap();

        for pair in result.path.windows(2) {
            let row_delta = pair[0].row.abs_diff(pair[1].row);
            let col_delta = pair[0].col.abs_diff(pair[1].col);
            assert_eq!(row_delta + col_delta, 1, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn repeated_searches_agree_on_cost() {
        let grid = corridor_maze(4);

        let first = find_path(&grid, p(1, 1), p(1, 5)).unwrap();
        let second = find_path(&grid, p(1, 1), p(1, 5)).unwrap();

        assert_eq!(first.total_cost, second.total_cost);
    }

    #[test]
    fn stepping_reaches_the_same_result() {
        let grid = corridor_maze(0);
        let mut finder = PathFinder::new(p(1, 1), p(1, 5), grid.create_storage());

        loop {
            match finder.step(&grid).unwrap() {
                SearchState::Running => {}
                SearchState::Exhausted => panic!("route exists"),
                SearchState::Complete(result) => {
                    assert_eq!(result.total_cost, 12);
                    break;
                }
            }
        }
    }

    #[test]
    fn backtracking_needs_an_unbroken_trail() {
        let grid = Grid::from_costs(2, 2, vec![vec![1, 1], vec![1, 1]]).unwrap();

        // goal was recorded, but its predecessor never was
        let mut visited: CellStorage<Option<Reached<Point>>> = grid.create_storage();
        *visited.get_mut(p(1, 1)) = Some(Reached {
            cost: 2,
            from: Some(p(0, 1)),
        });

        assert_eq!(
            reconstruct(&visited, p(0, 0), p(1, 1)),
            Err(SearchError::BrokenTrail)
        );
    }
}
