use log::{debug, trace};
use serde::Serialize;

use crate::{error::MazeError, node::NodeId, nodemap::NodeMap};

/// A walk from the start to the end node. Every segment starts where the solver had a choice to
/// make, so backtracking only ever throws away whole segments at the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub segments: Vec<Vec<NodeId>>,
    /// How many nodes were pushed as inflection points during the walk
    pub inflection_points: usize,
    pub backtracks: usize,
}

impl Solution {
    /// All segments joined into a single list of nodes
    pub fn path(&self) -> Vec<NodeId> {
        self.segments.iter().flatten().copied().collect()
    }

    /// Sum of the lengths of the connections walked between consecutive nodes
    pub fn length(&self, map: &NodeMap) -> usize {
        self.path()
            .windows(2)
            .filter_map(|pair| map.connection_between(pair[0], pair[1]))
            .map(|c| c.length)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverState {
    Walking,
    Unsolvable,
    Solved(Solution),
}

impl SolverState {
    fn is_done(&self) -> bool {
        !matches!(self, SolverState::Walking)
    }
}

/// A node that had more than one way forward, and the segment that was opened for it
#[derive(Debug, Clone, Copy)]
struct Inflection {
    node: NodeId,
    segment: usize,
}

/// Depth first walk over a [`NodeMap`] that consumes connections as it goes and returns to the
/// most recent inflection point whenever it runs out of options
#[derive(Debug)]
pub struct Solver {
    start: NodeId,
    end: NodeId,
    current: NodeId,
    // true when `current` was reached by backtracking rather than along a connection
    resuming: bool,
    inflections: Vec<Inflection>,
    segments: Vec<Vec<NodeId>>,
    inflection_points: usize,
    backtracks: usize,
    steps: usize,
    state: SolverState,
}

impl Solver {
    pub fn new(map: &NodeMap) -> Self {
        Self {
            start: map.start(),
            end: map.end(),
            current: map.start(),
            resuming: false,
            inflections: Vec::new(),
            segments: vec![Vec::new()],
            inflection_points: 0,
            backtracks: 0,
            steps: 0,
            state: SolverState::Walking,
        }
    }

    pub fn finish(mut self, map: &mut NodeMap) -> Result<Solution, MazeError> {
        loop {
            match self.step(map) {
                SolverState::Walking => {}
                SolverState::Solved(solution) => {
                    debug!(
                        "solved in {} steps with {} backtracks",
                        self.steps, solution.backtracks
                    );
                    return Ok(solution);
                }
                SolverState::Unsolvable => {
                    return Err(MazeError::Unsolvable {
                        start: map.node(self.start).position,
                        end: map.node(self.end).position,
                    })
                }
            }
        }
    }

    /// Visits the current node once, either moving along a connection or backtracking
    pub fn step(&mut self, map: &mut NodeMap) -> SolverState {
        if self.state.is_done() {
            return self.state.clone();
        }
        self.steps += 1;

        let id = self.current;
        let node = map.node(id);
        trace!("at node {} {}", id, node.position);

        if node.is_end {
            self.push_to_segment(id);
            self.state = SolverState::Solved(Solution {
                segments: std::mem::take(&mut self.segments),
                inflection_points: self.inflection_points,
                backtracks: self.backtracks,
            });
            return self.state.clone();
        }

        if !self.resuming && node.is_fresh() && node.remaining_connections() > 1 {
            self.segments.push(Vec::new());
            self.inflections.push(Inflection {
                node: id,
                segment: self.segments.len() - 1,
            });
            self.inflection_points += 1;
        }
        self.resuming = false;

        // connections are tried in the order they were created
        let next = node.connections.iter().position(|c| !c.used);
        if let Some(index) = next {
            let target = node.connections[index].node;
            map.use_connection(id, index);
            self.push_to_segment(id);
            self.current = target;
            return self.state.clone();
        }

        match self.inflections.last().copied() {
            Some(inflection) => {
                // everything walked since the inflection point led nowhere
                self.segments.truncate(inflection.segment + 1);
                self.segments[inflection.segment].clear();

                if map.node(inflection.node).remaining_connections() <= 1 {
                    self.inflections.pop();
                }

                trace!(
                    "returning to inflection at {}",
                    map.node(inflection.node).position
                );
                self.backtracks += 1;
                self.current = inflection.node;
                self.resuming = true;
            }
            None => {
                self.state = SolverState::Unsolvable;
            }
        }

        self.state.clone()
    }

    fn push_to_segment(&mut self, id: NodeId) {
        if let Some(segment) = self.segments.last_mut() {
            segment.push(id);
        }
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Number of inflection points that still have unexplored branches
    pub fn inflection_depth(&self) -> usize {
        self.inflections.len()
    }

    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

/// Solves `map` from its start node, consuming its connections
pub fn solve(map: &mut NodeMap) -> Result<Solution, MazeError> {
    Solver::new(map).finish(map)
}

#[cfg(test)]
mod test {

    use std::collections::HashSet;

    use super::*;
    use crate::{
        grid::{MazeGrid, Point},
        nodemap::ConnectFrom,
    };

    fn build(text: &str) -> NodeMap {
        let grid: MazeGrid = text.parse().unwrap();
        NodeMap::from_grid(&grid, ConnectFrom::Critical).unwrap()
    }

    fn positions(map: &NodeMap, path: &[NodeId]) -> Vec<Point> {
        path.iter().map(|id| map.node(*id).position).collect()
    }

    fn create_loop_maze() -> &'static str {
        "
###.###
#.....#
#.#.#.#
#.....#
###.###
"
    }

    #[test]
    fn test_straight_corridor() {
        let mut map = build(
            "
##.##
##.##
##.##
##.##
##.##
",
        );

        let solution = solve(&mut map).unwrap();

        assert_eq!(solution.segments.len(), 1);
        assert_eq!(solution.inflection_points, 0);
        assert_eq!(solution.backtracks, 0);
        assert_eq!(solution.length(&map), 4);
        assert_eq!(solution.path(), vec![map.start(), map.end()]);
    }

    #[test]
    fn test_backtrack_once() {
        // the junction below the start leads east into a dead end and south to the exit
        let mut map = build(
            "
##.####
##...##
##.####
##.####
##.####
##.####
",
        );

        let solution = solve(&mut map).unwrap();
        let junction = map.find(Point::new(2, 1)).unwrap();

        assert_eq!(solution.inflection_points, 1);
        assert_eq!(solution.backtracks, 1);
        assert_eq!(
            solution.segments,
            vec![vec![map.start()], vec![junction, map.end()]]
        );
        assert_eq!(solution.length(&map), 5);
    }

    #[test]
    fn test_branching_maze() {
        let mut map = build(
            "
###.###
#.....#
#.###.#
#.###.#
###...#
###.###
",
        );

        let solution = solve(&mut map).unwrap();

        assert_eq!(
            positions(&map, &solution.path()),
            vec![
                Point::new(3, 0),
                Point::new(3, 1),
                Point::new(5, 1),
                Point::new(5, 4),
                Point::new(3, 4),
                Point::new(3, 5),
            ]
        );
        assert_eq!(solution.length(&map), 9);
        assert_eq!(solution.backtracks, 1);
    }

    #[test]
    fn test_unsolvable() {
        let mut map = build(
            "
##.##
##.##
#####
##.##
##.##
",
        );

        let res = solve(&mut map);
        assert_eq!(
            res.unwrap_err(),
            MazeError::Unsolvable {
                start: Point::new(2, 0),
                end: Point::new(2, 4)
            }
        );
    }

    #[test]
    fn test_loop_walk_is_valid() {
        let mut map = build(create_loop_maze());

        let solution = solve(&mut map).unwrap();
        let path = solution.path();

        assert_eq!(path.first(), Some(&map.start()));
        assert_eq!(path.last(), Some(&map.end()));

        // every hop follows a connection and no connection is walked twice in one direction
        let mut walked = HashSet::new();
        for pair in path.windows(2) {
            let c = map.connection_between(pair[0], pair[1]).unwrap();
            assert!(walked.insert((c.parent, c.node, c.direction)));
        }

        // used state stays symmetric
        for node in map.nodes() {
            for c in &node.connections {
                let mirror = map.connection_between(c.node, c.parent).unwrap();
                assert_eq!(c.used, mirror.used);
            }
        }
    }

    #[test]
    fn test_connect_from_all_nodes() {
        let grid: MazeGrid = create_loop_maze().parse().unwrap();
        let mut map = NodeMap::from_grid(&grid, ConnectFrom::All).unwrap();

        let solution = solve(&mut map).unwrap();
        let path = solution.path();

        assert_eq!(path.first(), Some(&map.start()));
        assert_eq!(path.last(), Some(&map.end()));
        assert!(path
            .windows(2)
            .all(|pair| map.connection_between(pair[0], pair[1]).is_some()));
    }

    #[test]
    fn test_same_path_after_rebuild() {
        let mut first = build(create_loop_maze());
        let mut second = build(create_loop_maze());

        let a = solve(&mut first).unwrap();
        let b = solve(&mut second).unwrap();
        assert_eq!(a, b);

        first.reset();
        let c = solve(&mut first).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_step_until_done() {
        let mut map = build(create_loop_maze());
        let mut solver = Solver::new(&map);

        let mut steps = 0;
        while solver.step(&mut map) == SolverState::Walking {
            steps += 1;
            assert!(steps < 100);
        }

        assert!(matches!(solver.state(), SolverState::Solved(_)));
        assert_eq!(solver.current(), map.end());
        // stepping a finished solver changes nothing
        assert!(matches!(solver.step(&mut map), SolverState::Solved(_)));
        assert_eq!(solver.steps(), steps + 1);
    }
}
