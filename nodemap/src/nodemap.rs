use std::fmt::{Display, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::InvalidMaze,
    grid::{GridSource, Point},
    node::{Connection, Direction, Input, Node, NodeId},
};

/// Which nodes search for east and south neighbors while the map is wired up
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectFrom {
    /// Only decision points get edges, corridor cells are skipped over
    #[default]
    Critical,
    /// Every node scans, so corridor cells also link to the next decision point
    All,
}

/// The graph of nodes found in a maze. Nodes live in a single arena and are referenced by
/// [`NodeId`], `rows` keeps them grouped by the grid row they were found in (left to right).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMap {
    pub width: usize,
    pub height: usize,
    nodes: Vec<Node>,
    rows: Vec<Vec<NodeId>>,
    start: NodeId,
    end: NodeId,
}

impl NodeMap {
    pub fn from_grid<G: GridSource>(
        grid: &G,
        connect_from: ConnectFrom,
    ) -> Result<Self, InvalidMaze> {
        let width = grid.width();
        let height = grid.height();

        if width < 3 || height < 3 {
            return Err(InvalidMaze::TooSmall { width, height });
        }

        let mut nodes = Vec::new();
        let mut rows = Vec::with_capacity(height);
        let mut starts = Vec::new();
        let mut ends = Vec::new();

        for y in 0..height {
            let mut row = Vec::new();
            for x in 0..width {
                // the outer vertical walls never hold nodes
                if x == 0 || x == width - 1 {
                    continue;
                }

                if grid.is_wall(x, y) {
                    continue;
                }

                let id = NodeId(nodes.len());
                let position = Point::new(x, y);

                let node = if y == 0 {
                    starts.push(id);
                    Node::new_start(position)
                } else if y == height - 1 {
                    ends.push(id);
                    Node::new_end(position)
                } else {
                    Node::new(
                        position,
                        Input {
                            n: grid.is_open(x, y - 1),
                            e: grid.is_open(x + 1, y),
                            s: grid.is_open(x, y + 1),
                            w: grid.is_open(x - 1, y),
                        },
                    )
                };

                nodes.push(node);
                row.push(id);
            }
            rows.push(row);
        }

        let start = match starts[..] {
            [] => return Err(InvalidMaze::NoStart),
            [start] => start,
            _ => return Err(InvalidMaze::MultipleStarts { count: starts.len() }),
        };
        let end = match ends[..] {
            [] => return Err(InvalidMaze::NoEnd),
            [end] => end,
            _ => return Err(InvalidMaze::MultipleEnds { count: ends.len() }),
        };

        // the entrances are forced open towards the inside, make sure the grid agrees
        let p = nodes[start.0].position;
        if grid.is_wall(p.x, p.y + 1) {
            return Err(InvalidMaze::BlockedEntrance { position: p });
        }
        let p = nodes[end.0].position;
        if grid.is_wall(p.x, p.y - 1) {
            return Err(InvalidMaze::BlockedEntrance { position: p });
        }

        let mut map = NodeMap {
            width,
            height,
            nodes,
            rows,
            start,
            end,
        };

        map.connect_all(connect_from);
        map.validate()?;

        debug!(
            "built node map {}x{}: {} nodes, {} edges",
            width,
            height,
            map.nodes.len(),
            map.edge_count()
        );

        Ok(map)
    }

    /// Links every scanning node to the first critical node east of it and below it. West and
    /// north links are the mirrors created by `connect`.
    fn connect_all(&mut self, connect_from: ConnectFrom) {
        for row_index in 0..self.rows.len() {
            for node_index in 0..self.rows[row_index].len() {
                let id = self.rows[row_index][node_index];
                let node = &self.nodes[id.0];

                if connect_from == ConnectFrom::Critical && !node.is_critical() {
                    continue;
                }

                let position = node.position;
                let input = node.input;

                // next critical node in the current row
                if input.e {
                    let target = self.rows[row_index][node_index + 1..]
                        .iter()
                        .copied()
                        .find(|t| self.nodes[t.0].is_critical());

                    if let Some(target) = target {
                        let length = self.nodes[target.0].position.x - position.x;
                        self.connect(id, target, Direction::Right, length);
                    }
                }

                // first critical node further down in the same column
                if input.s {
                    let target = (row_index + 1..self.rows.len())
                        .filter(|r| !self.rows[*r].is_empty())
                        .find_map(|r| {
                            self.rows[r]
                                .iter()
                                .copied()
                                .find(|t| {
                                    let n = &self.nodes[t.0];
                                    n.is_critical() && n.position.x == position.x
                                })
                                .map(|t| (r, t))
                        });

                    if let Some((search_row, target)) = target {
                        self.connect(id, target, Direction::Down, search_row - row_index);
                    }
                }
            }
        }
    }

    /// Every open side of a critical node must have been wired to something
    fn validate(&self) -> Result<(), InvalidMaze> {
        let directions = [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ];

        for node in self.nodes.iter().filter(|n| n.is_critical()) {
            for direction in directions {
                if node.input.is_open(direction)
                    && !node.connections.iter().any(|c| c.direction == direction)
                {
                    return Err(InvalidMaze::DanglingOpening {
                        position: node.position,
                        direction,
                    });
                }
            }
        }

        Ok(())
    }

    /// Adds an edge as a pair of mirrored connections, one on each node
    pub fn connect(&mut self, from: NodeId, to: NodeId, direction: Direction, length: usize) {
        self.nodes[from.0].connections.push(Connection {
            direction,
            length,
            used: false,
            parent: from,
            node: to,
        });
        self.nodes[to.0].connections.push(Connection {
            direction: direction.opposite(),
            length,
            used: false,
            parent: to,
            node: from,
        });
    }

    /// Marks the connection at `index` on `from` as used, together with its mirror
    pub fn use_connection(&mut self, from: NodeId, index: usize) {
        let connection = &mut self.nodes[from.0].connections[index];
        connection.used = true;
        let connection = *connection;

        let mirror = self.nodes[connection.node.0]
            .connections
            .iter_mut()
            .find(|c| {
                !c.used
                    && c.node == connection.parent
                    && c.direction == connection.direction.opposite()
                    && c.length == connection.length
            });

        match mirror {
            Some(mirror) => mirror.used = true,
            None => panic!(
                "connection {} -> {} has no unused mirror",
                connection.parent, connection.node
            ),
        }
    }

    /// Clears the used flag on every connection so the map can be solved again
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            for connection in &mut node.connections {
                connection.used = false;
            }
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn rows(&self) -> &[Vec<NodeId>] {
        &self.rows
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn find(&self, position: Point) -> Option<NodeId> {
        self.rows
            .get(position.y)?
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].position == position)
    }

    /// The first connection on `from` that leads to `to`
    pub fn connection_between(&self, from: NodeId, to: NodeId) -> Option<&Connection> {
        self.nodes[from.0].connections.iter().find(|c| c.node == to)
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum::<usize>() / 2
    }

    pub fn stats(&self) -> NodeMapStats {
        NodeMapStats {
            nodes: self.nodes.len(),
            critical: self.nodes.iter().filter(|n| n.is_critical()).count(),
            dead_ends: self.nodes.iter().filter(|n| n.is_dead_end()).count(),
            edges: self.edge_count(),
        }
    }

    /// Draws every node as a glyph at its grid position, with a ruler on top and the row number
    /// on the left
    pub fn visualize(&self) -> String {
        let mut out = String::from("NodeMap\n ");
        for x in 0..self.width {
            out.push(char::from(b'0' + (x % 10) as u8));
        }
        out.push('\n');

        for (row_index, row) in self.rows.iter().enumerate() {
            let mut nodes = row.iter().map(|id| &self.nodes[id.0]).peekable();

            // column 0 never holds a node, use it for the row number
            let _ = write!(out, "{} ", row_index % 10);
            for x in 1..self.width {
                match nodes.next_if(|n| n.position.x == x) {
                    Some(node) => out.push(node.glyph()),
                    None => out.push(' '),
                }
            }
            out.push('\n');
        }

        out
    }
}

/// Lists the x coordinates of the nodes in every row
impl Display for NodeMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NodeMap {{")?;
        for row in &self.rows {
            let xs = row
                .iter()
                .map(|id| self.nodes[id.0].position.x.to_string())
                .collect::<Vec<_>>();
            writeln!(f, "  Row {{ {} }}", xs.join(","))?;
        }
        write!(f, "}}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeMapStats {
    pub nodes: usize,
    pub critical: usize,
    pub dead_ends: usize,
    pub edges: usize,
}

impl Display for NodeMapStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Nodes created: {}", self.nodes)?;
        writeln!(f, "Critical nodes: {}", self.critical)?;
        writeln!(f, "Dead end nodes: {}", self.dead_ends)?;
        write!(f, "Edges: {}", self.edges)
    }
}
