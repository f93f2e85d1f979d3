use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::grid::Point;

/// Directions are 2 bit values, flipping bit 0 gives the reverse direction
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0b00,
    Down = 0b01,
    Left = 0b10,
    Right = 0b11,
}

impl Direction {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Direction::Up,
            0b01 => Direction::Down,
            0b10 => Direction::Left,
            _ => Direction::Right,
        }
    }

    pub fn opposite(self) -> Self {
        Self::from_bits(self.bits() ^ 0b01)
    }

    /// Moves `steps` cells away from `from`. The caller guarantees the result stays on the grid.
    pub fn advance(self, from: Point, steps: usize) -> Point {
        match self {
            Direction::Up => Point::new(from.x, from.y - steps),
            Direction::Down => Point::new(from.x, from.y + steps),
            Direction::Left => Point::new(from.x - steps, from.y),
            Direction::Right => Point::new(from.x + steps, from.y),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

/// Which of the four neighbors of a cell are open
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Input {
    pub n: bool,
    pub e: bool,
    pub s: bool,
    pub w: bool,
}

impl Input {
    pub fn passthrough_x(&self) -> bool {
        self.e && self.w
    }

    pub fn passthrough_y(&self) -> bool {
        self.n && self.s
    }

    pub fn passthrough_xy(&self) -> bool {
        self.passthrough_x() && self.passthrough_y()
    }

    pub fn openings(&self) -> usize {
        [self.n, self.e, self.s, self.w].iter().filter(|o| **o).count()
    }

    pub fn is_open(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.n,
            Direction::Down => self.s,
            Direction::Left => self.w,
            Direction::Right => self.e,
        }
    }

    /// Box drawing character that connects the open sides
    pub fn glyph(&self) -> char {
        match (self.n, self.e, self.s, self.w) {
            (true, true, true, true) => '┼',
            (true, true, false, true) => '┴',
            (false, true, true, true) => '┬',
            (true, true, true, false) => '├',
            (true, false, true, true) => '┤',
            (false, true, false, true) => '─',
            (true, false, true, false) => '│',
            (true, true, false, false) => '└',
            (false, true, true, false) => '┌',
            (false, false, true, true) => '┐',
            (true, false, false, true) => '┘',
            (true, false, false, false) => '╵',
            (false, true, false, false) => '╶',
            (false, false, true, false) => '╷',
            (false, false, false, true) => '╴',
            (false, false, false, false) => '?',
        }
    }
}

/// Index of a node inside its [`NodeMap`](crate::NodeMap)
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One half of an edge, owned by `parent` and pointing at `node`. The other half lives on `node`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub direction: Direction,
    pub length: usize,
    pub used: bool,
    pub parent: NodeId,
    pub node: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub position: Point,
    pub input: Input,
    pub is_start: bool,
    pub is_end: bool,
    pub connections: Vec<Connection>,
}

impl Node {
    pub fn new(position: Point, input: Input) -> Self {
        Self {
            position,
            input,
            is_start: false,
            is_end: false,
            connections: Vec::new(),
        }
    }

    pub fn new_start(position: Point) -> Self {
        Self {
            is_start: true,
            ..Self::new(position, Input { s: true, ..Default::default() })
        }
    }

    pub fn new_end(position: Point) -> Self {
        Self {
            is_end: true,
            ..Self::new(position, Input { n: true, ..Default::default() })
        }
    }

    /// Everything except a straight corridor along a single axis is a decision point
    pub fn is_critical(&self) -> bool {
        let i = &self.input;
        if i.passthrough_xy() {
            return true;
        }
        if i.passthrough_x() && !i.n && !i.s {
            return false;
        }
        if i.passthrough_y() && !i.e && !i.w {
            return false;
        }
        true
    }

    pub fn is_dead_end(&self) -> bool {
        self.input.openings() == 1
    }

    pub fn remaining_connections(&self) -> usize {
        self.connections.iter().filter(|c| !c.used).count()
    }

    pub fn used_connections(&self) -> usize {
        self.connections.len() - self.remaining_connections()
    }

    /// At most the connection we arrived on has been used
    pub fn is_fresh(&self) -> bool {
        self.used_connections() <= 1
    }

    /// The cell `step` cells along `connection`, counted from this node
    pub fn offset_at(&self, connection: &Connection, step: usize) -> Point {
        connection.direction.advance(self.position, step)
    }

    pub fn glyph(&self) -> char {
        if self.is_start {
            'S'
        } else if self.is_end {
            'E'
        } else if self.is_dead_end() {
            'x'
        } else if self.is_critical() {
            'o'
        } else {
            self.input.glyph()
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn input_from_bits(bits: u8) -> Input {
        Input {
            n: bits & 0b1000 != 0,
            e: bits & 0b0100 != 0,
            s: bits & 0b0010 != 0,
            w: bits & 0b0001 != 0,
        }
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);

        for bits in 0..4 {
            let d = Direction::from_bits(bits);
            assert_eq!(d.bits(), bits);
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn test_direction_advance() {
        let p = Point::new(4, 4);
        assert_eq!(Direction::Up.advance(p, 3), Point::new(4, 1));
        assert_eq!(Direction::Down.advance(p, 2), Point::new(4, 6));
        assert_eq!(Direction::Left.advance(p, 4), Point::new(0, 4));
        assert_eq!(Direction::Right.advance(p, 0), p);
    }

    #[test]
    fn test_critical_truth_table() {
        // only the two single axis corridors are skipped
        let passthrough = [0b0101, 0b1010];

        for bits in 0..16u8 {
            let node = Node::new(Point::new(1, 1), input_from_bits(bits));
            assert_eq!(
                node.is_critical(),
                !passthrough.contains(&bits),
                "input {:04b}",
                bits
            );
        }
    }

    #[test]
    fn test_dead_end() {
        for bits in 0..16u8 {
            let node = Node::new(Point::new(1, 1), input_from_bits(bits));
            assert_eq!(node.is_dead_end(), bits.count_ones() == 1);
        }
    }

    #[test]
    fn test_start_end() {
        let start = Node::new_start(Point::new(3, 0));
        assert!(start.is_start && !start.is_end);
        assert!(start.is_critical());
        assert_eq!(start.glyph(), 'S');

        let end = Node::new_end(Point::new(3, 9));
        assert!(end.is_end && !end.is_start);
        assert!(end.is_critical());
        assert_eq!(format!("{}", end), "E");
    }

    #[test]
    fn test_glyphs() {
        let corridor = Node::new(Point::new(1, 1), input_from_bits(0b0101));
        assert_eq!(corridor.glyph(), '─');

        let corridor = Node::new(Point::new(1, 1), input_from_bits(0b1010));
        assert_eq!(corridor.glyph(), '│');

        let junction = Node::new(Point::new(1, 1), input_from_bits(0b1110));
        assert_eq!(junction.glyph(), 'o');
        assert_eq!(junction.input.glyph(), '├');

        let dead_end = Node::new(Point::new(1, 1), input_from_bits(0b0010));
        assert_eq!(dead_end.glyph(), 'x');
    }
}
