//! Grid navigation backend with A* pathfinding

use crate::error::{NavError, Result};
use crate::path::NavPath;
use crate::port::NavigationPort;
use serde::{Deserialize, Serialize};
use std::collections::{BinaryHeap, HashMap, HashSet};
use warden_math::Vec3;

/// Fraction of a cell between raycast samples
const RAYCAST_SAMPLES_PER_CELL: f32 = 4.0;

/// Walkable-cell grid on the XZ plane.
///
/// Cell `(col, row)` spans `[col * s, (col + 1) * s) x [row * s, (row + 1) * s)`
/// where `s` is the cell size. Columns run along +X, rows along +Z.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    walkable: Vec<bool>,
}

impl NavGrid {
    /// Create a fully walkable grid
    pub fn open(cols: usize, rows: usize, cell_size: f32) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(NavError::EmptyGrid);
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(NavError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cols,
            rows,
            walkable: vec![true; cols * rows],
        })
    }

    /// Build a grid from ASCII rows. `#` marks a blocked cell, any other
    /// character is walkable. Blank lines are ignored.
    pub fn from_ascii(map: &str, cell_size: f32) -> Result<Self> {
        let lines: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&lines, cell_size)
    }

    /// Build a grid from a slice of ASCII rows
    pub fn from_rows<S: AsRef<str>>(rows: &[S], cell_size: f32) -> Result<Self> {
        let expected = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut grid = Self::open(expected, rows.len(), cell_size)?;

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != expected {
                return Err(NavError::RaggedRow { row, expected, found });
            }
            for (col, ch) in line.chars().enumerate() {
                grid.walkable[row * expected + col] = ch != '#';
            }
        }

        Ok(grid)
    }

    /// Cell size in world units
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of columns (X)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows (Z)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Mark a cell as walkable or blocked
    pub fn set_walkable(&mut self, col: usize, row: usize, walkable: bool) -> Result<()> {
        let idx = self.index(col, row).ok_or(NavError::UnknownCell(col, row))?;
        self.walkable[idx] = walkable;
        Ok(())
    }

    /// Whether a cell is inside the grid and walkable
    pub fn is_walkable(&self, col: usize, row: usize) -> bool {
        self.index(col, row).map(|idx| self.walkable[idx]).unwrap_or(false)
    }

    /// Whether a world point lies on a walkable cell
    pub fn is_walkable_at(&self, point: Vec3) -> bool {
        self.cell_of(point)
            .map(|(col, row)| self.is_walkable(col, row))
            .unwrap_or(false)
    }

    /// Cell containing a world point
    pub fn cell_of(&self, point: Vec3) -> Option<(usize, usize)> {
        let col = (point.x / self.cell_size).floor();
        let row = (point.z / self.cell_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    /// World-space centre of a cell
    pub fn cell_center(&self, col: usize, row: usize) -> Vec3 {
        Vec3::ground(
            (col as f32 + 0.5) * self.cell_size,
            (row as f32 + 0.5) * self.cell_size,
        )
    }

    /// Iterate over every blocked cell
    pub fn blocked_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| (col, row)))
            .filter(move |&(col, row)| !self.is_walkable(col, row))
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    fn neighbors(&self, col: usize, row: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        const OFFSETS: [(i64, i64); 8] = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ];

        OFFSETS.iter().filter_map(move |&(dc, dr)| {
            let c = col as i64 + dc;
            let r = row as i64 + dr;
            if c < 0 || r < 0 {
                return None;
            }
            let (c, r) = (c as usize, r as usize);
            if !self.is_walkable(c, r) {
                return None;
            }
            // Diagonals may not cut a blocked corner
            if dc != 0 && dr != 0 && !(self.is_walkable(c, row) && self.is_walkable(col, r)) {
                return None;
            }
            Some((c, r))
        })
    }

    /// A* over walkable cells
    fn astar(&self, start: (usize, usize), goal: (usize, usize)) -> Option<Vec<(usize, usize)>> {
        #[derive(Clone, Copy)]
        struct Node {
            cell: (usize, usize),
            f_score: f32,
        }

        impl PartialEq for Node {
            fn eq(&self, other: &Self) -> bool {
                self.cell == other.cell
            }
        }

        impl Eq for Node {}

        impl PartialOrd for Node {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for Node {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                other.f_score.total_cmp(&self.f_score)
            }
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
        let mut g_score: HashMap<(usize, usize), f32> = HashMap::new();
        let mut closed_set: HashSet<(usize, usize)> = HashSet::new();

        let goal_center = self.cell_center(goal.0, goal.1);

        g_score.insert(start, 0.0);
        open_set.push(Node {
            cell: start,
            f_score: self.cell_center(start.0, start.1).distance(goal_center),
        });

        while let Some(current) = open_set.pop() {
            if current.cell == goal {
                let mut path = vec![goal];
                let mut cursor = goal;
                while let Some(&prev) = came_from.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }

            if !closed_set.insert(current.cell) {
                continue;
            }

            let current_g = g_score.get(&current.cell).copied().unwrap_or(f32::MAX);
            let current_center = self.cell_center(current.cell.0, current.cell.1);

            for neighbor in self.neighbors(current.cell.0, current.cell.1) {
                if closed_set.contains(&neighbor) {
                    continue;
                }

                let neighbor_center = self.cell_center(neighbor.0, neighbor.1);
                let tentative_g = current_g + current_center.distance(neighbor_center);

                let neighbor_g = g_score.get(&neighbor).copied().unwrap_or(f32::MAX);
                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.cell);
                    g_score.insert(neighbor, tentative_g);
                    open_set.push(Node {
                        cell: neighbor,
                        f_score: tentative_g + neighbor_center.distance(goal_center),
                    });
                }
            }
        }

        None
    }

    /// Drop intermediate waypoints that can be skipped in a straight line
    fn string_pull(&self, waypoints: Vec<Vec3>) -> Vec<Vec3> {
        if waypoints.len() <= 2 {
            return waypoints;
        }

        let mut corners = vec![waypoints[0]];
        let mut anchor = 0;
        while anchor < waypoints.len() - 1 {
            let mut next = anchor + 1;
            for candidate in (anchor + 2..waypoints.len()).rev() {
                if self.raycast(waypoints[anchor], waypoints[candidate]).is_none() {
                    next = candidate;
                    break;
                }
            }
            corners.push(waypoints[next]);
            anchor = next;
        }
        corners
    }
}

impl NavigationPort for NavGrid {
    fn find_path(&self, from: Vec3, to: Vec3) -> Option<NavPath> {
        let start = self.cell_of(from).filter(|&(c, r)| self.is_walkable(c, r))?;
        let goal = self.cell_of(to).filter(|&(c, r)| self.is_walkable(c, r))?;

        if start == goal {
            return Some(NavPath::new(vec![from, to]));
        }

        let Some(cells) = self.astar(start, goal) else {
            log::trace!("No grid route from {:?} to {:?}", from, to);
            return None;
        };

        let mut waypoints = Vec::with_capacity(cells.len() + 2);
        waypoints.push(from);
        waypoints.extend(
            cells[1..cells.len() - 1]
                .iter()
                .map(|&(col, row)| self.cell_center(col, row)),
        );
        waypoints.push(to);

        Some(NavPath::new(self.string_pull(waypoints)))
    }

    fn raycast(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        if !self.is_walkable_at(from) {
            return Some(from);
        }

        let distance = from.horizontal().distance(to.horizontal());
        let step = self.cell_size / RAYCAST_SAMPLES_PER_CELL;
        let samples = ((distance / step).ceil() as usize).max(1);

        let mut last_clear = from;
        for i in 1..=samples {
            let point = from.lerp(to, i as f32 / samples as f32);
            if !self.is_walkable_at(point) {
                return Some(last_clear);
            }
            last_clear = point;
        }
        None
    }
}
