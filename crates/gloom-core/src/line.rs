//! Bresenham line iteration
//!
//! Shared by sight rays and tunnel carving. Yields every cell from the start
//! to the end point inclusive, stepping at most one cell per axis per step.

/// Iterator over the cells of a Bresenham line
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    x: i32,
    y: i32,
    x1: i32,
    y1: i32,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

/// Cells on the line from (x0, y0) to (x1, y1), endpoints included
pub fn bresenham_line(x0: i32, y0: i32, x1: i32, y1: i32) -> BresenhamLine {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    BresenhamLine {
        x: x0,
        y: y0,
        x1,
        y1,
        dx,
        dy,
        sx: if x0 < x1 { 1 } else { -1 },
        sy: if y0 < y1 { 1 } else { -1 },
        err: dx + dy,
        done: false,
    }
}

impl Iterator for BresenhamLine {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.done {
            return None;
        }
        let current = (self.x, self.y);
        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
            return Some(current);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point() {
        let cells: Vec<_> = bresenham_line(3, 3, 3, 3).collect();
        assert_eq!(cells, vec![(3, 3)]);
    }

    #[test]
    fn test_horizontal() {
        let cells: Vec<_> = bresenham_line(1, 2, 4, 2).collect();
        assert_eq!(cells, vec![(1, 2), (2, 2), (3, 2), (4, 2)]);
    }

    #[test]
    fn test_vertical_backwards() {
        let cells: Vec<_> = bresenham_line(0, 3, 0, 0).collect();
        assert_eq!(cells, vec![(0, 3), (0, 2), (0, 1), (0, 0)]);
    }

    #[test]
    fn test_diagonal() {
        let cells: Vec<_> = bresenham_line(0, 0, 3, 3).collect();
        assert_eq!(cells, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_endpoints_always_included() {
        for &(x0, y0, x1, y1) in &[(0, 0, 7, 3), (5, 1, -2, -4), (2, 9, 3, -3)] {
            let cells: Vec<_> = bresenham_line(x0, y0, x1, y1).collect();
            assert_eq!(cells.first(), Some(&(x0, y0)));
            assert_eq!(cells.last(), Some(&(x1, y1)));
        }
    }

    #[test]
    fn test_steps_are_adjacent() {
        let cells: Vec<_> = bresenham_line(-3, 4, 11, -2).collect();
        for pair in cells.windows(2) {
            let (ax, ay) = pair[0];
            let (bx, by) = pair[1];
            assert!((ax - bx).abs() <= 1 && (ay - by).abs() <= 1);
            assert_ne!((ax, ay), (bx, by));
        }
    }
}
