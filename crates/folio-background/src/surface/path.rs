//! Path construction.

use std::f32::consts::TAU;

use glam::Vec2;

/// Segments used to approximate a full circle.
const ARC_SEGMENTS: usize = 24;

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(Vec2),
    /// Straight segment from the current point.
    LineTo(Vec2),
    /// Join the current point back to the subpath start.
    Close,
}

/// A run of connected points.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    /// Points in drawing order.
    pub points: Vec<Vec2>,
    /// Whether the last point joins back to the first.
    pub closed: bool,
}

/// A sequence of subpaths made of straight segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// A closed polygon through `points`.
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        path.add_polygon(points);
        path
    }

    /// A closed circle approximation.
    pub fn circle(center: Vec2, radius: f32) -> Self {
        let mut path = Self::new();
        path.arc(center, radius);
        path
    }

    /// Start a new subpath at `point`.
    pub fn move_to(&mut self, point: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    /// Add a segment to `point`. Starts a subpath if there is none.
    pub fn line_to(&mut self, point: Vec2) -> &mut Self {
        if self.commands.is_empty() {
            self.commands.push(PathCommand::MoveTo(point));
        } else {
            self.commands.push(PathCommand::LineTo(point));
        }
        self
    }

    /// Close the current subpath.
    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Add a closed polygon subpath.
    pub fn add_polygon(&mut self, points: &[Vec2]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        self.move_to(*first);
        for point in rest {
            self.line_to(*point);
        }
        self.close()
    }

    /// Add a full circle as its own closed subpath.
    pub fn arc(&mut self, center: Vec2, radius: f32) -> &mut Self {
        let points: Vec<Vec2> = (0..ARC_SEGMENTS)
            .map(|i| {
                let angle = i as f32 / ARC_SEGMENTS as f32 * TAU;
                center + Vec2::from_angle(angle) * radius
            })
            .collect();
        self.add_polygon(&points)
    }

    /// The raw commands.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// True when nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Split into subpaths. Subpaths with a single point are dropped.
    pub fn subpaths(&self) -> Vec<Subpath> {
        let mut subpaths = Vec::new();
        let mut current = Subpath {
            points: Vec::new(),
            closed: false,
        };

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(point) => {
                    let finished = std::mem::replace(
                        &mut current,
                        Subpath {
                            points: vec![point],
                            closed: false,
                        },
                    );
                    if finished.points.len() > 1 {
                        subpaths.push(finished);
                    }
                }
                PathCommand::LineTo(point) => current.points.push(point),
                PathCommand::Close => current.closed = true,
            }
        }
        if current.points.len() > 1 {
            subpaths.push(current);
        }
        subpaths
    }
}
