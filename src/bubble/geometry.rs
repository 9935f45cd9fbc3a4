//! Bubble outline geometry
//!
//! A bubble is a rounded rectangle built from four quarter arcs, walked
//! clockwise on screen (y grows downwards) starting at the top-right corner:
//!
//! ```text
//!     4 ╭──────────╮ 1
//!       │          │
//!     3 ╰──────────╯ 2
//! ```
//!
//! The straight edges are the lines joining the end of one arc to the start
//! of the next, and the contour is closed back to the start of arc 1.

use egui::{pos2, Pos2, Rect};
use std::f32::consts::{FRAC_PI_2, PI};

/// Target length of one flattened arc step, in points
const FLATTEN_STEP: f32 = 2.0;
const MAX_STEPS_PER_ARC: usize = 24;

/// One piece of a bubble outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Arc around `center`, sweeping from `start_angle` to `end_angle` (radians)
    Arc {
        center: Pos2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    /// Straight line from the current point to `to`
    LineTo(Pos2),
}

/// Closed outline of a bubble for one set of bounds, radius and border width.
///
/// Never mutated: a new path is computed whenever any input changes.
#[derive(Debug, Clone, PartialEq)]
pub struct BubblePath {
    bounds: Rect,
    inner: Rect,
    radius: f32,
    segments: Vec<PathSegment>,
    closed: bool,
}

/// Compute the outline of a bubble filling `bounds`.
///
/// When the bounds are smaller than `2 * radius` in either direction the
/// radius is reduced to half the smaller side first, so the shape degrades to
/// a pill or circle instead of folding over itself. The arcs are then pulled
/// in by half the border width so the stroke stays inside `bounds`.
///
/// Inputs are clamped: negative or non-finite sizes count as zero. Zero-sized
/// bounds give a path that collapses to a single point.
pub fn compute_path(bounds: Rect, radius: f32, border_width: f32) -> BubblePath {
    let origin = bounds.min;
    let width = sanitize(bounds.width());
    let height = sanitize(bounds.height());
    let border_width = sanitize(border_width);

    let mut radius = sanitize(radius);
    if width < 2.0 * radius || height < 2.0 * radius {
        radius = width.min(height) / 2.0;
    }

    let inner = Rect::from_min_max(
        pos2(origin.x + radius, origin.y + radius),
        pos2(origin.x + width - radius, origin.y + height - radius),
    );
    let arc_radius = (radius - border_width / 2.0).max(0.0);

    let corners = [
        (inner.right_top(), -FRAC_PI_2),
        (inner.right_bottom(), 0.0),
        (inner.left_bottom(), FRAC_PI_2),
        (inner.left_top(), PI),
    ];

    let mut segments = Vec::with_capacity(7);
    for (i, (center, start_angle)) in corners.into_iter().enumerate() {
        let arc = PathSegment::Arc {
            center,
            radius: arc_radius,
            start_angle,
            end_angle: start_angle + FRAC_PI_2,
        };
        if i > 0 {
            segments.push(PathSegment::LineTo(point_on_arc(center, arc_radius, start_angle)));
        }
        segments.push(arc);
    }

    BubblePath {
        bounds: Rect::from_min_size(origin, egui::vec2(width, height)),
        inner,
        radius: arc_radius,
        segments,
        closed: true,
    }
}

impl BubblePath {
    /// Bounds the path was computed for
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Radius of every corner arc, after size correction and border inset
    pub fn effective_radius(&self) -> f32 {
        self.radius
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The four corner arcs as `(center, radius)`, in drawing order
    pub fn arcs(&self) -> impl Iterator<Item = (Pos2, f32)> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Arc { center, radius, .. } => Some((*center, *radius)),
            PathSegment::LineTo(_) => None,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// First point of the contour (start of the top-right arc)
    pub fn start_point(&self) -> Pos2 {
        point_on_arc(self.inner.right_top(), self.radius, -FRAC_PI_2)
    }

    /// Current point after the last segment. Equal to
    /// [`start_point`](Self::start_point) once the path is closed.
    pub fn end_point(&self) -> Pos2 {
        if self.closed {
            return self.start_point();
        }
        match self.segments.last() {
            Some(PathSegment::Arc {
                center,
                radius,
                end_angle,
                ..
            }) => point_on_arc(*center, *radius, *end_angle),
            Some(PathSegment::LineTo(to)) => *to,
            None => self.start_point(),
        }
    }

    /// Flatten the outline into a clockwise polygon without a repeated
    /// closing point. A collapsed path yields a single point.
    pub fn to_points(&self) -> Vec<Pos2> {
        let arc_length = self.radius * FRAC_PI_2;
        let steps = ((arc_length / FLATTEN_STEP).ceil() as usize).clamp(1, MAX_STEPS_PER_ARC);
        self.flatten(steps)
    }

    /// Flatten with a fixed number of steps per arc
    pub fn flatten(&self, steps_per_arc: usize) -> Vec<Pos2> {
        let steps = steps_per_arc.max(1);
        let mut points: Vec<Pos2> = Vec::with_capacity(4 * (steps + 1));

        for segment in &self.segments {
            let PathSegment::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } = *segment
            else {
                continue;
            };

            for step in 0..=steps {
                let t = step as f32 / steps as f32;
                let angle = start_angle + (end_angle - start_angle) * t;
                let point = point_on_arc(center, radius, angle);
                if points.last() != Some(&point) {
                    points.push(point);
                }
            }
        }

        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }

    /// Whether `pos` lies inside the outline (edge included)
    pub fn contains(&self, pos: Pos2) -> bool {
        let dx = (self.inner.min.x - pos.x).max(pos.x - self.inner.max.x).max(0.0);
        let dy = (self.inner.min.y - pos.y).max(pos.y - self.inner.max.y).max(0.0);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

fn point_on_arc(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    pos2(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
