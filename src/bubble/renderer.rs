//! Paintable bubble shapes

use super::geometry::{compute_path, BubblePath};
use super::style::{ResolvedStyle, SecondaryBubble};
use egui::epaint::{Mesh, PathShape, Vertex};
use egui::{Color32, Pos2, Rect, Shape, Stroke, TextureId};

/// Immutable description of a bubble ready to be painted
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleShape {
    pub path: BubblePath,
    pub fill: Color32,
    pub stroke: Stroke,
    /// Content is clipped to `path`
    pub masked: bool,
}

impl BubbleShape {
    /// Fill and border as a single egui shape
    pub fn to_shape(&self) -> Shape {
        Shape::Path(PathShape::convex_polygon(
            self.path.to_points(),
            self.fill,
            self.stroke,
        ))
    }

    /// Border only, for painting on top of masked content
    pub fn stroke_shape(&self) -> Shape {
        Shape::Path(PathShape::closed_line(self.path.to_points(), self.stroke))
    }

    /// Textured mesh covering the bubble interior.
    ///
    /// `uv` is the part of the texture that maps onto the bubble bounds; the
    /// mesh is a triangle fan over the flattened outline, so everything
    /// outside the rounded corners is cut away.
    pub fn clip_mesh(&self, texture_id: TextureId, uv: Rect, tint: Color32) -> Mesh {
        let mut mesh = Mesh::with_texture(texture_id);
        let outline = self.path.to_points();
        if outline.len() < 3 {
            return mesh;
        }

        let bounds = self.path.bounds();
        let to_uv = |pos: Pos2| {
            let t = (pos - bounds.min) / bounds.size();
            uv.lerp_inside(t)
        };

        let center = bounds.center();
        mesh.vertices.push(Vertex {
            pos: center,
            uv: to_uv(center),
            color: tint,
        });
        for pos in &outline {
            mesh.vertices.push(Vertex {
                pos: *pos,
                uv: to_uv(*pos),
                color: tint,
            });
        }

        let n = outline.len() as u32;
        for i in 0..n {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
        }
        mesh
    }
}

/// Turns bubble outlines into [`BubbleShape`]s for one resolved style
#[derive(Debug, Clone)]
pub struct BubbleRenderer {
    style: ResolvedStyle,
}

impl BubbleRenderer {
    pub fn for_style(style: &ResolvedStyle) -> Self {
        Self {
            style: style.clone(),
        }
    }

    /// Apply fill and border to an outline
    pub fn render(
        path: BubblePath,
        fill: Color32,
        border_color: Color32,
        border_width: f32,
    ) -> BubbleShape {
        BubbleShape {
            path,
            fill,
            stroke: stroke(border_color, border_width),
            masked: false,
        }
    }

    /// Second shape drawn behind stacked messages. Shares the primary's
    /// outline and is either flat or a full copy, depending on the variant.
    pub fn render_secondary(
        path: BubblePath,
        fill: Color32,
        border_color: Color32,
        border_width: f32,
        variant: SecondaryBubble,
    ) -> BubbleShape {
        match variant {
            SecondaryBubble::MatchPrimary => Self::render(path, fill, border_color, border_width),
            SecondaryBubble::Flat => BubbleShape {
                path,
                fill,
                stroke: Stroke::NONE,
                masked: false,
            },
        }
    }

    /// Outline for `bounds` using the style's radius and border
    pub fn path(&self, bounds: Rect) -> BubblePath {
        compute_path(bounds, self.style.corner_radius, self.style.border_width)
    }

    /// Primary bubble for `bounds`
    pub fn primary(&self, bounds: Rect) -> BubbleShape {
        let mut shape = Self::render(
            self.path(bounds),
            self.style.fill,
            self.style.border_color,
            self.style.border_width,
        );
        shape.masked = self.style.is_masked;
        shape
    }

    /// Secondary (stacked) bubble for `bounds`
    pub fn secondary(&self, bounds: Rect) -> BubbleShape {
        let mut shape = Self::render_secondary(
            self.path(bounds),
            self.style.fill,
            self.style.border_color,
            self.style.border_width,
            self.style.secondary,
        );
        shape.masked = self.style.is_masked;
        shape
    }
}

fn stroke(color: Color32, width: f32) -> Stroke {
    if width > 0.0 && width.is_finite() {
        Stroke::new(width, color)
    } else {
        Stroke::NONE
    }
}
