/// Projection utilities: perspective view, planar projections and depth sort
use std::fmt;
use std::str::FromStr;

use nalgebra::Point2;

use crate::geometry::{Face, Mesh, Vertex};
use crate::{Error, Float, Result, EPSILON};

/// Coordinate plane for an orthographic projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Xy, Plane::Xz, Plane::Yz];

    pub fn tag(self) -> &'static str {
        match self {
            Plane::Xy => "xy",
            Plane::Xz => "xz",
            Plane::Yz => "yz",
        }
    }

    /// Names of the horizontal and vertical axes of the plane
    pub fn axis_labels(self) -> (char, char) {
        match self {
            Plane::Xy => ('X', 'Y'),
            Plane::Xz => ('X', 'Z'),
            Plane::Yz => ('Y', 'Z'),
        }
    }

    /// Caption for a panel showing this plane. Z is up and Y is depth, so
    /// `xz` is the front view and `xy` looks down from above.
    pub fn title(self) -> &'static str {
        match self {
            Plane::Xy => "XY (top)",
            Plane::Xz => "XZ (front)",
            Plane::Yz => "YZ (side)",
        }
    }

    /// Drop the coordinate normal to this plane
    pub fn project(self, v: &Vertex) -> Point2<Float> {
        match self {
            Plane::Xy => Point2::new(v.x, v.y),
            Plane::Xz => Point2::new(v.x, v.z),
            Plane::Yz => Point2::new(v.y, v.z),
        }
    }

    pub fn project_all(self, vertices: &[Vertex]) -> Vec<Point2<Float>> {
        vertices.iter().map(|v| self.project(v)).collect()
    }
}

impl FromStr for Plane {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xy" => Ok(Plane::Xy),
            "xz" => Ok(Plane::Xz),
            "yz" => Ok(Plane::Yz),
            other => Err(Error::UnsupportedPlane(other.to_string())),
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A transformed vertex mapped to screen space for one render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: Float,
    pub y: Float,
    /// The transformed vertex this point came from
    pub original: Vertex,
    pub index: usize,
}

/// Pinhole-style perspective with Y as depth and Z as screen-up.
///
/// This is a fixed-distance approximation, not a camera with a view
/// frustum: there is no clipping, and points with `y < -distance` project
/// mirrored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Viewer distance `D` in `D / (D + y)`
    pub distance: Float,
    /// Screen units per model unit
    pub scale: Float,
    pub offset_x: Float,
    pub offset_y: Float,
}

impl PerspectiveCamera {
    pub const DEFAULT_DISTANCE: Float = 300.0;
    pub const DEFAULT_SCALE: Float = 50.0;

    /// Camera centred on a `width` x `height` screen
    pub fn new(width: Float, height: Float) -> Self {
        Self {
            offset_x: width / 2.0,
            offset_y: height / 2.0,
            ..Self::default()
        }
    }

    /// Project one transformed vertex.
    ///
    /// Fails with [`Error::DegenerateProjection`] when `distance + y` is
    /// (numerically) zero, where the perspective factor is undefined.
    pub fn project_point(&self, index: usize, v: &Vertex) -> Result<ScreenPoint> {
        let denom = self.distance + v.y;
        if denom.abs() < EPSILON {
            return Err(Error::DegenerateProjection { index, depth: v.y });
        }
        let perspective = self.distance / denom;

        Ok(ScreenPoint {
            x: self.offset_x + v.x * self.scale * perspective,
            y: self.offset_y - v.z * self.scale * perspective,
            original: *v,
            index,
        })
    }

    /// Project a whole vertex list, stopping at the first degenerate vertex
    pub fn project_vertices(&self, vertices: &[Vertex]) -> Result<Vec<ScreenPoint>> {
        vertices
            .iter()
            .enumerate()
            .map(|(i, v)| self.project_point(i, v))
            .collect()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            distance: Self::DEFAULT_DISTANCE,
            scale: Self::DEFAULT_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// A face ready for painting, with its resolved points
#[derive(Debug, Clone, PartialEq)]
pub struct DepthFace {
    /// Position of the face in the mesh's face list
    pub index: usize,
    pub points: Vec<ScreenPoint>,
    /// Mean `y` of the transformed vertices
    pub depth: Float,
}

/// Order faces for the painter's algorithm: farthest (largest mean `y`) first.
///
/// Depth is the plain average over the face's resolvable vertices. Faces
/// listing fewer than three indices, or with fewer than three in-range
/// indices, are dropped. Ties keep their original face order.
pub fn sort_faces_by_depth(points: &[ScreenPoint], faces: &[Face]) -> Vec<DepthFace> {
    let mut sorted: Vec<DepthFace> = faces
        .iter()
        .enumerate()
        .filter(|(_, face)| face.len() >= 3)
        .filter_map(|(index, face)| {
            let resolved: Vec<ScreenPoint> = Mesh::resolve_face(face, points.len())
                .into_iter()
                .map(|i| points[i])
                .collect();
            if resolved.len() < 3 {
                return None;
            }
            let depth = resolved.iter().map(|p| p.original.y).sum::<Float>() / resolved.len() as Float;
            Some(DepthFace {
                index,
                points: resolved,
                depth,
            })
        })
        .collect();

    sorted.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    sorted
}

/// Uniform-scale mapping from plane coordinates to a panel, with the
/// vertical axis flipped so positive values point up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoViewport {
    pub width: Float,
    pub height: Float,
    pub scale: Float,
}

impl OrthoViewport {
    pub const DEFAULT_SCALE: Float = 25.0;

    pub fn new(width: Float, height: Float) -> Self {
        Self {
            width,
            height,
            scale: Self::DEFAULT_SCALE,
        }
    }

    pub fn to_screen(&self, p: &Point2<Float>) -> Point2<Float> {
        Point2::new(
            self.width / 2.0 + p.x * self.scale,
            self.height / 2.0 - p.y * self.scale,
        )
    }

    pub fn map_all(&self, points: &[Point2<Float>]) -> Vec<Point2<Float>> {
        points.iter().map(|p| self.to_screen(p)).collect()
    }
}
