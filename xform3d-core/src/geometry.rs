/// Model data: a fixed indexed polyhedral mesh
use nalgebra::Point3;

use crate::Float;

/// A model-space vertex
pub type Vertex = Point3<Float>;

/// Polygon boundary as an ordered list of vertex indices
pub type Face = Vec<usize>;

/// Unordered pair of vertex indices
pub type Edge = [usize; 2];

/// Labels of the letter model's vertices, by index
pub const LETTER_P_LABELS: [&str; 16] = [
    "A", "B", "M", "O", "N", "P", "Q", "K", "E", "C", "D", "F", "G", "I", "L", "J",
];

/// An indexed polyhedral mesh.
///
/// Faces and edges refer to vertices by position in `vertices`. Indices are
/// not validated on construction; the traversal helpers below skip anything
/// out of range instead of panicking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<Edge>,
    pub labels: Vec<String>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>, edges: Vec<Edge>) -> Self {
        Self {
            vertices,
            faces,
            edges,
            labels: Vec::new(),
        }
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Arithmetic mean of all vertices (origin for an empty mesh)
    pub fn center(&self) -> Vertex {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.coords);
        Point3::from(sum / self.vertices.len() as Float)
    }

    /// Display name for a vertex: its label, or its index when unlabeled
    pub fn vertex_label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }

    /// `"A(0.5, 1, -3)"` style description of one vertex
    pub fn vertex_info(&self, index: usize) -> Option<String> {
        let v = self.vertices.get(index)?;
        Some(format!("{}({}, {}, {})", self.vertex_label(index), v.x, v.y, v.z))
    }

    pub fn description(&self) -> String {
        format!(
            "{} vertices, {} faces, {} edges",
            self.vertex_count(),
            self.face_count(),
            self.edge_count()
        )
    }

    /// Indices of `face` that resolve against `len` points, in face order.
    ///
    /// Out-of-range indices are dropped silently; a malformed face degrades
    /// to fewer points instead of failing the whole render pass.
    pub fn resolve_face(face: &[usize], len: usize) -> Vec<usize> {
        face.iter()
            .copied()
            .filter(|&i| {
                let ok = i < len;
                if !ok {
                    log::trace!("skipping face index {i} (only {len} points)");
                }
                ok
            })
            .collect()
    }

    /// Both endpoints of `edge`, or `None` if either is out of range
    pub fn resolve_edge(edge: &Edge, len: usize) -> Option<(usize, usize)> {
        let [a, b] = *edge;
        if a < len && b < len {
            Some((a, b))
        } else {
            log::trace!("skipping edge [{a}, {b}] (only {len} points)");
            None
        }
    }

    /// Iterate edges whose endpoints both resolve against `len` points
    pub fn valid_edges(&self, len: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .filter_map(move |edge| Self::resolve_edge(edge, len))
    }

    /// The stylized letter "П": two legs joined by a bar, 16 vertices and
    /// 10 polygonal faces.
    pub fn letter_p() -> Self {
        let vertices = [
            // back plane, z = -3
            (0.5, 1.0, -3.0),   // A
            (1.5, 1.0, -3.0),   // B
            (0.5, -1.0, -3.0),  // M
            (1.5, -1.0, -3.0),  // O
            (-0.5, 1.0, -3.0),  // N
            (-1.5, 1.0, -3.0),  // P
            (-1.5, -1.0, -3.0), // Q
            (-0.5, -1.0, -3.0), // K
            // inner bar underside, z = 1
            (-0.5, -1.0, 1.0), // E
            (0.5, -1.0, 1.0),  // C
            (-0.5, 1.0, 1.0),  // D
            (0.5, 1.0, 1.0),   // F
            // top, z = 2
            (-1.5, 1.0, 2.0),  // G
            (1.5, 1.0, 2.0),   // I
            (1.5, -1.0, 2.0),  // L
            (-1.5, -1.0, 2.0), // J
        ]
        .into_iter()
        .map(|(x, y, z)| Point3::new(x, y, z))
        .collect();

        let faces = vec![
            vec![0, 1, 3, 2],               // ABOM
            vec![5, 4, 7, 6],               // PNKQ
            vec![9, 11, 0, 2],              // CFAM
            vec![10, 8, 7, 4],              // DEKN
            vec![8, 9, 11, 10],             // ECFD
            vec![13, 14, 3, 1],             // ILOB
            vec![12, 15, 6, 5],             // GJQP
            vec![15, 12, 13, 14],           // JGIL
            vec![6, 7, 8, 9, 2, 3, 14, 15], // QKECMOLJ
            vec![1, 0, 11, 10, 4, 5, 12, 13], // BAFDNPGI
        ];

        // Each face outline, in face order; shared sides appear twice.
        let edges = faces
            .iter()
            .flat_map(|face: &Face| {
                (0..face.len()).map(move |i| [face[i], face[(i + 1) % face.len()]])
            })
            .collect();

        Self::new(vertices, faces, edges).with_labels(LETTER_P_LABELS)
    }
}
