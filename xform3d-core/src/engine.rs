/// Transformation engine: parameter state and the fixed composition pipeline
use nalgebra::{Matrix4, Point2, Vector3};

use crate::projection::Plane;
use crate::transform::Transform;
use crate::{Float, Result, Vertex};

/// User-controlled transform parameters. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub scale: Vector3<Float>,
    pub translate: Vector3<Float>,
    /// Independent rotations about X, Y and Z
    pub rotate: Vector3<Float>,
    pub custom_axis: Vector3<Float>,
    pub custom_angle: Float,
    /// Viewer orbit applied after every model-space step
    pub view_rotation: Vector3<Float>,
}

impl TransformState {
    /// The composition pipeline, in application order.
    ///
    /// Each stage is right-multiplied onto the accumulator, starting from
    /// the identity.
    pub fn stages(&self) -> [Stage; 9] {
        [
            Stage::Scale(self.scale),
            Stage::RotateX(self.rotate.x),
            Stage::RotateY(self.rotate.y),
            Stage::RotateZ(self.rotate.z),
            Stage::AxisAngle {
                axis: self.custom_axis,
                angle: self.custom_angle,
            },
            Stage::Translate(self.translate),
            Stage::ViewY(self.view_rotation.y),
            Stage::ViewX(self.view_rotation.x),
            Stage::ViewZ(self.view_rotation.z),
        ]
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            translate: Vector3::zeros(),
            rotate: Vector3::zeros(),
            custom_axis: Vector3::new(1.0, 1.0, 1.0),
            custom_angle: 0.0,
            view_rotation: Vector3::zeros(),
        }
    }
}

/// One step of the composition pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    Scale(Vector3<Float>),
    RotateX(Float),
    RotateY(Float),
    RotateZ(Float),
    AxisAngle { axis: Vector3<Float>, angle: Float },
    Translate(Vector3<Float>),
    ViewY(Float),
    ViewX(Float),
    ViewZ(Float),
}

impl Stage {
    /// Matrix contributed by this stage, or `None` when it is skipped.
    ///
    /// Model rotations and the custom-axis rotation are left out entirely
    /// when their angle is exactly zero. Scale, translate and the view
    /// orbit are always multiplied in, even at their neutral values.
    pub fn matrix(&self) -> Option<Matrix4<Float>> {
        match *self {
            Stage::Scale(s) => Some(Transform::scaling(s.x, s.y, s.z)),
            Stage::RotateX(a) => (a != 0.0).then(|| Transform::rotation_x(a)),
            Stage::RotateY(a) => (a != 0.0).then(|| Transform::rotation_y(a)),
            Stage::RotateZ(a) => (a != 0.0).then(|| Transform::rotation_z(a)),
            Stage::AxisAngle { axis, angle } => {
                (angle != 0.0).then(|| Transform::rotation_around_axis(&axis, angle))
            }
            Stage::Translate(t) => Some(Transform::translation(t.x, t.y, t.z)),
            Stage::ViewY(a) => Some(Transform::rotation_y(a)),
            Stage::ViewX(a) => Some(Transform::rotation_x(a)),
            Stage::ViewZ(a) => Some(Transform::rotation_z(a)),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.matrix().is_none()
    }
}

/// Fold the pipeline of `state` into one composite matrix
pub fn compose(state: &TransformState) -> Matrix4<Float> {
    let mut active = 0;
    let matrix = state
        .stages()
        .iter()
        .filter_map(Stage::matrix)
        .fold(Transform::identity(), |acc, m| {
            active += 1;
            Transform::multiply(&acc, &m)
        });
    log::debug!("composed transformation matrix from {active} active stages");
    matrix
}

/// Transform every vertex by the composite matrix of `state`
pub fn compute(state: &TransformState, vertices: &[Vertex]) -> Vec<Vertex> {
    let matrix = compose(state);
    transform_all(&matrix, vertices)
}

fn transform_all(matrix: &Matrix4<Float>, vertices: &[Vertex]) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| Transform::multiply_vector(matrix, v))
        .collect()
}

/// Owner of the transform parameters for one viewing session.
///
/// The state is the source of truth; the matrix is recomputed on every
/// [`apply_transformations`](Self::apply_transformations) call and kept only
/// for display.
#[derive(Debug, Clone)]
pub struct Transformations {
    state: TransformState,
    matrix: Matrix4<Float>,
}

impl Transformations {
    pub fn new() -> Self {
        Self {
            state: TransformState::default(),
            matrix: Transform::identity(),
        }
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TransformState {
        &mut self.state
    }

    pub fn set_scale(&mut self, x: Float, y: Float, z: Float) {
        self.state.scale = Vector3::new(x, y, z);
    }

    pub fn set_translate(&mut self, x: Float, y: Float, z: Float) {
        self.state.translate = Vector3::new(x, y, z);
    }

    pub fn set_rotate(&mut self, x: Float, y: Float, z: Float) {
        self.state.rotate = Vector3::new(x, y, z);
    }

    pub fn set_view_rotation(&mut self, x: Float, y: Float, z: Float) {
        self.state.view_rotation = Vector3::new(x, y, z);
    }

    /// Set axis and angle together. The axis is not validated; a zero axis
    /// produces a degenerate matrix.
    pub fn set_custom_rotation(&mut self, axis: Vector3<Float>, angle: Float) {
        self.state.custom_axis = axis;
        self.state.custom_angle = angle;
    }

    /// Change only the custom angle, keeping the current axis
    pub fn set_custom_angle(&mut self, angle: Float) {
        self.state.custom_angle = angle;
    }

    /// Recompute the composite matrix and apply it to every vertex
    pub fn apply_transformations(&mut self, vertices: &[Vertex]) -> Vec<Vertex> {
        self.matrix = compose(&self.state);
        transform_all(&self.matrix, vertices)
    }

    /// Drop one coordinate of every vertex, selecting the plane by tag
    /// (`"xy"`, `"xz"` or `"yz"`).
    pub fn get_projections(&self, vertices: &[Vertex], plane: &str) -> Result<Vec<Point2<Float>>> {
        let plane: Plane = plane.parse()?;
        Ok(plane.project_all(vertices))
    }

    pub fn reset_all(&mut self) {
        self.state = TransformState::default();
        self.matrix = Transform::identity();
    }

    pub fn reset_scale(&mut self) {
        self.state.scale = TransformState::default().scale;
    }

    pub fn reset_translate(&mut self) {
        self.state.translate = Vector3::zeros();
    }

    /// Clear the axis rotations and the custom angle. The custom axis is
    /// kept so the next angle change rotates about the same axis.
    pub fn reset_rotation(&mut self) {
        self.state.rotate = Vector3::zeros();
        self.state.custom_angle = 0.0;
    }

    pub fn reset_view(&mut self) {
        self.state.view_rotation = Vector3::zeros();
    }

    /// Matrix from the most recent `apply_transformations` call
    pub fn matrix(&self) -> &Matrix4<Float> {
        &self.matrix
    }

    pub fn matrix_string(&self) -> String {
        Transform::to_ordered_string(&self.matrix)
    }
}

impl Default for Transformations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Mesh};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    const EPS: Float = 1e-9;

    fn unit_x() -> Vec<Vertex> {
        vec![Point3::new(1.0, 0.0, 0.0)]
    }

    #[test]
    fn test_default_state_is_identity() {
        let mesh = Mesh::letter_p();
        let mut t = Transformations::new();
        let out = t.apply_transformations(&mesh.vertices);

        assert_eq!(out.len(), mesh.vertices.len());
        for (a, b) in out.iter().zip(&mesh.vertices) {
            assert_relative_eq!(a, b, epsilon = EPS);
        }
        assert_relative_eq!(*t.matrix(), Matrix4::identity(), epsilon = EPS);
    }

    #[test]
    fn test_compute_does_not_touch_input() {
        let mesh = Mesh::letter_p();
        let before = mesh.vertices.clone();
        let state = TransformState {
            scale: Vector3::new(3.0, 3.0, 3.0),
            ..Default::default()
        };
        let out = compute(&state, &mesh.vertices);
        assert_eq!(mesh.vertices, before);
        assert_relative_eq!(out[0], Point3::new(1.5, 3.0, -9.0), epsilon = EPS);
    }

    #[test]
    fn test_scale_only() {
        let mut t = Transformations::new();
        t.set_scale(2.0, 1.0, 1.0);
        let out = t.apply_transformations(&[Point3::new(1.0, 1.0, 1.0)]);
        assert_relative_eq!(out[0], Point3::new(2.0, 1.0, 1.0), epsilon = EPS);
    }

    #[test]
    fn test_rotation_order_matters() {
        let mut t = Transformations::new();
        t.set_rotate(90.0, 90.0, 0.0);
        let pipeline = t.apply_transformations(&unit_x());

        // Rx is to the left of Ry in the product, so Ry acts on the vertex first.
        assert_relative_eq!(pipeline[0], Point3::new(0.0, 1.0, 0.0), epsilon = EPS);

        let swapped = Transform::multiply(&Transform::rotation_y(90.0), &Transform::rotation_x(90.0));
        let swapped = Transform::multiply_vector(&swapped, &unit_x()[0]);
        assert_relative_eq!(swapped, Point3::new(0.0, 0.0, -1.0), epsilon = EPS);

        assert!((pipeline[0] - swapped).norm() > 1.0);
    }

    #[test]
    fn test_custom_axis_rotation() {
        let mut t = Transformations::new();
        t.set_custom_rotation(Vector3::new(0.0, 0.0, 1.0), 90.0);
        let out = t.apply_transformations(&unit_x());
        assert_relative_eq!(out[0], Point3::new(0.0, 1.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_translation_is_applied_in_rotated_frame() {
        let mut t = Transformations::new();
        t.set_rotate(0.0, 0.0, 90.0);
        t.set_translate(1.0, 0.0, 0.0);
        let out = t.apply_transformations(&[Point3::origin()]);
        // Rz(90) sits left of T in the product and turns the +X offset into +Y.
        assert_relative_eq!(out[0], Point3::new(0.0, 1.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_translate_round_trip_with_frozen_state() {
        let mesh = Mesh::letter_p();
        let tv = 1.75;

        // Without rotation or scale the two passes simply add up.
        let mut t = Transformations::new();
        t.set_translate(tv, tv, tv);
        let moved = t.apply_transformations(&mesh.vertices);
        t.set_translate(-tv, -tv, -tv);
        let back = t.apply_transformations(&moved);
        for (a, b) in back.iter().zip(&mesh.vertices) {
            assert_relative_eq!(a, b, epsilon = EPS);
        }

        // With rotation and scale frozen, +t and -t displace every vertex by
        // opposite amounts around the untranslated result.
        let mut t = Transformations::new();
        t.set_scale(2.0, 0.5, 1.0);
        t.set_rotate(30.0, -45.0, 10.0);
        t.set_view_rotation(30.0, 45.0, 0.0);
        let base = t.apply_transformations(&mesh.vertices);
        t.set_translate(tv, tv, tv);
        let plus = t.apply_transformations(&mesh.vertices);
        t.set_translate(-tv, -tv, -tv);
        let minus = t.apply_transformations(&mesh.vertices);
        for ((p, m), b) in plus.iter().zip(&minus).zip(&base) {
            assert_relative_eq!(p.coords + m.coords, b.coords * 2.0, epsilon = EPS);
        }

        // Feeding the rotated result back through the same state is not an undo.
        let twice = t.apply_transformations(&plus);
        assert!((twice[0] - base[0]).norm() > 1e-3);
    }

    #[test]
    fn test_inert_stages_are_skipped() {
        let state = TransformState::default();
        let inert: Vec<bool> = state.stages().iter().map(Stage::is_inert).collect();
        assert_eq!(
            inert,
            vec![false, true, true, true, true, false, false, false, false]
        );

        assert!(Stage::RotateX(0.0).matrix().is_none());
        assert!(Stage::RotateX(-0.0).matrix().is_none());
        assert!(Stage::RotateX(1e-12).matrix().is_some());
        assert_eq!(Stage::ViewX(0.0).matrix(), Some(Matrix4::identity()));
    }

    #[test]
    fn test_compose_matches_explicit_product() {
        let state = TransformState {
            scale: Vector3::new(1.5, 2.0, 0.5),
            translate: Vector3::new(1.0, -2.0, 3.0),
            rotate: Vector3::new(10.0, 20.0, 30.0),
            custom_axis: Vector3::new(1.0, 2.0, 3.0),
            custom_angle: 40.0,
            view_rotation: Vector3::new(50.0, 60.0, 70.0),
        };
        let expected = Transform::scaling(1.5, 2.0, 0.5)
            * Transform::rotation_x(10.0)
            * Transform::rotation_y(20.0)
            * Transform::rotation_z(30.0)
            * Transform::rotation_around_axis(&Vector3::new(1.0, 2.0, 3.0), 40.0)
            * Transform::translation(1.0, -2.0, 3.0)
            * Transform::rotation_y(60.0)
            * Transform::rotation_x(50.0)
            * Transform::rotation_z(70.0);
        assert_relative_eq!(compose(&state), expected, epsilon = EPS);
    }

    #[test]
    fn test_zero_custom_axis_stays_finite() {
        let mut t = Transformations::new();
        t.set_custom_rotation(Vector3::zeros(), 90.0);
        let out = t.apply_transformations(&[Point3::new(1.0, 2.0, 3.0)]);
        // cos(90) collapses the vertex onto the origin.
        assert_relative_eq!(out[0], Point3::origin(), epsilon = EPS);
        assert!(t.matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_get_projections() {
        let t = Transformations::new();
        let v = [Point3::new(1.0, 2.0, 3.0)];

        assert_eq!(t.get_projections(&v, "xy").unwrap(), vec![Point2::new(1.0, 2.0)]);
        assert_eq!(t.get_projections(&v, "xz").unwrap(), vec![Point2::new(1.0, 3.0)]);
        assert_eq!(t.get_projections(&v, "yz").unwrap(), vec![Point2::new(2.0, 3.0)]);

        assert_eq!(
            t.get_projections(&v, "zx"),
            Err(Error::UnsupportedPlane("zx".to_string()))
        );
    }

    #[test]
    fn test_resets() {
        let mut t = Transformations::new();
        t.set_scale(2.0, 3.0, 4.0);
        t.set_translate(1.0, 1.0, 1.0);
        t.set_rotate(10.0, 20.0, 30.0);
        t.set_custom_rotation(Vector3::new(0.0, 1.0, 0.0), 45.0);
        t.set_view_rotation(30.0, 45.0, 0.0);

        t.reset_scale();
        assert_eq!(t.state().scale, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(t.state().translate, Vector3::new(1.0, 1.0, 1.0));

        t.reset_translate();
        assert_eq!(t.state().translate, Vector3::zeros());

        t.reset_rotation();
        assert_eq!(t.state().rotate, Vector3::zeros());
        assert_eq!(t.state().custom_angle, 0.0);
        assert_eq!(t.state().custom_axis, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(t.state().view_rotation, Vector3::new(30.0, 45.0, 0.0));

        t.reset_view();
        assert_eq!(t.state().view_rotation, Vector3::zeros());
    }

    #[test]
    fn test_reset_all_restores_defaults_and_matrix() {
        let mut t = Transformations::new();
        t.set_custom_rotation(Vector3::new(0.0, 1.0, 0.0), 45.0);
        t.set_translate(1.0, 2.0, 3.0);
        t.apply_transformations(&unit_x());
        assert_ne!(*t.matrix(), Matrix4::identity());

        t.reset_all();
        assert_eq!(*t.state(), TransformState::default());
        assert_eq!(t.state().custom_axis, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(*t.matrix(), Matrix4::identity());
    }

    #[test]
    fn test_set_custom_angle_keeps_axis() {
        let mut t = Transformations::new();
        t.set_custom_rotation(Vector3::new(0.0, 0.0, 2.0), 10.0);
        t.set_custom_angle(90.0);
        assert_eq!(t.state().custom_axis, Vector3::new(0.0, 0.0, 2.0));
        let out = t.apply_transformations(&unit_x());
        assert_relative_eq!(out[0], Point3::new(0.0, 1.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_matrix_string_tracks_last_apply() {
        let mut t = Transformations::new();
        t.set_translate(2.0, 0.0, 0.0);
        assert!(t.matrix_string().starts_with("   1.000    0.000    0.000    0.000 "));

        t.apply_transformations(&[]);
        assert!(t.matrix_string().starts_with("   1.000    0.000    0.000    2.000 "));
    }
}
