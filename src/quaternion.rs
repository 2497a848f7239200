use std::ops::{Neg, Add, Mul};
use std::fmt;

use crate::vector::{Vec3, Vec4};
use crate::matrix::{Mat3x3, Mat4x4};

/// Rotation quaternion with scalar part `s` and vector part `v`.
///
/// Every operation returns a new value; nothing mutates in place.
/// Operations that assume a rotation (`rotate`, the matrix conversions)
/// require `self` to be unit length, which is not enforced.
#[repr(C)]
#[derive(PartialEq, Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quaternion {
    pub s: f32,
    pub v: Vec3,
}
impl Quaternion {
    pub fn new(s: f32, xi: f32, yj: f32, zk: f32) -> Self {
        Self {
            s,
            v: Vec3::new(xi, yj, zk),
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// The additive identity. Not a valid rotation: its magnitude is zero.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// `axis` should be near-unit length; the final normalization absorbs
    /// small drift but cannot correct a badly scaled axis. A near-zero axis
    /// leaves nothing to normalize and the degenerate quaternion is
    /// returned as-is.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half = angle * 0.5;
        let sin_half = half.sin();
        Self::new(
            half.cos(),
            axis.x * sin_half,
            axis.y * sin_half,
            axis.z * sin_half,
        ).normalized()
    }

    /// Embed a vector as a pure quaternion, the conjugation intermediate.
    pub fn from_vector(v: Vec3) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Extract the rotation from a 3 x 3 rotation matrix.
    pub fn from_mat3(m: Mat3x3) -> Self {
        let trace = m.trace();

        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();

            Self::new(
                0.25 / s,
                (m.c1.z - m.c2.y) * s,
                (m.c2.x - m.c0.z) * s,
                (m.c0.y - m.c1.x) * s,
            )
        }
        else {
            // The trace formula divides by a near-zero root here; the
            // largest diagonal entry keeps the root bounded away from zero.
            let max_diag = m.c0.x.max(m.c1.y.max(m.c2.z));

            if (m.c0.x - max_diag).abs() < f32::EPSILON {
                let s = (1.0 + m.c0.x - m.c1.y - m.c2.z).sqrt() * 2.0;

                Self::new(
                    (m.c1.z - m.c2.y) / s,
                    0.25 * s,
                    (m.c0.y + m.c1.x) / s,
                    (m.c0.z + m.c2.x) / s,
                )
            }
            else if (m.c1.y - max_diag).abs() < f32::EPSILON {
                let s = (1.0 + m.c1.y - m.c0.x - m.c2.z).sqrt() * 2.0;

                Self::new(
                    (m.c2.x - m.c0.z) / s,
                    (m.c0.y + m.c1.x) / s,
                    0.25 * s,
                    (m.c1.z + m.c2.y) / s,
                )
            }
            else {
                let s = (1.0 + m.c2.z - m.c0.x - m.c1.y).sqrt() * 2.0;

                Self::new(
                    (m.c0.y - m.c1.x) / s,
                    (m.c0.z + m.c2.x) / s,
                    (m.c1.z + m.c2.y) / s,
                    0.25 * s,
                )
            }
        }
    }

    /// Extract the rotation from the upper-left block of a 4 x 4
    /// homogeneous transform. Translation is ignored.
    pub fn from_mat4(m: Mat4x4) -> Self {
        // The homogeneous row contributes 1 to the trace.
        let trace = m.c0.x + m.c1.y + m.c2.z + 1.0;

        if trace > 0.0 {
            let s = 0.5 / trace.sqrt();

            Self::new(
                0.25 / s,
                (m.c1.z - m.c2.y) * s,
                (m.c2.x - m.c0.z) * s,
                (m.c0.y - m.c1.x) * s,
            )
        }
        else {
            let max_diag = m.c0.x.max(m.c1.y.max(m.c2.z));

            if (m.c0.x - max_diag).abs() < f32::EPSILON {
                let s = (1.0 + m.c0.x - m.c1.y - m.c2.z).sqrt() * 2.0;

                Self::new(
                    (m.c1.z - m.c2.y) / s,
                    0.25 * s,
                    (m.c0.y + m.c1.x) / s,
                    (m.c0.z + m.c2.x) / s,
                )
            }
            else if (m.c1.y - max_diag).abs() < f32::EPSILON {
                let s = (1.0 + m.c1.y - m.c0.x - m.c2.z).sqrt() * 2.0;

                Self::new(
                    (m.c2.x - m.c0.z) / s,
                    (m.c0.y + m.c1.x) / s,
                    0.25 * s,
                    (m.c1.z + m.c2.y) / s,
                )
            }
            else {
                let s = (1.0 + m.c2.z - m.c0.x - m.c1.y).sqrt() * 2.0;

                Self::new(
                    (m.c0.y - m.c1.x) / s,
                    (m.c0.z + m.c2.x) / s,
                    (m.c1.z + m.c2.y) / s,
                    0.25 * s,
                )
            }
        }
    }

    pub fn len(&self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn len_sq(&self) -> f32 {
        self.v.x*self.v.x + self.v.y*self.v.y + self.v.z*self.v.z + self.s*self.s
    }

    /// Scale to unit length.
    ///
    /// A quaternion with near-zero magnitude is returned unchanged rather
    /// than dividing through and poisoning the result with NaNs.
    pub fn normalized(&self) -> Self {
        let len = self.len();
        if len < f32::EPSILON {
            log::warn!("cannot normalize near-zero quaternion");
            return *self;
        }
        Self::new(self.s / len, self.v.x / len, self.v.y / len, self.v.z / len)
    }

    pub fn dot(&self, quat: Quaternion) -> f32 {
        self.v.x*quat.v.x + self.v.y*quat.v.y + self.v.z*quat.v.z + self.s*quat.s
    }

    /// Negate the vector part. Equal to the inverse for a unit quaternion.
    pub fn conjugate(&self) -> Self {
        Self {
            s: self.s,
            v: -self.v,
        }
    }

    /// Rotate `v` through the conjugation sandwich.
    ///
    /// `self` must be unit length for the result to be a pure rotation.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let q_v = Self::from_vector(v);
        (self.conjugate() * (q_v * *self)).v
    }

    /// `rotate` for homogeneous vectors; the w component comes back as 0.
    pub fn rotate_vec4(&self, v: Vec4) -> Vec4 {
        let rot = self.rotate(v.xyz());
        Vec4::new(rot.x, rot.y, rot.z, 0.0)
    }

    pub fn to_mat3(&self) -> Mat3x3 {
        Mat3x3::from(*self)
    }

    pub fn to_mat4(&self) -> Mat4x4 {
        Mat4x4::from(*self)
    }

    /// The rotation angle in radians.
    ///
    /// The scalar part is clamped to [-1, 1] first, so a slightly
    /// denormalized quaternion cannot push `acos` out of its domain.
    pub fn angle(&self) -> f32 {
        2.0 * self.s.clamp(-1.0, 1.0).acos()
    }

    /// The rotation axis and angle.
    ///
    /// For a rotation indistinguishable from the identity the axis is
    /// arbitrary; `(Vec3::zero(), 0.0)` is returned in that case.
    pub fn axis_angle(&self) -> (Vec3, f32) {
        let angle = self.angle();
        let sin_half = (angle * 0.5).sin();
        if sin_half.abs() < f32::EPSILON {
            return (Vec3::zero(), 0.0);
        }
        (self.v / sin_half, angle)
    }
}

/// The identity rotation, not the zero quaternion: a default-constructed
/// quaternion composes as a no-op.
impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Mat3x3> for Quaternion {
    fn from(mat: Mat3x3) -> Quaternion {
        Quaternion::from_mat3(mat)
    }
}

impl From<Mat4x4> for Quaternion {
    fn from(mat: Mat4x4) -> Quaternion {
        Quaternion::from_mat4(mat)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            s: -self.s,
            v: -self.v,
        }
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(
            self.s + other.s,
            self.v.x + other.v.x,
            self.v.y + other.v.y,
            self.v.z + other.v.z,
        )
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self::new(
            self.s*other.s - self.v.x*other.v.x - self.v.y*other.v.y - self.v.z*other.v.z,
            self.s*other.v.x + self.v.x*other.s - self.v.y*other.v.z + self.v.z*other.v.y,
            self.s*other.v.y + self.v.x*other.v.z + self.v.y*other.s - self.v.z*other.v.x,
            self.s*other.v.z - self.v.x*other.v.y + self.v.y*other.v.x + self.v.z*other.s,
        )
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Self::new(self.s * other, self.v.x * other, self.v.y * other, self.v.z * other)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "
            \rs: {}
            \rx: {},
            \ry: {}
            \rz: {}\n",
            self.s,
            self.v.x,
            self.v.y,
            self.v.z
        )
    }
}




#[test]
fn axis_angle_unit_magnitude() {
    let q = Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 10.0), 1.0);
    approx::assert_relative_eq!(q.len(), 1.0, epsilon = 1e-6);

    let q = Quaternion::from_axis_angle(Vec3::new(1.0, -2.0, 2.0), 4.5);
    approx::assert_relative_eq!(q.len(), 1.0, epsilon = 1e-6);
}

#[test]
fn rotate_x_to_y() {
    let q = Quaternion::from_axis_angle(Vec3::unit_z(), std::f32::consts::FRAC_PI_2);
    let rot = q.rotate_vec4(Vec4::new(1.0, 0.0, 0.0, 0.0));

    approx::assert_relative_eq!(rot.x, 0.0, epsilon = 1e-6);
    approx::assert_relative_eq!(rot.y, 1.0, epsilon = 1e-6);
    approx::assert_relative_eq!(rot.z, 0.0, epsilon = 1e-6);
    assert!(rot.w == 0.0);
}

#[test]
fn quarter_turn_angle() {
    let q = Quaternion::from_axis_angle(Vec3::unit_z(), std::f32::consts::FRAC_PI_2);
    approx::assert_relative_eq!(q.angle(), std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
}

#[test]
fn matrix_fixed_point_on_axis() {
    let axis = Vec3::new(1.0, 2.0, 2.0).normalized();
    let q = Quaternion::from_axis_angle(axis, 0.7);
    let rot = axis * q.to_mat3();

    approx::assert_relative_eq!(rot.x, axis.x, epsilon = 1e-6);
    approx::assert_relative_eq!(rot.y, axis.y, epsilon = 1e-6);
    approx::assert_relative_eq!(rot.z, axis.z, epsilon = 1e-6);
}

#[test]
fn rotate_matches_matrix() {
    let q = Quaternion::from_axis_angle(Vec3::new(0.3, -0.5, 0.8).normalized(), 2.1);
    let v = Vec3::new(1.0, 2.0, -0.5);

    let by_quat = q.rotate(v);
    let by_mat = v * q.to_mat3();

    approx::assert_relative_eq!(by_quat.x, by_mat.x, epsilon = 1e-6);
    approx::assert_relative_eq!(by_quat.y, by_mat.y, epsilon = 1e-6);
    approx::assert_relative_eq!(by_quat.z, by_mat.z, epsilon = 1e-6);
}

#[test]
fn matrix_roundtrip() {
    let cases = [
        (Vec3::unit_x(), 0.4),
        (Vec3::unit_y(), std::f32::consts::FRAC_PI_2),
        (Vec3::new(1.0, 1.0, 1.0).normalized(), 2.5),
        // Negative traces, one per dominant diagonal.
        (Vec3::unit_x(), std::f32::consts::PI),
        (Vec3::unit_y(), std::f32::consts::PI),
        (Vec3::unit_z(), std::f32::consts::PI),
        (Vec3::new(0.3, -0.5, 0.8).normalized(), 3.0),
    ];
    for (axis, angle) in cases {
        let q = Quaternion::from_axis_angle(axis, angle);
        let back = Quaternion::from(q.to_mat3());

        // Equal up to quaternion sign.
        approx::assert_relative_eq!(back.dot(q).abs(), 1.0, epsilon = 1e-5);
        approx::assert_relative_eq!(back.len(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn matrix_roundtrip_diagonal_tie() {
    let q = Quaternion::from_axis_angle(
        Vec3::new(1.0, 1.0, 0.0).normalized(),
        std::f32::consts::PI,
    );
    let back = Quaternion::from(q.to_mat3());
    approx::assert_relative_eq!(back.dot(q).abs(), 1.0, epsilon = 1e-5);
}

#[test]
fn matrix_roundtrip_mat4() {
    let cases = [
        (Vec3::unit_z(), 1.2),
        (Vec3::unit_x(), std::f32::consts::PI),
        (Vec3::new(-1.0, 2.0, 0.5).normalized(), 2.9),
    ];
    for (axis, angle) in cases {
        let q = Quaternion::from_axis_angle(axis, angle);
        let back = Quaternion::from(q.to_mat4());

        approx::assert_relative_eq!(back.dot(q).abs(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn from_identity_matrix() {
    assert!(Quaternion::from(Mat3x3::identity()) == Quaternion::identity());
    assert!(Quaternion::from(Mat4x4::identity()) == Quaternion::identity());
}

#[test]
fn product_associative() {
    let a = Quaternion::from_axis_angle(Vec3::unit_x(), 0.3);
    let b = Quaternion::from_axis_angle(Vec3::new(1.0, 2.0, 2.0).normalized(), 1.1);
    let c = Quaternion::from_axis_angle(Vec3::unit_z(), -2.0);

    let lhs = (a * b) * c;
    let rhs = a * (b * c);

    approx::assert_relative_eq!(lhs.s, rhs.s, epsilon = 1e-6);
    approx::assert_relative_eq!(lhs.v.x, rhs.v.x, epsilon = 1e-6);
    approx::assert_relative_eq!(lhs.v.y, rhs.v.y, epsilon = 1e-6);
    approx::assert_relative_eq!(lhs.v.z, rhs.v.z, epsilon = 1e-6);
}

#[test]
fn product_not_commutative() {
    let a = Quaternion::from_axis_angle(Vec3::unit_x(), std::f32::consts::FRAC_PI_2);
    let b = Quaternion::from_axis_angle(Vec3::unit_y(), std::f32::consts::FRAC_PI_2);

    assert!(a * b != b * a);
}

#[test]
fn conjugate_involution() {
    let q = Quaternion::new(0.5, -1.0, 2.0, 3.0);
    assert!(q.conjugate().conjugate() == q);
}

#[test]
fn dot_of_self() {
    let q = Quaternion::new(0.5, -1.0, 2.0, 3.0);
    approx::assert_relative_eq!(q.dot(q), q.len_sq(), epsilon = 1e-6);
}

#[test]
fn normalize_zero_quat() {
    let q = Quaternion::zero().normalized();
    assert!(q == Quaternion::zero());
    assert!(!q.s.is_nan() && !q.v.x.is_nan());
}

#[test]
fn algebra_componentwise() {
    let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    let b = Quaternion::new(0.5, -1.0, 1.0, 2.0);

    assert!(a + b == Quaternion::new(1.5, 1.0, 4.0, 6.0));
    assert!(a * 2.0 == Quaternion::new(2.0, 4.0, 6.0, 8.0));
    assert!(-a == Quaternion::new(-1.0, -2.0, -3.0, -4.0));
}

#[test]
fn axis_angle_roundtrip() {
    let q = Quaternion::from_axis_angle(Vec3::unit_y(), 1.3);
    let (axis, angle) = q.axis_angle();

    approx::assert_relative_eq!(angle, 1.3, epsilon = 1e-6);
    approx::assert_relative_eq!(axis.x, 0.0, epsilon = 1e-6);
    approx::assert_relative_eq!(axis.y, 1.0, epsilon = 1e-6);
    approx::assert_relative_eq!(axis.z, 0.0, epsilon = 1e-6);
}

#[test]
fn axis_angle_of_identity() {
    let (axis, angle) = Quaternion::identity().axis_angle();
    assert!(axis == Vec3::zero());
    assert!(angle == 0.0);
}

#[test]
fn antipodal_same_rotation() {
    let q = Quaternion::from_axis_angle(Vec3::new(0.3, -0.5, 0.8).normalized(), 1.2);
    assert!(q.to_mat3() == (-q).to_mat3());
    approx::assert_relative_eq!(q.dot(-q), -1.0, epsilon = 1e-6);
}

#[test]
fn default_is_identity() {
    assert!(Quaternion::default() == Quaternion::identity());
}

#[test]
fn matches_cgmath() {
    use cgmath::{Rotation, Rotation3};

    let axis = Vec3::new(0.3, -0.5, 0.8).normalized();
    let angle = 1.2;
    let q = Quaternion::from_axis_angle(axis, angle);
    let cq = cgmath::Quaternion::from_axis_angle(
        cgmath::Vector3::new(axis.x, axis.y, axis.z),
        cgmath::Rad(angle),
    );

    let mat: [[f32; 3]; 3] = q.to_mat3().into();
    let cmat: [[f32; 3]; 3] = cgmath::Matrix3::from(cq).into();
    for col in 0..3 {
        for row in 0..3 {
            approx::assert_relative_eq!(mat[col][row], cmat[col][row], epsilon = 1e-6);
        }
    }

    let v = Vec3::new(1.0, 2.0, -0.5);
    let rot = q.rotate(v);
    let crot = cq.rotate_vector(cgmath::Vector3::new(v.x, v.y, v.z));
    approx::assert_relative_eq!(rot.x, crot.x, epsilon = 1e-6);
    approx::assert_relative_eq!(rot.y, crot.y, epsilon = 1e-6);
    approx::assert_relative_eq!(rot.z, crot.z, epsilon = 1e-6);
}
