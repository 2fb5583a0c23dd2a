use cgmath::{Euler, InnerSpace, Matrix3, Matrix4, Rad};

use super::Axis;

/// Order in which the three axis rotations are applied, first to last.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RotationOrder(pub [Axis; 3]);

impl RotationOrder {
    pub const XYZ: Self = RotationOrder([Axis::X, Axis::Y, Axis::Z]);

    /// Composes `angles` (indexed by axis) into a single rotation.
    pub fn to_matrix(self, angles: [Rad<f32>; 3]) -> Matrix3<f32> {
        let RotationOrder([first, second, third]) = self;
        let rot = |axis: Axis| {
            let angle = angles[axis.index()];
            match axis {
                Axis::X => Matrix3::from_angle_x(angle),
                Axis::Y => Matrix3::from_angle_y(angle),
                Axis::Z => Matrix3::from_angle_z(angle),
            }
        };
        rot(third) * rot(second) * rot(first)
    }
}

impl Default for RotationOrder {
    fn default() -> Self {
        Self::XYZ
    }
}

pub fn rotation_part(m: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// XYZ euler angles of a rotation, scale removed.
///
/// Both solutions of the decomposition are computed and the one with the
/// smaller total magnitude wins, so a pose keyed at small angles reads back
/// as small angles instead of their flipped equivalent.
pub fn matrix_to_euler_xyz(m: &Matrix3<f32>) -> Euler<Rad<f32>> {
    let m = Matrix3::from_cols(
        normalize_or_zero(m.x),
        normalize_or_zero(m.y),
        normalize_or_zero(m.z),
    );
    let cy = m.x.x.hypot(m.x.y);

    let (a, b) = if cy > 16. * f32::EPSILON {
        let a = [
            m.y.z.atan2(m.z.z),
            (-m.x.z).atan2(cy),
            m.x.y.atan2(m.x.x),
        ];
        let b = [
            (-m.y.z).atan2(-m.z.z),
            (-m.x.z).atan2(-cy),
            (-m.x.y).atan2(-m.x.x),
        ];
        (a, b)
    } else {
        // gimbal lock, z folds into x
        let a = [(-m.z.y).atan2(m.y.y), (-m.x.z).atan2(cy), 0.];
        (a, a)
    };

    let size = |e: &[f32; 3]| e[0].abs() + e[1].abs() + e[2].abs();
    let [x, y, z] = if size(&a) > size(&b) { b } else { a };
    Euler::new(Rad(x), Rad(y), Rad(z))
}

fn normalize_or_zero(v: cgmath::Vector3<f32>) -> cgmath::Vector3<f32> {
    let len = v.magnitude();
    if len > 0. {
        v / len
    } else {
        v
    }
}
