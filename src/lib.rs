mod vector;
mod matrix;
mod quaternion;

pub use crate::vector::{Vec3, Vec4};
pub use crate::matrix::{Mat3x3, Mat4x4};
pub use crate::quaternion::Quaternion;
