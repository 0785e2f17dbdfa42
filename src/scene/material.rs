use crate::{
    geometry::FloatType,
    util::{BLACK, Color},
};

/// Surface response of a geometry, coefficients are per color channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Diffuse
    pub kd: Color,
    /// Specular
    pub ks: Color,
    pub shininess: u32,
    /// Reflection
    pub kr: Color,
    /// Transparency
    pub kt: Color,
    /// Glossiness, carried along but not used for shading
    pub kg: FloatType,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            kd: BLACK,
            ks: BLACK,
            shininess: 0,
            kr: BLACK,
            kt: BLACK,
            kg: 0.0,
        }
    }
}
