use bon::{Builder, bon};

use crate::{
    geometry::{FloatType, GeometryError, WorldDirection, WorldPoint, WorldVector, direction_between, to_direction},
    util::{BLACK, Color, ColorExt as _},
};

/// Light reaching every point equally, from no particular direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    pub const NONE: AmbientLight = AmbientLight { intensity: BLACK };

    /// Ambient light of the given color, scaled per channel by `ka`.
    pub fn new(color: Color, ka: Color) -> AmbientLight {
        AmbientLight {
            intensity: color.modulate(&ka),
        }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

/// Light coming from infinitely far away, in a fixed direction.
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    intensity: Color,
    direction: WorldDirection,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: WorldVector) -> Result<DirectionalLight, GeometryError> {
        Ok(DirectionalLight {
            intensity,
            direction: to_direction(direction)?,
        })
    }
}

/// Light radiating from a single point, attenuated with distance as
/// `1 / (kc + kl * d + kq * d^2)`.
#[derive(Builder, Clone, Debug)]
pub struct PointLight {
    intensity: Color,
    position: WorldPoint,
    #[builder(default = 1.0)]
    kc: FloatType,
    #[builder(default = 0.0)]
    kl: FloatType,
    #[builder(default = 0.0)]
    kq: FloatType,
}

impl PointLight {
    pub fn position(&self) -> &WorldPoint {
        &self.position
    }

    pub fn intensity_at(&self, p: &WorldPoint) -> Color {
        let d = (p - self.position).norm();
        self.intensity * (1.0 / (self.kc + self.kl * d + self.kq * d * d))
    }

    /// `None` if the point coincides with the light.
    pub fn direction_at(&self, p: &WorldPoint) -> Option<WorldDirection> {
        direction_between(&self.position, p).ok()
    }

    pub fn distance_to(&self, p: &WorldPoint) -> FloatType {
        (p - self.position).norm()
    }
}

/// Point light that shines mostly along its direction.
/// The point light intensity is scaled by `max(0, cos(angle from direction))^beam_exponent`.
#[derive(Clone, Debug)]
pub struct SpotLight {
    point: PointLight,
    direction: WorldDirection,
    beam_exponent: FloatType,
}

#[bon]
impl SpotLight {
    #[builder]
    pub fn new(
        point: PointLight,
        direction: WorldVector,
        #[builder(default = 1.0)] beam_exponent: FloatType,
    ) -> Result<SpotLight, GeometryError> {
        if !(beam_exponent > 0.0) {
            return Err(GeometryError::invalid_geometry(format!(
                "spot light beam exponent must be positive, got {beam_exponent}"
            )));
        }
        Ok(SpotLight {
            point,
            direction: to_direction(direction)?,
            beam_exponent,
        })
    }
}

impl SpotLight {
    pub fn intensity_at(&self, p: &WorldPoint) -> Color {
        match self.point.direction_at(p) {
            Some(l) => {
                let cos = self.direction.dot(l.as_ref()).max(0.0);
                self.point.intensity_at(p) * cos.powf(self.beam_exponent)
            }
            None => BLACK,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl Light {
    /// Intensity of the light arriving at the point, ignoring any obstacles.
    pub fn intensity_at(&self, p: &WorldPoint) -> Color {
        match self {
            Light::Directional(l) => l.intensity,
            Light::Point(l) => l.intensity_at(p),
            Light::Spot(l) => l.intensity_at(p),
        }
    }

    /// Direction in which the light travels when it reaches the point.
    /// `None` if the point is at the light's position.
    pub fn direction_at(&self, p: &WorldPoint) -> Option<WorldDirection> {
        match self {
            Light::Directional(l) => Some(l.direction),
            Light::Point(l) => l.direction_at(p),
            Light::Spot(l) => l.point.direction_at(p),
        }
    }

    /// Distance from the point to the light source, infinite for directional lights.
    pub fn distance_to(&self, p: &WorldPoint) -> FloatType {
        match self {
            Light::Directional(_) => FloatType::INFINITY,
            Light::Point(l) => l.distance_to(p),
            Light::Spot(l) => l.point.distance_to(p),
        }
    }
}

impl From<DirectionalLight> for Light {
    fn from(value: DirectionalLight) -> Self {
        Light::Directional(value)
    }
}

impl From<PointLight> for Light {
    fn from(value: PointLight) -> Self {
        Light::Point(value)
    }
}

impl From<SpotLight> for Light {
    fn from(value: SpotLight) -> Self {
        Light::Spot(value)
    }
}
