use crate::{
    geometry::{FloatType, Ray, WorldDirection, reflect},
    scene::{GeoPoint, Intersectable, Light, Material, Scene},
    util::{BLACK, Color, ColorExt as _, WHITE, snap_to_zero},
};

/// Knobs of the recursive shading.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TracerSettings {
    /// Number of surface interactions along a path, including the first one.
    pub max_level: u32,
    /// Contributions attenuated below this in every channel are not computed.
    pub min_k: FloatType,
    pub initial_k: FloatType,
    pub use_bounding_boxes: bool,
}

impl Default for TracerSettings {
    fn default() -> Self {
        TracerSettings {
            max_level: 10,
            min_k: 0.001,
            initial_k: 1.0,
            use_bounding_boxes: true,
        }
    }
}

/// Whitted style recursive ray tracer over a scene.
pub struct RayTracer<'a, O: Intersectable> {
    scene: &'a Scene<O>,
    settings: TracerSettings,
}

impl<'a, O: Intersectable> RayTracer<'a, O> {
    pub fn new(scene: &'a Scene<O>, settings: TracerSettings) -> Self {
        RayTracer { scene, settings }
    }

    pub fn settings(&self) -> &TracerSettings {
        &self.settings
    }

    /// Color seen along the ray.
    pub fn trace_ray(&self, ray: &Ray) -> Color {
        match self.closest(ray) {
            None => self.scene.background,
            Some(gp) => {
                let k = WHITE * self.settings.initial_k;
                self.calc_color(&gp, ray, self.settings.max_level, k)
                    + self.scene.ambient_light.intensity()
            }
        }
    }

    fn closest(&self, ray: &Ray) -> Option<GeoPoint<'a>> {
        self.scene
            .object
            .find_closest_intersection(ray, self.settings.use_bounding_boxes)
    }

    fn calc_color(&self, gp: &GeoPoint, ray: &Ray, level: u32, k: Color) -> Color {
        let n = gp.geometry.normal_at(&gp.point);
        let color = gp.geometry.emission() + self.local_effects(gp, ray, &n, k);

        if level <= 1 {
            color
        } else {
            color + self.global_effects(gp, ray, &n, level, k)
        }
    }

    /// Diffuse and specular light from all light sources.
    fn local_effects(&self, gp: &GeoPoint, ray: &Ray, n: &WorldDirection, k: Color) -> Color {
        let v = &ray.direction;
        let nv = snap_to_zero(n.dot(v.as_ref()));
        if nv == 0.0 {
            return BLACK;
        }

        let material = gp.geometry.material();
        let mut color = BLACK;

        for light in &self.scene.lights {
            let Some(l) = light.direction_at(&gp.point) else {
                continue;
            };

            // Light and viewer must be on the same side of the surface
            let nl = snap_to_zero(n.dot(l.as_ref()));
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(gp, light, &l, n);
            if ktr.modulate(&k).all_below(self.settings.min_k) {
                continue;
            }

            let intensity = light.intensity_at(&gp.point).modulate(&ktr);
            color += intensity.modulate(&(diffuse(material, nl) + specular(material, n, &l, nl, v)));
        }

        color
    }

    /// Reflection and refraction.
    fn global_effects(&self, gp: &GeoPoint, ray: &Ray, n: &WorldDirection, level: u32, k: Color) -> Color {
        let material = gp.geometry.material();
        let v = ray.direction;

        let reflected = Ray::offset_from_surface(gp.point, reflect(&v, n), n);
        let refracted = Ray::offset_from_surface(gp.point, v, n);

        self.global_effect(&reflected, level, k, material.kr)
            + self.global_effect(&refracted, level, k, material.kt)
    }

    fn global_effect(&self, ray: &Ray, level: u32, k: Color, kx: Color) -> Color {
        let kkx = k.modulate(&kx);
        if kkx.all_below(self.settings.min_k) {
            return BLACK;
        }

        match self.closest(ray) {
            None => self.scene.background.modulate(&kx),
            Some(gp) => self.calc_color(&gp, ray, level - 1, kkx).modulate(&kx),
        }
    }

    /// Fraction of the light that gets through everything between the point and the light.
    /// `l` is the light direction at the point and `n` the surface normal there.
    pub fn transparency(
        &self,
        gp: &GeoPoint,
        light: &Light,
        l: &WorldDirection,
        n: &WorldDirection,
    ) -> Color {
        let shadow_ray = Ray::offset_from_surface(gp.point, -*l, n);
        let distance = light.distance_to(&gp.point);

        let Some(blockers) = self.scene.object.find_intersections(
            &shadow_ray,
            distance,
            self.settings.use_bounding_boxes,
        ) else {
            return WHITE;
        };

        let mut ktr = WHITE;
        for blocker in blockers {
            ktr = ktr.modulate(&blocker.geometry.material().kt);
            if ktr.all_below(self.settings.min_k) {
                return BLACK;
            }
        }
        ktr
    }
}

fn diffuse(material: &Material, nl: FloatType) -> Color {
    material.kd * nl.abs()
}

fn specular(
    material: &Material,
    n: &WorldDirection,
    l: &WorldDirection,
    nl: FloatType,
    v: &WorldDirection,
) -> Color {
    let r = l.as_ref() - n.as_ref() * (2.0 * nl);
    let minus_vr = -r.dot(v.as_ref());
    if minus_vr <= 0.0 {
        return BLACK;
    }
    let exponent = i32::try_from(material.shininess).unwrap_or(i32::MAX);
    material.ks * minus_vr.powi(exponent)
}
