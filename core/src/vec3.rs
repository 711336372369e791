/// World-space vector and rotation types.
/// Y is up; the hoop plane is horizontal (constant Y).

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Shorthand constructor
pub const fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x + b.x, a.y + b.y, a.z + b.z)
}

/// a - b
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

pub fn scale(v: Vec3, s: f64) -> Vec3 {
    Vec3::new(v.x * s, v.y * s, v.z * s)
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

pub fn length(v: Vec3) -> f64 {
    dot(v, v).sqrt()
}

pub fn distance(a: Vec3, b: Vec3) -> f64 {
    length(sub(a, b))
}

/// Length of the X/Z projection, ignoring height.
pub fn horizontal_length(v: Vec3) -> f64 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Linear interpolation, t=0 returns a, t=1 returns b.
pub fn lerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    add(a, scale(sub(b, a), t))
}

/// Unit quaternion (x, y, z vector part, w scalar part).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(-1.0, 0.5, 4.0);
        assert!((distance(a, b) - distance(b, a)).abs() < 1e-12);
        assert!((distance(a, a)).abs() < 1e-12);
    }

    #[test]
    fn horizontal_length_ignores_height() {
        let v = vec3(3.0, 100.0, 4.0);
        assert!((horizontal_length(v) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = vec3(0.0, 1.0, 2.0);
        let b = vec3(4.0, -1.0, 0.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), vec3(2.0, 0.0, 1.0));
    }

    #[test]
    fn default_quat_is_identity() {
        assert_eq!(Quat::default(), Quat::IDENTITY);
    }
}
