use glam::{EulerRot, Quat, Vec3};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    pub fn get(&self) -> Vec3 {
        self.0
    }

    pub fn set(&mut self, pos: Vec3) {
        self.0 = pos;
    }

    pub fn set_x(&mut self, x: f32) {
        self.0.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.0.y = y;
    }

    pub fn set_z(&mut self, z: f32) {
        self.0.z = z;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec3);

impl Velocity {
    pub fn get(&self) -> Vec3 {
        self.0
    }

    pub fn set(&mut self, x: f32, y: f32, z: f32) {
        self.0 = Vec3::new(x, y, z);
    }

    /// In-place access for accumulation, e.g. `velocity.get_mut().y += gravity`.
    pub fn get_mut(&mut self) -> &mut Vec3 {
        &mut self.0
    }
}

/// Pitch/yaw pair in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl Rotation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Unit view vector; zero rotation looks down -Z.
    pub fn look_direction(&self) -> Vec3 {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0) * Vec3::NEG_Z
    }
}

/// Eye placement handed to whatever renders the player's view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraBinding {
    pub eye: Vec3,
    pub rotation: Rotation,
}

impl CameraBinding {
    pub fn sync(&mut self, eye: Vec3, rotation: Rotation) {
        self.eye = eye;
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_velocity_accumulates_in_place() {
        let mut velocity = Velocity::default();
        velocity.set(1.0, 0.0, -1.0);
        velocity.get_mut().y += -0.01;
        velocity.get_mut().y += -0.01;
        assert_eq!(velocity.get(), Vec3::new(1.0, -0.02, -1.0));
    }

    #[test]
    fn test_look_direction() {
        let forward = Rotation::default().look_direction();
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-6);

        let left = Rotation::new(0.0, FRAC_PI_2).look_direction();
        assert_relative_eq!(left.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(left.z, 0.0, epsilon = 1e-6);

        let down = Rotation::new(-FRAC_PI_2, 0.0).look_direction();
        assert_relative_eq!(down.y, -1.0, epsilon = 1e-6);
    }
}
