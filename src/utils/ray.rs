use glam::{IVec3, Vec3};

#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// First solid cell a ray enters, plus the face it came through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell: IVec3,
    /// Outward normal of the entered face. Zero when the origin is already inside a solid cell.
    pub normal: IVec3,
    pub distance: f32,
}

impl RayHit {
    /// Cell sharing the hit face, where a new block would go.
    pub fn adjacent(&self) -> IVec3 {
        self.cell + self.normal
    }
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Walks the unit grid cell by cell along the ray and returns the first cell
    /// for which `is_solid` holds, up to `max_distance`.
    pub fn cast_voxels<F>(&self, max_distance: f32, is_solid: F) -> Option<RayHit>
    where
        F: Fn(IVec3) -> bool,
    {
        if self.direction == Vec3::ZERO {
            return None;
        }

        let mut cell = self.origin.floor().as_ivec3();
        if is_solid(cell) {
            return Some(RayHit {
                cell,
                normal: IVec3::ZERO,
                distance: 0.0,
            });
        }

        let mut step = IVec3::ZERO;
        let mut t_max = Vec3::splat(f32::INFINITY);
        let mut t_delta = Vec3::splat(f32::INFINITY);

        for axis in 0..3 {
            let d = self.direction[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_max[axis] = (cell[axis] as f32 + 1.0 - self.origin[axis]) / d;
                t_delta[axis] = 1.0 / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_max[axis] = (cell[axis] as f32 - self.origin[axis]) / d;
                t_delta[axis] = -1.0 / d;
            }
        }

        loop {
            let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
                0
            } else if t_max.y <= t_max.z {
                1
            } else {
                2
            };

            let distance = t_max[axis];
            if distance > max_distance {
                return None;
            }

            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];

            if is_solid(cell) {
                let mut normal = IVec3::ZERO;
                normal[axis] = -step[axis];
                return Some(RayHit {
                    cell,
                    normal,
                    distance,
                });
            }
        }
    }
}
