//! Level loading and management.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use surfmove_physics::{BodyId, CollisionError, CollisionWorld, ContentFlags};

/// A level: collision geometry, spawn points and named landmarks.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,

    /// Named places of interest, e.g. the foot of a ladder.
    pub markers: Vec<Marker>,
}

/// Where a player enters the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Actor origin in world space.
    pub position: Vec3,

    /// Initial yaw in degrees.
    pub facing: f32,
}

/// A named position, optionally tied to a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub position: Vec3,
    pub body: Option<BodyId>,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// A walled arena exercising every movement regime.
    ///
    /// Floor top is at y=0. Markers: `step`, `ramp`, `surf_ramp`, `ladder`
    /// (foot of the ladder, facing -Z), `pool` and `crate`.
    pub fn test_arena() -> Result<Self, CollisionError> {
        let mut level = Self::new("test_arena", "Test Arena");
        let world = &mut level.collision;

        // Floor
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        // Walls
        let wall_height = 5.0;
        let wall_thickness = 0.5;
        let arena_size = 50.0;

        // North wall
        world.add_box(
            Vec3::new(0.0, wall_height / 2.0, -arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ContentFlags::SOLID,
        );

        // South wall
        world.add_box(
            Vec3::new(0.0, wall_height / 2.0, arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ContentFlags::SOLID,
        );

        // East wall
        world.add_box(
            Vec3::new(arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ContentFlags::SOLID,
        );

        // West wall
        world.add_box(
            Vec3::new(-arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ContentFlags::SOLID,
        );

        // Step, 0.3 high
        let step = world.add_box(
            Vec3::new(5.0, 0.15, -10.0),
            Vec3::new(1.0, 0.15, 2.0),
            ContentFlags::SOLID,
        );

        // Walkable ramp rising towards +X at 20 degrees
        let ramp_rise = 10.0 * 20f32.to_radians().tan();
        let ramp = world.add_convex_hull(
            &wedge(Vec3::new(10.0, 0.0, -20.0), Vec3::new(10.0, ramp_rise, 6.0)),
            ContentFlags::SOLID,
        )?;

        // Surf ramp at 60 degrees, too steep to stand on
        let surf_rise = 3.0 * 60f32.to_radians().tan();
        let surf_ramp = world.add_convex_hull(
            &wedge(Vec3::new(25.0, 0.0, -20.0), Vec3::new(3.0, surf_rise, 6.0)),
            ContentFlags::SOLID,
        )?;

        // Ladder against a thin slab, climbable face towards +Z at z=-19.75
        let ladder = world.add_box(
            Vec3::new(-10.0, 4.0, -20.0),
            Vec3::new(1.0, 4.0, 0.25),
            ContentFlags::SOLID | ContentFlags::LADDER,
        );

        // Pool volume sitting on the floor
        let pool = world.add_box(
            Vec3::new(-20.0, 1.5, 20.0),
            Vec3::new(5.0, 1.5, 5.0),
            ContentFlags::WATER,
        );

        let crate_body = world.add_dynamic_box(
            Vec3::new(10.0, 0.5, 10.0),
            Vec3::splat(0.5),
            ContentFlags::SOLID,
            20.0,
        );

        level.add_marker("step", Vec3::new(5.0, 0.3, -10.0), Some(step));
        level.add_marker("ramp", Vec3::new(10.0, 0.0, -17.0), Some(ramp));
        level.add_marker("surf_ramp", Vec3::new(25.0, 0.0, -17.0), Some(surf_ramp));
        level.add_marker("ladder", Vec3::new(-10.0, 1.0, -18.0), Some(ladder));
        level.add_marker("pool", Vec3::new(-20.0, 1.5, 20.0), Some(pool));
        level.add_marker("crate", Vec3::new(10.0, 0.5, 10.0), Some(crate_body));

        // Spawn points, origin one unit above the floor
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 1.0, 0.0),
            facing: 90.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(20.0, 1.0, 0.0),
            facing: 270.0,
        });

        Ok(level)
    }

    pub fn add_marker(&mut self, name: &str, position: Vec3, body: Option<BodyId>) {
        self.markers.push(Marker {
            name: name.to_string(),
            position,
            body,
        });
    }

    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name == name)
    }

    /// Get a player spawn point, cycling when there are fewer than `index`.
    pub fn player_spawn(&self, index: usize) -> SpawnPoint {
        if self.spawn_points.is_empty() {
            return SpawnPoint {
                position: Vec3::new(0.0, 1.0, 0.0),
                facing: 0.0,
            };
        }
        self.spawn_points[index % self.spawn_points.len()]
    }
}

/// Corner points of a wedge rising towards +X.
///
/// `min` is the low corner, `size` the run (x), rise (y) and width (z).
fn wedge(min: Vec3, size: Vec3) -> [Vec3; 6] {
    let max_x = min.x + size.x;
    let max_z = min.z + size.z;
    let top = min.y + size.y;
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max_x, min.y, min.z),
        Vec3::new(max_x, top, min.z),
        Vec3::new(min.x, min.y, max_z),
        Vec3::new(max_x, min.y, max_z),
        Vec3::new(max_x, top, max_z),
    ]
}
