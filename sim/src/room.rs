//! Static collision geometry: floor, four walls, hoop ring and backboard.

use std::f64::consts::TAU;

use hoopshot_core::config::{HoopConfig, RoomConfig};
use hoopshot_core::GameConfig;
use rapier3d::na::UnitQuaternion;
use rapier3d::prelude::*;

use crate::physics::RapierWorld;

/// Handles of the static bodies making up the court
#[derive(Debug, Clone)]
pub struct Room {
    pub floor: RigidBodyHandle,
    pub walls: Vec<RigidBodyHandle>,
    /// Ring segments and backboard as one compound body
    pub hoop: RigidBodyHandle,
}

fn at(x: f64, y: f64, z: f64) -> Isometry<Real> {
    Isometry::translation(x as Real, y as Real, z as Real)
}

fn slab(hx: f64, hy: f64, hz: f64) -> ColliderBuilder {
    ColliderBuilder::cuboid(hx as Real, hy as Real, hz as Real)
}

fn build_floor(world: &mut RapierWorld, room: &RoomConfig) -> RigidBodyHandle {
    let floor = slab(room.width / 2.0, 0.5, room.depth / 2.0)
        .restitution(room.floor_restitution as Real)
        .build();
    world.add_fixed(at(0.0, -0.5, room.center_z()), vec![floor])
}

fn build_walls(world: &mut RapierWorld, room: &RoomConfig) -> Vec<RigidBodyHandle> {
    let half_w = room.width / 2.0;
    let half_h = room.height / 2.0;
    let half_d = room.depth / 2.0;
    let half_t = room.wall_thickness / 2.0;

    // side walls are built with swapped extents instead of a yaw
    let walls = [
        (at(0.0, half_h, room.front_z), (half_w, half_h, half_t)),
        (at(0.0, half_h, room.back_z()), (half_w, half_h, half_t)),
        (at(-half_w, half_h, room.center_z()), (half_t, half_h, half_d)),
        (at(half_w, half_h, room.center_z()), (half_t, half_h, half_d)),
    ];
    walls
        .into_iter()
        .map(|(position, (hx, hy, hz))| world.add_fixed(position, vec![slab(hx, hy, hz).build()]))
        .collect()
}

/// Ring as `segments` straight boxes between points on the rim circle.
fn ring_colliders(hoop: &HoopConfig) -> Vec<Collider> {
    let n = hoop.segments.max(3);
    (0..n)
        .map(|i| {
            let a1 = TAU * i as f64 / n as f64;
            let a2 = TAU * (i + 1) as f64 / n as f64;
            let (x1, z1) = (hoop.radius * a1.cos(), hoop.radius * a1.sin());
            let (x2, z2) = (hoop.radius * a2.cos(), hoop.radius * a2.sin());
            let length = ((x2 - x1).powi(2) + (z2 - z1).powi(2)).sqrt();

            // a positive yaw turns +x toward -z
            let yaw = -(z2 - z1).atan2(x2 - x1);
            let rotation = UnitQuaternion::from_axis_angle(&Vector::y_axis(), yaw as Real);
            let position = Isometry::from_parts(
                at(
                    hoop.center_x + (x1 + x2) / 2.0,
                    hoop.plane_y,
                    hoop.center_z + (z1 + z2) / 2.0,
                )
                .translation,
                rotation,
            );
            slab(length / 2.0, hoop.tube_radius, hoop.tube_radius)
                .position(position)
                .restitution(hoop.restitution as Real)
                .friction(hoop.friction as Real)
                .build()
        })
        .collect()
}

fn build_hoop(world: &mut RapierWorld, hoop: &HoopConfig) -> RigidBodyHandle {
    let mut colliders = ring_colliders(hoop);
    let e = hoop.backboard_half_extents;
    colliders.push(
        slab(e.x, e.y, e.z)
            .position(at(
                hoop.center_x,
                hoop.plane_y + hoop.backboard_rise,
                hoop.backboard_z,
            ))
            .restitution(hoop.restitution as Real)
            .friction(hoop.friction as Real)
            .build(),
    );
    world.add_fixed(Isometry::identity(), colliders)
}

pub fn build_room(world: &mut RapierWorld, config: &GameConfig) -> Room {
    let room = Room {
        floor: build_floor(world, &config.room),
        walls: build_walls(world, &config.room),
        hoop: build_hoop(world, &config.hoop),
    };
    tracing::debug!(
        "built room {}x{}x{} with {} hoop segments",
        config.room.width,
        config.room.depth,
        config.room.height,
        config.hoop.segments
    );
    room
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoopshot_core::config::BallConfig;
    use hoopshot_core::physics::{BallDesc, RigidBodySimulator};

    fn room_world() -> (RapierWorld, Room) {
        let config = GameConfig::default();
        let mut world = RapierWorld::new(config.room.gravity());
        let room = build_room(&mut world, &config);
        (world, room)
    }

    #[test]
    fn builds_floor_walls_and_hoop() {
        let (world, room) = room_world();
        assert_eq!(room.walls.len(), 4);
        assert_eq!(world.body_count(), 6);
        // floor + 4 walls + 8 ring segments + backboard
        assert_eq!(world.collider_count(), 14);
    }

    #[test]
    fn ring_segments_lie_on_the_rim() {
        let hoop = HoopConfig::default();
        for collider in ring_colliders(&hoop) {
            let t = collider.position().translation.vector;
            let dx = t.x as f64 - hoop.center_x;
            let dz = t.z as f64 - hoop.center_z;
            let r = (dx * dx + dz * dz).sqrt();
            // segment midpoints sit on the chord, just inside the circle
            assert!(r < hoop.radius && r > hoop.radius * 0.9, "r = {}", r);
            assert!((t.y as f64 - hoop.plane_y).abs() < 1e-6);
        }
    }

    #[test]
    fn ring_segments_are_tangent() {
        let hoop = HoopConfig::default();
        for collider in ring_colliders(&hoop) {
            let iso = collider.position();
            let t = iso.translation.vector;
            let radial = vector![t.x - hoop.center_x as Real, 0.0, t.z - hoop.center_z as Real];
            let long_axis = iso.rotation * vector![1.0, 0.0, 0.0];
            assert!(long_axis.dot(&radial).abs() < 1e-4);
        }
    }

    #[test]
    fn floor_stops_a_falling_ball() {
        let (mut world, _) = room_world();
        let ball = world.create_ball(&BallDesc::from_config(&BallConfig::default()));
        for _ in 0..300 {
            world.step(1.0 / 60.0, 10);
        }
        let y = world.read_pose(ball).unwrap().position.y;
        assert!(y > 0.0 && y < 0.3, "ball at y = {}", y);
        let v = world.linear_velocity(ball).unwrap();
        assert!(v.y.abs() < 1.0);
    }
}
