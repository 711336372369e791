//! Rapier-backed rigid-body world.

use hoopshot_core::physics::{BallDesc, Pose, RigidBodySimulator};
use hoopshot_core::vec3::{vec3, Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x as Real, v.y as Real, v.z as Real]
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    vec3(v.x as f64, v.y as f64, v.z as f64)
}

fn to_isometry(pose: Pose) -> Isometry<Real> {
    let q = pose.orientation;
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
        q.w as Real,
        q.x as Real,
        q.y as Real,
        q.z as Real,
    ));
    Isometry::from_parts(to_vector(pose.position).into(), rotation)
}

fn from_isometry(iso: &Isometry<Real>) -> Pose {
    let r = &iso.rotation;
    Pose::new(
        from_vector(&iso.translation.vector),
        Quat::new(r.i as f64, r.j as f64, r.k as f64, r.w as f64),
    )
}

/// Owns every rapier set and steps them as one world.
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Add an immovable body carrying `colliders` at `position`.
    pub fn add_fixed(
        &mut self,
        position: Isometry<Real>,
        colliders: Vec<Collider>,
    ) -> RigidBodyHandle {
        let handle = self
            .bodies
            .insert(RigidBodyBuilder::fixed().position(position).build());
        for collider in colliders {
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }
        handle
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|rb| from_vector(rb.linvel()))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl RigidBodySimulator for RapierWorld {
    type Handle = RigidBodyHandle;

    fn create_ball(&mut self, desc: &BallDesc) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .position(to_isometry(desc.pose))
            .linear_damping(desc.linear_damping as Real)
            .angular_damping(desc.angular_damping as Real)
            .can_sleep(false)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(desc.radius as Real)
            .mass(desc.mass as Real)
            .restitution(desc.restitution as Real)
            .friction(desc.friction as Real)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn set_pose(&mut self, handle: RigidBodyHandle, pose: Pose) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_position(to_isometry(pose), true);
        }
    }

    fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_linvel(to_vector(velocity), true);
        }
    }

    /// Rapier locks whole axes, so any non-zero factor counts as free.
    fn set_response_factors(&mut self, handle: RigidBodyHandle, linear: Vec3, angular: Vec3) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_enabled_translations(linear.x != 0.0, linear.y != 0.0, linear.z != 0.0, true);
            rb.set_enabled_rotations(angular.x != 0.0, angular.y != 0.0, angular.z != 0.0, true);
        }
    }

    fn step(&mut self, dt: f64, substeps: u32) {
        let substeps = substeps.max(1);
        self.integration_parameters.dt = (dt / substeps as f64) as Real;
        for _ in 0..substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
        }
    }

    fn read_pose(&self, handle: RigidBodyHandle) -> Option<Pose> {
        self.bodies.get(handle).map(|rb| from_isometry(rb.position()))
    }
}
