use std::path::Path;

use crate::error::ConfigError;
use crate::vec3::{vec3, Vec3};

/// Ball body and spawn settings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BallConfig {
    pub radius: f64,
    pub mass: f64,
    pub restitution: f64,
    pub friction: f64,
    pub linear_damping: f64,
    pub angular_damping: f64,
    /// Where every new ball appears, slightly in front of and to the right of the player
    pub spawn_position: Vec3,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 0.12,
            mass: 1.0,
            restitution: 0.8,
            friction: 0.5,
            linear_damping: 0.1,
            angular_damping: 0.1,
            spawn_position: vec3(0.3, 1.3, -1.0),
        }
    }
}

/// Hoop ring and backboard geometry
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HoopConfig {
    /// Height of the rim plane
    pub plane_y: f64,
    pub center_x: f64,
    pub center_z: f64,
    /// Horizontal capture radius for a made basket
    pub radius: f64,
    /// Thickness of the rim tube
    pub tube_radius: f64,
    /// Number of straight segments approximating the rim collider
    pub segments: u32,
    pub backboard_z: f64,
    /// Backboard center height above the rim plane
    pub backboard_rise: f64,
    pub backboard_half_extents: Vec3,
    pub restitution: f64,
    pub friction: f64,
}

impl Default for HoopConfig {
    fn default() -> Self {
        Self {
            plane_y: 3.05,
            center_x: 0.0,
            center_z: -4.7,
            radius: 0.25,
            tube_radius: 0.02,
            segments: 8,
            backboard_z: -4.8,
            backboard_rise: 0.3,
            backboard_half_extents: vec3(0.5, 0.4, 0.025),
            restitution: 0.3,
            friction: 0.3,
        }
    }
}

/// Room shell. The floor top sits at y=0, the front wall at `front_z`,
/// the back wall at `front_z - depth`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomConfig {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub wall_thickness: f64,
    pub front_z: f64,
    pub gravity_y: f64,
    pub floor_restitution: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 8.0,
            depth: 7.0,
            height: 5.0,
            wall_thickness: 0.2,
            front_z: 2.0,
            gravity_y: -9.81,
            floor_restitution: 0.7,
        }
    }
}

impl RoomConfig {
    pub fn back_z(&self) -> f64 {
        self.front_z - self.depth
    }

    /// Z coordinate of the room's center line
    pub fn center_z(&self) -> f64 {
        self.front_z - self.depth / 2.0
    }

    pub fn gravity(&self) -> Vec3 {
        vec3(0.0, self.gravity_y, 0.0)
    }
}

/// Gameplay tuning shared by every subsystem of the frame loop.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Fixed physics delta per frame (seconds)
    pub step_dt: f64,
    /// Internal simulator sub-steps per frame
    pub substeps: u32,
    /// Controller samples kept per hand for velocity smoothing
    pub history_len: usize,
    /// Maximum hand-to-ball distance for a grab
    pub grab_radius: f64,
    pub throw_multiplier: f64,
    /// Vertical bonus per unit of horizontal launch speed
    pub arc_factor: f64,
    /// Seconds between a release and the next ball spawn
    pub respawn_delay: f64,
    pub ball: BallConfig,
    pub hoop: HoopConfig,
    pub room: RoomConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            step_dt: 1.0 / 60.0,
            substeps: 10,
            history_len: 5,
            grab_radius: 0.3,
            throw_multiplier: 1.7,
            arc_factor: 0.3,
            respawn_delay: 3.0,
            ball: BallConfig::default(),
            hoop: HoopConfig::default(),
            room: RoomConfig::default(),
        }
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid(format!("{name} must be finite and > 0")));
    }
    Ok(())
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid(format!("{name} must be finite and >= 0")));
    }
    Ok(())
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Simulation steps per second, the factor turning per-step displacement into velocity.
    pub fn steps_per_second(&self) -> f64 {
        1.0 / self.step_dt
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("step_dt", self.step_dt)?;
        if self.substeps == 0 {
            return Err(ConfigError::Invalid("substeps must be >= 1".to_string()));
        }
        if self.history_len < 2 {
            return Err(ConfigError::Invalid("history_len must be >= 2".to_string()));
        }
        positive("grab_radius", self.grab_radius)?;
        positive("throw_multiplier", self.throw_multiplier)?;
        non_negative("arc_factor", self.arc_factor)?;
        non_negative("respawn_delay", self.respawn_delay)?;

        positive("ball.radius", self.ball.radius)?;
        positive("ball.mass", self.ball.mass)?;
        non_negative("ball.linear_damping", self.ball.linear_damping)?;
        non_negative("ball.angular_damping", self.ball.angular_damping)?;
        if !self.ball.spawn_position.is_finite() {
            return Err(ConfigError::Invalid("ball.spawn_position must be finite".to_string()));
        }

        positive("hoop.radius", self.hoop.radius)?;
        positive("hoop.tube_radius", self.hoop.tube_radius)?;
        if self.hoop.segments < 3 {
            return Err(ConfigError::Invalid("hoop.segments must be >= 3".to_string()));
        }

        positive("room.width", self.room.width)?;
        positive("room.depth", self.room.depth)?;
        positive("room.height", self.room.height)?;

        let half_width = self.room.width / 2.0;
        let hoop_inside = self.hoop.center_x.abs() + self.hoop.radius <= half_width
            && self.hoop.center_z - self.hoop.radius >= self.room.back_z()
            && self.hoop.center_z + self.hoop.radius <= self.room.front_z
            && self.hoop.plane_y > 0.0
            && self.hoop.plane_y < self.room.height;
        if !hoop_inside {
            return Err(ConfigError::Invalid("hoop must fit inside the room".to_string()));
        }
        Ok(())
    }
}
