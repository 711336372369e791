use crate::vec3::{self, Vec3};

/// Launch velocity for a ball released at `hand_velocity`.
///
/// The hand velocity is amplified by `multiplier`, then the vertical component
/// gains `arc_factor` times the amplified horizontal speed. A short flick in a
/// small play space would otherwise produce a flat, weak shot. No spin.
pub fn launch_velocity(hand_velocity: Vec3, multiplier: f64, arc_factor: f64) -> Vec3 {
    let mut velocity = vec3::scale(hand_velocity, multiplier);
    velocity.y += vec3::horizontal_length(velocity) * arc_factor;
    velocity
}

/// Hand velocity that [`launch_velocity`] turns into `launch`.
///
/// Used by scripted players to aim; the arc bonus depends only on the
/// horizontal part, so it can be undone exactly.
pub fn hand_velocity_for_launch(launch: Vec3, multiplier: f64, arc_factor: f64) -> Vec3 {
    let mut amplified = launch;
    amplified.y -= vec3::horizontal_length(launch) * arc_factor;
    vec3::scale(amplified, 1.0 / multiplier)
}
