/// Turning radius of an aircraft that changes heading by `TURN_STEP_DEG` every
/// tick while covering `CRUISE_STEP` units. The game draws the turn as a circle
/// but moves on an 18-gon, so this is rounded rather than derived exactly.
pub const TURN_R: f64 = 14.18;

/// Largest heading change the game applies in one tick.
pub const TURN_STEP_DEG: i32 = 20;

/// Distance covered per tick while cruising.
pub const CRUISE_STEP: f64 = 5.0;

pub const FULL_CIRCLE_DEG: i32 = 360;

/// A tangent point this close (per axis) to the aircraft is treated as the
/// aircraft's own position. Covers the offset in the circle-center projection.
pub const TANGENT_ADJACENT_TOLERANCE: f64 = 3.0;

/// Headings closer than this are treated as identical.
pub const HEADING_TOLERANCE_DEG: f64 = 1.0;

/// Start/end heading separation above which the far tangent point is used.
pub const U_LOOP_THRESHOLD_DEG: f64 = 90.0;
