//! Unit conversion for heights published by the ladder.

/// Metres in one international foot.
pub const METRES_PER_FOOT: f64 = 0.3048;

/// Convert a height in feet (as published for launch points) to metres AMSL.
pub fn feet_to_metres(feet: f64) -> f64 {
    feet * METRES_PER_FOOT
}
