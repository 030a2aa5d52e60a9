//! Physical units shared between the physics and the screen.
//!
//! The world is measured in meters; the window maps meters to pixels with a
//! fixed scale, the same convention the renderers and the camera rely on.

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Meters(pub f32);

/// Time in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Seconds(pub f32);

/// Screen scale: how many pixels one meter occupies at zoom 1.0
pub const PIXELS_PER_METER: f32 = 100.0;

impl std::ops::Deref for Meters {
    type Target = f32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Meters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

impl std::fmt::Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} s", self.0)
    }
}
