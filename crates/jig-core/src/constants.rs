//! Global constants for jig-core

/// Default tessellation tolerance for export and display
pub const DEFAULT_TESSELLATION_TOLERANCE: f64 = 0.1;

/// Default window width
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;

/// Default window height
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;

/// Tolerance used when comparing placements
pub const PLACEMENT_EPSILON: f64 = 1e-9;
