// Centralized ingestion limits to harden against untrusted input (JSON/sheets)

// Tree size caps
pub const MAX_CATEGORIES: usize = 1_000;
pub const MAX_CAUSES_PER_CATEGORY: usize = 5_000;
pub const MAX_SUBCAUSES_PER_CAUSE: usize = 5_000;
pub const MAX_NODES: usize = 200_000;

// Sheet caps
pub const MAX_ROWS: usize = 200_000;
pub const MAX_TEXT_LEN: usize = 32_767; // one spreadsheet cell

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_text_bounds(s: &str) -> bool { s.chars().count() <= MAX_TEXT_LEN }
