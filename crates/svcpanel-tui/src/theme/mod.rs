//! Theme: raw colors in `palette`, semantic style builders in `styles`

pub mod palette;
pub mod styles;
