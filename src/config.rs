//! Viewer configuration.
//!
//! Defaults cover the common case; the command line overrides individual
//! fields.

/// How a screen pixel covering several cells combines their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Aggregation {
    /// Largest value in the covered rectangle (keeps sparse peaks visible).
    #[default]
    Max,
    /// Arithmetic mean of the finite values in the covered rectangle.
    Mean,
}

impl Aggregation {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Mean => "mean",
        }
    }
}

/// Tile cache policy.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Tiles kept around the visible rectangle when weeding.
    pub weed_margin: i32,
    /// Upper bound on cached tiles; least recently used go first.
    pub max_tiles: Option<usize>,
    /// Zoomed-out aggregation rule.
    pub aggregation: Aggregation,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weed_margin: 1,
            max_tiles: None,
            aggregation: Aggregation::Max,
        }
    }
}

/// Step sizes for keyboard navigation.
#[derive(Debug, Clone)]
pub struct NavigationConfig {
    /// Pan distance per arrow key, in screen pixels.
    pub pan_step: i32,
    /// Zoom factor per zoom key or wheel notch.
    pub zoom_step: f64,
    /// Factor applied to the visible value window per contrast key.
    pub range_step: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            pan_step: 32,
            zoom_step: 2.0,
            range_step: 2.0,
        }
    }
}

/// Combined viewer configuration.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Tile cache policy.
    pub cache: CacheConfig,
    /// Keyboard navigation steps.
    pub navigation: NavigationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = ViewerConfig::default();
        assert_eq!(config.cache.weed_margin, 1);
        assert_eq!(config.cache.max_tiles, None);
        assert_eq!(config.cache.aggregation.name(), "max");
        assert_eq!(Aggregation::Mean.name(), "mean");
        assert_eq!(config.navigation.pan_step, 32);
    }
}
