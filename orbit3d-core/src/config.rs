//! Construction-time settings for the render pipeline

/// Screen size and lens settings, fixed once a pipeline is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub width: u32,
    pub height: u32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl PipelineConfig {
    pub const DEFAULT_FOV: f32 = 90.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 1000.0;

    pub fn new(width: u32, height: u32, fov_degrees: f32) -> Self {
        Self {
            width,
            height,
            fov_degrees,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
        }
    }

    /// Height over width, the convention the projection matrix expects.
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(800, 600, Self::DEFAULT_FOV)
    }
}
