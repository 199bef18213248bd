/// Initialization parameters for the GL layer.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Requested context version as `(major, minor)`.
    pub version: (u8, u8),

    /// Request a core profile instead of compatibility.
    pub core_profile: bool,

    /// Depth buffer bits for the default framebuffer.
    pub depth_bits: u8,

    /// Synchronize buffer swaps with the display refresh.
    ///
    /// Failure to enable it is logged and otherwise ignored.
    pub vsync: bool,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            version: (3, 3),
            core_profile: true,
            depth_bits: 24,
            vsync: true,
        }
    }
}
