use crate::coords::Viewport;

/// Renderer-facing context for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }
}

/// An open render pass over the frame's color view, already cleared.
pub struct RenderTarget<'a, 'p> {
    pub pass: &'a mut wgpu::RenderPass<'p>,
}

impl<'a, 'p> RenderTarget<'a, 'p> {
    #[inline]
    pub fn new(pass: &'a mut wgpu::RenderPass<'p>) -> Self {
        Self { pass }
    }
}
