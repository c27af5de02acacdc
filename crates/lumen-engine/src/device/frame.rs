/// One acquired swapchain image plus the encoder recording into it.
///
/// Hold it only for the duration of a draw; the next image cannot be
/// acquired until this one is submitted.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
