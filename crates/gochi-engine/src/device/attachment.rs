use winit::dpi::PhysicalSize;

/// Offscreen render attachment matching the surface size.
///
/// Used for the depth buffer and, when multisampling, for the color buffer
/// that resolves into the swapchain image. Recreated whenever the surface is
/// resized; never sampled.
pub struct Attachment {
    format: wgpu::TextureFormat,
    sample_count: u32,
    // Kept alive for the view.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Attachment {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            format,
            sample_count,
            _texture: texture,
            view,
        }
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
