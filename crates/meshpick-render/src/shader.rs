//! Shader management.

use crate::error::{RenderError, RenderResult};

/// A compiled shader program.
#[derive(Debug)]
pub struct ShaderProgram {
    /// The render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// Layout of bind group 0.
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// Builder for creating shader modules.
pub struct ShaderBuilder {
    source: Option<String>,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates a new shader builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            label: None,
        }
    }

    /// Sets the WGSL source holding both the vertex and fragment stages.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the shader label for debugging.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Compiles the shader module.
    ///
    /// Validation errors are captured with an error scope and returned
    /// instead of reaching the device's uncaptured error handler.
    pub fn build_module(self, device: &wgpu::Device) -> RenderResult<wgpu::ShaderModule> {
        let source = self
            .source
            .ok_or_else(|| RenderError::ShaderCompilationFailed("missing shader source".into()))?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompilationFailed(error.to_string()));
        }

        Ok(module)
    }
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
