//! Shader program handle.
//!
//! A program is a vertex + fragment WGSL pair. Sources are validated with
//! naga before anything reaches the device, and the validated modules are
//! reflected into name -> location tables so the draw step can look up
//! attributes and uniforms by name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

/// Attribute streams the draw step feeds, in vertex-buffer slot order.
pub const ATTRIBUTE_STREAMS: [&str; 3] = ["vertex", "color", "normal"];

/// Matrix uniforms the draw step uploads.
pub const MATRIX_UNIFORMS: [&str; 3] = ["P", "V", "M"];

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

/// Where a named uniform lives: which buffer binding, and where inside it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    /// Byte offset inside the uniform block.
    pub offset: u32,
    pub size: u32,
}

/// Reflected program interface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderInterface {
    attributes: HashMap<String, u32>,
    uniforms: HashMap<String, UniformLocation>,
    /// `(group, binding) -> block size` for every uniform buffer.
    blocks: HashMap<(u32, u32), u32>,
}

impl ShaderInterface {
    /// Collects vertex inputs of `entry` and every `var<uniform>` block.
    fn reflect(module: &naga::Module, entry: Option<&str>) -> Self {
        let mut out = Self::default();

        if let Some(entry) = entry {
            let inputs = module
                .entry_points
                .iter()
                .filter(|ep| ep.name == entry)
                .flat_map(|ep| ep.function.arguments.iter());

            for arg in inputs {
                match (&arg.binding, &module.types[arg.ty].inner) {
                    (Some(naga::Binding::Location { location, .. }), _) => {
                        if let Some(name) = &arg.name {
                            out.attributes.insert(name.clone(), *location);
                        }
                    }
                    // Inputs grouped in a struct carry their bindings on the members.
                    (None, naga::TypeInner::Struct { members, .. }) => {
                        for member in members {
                            if let (Some(naga::Binding::Location { location, .. }), Some(name)) =
                                (&member.binding, &member.name)
                            {
                                out.attributes.insert(name.clone(), *location);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        for (_, var) in module.global_variables.iter() {
            if var.space != naga::AddressSpace::Uniform {
                continue;
            }
            let Some(binding) = &var.binding else { continue };
            let ty = &module.types[var.ty].inner;

            out.blocks
                .insert((binding.group, binding.binding), ty.size(module.to_ctx()));

            if let naga::TypeInner::Struct { members, .. } = ty {
                for member in members {
                    let Some(name) = &member.name else { continue };
                    out.uniforms.insert(
                        name.clone(),
                        UniformLocation {
                            group: binding.group,
                            binding: binding.binding,
                            offset: member.offset,
                            size: module.types[member.ty].inner.size(module.to_ctx()),
                        },
                    );
                }
            }
        }

        out
    }

    fn merge(&mut self, other: Self) {
        self.attributes.extend(other.attributes);
        self.uniforms.extend(other.uniforms);
        self.blocks.extend(other.blocks);
    }

    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied()
    }

    /// Size in bytes of the uniform block bound at `(group, binding)`.
    pub fn block_size(&self, group: u32, binding: u32) -> Option<u32> {
        self.blocks.get(&(group, binding)).copied()
    }

    /// Checks that the program exposes everything the draw step binds.
    fn require_draw_interface(&self) -> Result<()> {
        for name in ATTRIBUTE_STREAMS {
            if self.attrib_location(name).is_none() {
                bail!("vertex shader has no `{name}` input");
            }
        }

        let mut block = None;
        for name in MATRIX_UNIFORMS {
            let loc = self
                .uniform_location(name)
                .ok_or_else(|| anyhow!("shader has no `{name}` uniform"))?;
            if loc.size != 64 {
                bail!("uniform `{name}` is {} bytes, expected a mat4x4<f32>", loc.size);
            }
            match block {
                None => block = Some((loc.group, loc.binding)),
                Some(b) if b != (loc.group, loc.binding) => {
                    bail!("uniforms {MATRIX_UNIFORMS:?} must live in one uniform block")
                }
                Some(_) => {}
            }
        }

        if block != Some((0, 0)) {
            bail!("matrix uniforms must be bound at @group(0) @binding(0)");
        }
        Ok(())
    }
}

/// WGSL sources for one program, read from disk.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub vertex_path: PathBuf,
    pub vertex: String,
    pub fragment_path: PathBuf,
    pub fragment: String,
}

impl ShaderSource {
    pub fn load(vertex_path: &Path, fragment_path: &Path) -> Result<Self> {
        let vertex = std::fs::read_to_string(vertex_path)
            .with_context(|| format!("failed to read vertex shader {}", vertex_path.display()))?;
        let fragment = std::fs::read_to_string(fragment_path).with_context(|| {
            format!("failed to read fragment shader {}", fragment_path.display())
        })?;

        Ok(Self {
            vertex_path: vertex_path.to_path_buf(),
            vertex,
            fragment_path: fragment_path.to_path_buf(),
            fragment,
        })
    }

    /// Parses and validates both stages, then reflects their interface.
    ///
    /// Needs no GPU; this is the "compile" half of program creation.
    pub fn validate(&self) -> Result<ShaderInterface> {
        let vertex = parse_and_validate(&self.vertex, &self.vertex_path, naga::ShaderStage::Vertex, VERTEX_ENTRY)?;
        let fragment = parse_and_validate(
            &self.fragment,
            &self.fragment_path,
            naga::ShaderStage::Fragment,
            FRAGMENT_ENTRY,
        )?;

        let mut interface = ShaderInterface::reflect(&vertex, Some(VERTEX_ENTRY));
        interface.merge(ShaderInterface::reflect(&fragment, None));
        interface.require_draw_interface()?;
        Ok(interface)
    }
}

fn parse_and_validate(
    source: &str,
    path: &Path,
    stage: naga::ShaderStage,
    entry: &str,
) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!("{}: WGSL parse error: {e:?}", path.display()))?;

    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
        .validate(&module)
        .map_err(|e| anyhow!("{}: validation error: {e:?}", path.display()))?;

    if !module.entry_points.iter().any(|ep| ep.stage == stage && ep.name == entry) {
        bail!("{}: no {stage:?} entry point named `{entry}`", path.display());
    }

    Ok(module)
}

/// Render-target formats the program's pipeline is built for.
#[derive(Debug, Copy, Clone)]
pub struct ShaderTargets {
    pub color: wgpu::TextureFormat,
    pub depth: wgpu::TextureFormat,
}

/// A compiled, linked program: shader modules baked into a render pipeline
/// plus its reflected interface.
pub struct Shader {
    interface: ShaderInterface,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl Shader {
    /// Validates `source` and builds the pipeline.
    ///
    /// Each attribute stream gets its own vertex buffer slot in
    /// [`ATTRIBUTE_STREAMS`] order: 4 x f32, tightly packed. The matrix block
    /// is bound with a dynamic offset so every draw can select its own copy.
    pub fn compile(device: &wgpu::Device, source: &ShaderSource, targets: ShaderTargets) -> Result<Self> {
        let interface = source.validate()?;

        let block_size = interface
            .block_size(0, 0)
            .context("matrix uniform block has no size")?;

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("arkanoid vertex shader"),
            source: wgpu::ShaderSource::Wgsl(source.vertex.as_str().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("arkanoid fragment shader"),
            source: wgpu::ShaderSource::Wgsl(source.fragment.as_str().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("arkanoid matrices bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(u64::from(block_size)),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("arkanoid pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let mut attributes = [[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 0,
            shader_location: 0,
        }]; ATTRIBUTE_STREAMS.len()];
        for (slot, name) in ATTRIBUTE_STREAMS.iter().enumerate() {
            attributes[slot][0].shader_location = interface
                .attrib_location(name)
                .with_context(|| format!("missing attribute `{name}`"))?;
        }

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = attributes
            .iter()
            .map(|attrs| wgpu::VertexBufferLayout {
                array_stride: wgpu::VertexFormat::Float32x4.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("arkanoid model pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: targets.depth,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "shader compiled: {} + {}",
            source.vertex_path.display(),
            source.fragment_path.display()
        );

        Ok(Self {
            interface,
            pipeline,
            bind_group_layout,
        })
    }

    /// Makes this program current for the following draws in `rpass`.
    pub fn activate(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
    }

    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        self.interface.attrib_location(name)
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.interface.uniform_location(name)
    }

    pub fn interface(&self) -> &ShaderInterface {
        &self.interface
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped() -> ShaderSource {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shader");
        ShaderSource::load(&dir.join("vshader.wgsl"), &dir.join("fshader.wgsl"))
            .expect("shipped shaders are readable")
    }

    fn inline(vertex: &str, fragment: &str) -> ShaderSource {
        ShaderSource {
            vertex_path: PathBuf::from("inline.vert.wgsl"),
            vertex: vertex.to_string(),
            fragment_path: PathBuf::from("inline.frag.wgsl"),
            fragment: fragment.to_string(),
        }
    }

    #[test]
    fn shipped_shaders_validate_and_reflect() {
        let interface = shipped().validate().expect("shipped shaders are valid");

        assert_eq!(interface.attrib_location("vertex"), Some(0));
        assert_eq!(interface.attrib_location("color"), Some(1));
        assert_eq!(interface.attrib_location("normal"), Some(2));

        let offsets: Vec<u32> = MATRIX_UNIFORMS
            .iter()
            .map(|n| interface.uniform_location(n).unwrap().offset)
            .collect();
        assert_eq!(offsets, vec![0, 64, 128]);
        assert_eq!(interface.block_size(0, 0), Some(192));
    }

    #[test]
    fn unknown_names_have_no_location() {
        let interface = shipped().validate().unwrap();
        assert_eq!(interface.attrib_location("uv"), None);
        assert_eq!(interface.uniform_location("MVP"), None);
    }

    #[test]
    fn struct_inputs_are_reflected() {
        let vertex = r#"
            struct Matrices { P: mat4x4<f32>, V: mat4x4<f32>, M: mat4x4<f32> }
            @group(0) @binding(0) var<uniform> m: Matrices;
            struct In {
                @location(3) vertex: vec4<f32>,
                @location(4) color: vec4<f32>,
                @location(5) normal: vec4<f32>,
            }
            @vertex
            fn vs_main(i: In) -> @builtin(position) vec4<f32> {
                return m.P * m.V * m.M * i.vertex + i.color * 0.0 + i.normal * 0.0;
            }
        "#;
        let fragment = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";

        let interface = inline(vertex, fragment).validate().unwrap();
        assert_eq!(interface.attrib_location("vertex"), Some(3));
        assert_eq!(interface.attrib_location("normal"), Some(5));
    }

    #[test]
    fn syntax_errors_are_reported_with_the_file() {
        let err = inline("fn vs_main( {", "").validate().unwrap_err();
        assert!(format!("{err:#}").contains("inline.vert.wgsl"));
    }

    #[test]
    fn missing_matrix_uniform_is_rejected() {
        let vertex = r#"
            struct Matrices { P: mat4x4<f32>, V: mat4x4<f32> }
            @group(0) @binding(0) var<uniform> m: Matrices;
            @vertex
            fn vs_main(
                @location(0) vertex: vec4<f32>,
                @location(1) color: vec4<f32>,
                @location(2) normal: vec4<f32>,
            ) -> @builtin(position) vec4<f32> {
                return m.P * m.V * vertex + color * 0.0 + normal * 0.0;
            }
        "#;
        let fragment = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";

        let err = inline(vertex, fragment).validate().unwrap_err();
        assert!(err.to_string().contains("`M`"));
    }

    #[test]
    fn wrong_entry_point_name_is_rejected() {
        let fragment = "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let err = inline(&shipped().vertex, fragment).validate().unwrap_err();
        assert!(err.to_string().contains("fs_main"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ShaderSource::load(Path::new("/nonexistent/v.wgsl"), Path::new("/nonexistent/f.wgsl"))
            .unwrap_err();
        assert!(err.to_string().contains("vertex shader"));
    }
}
