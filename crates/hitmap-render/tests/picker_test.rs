//! End-to-end picker tests against a software-rasterizing device double.
//!
//! The device implements just enough of `GraphicsDevice` to rasterize
//! triangle lists into per-target framebuffers with depth, which is all
//! the pick pass needs: `prepare` then `get_selection` run against real
//! pixel coverage instead of canned readback data.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3, Vec4};
use hitmap_core::handle::{
    IndexBufferId, ProgramId, RenderTargetId, TextureId, UniformId, VertexBufferId,
};
use hitmap_core::scene::{
    CullMode, Drawable, MaterialKind, MaterialState, MeshBinding, SkinBinding, Topology,
};
use hitmap_render::device::{
    ClearOptions, GraphicsDevice, Primitive, Rect, RenderTargetDesc, TextureDesc, TextureUpload,
    UniformValue,
};
use hitmap_render::texture::SamplerState;
use hitmap_render::{
    Camera, PickRect, Picker, RenderError, Texture, TextureOptions, TextureSource,
};
use image::RgbaImage;

struct Framebuffer {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
}

impl Framebuffer {
    fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![[0, 0, 0, 255]; len],
            depth: vec![1.0; len],
        }
    }
}

#[derive(Debug, Clone)]
enum StoredUniform {
    Float(f32),
    Vec2(Vec2),
    Vec4(Vec4),
    Mat4(Mat4),
    Mat4Array(Vec<Mat4>),
    Texture(TextureId),
}

/// A CPU reference device: triangle-list rasterization at pixel centers,
/// per-target framebuffers, depth test, blocking readback.
struct SoftwareDevice {
    surface: Framebuffer,
    targets: HashMap<u32, Framebuffer>,
    active: Option<RenderTargetId>,
    viewport: Rect,
    scissor: Rect,
    depth_test: bool,
    depth_write: bool,
    vertex_buffers: HashMap<u32, Vec<Vec3>>,
    index_buffers: HashMap<u32, Vec<u32>>,
    bound_vertex_buffer: Option<VertexBufferId>,
    bound_index_buffer: Option<IndexBufferId>,
    bound_program: Option<ProgramId>,
    uniform_ids: HashMap<String, u32>,
    uniform_names: Vec<String>,
    uniform_values: HashMap<u32, StoredUniform>,
    next_id: u32,
    bone_textures: bool,
    skinned_draws: usize,
    texture_descs: HashMap<u32, TextureDesc>,
    destroyed_textures: Vec<TextureId>,
}

impl SoftwareDevice {
    fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Framebuffer::new(width, height),
            targets: HashMap::new(),
            active: None,
            viewport: Rect::new(0, 0, width, height),
            scissor: Rect::new(0, 0, width, height),
            depth_test: true,
            depth_write: true,
            vertex_buffers: HashMap::new(),
            index_buffers: HashMap::new(),
            bound_vertex_buffer: None,
            bound_index_buffer: None,
            bound_program: None,
            uniform_ids: HashMap::new(),
            uniform_names: Vec::new(),
            uniform_values: HashMap::new(),
            next_id: 1,
            bone_textures: false,
            skinned_draws: 0,
            texture_descs: HashMap::new(),
            destroyed_textures: Vec::new(),
        }
    }

    fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add_vertex_buffer(&mut self, positions: Vec<Vec3>) -> VertexBufferId {
        let id = self.fresh_id();
        self.vertex_buffers.insert(id, positions);
        VertexBufferId(id)
    }

    fn add_index_buffer(&mut self, indices: Vec<u32>) -> IndexBufferId {
        let id = self.fresh_id();
        self.index_buffers.insert(id, indices);
        IndexBufferId(id)
    }

    fn uniform_named(&self, name: &str) -> Option<&StoredUniform> {
        let id = self.uniform_ids.get(name)?;
        self.uniform_values.get(id)
    }

    fn mat4_uniform(&self, name: &str) -> Mat4 {
        match self.uniform_named(name) {
            Some(StoredUniform::Mat4(m)) => *m,
            _ => Mat4::IDENTITY,
        }
    }

    fn vec4_uniform(&self, name: &str) -> Vec4 {
        match self.uniform_named(name) {
            Some(StoredUniform::Vec4(v)) => *v,
            _ => Vec4::ZERO,
        }
    }

    fn active_framebuffer(&mut self) -> &mut Framebuffer {
        match self.active {
            Some(target) => self
                .targets
                .get_mut(&target.0)
                .expect("active render target was destroyed"),
            None => &mut self.surface,
        }
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

impl GraphicsDevice for SoftwareDevice {
    fn surface_size(&self) -> (u32, u32) {
        (self.surface.width, self.surface.height)
    }

    fn supports_bone_textures(&self) -> bool {
        self.bone_textures
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> RenderTargetId {
        let id = self.fresh_id();
        self.targets.insert(id, Framebuffer::new(desc.width, desc.height));
        RenderTargetId(id)
    }

    fn destroy_render_target(&mut self, target: RenderTargetId) {
        self.targets.remove(&target.0);
    }

    fn active_render_target(&self) -> Option<RenderTargetId> {
        self.active
    }

    fn set_render_target(&mut self, target: Option<RenderTargetId>) {
        self.active = target;
    }

    fn set_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
    }

    fn set_scissor(&mut self, rect: Rect) {
        self.scissor = rect;
    }

    fn clear(&mut self, options: &ClearOptions) {
        let color = options.color;
        let depth = options.depth;
        let framebuffer = self.active_framebuffer();
        if let Some(c) = color {
            let bytes = c.map(|v| (v * 255.0).round() as u8);
            framebuffer.color.fill(bytes);
        }
        if let Some(d) = depth {
            framebuffer.depth.fill(d);
        }
    }

    fn set_blending(&mut self, _enabled: bool) {}

    fn set_cull_mode(&mut self, _cull: CullMode) {}

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.depth_write = enabled;
    }

    fn picking_program(&mut self, skinned: bool) -> ProgramId {
        ProgramId(u32::from(skinned))
    }

    fn set_program(&mut self, program: ProgramId) {
        self.bound_program = Some(program);
    }

    fn resolve_uniform(&mut self, name: &str) -> UniformId {
        if let Some(&id) = self.uniform_ids.get(name) {
            return UniformId(id);
        }
        let id = self.uniform_names.len() as u32 + 1000;
        self.uniform_ids.insert(name.to_string(), id);
        self.uniform_names.push(name.to_string());
        UniformId(id)
    }

    fn set_uniform(&mut self, uniform: UniformId, value: UniformValue<'_>) {
        let stored = match value {
            UniformValue::Float(v) => StoredUniform::Float(v),
            UniformValue::Vec2(v) => StoredUniform::Vec2(v),
            UniformValue::Vec4(v) => StoredUniform::Vec4(v),
            UniformValue::Mat4(v) => StoredUniform::Mat4(v),
            UniformValue::Mat4Array(v) => StoredUniform::Mat4Array(v.to_vec()),
            UniformValue::Texture(v) => StoredUniform::Texture(v),
        };
        self.uniform_values.insert(uniform.0, stored);
    }

    fn set_vertex_buffer(&mut self, buffer: VertexBufferId) {
        self.bound_vertex_buffer = Some(buffer);
    }

    fn set_index_buffer(&mut self, buffer: IndexBufferId) {
        self.bound_index_buffer = Some(buffer);
    }

    fn draw(&mut self, primitive: &Primitive) {
        assert_eq!(
            primitive.topology,
            Topology::TriangleList,
            "test device rasterizes triangle lists only"
        );
        if self.bound_program == Some(ProgramId(1)) {
            self.skinned_draws += 1;
        }
        let positions = self.bound_vertex_buffer.and_then(|vb| self.vertex_buffers.get(&vb.0));
        let Some(positions) = positions.cloned() else {
            return;
        };
        let range = primitive.base as usize..(primitive.base + primitive.count) as usize;
        let indices: Vec<u32> = if primitive.indexed {
            let ib = self
                .bound_index_buffer
                .and_then(|ib| self.index_buffers.get(&ib.0))
                .expect("indexed draw without an index buffer");
            ib[range].to_vec()
        } else {
            range.map(|i| i as u32).collect()
        };

        let view_projection = self.mat4_uniform("matrix_view_projection");
        let model = self.mat4_uniform("matrix_model");
        let color = self.vec4_uniform("u_color");
        let color_bytes = [
            (color.x * 255.0).round() as u8,
            (color.y * 255.0).round() as u8,
            (color.z * 255.0).round() as u8,
            (color.w * 255.0).round() as u8,
        ];
        let transform = view_projection * model;
        let viewport = self.viewport;
        let depth_test = self.depth_test;
        let depth_write = self.depth_write;
        let framebuffer = self.active_framebuffer();

        for triangle in indices.chunks_exact(3) {
            let screen: Vec<(Vec2, f32)> = triangle
                .iter()
                .map(|&i| {
                    let clip = transform * positions[i as usize].extend(1.0);
                    let ndc = clip.truncate() / clip.w;
                    let x = (ndc.x + 1.0) * 0.5 * viewport.width as f32 + viewport.x as f32;
                    let y = (ndc.y + 1.0) * 0.5 * viewport.height as f32 + viewport.y as f32;
                    (Vec2::new(x, y), ndc.z)
                })
                .collect();
            let (a, b, c) = (screen[0], screen[1], screen[2]);
            let area = edge(a.0, b.0, c.0);
            if area.abs() < f32::EPSILON {
                continue;
            }
            for py in 0..framebuffer.height {
                for px in 0..framebuffer.width {
                    let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    let e0 = edge(b.0, c.0, p);
                    let e1 = edge(c.0, a.0, p);
                    let e2 = edge(a.0, b.0, p);
                    let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0)
                        || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
                    if !inside {
                        continue;
                    }
                    let (w0, w1, w2) = (e0 / area, e1 / area, e2 / area);
                    let z = w0 * a.1 + w1 * b.1 + w2 * c.1;
                    let pixel = (py * framebuffer.width + px) as usize;
                    if depth_test && z > framebuffer.depth[pixel] {
                        continue;
                    }
                    framebuffer.color[pixel] = color_bytes;
                    if depth_write {
                        framebuffer.depth[pixel] = z;
                    }
                }
            }
        }
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> TextureId {
        let id = self.fresh_id();
        self.texture_descs.insert(id, *desc);
        TextureId(id)
    }

    fn upload_texture(&mut self, texture: TextureId, upload: &TextureUpload<'_>) {
        let desc = self
            .texture_descs
            .get(&texture.0)
            .expect("upload to a texture that was never created");
        assert!(
            upload.width <= desc.width && upload.height <= desc.height,
            "upload exceeds the allocated texture storage"
        );
        assert!(upload.level < desc.mip_count, "upload to an unallocated mip");
    }

    fn set_sampler_state(&mut self, _texture: TextureId, _sampler: &SamplerState) {}

    fn destroy_texture(&mut self, texture: TextureId) {
        self.texture_descs.remove(&texture.0);
        self.destroyed_textures.push(texture);
    }

    fn read_pixels(&mut self, x: u32, y: u32, width: u32, height: u32, pixels: &mut [u8]) {
        let framebuffer = self.active_framebuffer();
        let mut offset = 0;
        for row in y..y + height {
            for col in x..x + width {
                let pixel = framebuffer.color[(row * framebuffer.width + col) as usize];
                pixels[offset..offset + 4].copy_from_slice(&pixel);
                offset += 4;
            }
        }
    }
}

#[derive(Debug)]
struct TestDrawable {
    name: &'static str,
    command: bool,
    mesh: Option<MeshBinding>,
    material: Option<MaterialState>,
    world: Mat4,
    skin: Option<SkinBinding>,
}

impl Drawable for TestDrawable {
    fn is_command(&self) -> bool {
        self.command
    }

    fn mesh(&self) -> Option<&MeshBinding> {
        self.mesh.as_ref()
    }

    fn material(&self) -> Option<&MaterialState> {
        self.material.as_ref()
    }

    fn world_transform(&self) -> Mat4 {
        self.world
    }

    fn skin(&self) -> Option<&SkinBinding> {
        self.skin.as_ref()
    }
}

/// A triangle drawable given directly in clip space (the tests use an
/// identity camera, so clip space is the pick buffer's NDC).
fn triangle(device: &mut SoftwareDevice, name: &'static str, vertices: [Vec3; 3]) -> TestDrawable {
    let vertex_buffer = device.add_vertex_buffer(vertices.to_vec());
    let index_buffer = device.add_index_buffer(vec![0, 1, 2]);
    TestDrawable {
        name,
        command: false,
        mesh: Some(MeshBinding {
            topology: Topology::TriangleList,
            vertex_buffer,
            index_buffer: Some(index_buffer),
            base: 0,
            count: 3,
            skinned: false,
        }),
        material: Some(MaterialState::opaque(MaterialKind::Standard)),
        world: Mat4::IDENTITY,
        skin: None,
    }
}

fn command_marker() -> TestDrawable {
    TestDrawable {
        name: "command",
        command: true,
        mesh: None,
        material: None,
        world: Mat4::IDENTITY,
        skin: None,
    }
}

fn names(selection: &[&TestDrawable]) -> Vec<&'static str> {
    selection.iter().map(|d| d.name).collect()
}

/// A small triangle in the +x/+y quadrant of NDC. In a 10x10 buffer it
/// covers exactly pixel (5, 5).
const SMALL: [Vec3; 3] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.3, 0.0, 0.0),
    Vec3::new(0.0, 0.3, 0.0),
];

/// A triangle around the buffer center covering several pixels.
const WIDE: [Vec3; 3] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(-0.5, 0.5, 0.0),
];

#[test]
fn picks_the_drawable_covering_a_pixel() {
    let mut device = SoftwareDevice::new(32, 32);
    let far = triangle(&mut device, "far", [
        Vec3::new(-0.9, -0.9, 0.0),
        Vec3::new(-0.8, -0.9, 0.0),
        Vec3::new(-0.9, -0.8, 0.0),
    ]);
    let other = command_marker();
    let hit = triangle(&mut device, "hit", SMALL);
    let scene = [far, other, hit];

    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    let selection = picker
        .get_selection(&mut device, PickRect::pixel(5, 5), &scene)
        .unwrap();
    assert_eq!(names(&selection), ["hit"]);
}

#[test]
fn background_rect_selects_nothing() {
    let mut device = SoftwareDevice::new(32, 32);
    let scene = [triangle(&mut device, "hit", SMALL)];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    let selection = picker
        .get_selection(&mut device, PickRect::new(8, 8, 2, 2), &scene)
        .unwrap();
    assert!(selection.is_empty());
}

#[test]
fn duplicate_pixels_yield_one_reference() {
    let mut device = SoftwareDevice::new(32, 32);
    let scene = [triangle(&mut device, "wide", WIDE)];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    // the whole buffer: many covered pixels, one drawable
    let selection = picker
        .get_selection(&mut device, PickRect::new(0, 0, 10, 10), &scene)
        .unwrap();
    assert_eq!(names(&selection), ["wide"]);
}

#[test]
fn multiple_drawables_in_first_seen_order() {
    let mut device = SoftwareDevice::new(32, 32);
    // lower triangle spans the bottom rows, small one sits above center
    let low = triangle(&mut device, "low", [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, -0.6, 0.0),
    ]);
    let high = triangle(&mut device, "high", SMALL);
    let scene = [low, high];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    // row-major from the bottom: "low" pixels come before "high" pixels
    let selection = picker
        .get_selection(&mut device, PickRect::new(0, 0, 10, 10), &scene)
        .unwrap();
    assert_eq!(names(&selection), ["low", "high"]);
}

#[test]
fn nearer_drawable_occludes_farther_one() {
    let mut device = SoftwareDevice::new(32, 32);
    let mut far = triangle(&mut device, "far", SMALL);
    far.world = Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5));
    let near = triangle(&mut device, "near", SMALL);
    let scene = [far, near];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    let selection = picker
        .get_selection(&mut device, PickRect::pixel(5, 5), &scene)
        .unwrap();
    assert_eq!(names(&selection), ["near"]);
}

#[test]
fn non_solid_and_non_pickable_entries_are_invisible() {
    let mut device = SoftwareDevice::new(32, 32);
    let mut lines = triangle(&mut device, "lines", SMALL);
    if let Some(mesh) = lines.mesh.as_mut() {
        mesh.topology = Topology::Lines;
    }
    let mut particles = triangle(&mut device, "particles", SMALL);
    if let Some(material) = particles.material.as_mut() {
        material.kind = MaterialKind::Particle;
    }
    let scene = [lines, particles, command_marker()];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    let selection = picker
        .get_selection(&mut device, PickRect::new(0, 0, 10, 10), &scene)
        .unwrap();
    assert!(selection.is_empty());
}

#[test]
fn skinned_drawable_uses_the_skinned_program() {
    let mut device = SoftwareDevice::new(32, 32);
    let mut skinned = triangle(&mut device, "skinned", SMALL);
    if let Some(mesh) = skinned.mesh.as_mut() {
        mesh.skinned = true;
    }
    skinned.skin = Some(SkinBinding {
        palette_texture: None,
        matrix_palette: vec![Mat4::IDENTITY],
    });
    let scene = [skinned];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    assert_eq!(device.skinned_draws, 1);
    assert!(
        matches!(device.uniform_named("matrix_pose"), Some(StoredUniform::Mat4Array(_))),
        "without bone-texture support the flat matrix palette is bound"
    );
    let selection = picker
        .get_selection(&mut device, PickRect::pixel(5, 5), &scene)
        .unwrap();
    assert_eq!(names(&selection), ["skinned"]);
}

#[test]
fn bone_texture_capability_switches_the_skin_path() {
    let mut device = SoftwareDevice::new(32, 32);
    device.bone_textures = true;
    let mut skinned = triangle(&mut device, "skinned", SMALL);
    if let Some(mesh) = skinned.mesh.as_mut() {
        mesh.skinned = true;
    }
    skinned.skin = Some(SkinBinding {
        palette_texture: Some((TextureId(99), 64, 2)),
        matrix_palette: Vec::new(),
    });
    let scene = [skinned];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);

    assert!(matches!(
        device.uniform_named("texture_pose_map"),
        Some(StoredUniform::Texture(TextureId(99)))
    ));
    assert!(matches!(
        device.uniform_named("texture_pose_map_size"),
        Some(StoredUniform::Vec2(_))
    ));
}

#[test]
fn ambient_target_state_is_restored() {
    let mut device = SoftwareDevice::new(32, 32);
    let scene = [triangle(&mut device, "hit", SMALL)];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);

    // an unrelated target is active when the pick pass runs
    let other = device.create_render_target(&RenderTargetDesc {
        color: TextureId(0),
        width: 32,
        height: 32,
        depth: false,
    });
    device.set_render_target(Some(other));

    picker.prepare(&mut device, &camera, &scene);
    assert_eq!(device.active_render_target(), Some(other));
    assert_eq!(device.viewport, Rect::new(0, 0, 32, 32));
    assert_eq!(device.scissor, Rect::new(0, 0, 32, 32));

    picker
        .get_selection(&mut device, PickRect::pixel(5, 5), &scene)
        .unwrap();
    assert_eq!(device.active_render_target(), Some(other));

    device.set_render_target(None);
    picker.prepare(&mut device, &camera, &scene);
    assert_eq!(device.active_render_target(), None);
}

#[test]
fn selection_before_prepare_is_an_error() {
    let mut device = SoftwareDevice::new(32, 32);
    let scene = [triangle(&mut device, "hit", SMALL)];
    let picker = Picker::new(&mut device, 10, 10);
    assert_eq!(
        picker
            .get_selection(&mut device, PickRect::pixel(5, 5), &scene)
            .unwrap_err(),
        RenderError::NotPrepared
    );
}

#[test]
fn changed_sequence_length_is_an_error() {
    let mut device = SoftwareDevice::new(32, 32);
    let scene = [
        triangle(&mut device, "a", SMALL),
        triangle(&mut device, "b", WIDE),
    ];
    let camera = Camera::new(Mat4::IDENTITY);
    let mut picker = Picker::new(&mut device, 10, 10);
    picker.prepare(&mut device, &camera, &scene);
    assert_eq!(
        picker
            .get_selection(&mut device, PickRect::pixel(5, 5), &scene[..1])
            .unwrap_err(),
        RenderError::SceneChanged {
            prepared: 2,
            actual: 1,
        }
    );
}

#[test]
fn resize_behaves_like_fresh_construction() {
    let mut device = SoftwareDevice::new(32, 32);
    let scene = [
        triangle(&mut device, "wide", WIDE),
        triangle(&mut device, "small", SMALL),
    ];
    let camera = Camera::new(Mat4::IDENTITY);

    let mut fresh = Picker::new(&mut device, 16, 16);
    fresh.prepare(&mut device, &camera, &scene);
    let expected = names(
        &fresh
            .get_selection(&mut device, PickRect::new(0, 0, 16, 16), &scene)
            .unwrap(),
    );

    let mut resized = Picker::new(&mut device, 10, 10);
    resized.resize(&mut device, 16, 16);
    assert_eq!((resized.width(), resized.height()), (16, 16));

    // content is gone until the next prepare
    assert_eq!(
        resized
            .get_selection(&mut device, PickRect::pixel(5, 5), &scene)
            .unwrap_err(),
        RenderError::NotPrepared
    );

    resized.prepare(&mut device, &camera, &scene);
    let actual = names(
        &resized
            .get_selection(&mut device, PickRect::new(0, 0, 16, 16), &scene)
            .unwrap(),
    );
    assert_eq!(actual, expected);
}

#[test]
fn upload_recreates_device_texture_after_source_resize() {
    let mut device = SoftwareDevice::new(32, 32);
    let mut tex = Texture::new(TextureOptions {
        width: 4,
        height: 4,
        ..TextureOptions::default()
    });
    let first = tex.upload(&mut device);
    assert_eq!(
        tex.upload(&mut device),
        first,
        "unchanged texture keeps its handle"
    );

    tex.set_source(TextureSource::Image(RgbaImage::new(32, 16)))
        .unwrap();
    let second = tex.upload(&mut device);
    assert_ne!(second, first, "resized storage needs a fresh handle");
    assert!(device.destroyed_textures.contains(&first));
    let desc = device.texture_descs.get(&second.0).unwrap();
    assert_eq!((desc.width, desc.height), (32, 16));
    assert_eq!(desc.mip_count, hitmap_core::format::mip_level_count(32, 16));
}

#[test]
fn pick_target_uses_exact_lookup_sampling() {
    let mut device = SoftwareDevice::new(32, 32);
    let picker = Picker::new(&mut device, 10, 10);
    let color = picker.render_target().color_texture();
    assert_eq!(
        color.format(),
        hitmap_core::format::PixelFormat::R8G8B8A8
    );
    assert_eq!(color.min_filter(), hitmap_render::FilterMode::Nearest);
    assert_eq!(color.mag_filter(), hitmap_render::FilterMode::Nearest);
    assert_eq!(color.address_u(), hitmap_render::AddressMode::ClampToEdge);
    assert_eq!(color.address_v(), hitmap_render::AddressMode::ClampToEdge);
}
