//! Shared fixtures for the picking integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use meshpick::*;

/// Counters shared between a [`SoftwareRasterizer`] and the test holding it.
#[derive(Debug, Default)]
pub struct RasterStats {
    pub prepare_calls: AtomicUsize,
    pub draws: AtomicUsize,
    pub reads: AtomicUsize,
}

impl RasterStats {
    pub fn prepare_calls(&self) -> usize {
        self.prepare_calls.load(Ordering::SeqCst)
    }

    pub fn draws(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

/// A CPU implementation of [`IdRasterizer`] with OpenGL-style bottom-up rows.
///
/// Pixels are sampled at their centers with a depth test, which is all the
/// picker observes of a real GPU.
pub struct SoftwareRasterizer {
    program_available: bool,
    prepared: bool,
    width: u32,
    height: u32,
    colors: Vec<[u8; 4]>,
    depth: Vec<f32>,
    background: [u8; 4],
    stats: Arc<RasterStats>,
}

impl SoftwareRasterizer {
    pub fn new() -> (Self, Arc<RasterStats>) {
        Self::with_program(true)
    }

    /// A rasterizer whose pick program never compiles.
    pub fn broken() -> (Self, Arc<RasterStats>) {
        Self::with_program(false)
    }

    fn with_program(program_available: bool) -> (Self, Arc<RasterStats>) {
        let stats = Arc::new(RasterStats::default());
        let rasterizer = Self {
            program_available,
            prepared: false,
            width: 0,
            height: 0,
            colors: Vec::new(),
            depth: Vec::new(),
            background: BACKGROUND_COLOR,
            stats: Arc::clone(&stats),
        };
        (rasterizer, stats)
    }

    fn rasterize(&mut self, index: usize, corners: [Vec3; 3], view_proj: Mat4) {
        let mut ndc = [Vec3::ZERO; 3];
        for (out, corner) in ndc.iter_mut().zip(corners) {
            let clip = view_proj * corner.extend(1.0);
            if clip.w <= 0.0 {
                return;
            }
            *out = clip.truncate() / clip.w;
        }

        let (w, h) = (self.width as f32, self.height as f32);
        // Pixel space with y pointing down, matching screen coordinates.
        let px: Vec<Vec2> = ndc
            .iter()
            .map(|p| Vec2::new((p.x + 1.0) * 0.5 * w, (1.0 - p.y) * 0.5 * h))
            .collect();

        let area = edge(px[0], px[1], px[2]);
        if area == 0.0 {
            return;
        }

        let min = px[0].min(px[1]).min(px[2]).floor().max(Vec2::ZERO);
        let max = px[0].max(px[1]).max(px[2]).ceil().min(Vec2::new(w, h));
        let color = index_to_rgba(index as i32);

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let b0 = edge(px[1], px[2], p) / area;
                let b1 = edge(px[2], px[0], p) / area;
                let b2 = edge(px[0], px[1], p) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }
                let z = b0 * ndc[0].z + b1 * ndc[1].z + b2 * ndc[2].z;
                if !(0.0..=1.0).contains(&z) {
                    continue;
                }
                let slot = ((self.height - 1 - y) * self.width + x) as usize;
                if z < self.depth[slot] {
                    self.depth[slot] = z;
                    self.colors[slot] = color;
                }
            }
        }
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

impl IdRasterizer for SoftwareRasterizer {
    fn prepare_program(&mut self) -> RenderResult<()> {
        self.stats.prepare_calls.fetch_add(1, Ordering::SeqCst);
        if !self.program_available {
            return Err(RenderError::ShaderCompilationFailed(
                "selection program not found".into(),
            ));
        }
        self.prepared = true;
        Ok(())
    }

    fn ensure_target(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            let len = (width * height) as usize;
            self.colors = vec![self.background; len];
            self.depth = vec![1.0; len];
        }
        Ok(())
    }

    fn set_background(&mut self, color: [u8; 4]) {
        self.background = color;
    }

    fn draw_triangle_ids(&mut self, drawable: &TriangleDrawable, view_proj: Mat4) -> RenderResult<()> {
        if !self.prepared {
            return Err(RenderError::ProgramNotReady);
        }
        self.stats.draws.fetch_add(1, Ordering::SeqCst);
        self.colors.fill(self.background);
        self.depth.fill(f32::INFINITY);
        for (index, corners) in drawable.triangles().enumerate() {
            self.rasterize(index, corners, view_proj);
        }
        Ok(())
    }

    fn read_pixel(&mut self, x: u32, row: u32) -> RenderResult<[u8; 4]> {
        self.stats.reads.fetch_add(1, Ordering::SeqCst);
        if x >= self.width || row >= self.height {
            return Err(RenderError::PixelOutOfBounds {
                x,
                row,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.colors[(row * self.width + x) as usize])
    }

    fn row_origin(&self) -> RowOrigin {
        RowOrigin::BottomLeft
    }
}

/// Camera on the +z axis looking at the origin, 200x200 pixels.
pub fn front_camera() -> Camera {
    let mut camera = Camera::new(200, 200);
    camera.position = Vec3::new(0.0, 0.0, 5.0);
    camera.target = Vec3::ZERO;
    camera.near = 0.1;
    camera.far = 100.0;
    camera
}

/// A 3x1 strip in the z = 0 plane: a triangle, a quad and a pentagon.
///
/// Face 0: triangle over x in [-3, -1]; face 1: quad over x in [-1, 1];
/// face 2: pentagon over x in [1, 3].
pub fn mixed_strip() -> SurfaceMesh {
    let positions = vec![
        Vec3::new(-3.0, -1.0, 0.0), // 0
        Vec3::new(-1.0, -1.0, 0.0), // 1
        Vec3::new(-1.0, 1.0, 0.0),  // 2
        Vec3::new(1.0, -1.0, 0.0),  // 3
        Vec3::new(1.0, 1.0, 0.0),   // 4
        Vec3::new(3.0, -1.0, 0.0),  // 5
        Vec3::new(3.0, 1.0, 0.0),   // 6
        Vec3::new(2.0, 1.5, 0.0),   // 7
    ];
    let faces = vec![vec![0, 1, 2], vec![1, 3, 4, 2], vec![3, 5, 6, 7, 4]];
    SurfaceMesh::from_polygons(positions, &faces).expect("valid strip")
}

/// Two unit quads facing the camera, the second one behind the first.
pub fn stacked_quads() -> SurfaceMesh {
    let positions = vec![
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    SurfaceMesh::from_polygons(positions, &[vec![0, 1, 2, 3], vec![4, 5, 6, 7]])
        .expect("valid quads")
}

/// Screen position of a world point, snapped to the center of its pixel.
pub fn pixel_center_of(camera: &Camera, world: Vec3) -> Vec2 {
    camera.project(world).floor() + Vec2::splat(0.5)
}
