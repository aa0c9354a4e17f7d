//! The picking session.
//!
//! A [`SurfaceMeshPicker`] remembers the last picked face and the 3D point
//! where the pick ray hit it. Vertex and edge picks only refine that face, so
//! they must follow a face pick on the same picker.

mod cpu;
mod gpu;
mod refine;

use glam::{Vec2, Vec3};
use meshpick_core::{PickError, PickOptions, PickStrategy, Projection, Result};
use meshpick_mesh::{Face, SurfaceMesh};
use meshpick_render::IdRasterizer;

/// A successful face pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    /// The picked face.
    pub face: Face,
    /// World-space point on the face's plane under the cursor.
    pub point: Vec3,
}

/// Picks faces, vertices and edges of a [`SurfaceMesh`] under a screen
/// position.
///
/// Results are `Option`s: `None` covers both "nothing under the cursor" and
/// failures, which are reported through `log`.
pub struct SurfaceMeshPicker {
    options: PickOptions,
    use_gpu: bool,
    picked: Option<FaceHit>,
    rasterizer: Option<Box<dyn IdRasterizer>>,
}

impl SurfaceMeshPicker {
    /// Creates a picker that only ray casts.
    pub fn cpu_only() -> Self {
        Self {
            options: PickOptions {
                use_gpu: false,
                ..PickOptions::default()
            },
            use_gpu: false,
            picked: None,
            rasterizer: None,
        }
    }

    /// Creates a picker that renders color IDs with `rasterizer`, falling back
    /// to ray casting if the pick program is unavailable.
    pub fn new<R: IdRasterizer + 'static>(rasterizer: R) -> Self {
        Self::with_gpu(Box::new(rasterizer))
    }

    /// Like [`new`](Self::new), for an already boxed rasterizer.
    pub fn with_gpu(mut rasterizer: Box<dyn IdRasterizer>) -> Self {
        let options = PickOptions::default();
        rasterizer.set_background(options.background);
        Self {
            options,
            use_gpu: true,
            picked: None,
            rasterizer: Some(rasterizer),
        }
    }

    /// Applies `options`. GPU picking stays off if no rasterizer is attached
    /// or the picker has already fallen back to the CPU.
    pub fn with_options(mut self, options: PickOptions) -> Result<Self> {
        options.validate()?;
        if let Some(rasterizer) = self.rasterizer.as_deref_mut() {
            rasterizer.set_background(options.background);
        }
        self.use_gpu = options.use_gpu && self.rasterizer.is_some();
        self.options = options;
        Ok(self)
    }

    /// Current options.
    pub fn options(&self) -> &PickOptions {
        &self.options
    }

    /// Returns true while face picks go through the GPU.
    pub fn uses_gpu(&self) -> bool {
        self.use_gpu
    }

    /// The strategy the next [`pick_face`](Self::pick_face) will try first.
    pub fn strategy(&self) -> PickStrategy {
        if self.use_gpu {
            PickStrategy::Gpu
        } else {
            PickStrategy::Cpu
        }
    }

    /// Screen-space tolerance in pixels for vertex and edge picks.
    pub fn hit_resolution(&self) -> f32 {
        self.options.hit_resolution
    }

    /// Sets the vertex/edge tolerance. Negative or non-finite values are
    /// rejected and leave the tolerance unchanged.
    pub fn set_hit_resolution(&mut self, pixels: f32) {
        if pixels.is_finite() && pixels >= 0.0 {
            self.options.hit_resolution = pixels;
        } else {
            log::error!("invalid hit resolution {pixels}, keeping {}", self.options.hit_resolution);
        }
    }

    /// The face found by the last successful face pick.
    pub fn picked_face(&self) -> Option<Face> {
        if self.picked.is_none() {
            log::error!("no face has been picked");
        }
        self.picked.map(|hit| hit.face)
    }

    /// The world-space hit point of the last successful face pick.
    pub fn picked_point(&self) -> Option<Vec3> {
        if self.picked.is_none() {
            log::error!("no face has been picked");
        }
        self.picked.map(|hit| hit.point)
    }

    /// The last face pick, without logging when there is none.
    pub fn last_hit(&self) -> Option<FaceHit> {
        self.picked
    }

    /// Picks the face under `screen`.
    ///
    /// Uses the GPU strategy while it is enabled. If the pick program cannot
    /// be created the picker switches to ray casting for good, and this call
    /// is answered by the ray cast.
    pub fn pick_face<P: Projection + ?Sized>(
        &mut self,
        mesh: &SurfaceMesh,
        camera: &P,
        screen: Vec2,
    ) -> Option<Face> {
        if self.use_gpu {
            match self.try_pick_face_gpu(mesh, camera, screen) {
                Ok(hit) => return self.record(hit),
                Err(PickError::ProgramUnavailable(reason)) => self.disable_gpu(&reason),
                Err(err) => {
                    log::error!("{err}");
                    return self.record(None);
                }
            }
        }
        self.pick_face_cpu(mesh, camera, screen)
    }

    /// Picks the face under `screen` by ray casting.
    pub fn pick_face_cpu<P: Projection + ?Sized>(
        &mut self,
        mesh: &SurfaceMesh,
        camera: &P,
        screen: Vec2,
    ) -> Option<Face> {
        let hit = cpu::cast_ray(mesh, camera, screen);
        self.record(hit)
    }

    /// Picks the face under `screen` by rendering color IDs, without falling
    /// back to ray casting. A missing pick program still disables the GPU
    /// strategy for later [`pick_face`](Self::pick_face) calls.
    pub fn pick_face_gpu<P: Projection + ?Sized>(
        &mut self,
        mesh: &SurfaceMesh,
        camera: &P,
        screen: Vec2,
    ) -> Option<Face> {
        match self.try_pick_face_gpu(mesh, camera, screen) {
            Ok(hit) => self.record(hit),
            Err(err) => {
                if let PickError::ProgramUnavailable(reason) = &err {
                    self.disable_gpu(reason);
                } else {
                    log::error!("{err}");
                }
                self.record(None)
            }
        }
    }

    fn record(&mut self, hit: Option<FaceHit>) -> Option<Face> {
        self.picked = hit;
        hit.map(|hit| hit.face)
    }

    fn disable_gpu(&mut self, reason: &str) {
        if self.use_gpu {
            log::warn!("GPU picking unavailable ({reason}); falling back to ray casting");
        }
        self.use_gpu = false;
        self.rasterizer = None;
    }

    /// The session's hit, if `face` is the face it recorded.
    fn session_hit(&self, mesh: &SurfaceMesh, face: Face) -> Result<FaceHit> {
        match self.picked {
            Some(hit) if hit.face == face && mesh.is_valid_face(face) => Ok(hit),
            _ => Err(PickError::FaceMismatch {
                given: Some(face.index()),
                last: self.picked.map(|hit| hit.face.index()),
            }),
        }
    }
}

impl Default for SurfaceMeshPicker {
    fn default() -> Self {
        Self::cpu_only()
    }
}

impl std::fmt::Debug for SurfaceMeshPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceMeshPicker")
            .field("options", &self.options)
            .field("use_gpu", &self.use_gpu)
            .field("picked", &self.picked)
            .field("has_rasterizer", &self.rasterizer.is_some())
            .finish()
    }
}
