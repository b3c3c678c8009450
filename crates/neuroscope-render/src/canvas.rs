//! The drawing surface seam and a deterministic software implementation.
//!
//! A [`Canvas`] renders two kinds of passes: the identity pass used for
//! picking, where every target is drawn with its flat id, and a regular
//! frame used for screenshots. [`SoftwareCanvas`] rasterises both on the
//! CPU in painter's order, which makes it usable headless and in tests.

use glam::{I64Vec2, UVec2, Vec2, Vec4};
use image::{Rgba, RgbaImage};
use neuroscope_core::{Geometry, ScreenRect};

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::pick::{CropRect, PickBuffer, MAX_PICK_ID};

/// Something drawable: world geometry seen through the camera, or a
/// rectangle fixed in canvas pixels.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    World(&'a Geometry),
    Screen(ScreenRect),
}

/// Targets of an identity pass, drawn in order (later items on top).
#[derive(Debug, Clone)]
pub struct IdentityScene<'a> {
    pub camera: &'a Camera,
    pub items: Vec<(u32, Shape<'a>)>,
}

impl<'a> IdentityScene<'a> {
    #[must_use]
    pub fn new(camera: &'a Camera) -> Self {
        Self {
            camera,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, id: u32, shape: Shape<'a>) {
        self.items.push((id, shape));
    }
}

/// Coloured items of a regular frame, drawn in order.
#[derive(Debug, Clone)]
pub struct FrameScene<'a> {
    pub camera: &'a Camera,
    pub background: Vec4,
    pub items: Vec<(Vec4, Shape<'a>)>,
}

impl<'a> FrameScene<'a> {
    #[must_use]
    pub fn new(camera: &'a Camera, background: Vec4) -> Self {
        Self {
            camera,
            background,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, color: Vec4, shape: Shape<'a>) {
        self.items.push((color, shape));
    }
}

/// A surface the viewer draws into.
pub trait Canvas {
    /// Logical canvas size in pixels.
    fn size(&self) -> UVec2;

    /// Framebuffer pixels per canvas pixel.
    fn pixel_scale(&self) -> u32;

    fn resize(&mut self, size: UVec2);

    /// Renders the identity pass for the framebuffer region `crop`.
    fn render_identity(
        &mut self,
        scene: &IdentityScene<'_>,
        crop: CropRect,
    ) -> RenderResult<PickBuffer>;

    /// Renders a full frame at `scale` times the canvas size.
    fn render_frame(&mut self, scene: &FrameScene<'_>, scale: u32) -> RenderResult<RgbaImage>;
}

/// CPU rasteriser implementing [`Canvas`].
#[derive(Debug, Clone)]
pub struct SoftwareCanvas {
    size: UVec2,
    pixel_scale: u32,
    identity_passes: usize,
}

impl SoftwareCanvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            pixel_scale: 1,
            identity_passes: 0,
        }
    }

    /// Sets the framebuffer density (e.g. 2 on high-DPI displays).
    #[must_use]
    pub fn with_pixel_scale(mut self, pixel_scale: u32) -> Self {
        self.pixel_scale = pixel_scale.max(1);
        self
    }

    /// Number of identity passes rendered so far.
    #[must_use]
    pub fn identity_passes(&self) -> usize {
        self.identity_passes
    }
}

impl Canvas for SoftwareCanvas {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn pixel_scale(&self) -> u32 {
        self.pixel_scale
    }

    fn resize(&mut self, size: UVec2) {
        self.size = size;
    }

    fn render_identity(
        &mut self,
        scene: &IdentityScene<'_>,
        crop: CropRect,
    ) -> RenderResult<PickBuffer> {
        if crop.size.x == 0 || crop.size.y == 0 {
            return Err(RenderError::EmptyTarget {
                width: crop.size.x,
                height: crop.size.y,
            });
        }
        if let Some((id, _)) = scene.items.iter().find(|(id, _)| *id > MAX_PICK_ID) {
            return Err(RenderError::TooManyTargets(*id as usize));
        }

        self.identity_passes += 1;
        let framebuffer = self.size * self.pixel_scale;
        let mut buffer = PickBuffer::new(crop.size.x, crop.size.y);
        let origin = crop.origin.as_i64vec2();
        for (id, shape) in &scene.items {
            rasterize(
                shape,
                scene.camera,
                framebuffer,
                self.pixel_scale,
                crop,
                &mut |x, y| buffer.set(x - origin.x, y - origin.y, *id),
            );
        }
        log::trace!(
            "identity pass at {:?}: {} targets",
            crop.origin,
            scene.items.len()
        );
        Ok(buffer)
    }

    fn render_frame(&mut self, scene: &FrameScene<'_>, scale: u32) -> RenderResult<RgbaImage> {
        let scale = scale.max(1);
        let target = self.size * scale;
        if target.x == 0 || target.y == 0 {
            return Err(RenderError::EmptyTarget {
                width: target.x,
                height: target.y,
            });
        }
        let mut img = RgbaImage::from_pixel(target.x, target.y, to_rgba8(scene.background));
        let crop = CropRect::full(target);
        for (color, shape) in &scene.items {
            rasterize(shape, scene.camera, target, scale, crop, &mut |x, y| {
                if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
                    if x < target.x && y < target.y {
                        let dst = img.get_pixel_mut(x, y);
                        *dst = blend(*dst, *color);
                    }
                }
            });
        }
        Ok(img)
    }
}

fn to_rgba8(color: Vec4) -> Rgba<u8> {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
}

/// Source-over blending of `color` onto `dst`.
fn blend(dst: Rgba<u8>, color: Vec4) -> Rgba<u8> {
    let d = Vec4::new(
        f32::from(dst[0]),
        f32::from(dst[1]),
        f32::from(dst[2]),
        f32::from(dst[3]),
    ) / 255.0;
    let a = color.w.clamp(0.0, 1.0);
    let rgb = color.truncate() * a + d.truncate() * (1.0 - a);
    let alpha = a + d.w * (1.0 - a);
    to_rgba8(rgb.extend(alpha))
}

/// Calls `plot` for every framebuffer pixel of `shape` inside `crop`.
fn rasterize(
    shape: &Shape<'_>,
    camera: &Camera,
    framebuffer: UVec2,
    scale: u32,
    crop: CropRect,
    plot: &mut dyn FnMut(i64, i64),
) {
    let lo = crop.origin.as_i64vec2();
    let hi = lo + crop.size.as_i64vec2();
    let mut put = |x: i64, y: i64| {
        if x >= lo.x && y >= lo.y && x < hi.x && y < hi.y {
            plot(x, y);
        }
    };
    #[allow(clippy::cast_precision_loss)]
    let scale = scale as f32;

    match shape {
        Shape::Screen(rect) => {
            let min = (rect.min * scale).floor().as_i64vec2().max(lo);
            let max = (rect.max * scale).ceil().as_i64vec2().min(hi);
            for y in min.y..max.y {
                for x in min.x..max.x {
                    put(x, y);
                }
            }
        }
        Shape::World(Geometry::Lines {
            positions,
            segments,
        }) => {
            let projected: Vec<Option<Vec2>> = positions
                .iter()
                .map(|p| camera.project(*p, framebuffer))
                .collect();
            for [a, b] in segments {
                let a = projected.get(*a as usize).copied().flatten();
                let b = projected.get(*b as usize).copied().flatten();
                if let (Some(a), Some(b)) = (a, b) {
                    draw_line(a, b, &mut put);
                }
            }
            if segments.is_empty() {
                for p in projected.into_iter().flatten() {
                    let p = p.floor().as_i64vec2();
                    put(p.x, p.y);
                }
            }
        }
        Shape::World(Geometry::Points { positions, size }) => {
            let half = (size * scale * 0.5).max(0.5);
            for p in positions {
                if let Some(c) = camera.project(*p, framebuffer) {
                    let min = (c - half).floor().as_i64vec2();
                    let max = (c + half).ceil().as_i64vec2();
                    for y in min.y..max.y {
                        for x in min.x..max.x {
                            put(x, y);
                        }
                    }
                }
            }
        }
        Shape::World(Geometry::Mesh { vertices, faces }) => {
            let projected: Vec<Option<Vec2>> = vertices
                .iter()
                .map(|p| camera.project(*p, framebuffer))
                .collect();
            for face in faces {
                let corners: Option<Vec<Vec2>> = face
                    .iter()
                    .map(|i| projected.get(*i as usize).copied().flatten())
                    .collect();
                if let Some(c) = corners {
                    fill_triangle(c[0], c[1], c[2], lo, hi, &mut put);
                }
            }
        }
    }
}

fn draw_line(a: Vec2, b: Vec2, put: &mut impl FnMut(i64, i64)) {
    let delta = b - a;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = delta.abs().max_element().ceil().min(1.0e6) as u32;
    if steps == 0 {
        let p = a.floor().as_i64vec2();
        put(p.x, p.y);
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let step = delta / steps as f32;
    for i in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let p = (a + step * i as f32).floor().as_i64vec2();
        put(p.x, p.y);
    }
}

fn fill_triangle(
    a: Vec2,
    b: Vec2,
    c: Vec2,
    lo: I64Vec2,
    hi: I64Vec2,
    put: &mut impl FnMut(i64, i64),
) {
    let edge = |p: Vec2, q: Vec2, r: Vec2| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
    let area = edge(a, b, c);
    if area.abs() < f32::EPSILON {
        draw_line(a, b, put);
        draw_line(b, c, put);
        return;
    }
    let min = a.min(b).min(c).floor().as_i64vec2().max(lo);
    let max = a.max(b).max(c).ceil().as_i64vec2().min(hi);
    for y in min.y..max.y {
        for x in min.x..max.x {
            #[allow(clippy::cast_precision_loss)]
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, p) * area.signum();
            let w1 = edge(c, a, p) * area.signum();
            let w2 = edge(a, b, p) * area.signum();
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                put(x, y);
            }
        }
    }
}
