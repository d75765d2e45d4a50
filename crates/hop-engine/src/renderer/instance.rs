use bytemuck::{Pod, Zeroable};

use crate::stage::TextInfo;

/// Primitive a render collaborator should draw for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Shape {
    Rect = 0,
    /// Upward-pointing triangle filling the rectangle (spikes).
    Triangle = 1,
}

impl Shape {
    pub fn as_f32(self) -> f32 {
        self as u8 as f32
    }

    pub fn from_f32(value: f32) -> Option<Self> {
        match value as u8 {
            0 => Some(Shape::Rect),
            1 => Some(Shape::Triangle),
            _ => None,
        }
    }
}

/// Per-object draw record handed to the render collaborator.
/// 8 floats = 32 bytes stride, castable to `&[f32]` for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Top-left x in screen space.
    pub x: f32,
    /// Top-left y in screen space.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Color channels in [0, 1].
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// `Shape` discriminant.
    pub shape: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Everything drawn for one frame: rectangles/triangles in draw order plus text.
/// The engine only records; it never produces pixels.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    pub texts: Vec<TextInfo>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(128),
            texts: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.texts.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn push_text(&mut self, text: TextInfo) {
        self.texts.push(text);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw hook. Implementors record themselves into the buffer.
pub trait Drawable {
    fn draw(&self, target: &mut RenderBuffer);
}
