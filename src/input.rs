//! Cursor input in normalized device coordinates.
//!
//! [`Input`] turns winit pointer events into NDC and writes them into a
//! [`CursorState`]. The frame loop reads the same `CursorState` once per
//! frame. The cell is lock-free, so the writer may live on another thread
//! without changing the reader.

use glam::Vec2;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use winit::event::WindowEvent;

/// Single cursor position, last write wins.
///
/// Both components are packed into one `AtomicU64` so a reader never sees
/// `x` from one write and `y` from another.
#[derive(Debug, Default)]
pub struct CursorState {
    bits: AtomicU64,
}

impl CursorState {
    /// Cursor at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new cursor position (NDC).
    #[inline]
    pub fn store(&self, ndc: Vec2) {
        self.bits.store(pack(ndc), Ordering::Relaxed);
    }

    /// Latest cursor position (NDC).
    #[inline]
    pub fn load(&self) -> Vec2 {
        unpack(self.bits.load(Ordering::Relaxed))
    }

    /// Move the cursor back to the origin.
    #[inline]
    pub fn reset(&self) {
        self.store(Vec2::ZERO);
    }
}

#[inline]
fn pack(v: Vec2) -> u64 {
    ((v.x.to_bits() as u64) << 32) | v.y.to_bits() as u64
}

#[inline]
fn unpack(bits: u64) -> Vec2 {
    Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}

/// Convert a pixel position to NDC for a surface of `width` x `height`.
///
/// Origin is at the center of the surface, X grows to the right and Y grows
/// upward. Returns `None` for a zero-sized surface.
pub fn pixel_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(Vec2::new(
        (x as f32 / width as f32) * 2.0 - 1.0,
        1.0 - (y as f32 / height as f32) * 2.0, // Y flipped
    ))
}

/// Pointer event handler feeding a [`CursorState`].
#[derive(Debug)]
pub struct Input {
    cursor: Arc<CursorState>,
    window_size: (u32, u32),
}

impl Input {
    pub fn new(cursor: Arc<CursorState>, width: u32, height: u32) -> Self {
        Self {
            cursor,
            window_size: (width, height),
        }
    }

    /// The cell this handler writes into.
    pub fn cursor(&self) -> &Arc<CursorState> {
        &self.cursor
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Handle a pointer move given in surface pixels.
    pub fn pointer_moved(&self, x: f64, y: f64) {
        let (w, h) = self.window_size;
        if let Some(ndc) = pixel_to_ndc(x, y, w, h) {
            self.cursor.store(ndc);
        }
    }

    /// Handle the pointer leaving the surface.
    pub fn pointer_left(&self) {
        self.cursor.reset();
    }

    /// Process a winit window event. Returns true if it was a pointer event.
    pub fn handle_event(&self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position.x, position.y);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_left();
                true
            }
            _ => false,
        }
    }
}
