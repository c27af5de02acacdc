use crate::coords::Viewport;

/// One pending frame handed out by [`RedrawGate::take_redraw`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RedrawRequest {
    /// Viewport to draw into.
    pub viewport: Viewport,

    /// Loop iterations observed when the frame was taken.
    pub frame_count: u64,
}

/// Viewport tracking plus a dirty flag.
///
/// Starts dirty so the first iteration of the loop produces a frame.
#[derive(Debug, Clone)]
pub struct RedrawGate {
    viewport: Viewport,
    dirty: bool,
    frame_count: u64,
    resize_count: u64,
}

impl RedrawGate {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            dirty: true,
            frame_count: 0,
            resize_count: 0,
        }
    }

    /// Records a framebuffer resize and schedules a redraw.
    ///
    /// Reporting the current size again still schedules a redraw: the
    /// platform only sends this when the surface contents are stale.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.resize_count = self.resize_count.wrapping_add(1);
        self.dirty = true;
        log::info!("Width: {width} Height: {height}");
    }

    /// Schedules a redraw without touching the viewport.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Counts one event-loop iteration.
    pub fn tick(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dirty and drawable: a redraw request would produce a frame.
    pub fn wants_redraw(&self) -> bool {
        self.dirty && self.viewport.is_drawable()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn resize_count(&self) -> u64 {
        self.resize_count
    }

    /// Clears the dirty flag and returns the frame to draw, if any.
    ///
    /// A zero-area viewport leaves the flag set so the frame is drawn once the
    /// window becomes visible again.
    pub fn take_redraw(&mut self) -> Option<RedrawRequest> {
        if !self.dirty {
            return None;
        }
        if !self.viewport.is_drawable() {
            log::trace!("redraw deferred: viewport {:?} is empty", self.viewport);
            return None;
        }

        self.dirty = false;
        Some(RedrawRequest {
            viewport: self.viewport,
            frame_count: self.frame_count,
        })
    }
}
