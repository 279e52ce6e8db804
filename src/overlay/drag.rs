use crate::host::UiSurface;

/// Pointer-driven repositioning of a panel. Pure UI state; it never touches
/// flight data and does not interact with the refresh timer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelDrag {
    active: Option<DragOrigin>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer: (f64, f64),
    panel: (f64, f64),
}

impl PanelDrag {
    pub fn new() -> Self { Self::default() }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool { self.active.is_some() }

    /// Mouse down on the panel at `pointer` while its top-left corner sits at `panel`.
    pub fn press(&mut self, pointer: (f64, f64), panel: (f64, f64)) {
        self.active = Some(DragOrigin { pointer, panel });
    }

    /// Panel position for the pointer at `pointer`, `None` unless a drag is in progress.
    pub fn track(&self, pointer: (f64, f64)) -> Option<(f64, f64)> {
        let origin = self.active?;
        Some((origin.panel.0 + pointer.0 - origin.pointer.0, origin.panel.1 + pointer.1 - origin.pointer.1))
    }

    /// Moves panel `id` along with the pointer; `false` if nothing moved.
    pub fn drag_to<U: UiSurface + ?Sized>(&self, ui: &U, id: &str, pointer: (f64, f64)) -> bool {
        self.track(pointer).is_some_and(|(left, top)| ui.move_panel(id, left, top))
    }

    pub fn release(&mut self) { self.active = None; }
}
