use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 4.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
            || response.dragged_by(egui::PointerButton::Primary)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Topmost card under the pointer. Panels and the modal drawn over the
    /// canvas block hovering.
    pub(in crate::app) fn hovered_index(
        rect: Rect,
        response: &egui::Response,
        screen_rects: &[Option<Rect>],
    ) -> Option<usize> {
        let pointer = response.hover_pos().filter(|pointer| rect.contains(*pointer))?;
        topmost_card_at(pointer, screen_rects)
    }

    pub(in crate::app) fn apply_graph_selection(&mut self, selected: Option<String>) {
        match selected {
            Some(node_id) => self.session.selection.select(node_id),
            None => self.session.selection.clear(),
        }
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.pan = eframe::egui::Vec2::ZERO;
        self.zoom = 1.0;
    }
}

// Cards later in draw order win.
fn topmost_card_at(pointer: Pos2, screen_rects: &[Option<Rect>]) -> Option<usize> {
    screen_rects
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, rect)| rect.filter(|rect| rect.contains(pointer)).map(|_| index))
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn overlapping_cards_pick_the_last_drawn() {
        let rects = [
            Some(Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 50.0))),
            None,
            Some(Rect::from_min_size(pos2(50.0, 20.0), vec2(100.0, 50.0))),
        ];

        assert_eq!(topmost_card_at(pos2(60.0, 30.0), &rects), Some(2));
        assert_eq!(topmost_card_at(pos2(10.0, 10.0), &rects), Some(0));
        assert_eq!(topmost_card_at(pos2(300.0, 300.0), &rects), None);
    }
}
