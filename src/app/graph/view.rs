use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontId, Rect, Sense, Shape, Stroke, StrokeKind, Ui, vec2,
};

use crate::topology::filter_topology;
use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::{
    COMPUTE_EDGE_COLOR, STORAGE_EDGE_COLOR, blend_color, dim_color, draw_background, edge_visible,
    fit_transform, kind_color, world_to_screen,
};
use super::build::Scene;

const FIT_MARGIN: f32 = 48.0;
const CARD_FILL: Color32 = Color32::from_rgb(33, 39, 48);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_rect = Some(rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let snapshot = self.session.store.current();
        let filtered = filter_topology(snapshot, &self.session.search);
        let scene = Scene::build(snapshot, &filtered);

        let revision = self.session.store.revision();
        if self.fit_requested || self.fitted_revision != revision {
            if let Some(bounds) = scene.bounds() {
                let (pan, zoom) = fit_transform(bounds, rect, FIT_MARGIN);
                self.pan = pan;
                self.zoom = zoom;
            }
            self.fitted_revision = revision;
            self.fit_requested = false;
        }

        let pan = self.pan;
        let zoom = self.zoom;
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, pan, zoom);

        self.visible_node_count = scene.nodes.len();
        self.visible_edge_count = scene.edges.len();

        if snapshot.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No topology loaded",
                FontId::proportional(16.0),
                Color32::from_gray(160),
            );
            return;
        }

        if scene.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                format!("No nodes match \"{}\"", self.session.search),
                FontId::proportional(16.0),
                Color32::from_gray(160),
            );
        }

        let screen_rects = scene
            .nodes
            .iter()
            .map(|scene_node| {
                let screen = Rect::from_min_max(
                    world_to_screen(rect, pan, zoom, scene_node.world_rect.min.to_vec2()),
                    world_to_screen(rect, pan, zoom, scene_node.world_rect.max.to_vec2()),
                );
                screen.intersects(rect).then_some(screen)
            })
            .collect::<Vec<_>>();

        let hovered = Self::hovered_index(rect, &response, &screen_rects);
        if hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let pending_selection = if response.clicked_by(egui::PointerButton::Primary) {
            Some(hovered.map(|index| scene.nodes[index].node.id.clone()))
        } else {
            None
        };

        let selected_id = self.session.selection.selected_id();
        let line_width = (1.6 * zoom.sqrt()).clamp(0.8, 3.2);

        for scene_edge in &scene.edges {
            let start = world_to_screen(rect, pan, zoom, scene_edge.start);
            let end = world_to_screen(rect, pan, zoom, scene_edge.end);
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let touches_selection = selected_id.is_some_and(|id| {
                scene_edge.edge.source == id || scene_edge.edge.target == id
            });
            let partially_hidden = !(scene_edge.source_visible && scene_edge.target_visible);

            let storage = scene_edge.edge.relationship.is_storage();
            let mut color = if storage {
                STORAGE_EDGE_COLOR
            } else {
                COMPUTE_EDGE_COLOR
            };
            if touches_selection {
                color = blend_color(color, SELECTED_COLOR, 0.65);
            } else if partially_hidden {
                color = dim_color(color, 0.5);
            }
            let width = if touches_selection {
                line_width * 1.8
            } else {
                line_width
            };
            let stroke = Stroke::new(width, color);

            if storage {
                let dash = (9.0 * zoom).clamp(3.0, 14.0);
                painter.extend(Shape::dashed_line(&[start, end], stroke, dash, dash * 0.6));
            } else {
                painter.line_segment([start, end], stroke);
            }

            for (anchor, visible) in [
                (start, scene_edge.source_visible),
                (end, scene_edge.target_visible),
            ] {
                if !visible {
                    painter.circle_stroke(anchor, (5.0 * zoom).clamp(2.5, 7.0), stroke);
                }
            }
        }

        let corner = CornerRadius::same((6.0 * zoom).clamp(1.0, 10.0) as u8);
        let show_text = zoom > 0.3;
        let font_size = (13.0 * zoom).clamp(8.0, 20.0);

        for (index, scene_node) in scene.nodes.iter().enumerate() {
            let Some(card) = screen_rects[index] else {
                continue;
            };

            let node = scene_node.node;
            let is_selected = selected_id == Some(node.id.as_str());
            let is_hovered = hovered == Some(index);
            let accent = kind_color(&node.kind);

            let fill = if is_hovered {
                blend_color(CARD_FILL, accent, 0.18)
            } else {
                CARD_FILL
            };
            painter.rect_filled(card, corner, fill);

            let band = Rect::from_min_size(card.min, vec2((6.0 * zoom).max(2.0), card.height()));
            painter.rect_filled(band, corner, accent);

            let (border_width, border_color) = if is_selected {
                (2.6, SELECTED_COLOR)
            } else if is_hovered {
                (1.8, accent)
            } else {
                (1.0, dim_color(accent, 0.7))
            };
            painter.rect_stroke(
                card,
                corner,
                Stroke::new(border_width, border_color),
                StrokeKind::Inside,
            );

            if !show_text {
                continue;
            }

            let mut text_left = band.right() + 8.0 * zoom;
            if let Some(badge) = node.kind.badge() {
                let badge_rect = painter.text(
                    egui::pos2(text_left, card.center().y),
                    Align2::LEFT_CENTER,
                    badge,
                    FontId::monospace(font_size * 0.8),
                    accent,
                );
                text_left = badge_rect.right() + 6.0 * zoom;
            }

            painter.text(
                egui::pos2(text_left, card.center().y),
                Align2::LEFT_CENTER,
                truncate_label(node.display_name(), 18),
                FontId::proportional(font_size),
                Color32::from_gray(236),
            );
        }

        if let Some(index) = hovered {
            let node = scene.nodes[index].node;
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}  |  {}", node.display_name(), node.kind.label(), node.id),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(selected) = pending_selection {
            self.apply_graph_selection(selected);
        }
    }
}
