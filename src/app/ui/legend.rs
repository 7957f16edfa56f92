use eframe::egui::{Color32, Sense, Shape, Stroke, Ui, vec2};

use crate::topology::NodeKind;

use super::super::ViewModel;
use super::super::render_utils::{COMPUTE_EDGE_COLOR, STORAGE_EDGE_COLOR, kind_color};

const LEGEND_KINDS: [NodeKind; 4] = [
    NodeKind::Vm,
    NodeKind::Host,
    NodeKind::Datastore,
    NodeKind::StoragePod,
];

impl ViewModel {
    pub(in crate::app) fn draw_legend(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            for kind in &LEGEND_KINDS {
                let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, kind_color(kind));
                ui.label(kind.label());
                ui.add_space(8.0);
            }

            ui.separator();
            edge_swatch(ui, COMPUTE_EDGE_COLOR, false);
            ui.label("compute");
            edge_swatch(ui, STORAGE_EDGE_COLOR, true);
            ui.label("storage");
            ui.separator();
            ui.weak("Drag to pan, scroll to zoom, click a node for details.");
        });
    }
}

fn edge_swatch(ui: &mut Ui, color: Color32, dashed: bool) {
    let (rect, _) = ui.allocate_exact_size(vec2(28.0, 12.0), Sense::hover());
    let points = [rect.left_center(), rect.right_center()];
    let stroke = Stroke::new(2.0, color);

    if dashed {
        ui.painter().extend(Shape::dashed_line(&points, stroke, 5.0, 3.0));
    } else {
        ui.painter().line_segment(points, stroke);
    }
}
