use eframe::egui::{self, RichText, Ui};

use crate::util::humanize_key;

use super::super::ViewModel;
use super::super::render_utils::kind_color;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let mut close_requested = false;

        ui.horizontal(|ui| {
            ui.heading("Details");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    close_requested = true;
                }
            });
        });
        ui.add_space(6.0);

        if close_requested {
            self.session.selection.clear();
            return;
        }

        // A selection left over from a replaced snapshot renders nothing.
        let Some(node) = self.session.selection.resolve(self.session.store.current()) else {
            return;
        };

        ui.label(RichText::new(node.display_name()).strong().size(16.0));
        ui.label(RichText::new(node.kind.label()).color(kind_color(&node.kind)));
        ui.small(node.id.as_str());

        ui.separator();
        ui.label(RichText::new("Attributes").strong());

        if node.attributes.is_empty() {
            ui.label("No attributes reported.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("node_attributes_scroll")
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    egui::Grid::new("node_attributes")
                        .num_columns(2)
                        .striped(true)
                        .spacing([16.0, 6.0])
                        .show(ui, |ui| {
                            for (key, value) in &node.attributes {
                                ui.label(RichText::new(humanize_key(key)).small().weak());
                                ui.label(value.to_string());
                                ui.end_row();
                            }
                        });
                });
        }
    }
}
