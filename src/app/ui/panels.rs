use eframe::egui::{self, Align, Context, Layout};

use crate::topology::TopologyClient;

use super::super::ViewModel;
use super::super::session::ConnectionStatus;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context, client: &TopologyClient) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::TopBottomPanel::bottom("legend")
            .resizable(false)
            .show(ctx, |ui| self.draw_legend(ui));

        let snapshot = self.session.store.current();
        if self.session.selection.is_open() && self.session.selection.resolve(snapshot).is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        if self.session.dialog_open {
            self.draw_connect_dialog(ctx, client);
        }
    }

    fn draw_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("vCenter Topology");
            ui.separator();

            match self.session.status() {
                ConnectionStatus::Connected => {
                    if let Some(host) = self.session.connected_host() {
                        ui.label(format!("host: {host}"));
                    }
                }
                ConnectionStatus::Connecting => {
                    ui.spinner();
                    ui.label("connecting...");
                }
                ConnectionStatus::Disconnected => {
                    ui.label("not connected");
                }
            }

            let snapshot = self.session.store.current();
            ui.label(format!("nodes: {}", snapshot.node_count()));
            ui.label(format!("edges: {}", snapshot.edge_count()));
            ui.separator();

            ui.add(
                egui::TextEdit::singleline(&mut self.session.search)
                    .hint_text("Search by name or type")
                    .desired_width(220.0),
            )
            .on_hover_text("Shows matching nodes and every edge attached to them.");
            if !self.session.search.is_empty() && ui.small_button("x").clicked() {
                self.session.search.clear();
            }

            if ui.button("Fit view").clicked() {
                self.fit_requested = true;
            }
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }

            let export_button = ui
                .add_enabled(self.can_export(), egui::Button::new("Export PNG"))
                .on_hover_text("Save the diagram as currently shown.");
            if export_button.clicked() {
                self.request_export(ui.ctx());
            }

            if ui.button("Reconnect").clicked() {
                self.session.reopen_dialog();
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if let Some(status_line) = &self.status_line {
                    ui.label(status_line.as_str());
                    ui.separator();
                }
                if !self.session.store.current().is_empty() {
                    ui.label(self.visible_graph_text());
                }
            });
        });
    }

    pub(in crate::app) fn visible_graph_text(&self) -> String {
        format!(
            "visible graph: {} nodes / {} edges",
            self.visible_node_count, self.visible_edge_count
        )
    }
}
