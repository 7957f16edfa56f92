use eframe::egui::{self, Color32, Context, Key, RichText};

use crate::topology::TopologyClient;

use super::super::ViewModel;
use super::super::connect::FetchPhase;

impl ViewModel {
    pub(in crate::app) fn draw_connect_dialog(&mut self, ctx: &Context, client: &TopologyClient) {
        let pending = self.session.flow.phase() == FetchPhase::Pending;
        let can_dismiss = self.session.connected_host().is_some() && !pending;
        let mut submit = false;
        let mut dismiss = false;

        let modal = egui::Modal::new(egui::Id::new("connect_dialog")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.heading("Connect to vCenter");
            ui.small(format!("Topology server: {}", client.endpoint()));
            ui.add_space(8.0);

            let form = &mut self.session.form;
            egui::Grid::new("credential_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Host");
                    ui.add_enabled(
                        !pending,
                        egui::TextEdit::singleline(&mut form.host).hint_text("vcenter.example.com"),
                    );
                    ui.end_row();

                    ui.label("Username");
                    ui.add_enabled(
                        !pending,
                        egui::TextEdit::singleline(&mut form.username)
                            .hint_text("administrator@vsphere.local"),
                    );
                    ui.end_row();

                    ui.label("Password");
                    let password = ui.add_enabled(
                        !pending,
                        egui::TextEdit::singleline(&mut form.password).password(true),
                    );
                    if password.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();

                    ui.label("Port");
                    ui.add_enabled(
                        !pending,
                        egui::DragValue::new(&mut form.port).range(1..=u16::MAX),
                    );
                    ui.end_row();
                });

            if let Some(notice) = &self.session.notice {
                ui.add_space(6.0);
                ui.label(RichText::new(notice.as_str()).color(Color32::from_rgb(240, 110, 100)));
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(!pending, egui::Button::new("Connect")).clicked() {
                    submit = true;
                }
                if can_dismiss && ui.button("Cancel").clicked() {
                    dismiss = true;
                }
                if pending {
                    ui.spinner();
                    ui.label("Connecting...");
                }
            });
        });

        if modal.should_close() {
            dismiss = true;
        }

        if submit && !pending {
            self.session.submit(client);
        } else if dismiss && can_dismiss {
            self.session.dismiss_dialog();
        }
    }
}
