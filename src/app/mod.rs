use std::path::PathBuf;
use std::time::Duration;

use eframe::egui::{Context, Rect, Vec2};

use crate::config::Config;
use crate::topology::TopologyClient;

mod connect;
mod export;
mod graph;
mod render_utils;
mod session;
mod ui;

use export::ExportState;
use session::{CredentialForm, Session};

pub struct TopologyViewerApp {
    client: TopologyClient,
    export_dir: PathBuf,
    model: ViewModel,
}

struct ViewModel {
    session: Session,
    pan: Vec2,
    zoom: f32,
    fitted_revision: u64,
    fit_requested: bool,
    canvas_rect: Option<Rect>,
    export: ExportState,
    status_line: Option<String>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

impl TopologyViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &Config, client: TopologyClient) -> Self {
        Self {
            client,
            export_dir: config.export_dir.clone(),
            model: ViewModel::new(Session::new(CredentialForm::from_config(config))),
        }
    }
}

impl eframe::App for TopologyViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.model.session.poll() {
            self.model.fit_requested = true;
            self.model.status_line = None;
        }

        if self.model.session.flow.is_pending() || self.model.is_export_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.model.handle_screenshot_events(ctx, &self.export_dir);
        self.model.show(ctx, &self.client);
    }
}

impl ViewModel {
    fn new(session: Session) -> Self {
        Self {
            session,
            pan: Vec2::ZERO,
            zoom: 1.0,
            fitted_revision: 0,
            fit_requested: false,
            canvas_rect: None,
            export: ExportState::Idle,
            status_line: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }
}
