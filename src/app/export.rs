use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, Result, anyhow};
use eframe::egui::{self, ColorImage, Context, Rect};
use tracing::{info, warn};

use super::ViewModel;

const SCREENSHOT_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) enum ExportState {
    Idle,
    Awaiting { region: Rect, requested_at: Instant },
}

pub(super) fn export_path(dir: &Path, unix_secs: u64) -> PathBuf {
    dir.join(format!("vcenter-topology-{unix_secs}.png"))
}

pub(super) fn save_png(captured: &ColorImage, path: &Path) -> Result<()> {
    let [width, height] = captured.size;
    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, captured.as_raw().to_vec())
        .ok_or_else(|| anyhow!("captured image has an unexpected pixel buffer size"))?;

    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn capture_to_file(
    screenshot: &ColorImage,
    region: Rect,
    pixels_per_point: f32,
    dir: &Path,
) -> Result<PathBuf> {
    let cropped = screenshot.region(&region, Some(pixels_per_point));
    let unix_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let path = export_path(dir, unix_secs);

    save_png(&cropped, &path)?;
    Ok(path)
}

impl ViewModel {
    pub(super) fn can_export(&self) -> bool {
        matches!(self.export, ExportState::Idle)
            && self.canvas_rect.is_some()
            && !self.session.store.current().is_empty()
    }

    /// Captures the canvas as currently drawn, so the image shows the
    /// filtered view rather than the whole snapshot.
    pub(super) fn request_export(&mut self, ctx: &Context) {
        let Some(region) = self.canvas_rect else {
            return;
        };

        self.export = ExportState::Awaiting {
            region,
            requested_at: Instant::now(),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    pub(super) fn is_export_pending(&self) -> bool {
        matches!(self.export, ExportState::Awaiting { .. })
    }

    /// Gives up on a screenshot the backend never delivered.
    fn expire_export(&mut self, now: Instant) {
        let ExportState::Awaiting { requested_at, .. } = self.export else {
            return;
        };
        if now.saturating_duration_since(requested_at) >= SCREENSHOT_TIMEOUT {
            warn!("no screenshot arrived for image export");
            self.export = ExportState::Idle;
            self.status_line = Some("Export failed: no screenshot was captured".to_owned());
        }
    }

    pub(super) fn handle_screenshot_events(&mut self, ctx: &Context, export_dir: &Path) {
        let ExportState::Awaiting { region, .. } = self.export else {
            return;
        };

        let screenshot: Option<Arc<ColorImage>> = ctx.input(|input| {
            input.raw.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                _ => None,
            })
        });
        let Some(screenshot) = screenshot else {
            self.expire_export(Instant::now());
            return;
        };

        self.export = ExportState::Idle;
        match capture_to_file(&screenshot, region, ctx.pixels_per_point(), export_dir) {
            Ok(path) => {
                info!(path = %path.display(), "exported topology image");
                self.status_line = Some(format!("Exported {}", path.display()));
            }
            Err(error) => {
                warn!("image export failed: {error:#}");
                self.status_line = Some(format!("Export failed: {error:#}"));
            }
        }
    }
}
