use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::brush::BrushConfig;
use crate::canvas_texture::CanvasTexture;
use crate::engine::{Engine, EngineSettings};
use crate::input::{PointerAdapter, PointerTracker, SurfaceViewport};
use crate::panels::{central_panel, tools_panel};
use crate::surface::RasterSurface;

pub const DEFAULT_CANVAS_SIZE: [usize; 2] = [1024, 768];

/// What survives a restart.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct CanvasPrefs {
    pub brush: BrushConfig,
    pub canvas_size: [usize; 2],
}

impl Default for CanvasPrefs {
    fn default() -> Self {
        Self {
            brush: BrushConfig::default(),
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }
}

/// One engine bound to one canvas, with brush controls on the left
pub struct CanvasApp {
    pub(crate) prefs: CanvasPrefs,
    pub(crate) engine: Engine,
    pub(crate) adapter: PointerAdapter,
    pub(crate) tracker: PointerTracker,
    pub(crate) texture: CanvasTexture,
    /// Last configuration problem, shown in the tool panel
    pub(crate) status: Option<String>,
}

impl Default for CanvasApp {
    fn default() -> Self {
        Self::from_prefs(CanvasPrefs::default())
    }
}

impl CanvasApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let prefs = cc
            .storage
            .and_then(|storage| eframe::get_value::<CanvasPrefs>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::from_prefs(prefs)
    }

    pub fn from_prefs(mut prefs: CanvasPrefs) -> Self {
        let [width, height] = prefs.canvas_size;
        let settings = EngineSettings {
            background: Color32::WHITE,
            ..Default::default()
        };
        let mut engine = Engine::with_settings(RasterSurface::filled(width, height, Color32::WHITE), settings);
        let mut status = None;
        if let Err(e) = engine.configure(prefs.brush.clone()) {
            log::warn!("Stored brush could not be restored: {}", e);
            prefs.brush = engine.config();
            status = Some(e.to_string());
        }
        Self {
            adapter: PointerAdapter::new(SurfaceViewport::unscaled(egui::Pos2::ZERO, prefs.canvas_size)),
            prefs,
            engine,
            tracker: PointerTracker::new(),
            texture: CanvasTexture::new("museo_canvas"),
            status,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Push the brush edited in the tool panel into the engine
    pub(crate) fn apply_brush(&mut self) {
        match self.engine.configure(self.prefs.brush.clone()) {
            Ok(()) => {
                self.prefs.brush = self.engine.config();
                self.status = None;
            }
            Err(e) => {
                // Keep the panel showing what the engine actually uses
                self.prefs.brush = self.engine.config();
                self.status = Some(e.to_string());
            }
        }
    }
}

impl eframe::App for CanvasApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.prefs);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
