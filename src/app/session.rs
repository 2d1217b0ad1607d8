//! Session-Orchestrierung: Zustandsmaschine über Werkzeug und Anzeige-Modus.
//!
//! Der Host liefert diskrete Ereignisse ([`SessionIntent`]); die Session
//! mutiert Maske, Config und Scroll-Zustand und baut auf Anfrage die
//! beiden Komposite. Jedes Ereignis wird vollständig verarbeitet,
//! bevor das nächste akzeptiert wird — nebenläufige Edits gibt es nicht.

use glam::Vec2;
use image::{imageops, RgbaImage};

use super::events::{MouseButton, SessionIntent};
use super::state::{SessionState, Tool, ViewportGeometry};
use crate::core::{
    compose, draw_polygon_outline, render_grid_with_alpha, DisplayMode, FogMask, MapConfig,
    ViewportKind, FOG_HIDDEN, FOG_REVEALED,
};
use crate::host::Host;
use crate::shared::options::{POLYGON_OUTLINE_COLOR, POLYGON_OUTLINE_WIDTH};
use crate::shared::{Result, ViewerError, ViewerOptions};

/// Ergebnis eines Render-Durchlaufs: beide Ansichten, bereits auf
/// Anzeige-Größe skaliert.
pub struct RenderOutput {
    /// GM-Ansicht (ungedimmter Nebel, Polygon-Umriss)
    pub control: RgbaImage,
    /// Spieler-Ansicht (gedimmter Nebel)
    pub display: RgbaImage,
}

/// Orchestrator einer Viewer-Sitzung.
pub struct MapSession<H: Host> {
    host: H,
    state: SessionState,
    /// Basiskarte der aktiven Map (lazy geladen)
    base_cache: Option<RgbaImage>,
    /// Fog-Maske der aktiven Map (lazy geladen)
    fog: Option<FogMask>,
    /// Frisch geladene Config: der nächste Render übernimmt deren
    /// Scroll-Bruchteil, sobald die Scrollbereiche bekannt sind.
    /// Dazwischen bleibt die Live-Position (z.B. vom Wheel) erhalten.
    scroll_reload_pending: bool,
}

impl<H: Host> MapSession<H> {
    /// Startet eine Sitzung mit Standard-Optionen.
    pub fn new(host: H) -> Result<Self> {
        Self::with_options(host, ViewerOptions::default())
    }

    /// Startet eine Sitzung: enumeriert die Karten und legt für jede
    /// beim ersten Kontakt eine Standard-Konfiguration an.
    pub fn with_options(mut host: H, options: ViewerOptions) -> Result<Self> {
        let maps = host.enumerate_maps()?;
        log::info!("Sitzung gestartet mit {} Karten", maps.len());

        let ids: Vec<String> = maps.iter().map(|m| m.id.clone()).collect();
        for id in &ids {
            MapConfig::load_or_init(&mut host, id)?;
        }

        let mut state = SessionState::new(maps, options);
        if let Some(map) = state.current_map() {
            let id = map.id.clone();
            state.config = MapConfig::load_or_init(&mut host, &id)?;
        }

        Ok(Self {
            host,
            state,
            base_cache: None,
            fog: None,
            scroll_reload_pending: true,
        })
    }

    // ── Abfragen ────────────────────────────────────────────────────

    /// Lesender Zugriff auf den Sitzungszustand.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Lesender Zugriff auf den Host (z.B. für Persistenz-Prüfungen).
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Konfiguration der aktiven Karte.
    pub fn config(&self) -> &MapConfig {
        &self.state.config
    }

    /// Aktueller Anzeige-Modus.
    pub fn mode(&self) -> DisplayMode {
        self.state.sync.mode()
    }

    /// Ob der Host ein Wheel-Event auf dem Control-Viewport ausführen
    /// darf. Im Locked-Modus wird es verschluckt.
    pub fn wheel_allowed(&self) -> bool {
        self.state.sync.wheel_allowed()
    }

    /// Absolute Scroll-Position, die der Host anwenden soll.
    pub fn scroll_position(&self, viewport: ViewportKind) -> (f32, f32) {
        let scroll = self.state.sync.state(viewport);
        (scroll.v_value, scroll.h_value)
    }

    // ── Ereignisverarbeitung ────────────────────────────────────────

    /// Verarbeitet ein Host-Ereignis vollständig.
    pub fn handle_intent(&mut self, intent: SessionIntent) -> Result<()> {
        match intent {
            SessionIntent::ToolToggled { tool, active } => self.toggle_tool(tool, active),
            SessionIntent::MapClicked { pos, button } => self.map_clicked(pos, button),
            SessionIntent::WheelScrolled { v_value, h_value } => {
                self.state.sync.scroll_control(v_value, h_value);
                Ok(())
            }
            SessionIntent::ViewportResized {
                viewport,
                width,
                height,
            } => self.viewport_resized(viewport, width, height),
            SessionIntent::MapSelected { id } => self.select_map(&id),
            SessionIntent::GridToggled => {
                self.save_scroll()?;
                self.state.grid_shown = !self.state.grid_shown;
                Ok(())
            }
            SessionIntent::ClearFogRequested => self.reset_fog(FOG_REVEALED),
            SessionIntent::ResetFogRequested => self.reset_fog(FOG_HIDDEN),
            SessionIntent::EscapePressed => self.save_scroll(),
            SessionIntent::LockToggled { active } => self.toggle_lock(active),
            SessionIntent::ElasticToggled { active } => {
                self.state.sync.set_elastic(active);
                Ok(())
            }
        }
    }

    fn toggle_tool(&mut self, tool: Tool, active: bool) -> Result<()> {
        if active {
            self.activate_tool(tool)
        } else {
            self.deactivate_tool(tool)
        }
    }

    fn activate_tool(&mut self, tool: Tool) -> Result<()> {
        // Masken-Werkzeuge schließen sich gegenseitig aus
        if self.state.tool.active != Some(tool) {
            self.state.tool.clear_clicks();
        }
        self.state.tool.active = Some(tool);

        if tool.is_masking() {
            // Werkzeugnutzung und Locked-Modus vertragen sich nicht:
            // Polygon-Klicks laufen immer im elastischen Modus
            if self.state.sync.mode() != DisplayMode::Elastic {
                self.state.sync.set_elastic(true);
            }
        } else {
            // 5ft-Messung: Klicks werden bei 1:1-Skala gesammelt
            self.state.config.scale_factor = 1.0;
            self.persist_config()?;
        }

        log::debug!("Werkzeug aktiviert: {:?}", tool);
        Ok(())
    }

    fn deactivate_tool(&mut self, tool: Tool) -> Result<()> {
        if self.state.tool.active != Some(tool) {
            return Ok(());
        }

        // Laufendes Polygon wird ohne Anwendung verworfen
        self.state.tool.active = None;
        self.state.tool.clear_clicks();

        if tool.is_masking() {
            self.save_scroll()?;
        }
        log::debug!("Werkzeug deaktiviert: {:?}", tool);
        Ok(())
    }

    fn map_clicked(&mut self, pos: Vec2, button: MouseButton) -> Result<()> {
        match (button, self.state.tool.active) {
            (MouseButton::Left, Some(Tool::SetFiveFootRange)) => self.five_foot_click(pos),
            (MouseButton::Left, Some(tool)) if tool.is_masking() => {
                self.state.tool.pending_polygon.push(pos);
                self.save_scroll()
            }
            (MouseButton::Right, Some(tool))
                if tool.is_masking() && self.state.tool.pending_polygon.len() > 2 =>
            {
                self.commit_polygon(tool)
            }
            _ => Ok(()),
        }
    }

    fn five_foot_click(&mut self, pos: Vec2) -> Result<()> {
        if self.state.tool.clicks_5ft.len() < 2 {
            self.state.tool.clicks_5ft.push(pos);
        }
        if self.state.tool.clicks_5ft.len() < 2 {
            return Ok(());
        }

        let distance = self.state.tool.clicks_5ft[0].distance(self.state.tool.clicks_5ft[1]);
        if distance <= f32::EPSILON {
            // Doppelklick auf denselben Punkt: Messung verwerfen, das
            // Werkzeug bleibt für einen neuen Versuch aktiv
            self.state.tool.clicks_5ft.clear();
            return Err(ViewerError::DegenerateInput(
                "5ft-Messung mit Distanz 0 verworfen".to_string(),
            ));
        }

        let scale_factor = self.state.options.pixels_5ft / distance;
        self.save_scroll()?;
        self.state.config.scale_factor = scale_factor;
        if self.state.control_viewport.width > 0.0 {
            self.state.config.grid_pcnt =
                (distance / self.state.control_viewport.width).min(1.0);
        }
        self.persist_config()?;

        log::info!(
            "5ft-Skala gesetzt: Distanz {:.1} px, scale_factor {:.3}",
            distance,
            scale_factor
        );
        self.state.tool.active = None;
        self.state.tool.clicks_5ft.clear();
        Ok(())
    }

    fn commit_polygon(&mut self, tool: Tool) -> Result<()> {
        let Some(target_alpha) = tool.target_alpha(&self.state.options) else {
            return Ok(());
        };

        self.save_scroll()?;
        self.ensure_map_loaded()?;
        let Some(fog) = self.fog.as_mut() else {
            return Ok(());
        };

        // Klicks liegen im angezeigten Bild, die Maske in nativer
        // Auflösung: vor dem Fill in Masken-Pixel umrechnen
        let (mask_width, _) = fog.dimensions();
        let displayed_width = if self.state.displayed_width > 0.0 {
            self.state.displayed_width
        } else {
            mask_width as f32
        };
        let scale = mask_width as f32 / displayed_width;
        let points: Vec<Vec2> = self
            .state
            .tool
            .pending_polygon
            .iter()
            .map(|p| *p * scale)
            .collect();

        fog.apply_polygon(&points, target_alpha);
        fog.save(&mut self.host)?;
        log::info!(
            "Polygon mit {} Punkten angewendet ({:?}, Alpha {})",
            points.len(),
            tool,
            target_alpha
        );

        self.state.tool.active = None;
        self.state.tool.pending_polygon.clear();
        Ok(())
    }

    fn viewport_resized(
        &mut self,
        viewport: ViewportKind,
        width: f32,
        height: f32,
    ) -> Result<()> {
        self.save_scroll()?;
        let geometry = ViewportGeometry { width, height };
        match viewport {
            ViewportKind::Control => self.state.control_viewport = geometry,
            ViewportKind::Display => self.state.display_viewport = geometry,
        }
        Ok(())
    }

    fn select_map(&mut self, id: &str) -> Result<()> {
        let Some(index) = self.state.maps.iter().position(|m| m.id == id) else {
            return Err(ViewerError::resource(id, "unbekannte Karte"));
        };

        self.save_scroll()?;
        self.state.current_index = index;
        self.state.config = MapConfig::load_or_init(&mut self.host, id)?;
        self.base_cache = None;
        self.fog = None;
        self.scroll_reload_pending = true;
        log::info!("Karte gewechselt: '{}'", id);
        Ok(())
    }

    fn reset_fog(&mut self, target_alpha: u8) -> Result<()> {
        self.ensure_map_loaded()?;
        let Some(fog) = self.fog.as_mut() else {
            return Ok(());
        };
        fog.reset(target_alpha);
        fog.save(&mut self.host)?;
        self.save_scroll()
    }

    fn toggle_lock(&mut self, active: bool) -> Result<()> {
        if active && self.state.sync.mode() == DisplayMode::Elastic {
            // Elastic zuerst beenden (restauriert die Eintrittsposition),
            // dann die restaurierte Position persistieren
            self.state.sync.set_elastic(false);
            self.save_scroll()?;
        }
        self.state.sync.set_locked(active);
        Ok(())
    }

    // ── Rendern ─────────────────────────────────────────────────────

    /// Baut beide Ansichten und aktualisiert die Scroll-Bereiche.
    ///
    /// Ablauf nach jedem zustandsändernden Ereignis: die Handler
    /// sichern den Control-Bruchteil, hier werden die Komposite neu
    /// berechnet und die Scrollbereiche aktualisiert. Wurde zuvor eine
    /// Config geladen (Start, Kartenwechsel, Lock nach Elastic), wird
    /// deren Scroll-Bruchteil einmalig angewendet und (außer im
    /// Elastic-Modus) auf das Display propagiert; ansonsten bleibt die
    /// Live-Scroll-Position unangetastet.
    pub fn render(&mut self) -> Result<RenderOutput> {
        self.ensure_map_loaded()?;
        let (Some(base), Some(fog)) = (self.base_cache.as_ref(), self.fog.as_ref()) else {
            return Err(ViewerError::resource("", "keine Karte geladen"));
        };

        let grid = if self.state.grid_shown {
            match render_grid_with_alpha(
                base.dimensions(),
                self.state.config.grid_pcnt,
                self.state.options.grid_line_alpha,
            ) {
                Ok(grid) => Some(grid),
                Err(e) => {
                    log::warn!("Raster übersprungen: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let gm = compose(
            base,
            fog.mask(),
            grid.as_ref(),
            &self.state.options.gm_profile(),
        );
        let player = compose(
            base,
            fog.mask(),
            grid.as_ref(),
            &self.state.options.player_profile(),
        );

        // Anzeige-Skalierung: fit auf Viewport-Breite, dann 5ft-Skala
        let scale_factor = self.state.config.scale_factor;
        let mut control = scaled_for_viewport(&gm, self.state.control_viewport, scale_factor);
        let display = scaled_for_viewport(&player, self.state.display_viewport, scale_factor);
        self.state.displayed_width = control.width() as f32;

        // Umriss des laufenden Polygons nur in der GM-Ansicht
        let masking_active = self
            .state
            .tool
            .active
            .map(Tool::is_masking)
            .unwrap_or(false);
        if masking_active && !self.state.tool.pending_polygon.is_empty() {
            draw_polygon_outline(
                &mut control,
                &self.state.tool.pending_polygon,
                POLYGON_OUTLINE_COLOR,
                POLYGON_OUTLINE_WIDTH,
            );
        }

        self.update_scroll_ranges(&control, &display);
        if self.scroll_reload_pending {
            let fraction = self.state.config.scroll_fraction();
            self.state.sync.apply_persisted(fraction);
            self.scroll_reload_pending = false;
        }

        Ok(RenderOutput { control, display })
    }

    /// Setzt die Scroll-Maxima aus Bild- und Viewport-Größe.
    fn update_scroll_ranges(&mut self, control: &RgbaImage, display: &RgbaImage) {
        let c = self.state.control_viewport;
        self.state.sync.control.set_range(
            (control.height() as f32 - c.height).max(0.0),
            (control.width() as f32 - c.width).max(0.0),
        );
        let d = self.state.display_viewport;
        self.state.sync.display.set_range(
            (display.height() as f32 - d.height).max(0.0),
            (display.width() as f32 - d.width).max(0.0),
        );
    }

    /// Persistiert den aktuellen Control-Scroll-Bruchteil.
    fn save_scroll(&mut self) -> Result<()> {
        if self.state.current_map().is_none() {
            return Ok(());
        }
        let fraction = self.state.sync.control.fraction();
        self.state.config.set_scroll_fraction(fraction);
        self.persist_config()
    }

    fn persist_config(&mut self) -> Result<()> {
        let Some(map) = self.state.current_map() else {
            return Ok(());
        };
        let id = map.id.clone();
        self.state.config.save(&mut self.host, &id)
    }

    /// Lädt Basiskarte und Fog-Maske der aktiven Karte nach Bedarf.
    fn ensure_map_loaded(&mut self) -> Result<()> {
        let Some(entry) = self.state.current_map().cloned() else {
            return Err(ViewerError::resource("", "keine Karte verfügbar"));
        };

        if self.base_cache.is_none() {
            let image = self.host.load_base_image(&entry)?;
            log::info!(
                "Basiskarte '{}' geladen: {}x{}",
                entry.id,
                image.width(),
                image.height()
            );
            self.base_cache = Some(image);
        }

        if self.fog.is_none() {
            let dimensions = self
                .base_cache
                .as_ref()
                .map(|i| i.dimensions())
                .unwrap_or((0, 0));
            self.fog = Some(FogMask::load(&self.host, &entry.id, dimensions)?);
        }

        Ok(())
    }
}

/// Skaliert ein Komposit auf die Anzeige-Breite eines Viewports:
/// fit auf die Viewport-Breite, multipliziert mit der 5ft-Skala.
/// Ohne bekannte Viewport-Breite dient die native Breite als Basis.
fn scaled_for_viewport(
    image: &RgbaImage,
    viewport: ViewportGeometry,
    scale_factor: f32,
) -> RgbaImage {
    let fit_width = if viewport.width > 0.0 {
        viewport.width
    } else {
        image.width() as f32
    };
    let target_width = (fit_width * scale_factor).round().max(1.0) as u32;

    if target_width == image.width() {
        return image.clone();
    }

    let target_height = ((image.height() as f32 * target_width as f32 / image.width() as f32)
        .round()
        .max(1.0)) as u32;
    imageops::resize(
        image,
        target_width,
        target_height,
        imageops::FilterType::Triangle,
    )
}
