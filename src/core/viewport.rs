//! Scroll-Synchronisation zwischen Control- und Display-Viewport.
//!
//! Positionen werden als Bruchteil des maximalen Scrollbereichs
//! geführt und sind damit unabhängig von Zoom und Fenstergröße.
//! Drei Modi steuern die Kopplung: Normal (Control treibt Display),
//! Locked (Control-Scrollen wird verschluckt) und Elastic (Display
//! ist entkoppelt; ein temporärer Umweg aus Locked heraus).

/// Kennung eines Viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportKind {
    /// GM-Fenster (treibende Ansicht)
    Control,
    /// Spieler-Fenster (getriebene Ansicht)
    Display,
}

/// Anzeige-Modus des Display-Viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Control-Scrollen wird sofort propagiert
    #[default]
    Normal,
    /// Control-Scrollen wird verschluckt, Display bleibt stehen
    Locked,
    /// Display entkoppelt; behält die Position vom Elastic-Eintritt
    Elastic,
}

/// Absolute Scroll-Position und -Bereich eines Viewports (Pixel).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Vertikale Position
    pub v_value: f32,
    /// Horizontale Position
    pub h_value: f32,
    /// Vertikales Maximum (0 = nichts zu scrollen)
    pub v_max: f32,
    /// Horizontales Maximum
    pub h_max: f32,
}

impl ScrollState {
    /// Aktuelle Position als Bruchteil des Maximums.
    ///
    /// Bei leerem Scrollbereich liefert die Achse 0.0; das ist der
    /// vereinbarte Degenerat-Fall, kein Fehler.
    pub fn fraction(&self) -> (f32, f32) {
        let v = if self.v_max > 0.0 {
            self.v_value / self.v_max
        } else {
            0.0
        };
        let h = if self.h_max > 0.0 {
            self.h_value / self.h_max
        } else {
            0.0
        };
        (v, h)
    }

    /// Setzt die Position aus einem Bruchteil-Paar.
    pub fn set_fraction(&mut self, (v_pcnt, h_pcnt): (f32, f32)) {
        self.v_value = (v_pcnt * self.v_max).clamp(0.0, self.v_max.max(0.0));
        self.h_value = (h_pcnt * self.h_max).clamp(0.0, self.h_max.max(0.0));
    }

    /// Aktualisiert den Scrollbereich und klemmt die Position hinein.
    pub fn set_range(&mut self, v_max: f32, h_max: f32) {
        self.v_max = v_max.max(0.0);
        self.h_max = h_max.max(0.0);
        self.v_value = self.v_value.clamp(0.0, self.v_max);
        self.h_value = self.h_value.clamp(0.0, self.h_max);
    }
}

/// Synchronisation der beiden Viewports unter den drei Anzeige-Modi.
#[derive(Debug, Clone, Default)]
pub struct ViewportSync {
    /// Scroll-Zustand des GM-Fensters
    pub control: ScrollState,
    /// Scroll-Zustand des Spieler-Fensters
    pub display: ScrollState,
    mode: DisplayMode,
    /// Control-Position beim Elastic-Eintritt (absolut)
    pre_elastic: Option<(f32, f32)>,
}

impl ViewportSync {
    /// Erstellt einen Sync im Normal-Modus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktueller Anzeige-Modus.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Scroll-Zustand eines Viewports.
    pub fn state(&self, viewport: ViewportKind) -> &ScrollState {
        match viewport {
            ViewportKind::Control => &self.control,
            ViewportKind::Display => &self.display,
        }
    }

    /// Scroll-Bruchteil eines Viewports.
    pub fn fraction(&self, viewport: ViewportKind) -> (f32, f32) {
        self.state(viewport).fraction()
    }

    /// Ob ein Wheel-Event auf dem Control-Viewport scrollen darf.
    /// Im Locked-Modus wird es komplett verschluckt.
    pub fn wheel_allowed(&self) -> bool {
        self.mode != DisplayMode::Locked
    }

    /// Verarbeitet eine neue Control-Position (nach einem Wheel-Event).
    /// Propagiert nur im Normal-Modus; Elastic lässt das Display stehen.
    pub fn scroll_control(&mut self, v_value: f32, h_value: f32) {
        if !self.wheel_allowed() {
            return;
        }
        self.control.v_value = v_value.clamp(0.0, self.control.v_max);
        self.control.h_value = h_value.clamp(0.0, self.control.h_max);

        if self.mode == DisplayMode::Normal {
            self.propagate();
        }
    }

    /// Bildet den Control-Bruchteil auf den absoluten Display-Bereich ab.
    pub fn propagate(&mut self) {
        let fraction = self.control.fraction();
        self.display.set_fraction(fraction);
    }

    /// Wendet einen persistierten Control-Bruchteil an und propagiert,
    /// sofern das Display nicht elastisch entkoppelt ist.
    pub fn apply_persisted(&mut self, fraction: (f32, f32)) {
        self.control.set_fraction(fraction);
        if self.mode != DisplayMode::Elastic {
            self.propagate();
        }
    }

    /// Schaltet den Locked-Modus.
    ///
    /// Eintritt während Elastic beendet Elastic zuerst (stellt die
    /// Position vom Eintritt wieder her); der Aufrufer lädt danach die
    /// persistierten Bruchteile nach.
    pub fn set_locked(&mut self, active: bool) {
        if active {
            if self.mode == DisplayMode::Elastic {
                self.exit_elastic();
            }
            self.mode = DisplayMode::Locked;
        } else if self.mode == DisplayMode::Locked {
            self.mode = DisplayMode::Normal;
        }
    }

    /// Schaltet den Elastic-Modus.
    ///
    /// Eintritt merkt sich die absolute Control-Position und hebt
    /// Locked auf. Austritt stellt sie wieder her, propagiert und
    /// aktiviert Locked: Elastic ist ein temporärer Umweg, kein
    /// eigenständiger Dauerzustand.
    pub fn set_elastic(&mut self, active: bool) {
        if active {
            if self.mode == DisplayMode::Elastic {
                return;
            }
            self.pre_elastic = Some((self.control.v_value, self.control.h_value));
            self.mode = DisplayMode::Elastic;
        } else if self.mode == DisplayMode::Elastic {
            self.exit_elastic();
            self.mode = DisplayMode::Locked;
        }
    }

    /// Stellt die Control-Position vom Elastic-Eintritt wieder her
    /// und propagiert sie auf das Display.
    fn exit_elastic(&mut self) {
        if let Some((v, h)) = self.pre_elastic.take() {
            self.control.v_value = v.clamp(0.0, self.control.v_max);
            self.control.h_value = h.clamp(0.0, self.control.h_max);
        }
        self.propagate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sync_with_ranges() -> ViewportSync {
        let mut sync = ViewportSync::new();
        sync.control.set_range(1000.0, 1000.0);
        sync.display.set_range(500.0, 500.0);
        sync
    }

    #[test]
    fn test_fraction_is_zero_for_empty_scroll_range() {
        let state = ScrollState::default();
        assert_eq!(state.fraction(), (0.0, 0.0));
    }

    #[test]
    fn test_normal_mode_propagates_wheel_scroll() {
        let mut sync = sync_with_ranges();
        sync.scroll_control(500.0, 250.0);

        assert_relative_eq!(sync.display.v_value, 250.0);
        assert_relative_eq!(sync.display.h_value, 125.0);
    }

    #[test]
    fn test_locked_mode_swallows_wheel_entirely() {
        let mut sync = sync_with_ranges();
        sync.scroll_control(100.0, 100.0);
        sync.set_locked(true);

        assert!(!sync.wheel_allowed());
        sync.scroll_control(900.0, 900.0);

        // Weder Control noch Display bewegen sich
        assert_relative_eq!(sync.control.v_value, 100.0);
        assert_relative_eq!(sync.display.v_value, 50.0);
    }

    #[test]
    fn test_elastic_decouples_display_and_exit_restores() {
        let mut sync = sync_with_ranges();

        // Eintritt bei Bruchteil (0.3, 0.4)
        sync.scroll_control(300.0, 400.0);
        sync.set_elastic(true);
        assert_eq!(sync.mode(), DisplayMode::Elastic);

        // Control weiterscrollen: Display bleibt stehen
        sync.scroll_control(900.0, 900.0);
        assert_relative_eq!(sync.display.v_value, 150.0);
        assert_relative_eq!(sync.display.h_value, 200.0);

        // Austritt: Control restauriert, Display propagiert, Modus Locked
        sync.set_elastic(false);
        assert_relative_eq!(sync.control.fraction().0, 0.3);
        assert_relative_eq!(sync.control.fraction().1, 0.4);
        assert_relative_eq!(sync.display.v_value, 150.0);
        assert_relative_eq!(sync.display.h_value, 200.0);
        assert_eq!(sync.mode(), DisplayMode::Locked);
    }

    #[test]
    fn test_locking_while_elastic_exits_elastic_first() {
        let mut sync = sync_with_ranges();
        sync.scroll_control(200.0, 200.0);
        sync.set_elastic(true);
        sync.scroll_control(800.0, 800.0);

        sync.set_locked(true);

        assert_eq!(sync.mode(), DisplayMode::Locked);
        assert_relative_eq!(sync.control.v_value, 200.0);
        assert_relative_eq!(sync.display.v_value, 100.0);
    }

    #[test]
    fn test_unlock_returns_to_normal() {
        let mut sync = sync_with_ranges();
        sync.set_locked(true);
        sync.set_locked(false);
        assert_eq!(sync.mode(), DisplayMode::Normal);
    }

    #[test]
    fn test_apply_persisted_skips_propagation_while_elastic() {
        let mut sync = sync_with_ranges();
        sync.set_elastic(true);
        sync.apply_persisted((0.5, 0.5));

        assert_relative_eq!(sync.control.v_value, 500.0);
        assert_relative_eq!(sync.display.v_value, 0.0);
    }

    #[test]
    fn test_set_range_clamps_current_value() {
        let mut state = ScrollState {
            v_value: 800.0,
            h_value: 800.0,
            v_max: 1000.0,
            h_max: 1000.0,
        };
        state.set_range(400.0, 400.0);
        assert_relative_eq!(state.v_value, 400.0);
        assert_relative_eq!(state.h_value, 400.0);
    }
}
