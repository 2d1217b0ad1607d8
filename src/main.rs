//! mapster-render — Headless-Renderer.
//!
//! Baut für jede Karte eines Daten-Verzeichnisses beide Komposite
//! (GM- und Spieler-Ansicht) und schreibt sie als PNG. Nützlich zum
//! Prüfen von Maske, Raster und Skalierung ohne Fenster-Host.
//!
//! Aufruf: `mapster-render <datenverzeichnis> [ausgabeverzeichnis] [karten-id]`

use std::path::PathBuf;

use anyhow::Context;
use mapster::{FsHost, MapSession, SessionIntent};

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("mapster-render v{} startet...", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let root = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "renders".to_string()));
    let only_map = args.next();

    let host = FsHost::new(&root)
        .with_context(|| format!("Datenverzeichnis '{}' nicht nutzbar", root.display()))?;
    let mut session = MapSession::new(host).context("Sitzung konnte nicht starten")?;

    let ids: Vec<String> = session
        .state()
        .maps
        .iter()
        .map(|m| m.id.clone())
        .filter(|id| only_map.as_deref().map(|m| m == id).unwrap_or(true))
        .collect();
    if ids.is_empty() {
        anyhow::bail!("keine passende Karte in '{}'", root.display());
    }

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Ausgabeverzeichnis '{}' nicht anlegbar", out_dir.display()))?;

    for id in &ids {
        session
            .handle_intent(SessionIntent::MapSelected { id: id.clone() })
            .with_context(|| format!("Karte '{}' nicht auswählbar", id))?;

        let output = session
            .render()
            .with_context(|| format!("Karte '{}' nicht renderbar", id))?;

        let control_path = out_dir.join(format!("{}_control.png", id));
        let display_path = out_dir.join(format!("{}_display.png", id));
        output
            .control
            .save(&control_path)
            .with_context(|| format!("'{}' nicht schreibbar", control_path.display()))?;
        output
            .display
            .save(&display_path)
            .with_context(|| format!("'{}' nicht schreibbar", display_path.display()))?;

        log::info!(
            "Karte '{}' gerendert: {}x{} Control, {}x{} Display",
            id,
            output.control.width(),
            output.control.height(),
            output.display.width(),
            output.display.height()
        );
    }

    log::info!("Fertig: {} Karte(n) nach '{}'", ids.len(), out_dir.display());
    Ok(())
}
