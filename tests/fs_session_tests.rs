//! Session-Flüsse gegen den echten Dateisystem-Host.

use std::path::PathBuf;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use mapster::{
    FsHost, MapSession, MouseButton, SessionIntent, Tool, FOG_HIDDEN, FOG_REVEALED,
};

fn with_temp_root(name: &str) -> PathBuf {
    let tmp = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(tmp.join("maps")).unwrap();
    tmp
}

fn write_map(root: &PathBuf, id: &str, width: u32, height: u32) {
    let white = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    white
        .save(root.join("maps").join(format!("{}.png", id)))
        .unwrap();
}

#[test]
fn test_session_start_writes_config_files() {
    let tmp = with_temp_root("mapster_fs_session_start");
    write_map(&tmp, "krypta", 32, 32);
    write_map(&tmp, "moor", 32, 32);

    let host = FsHost::new(&tmp).unwrap();
    let _session = MapSession::new(host).expect("Session sollte starten");

    assert!(tmp.join("config").join("krypta.json").exists());
    assert!(tmp.join("config").join("moor.json").exists());

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_erase_commit_writes_fogmap_png() {
    let tmp = with_temp_root("mapster_fs_session_erase");
    write_map(&tmp, "karte", 64, 64);

    let host = FsHost::new(&tmp).unwrap();
    let mut session = MapSession::new(host).expect("Session sollte starten");
    session.render().expect("Render sollte gelingen");

    session
        .handle_intent(SessionIntent::ToolToggled {
            tool: Tool::Erase,
            active: true,
        })
        .unwrap();
    for (x, y) in [(10.0, 10.0), (40.0, 10.0), (40.0, 40.0), (10.0, 40.0)] {
        session
            .handle_intent(SessionIntent::MapClicked {
                pos: Vec2::new(x, y),
                button: MouseButton::Left,
            })
            .unwrap();
    }
    session
        .handle_intent(SessionIntent::MapClicked {
            pos: Vec2::new(10.0, 40.0),
            button: MouseButton::Right,
        })
        .unwrap();

    let mask_path = tmp.join("config").join("fogmaps").join("karte.png");
    assert!(mask_path.exists());

    let mask = image::open(&mask_path).unwrap().to_luma8();
    assert_eq!(mask.get_pixel(20, 20)[0], FOG_REVEALED);
    assert_eq!(mask.get_pixel(5, 5)[0], FOG_HIDDEN);

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_mask_survives_session_restart() {
    let tmp = with_temp_root("mapster_fs_session_restart");
    write_map(&tmp, "karte", 48, 48);

    {
        let host = FsHost::new(&tmp).unwrap();
        let mut session = MapSession::new(host).expect("Session sollte starten");
        session
            .handle_intent(SessionIntent::ClearFogRequested)
            .unwrap();
    }

    // Neue Sitzung: die aufgedeckte Maske wird übernommen
    let host = FsHost::new(&tmp).unwrap();
    let mut session = MapSession::new(host).expect("Session sollte starten");
    let output = session.render().expect("Render sollte gelingen");

    // Ohne Nebel bleibt die weiße Basis in beiden Ansichten sichtbar
    assert_eq!(output.control.get_pixel(24, 24)[0], 255);
    assert_eq!(output.display.get_pixel(24, 24)[0], 255);

    let _ = std::fs::remove_dir_all(&tmp);
}
