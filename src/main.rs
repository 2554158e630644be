// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

mod api;

fn main() {
    dotenv::dotenv().ok();
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Failed to init the logger");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            api::fetch_students,
            api::get_student,
            api::submit_student,
            api::delete_student,
            api::pick_image,
            api::upload_image,
            api::visible_notifications
        ])
        .setup(|app| {
            let handle = app.handle();
            api::setup(handle)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .unwrap();

    app.run(|_, _| {});
}
