use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_dialog::DialogExt;

use config::{AppConfig, UploadBackend};
use err::AppError;
use notify::{Level, Notification, NotificationCenter};
use snapshot::ListState;
use store::StoreClient;
use student::StudentFields;
use upload::{Acquirer, UploadOutcome};

mod config;
mod err;
mod form;
mod notify;
mod snapshot;
mod store;
mod student;
mod upload;

pub struct AppState {
    store: StoreClient,
    list: Mutex<ListState>,
    notifications: Mutex<NotificationCenter>,
    acquirer: Acquirer,
    uploading: AtomicBool,
}

pub fn setup(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    log::info!("record store at {}", config.store_base_url);

    let acquirer = match config.upload_backend {
        UploadBackend::Local => {
            let mut uploads_dir = app.path().data_dir()?;
            uploads_dir.push("com.nhom14.student-manager");
            uploads_dir.push("uploads");
            Acquirer::Local { uploads_dir }
        }
        UploadBackend::Hosted => Acquirer::Hosted {
            http: reqwest::Client::new(),
            endpoint: config
                .upload_endpoint
                .ok_or_else(|| AppError::Config("UPLOAD_ENDPOINT is not set".to_string()))?,
        },
    };

    app.manage(AppState {
        store: StoreClient::new(&config.store_base_url),
        list: Mutex::new(ListState::new()),
        notifications: Mutex::new(NotificationCenter::new()),
        acquirer,
        uploading: AtomicBool::new(false),
    });
    Ok(())
}

/// Push a toast and mirror it to the webview, which renders the queue.
fn notify(app: &AppHandle, state: &AppState, level: Level, title: &str, message: &str) {
    let notification = state
        .notifications
        .lock()
        .expect("Failed to lock the notification queue")
        .push(level, title, message);
    if let Err(err) = app.emit("notification", &notification) {
        log::warn!("failed to emit notification event: {}", err);
    }
}

/// Read-all for the list view. Retrying after a failure re-invokes this
/// same command. Errors are encoded in the returned phase, never in `Err`.
#[tauri::command]
pub async fn fetch_students(state: tauri::State<'_, AppState>) -> Result<ListState, String> {
    state
        .list
        .lock()
        .expect("Failed to lock the list state")
        .begin_fetch();

    let fetched = state.store.list().await;

    let mut list = state.list.lock().expect("Failed to lock the list state");
    match fetched {
        Ok(records) => list.fetch_ok(records),
        Err(err) => {
            log::warn!("fetch students failed: {}", err);
            list.fetch_err("Failed to load students. Please try again later.".to_string());
        }
    }
    Ok(list.clone())
}

/// Read-one for the edit view. A failure leaves the form in its default
/// state behind an error toast.
#[tauri::command]
pub async fn get_student(
    app: AppHandle,
    state: tauri::State<'_, AppState>,
    id: String,
) -> Result<Option<StudentFields>, String> {
    match state.store.get(&id).await {
        Ok(student) => Ok(Some(student.into())),
        Err(err) => {
            log::warn!("get student {} failed: {}", id, err);
            notify(
                &app,
                &state,
                Level::Error,
                "Error",
                "Failed to load student data. Please try again.",
            );
            Ok(None)
        }
    }
}

/// Create (no id) or update (id present). Returns whether the submit
/// settled successfully so the webview knows to navigate back to the list.
#[tauri::command]
pub async fn submit_student(
    app: AppHandle,
    state: tauri::State<'_, AppState>,
    id: Option<String>,
    fields: StudentFields,
) -> Result<bool, String> {
    let mode = form::Mode::from_route(id);
    match form::submit(&state.store, &mode, &fields).await {
        Ok(_) => {
            let (title, message) = form::success_notice(&mode);
            notify(&app, &state, Level::Success, title, message);
            Ok(true)
        }
        // the webview blocks these with required-field semantics already
        Err(AppError::MissingField(name)) => Err(format!("missing required field: {}", name)),
        Err(err) => {
            log::warn!("submit failed: {}", err);
            let (title, message) = form::failure_notice(&mode);
            notify(&app, &state, Level::Error, title, message);
            Ok(false)
        }
    }
}

/// Per-row delete. The snapshot changes only after the response resolves:
/// removal on success, untouched on failure; the row mark clears either way.
#[tauri::command]
pub async fn delete_student(
    app: AppHandle,
    state: tauri::State<'_, AppState>,
    id: String,
) -> Result<ListState, String> {
    {
        let mut list = state.list.lock().expect("Failed to lock the list state");
        if !list.begin_delete(&id) {
            // unknown row or a delete already in flight for it
            return Ok(list.clone());
        }
    }

    let deleted = state.store.delete(&id).await;

    let outcome = {
        let mut list = state.list.lock().expect("Failed to lock the list state");
        match deleted {
            Ok(()) => {
                list.delete_ok(&id);
                Ok(())
            }
            Err(err) => {
                list.delete_err(&id);
                Err(err)
            }
        }
    };

    match outcome {
        Ok(()) => notify(
            &app,
            &state,
            Level::Success,
            "Student deleted",
            "The student has been successfully deleted.",
        ),
        Err(err) => {
            log::warn!("delete student {} failed: {}", id, err);
            notify(
                &app,
                &state,
                Level::Error,
                "Error",
                "Failed to delete student. Please try again.",
            );
        }
    }

    Ok(state
        .list
        .lock()
        .expect("Failed to lock the list state")
        .clone())
}

async fn pick_image_dialog(app: AppHandle) -> Option<PathBuf> {
    let picked_path = Arc::new(Mutex::new(None));
    let picked_path_clone = Arc::clone(&picked_path);

    // the dialog blocks, so it runs on its own task
    let handle = tokio::spawn(async move {
        let selected = app
            .dialog()
            .file()
            .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp", "bmp"])
            .blocking_pick_file();
        let mut path = picked_path_clone
            .lock()
            .expect("Failed to lock picked path when selecting a file");
        *path = selected;
    });

    handle
        .await
        .expect("Failed to await the file picking task");

    let picked = picked_path
        .lock()
        .expect("Failed to lock picked path when getting the value");
    picked
        .as_ref()
        .map(|path| PathBuf::from(path.to_string()))
}

/// File-picker path of image acquisition. `None` url and `None` error
/// means the picker was dismissed.
#[tauri::command]
pub async fn pick_image(
    app: AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<UploadOutcome, String> {
    let path = match pick_image_dialog(app).await {
        Some(path) => path,
        None => {
            return Ok(UploadOutcome {
                url: None,
                error: None,
            })
        }
    };
    acquire(&state, &path).await
}

/// Drag-and-drop path of image acquisition; the webview hands over the
/// dropped file's path.
#[tauri::command]
pub async fn upload_image(
    state: tauri::State<'_, AppState>,
    path: String,
) -> Result<UploadOutcome, String> {
    acquire(&state, Path::new(&path)).await
}

/// Validation failures and acquisition failures both come back as inline
/// messages; they never become toasts and never reach the record store.
async fn acquire(state: &AppState, path: &Path) -> Result<UploadOutcome, String> {
    // the drop target is hidden while uploading, so this only trips when
    // both input paths race
    if state.uploading.swap(true, Ordering::SeqCst) {
        return Ok(UploadOutcome::error("An upload is already in progress"));
    }

    let acquired = state.acquirer.acquire(path).await;
    state.uploading.store(false, Ordering::SeqCst);

    match acquired {
        Ok(url) => Ok(UploadOutcome::url(url)),
        Err(AppError::InvalidImage(message)) => Ok(UploadOutcome::error(message)),
        Err(err) => {
            log::warn!("image acquisition failed: {}", err);
            Ok(UploadOutcome::error(
                "Failed to upload image. Please try again.",
            ))
        }
    }
}

/// The bounded, non-expired window of the toast queue.
#[tauri::command]
pub fn visible_notifications(state: tauri::State<'_, AppState>) -> Vec<Notification> {
    state
        .notifications
        .lock()
        .expect("Failed to lock the notification queue")
        .visible()
}
