// SPDX-License-Identifier: MPL-2.0
use image_rs::{Rgba, RgbaImage};
use std::time::Duration;
use testimonial_editor::config::Config;
use testimonial_editor::diagnostics::{
    DiagnosticEventKind, DiagnosticsCollector, EditorOperation, JournalCapacity, UserAction,
};
use testimonial_editor::domain::editing::{AdjustmentField, Brightness, FilterKind};
use testimonial_editor::editor::{EditLabel, SessionHandle, Tool};
use testimonial_editor::error::Error;
use testimonial_editor::media::{encode, ImageSource, PercentPoint};
use testimonial_editor::notifications::{Severity, LOAD_STAGE, STAGE_ARG};

const DEBOUNCE_MS: u64 = 100;

fn handle() -> SessionHandle {
    let mut config = Config::default();
    config.adjustments.commit_debounce_ms = DEBOUNCE_MS;
    SessionHandle::from_config(&config)
}

fn png(width: u32, height: u32) -> ImageSource {
    let image = RgbaImage::from_pixel(width, height, Rgba([80, 90, 100, 255]));
    ImageSource::Bytes(encode::encode_mime(&image, "image/png", 1.0).expect("png encoding"))
}

async fn loaded() -> SessionHandle {
    let handle = handle();
    handle.load(png(16, 12)).await.expect("load should succeed");
    handle
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS * 5)).await;
}

#[tokio::test]
async fn slider_drag_records_one_trailing_commit() {
    let handle = loaded().await;
    for value in [105.0, 115.0, 125.0] {
        handle
            .slider_changed(AdjustmentField::Brightness(value))
            .await
            .expect("preview should render");
    }

    assert!(handle.has_pending_commit());
    {
        let session = handle.lock().await;
        assert_eq!(session.history().len(), 1);
        assert!(session.preview().is_some());
    }

    settle().await;

    assert!(!handle.has_pending_commit());
    let session = handle.lock().await;
    assert_eq!(session.history().len(), 2);
    let entry = session.history().current().expect("commit recorded");
    assert_eq!(entry.params.brightness, Brightness::new(125.0));
    assert!(session.preview().is_none());
}

#[tokio::test]
async fn stroke_during_slider_drag_leaves_no_duplicate_commit() {
    let handle = loaded().await;
    handle.set_tool(Tool::Draw).await;
    handle
        .slider_changed(AdjustmentField::Brightness(140.0))
        .await
        .expect("preview should render");
    {
        let mut session = handle.lock().await;
        session.pointer_down(PercentPoint::new(10.0, 10.0));
        session.pointer_up(PercentPoint::new(60.0, 10.0));
    }

    settle().await;

    assert!(!handle.has_pending_commit());
    let session = handle.lock().await;
    let labels: Vec<_> = session.history().iter().map(|entry| entry.label).collect();
    assert_eq!(labels, [EditLabel::Load, EditLabel::Adjust, EditLabel::Stroke]);
    assert!(session.params().is_neutral());
}

#[tokio::test]
async fn slider_before_load_fails() {
    let handle = handle();
    let result = handle
        .slider_changed(AdjustmentField::Brightness(120.0))
        .await;
    assert!(matches!(result, Err(Error::NoImageLoaded)));
    assert!(!handle.has_pending_commit());
}

#[tokio::test]
async fn tool_switch_drops_pending_commit() {
    let handle = loaded().await;
    handle
        .slider_changed(AdjustmentField::Contrast(140.0))
        .await
        .expect("preview should render");

    handle.set_tool(Tool::Crop).await;
    assert!(!handle.has_pending_commit());

    settle().await;

    let session = handle.lock().await;
    assert_eq!(session.history().len(), 1);
    assert!(session.params().is_neutral());
    assert_eq!(session.tool(), Tool::Crop);
}

#[tokio::test]
async fn flush_commits_immediately() {
    let handle = loaded().await;
    assert!(!handle.flush().await.expect("nothing pending"));

    handle
        .slider_changed(AdjustmentField::Saturation(40.0))
        .await
        .expect("preview should render");
    assert!(handle.flush().await.expect("flush should commit"));
    assert!(!handle.has_pending_commit());
    assert_eq!(handle.lock().await.history().len(), 2);

    settle().await;
    assert_eq!(handle.lock().await.history().len(), 2);
}

#[tokio::test]
async fn undo_after_commit_restores_load_state() {
    let handle = loaded().await;
    handle
        .slider_changed(AdjustmentField::Brightness(130.0))
        .await
        .expect("preview should render");
    handle.flush().await.expect("flush should commit");

    assert!(handle.undo().await);
    assert!(handle.lock().await.params().is_neutral());
    assert!(!handle.undo().await);
    assert!(handle.redo().await);
    assert_eq!(
        handle.lock().await.params().brightness,
        Brightness::new(130.0)
    );
}

#[tokio::test]
async fn save_commits_pending_change_and_encodes() {
    let handle = loaded().await;
    handle
        .slider_changed(AdjustmentField::Brightness(140.0))
        .await
        .expect("preview should render");

    let bytes = handle
        .save_image("image/png", 1.0)
        .await
        .expect("export should succeed");

    let exported = image_rs::load_from_memory(&bytes)
        .expect("exported bytes should decode")
        .to_rgba8();
    assert_eq!(exported.dimensions(), (16, 12));
    assert!(exported.get_pixel(0, 0)[0] > 80);
    assert_eq!(handle.lock().await.history().len(), 2);
}

#[tokio::test]
async fn unsupported_export_format_is_notified() {
    let handle = loaded().await;
    assert!(handle.save_image("image/tiff", 1.0).await.is_none());

    let notifications = handle.notifications();
    assert!(notifications.contains_key("error-unsupported-format"));
    assert!(notifications
        .visible()
        .all(|n| n.severity() == Severity::Error));
}

#[tokio::test]
async fn failed_load_is_notified_then_cleared() {
    let handle = loaded().await;
    let result = handle
        .load(ImageSource::Bytes(b"definitely not an image".to_vec()))
        .await;
    assert!(result.is_err());
    assert!(handle.lock().await.is_loaded());
    {
        let notifications = handle.notifications();
        let failure = notifications.visible().next().expect("load failure shown");
        assert_eq!(failure.arg(STAGE_ARG), Some(LOAD_STAGE));
    }

    handle.load(png(4, 4)).await.expect("load should succeed");
    assert!(!handle.notifications().has_notifications());
    assert_eq!(handle.lock().await.display_size(), (4, 4));
}

#[tokio::test]
async fn degraded_filter_warns_once() {
    let handle = loaded().await;
    for _ in 0..2 {
        handle
            .slider_changed(AdjustmentField::Filter(FilterKind::Unsupported))
            .await
            .expect("preview should render");
    }
    handle.cancel_pending();

    let notifications = handle.notifications();
    let warnings: Vec<_> = notifications
        .visible()
        .filter(|n| n.message_key() == "warning-filter-degraded")
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity(), Severity::Warning);
}

#[tokio::test]
async fn activity_reaches_the_diagnostics_journal() {
    let mut collector = DiagnosticsCollector::new(JournalCapacity::default());
    let handle = handle().with_diagnostics(collector.handle());

    handle.load(png(8, 8)).await.expect("load should succeed");
    handle
        .slider_changed(AdjustmentField::Brightness(110.0))
        .await
        .expect("preview should render");
    handle.flush().await.expect("flush should commit");
    handle.save_image("image/png", 1.0).await.expect("export");

    collector.process_pending();
    let kinds: Vec<_> = collector.iter().map(|event| &event.kind).collect();
    assert!(kinds.iter().any(|kind| matches!(
        kind,
        DiagnosticEventKind::UserAction {
            action: UserAction::LoadImage { source },
            ..
        } if source == "bytes"
    )));
    assert!(kinds.iter().any(|kind| matches!(
        kind,
        DiagnosticEventKind::Operation {
            operation: EditorOperation::Render { .. }
        }
    )));
    assert!(kinds.iter().any(|kind| matches!(
        kind,
        DiagnosticEventKind::Operation {
            operation: EditorOperation::Export { format, .. }
        } if format == "image/png"
    )));
}

#[tokio::test]
async fn close_releases_the_image() {
    let handle = loaded().await;
    handle
        .slider_changed(AdjustmentField::Zoom(150.0))
        .await
        .expect("preview should render");
    handle.close().await;

    assert!(!handle.has_pending_commit());
    let session = handle.lock().await;
    assert!(!session.is_loaded());
    assert!(session.history().is_empty());
}
