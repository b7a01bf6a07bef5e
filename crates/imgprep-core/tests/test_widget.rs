mod common;

use std::cell::RefCell;
use std::rc::Rc;

use image::DynamicImage;

use imgprep_core::cropper::{CropSettings, CropperState};
use imgprep_core::error::{ErrorKind, PrepError};
use imgprep_core::file::{ImageFile, ImageMime};
use imgprep_core::pipeline::{process, ProcessedImage};
use imgprep_core::widget::{
    ImageWidget, Selection, SessionState, WidgetConfig, WidgetObserver, WidgetRegistry,
};

use common::{gradient, jpeg_file, png_file};

#[derive(Default)]
struct Log {
    states: Vec<(SessionState, SessionState)>,
    errors: Vec<String>,
    successes: Vec<String>,
    cancels: usize,
    attempts: usize,
}

struct Recorder(Rc<RefCell<Log>>);

impl WidgetObserver for Recorder {
    fn on_state_change(&self, from: SessionState, to: SessionState) {
        self.0.borrow_mut().states.push((from, to));
    }
    fn on_error(&self, error: &PrepError) {
        self.0.borrow_mut().errors.push(error.to_string());
    }
    fn on_success(&self, processed: &ProcessedImage) {
        self.0.borrow_mut().successes.push(processed.file.name.clone());
    }
    fn on_cancel(&self) {
        self.0.borrow_mut().cancels += 1;
    }
    fn on_attempt(&self, _attempt: u32, _quality: f32, _bytes: u64) {
        self.0.borrow_mut().attempts += 1;
    }
}

fn recorded(field: &str, config: WidgetConfig) -> (ImageWidget, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let widget = ImageWidget::new(field, config)
        .unwrap()
        .with_observer(Recorder(Rc::clone(&log)));
    (widget, log)
}

fn square_auto() -> WidgetConfig {
    WidgetConfig {
        crop: CropSettings::with_ratio(1.0, 800),
        ..WidgetConfig::default()
    }
}

fn photo() -> ImageFile {
    jpeg_file("holiday.jpeg", &gradient(640, 480), 90)
}

fn garbage() -> ImageFile {
    ImageFile::new("corrupt.jpg", "image/jpeg", vec![0u8; 64])
}

#[test]
fn test_auto_crop_large_jpeg_to_square() {
    let (mut widget, log) = recorded("avatar", square_auto());
    let file = jpeg_file("camera.jpg", &gradient(3000, 2000), 85);

    let selection = widget.on_user_select(file).unwrap();

    let Selection::Processed(processed) = selection else {
        panic!("expected the auto path to finish");
    };
    assert_eq!((processed.width, processed.height), (800, 800));
    assert_eq!(processed.file.mime(), Some(ImageMime::Jpeg));
    assert_eq!(common::decode_dimensions(&processed.file), (800, 800));
    assert_eq!(widget.state(), SessionState::Done);
    assert_eq!(
        widget.input().current().unwrap().file.name,
        processed.file.name
    );

    let log = log.borrow();
    assert_eq!(
        log.states,
        vec![
            (SessionState::Idle, SessionState::Validating),
            (SessionState::Validating, SessionState::AutoProcessing),
            (SessionState::AutoProcessing, SessionState::Compressing),
            (SessionState::Compressing, SessionState::Done),
        ]
    );
    assert_eq!(log.successes, vec!["camera.jpg".to_string()]);
    assert!(log.attempts >= 1);
}

#[test]
fn test_free_form_passes_whole_image() {
    let mut widget = ImageWidget::new("upload", WidgetConfig::free_form()).unwrap();
    let Selection::Processed(processed) = widget.on_user_select(photo()).unwrap() else {
        panic!("expected the auto path to finish");
    };
    assert_eq!((processed.width, processed.height), (640, 480));
    assert_eq!(processed.file.name, "holiday.jpg");
    assert!(processed.stats.original_size > 0);
}

#[test]
fn test_disallowed_type_is_a_validation_error() {
    let (mut widget, log) = recorded("avatar", square_auto());
    let file = ImageFile::new("drawing.bmp", "image/bmp", vec![0u8; 32]);

    let err = widget.on_user_select(file).unwrap_err();

    assert!(matches!(err, PrepError::UnsupportedType { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(widget.state(), SessionState::Errored);
    assert!(widget.last_error().unwrap().contains("image/bmp"));
    assert!(!widget.input().has_file());
    assert_eq!(log.borrow().errors.len(), 1);
}

#[test]
fn test_oversize_source_is_rejected_before_decode() {
    let config = WidgetConfig {
        max_source_bytes: 16,
        ..WidgetConfig::default()
    };
    let mut widget = ImageWidget::new("upload", config).unwrap();

    let err = widget.on_user_select(photo()).unwrap_err();
    assert!(matches!(err, PrepError::FileTooLarge { limit: 16, .. }));
}

#[test]
fn test_failure_keeps_previous_file_and_allows_retry() {
    let (mut widget, log) = recorded("upload", WidgetConfig::free_form());
    widget.on_user_select(photo()).unwrap();
    let committed = widget.input().current().unwrap().file.clone();

    let err = widget.on_user_select(garbage()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(widget.state(), SessionState::Errored);
    assert_eq!(widget.input().current().unwrap().file, committed);

    let retry = jpeg_file("second.png", &gradient(100, 80), 90);
    assert!(matches!(
        widget.on_user_select(retry).unwrap(),
        Selection::Processed(_)
    ));
    assert_eq!(widget.state(), SessionState::Done);
    assert_eq!(widget.input().current().unwrap().file.name, "second.jpg");
    assert!(widget.last_error().is_none());
    assert_eq!(log.borrow().errors.len(), 1);
}

#[test]
fn test_committed_output_is_not_reprocessed() {
    let (mut widget, log) = recorded("upload", WidgetConfig::free_form());
    widget.on_user_select(photo()).unwrap();
    let output = widget.input().current().unwrap().file.clone();
    let transitions = log.borrow().states.len();

    let selection = widget.on_user_select(output).unwrap();

    assert!(matches!(selection, Selection::AlreadyProcessed));
    assert_eq!(widget.state(), SessionState::Done);
    assert_eq!(log.borrow().states.len(), transitions);
    assert_eq!(log.borrow().successes.len(), 1);
}

#[test]
fn test_submitted_committed_output_starts_no_job() {
    let (mut widget, log) = recorded("upload", square_auto());
    widget.on_user_select(photo()).unwrap();
    let output = widget.input().current().unwrap().file.clone();
    let transitions = log.borrow().states.len();

    assert!(!widget.submit(output).unwrap());

    assert!(!widget.is_busy());
    assert_eq!(widget.state(), SessionState::Done);
    assert!(widget.wait().is_none());
    assert_eq!(log.borrow().states.len(), transitions);
    assert_eq!(log.borrow().successes.len(), 1);
}

#[test]
fn test_interactive_widget_rejects_submit() {
    let (mut widget, log) = recorded("avatar", WidgetConfig::profile());

    let err = widget.submit(photo()).unwrap_err();

    assert!(matches!(err, PrepError::InvalidState(_)));
    assert_eq!(widget.state(), SessionState::Idle);
    assert!(!widget.is_busy());
    assert!(log.borrow().states.is_empty());
    assert_eq!(log.borrow().errors.len(), 1);
}

#[test]
fn test_extreme_ratio_auto_crop_keeps_one_pixel() {
    let config = WidgetConfig {
        crop: CropSettings::with_ratio(300.0, 800),
        ..WidgetConfig::default()
    };
    let file = png_file("strip.png", DynamicImage::ImageRgb8(gradient(100, 100)));

    let processed = process(file, &config).unwrap();

    assert_eq!((processed.width, processed.height), (100, 1));
}

#[test]
fn test_interactive_crop_then_confirm() {
    let (mut widget, log) = recorded("avatar", WidgetConfig::profile());
    let file = jpeg_file("me.jpg", &gradient(1600, 1200), 90);

    assert!(matches!(
        widget.on_user_select(file).unwrap(),
        Selection::Editing
    ));
    assert_eq!(widget.state(), SessionState::Editing);
    assert_eq!(widget.cropper().state(), CropperState::Loaded);

    let cropper = widget.cropper_mut();
    cropper.pointer_down(400.0, 300.0);
    cropper.pointer_move(300.0, 300.0);
    cropper.pointer_up();

    let processed = widget.confirm_crop().unwrap();

    assert_eq!((processed.width, processed.height), (800, 800));
    assert_eq!(widget.state(), SessionState::Done);
    assert_eq!(widget.cropper().state(), CropperState::Closed);
    assert_eq!(widget.input().current().unwrap().file.name, "me.jpg");

    let states = log.borrow().states.iter().map(|(_, to)| *to).collect::<Vec<_>>();
    assert_eq!(
        states,
        vec![
            SessionState::Validating,
            SessionState::Editing,
            SessionState::Compressing,
            SessionState::Done,
        ]
    );
}

#[test]
fn test_cancel_crop_leaves_input_untouched() {
    let (mut widget, log) = recorded("cover", WidgetConfig::cover());
    widget
        .on_user_select(jpeg_file("banner.jpg", &gradient(1600, 900), 90))
        .unwrap();

    assert!(widget.cancel_crop());

    assert_eq!(widget.state(), SessionState::Idle);
    assert!(!widget.input().has_file());
    assert_eq!(widget.cropper().state(), CropperState::Closed);
    assert_eq!(log.borrow().cancels, 1);
    assert!(!widget.cancel_crop());
}

#[test]
fn test_new_selection_while_editing_replaces_session() {
    let (mut widget, log) = recorded("avatar", WidgetConfig::profile());
    widget
        .on_user_select(jpeg_file("a.jpg", &gradient(800, 600), 90))
        .unwrap();
    widget
        .on_user_select(jpeg_file("b.jpg", &gradient(1000, 500), 90))
        .unwrap();

    assert_eq!(widget.state(), SessionState::Editing);
    assert_eq!(widget.cropper().source().unwrap().file.name, "b.jpg");
    assert_eq!(log.borrow().cancels, 1);
}

#[test]
fn test_confirm_outside_editing_is_rejected() {
    let mut widget = ImageWidget::new("avatar", WidgetConfig::profile()).unwrap();
    assert!(matches!(
        widget.confirm_crop(),
        Err(PrepError::InvalidState(_))
    ));
    assert_eq!(widget.state(), SessionState::Idle);
}

#[test]
fn test_background_job_blocks_new_selection() {
    let (mut widget, log) = recorded("upload", square_auto());
    assert!(widget.submit(photo()).unwrap());
    assert!(widget.is_busy());

    let err = widget.on_user_select(photo()).unwrap_err();
    assert!(matches!(err, PrepError::SessionBusy));
    assert!(matches!(widget.submit(photo()), Err(PrepError::SessionBusy)));

    let processed = widget.wait().unwrap().unwrap();
    assert_eq!((processed.width, processed.height), (480, 480));
    assert_eq!(widget.state(), SessionState::Done);
    assert!(!widget.is_busy());
    assert!(widget.input().has_file());
    assert!(log.borrow().attempts >= 1);
    assert!(widget.wait().is_none());
}

#[test]
fn test_poll_delivers_result() {
    let mut widget = ImageWidget::new("upload", WidgetConfig::free_form()).unwrap();
    widget.submit(photo()).unwrap();

    let outcome = loop {
        if let Some(outcome) = widget.poll() {
            break outcome;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    };

    assert!(outcome.is_ok());
    assert_eq!(widget.state(), SessionState::Done);
}

#[test]
fn test_background_failure_is_reported() {
    let (mut widget, log) = recorded("upload", WidgetConfig::free_form());
    widget.submit(garbage()).unwrap();

    let err = widget.wait().unwrap().unwrap_err();
    assert!(matches!(err, PrepError::Decode(_)));
    assert_eq!(widget.state(), SessionState::Errored);
    assert_eq!(log.borrow().errors.len(), 1);
}

#[test]
fn test_reset_abandons_background_job() {
    let (mut widget, log) = recorded("upload", WidgetConfig::free_form());
    widget.submit(photo()).unwrap();

    widget.reset();

    assert_eq!(widget.state(), SessionState::Idle);
    assert!(!widget.is_busy());
    assert!(!widget.input().has_file());
    assert!(widget.poll().is_none());
    assert_eq!(log.borrow().cancels, 1);
}

#[test]
fn test_host_commit_from_idle() {
    let mut widget = ImageWidget::new("upload", WidgetConfig::free_form()).unwrap();
    let processed = process(photo(), &WidgetConfig::free_form()).unwrap();

    widget.commit_result(processed);

    assert_eq!(widget.state(), SessionState::Done);
    assert_eq!(widget.input().current().unwrap().file.name, "holiday.jpg");
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = WidgetConfig {
        allowed_types: vec!["image/tiff".into()],
        ..WidgetConfig::default()
    };
    assert!(matches!(
        ImageWidget::new("upload", config),
        Err(PrepError::InvalidConfig(_))
    ));
}

#[test]
fn test_registry_binds_explicit_ids() {
    let mut registry = WidgetRegistry::new();
    registry
        .register("profile-pic", "avatar", WidgetConfig::profile())
        .unwrap();
    registry
        .register("cover-pic", "cover", WidgetConfig::cover())
        .unwrap();

    assert!(matches!(
        registry.register("cover-pic", "cover", WidgetConfig::cover()),
        Err(PrepError::InvalidState(_))
    ));
    assert_eq!(registry.ids(), vec!["cover-pic", "profile-pic"]);
    assert_eq!(
        registry.get("profile-pic").unwrap().input().field_name(),
        "avatar"
    );

    let widget = registry.get_mut("cover-pic").unwrap();
    widget
        .on_user_select(jpeg_file("sky.jpg", &gradient(1200, 600), 90))
        .unwrap();
    assert_eq!(widget.state(), SessionState::Editing);

    let removed = registry.remove("cover-pic").unwrap();
    assert_eq!(removed.state(), SessionState::Idle);
    assert_eq!(registry.len(), 1);
    assert!(registry.get("cover-pic").is_none());
}
