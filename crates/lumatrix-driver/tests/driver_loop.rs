//! End-to-end checks of the render worker's frame choreography against a
//! recording panel sink.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use lumatrix_color::Rgb565;
use lumatrix_driver::font::{FONT_LED_5X3, PixelFont};
use lumatrix_driver::{PanelSink, RenderDriver, TextSlot, TextSource};
use lumatrix_pattern::{GridSize, PatternHandle, PlasmaPattern};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Clear,
    Swap,
    Brightness(u8),
    Pixel(i32, i32),
    Text(String),
}

#[derive(Clone)]
struct RecordingPanel {
    events: Arc<Mutex<Vec<Event>>>,
    brightness: u8,
    font: &'static PixelFont,
}

impl RecordingPanel {
    fn new() -> (Self, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let panel =
            Self { events: Arc::clone(&events), brightness: 0, font: &FONT_LED_5X3 };
        (panel, events)
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl PanelSink for RecordingPanel {
    fn clear(&mut self) {
        self.push(Event::Clear);
    }

    fn draw_pixel(&mut self, x: i32, y: i32, _color: Rgb565) {
        self.push(Event::Pixel(x, y));
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        self.push(Event::Brightness(brightness));
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn is_double_buffered(&self) -> bool {
        true
    }

    fn swap_buffers(&mut self) {
        self.push(Event::Swap);
    }

    fn refresh_rate_hz(&self) -> u32 {
        1000
    }

    fn font(&self) -> &'static PixelFont {
        self.font
    }

    fn set_font(&mut self, font: &'static PixelFont) {
        self.font = font;
    }

    // record the string rather than rasterizing it
    fn print_text(&mut self, text: &str, _x: i32, _y: i32, _color: Rgb565) {
        self.push(Event::Text(text.to_string()));
    }
}

struct ScriptedText {
    changed: bool,
    a: String,
    b: String,
}

impl ScriptedText {
    fn silent() -> Self {
        Self { changed: false, a: String::new(), b: String::new() }
    }

    fn once(a: &str, b: &str) -> Self {
        Self { changed: true, a: a.to_string(), b: b.to_string() }
    }
}

impl TextSource for ScriptedText {
    fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    fn field_a(&self) -> String {
        self.a.clone()
    }

    fn field_b(&self) -> String {
        self.b.clone()
    }
}

fn test_pattern() -> PatternHandle {
    PatternHandle::new(PlasmaPattern::with_size(GridSize::new(4, 4), Some(1)))
}

fn snapshot(events: &Arc<Mutex<Vec<Event>>>) -> Vec<Event> {
    events.lock().unwrap().clone()
}

#[test]
fn swap_then_clear_precede_the_first_draw() {
    let (panel, events) = RecordingPanel::new();
    let driver = RenderDriver::spawn(50, panel, Some(test_pattern()), ScriptedText::silent());
    driver.resume();
    thread::sleep(Duration::from_millis(250));
    driver.pause();
    thread::sleep(Duration::from_millis(100));

    let log = snapshot(&events);
    let first_pixel = log
        .iter()
        .position(|e| matches!(e, Event::Pixel(..)))
        .expect("no cells drawn");
    let swap_before = log[..first_pixel].iter().rposition(|e| *e == Event::Swap);
    let swap_before = swap_before.expect("no buffer swap before first draw");
    // the back buffer is cleared between the swap and the draw
    assert!(
        log[swap_before..first_pixel].contains(&Event::Clear),
        "no clear between swap and draw"
    );
}

#[test]
fn pause_blanks_both_buffers_at_zero_brightness() {
    let (panel, events) = RecordingPanel::new();
    let driver = RenderDriver::spawn(50, panel, Some(test_pattern()), ScriptedText::silent());
    driver.resume();
    thread::sleep(Duration::from_millis(150));
    driver.pause();
    thread::sleep(Duration::from_millis(400));

    let log = snapshot(&events);
    let off = log
        .iter()
        .rposition(|e| *e == Event::Brightness(0))
        .expect("brightness never dropped to zero");
    // clear, flip it visible, clear the other buffer, then idle
    assert_eq!(&log[off + 1..], &[Event::Clear, Event::Swap, Event::Clear]);
    drop(driver);
}

#[test]
fn resume_restores_brightness_before_drawing() {
    let (panel, events) = RecordingPanel::new();
    let driver = RenderDriver::spawn(50, panel, Some(test_pattern()), ScriptedText::silent());
    driver.set_panel_brightness(100);
    driver.resume();
    thread::sleep(Duration::from_millis(250));
    driver.pause();
    thread::sleep(Duration::from_millis(100));

    let log = snapshot(&events);
    let first_pixel = log
        .iter()
        .position(|e| matches!(e, Event::Pixel(..)))
        .expect("no cells drawn");
    let last_brightness = log[..first_pixel]
        .iter()
        .rev()
        .find_map(|e| match e {
            Event::Brightness(b) => Some(*b),
            _ => None,
        })
        .expect("brightness never set before drawing");
    assert_eq!(last_brightness, 100);
}

#[test]
fn missing_pattern_skips_the_iteration() {
    let (panel, events) = RecordingPanel::new();
    let driver = RenderDriver::spawn(50, panel, None, ScriptedText::silent());
    driver.resume();
    thread::sleep(Duration::from_millis(150));

    let log = snapshot(&events);
    assert!(!log.iter().any(|e| matches!(e, Event::Pixel(..))));
    assert!(!log.contains(&Event::Swap));
    drop(driver); // shuts down cleanly without a pattern
}

#[test]
fn overlay_draws_fetched_readouts() {
    let (panel, events) = RecordingPanel::new();
    let driver =
        RenderDriver::spawn(50, panel, Some(test_pattern()), ScriptedText::once("21.5°", "55/"));
    driver.enable_background_drawing(false);
    driver.resume();
    thread::sleep(Duration::from_millis(250));
    driver.pause();
    thread::sleep(Duration::from_millis(100));

    let log = snapshot(&events);
    assert!(log.contains(&Event::Text("21.5°".to_string())));
    assert!(log.contains(&Event::Text("55/".to_string())));
    // background layer disabled: no cells were copied
    assert!(!log.iter().any(|e| matches!(e, Event::Pixel(..))));
}

#[test]
fn direct_text_updates_reach_the_overlay() {
    let (panel, events) = RecordingPanel::new();
    let driver = RenderDriver::spawn(50, panel, Some(test_pattern()), ScriptedText::silent());
    driver.enable_background_drawing(false);
    driver.set_text(TextSlot::A, "7/");
    driver.resume();
    thread::sleep(Duration::from_millis(250));
    driver.pause();
    thread::sleep(Duration::from_millis(100));

    assert!(snapshot(&events).contains(&Event::Text("7/".to_string())));
}

#[test]
fn disabling_text_leaves_frames_bare() {
    let (panel, events) = RecordingPanel::new();
    let driver = RenderDriver::spawn(50, panel, Some(test_pattern()), ScriptedText::silent());
    driver.enable_background_drawing(false);
    driver.enable_text_drawing(false);
    driver.resume();
    thread::sleep(Duration::from_millis(250));
    driver.pause();
    thread::sleep(Duration::from_millis(100));

    let log = snapshot(&events);
    assert!(!log.iter().any(|e| matches!(e, Event::Text(_))));
    // frames are still paced and published
    assert!(log.contains(&Event::Swap));
}
