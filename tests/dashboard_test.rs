//! Cross-thread behavior of the session wiring: submission ordering,
//! drain-on-stop, and terminal restoration at the end of a run.

use std::io::{self, Write};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use pretty_assertions::assert_eq;
use statusgrid::queue::ActionQueue;
use statusgrid::term::{TermControl, TermSize};
use statusgrid::{Dashboard, DashboardOptions, Item, Status};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingControl(Arc<Mutex<Vec<String>>>);

impl TermControl for RecordingControl {
    fn set_local_echo(&mut self, enabled: bool) {
        self.0.lock().unwrap().push(format!("echo:{enabled}"));
    }
    fn set_cursor_visible(&mut self, visible: bool) {
        self.0.lock().unwrap().push(format!("cursor:{visible}"));
    }
}

fn test_dashboard(width: u16) -> (Dashboard, SharedBuf, RecordingControl) {
    let out = SharedBuf::default();
    let control = RecordingControl::default();
    let dashboard = Dashboard::with_terminal(
        TermSize { width, height: 24 },
        Box::new(control.clone()),
        out.clone(),
        DashboardOptions::default(),
    );
    (dashboard, out, control)
}

#[test]
fn per_producer_submission_order_is_preserved() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let queue = ActionQueue::start(move |tagged: (usize, usize)| {
        sink.lock().unwrap().push(tagged);
    });

    let queue = Arc::new(queue);
    let barrier = Arc::new(Barrier::new(4));
    let mut producers = Vec::new();
    for producer in 0..4 {
        let queue = Arc::clone(&queue);
        let barrier = Arc::clone(&barrier);
        producers.push(thread::spawn(move || {
            barrier.wait();
            for seq in 0..50 {
                queue.submit((producer, seq));
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }
    let mut queue = Arc::try_unwrap(queue).unwrap_or_else(|_| panic!("queue still shared"));
    queue.stop();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 200);
    for producer in 0..4 {
        let seqs: Vec<usize> = seen
            .iter()
            .filter(|(p, _)| *p == producer)
            .map(|(_, s)| *s)
            .collect();
        assert_eq!(seqs, (0..50).collect::<Vec<_>>());
    }
}

#[test]
fn show_items_is_drawn_before_the_status_update_that_follows_it() {
    let (dashboard, out, _) = test_dashboard(80);
    let items = vec![
        Item::new("a", "project-alpha1"),
        Item::new("b", "project-beta12"),
        Item::new("c", "project-gamma1"),
    ];
    dashboard.show_items(items.clone());
    dashboard.report_status(items[1].clone(), Status::Failed);
    dashboard.shutdown();

    let rendered = out.contents();
    // The failed glyph lands at B's cell, column origin 20 -> "ESC[1;21H".
    assert!(rendered.contains("\u{1b}[1;21H"));
    let glyph_at = rendered.rfind('\u{274c}').expect("failed glyph drawn");
    // All three names were painted by show_items before the update.
    for item in &items {
        let name_at = rendered.find(&item.name).expect("name drawn");
        assert!(name_at < glyph_at, "{} drawn after the update", item.name);
    }
}

#[test]
fn unknown_item_reports_have_no_observable_effect() {
    let (dashboard, out, _) = test_dashboard(80);
    dashboard.show_items(vec![Item::new("a", "project-alpha1")]);
    dashboard.shutdown();
    let before = out.contents();

    let (dashboard, out, _) = test_dashboard(80);
    dashboard.show_items(vec![Item::new("a", "project-alpha1")]);
    dashboard.report_status(Item::new("ghost", "ghost"), Status::Failed);
    dashboard.report_activity(Item::new("ghost", "ghost"), "noise");
    dashboard.shutdown();

    assert_eq!(out.contents(), before);
}

#[test]
fn producers_share_one_session() {
    let (dashboard, out, _) = test_dashboard(200);
    let items: Vec<Item> = (0..8)
        .map(|i| Item::new(format!("k{i}"), format!("module-{i:02}")))
        .collect();
    dashboard.show_items(items.clone());

    let dashboard = Arc::new(dashboard);
    let mut producers = Vec::new();
    for chunk in items.chunks(4).map(<[Item]>::to_vec) {
        let dash = Arc::clone(&dashboard);
        producers.push(thread::spawn(move || {
            for item in chunk {
                dash.report_status(item, Status::Succeeded);
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }
    Arc::try_unwrap(dashboard)
        .unwrap_or_else(|_| panic!("session still shared"))
        .shutdown();

    assert_eq!(out.contents().matches('\u{2705}').count(), 8);
}

#[test]
fn shutdown_drains_then_restores_the_terminal() {
    let (dashboard, out, control) = test_dashboard(80);
    let item = Item::new("a", "project-alpha1");
    dashboard.show_items(vec![item.clone()]);
    dashboard.report_status(item, Status::Succeeded);
    dashboard.shutdown();

    // The final status made it to the screen before the close.
    assert!(out.contents().contains('\u{2705}'));
    // Echo and cursor returned to their pre-activation state.
    let calls = control.0.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec!["echo:false", "cursor:false", "cursor:true", "echo:true"]
    );
}
