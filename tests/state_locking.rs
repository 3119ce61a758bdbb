// Tests for concurrent access to the persisted state file.
use slotwatch::appointment::{AppointmentSet, slot};
use slotwatch::context::{AppContext, TestContext};
use slotwatch::storage::{DateStore, FileDateStore};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_saves_leave_a_complete_record() {
    let ctx = TestContext::new();
    let path = ctx.get_state_path().unwrap();

    let thread_count = 8;
    let barrier = Arc::new(Barrier::new(thread_count));
    let sets: Vec<AppointmentSet> = (0..thread_count as u32)
        .map(|i| {
            (0..=i)
                .map(|h| slot(2025, 11, 1 + i, 8 + h, 0).unwrap())
                .collect()
        })
        .collect();

    let mut handles = vec![];
    for set in sets.clone() {
        let b = barrier.clone();
        let p = path.clone();
        handles.push(thread::spawn(move || {
            b.wait();
            let mut store = FileDateStore::new(p);
            store.save(&set).expect("save failed");
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    // Whoever won, the file holds exactly one of the written sets.
    let loaded = FileDateStore::new(path).load();
    assert!(
        sets.contains(&loaded),
        "State file holds a mixed or truncated record: {:?}",
        loaded
    );
}
