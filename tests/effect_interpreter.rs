//! Effect execution through a store, on a paused clock.

mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{advance, delayed, record, scripted, settle, Log, LogAction};
use navistore::mvi::reducer_fn;
use navistore::{Effect, Store, StoreError};

fn log_store<F>(script: F) -> Store<impl navistore::Reducer<State = Log, Action = LogAction, Dependencies = ()>>
where
    F: Fn(&'static str) -> Effect<LogAction> + Send + Sync + 'static,
{
    Store::new(scripted(script), Log::default(), ()).expect("store")
}

#[tokio::test(start_paused = true)]
async fn batch_actions_arrive_in_completion_order() {
    let store = log_store(|_| {
        Effect::batch(vec![
            Effect::run(|send, _| async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                send.send(record("X"));
                Ok(())
            }),
            Effect::run(|send, _| async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                send.send(record("Y"));
                Ok(())
            }),
        ])
    });

    store.dispatch(LogAction::Start("race")).unwrap();
    assert_eq!(store.live_tasks(), 2);

    advance(10).await;
    assert_eq!(store.state().entries(), ["Y"]);

    advance(40).await;
    assert_eq!(store.state().entries(), ["Y", "X"]);
    assert_eq!(store.live_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn merge_runs_every_branch() {
    let store = log_store(|_| Effect::merge(vec![delayed(20, "a"), delayed(20, "b")]));

    store.dispatch(LogAction::Start("merge")).unwrap();
    advance(20).await;

    let mut entries = store.state().0;
    entries.sort();
    assert_eq!(entries, ["a", "b"]);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_completion_suppresses_the_result() {
    let store = log_store(|name| match name {
        "load" => delayed(50, "loaded").cancellable("load"),
        _ => Effect::cancel("load"),
    });

    store.dispatch(LogAction::Start("load")).unwrap();
    advance(10).await;
    store.dispatch(LogAction::Start("cancel")).unwrap();
    assert_eq!(store.live_tasks(), 0);

    advance(100).await;
    assert!(store.state().0.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_before_first_poll_never_starts_the_task() {
    let started = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&started);
    let store = log_store(move |name| match name {
        "start" => {
            let flag = Arc::clone(&flag);
            Effect::fire_and_forget(move |_| async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .cancellable("job")
        }
        _ => Effect::cancel("job"),
    });

    store.dispatch(LogAction::Start("start")).unwrap();
    store.dispatch(LogAction::Start("cancel")).unwrap();
    settle().await;

    assert!(!started.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn cancelled_sender_stops_forwarding() {
    let store = log_store(|name| match name {
        "tick" => Effect::run(|send, _| async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                if !send.send(record("tick")) {
                    return Ok(());
                }
            }
        })
        .cancellable("ticker"),
        _ => Effect::cancel("ticker"),
    });

    store.dispatch(LogAction::Start("tick")).unwrap();
    advance(10).await;
    advance(10).await;
    assert_eq!(store.state().0.len(), 2);

    store.dispatch(LogAction::Start("stop")).unwrap();
    advance(10).await;
    advance(50).await;
    assert_eq!(store.state().0.len(), 2);
    assert_eq!(store.live_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancellable_in_flight_keeps_only_the_latest() {
    let store = log_store(|_| delayed(30, "search").cancellable_in_flight("search"));

    for _ in 0..3 {
        store.dispatch(LogAction::Start("search")).unwrap();
        advance(10).await;
    }
    assert!(store.state().0.is_empty());

    advance(50).await;
    assert_eq!(store.state().entries(), ["search"]);
}

#[tokio::test(start_paused = true)]
async fn action_effect_dispatches_after_the_current_dispatch() {
    let store = log_store(|_| Effect::action(record("echo")));

    store.dispatch(LogAction::Start("echo")).unwrap();
    assert!(store.state().0.is_empty());

    settle().await;
    assert_eq!(store.state().entries(), ["echo"]);
}

#[tokio::test(start_paused = true)]
async fn future_effect_maps_its_output() {
    let store = log_store(|_| Effect::future(async { 7 }, |n: i32| LogAction::Record(format!("got {n}"))));

    store.dispatch(LogAction::Start("future")).unwrap();
    settle().await;

    assert_eq!(store.state().entries(), ["got 7"]);
}

#[tokio::test(start_paused = true)]
async fn fire_and_forget_runs_without_feedback() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let store = log_store(move |_| {
        let counter = Arc::clone(&counter);
        Effect::fire_and_forget(move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    });

    store.dispatch(LogAction::Start("go")).unwrap();
    store.dispatch(LogAction::Start("go")).unwrap();
    settle().await;

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(store.state().0.is_empty());
}

#[tokio::test(start_paused = true)]
async fn failing_task_is_contained() {
    let store = log_store(|name| match name {
        "fail" => Effect::run(|_, _| async move { Err(anyhow::anyhow!("upstream unavailable")) }),
        _ => Effect::action(record("still alive")),
    });

    store.dispatch(LogAction::Start("fail")).unwrap();
    settle().await;
    assert_eq!(store.live_tasks(), 0);

    store.dispatch(LogAction::Start("next")).unwrap();
    settle().await;
    assert_eq!(store.state().entries(), ["still alive"]);
}

#[tokio::test(start_paused = true)]
async fn panicking_task_is_contained() {
    let store = log_store(|name| match name {
        "panic" => Effect::run(|_, _| async move {
            let missing: Option<()> = None;
            missing.expect("effect task exploded");
            Ok(())
        }),
        _ => Effect::action(record("still alive")),
    });

    store.dispatch(LogAction::Start("panic")).unwrap();
    settle().await;
    assert_eq!(store.live_tasks(), 0);

    store.dispatch(LogAction::Start("next")).unwrap();
    settle().await;
    assert_eq!(store.state().entries(), ["still alive"]);
}

#[tokio::test(start_paused = true)]
async fn nested_map_matches_composed_map() {
    fn source() -> Effect<u32> {
        Effect::batch(vec![
            Effect::after_delay(Duration::from_millis(10), 2),
            Effect::after_delay(Duration::from_millis(20), 5),
        ])
    }
    fn tens(n: u32) -> u32 {
        n * 10
    }
    fn to_record(n: u32) -> LogAction {
        LogAction::Record(n.to_string())
    }

    let nested = log_store(|_| source().map(tens).map(to_record));
    let composed = log_store(|_| source().map(|n| to_record(tens(n))));

    nested.dispatch(LogAction::Start("map")).unwrap();
    composed.dispatch(LogAction::Start("map")).unwrap();
    advance(10).await;
    advance(10).await;

    assert_eq!(nested.state().entries(), ["20", "50"]);
    assert_eq!(nested.state(), composed.state());
}

#[tokio::test(start_paused = true)]
async fn cancel_reaches_tasks_inside_a_map() {
    let store = log_store(|name| match name {
        "start" => Effect::after_delay(Duration::from_millis(30), 1u8)
            .map(|n| LogAction::Record(n.to_string()))
            .cancellable("mapped"),
        _ => Effect::cancel("mapped"),
    });

    store.dispatch(LogAction::Start("start")).unwrap();
    advance(10).await;
    store.dispatch(LogAction::Start("cancel")).unwrap();
    advance(50).await;

    assert!(store.state().0.is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_live_tasks() {
    let store = log_store(|_| delayed(50, "late"));

    store.dispatch(LogAction::Start("late")).unwrap();
    advance(10).await;
    store.shutdown();
    assert_eq!(store.live_tasks(), 0);

    advance(100).await;
    assert!(store.state().0.is_empty());
    assert_eq!(
        store.dispatch(LogAction::Start("late")),
        Err(StoreError::ShutDown)
    );
}

#[tokio::test(start_paused = true)]
async fn dropping_the_store_cancels_tasks() {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    let store = log_store(move |_| {
        let flag = Arc::clone(&flag);
        Effect::fire_and_forget(move |token| async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
    });

    store.dispatch(LogAction::Start("wait")).unwrap();
    settle().await;
    assert!(!cancelled.load(Ordering::SeqCst));

    drop(store);
    settle().await;
    assert!(cancelled.load(Ordering::SeqCst));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn send_waiting_on_a_cancelling_dispatch_is_dropped() {
    let store = Store::new(
        reducer_fn(|mut log: Log, action: LogAction, _: &()| match action {
            LogAction::Start("job") => (
                log,
                Effect::run(|send, _| async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    send.send(record("late"));
                    Ok(())
                })
                .cancellable("job"),
            ),
            LogAction::Start(_) => {
                log.0.push("cancel".to_string());
                (log, Effect::cancel("job"))
            }
            LogAction::Record(entry) => {
                log.0.push(entry);
                (log, Effect::none())
            }
        }),
        Log::default(),
        (),
    )
    .unwrap();

    // Holds the cancelling dispatch open until well after the task has sent.
    let _slow = store.subscribe(|log: &Log| {
        if log.0.last().map(String::as_str) == Some("cancel") {
            std::thread::sleep(Duration::from_millis(200));
        }
    });

    store.dispatch(LogAction::Start("job")).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let canceller = store.clone();
    tokio::task::spawn_blocking(move || canceller.dispatch(LogAction::Start("cancel")))
        .await
        .unwrap()
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.state().entries(), ["cancel"]);
    assert_eq!(store.live_tasks(), 0);
}
