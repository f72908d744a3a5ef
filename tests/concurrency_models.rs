//! Behaviour shared by every execution model.

use std::thread;
use std::time::{Duration, Instant};

use sylva::concurrency::{Asynchronous, Launch, Pipeline, PoolConfig, PoolState, ThreadPool};
use sylva::{ExecutionError, ExecutionModel, Serial};

fn assert_send<T: Send>() {}
fn assert_sync<T: Sync>() {}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn run_all<M: ExecutionModel<'static, u64>>(mut model: M, tasks: u64) -> Vec<u64> {
    for i in 0..tasks {
        model
            .push(move || {
                thread::sleep(Duration::from_micros((tasks - i) * 50));
                i * 3
            })
            .unwrap();
    }
    model.get().unwrap()
}

#[test]
fn models_are_send() {
    assert_send::<Serial<u64>>();
    assert_send::<Asynchronous<u64>>();
    assert_send::<ThreadPool<u64>>();
    assert_sync::<ThreadPool<u64>>();
    assert_sync::<Serial<u64>>();
}

#[test]
fn every_model_preserves_submission_order() {
    let expected: Vec<u64> = (0..16).map(|i| i * 3).collect();
    assert_eq!(run_all(Serial::new(), 16), expected);
    assert_eq!(run_all(Asynchronous::new(Launch::Eager), 16), expected);
    assert_eq!(run_all(Asynchronous::new(Launch::Deferred), 16), expected);
    assert_eq!(run_all(ThreadPool::new(4).unwrap(), 16), expected);
    assert_eq!(run_all(ThreadPool::multi_pipeline(4, 2).unwrap(), 16), expected);
    #[cfg(feature = "parallel")]
    assert_eq!(run_all(sylva::RayonModel::new(4).unwrap(), 16), expected);
}

#[test]
fn a_pool_without_workers_cannot_be_built() {
    assert!(matches!(ThreadPool::<()>::new(0), Err(ExecutionError::ZeroThreads)));
}

#[test]
fn two_workers_beat_inline_execution() {
    const NAP: Duration = Duration::from_millis(100);
    fn time<M: ExecutionModel<'static, ()>>(mut model: M) -> Duration {
        let started = Instant::now();
        for _ in 0..4 {
            model.push(|| thread::sleep(NAP)).unwrap();
        }
        assert_eq!(model.get().unwrap().len(), 4);
        started.elapsed()
    }

    let serial = time(Serial::new());
    let pooled = time(ThreadPool::new(2).unwrap());
    assert!(serial >= NAP * 4);
    assert!(pooled * 4 < serial * 3, "pool took {pooled:?}, serial took {serial:?}");
}

#[test]
fn void_work_yields_one_unit_per_task() {
    let mut model = ThreadPool::new(2).unwrap();
    for _ in 0..5 {
        model.push(|| ()).unwrap();
    }
    assert_eq!(model.get().unwrap(), vec![(); 5]);
}

#[test]
fn panics_surface_as_task_errors() {
    init_tracing();

    let mut serial = Serial::new();
    serial.push(|| 1).unwrap();
    assert!(matches!(
        serial.push(|| panic!("serial boom")),
        Err(ExecutionError::TaskPanicked(msg)) if msg.contains("serial boom")
    ));
    assert_eq!(serial.get().unwrap(), vec![1]);

    let mut future = Asynchronous::new(Launch::Eager);
    future.push(|| 1).unwrap();
    future.push(|| panic!("async boom")).unwrap();
    assert!(matches!(
        future.get(),
        Err(ExecutionError::TaskPanicked(msg)) if msg.contains("async boom")
    ));

    let mut pool = ThreadPool::new(2).unwrap();
    pool.push(|| 1).unwrap();
    pool.push(|| panic!("pool boom")).unwrap();
    assert!(matches!(
        pool.get(),
        Err(ExecutionError::TaskPanicked(msg)) if msg.contains("pool boom")
    ));
    assert_eq!(pool.state(), PoolState::Terminated);
    assert!(matches!(pool.push(|| 2), Err(ExecutionError::Terminated)));
}

#[test]
fn join_waits_without_consuming_results() {
    let mut pool = ThreadPool::new(2).unwrap();
    for i in 0..4 {
        pool.push(move || i).unwrap();
    }
    pool.join().unwrap();
    assert_eq!(pool.state(), PoolState::Finished);
    assert_eq!(pool.get().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn pools_can_be_configured_from_json() {
    init_tracing();

    let config = PoolConfig::from_json(r#"{ "threads": 2, "pipeline": "multi", "thread_name": "graph" }"#).unwrap();
    assert_eq!(config.pipeline, Pipeline::Multi);

    let mut pool = ThreadPool::with_config(&config).unwrap();
    assert_eq!(pool.threads(), 2);
    assert_eq!(pool.pipeline(), Pipeline::Multi);

    pool.push(|| thread::current().name().map(str::to_owned)).unwrap();
    let names = pool.get().unwrap();
    assert!(names[0].as_deref().is_some_and(|name| name.starts_with("graph-")));

    assert!(PoolConfig::from_json(r#"{ "threads": 0 }"#).is_err());
}
