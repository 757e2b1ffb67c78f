//! Tests for batch semantics and concurrency limits.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chain_core::error::Error;
use chain_core::runnables::{
    BatchExecutor, ConfigOrList, Runnable, RunnableConfig, RunnableLambda, get_config_list,
};

fn tagging_lambda() -> RunnableLambda<i32, String> {
    RunnableLambda::new_with_config(|x: i32, config: &RunnableConfig| {
        Ok(format!("{}:{}", x, config.tags.join(",")))
    })
}

#[tokio::test]
async fn test_batch_matches_invoke_per_item() {
    let runnable = tagging_lambda();
    let inputs = vec![1, 2, 3];
    let configs = vec![
        RunnableConfig::new().with_tags(vec!["a".into()]),
        RunnableConfig::new(),
        RunnableConfig::new().with_tags(vec!["c".into(), "d".into()]),
    ];

    let outputs = runnable
        .batch(inputs.clone(), Some(ConfigOrList::from(configs.clone())))
        .await
        .unwrap();

    assert_eq!(outputs.len(), inputs.len());
    for ((input, config), output) in inputs.into_iter().zip(configs).zip(&outputs) {
        assert_eq!(&runnable.invoke(input, Some(config)).await.unwrap(), output);
    }
    assert_eq!(outputs, vec!["1:a", "2:", "3:c,d"]);
}

#[tokio::test]
async fn test_batch_broadcasts_single_config() {
    let runnable = tagging_lambda();
    let config = RunnableConfig::new().with_tags(vec!["shared".into()]);
    let outputs = runnable
        .batch(vec![1, 2], Some(ConfigOrList::from(config)))
        .await
        .unwrap();
    assert_eq!(outputs, vec!["1:shared", "2:shared"]);
}

#[tokio::test]
async fn test_batch_config_length_mismatch_invokes_nothing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let runnable = RunnableLambda::new(move |x: i32| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(x)
    });

    let configs = vec![RunnableConfig::new(), RunnableConfig::new(), RunnableConfig::new()];
    let err = runnable
        .batch(vec![1, 2], Some(ConfigOrList::from(configs.clone())))
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    let err = runnable
        .batch_results(vec![1, 2], Some(ConfigOrList::from(configs)))
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_batch_empty_inputs() {
    let runnable = RunnableLambda::new(|x: i32| Ok(x));
    assert!(runnable.batch(vec![], None).await.unwrap().is_empty());
    assert!(
        runnable
            .batch(vec![], Some(ConfigOrList::from(Vec::<RunnableConfig>::new())))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_batch_preserves_order_under_out_of_order_completion() {
    let runnable = RunnableLambda::new_async(|x: u64| async move {
        tokio::time::sleep(Duration::from_millis(50 - x * 10)).await;
        Ok(x)
    });

    let outputs = runnable.batch(vec![0, 1, 2, 3, 4], None).await.unwrap();
    assert_eq!(outputs, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_batch_first_failure_fails_whole_batch() {
    let runnable = RunnableLambda::new(|x: i32| {
        if x == 2 {
            Err(Error::execution(format!("item {} failed", x)))
        } else {
            Ok(x)
        }
    });

    let err = runnable.batch(vec![1, 2, 3], None).await.unwrap_err();
    assert_eq!(err.to_string(), "Execution error: item 2 failed");
}

#[tokio::test]
async fn test_batch_results_reports_each_item() {
    let runnable = RunnableLambda::new(|x: i32| {
        if x % 2 == 0 {
            Err(Error::execution("even"))
        } else {
            Ok(x * 10)
        }
    });

    let results = runnable.batch_results(vec![1, 2, 3], None).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(*results[0].as_ref().unwrap(), 10);
    assert!(results[1].as_ref().unwrap_err().is_execution());
    assert_eq!(*results[2].as_ref().unwrap(), 30);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_max_concurrency() {
    let running_tasks = Arc::new(AtomicUsize::new(0));
    let max_running_tasks = Arc::new(AtomicUsize::new(0));

    let running = running_tasks.clone();
    let max_running = max_running_tasks.clone();
    let runnable = RunnableLambda::new_async(move |x: i32| {
        let running = running.clone();
        let max_running = max_running.clone();
        async move {
            let current = running.fetch_add(1, Ordering::SeqCst) + 1;
            max_running.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            running.fetch_sub(1, Ordering::SeqCst);
            Ok(format!("Completed {}", x))
        }
    });

    let num_tasks = 10;
    let max_concurrency = 3;
    let config = RunnableConfig::new().with_max_concurrency(max_concurrency);
    let outputs = runnable
        .batch((0..num_tasks).collect(), Some(ConfigOrList::from(config)))
        .await
        .unwrap();

    assert_eq!(outputs.len(), num_tasks as usize);
    assert_eq!(outputs[9], "Completed 9");
    let observed = max_running_tasks.load(Ordering::SeqCst);
    assert!(observed <= max_concurrency, "observed {} in flight", observed);
    assert!(observed >= 1);
}

#[tokio::test]
async fn test_batch_executor_direct() {
    let runnable = RunnableLambda::new(|x: i32| Ok(x + 1));
    let configs = get_config_list(None, 3).unwrap();

    let executor = BatchExecutor::from_configs(&configs);
    assert_eq!(executor.max_concurrency(), None);
    let outputs = executor.run(&runnable, vec![1, 2, 3], configs).await.unwrap();
    assert_eq!(outputs, vec![2, 3, 4]);

    let capped = BatchExecutor::new().with_max_concurrency(2);
    assert_eq!(capped.max_concurrency(), Some(2));
    let err = capped
        .run(&runnable, vec![1, 2], vec![RunnableConfig::new()])
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    assert_eq!(BatchExecutor::new().with_max_concurrency(0).max_concurrency(), None);
}
