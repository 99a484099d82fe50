use dioxus_api_hooks::prelude::*;
use serde_json::json;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;
use tokio::time::sleep;

fn identity<T: 'static>() -> PageAdapter<Page<T>, T, String> {
    Arc::new(Ok)
}

/// Backend holding `total` rows, optionally reporting the total.
fn backend(
    total: u32,
    report_total: bool,
    calls: Arc<AtomicU32>,
) -> impl Operation<PageRequest, Output = Page<u32>, Error = String> {
    from_fn(move |request: PageRequest| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let start = (request.page().saturating_sub(1) * request.limit()).min(total);
            let end = (start + request.limit()).min(total);
            let page = Page::new((start..end).collect());
            Ok(if report_total {
                page.with_total(u64::from(total))
            } else {
                page
            })
        }
    })
}

#[tokio::test]
async fn accumulates_pages_until_total_is_reached() {
    let calls = Arc::new(AtomicU32::new(0));
    let paginator = Paginator::new(
        backend(25, true, calls.clone()),
        identity(),
        PaginatorOptions::new(),
        AuthSignal::anonymous(),
    );

    paginator.fetch_page(None).await.unwrap();
    let state = paginator.state();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.page, 1);
    assert!(state.has_more);

    paginator.load_more().await.unwrap();
    let state = paginator.state();
    assert_eq!(state.items.len(), 20);
    assert_eq!(state.page, 2);
    assert!(state.has_more);

    paginator.load_more().await.unwrap();
    let state = paginator.state();
    assert_eq!(state.items, (0..25).collect::<Vec<_>>());
    assert_eq!(state.page, 3);
    assert!(!state.has_more);
    assert!(!state.loading);

    paginator.load_more().await.unwrap();
    paginator.fetch_page(Some(4)).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3, "exhausted paginator does not fetch");
}

#[tokio::test]
async fn short_page_ends_sequence_without_total() {
    let paginator = Paginator::new(
        backend(14, false, Arc::default()),
        identity(),
        PaginatorOptions::new(),
        AuthSignal::anonymous(),
    );

    paginator.fetch_page(None).await.unwrap();
    assert!(paginator.state().has_more, "full page without total");

    paginator.load_more().await.unwrap();
    let state = paginator.state();
    assert_eq!(state.items.len(), 14);
    assert!(!state.has_more, "short page means exhaustion");
}

#[tokio::test]
async fn empty_page_ends_sequence_even_with_larger_total() {
    let paginator = Paginator::new(
        from_fn(|_: PageRequest| async { Ok::<_, String>(Page::<u32>::new(Vec::new()).with_total(100)) }),
        identity(),
        PaginatorOptions::new(),
        AuthSignal::anonymous(),
    );

    paginator.fetch_page(None).await.unwrap();
    let state = paginator.state();
    assert!(state.items.is_empty());
    assert!(!state.has_more);
}

#[tokio::test]
async fn refresh_replaces_accumulated_items() {
    let calls = Arc::new(AtomicU32::new(0));
    let paginator = Paginator::new(
        backend(25, true, calls.clone()),
        identity(),
        PaginatorOptions::new(),
        AuthSignal::anonymous(),
    );

    paginator.fetch_page(None).await.unwrap();
    paginator.load_more().await.unwrap();
    paginator.load_more().await.unwrap();
    assert!(!paginator.state().has_more);

    paginator.refresh().await.unwrap();
    let state = paginator.state();
    assert_eq!(state.items, (0..10).collect::<Vec<_>>());
    assert_eq!(state.page, 1);
    assert!(state.has_more);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn failure_keeps_items_and_is_returned() {
    let paginator = Paginator::new(
        from_fn(|request: PageRequest| async move {
            if request.page() == 2 {
                Err("page 2 unavailable".to_string())
            } else {
                Ok(Page::new(vec![1u32; 10]))
            }
        }),
        identity(),
        PaginatorOptions::new(),
        AuthSignal::anonymous(),
    );

    paginator.fetch_page(None).await.unwrap();
    let result = paginator.load_more().await;
    assert_eq!(
        result,
        Err(HookError::Operation("page 2 unavailable".to_string()))
    );

    let state = paginator.state();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.page, 1);
    assert!(!state.loading);
    assert!(state.error.is_some());

    paginator.fetch_page(Some(3)).await.unwrap();
    let state = paginator.state();
    assert_eq!(state.error, None, "a successful fetch clears the error");
    assert_eq!(state.items.len(), 20);
}

#[tokio::test(start_paused = true)]
async fn overlapping_fetches_are_ignored() {
    let calls = Arc::new(AtomicU32::new(0));
    let op = {
        let calls = calls.clone();
        from_fn(move |_: PageRequest| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_millis(50)).await;
                Ok::<_, String>(Page::new(vec![0u32; 10]))
            }
        })
    };
    let paginator = Paginator::new(op, identity(), PaginatorOptions::new(), AuthSignal::anonymous());

    let (first, second, third) = tokio::join!(
        paginator.fetch_page(None),
        paginator.load_more(),
        paginator.refresh()
    );
    assert!(first.is_ok() && second.is_ok() && third.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(paginator.state().items.len(), 10);
}

#[tokio::test]
async fn requests_use_configured_parameter_names() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let op = {
        let seen = seen.clone();
        from_fn(move |request: PageRequest| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(serde_json::to_value(request).unwrap());
                Ok::<_, String>(Page::new(vec![0u32; 5]))
            }
        })
    };
    let paginator = Paginator::new(
        op,
        identity(),
        PaginatorOptions::new()
            .initial_page(0)
            .page_size(5)
            .param_names("offset_page", "per_page"),
        AuthSignal::anonymous(),
    );

    paginator.fetch_page(None).await.unwrap();
    paginator.load_more().await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            json!({"offset_page": 0, "per_page": 5}),
            json!({"offset_page": 1, "per_page": 5}),
        ]
    );
    assert_eq!(paginator.state().items.len(), 10, "page 1 appends after initial page 0");
}

#[tokio::test]
async fn protected_operation_requires_authentication() {
    let calls = Arc::new(AtomicU32::new(0));
    let op = {
        let calls = calls.clone();
        from_fn(move |_: PageRequest| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(Page::new(vec![0u32; 10]))
            }
        })
        .authenticated()
    };
    let paginator = Paginator::new(
        op,
        identity(),
        PaginatorOptions::new(),
        AuthSignal::anonymous(),
    );

    let result = paginator.fetch_page(None).await;
    assert!(result.unwrap_err().is_auth_required());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(paginator.state().error.is_some());
}

#[tokio::test]
async fn mount_and_reset() {
    let calls = Arc::new(AtomicU32::new(0));
    let lazy = Paginator::new(
        backend(25, true, calls.clone()),
        identity(),
        PaginatorOptions::new().immediate(false),
        AuthSignal::anonymous(),
    );
    lazy.mount().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let eager = Paginator::new(
        backend(25, true, calls.clone()),
        identity(),
        PaginatorOptions::new(),
        AuthSignal::anonymous(),
    );
    eager.mount().await.unwrap();
    assert_eq!(eager.state().items.len(), 10);

    eager.reset();
    assert_eq!(eager.state(), PageState::new(1));
}

#[tokio::test]
async fn json_adapter_reads_backend_shapes() {
    let paginator = Paginator::new(
        from_fn(|request: PageRequest| async move {
            Ok::<_, ApiError>(json!({
                "results": [request.page() * 10, request.page() * 10 + 1],
                "totalCount": 4,
            }))
        }),
        json_page_adapter::<u32, ApiError>(),
        PaginatorOptions::new().page_size(2),
        AuthSignal::anonymous(),
    );

    paginator.fetch_page(None).await.unwrap();
    paginator.load_more().await.unwrap();

    let state = paginator.state();
    assert_eq!(state.items, vec![10, 11, 20, 21]);
    assert!(!state.has_more);
}

#[tokio::test(start_paused = true)]
async fn reset_discards_page_in_flight() {
    let calls = Arc::new(AtomicU32::new(0));
    let op = {
        let calls = calls.clone();
        from_fn(move |_: PageRequest| {
            let calls = calls.clone();
            async move {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                let delay = if call == 1 { 50 } else { 10 };
                sleep(Duration::from_millis(delay)).await;
                Ok::<_, String>(Page::new(vec![call; 3]))
            }
        })
    };
    let paginator = Paginator::new(op, identity(), PaginatorOptions::new(), AuthSignal::anonymous());

    let (stale, fresh) = tokio::join!(paginator.fetch_page(None), async {
        sleep(Duration::from_millis(10)).await;
        paginator.reset();
        paginator.fetch_page(None).await
    });

    assert!(stale.is_ok() && fresh.is_ok());
    let state = paginator.state();
    assert_eq!(state.items, vec![2, 2, 2], "page from before the reset was dropped");
    assert!(!state.loading);
}
