use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_api_hooks::prelude::*;
use futures::FutureExt;
use std::future::Future;
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;
use tokio::{task::yield_now, time::sleep};

/// Shared invocation counter, compared by identity so it can travel in props.
#[derive(Clone, Default)]
struct Counter(Arc<AtomicU32>);

impl Counter {
    fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl PartialEq for Counter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Props, Clone, PartialEq)]
struct CounterProps {
    calls: Counter,
}

#[allow(non_snake_case)]
fn LoadOnMount(props: CounterProps) -> Element {
    let calls = props.calls.clone();
    let call = use_api_call_on_mount(
        from_fn(move |_: ()| {
            let calls = calls.clone();
            async move {
                sleep(Duration::from_millis(5)).await;
                Ok::<_, String>(calls.bump())
            }
        }),
        CallOptions::new(),
    );
    let _loading = call.loading();
    rsx!(div {})
}

#[allow(non_snake_case)]
fn ProtectedLoader(props: CounterProps) -> Element {
    let calls = props.calls.clone();
    let call = use_api_call_on_mount(
        from_fn(move |_: ()| {
            let calls = calls.clone();
            async move { Ok::<_, String>(calls.bump()) }
        })
        .authenticated(),
        CallOptions::new(),
    );
    let _error = call.error();
    rsx!(div {})
}

#[allow(non_snake_case)]
fn SignedInApp(props: CounterProps) -> Element {
    use_session_provider(|| Session::with_token("token"));
    rsx! {
        ProtectedLoader { calls: props.calls.clone() }
    }
}

/// Parameter type with no sensible default.
#[derive(Debug, Clone, PartialEq, Hash, serde::Serialize)]
struct SceneId(u32);

#[allow(non_snake_case)]
fn SceneViewer(props: CounterProps) -> Element {
    let calls = props.calls.clone();
    let call = use_api_call(
        from_fn(move |id: SceneId| {
            let calls = calls.clone();
            async move {
                calls.bump();
                Ok::<_, String>(format!("scene {}", id.0))
            }
        }),
        CallOptions::new(),
    );
    use_hook(|| {
        let call = call.clone();
        spawn(async move {
            let _ = call.execute(SceneId(4)).await;
        });
    });
    let _data = call.data();
    rsx!(div {})
}

#[allow(non_snake_case)]
fn InfiniteList(props: CounterProps) -> Element {
    let calls = props.calls.clone();
    let adapter: PageAdapter<Page<u32>, u32, String> = Arc::new(Ok);
    let feed = use_infinite_scroll(
        from_fn(move |_: PageRequest| {
            let calls = calls.clone();
            async move {
                calls.bump();
                Ok::<_, String>(Page::new(vec![1, 2, 3]))
            }
        }),
        adapter,
        PaginatorOptions::new(),
    );
    let _items = feed.items();
    rsx!(div {})
}

#[allow(non_snake_case)]
fn PollingBadge(props: CounterProps) -> Element {
    let calls = props.calls.clone();
    let poll = use_api_polling(
        from_fn(move |_: ()| {
            let calls = calls.clone();
            async move { Ok::<_, String>(calls.bump()) }
        }),
        PollOptions::new(Duration::from_millis(10)),
        (),
    );
    let _data = poll.data();
    rsx!(div {})
}

fn block_on_test(fut: impl Future<Output = ()>) {
    tokio::runtime::Runtime::new()
        .expect("tokio runtime")
        .block_on(fut);
}

/// Drain pending work a few times, letting spawned tasks finish in between.
async fn settle(vdom: &mut VirtualDom) {
    let mut mutations = NoOpMutations;
    for _ in 0..5 {
        while vdom.wait_for_work().now_or_never().is_some() {
            vdom.render_immediate(&mut mutations);
        }
        yield_now().await;
        sleep(Duration::from_millis(10)).await;
    }
}

#[test]
fn load_on_mount_runs_once_across_rerenders() {
    block_on_test(async {
        let calls = Counter::default();
        let mut vdom = VirtualDom::new_with_props(
            LoadOnMount,
            CounterProps {
                calls: calls.clone(),
            },
        );
        vdom.rebuild_in_place();
        settle(&mut vdom).await;

        assert_eq!(calls.get(), 1);
    });
}

#[test]
fn call_without_default_params_waits_for_execute() {
    block_on_test(async {
        let calls = Counter::default();
        let mut vdom = VirtualDom::new_with_props(
            SceneViewer,
            CounterProps {
                calls: calls.clone(),
            },
        );
        vdom.rebuild_in_place();
        settle(&mut vdom).await;

        assert_eq!(calls.get(), 1, "only the explicit execute ran");
    });
}

#[test]
fn protected_call_without_session_is_never_invoked() {
    block_on_test(async {
        let calls = Counter::default();
        let mut vdom = VirtualDom::new_with_props(
            ProtectedLoader,
            CounterProps {
                calls: calls.clone(),
            },
        );
        vdom.rebuild_in_place();
        settle(&mut vdom).await;

        assert_eq!(calls.get(), 0);
    });
}

#[test]
fn session_provider_authorizes_descendants() {
    block_on_test(async {
        let calls = Counter::default();
        let mut vdom = VirtualDom::new_with_props(
            SignedInApp,
            CounterProps {
                calls: calls.clone(),
            },
        );
        vdom.rebuild_in_place();
        settle(&mut vdom).await;

        assert_eq!(calls.get(), 1);
    });
}

#[test]
fn infinite_scroll_fetches_initial_page_once() {
    block_on_test(async {
        let calls = Counter::default();
        let mut vdom = VirtualDom::new_with_props(
            InfiniteList,
            CounterProps {
                calls: calls.clone(),
            },
        );
        vdom.rebuild_in_place();
        settle(&mut vdom).await;

        assert_eq!(calls.get(), 1);
    });
}

#[test]
fn polling_stops_when_component_is_dropped() {
    block_on_test(async {
        let calls = Counter::default();
        let mut vdom = VirtualDom::new_with_props(
            PollingBadge,
            CounterProps {
                calls: calls.clone(),
            },
        );
        vdom.rebuild_in_place();
        settle(&mut vdom).await;
        assert!(calls.get() >= 1, "poller ticked while mounted");

        drop(vdom);
        sleep(Duration::from_millis(20)).await;
        let after_drop = calls.get();
        sleep(Duration::from_millis(100)).await;

        assert_eq!(calls.get(), after_drop, "no ticks after unmount");
    });
}
