//! Push and click handlers against a recording host.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use url::Url;
use worker::{
    ClientId, Host, HostError, NotificationClick, NotificationId, Permission, PushMessage,
    ServiceWorker, WindowClient, WorkerConfig, WorkerEvent, push::DEFAULT_BODY,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Close(String),
    MatchAll { include_uncontrolled: bool },
    Focus(String),
    Open(String),
    Show { title: String, body: String },
}

struct RecordingHost {
    windows: Result<Vec<WindowClient>, HostError>,
    can_open: bool,
    supported: bool,
    permission: Permission,
    hang_on_enumerate: bool,
    panic_on_focus: bool,
    calls: Mutex<Vec<Call>>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            windows: Ok(Vec::new()),
            can_open: true,
            supported: true,
            permission: Permission::Granted,
            hang_on_enumerate: false,
            panic_on_focus: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingHost {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|&call| matches(call)).count()
    }
}

#[async_trait]
impl Host for RecordingHost {
    fn close_notification(&self, notification: &NotificationId) {
        self.record(Call::Close(notification.0.clone()));
    }

    async fn match_all_windows(&self, include_uncontrolled: bool) -> Result<Vec<WindowClient>, HostError> {
        self.record(Call::MatchAll {
            include_uncontrolled,
        });

        if self.hang_on_enumerate {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        self.windows.clone()
    }

    async fn focus(&self, client: &ClientId) -> Result<(), HostError> {
        self.record(Call::Focus(client.0.clone()));
        if self.panic_on_focus {
            panic!("focus bridge crashed");
        }
        Ok(())
    }

    fn can_open_windows(&self) -> bool {
        self.can_open
    }

    async fn open_window(&self, url: &Url) -> Result<(), HostError> {
        self.record(Call::Open(url.to_string()));
        Ok(())
    }

    fn notifications_supported(&self) -> bool {
        self.supported
    }

    fn notification_permission(&self) -> Permission {
        self.permission
    }

    async fn show_notification(&self, title: &str, body: &str) -> Result<(), HostError> {
        self.record(Call::Show {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

fn worker(host: &Arc<RecordingHost>) -> ServiceWorker {
    let install = Url::parse("https://platter.app/service-worker.js").unwrap();
    ServiceWorker::new(host.clone(), WorkerConfig::new(install))
}

fn window(id: &str, url: &str) -> WindowClient {
    WindowClient {
        id: ClientId(id.to_string()),
        url: url.to_string(),
        focusable: true,
    }
}

fn click(id: &str) -> WorkerEvent {
    WorkerEvent::NotificationClick(NotificationClick {
        notification: NotificationId(id.to_string()),
    })
}

fn is_close(call: &Call) -> bool {
    matches!(call, Call::Close(_))
}

fn is_open(call: &Call) -> bool {
    matches!(call, Call::Open(_))
}

#[tokio::test]
async fn click_focuses_matching_window() {
    let host = Arc::new(RecordingHost {
        windows: Ok(vec![
            window("menu", "https://platter.app/menu"),
            window("home", "https://platter.app/"),
        ]),
        ..Default::default()
    });

    let lifetime = worker(&host).dispatch(click("n-1")).expect("lifetime");
    lifetime.settle().await.expect("settled");

    assert_eq!(
        host.calls(),
        vec![
            Call::Close("n-1".to_string()),
            Call::MatchAll {
                include_uncontrolled: true
            },
            Call::Focus("home".to_string()),
        ]
    );
}

#[tokio::test]
async fn click_opens_one_window_when_none_match() {
    let host = Arc::new(RecordingHost {
        windows: Ok(vec![window("checkout", "https://platter.app/checkout")]),
        ..Default::default()
    });

    worker(&host)
        .dispatch(click("n-2"))
        .expect("lifetime")
        .settle()
        .await
        .expect("settled");

    assert_eq!(host.count(is_close), 1);
    assert_eq!(host.count(is_open), 1);
    assert!(host.calls().contains(&Call::Open("https://platter.app/".to_string())));
    assert_eq!(host.count(|call| matches!(call, Call::Focus(_))), 0);
}

#[tokio::test]
async fn click_without_open_support_only_closes() {
    let host = Arc::new(RecordingHost {
        can_open: false,
        ..Default::default()
    });

    worker(&host)
        .dispatch(click("n-3"))
        .expect("lifetime")
        .settle()
        .await
        .expect("settled");

    assert_eq!(host.count(is_close), 1);
    assert_eq!(host.count(is_open), 0);
}

#[tokio::test]
async fn click_enumeration_failure_propagates_after_close() {
    let host = Arc::new(RecordingHost {
        windows: Err(HostError::Enumeration("clients unavailable".to_string())),
        ..Default::default()
    });

    let result = worker(&host)
        .dispatch(click("n-4"))
        .expect("lifetime")
        .settle()
        .await;

    assert_eq!(
        result,
        Err(HostError::Enumeration("clients unavailable".to_string()))
    );
    assert_eq!(host.count(is_close), 1);
    assert_eq!(host.count(is_open), 0);
}

#[tokio::test]
async fn click_closes_before_lifetime_settles() {
    let host = Arc::new(RecordingHost {
        hang_on_enumerate: true,
        ..Default::default()
    });

    let lifetime = worker(&host).dispatch(click("n-5")).expect("lifetime");

    assert_eq!(host.count(is_close), 1);

    lifetime.terminate();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(host.count(is_close), 1);
    assert_eq!(host.count(is_open), 0);
}

#[tokio::test]
async fn click_handler_panic_is_reported() {
    let host = Arc::new(RecordingHost {
        windows: Ok(vec![window("home", "https://platter.app/")]),
        panic_on_focus: true,
        ..Default::default()
    });

    let result = worker(&host)
        .dispatch(click("n-6"))
        .expect("lifetime")
        .settle()
        .await;

    assert_eq!(
        result,
        Err(HostError::Panicked("focus bridge crashed".to_string()))
    );
    assert_eq!(host.count(is_close), 1);
}

#[tokio::test]
async fn push_without_permission_does_nothing() {
    for permission in [Permission::Denied, Permission::Default] {
        let host = Arc::new(RecordingHost {
            permission,
            ..Default::default()
        });

        let message = PushMessage {
            data: Some(br#"{"title":"Order ready"}"#.to_vec()),
        };

        assert!(worker(&host).dispatch(WorkerEvent::Push(message)).is_none());
        assert!(host.calls().is_empty());
    }
}

#[tokio::test]
async fn push_unsupported_does_nothing() {
    let host = Arc::new(RecordingHost {
        supported: false,
        ..Default::default()
    });

    assert!(
        worker(&host)
            .dispatch(WorkerEvent::Push(PushMessage::default()))
            .is_none()
    );
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn push_with_empty_payload_uses_defaults() {
    let host = Arc::new(RecordingHost::default());

    let message = PushMessage {
        data: Some(b"{}".to_vec()),
    };

    worker(&host)
        .dispatch(WorkerEvent::Push(message))
        .expect("lifetime")
        .settle()
        .await
        .expect("settled");

    assert_eq!(
        host.calls(),
        vec![Call::Show {
            title: "Platter".to_string(),
            body: DEFAULT_BODY.to_string(),
        }]
    );
}

#[tokio::test]
async fn push_with_payload() {
    let host = Arc::new(RecordingHost::default());

    let message = PushMessage {
        data: Some(br#"{"title":"Order #42","body":"Your order is on its way"}"#.to_vec()),
    };

    worker(&host)
        .dispatch(WorkerEvent::Push(message))
        .expect("lifetime")
        .settle()
        .await
        .expect("settled");

    assert_eq!(
        host.calls(),
        vec![Call::Show {
            title: "Order #42".to_string(),
            body: "Your order is on its way".to_string(),
        }]
    );
}

#[tokio::test]
async fn root_is_derived_from_install_location() {
    let host = Arc::new(RecordingHost::default());

    assert_eq!(worker(&host).root().as_str(), "https://platter.app/");
}

#[tokio::test]
async fn installed_worker_reads_its_settings() {
    let host = Arc::new(RecordingHost::default());
    let install = Url::parse("https://platter.app/static/sw.js?v=2").unwrap();

    let worker = ServiceWorker::install(host.clone(), install.clone());

    assert_eq!(worker.config().install_location, install);
    assert!(!worker.config().app_name.is_empty());
    assert_eq!(worker.root().as_str(), "https://platter.app/");
}
