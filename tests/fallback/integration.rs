//! The layer around plain services.

use super::TestError;
use reservation_client_core::ClientEvent;
use reservation_client_fallback::{FallbackError, FallbackLayer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::{service_fn, Layer, Service, ServiceBuilder, ServiceExt};

#[tokio::test]
async fn success_passes_through() {
    let service = service_fn(|req: String| async move { Ok::<_, TestError>(format!("names for {}", req)) });
    let mut service = FallbackLayer::<String, String, TestError>::value("fallback".into()).layer(service);

    let response = service.ready().await.unwrap().call("alice".into()).await.unwrap();
    assert_eq!(response, "names for alice");
}

#[tokio::test]
async fn failure_is_answered_by_value() {
    let service = service_fn(|_req: String| async move { Err::<String, _>(TestError::new("refused")) });
    let mut service = FallbackLayer::<String, String, TestError>::value("fallback".into()).layer(service);

    let response = service.ready().await.unwrap().call("alice".into()).await.unwrap();
    assert_eq!(response, "fallback");
}

#[tokio::test]
async fn from_error_sees_the_failure() {
    let service = service_fn(|_req: u32| async move { Err::<String, _>(TestError::with_code("gone", 404)) });
    let mut service =
        FallbackLayer::<u32, String, TestError>::from_error(|e: &TestError| format!("degraded after {}", e.code))
            .layer(service);

    let response = service.ready().await.unwrap().call(1).await.unwrap();
    assert_eq!(response, "degraded after 404");
}

#[tokio::test]
async fn backup_receives_the_original_request() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);

    let service = service_fn(|_req: String| async move { Err::<String, _>(TestError::new("refused")) });
    let layer = FallbackLayer::<String, String, TestError>::service(move |req: String| {
        seen_clone.lock().unwrap().push(req.clone());
        async move { Ok(format!("backup for {}", req)) }
    });
    let mut service = layer.layer(service);

    let response = service.ready().await.unwrap().call("bob".into()).await.unwrap();
    assert_eq!(response, "backup for bob");
    assert_eq!(*seen.lock().unwrap(), vec!["bob".to_string()]);
}

#[tokio::test]
async fn backup_failure_is_reported_as_fallback_failed() {
    let service = service_fn(|_req: ()| async move { Err::<u8, _>(TestError::new("primary")) });
    let layer = FallbackLayer::<(), u8, TestError>::service(|_req: ()| async move {
        Err(TestError::with_code("backup", 500))
    });
    let mut service = layer.layer(service);

    let err = service.ready().await.unwrap().call(()).await.unwrap_err();
    assert!(matches!(err, FallbackError::FallbackFailed(_)));
    assert_eq!(err.into_inner(), TestError::with_code("backup", 500));
}

#[tokio::test]
async fn every_call_decides_independently() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);

    let service = service_fn(move |_req: ()| {
        let n = calls_clone.fetch_add(1, Ordering::SeqCst);
        async move {
            if n % 3 == 2 {
                Err(TestError::new("flaky"))
            } else {
                Ok::<_, TestError>("upstream")
            }
        }
    });
    let mut service = FallbackLayer::<(), &'static str, TestError>::value("fallback").layer(service);

    let mut answers = Vec::new();
    for _ in 0..6 {
        answers.push(service.ready().await.unwrap().call(()).await.unwrap());
    }

    assert_eq!(
        answers,
        vec!["upstream", "upstream", "fallback", "upstream", "upstream", "fallback"]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn events_describe_each_outcome() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = Arc::clone(&events);

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let service = service_fn(move |_req: ()| {
        let first = calls_clone.fetch_add(1, Ordering::SeqCst) == 0;
        async move {
            if first {
                Ok::<_, TestError>(1u8)
            } else {
                Err(TestError::new("refused"))
            }
        }
    });

    let layer = FallbackLayer::<(), u8, TestError>::builder()
        .name("reservations")
        .value(0)
        .on_event(move |event| {
            events_clone
                .lock()
                .unwrap()
                .push((event.source_name().to_string(), event.event_type()));
        })
        .build();
    let mut service = layer.layer(service);

    service.ready().await.unwrap().call(()).await.unwrap();
    service.ready().await.unwrap().call(()).await.unwrap();

    let events = events.lock().unwrap();
    let types: Vec<&str> = events.iter().map(|(_, t)| *t).collect();
    assert_eq!(types, vec!["success", "failed_attempt", "applied"]);
    assert!(events.iter().all(|(name, _)| name == "reservations"));
}

#[tokio::test]
async fn composes_with_service_builder() {
    let layer = FallbackLayer::<u32, u32, TestError>::value(0);
    let service = ServiceBuilder::new()
        .layer(layer)
        .service_fn(|req: u32| async move {
            if req > 10 {
                Err(TestError::new("too large"))
            } else {
                Ok(req * 2)
            }
        });

    assert_eq!(service.clone().oneshot(4).await.unwrap(), 8);
    assert_eq!(service.oneshot(40).await.unwrap(), 0);
}

#[tokio::test]
async fn inner_errors_can_be_unwrapped() {
    let err: FallbackError<TestError> = FallbackError::Inner(TestError::new("refused"));
    assert!(matches!(err, FallbackError::Inner(_)));
    assert_eq!(err.inner(), &TestError::new("refused"));
    assert!(err.to_string().contains("refused"));
}
