//! Selective handling: only matching errors are answered by the fallback.

use super::TestError;
use reservation_client_core::ClientEvent;
use reservation_client_fallback::{FallbackError, FallbackLayer};
use std::sync::{Arc, Mutex};
use tower::{service_fn, Layer, ServiceExt};

fn layer() -> FallbackLayer<u16, String, TestError> {
    FallbackLayer::builder()
        .value("fallback".to_string())
        .handle(|e: &TestError| e.code >= 500)
        .build()
}

#[tokio::test]
async fn matching_errors_fall_back() {
    let service = layer().layer(service_fn(|code: u16| async move {
        Err::<String, _>(TestError::with_code("upstream", code))
    }));

    assert_eq!(service.clone().oneshot(503).await.unwrap(), "fallback");
    assert_eq!(service.oneshot(500).await.unwrap(), "fallback");
}

#[tokio::test]
async fn other_errors_propagate_unchanged() {
    let service = layer().layer(service_fn(|code: u16| async move {
        Err::<String, _>(TestError::with_code("upstream", code))
    }));

    let err = service.oneshot(404).await.unwrap_err();
    assert!(matches!(err, FallbackError::Inner(_)));
    assert_eq!(err.into_inner(), TestError::with_code("upstream", 404));
}

#[tokio::test]
async fn propagated_errors_emit_skipped() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = Arc::clone(&events);

    let layer = FallbackLayer::<u16, String, TestError>::builder()
        .value("fallback".to_string())
        .handle(|e: &TestError| e.code >= 500)
        .on_event(move |event| events_clone.lock().unwrap().push(event.event_type()))
        .build();
    let service = layer.layer(service_fn(|code: u16| async move {
        Err::<String, _>(TestError::with_code("upstream", code))
    }));

    let _ = service.oneshot(400).await;
    assert_eq!(*events.lock().unwrap(), vec!["skipped"]);
}
