//! The layer as the reservations client uses it.

use reservation_client::{
    FindAll, Reservation, ReservationsClient, ReservationsFallback, Resources, WithFallback,
    FALLBACK_NAMES,
};
use reservation_client_core::ClientError;
use std::task::{Context, Poll};
use tower::Service;

#[derive(Clone)]
struct Down;

impl Service<FindAll> for Down {
    type Response = Resources<Reservation>;
    type Error = ClientError;
    type Future = futures::future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: FindAll) -> Self::Future {
        futures::future::ready(Err(ClientError::NoInstances {
            service: "reservationservice".into(),
        }))
    }
}

#[derive(Clone)]
struct Up(Vec<&'static str>);

impl Service<FindAll> for Up {
    type Response = Resources<Reservation>;
    type Error = ClientError;
    type Future = futures::future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: FindAll) -> Self::Future {
        futures::future::ready(Ok(self.0.iter().copied().map(Reservation::new).collect()))
    }
}

#[tokio::test]
async fn every_failure_kind_is_absorbed() {
    let client = WithFallback::new(Down, ReservationsFallback);

    let names = client.find_all().await.unwrap().names();
    assert_eq!(names, FALLBACK_NAMES.to_vec());
}

#[tokio::test]
async fn upstream_data_wins_when_available() {
    let client = WithFallback::new(Up(vec!["Alice", "Bob"]), ReservationsFallback);

    assert_eq!(client.find_all().await.unwrap().names(), vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn an_empty_upstream_answer_is_not_a_failure() {
    let client = WithFallback::new(Up(Vec::new()), ReservationsFallback);

    assert!(client.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn clients_are_usable_behind_a_trait_object() {
    let clients: Vec<Box<dyn ReservationsClient>> = vec![
        Box::new(WithFallback::new(Down, ReservationsFallback)),
        Box::new(ReservationsFallback),
    ];

    for client in clients {
        assert_eq!(client.find_all().await.unwrap().names(), FALLBACK_NAMES.to_vec());
    }
}
