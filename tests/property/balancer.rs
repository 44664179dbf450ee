//! Balancer invariants over arbitrary instance sets.

use proptest::prelude::*;
use reservation_client_discovery::{InstanceStatus, LoadBalancer, SelectionStrategy, ServiceInstance};
use std::collections::HashMap;

fn status() -> impl Strategy<Value = InstanceStatus> {
    prop_oneof![
        3 => Just(InstanceStatus::Up),
        1 => Just(InstanceStatus::Down),
        1 => Just(InstanceStatus::Starting),
        1 => Just(InstanceStatus::OutOfService),
        1 => Just(InstanceStatus::Unknown),
    ]
}

fn instances() -> impl Strategy<Value = Vec<ServiceInstance>> {
    prop::collection::vec(status(), 1..12).prop_map(|statuses| {
        statuses
            .into_iter()
            .enumerate()
            .map(|(i, status)| {
                ServiceInstance::parse("reservationservice", &format!("http://10.0.0.{}:8000", i + 1))
                    .unwrap()
                    .with_status(status)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn round_robin_is_fair_across_usable_instances(instances in instances(), rounds in 1usize..6) {
        let usable = instances.iter().filter(|i| i.status().is_usable()).count();
        let balancer = LoadBalancer::new(SelectionStrategy::RoundRobin);

        let mut hits: HashMap<String, usize> = HashMap::new();
        for _ in 0..usable * rounds {
            let chosen = balancer.choose(&instances).unwrap();
            *hits.entry(chosen.uri().to_string()).or_default() += 1;
        }

        prop_assert_eq!(hits.len(), usable);
        prop_assert!(hits.values().all(|&n| n == rounds));
    }

    #[test]
    fn only_usable_instances_are_chosen(instances in instances(), calls in 1usize..30) {
        for strategy in [SelectionStrategy::RoundRobin, SelectionStrategy::FirstAvailable, SelectionStrategy::Random] {
            let balancer = LoadBalancer::new(strategy);
            for _ in 0..calls {
                match balancer.choose(&instances) {
                    Some(chosen) => prop_assert!(chosen.status().is_usable()),
                    None => prop_assert!(instances.iter().all(|i| !i.status().is_usable())),
                }
            }
        }
    }
}
