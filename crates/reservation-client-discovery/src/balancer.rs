//! Selection strategies for choosing one instance per call.

use crate::ServiceInstance;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Picks an index into the full instance list, or `None` if nothing fits.
pub type CustomSelectorFn = Arc<dyn Fn(&[ServiceInstance]) -> Option<usize> + Send + Sync>;

/// Built-in selection strategies.
#[derive(Clone, Default)]
pub enum SelectionStrategy {
    /// Cycle through usable instances.
    #[default]
    RoundRobin,

    /// Always take the first usable instance.
    /// Best for: primary/secondary failover.
    FirstAvailable,

    /// Take a random usable instance.
    Random,

    /// Delegate to a caller supplied function.
    Custom(CustomSelectorFn),
}

impl fmt::Debug for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStrategy::RoundRobin => f.write_str("RoundRobin"),
            SelectionStrategy::FirstAvailable => f.write_str("FirstAvailable"),
            SelectionStrategy::Random => f.write_str("Random"),
            SelectionStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round-robin" => Ok(SelectionStrategy::RoundRobin),
            "first-available" => Ok(SelectionStrategy::FirstAvailable),
            "random" => Ok(SelectionStrategy::Random),
            other => Err(format!(
                "unknown selection strategy '{}' (expected round-robin, first-available or random)",
                other
            )),
        }
    }
}

/// Chooses one instance per call according to a [`SelectionStrategy`].
///
/// The round-robin position is shared by every caller of the same balancer.
#[derive(Debug, Default)]
pub struct LoadBalancer {
    strategy: SelectionStrategy,
    counter: AtomicUsize,
}

impl LoadBalancer {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self {
            strategy,
            counter: AtomicUsize::new(0),
        }
    }

    /// Picks an instance, skipping any whose status is not usable.
    pub fn choose<'a>(&self, instances: &'a [ServiceInstance]) -> Option<&'a ServiceInstance> {
        if instances.is_empty() {
            return None;
        }

        let usable: Vec<&ServiceInstance> = instances
            .iter()
            .filter(|instance| instance.status().is_usable())
            .collect();

        let idx = match &self.strategy {
            SelectionStrategy::Custom(selector) => {
                return selector(instances).and_then(|idx| instances.get(idx));
            }
            _ if usable.is_empty() => return None,
            SelectionStrategy::FirstAvailable => 0,
            SelectionStrategy::RoundRobin => {
                self.counter.fetch_add(1, Ordering::Relaxed) % usable.len()
            }
            SelectionStrategy::Random => {
                use rand::Rng;
                rand::rng().random_range(0..usable.len())
            }
        };

        Some(usable[idx])
    }
}
