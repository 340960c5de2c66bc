use component_macros::Component;
use di_abstractions::{Lifetime, RegisterableComponent};
use std::sync::Arc;

#[derive(Default)]
struct Clock;

#[derive(Component)]
#[component(transient)]
struct Scheduler {
    clock: Arc<Clock>,
    backup: Option<Arc<Clock>>,
    ticks: u64,
}

#[derive(Component)]
struct Marker;

fn main() {
    let registration = Scheduler::registration();
    assert_eq!(registration.lifetime, Lifetime::Transient);
    assert_eq!(registration.dependencies.len(), 2);
    assert_eq!(Marker::registration().lifetime, Lifetime::Singleton);
}
