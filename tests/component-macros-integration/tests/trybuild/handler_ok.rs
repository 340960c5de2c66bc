use component_macros::Component;
use di_abstractions::{CapabilityKey, RegisterableComponent};
use infrastructure_common::{ApplicationStartedEvent, Handle, HandlerResult};

#[derive(Component)]
#[component(handles(ApplicationStartedEvent))]
struct Greeter;

#[async_trait::async_trait]
impl Handle<ApplicationStartedEvent> for Greeter {
    async fn handle(&self, _event: &ApplicationStartedEvent) -> HandlerResult {
        Ok(())
    }
}

fn main() {
    let registration = Greeter::registration();
    assert!(registration.provides(&CapabilityKey::handles::<ApplicationStartedEvent>()));
}
