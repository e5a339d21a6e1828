use serde::Serialize;

use crate::controller::ControllerSnapshot;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    StateChanged { snapshot: ControllerSnapshot },
    StaleResponseDiscarded { form: String, generation: u64 },
}
