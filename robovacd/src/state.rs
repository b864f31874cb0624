use std::sync::Arc;

use robovac_core::{Registry, bus::Bus};
use robovac_sdk::VacuumComponent;

use crate::replay::ReplayTransport;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub bus: Arc<dyn Bus>,
    pub vacuum: VacuumComponent,
    pub transport: Arc<ReplayTransport>,
}
