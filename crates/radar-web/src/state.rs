//! Application state.

use radar_core::QueryController;

/// Application state shared across handlers.
///
/// The dashboard is a single view, so one controller backs every request.
#[derive(Clone)]
pub struct AppState {
    pub controller: QueryController,
}

impl AppState {
    pub fn new(controller: QueryController) -> Self {
        Self { controller }
    }
}
