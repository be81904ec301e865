// crates/framedeck-ui/src/modules/mod.rs
//
// Module registry. To add a new panel:
//   1. Create modules/mypanel.rs implementing ClientModule
//   2. Add `pub mod mypanel;` below
//   3. Call it from the panel layout in app.rs

pub mod gallery;
pub mod lightbox;
pub mod status;
pub mod submit;

use framedeck_core::commands::ClientCommand;
use framedeck_core::state::SessionState;

use crate::context::FrameCaches;
use egui::Ui;

/// Every panel implements this trait.
/// Modules read state, emit commands — they never mutate state directly.
/// Frame image needs are routed through FrameCaches::request so the app
/// can dispatch fetches with a bounded number in flight.
pub trait ClientModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui:     &mut Ui,
        state:  &SessionState,
        caches: &mut FrameCaches,
        cmd:    &mut Vec<ClientCommand>,
    );
}
