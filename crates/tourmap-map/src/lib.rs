//! Interactive map annotation: SDK loading, marker placement, viewport
//! fitting, marker selection and the place detail side panel.

pub mod controller;
pub mod error;
pub mod headless;
pub mod loader;
pub mod panel;
pub mod registry;
pub mod selection;
pub mod surface;

pub use controller::{LoadOutcome, MapAnnotationController, SelectOutcome, ZoomPolicy};
pub use error::{MapError, ScriptLoadError};
pub use headless::{HeadlessMap, HeadlessMarker};
pub use loader::{HttpScriptSource, LoadStatus, ScriptLoader, ScriptSource, CALLBACK_NAME};
pub use panel::{PanelView, PLACEHOLDER};
pub use registry::{MarkerRegistry, RegisteredMarker};
pub use selection::{Selection, SelectionState, SelectionToken};
pub use surface::{MapSurface, MarkerIcon, MarkerId};
