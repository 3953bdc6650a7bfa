pub mod controller;
pub mod observer;
pub mod shared;
pub mod utils;

pub use controller::{ForecastController, WeekSummary};
pub use observer::{
    ForecastEvent, ForecastObserver, NullObserver, Placement, RecordingObserver, TracingObserver,
};
pub use shared::SharedController;
