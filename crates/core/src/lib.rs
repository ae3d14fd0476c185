//! `bus-assistant-core`: application services over the stop index.
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`service`]     | `StopIndexService`, `IndexStatus`                     |
//! | [`dataset`]     | `JsonStopSource`, `parse_stops`                       |
//! | [`favourites`]  | `FavouriteStops`, `FavouriteEta`                      |
//! | [`config`]      | `ServiceConfig`                                       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod dataset;
pub mod error;
pub mod favourites;
pub mod service;

// Re-export transit from the transit crate
pub use bus_assistant_transit as transit;

pub use config::ServiceConfig;
pub use dataset::JsonStopSource;
pub use error::{CoreError, CoreResult};
pub use favourites::{FavouriteEta, FavouriteStops};
pub use service::{IndexStatus, StopIndexService};
