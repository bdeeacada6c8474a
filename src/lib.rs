// lib.rs

pub use std::{
    net,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

pub use anyhow::bail;
pub use chrono::*;
pub use ::serde::{Deserialize, Serialize};
pub use tokio::time::{Duration, sleep};
pub use tracing::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod units;
pub use units::*;

mod settings;
pub use settings::*;

mod sensorlog;
pub use sensorlog::*;

mod span;
pub use span::*;

mod graph;
pub use graph::*;

mod auth;
pub use auth::*;

mod view;
pub use view::*;

mod state;
pub use state::*;

mod apiserver;
pub use apiserver::*;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// EOF
