#![deny(warnings)]
#![allow(dead_code)]

extern crate pretty_env_logger;

#[macro_use]
extern crate log as log_crate;

pub mod config;
#[cfg(feature = "bake")]
pub mod job;
#[cfg(feature = "bake")]
pub mod light_baker;
pub mod map;
pub mod math;
pub mod mem;
pub mod mixer;
pub mod passes;
pub mod platform;
pub mod render;
pub mod rhi;
pub mod tools;
pub mod ui;

/// Things used in almost every part of a game built on this engine.
pub mod prelude {
    pub use {
        super::{
            math::Extent,
            platform::{AudioHooks, AudioOutputPlugin, FilesystemPlugin, PlatformHooks, PlatformIo},
        },
        log_crate::{debug, error, info, trace, warn},
    };
}

pub(crate) mod private {
    pub trait Sealed {}
}

mod error;

pub use self::error::{BakeError, DriverError, MapError, MapParseError, MemError, MixerError};
