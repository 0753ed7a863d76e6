//! Action records and the action registry.
//!
//! Actions use the one-byte header layout: codes below 0x80 have no body,
//! codes from 0x80 carry a 16-bit length.

mod basic;
mod constant_pool;
mod get_url;
mod goto_frame;
mod push;

use std::sync::{Arc, OnceLock};

pub use basic::BasicAction;
pub use constant_pool::ConstantPool;
pub use get_url::GetUrl;
pub use goto_frame::GotoFrame;
pub use push::{Push, PushValue};

use crate::header::{HeaderFormat, ACTION_WITH_BODY};
use crate::record::Record;
use crate::registry::TypeRegistry;

/// Action codes.
pub mod code {
    pub const NEXT_FRAME: u16 = 0x04;
    pub const PREVIOUS_FRAME: u16 = 0x05;
    pub const PLAY: u16 = 0x06;
    pub const STOP: u16 = 0x07;
    pub const POP: u16 = 0x17;
    pub const GET_VARIABLE: u16 = 0x1c;
    pub const SET_VARIABLE: u16 = 0x1d;
    pub const TRACE: u16 = 0x26;
    pub const GOTO_FRAME: u16 = 0x81;
    pub const GET_URL: u16 = 0x83;
    pub const CONSTANT_POOL: u16 = 0x88;
    pub const PUSH: u16 = 0x96;
}

fn boxed<T: Record + Default>(_: u16) -> Box<dyn Record> {
    Box::<T>::default()
}

/// Builds a registry binding every body-less action code and the modelled
/// actions with bodies.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new(HeaderFormat::Action)
        .with(code::GOTO_FRAME, boxed::<GotoFrame>)
        .with(code::GET_URL, boxed::<GetUrl>)
        .with(code::CONSTANT_POOL, boxed::<ConstantPool>)
        .with(code::PUSH, boxed::<Push>);
    for action_code in 1..ACTION_WITH_BODY {
        registry.register(action_code, BasicAction::boxed);
    }
    registry
}

/// Process-wide action registry, built on first use.
pub fn shared_registry() -> Arc<TypeRegistry> {
    static REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Arc::new(registry())).clone()
}
