//! Tag records and the tag registry.
//!
//! Only a representative subset of tag types is modelled. Every other tag
//! decodes to [`crate::OpaqueRecord`] and round-trips unchanged.

mod do_action;
mod file_attributes;
mod frame_label;
mod scaling_grid;
mod scene_data;
mod script_limits;
mod set_background_color;
mod show_frame;
mod sprite;

use std::sync::{Arc, OnceLock};

pub use do_action::{ActionBlock, DoAction};
pub use file_attributes::FileAttributes;
pub use frame_label::FrameLabel;
pub use scaling_grid::DefineScalingGrid;
pub use scene_data::{DefineSceneAndFrameLabelData, FrameLabelEntry, Scene};
pub use script_limits::ScriptLimits;
pub use set_background_color::SetBackgroundColor;
pub use show_frame::ShowFrame;
pub use sprite::DefineSprite;

use crate::header::HeaderFormat;
use crate::record::Record;
use crate::registry::TypeRegistry;

/// Tag type codes.
pub mod code {
    pub const SHOW_FRAME: u16 = 1;
    pub const SET_BACKGROUND_COLOR: u16 = 9;
    pub const DO_ACTION: u16 = 12;
    pub const DEFINE_SPRITE: u16 = 39;
    pub const FRAME_LABEL: u16 = 43;
    pub const SCRIPT_LIMITS: u16 = 65;
    pub const FILE_ATTRIBUTES: u16 = 69;
    pub const DEFINE_SCALING_GRID: u16 = 78;
    pub const DEFINE_SCENE_AND_FRAME_LABEL_DATA: u16 = 86;
}

fn boxed<T: Record + Default>(_: u16) -> Box<dyn Record> {
    Box::<T>::default()
}

/// Builds a registry binding every modelled tag type.
pub fn registry() -> TypeRegistry {
    TypeRegistry::new(HeaderFormat::Tag)
        .with(code::SHOW_FRAME, boxed::<ShowFrame>)
        .with(code::SET_BACKGROUND_COLOR, boxed::<SetBackgroundColor>)
        .with(code::DO_ACTION, boxed::<DoAction>)
        .with(code::DEFINE_SPRITE, boxed::<DefineSprite>)
        .with(code::FRAME_LABEL, boxed::<FrameLabel>)
        .with(code::SCRIPT_LIMITS, boxed::<ScriptLimits>)
        .with(code::FILE_ATTRIBUTES, boxed::<FileAttributes>)
        .with(code::DEFINE_SCALING_GRID, boxed::<DefineScalingGrid>)
        .with(code::DEFINE_SCENE_AND_FRAME_LABEL_DATA, boxed::<DefineSceneAndFrameLabelData>)
}

/// Process-wide tag registry, built on first use.
pub fn shared_registry() -> Arc<TypeRegistry> {
    static REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Arc::new(registry())).clone()
}
