//! Scene and frame label table (tag 86), written with variable-length integers.

use tagstream_bits::{variable_u32_len, BitCursor, TextEncoding};

use super::code;
use crate::header::RecordHeader;
use crate::record::{body_len, Record};
use crate::{CodecError, Context};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    /// Frame at which the scene starts.
    pub offset: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLabelEntry {
    pub frame: u32,
    pub label: String,
}

/// Scene boundaries and frame labels of the main timeline.
///
/// Counts and frame numbers are variable-length integers; names are
/// null-terminated strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineSceneAndFrameLabelData {
    pub scenes: Vec<Scene>,
    pub labels: Vec<FrameLabelEntry>,
}

fn count_len(count: usize) -> Result<usize, CodecError> {
    let count = u32::try_from(count).map_err(|_| CodecError::InvalidValue {
        field: "scene data entry count",
        value: count as i64,
    })?;
    Ok(variable_u32_len(count))
}

fn entry_len(number: u32, text: &str, encoding: TextEncoding) -> Result<usize, CodecError> {
    Ok(variable_u32_len(number) + encoding.encoded_len(text)? + 1)
}

fn write_count(cursor: &mut BitCursor, count: usize) -> Result<(), CodecError> {
    let count = u32::try_from(count).map_err(|_| CodecError::InvalidValue {
        field: "scene data entry count",
        value: count as i64,
    })?;
    cursor.write_variable_u32(count)?;
    Ok(())
}

impl Record for DefineSceneAndFrameLabelData {
    fn type_code(&self) -> u16 {
        code::DEFINE_SCENE_AND_FRAME_LABEL_DATA
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        let scene_count = cursor.read_variable_u32()?;
        self.scenes.clear();
        for _ in 0..scene_count {
            let offset = cursor.read_variable_u32()?;
            let name = cursor.read_string(encoding)?;
            self.scenes.push(Scene { offset, name });
        }
        let label_count = cursor.read_variable_u32()?;
        self.labels.clear();
        for _ in 0..label_count {
            let frame = cursor.read_variable_u32()?;
            let label = cursor.read_string(encoding)?;
            self.labels.push(FrameLabelEntry { frame, label });
        }
        Ok(())
    }

    fn prepare_to_encode(&self, ctx: &mut Context) -> Result<u32, CodecError> {
        let encoding = ctx.text_encoding()?;
        let mut size = count_len(self.scenes.len())? + count_len(self.labels.len())?;
        for scene in &self.scenes {
            size += entry_len(scene.offset, &scene.name, encoding)?;
        }
        for label in &self.labels {
            size += entry_len(label.frame, &label.label, encoding)?;
        }
        body_len(code::DEFINE_SCENE_AND_FRAME_LABEL_DATA, size)
    }

    fn encode(&self, cursor: &mut BitCursor, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        write_count(cursor, self.scenes.len())?;
        for scene in &self.scenes {
            cursor.write_variable_u32(scene.offset)?;
            cursor.write_string(&scene.name, encoding)?;
        }
        write_count(cursor, self.labels.len())?;
        for label in &self.labels {
            cursor.write_variable_u32(label.frame)?;
            cursor.write_string(&label.label, encoding)?;
        }
        Ok(())
    }
}
