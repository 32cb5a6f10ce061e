//! Descriptor-driven dynamic message model.
//!
//! The one narrow seam that needs schema reflection: compile `.proto` text
//! into a descriptor pool at run time, then marshal between JSON and the
//! protobuf wire format with no compiled message types anywhere.
//!
//! # Contract
//! - [`compile`]: proto sources → [`DescriptorPool`]
//! - [`json_to_wire`]: JSON bytes → wire bytes, driven by one descriptor
//! - [`wire_to_json`]: wire bytes → JSON bytes, defaults emitted explicitly
//! - [`zero_value_json`]: introspection example for a message type

use std::path::{Path, PathBuf};

use prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor, SerializeOptions};
use thiserror::Error;

use crate::error::SchemaError;

/// Failure to move a payload across the JSON/wire boundary.
#[derive(Debug, Error)]
pub enum DynamicError {
    #[error("json does not match schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed wire payload: {0}")]
    Wire(#[from] prost::DecodeError),
}

/// Compile `files` (paths relative to `import_root`) as one linked unit.
pub fn compile(import_root: &Path, files: &[PathBuf]) -> Result<DescriptorPool, SchemaError> {
    let set = protox::compile(files, [import_root])?;
    Ok(DescriptorPool::from_file_descriptor_set(set)?)
}

/// Parse `json` against the descriptor's field layout and serialize to the
/// binary wire form. Trailing garbage after the JSON value is an error.
pub fn json_to_wire(desc: &MessageDescriptor, json: &[u8]) -> Result<Vec<u8>, DynamicError> {
    let mut de = serde_json::Deserializer::from_slice(json);
    let msg = DynamicMessage::deserialize(desc.clone(), &mut de)?;
    de.end()?;
    Ok(msg.encode_to_vec())
}

/// Parse `wire` as the binary form and re-emit as JSON. Default-valued
/// fields are included explicitly; presence is not used to omit zeros.
pub fn wire_to_json(desc: &MessageDescriptor, wire: &[u8]) -> Result<Vec<u8>, DynamicError> {
    let msg = DynamicMessage::decode(desc.clone(), wire)?;
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::new(&mut out);
    msg.serialize_with_options(&mut ser, &SerializeOptions::new().skip_default_fields(false))?;
    Ok(out)
}

/// Zero-valued JSON example for a message type, with original field names
/// and numeric enums, used by the manager's type listing.
pub fn zero_value_json(desc: &MessageDescriptor) -> Result<String, DynamicError> {
    let msg = DynamicMessage::new(desc.clone());
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::new(&mut out);
    let options = SerializeOptions::new()
        .skip_default_fields(false)
        .use_proto_field_name(true)
        .use_enum_numbers(true);
    msg.serialize_with_options(&mut ser, &options)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
