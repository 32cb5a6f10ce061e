//! Codec descriptor parsing.
//!
//! Grammar: `spec := entry (";" entry)*`, `entry := name ":" params` where
//! `params` is a JSON object whose fields populate the named codec's
//! configuration. Empty spans between separators are tolerated (trailing
//! semicolons), but an entry without a `:` separator fails immediately and
//! the first invalid entry aborts the whole parse.

use std::sync::Arc;

use crate::codec::{aes, base64, gzip, proto, rc4, url, Codec, CodecChain};
use crate::error::CodecError;
use crate::schema::SchemaRegistry;

/// Parse a descriptor string into an ordered codec chain.
///
/// The registry handle is captured by any `pb` entries for descriptor
/// lookups at encode/decode time.
pub fn parse_chain(desc: &str, registry: &Arc<SchemaRegistry>) -> Result<CodecChain, CodecError> {
    if desc.is_empty() {
        return Err(CodecError::EmptySpec);
    }
    let mut codecs = Vec::new();
    for span in desc.split(';') {
        if span.is_empty() {
            continue;
        }
        let (name, params) = span
            .split_once(':')
            .ok_or_else(|| CodecError::MalformedEntry(span.to_string()))?;
        codecs.push(build_codec(name, params, registry)?);
    }
    Ok(CodecChain::new(codecs))
}

fn build_codec(
    name: &str,
    params: &str,
    registry: &Arc<SchemaRegistry>,
) -> Result<Codec, CodecError> {
    let invalid = |source| CodecError::InvalidParams {
        name: name.to_string(),
        source,
    };
    let codec = match name {
        "pb" => {
            let config: proto::ProtoConfig = serde_json::from_str(params).map_err(invalid)?;
            Codec::Proto(proto::ProtoCodec::new(config, Arc::clone(registry)))
        }
        "rc4" => Codec::Rc4(serde_json::from_str::<rc4::Rc4Codec>(params).map_err(invalid)?),
        "aes" => Codec::Aes(serde_json::from_str::<aes::AesCodec>(params).map_err(invalid)?),
        "gzip" => Codec::Gzip(serde_json::from_str::<gzip::GzipCodec>(params).map_err(invalid)?),
        "base64" => {
            Codec::Base64(serde_json::from_str::<base64::Base64Codec>(params).map_err(invalid)?)
        }
        "url" => Codec::Url(serde_json::from_str::<url::UrlCodec>(params).map_err(invalid)?),
        _ => return Err(CodecError::UnknownCodec(name.to_string())),
    };
    Ok(codec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<SchemaRegistry> {
        Arc::new(SchemaRegistry::new("/nonexistent", "protos"))
    }

    #[test]
    fn test_empty_spec_fails() {
        assert!(matches!(
            parse_chain("", &registry()),
            Err(CodecError::EmptySpec)
        ));
    }

    #[test]
    fn test_single_entry() {
        let chain = parse_chain("base64:{}", &registry()).unwrap();
        assert_eq!(chain.names(), ["base64"]);
    }

    #[test]
    fn test_unknown_codec_fails() {
        assert!(matches!(
            parse_chain("unknown:{}", &registry()),
            Err(CodecError::UnknownCodec(name)) if name == "unknown"
        ));
    }

    #[test]
    fn test_chain_order_preserved() {
        let chain = parse_chain("base64:{};gzip:{}", &registry()).unwrap();
        assert_eq!(chain.names(), ["base64", "gzip"]);
    }

    #[test]
    fn test_missing_separator_fails() {
        assert!(matches!(
            parse_chain("base64", &registry()),
            Err(CodecError::MalformedEntry(entry)) if entry == "base64"
        ));
        // the first invalid entry aborts the parse
        assert!(parse_chain("gzip:{};base64", &registry()).is_err());
    }

    #[test]
    fn test_trailing_semicolon_tolerated() {
        let chain = parse_chain("gzip:{};", &registry()).unwrap();
        assert_eq!(chain.names(), ["gzip"]);
    }

    #[test]
    fn test_params_populate_config() {
        let chain = parse_chain(r#"rc4:{"key":"s3cret"}"#, &registry()).unwrap();
        assert_eq!(chain.names(), ["rc4"]);
        let encoded = chain.encode_all(b"data").unwrap();
        assert_eq!(chain.inverted().decode_all(&encoded).unwrap(), b"data");
    }

    #[test]
    fn test_bad_params_fail() {
        assert!(matches!(
            parse_chain("rc4:not-json", &registry()),
            Err(CodecError::InvalidParams { name, .. }) if name == "rc4"
        ));
    }

    #[test]
    fn test_pb_entry_builds() {
        let chain = parse_chain(r#"pb:{"req":"a.B","res":"a.C"}"#, &registry()).unwrap();
        assert_eq!(chain.names(), ["pb"]);
    }
}
