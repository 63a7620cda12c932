//! Base64/NBT request envelope
//!
//! The wire contract of the C ABI: requests arrive as Base64 of
//! little-endian NBT with `fromVersion`, `toVersion`, `fromEdition`,
//! `toEdition` and a required `data` compound. Responses leave the same
//! way: `{success: 1, data}` or `{success: 0, error, stackTrace}`.
//!
//! [`process`] never panics and always returns Base64. If even the error
//! response fails to serialize, the terminal fallback is the Base64 of a
//! fixed plain-text marker.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::error;

use crate::convert::{self, ConvertError, Kind};
use crate::model::Edition;
use crate::nbt::{self, Compound, Tag};
use crate::{cache, versions};

/// Version strings assumed when a request omits them.
pub const DEFAULT_FROM_VERSION: &str = "1.20.4";
pub const DEFAULT_TO_VERSION: &str = "1.20.80";

const DOUBLE_FAILURE: &str = "FATAL: Double serialization failure";

/// Run one conversion request through the full wire path.
pub fn process(kind: Kind, input: &str) -> String {
    match run(kind, input) {
        Ok(data) => respond_success(data),
        Err(err) => {
            error!(kind = %kind, error = %err, "Conversion failed");
            respond_failure(&err)
        }
    }
}

fn run(kind: Kind, input: &str) -> Result<Compound, ConvertError> {
    let bytes = BASE64.decode(input.trim())?;
    let request = nbt::read_le(&bytes)?;

    let from_version = request.string_or("fromVersion", DEFAULT_FROM_VERSION);
    let to_version = request.string_or("toVersion", DEFAULT_TO_VERSION);
    let from: Edition = request.string_or("fromEdition", "java").parse()?;
    let to: Edition = request.string_or("toEdition", "bedrock").parse()?;
    let data = request
        .get_compound("data")
        .ok_or(ConvertError::MissingData)?;

    let (java_version, bedrock_version) = assign_versions(from, to, from_version, to_version);
    let cache = cache::get_or_create(&java_version, &bedrock_version)?;
    convert::convert(kind, &cache, from, to, data)
}

/// Hand each edition the version requested for it. When an edition
/// appears on neither side of the direction its cache slot gets the
/// latest supported version.
pub(crate) fn assign_versions(
    from: Edition,
    to: Edition,
    from_version: &str,
    to_version: &str,
) -> (String, String) {
    let pick = |edition: Edition| {
        if from == edition {
            from_version.to_string()
        } else if to == edition {
            to_version.to_string()
        } else {
            versions::latest(edition).to_string()
        }
    };
    (pick(Edition::Java), pick(Edition::Bedrock))
}

fn respond_success(data: Compound) -> String {
    let mut response = Compound::new();
    response.put("success", Tag::Byte(1));
    response.put("data", data);
    encode(&response)
}

fn respond_failure(err: &ConvertError) -> String {
    let mut response = Compound::new();
    response.put("success", Tag::Byte(0));
    response.put("error", err.message());
    response.put("stackTrace", err.stack_trace());
    encode(&response)
}

fn encode(response: &Compound) -> String {
    match nbt::write_le(response) {
        Ok(bytes) => BASE64.encode(bytes),
        Err(err) => {
            error!(error = %err, "Failed to serialize response");
            BASE64.encode(DOUBLE_FAILURE)
        }
    }
}

/// Encode a request compound the way a wire client would. Used by the
/// CLI envelope tool and tests.
pub fn encode_request(request: &Compound) -> Result<String, ConvertError> {
    Ok(BASE64.encode(nbt::write_le(request)?))
}

/// Decode a wire response back into a compound.
pub fn decode_response(response: &str) -> Result<Compound, ConvertError> {
    Ok(nbt::read_le(&BASE64.decode(response.trim())?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind_data: Compound) -> Compound {
        let mut request = Compound::new();
        request.put("fromVersion", "1.20.4");
        request.put("toVersion", "1.20.80");
        request.put("fromEdition", "java");
        request.put("toEdition", "bedrock");
        request.put("data", kind_data);
        request
    }

    #[test]
    fn test_block_roundtrip_through_the_wire() {
        let mut data = Compound::new();
        data.put("id", "minecraft:stone");

        let encoded = encode_request(&request(data)).unwrap();
        let response = decode_response(&process(Kind::Block, &encoded)).unwrap();

        assert_eq!(response.get_int("success"), Some(1));
        let data = response.get_compound("data").unwrap();
        assert_eq!(data.get_str("id"), Some("minecraft:stone"));
    }

    #[test]
    fn test_defaults_apply_when_fields_are_absent() {
        let mut data = Compound::new();
        data.put("id", "minecraft:stone");
        let mut bare = Compound::new();
        bare.put("data", data);

        let encoded = encode_request(&bare).unwrap();
        let response = decode_response(&process(Kind::Block, &encoded)).unwrap();
        assert_eq!(response.get_int("success"), Some(1));
    }

    #[test]
    fn test_missing_data_field() {
        let encoded = encode_request(&Compound::new()).unwrap();
        let response = decode_response(&process(Kind::Block, &encoded)).unwrap();
        assert_eq!(response.get_int("success"), Some(0));
        assert_eq!(
            response.get_str("error"),
            Some("Missing 'data' field in input NBT")
        );
        assert!(response.get_str("stackTrace").is_some());
    }

    #[test]
    fn test_invalid_base64_is_a_wire_error() {
        let response = decode_response(&process(Kind::Block, "!!not base64!!")).unwrap();
        assert_eq!(response.get_int("success"), Some(0));
        assert!(response
            .get_str("error")
            .unwrap()
            .starts_with("Failed to decode Base64 input"));
    }

    #[test]
    fn test_unknown_edition_is_reported() {
        let mut request = Compound::new();
        request.put("fromEdition", "pocket");
        request.put("data", Compound::new());

        let encoded = encode_request(&request).unwrap();
        let response = decode_response(&process(Kind::Block, &encoded)).unwrap();
        assert_eq!(response.get_int("success"), Some(0));
        assert_eq!(response.get_str("error"), Some("Unknown edition: pocket"));
    }

    #[test]
    fn test_failure_carries_the_exact_message() {
        let mut data = Compound::new();
        data.put("id", "minecraft:creeper");

        let encoded = encode_request(&request(data)).unwrap();
        let response = decode_response(&process(Kind::Entity, &encoded)).unwrap();
        // block-shaped data through the entity conversion
        assert_eq!(response.get_int("success"), Some(0));
        let error = response.get_str("error").unwrap();
        assert!(error.starts_with("Failed to parse Java entity NBT"));
    }

    #[test]
    fn test_version_assignment_follows_the_direction() {
        // bedrock→java: fromVersion is the Bedrock version
        let (java, bedrock) =
            assign_versions(Edition::Bedrock, Edition::Java, "1.20.80", "1.20.4");
        assert_eq!(java, "1.20.4");
        assert_eq!(bedrock, "1.20.80");

        // same-edition: the other slot falls back to latest
        let (java, bedrock) =
            assign_versions(Edition::Java, Edition::Java, "1.20.4", "1.20.4");
        assert_eq!(java, "1.20.4");
        assert_eq!(bedrock, versions::latest(Edition::Bedrock).to_string());
    }
}
