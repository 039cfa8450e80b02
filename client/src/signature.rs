//! RPC signature v1: HMAC-SHA1 over the canonicalized, percent-encoded query string.

use base64::{
    engine::general_purpose::STANDARD,
    Engine as _,
};
use hmac::{
    Hmac,
    Mac as _,
};
use sha1::Sha1;
use urlencoding::encode;

/// Sort `params` by key and join them into the canonical query string.
pub(crate) fn canonical_query(params: &[(String, String)]) -> String {
    let mut sorted = params.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn string_to_sign(method: &str, canonical_query: &str) -> String {
    format!("{}&{}&{}", method, encode("/"), encode(canonical_query))
}

/// Compute the base64 encoded signature for a GET request with the given parameters.
pub fn sign(access_key_secret: &str, params: &[(String, String)]) -> String {
    let to_sign = string_to_sign("GET", &canonical_query(params));
    let mut mac = Hmac::<Sha1>::new_from_slice(format!("{access_key_secret}&").as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(to_sign.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
