//! Fuzz test for configuration value parsing
//!
//! Tests that arbitrary TOML input doesn't cause panics when parsed into
//! the encoding and inline key settings a sealbox config carries.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealbox_crypto::{Aead, Encoding, KeyMaterial};
use serde::Deserialize;

#[derive(Deserialize)]
struct Defaults {
    #[serde(default)]
    encoding: Encoding,
    key: Option<KeyMaterial>,
}

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _: Result<toml::Value, _> = toml::from_str(s);

        // Invalid settings must be rejected, not panic
        if let Ok(defaults) = toml::from_str::<Defaults>(s) {
            if let Some(key) = &defaults.key {
                let _ = Aead::from_key_material(key, &defaults.encoding);
            }
        }

        let _ = s.parse::<Encoding>();
    }
});
