// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! SHA-256 digests for request signing.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// `hex_sha256(b"")`, the payload hash of every body-less admin request.
pub const EMPTY_STRING_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Lowercase hex SHA-256 of `content`.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Raw HMAC-SHA256 of `content` under `key`.
pub fn hmac_sha256(key: &[u8], content: &[u8]) -> Vec<u8> {
    mac(key, content).finalize().into_bytes().to_vec()
}

/// Lowercase hex HMAC-SHA256 of `content` under `key`.
pub fn hex_hmac_sha256(key: &[u8], content: &[u8]) -> String {
    hex::encode(mac(key, content).finalize().into_bytes())
}

fn mac(key: &[u8], content: &[u8]) -> HmacSha256 {
    // SAFETY: HMAC accepts keys of any length, new_from_slice never fails.
    let mut mac = HmacSha256::new_from_slice(key).unwrap();
    mac.update(content);
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_hex_sha256() {
        assert_eq!(hex_sha256(b""), EMPTY_STRING_SHA256);
        assert_eq!(
            hex_sha256(b"Hello,World!"),
            "8f4ec1811c6c4261c97a7423b3a56d69f0f160074f39745af20bb5fcf65ccf78"
        );
    }

    #[test]
    fn test_hmac_sha256() {
        let expected = "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8";

        assert_eq!(hex_hmac_sha256(b"key", FOX), expected);
        assert_eq!(hex::encode(hmac_sha256(b"key", FOX)), expected);
    }
}
