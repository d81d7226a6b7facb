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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use std::time::Duration;

// Headers used in signing.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_PREFIX: &str = "x-amz-";
pub const CONTENT_MD5: &str = "content-md5";

/// Content type signed when the caller did not set one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

// Signing scope. The gateway validates against these fixed values, not the
// caller's real region.
pub const SIGN_ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SIGN_KEY_PREFIX: &str = "AWS4";
pub const SIGN_REGION: &str = "us-east-1";
pub const SIGN_SERVICE: &str = "s3";
pub const SIGN_TERMINATOR: &str = "aws4_request";

// Env values used to configure the admin client.
pub const RADOSGW_ENDPOINT: &str = "RADOSGW_ENDPOINT";
pub const RADOSGW_ACCESS_KEY: &str = "RADOSGW_ACCESS_KEY";
pub const RADOSGW_SECRET_KEY: &str = "RADOSGW_SECRET_KEY";
pub const RADOSGW_ADMIN_PREFIX: &str = "RADOSGW_ADMIN_PREFIX";
pub const RADOSGW_TIMEOUT: &str = "RADOSGW_TIMEOUT";

pub const DEFAULT_ADMIN_PREFIX: &str = "/admin";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - `/` is kept as is in paths.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query, spaces end up as `%20` rather than `+`.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
