/*
[INPUT]:  Query parameters, API secret, wall-clock milliseconds
[OUTPUT]: Parameters extended with timestamp, recvWindow and HMAC signature
[POS]:    HTTP layer - request signing for private endpoints
[UPDATE]: When changing signing algorithm or signed field layout
*/

use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::types::QueryParams;

type HmacSha256 = Hmac<Sha256>;

/// Default server-side tolerance for stale timestamps, in milliseconds
pub const DEFAULT_RECV_WINDOW: u64 = 5000;

/// Signs query strings for private (`USER_DATA` / `TRADE`) endpoints
#[derive(Debug, Clone)]
pub struct RequestSigner {
    secret: SecretString,
    recv_window: u64,
}

impl RequestSigner {
    pub fn new(secret: SecretString, recv_window: u64) -> Self {
        Self {
            secret,
            recv_window,
        }
    }

    pub fn recv_window(&self) -> u64 {
        self.recv_window
    }

    /// HMAC-SHA256 of `payload` keyed by the raw secret, as lowercase hex
    pub fn signature(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take keys of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Sign with the current wall-clock millisecond
    pub fn sign(&self, params: &QueryParams) -> QueryParams {
        self.sign_at(params, Utc::now().timestamp_millis())
    }

    /// Returns a copy of `params` with `timestamp`, `recvWindow` and `signature`.
    ///
    /// The signature covers the encoded string of every other parameter,
    /// including the two added here, and is always the last entry.
    pub fn sign_at(&self, params: &QueryParams, timestamp: i64) -> QueryParams {
        let mut signed = params.clone();
        signed.remove("signature");
        signed.insert("timestamp", timestamp);
        signed.insert("recvWindow", self.recv_window);

        let signature = self.signature(&signed.to_query_string());
        signed.insert("signature", signature);
        signed
    }
}
