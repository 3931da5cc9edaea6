//! Transport trait definitions

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::error::Result;

/// A single request/response exchange with a device.
///
/// `request` and the returned bytes are plaintext JSON; encryption and
/// framing are the implementation's business.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` to `host` and return the decrypted reply
    async fn exchange(&self, host: &str, request: Bytes) -> Result<Bytes>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn exchange(&self, host: &str, request: Bytes) -> Result<Bytes> {
        (**self).exchange(host, request).await
    }
}
