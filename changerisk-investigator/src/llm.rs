//! The narrow seam between the investigation loop and an actual model
//! backend. Mirrors the teacher's storage-trait-plus-`Arc`-blanket-impl
//! shape so tests can swap in a scripted client.

use std::sync::Arc;

use async_trait::async_trait;
use changerisk_core::errors::RiskResult;

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub tokens: u32,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn query(&self, prompt: &str) -> RiskResult<LlmResponse>;

    /// Switches the backing model for subsequent calls. Interior-mutable by
    /// convention so the trait stays object-safe behind `Arc<dyn LlmClient>`.
    fn set_model(&self, model: &str) -> RiskResult<()>;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn query(&self, prompt: &str) -> RiskResult<LlmResponse> {
        (**self).query(prompt).await
    }

    fn set_model(&self, model: &str) -> RiskResult<()> {
        (**self).set_model(model)
    }
}
