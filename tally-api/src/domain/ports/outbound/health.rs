use async_trait::async_trait;

/// Reachability check for the backing store.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
    async fn ping(&self) -> Result<(), String>;
}
