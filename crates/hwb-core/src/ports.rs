use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Port for the homework-review API.
///
/// One call is one network request; implementations must not retry. The poll
/// loop's interval is the only retry mechanism.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch review state for homeworks updated since `from_date` (epoch seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}
