// Task definition and bound actions
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// A zero-argument unit of work bound to a task.
///
/// Errors are opaque to the engine and reported unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskAction: Send + Sync {
    async fn execute(&self) -> anyhow::Result<()>;
}

/// Adapter turning an async closure into a [`TaskAction`].
pub struct FnAction<F> {
    func: F,
}

/// Bind a closure returning a future as a task action.
pub fn action_fn<F, Fut>(func: F) -> FnAction<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    FnAction { func }
}

#[async_trait]
impl<F, Fut> TaskAction for FnAction<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn execute(&self) -> anyhow::Result<()> {
        (self.func)().await
    }
}

/// Smallest schedulable unit within a workflow.
#[derive(Clone)]
pub struct TaskUnit {
    pub id: String,
    action: Arc<dyn TaskAction>,
}

impl TaskUnit {
    pub fn new(id: &str, action: Arc<dyn TaskAction>) -> Self {
        Self {
            id: id.to_string(),
            action,
        }
    }

    pub fn from_action<A: TaskAction + 'static>(id: &str, action: A) -> Self {
        Self::new(id, Arc::new(action))
    }

    pub(crate) async fn invoke(&self) -> anyhow::Result<()> {
        self.action.execute().await
    }
}

impl fmt::Debug for TaskUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskUnit").field("id", &self.id).finish_non_exhaustive()
    }
}
