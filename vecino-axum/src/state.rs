use std::sync::Arc;

use vecino_core::VecinoApp;

pub struct AxumState<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    pub app: Arc<VecinoApp<R, P>>,
}

impl<R, P> Clone for AxumState<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
        }
    }
}

