//! Seams for asynchronous child loading.

use std::future::Future;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::node::NodeId;
use super::node::TreeNode;
use crate::error::LoadError;

/// Fetches the immediate children of a node.
///
/// Closures `Fn(NodeId) -> impl Future<Output = Result<Vec<TreeNode>, LoadError>>` implement this
/// trait directly.
pub trait ChildLoader {
    fn load_children(
        &self,
        id: &NodeId,
    ) -> LocalBoxFuture<'static, Result<Vec<TreeNode>, LoadError>>;
}

impl<F, Fut> ChildLoader for F
where
    F: Fn(NodeId) -> Fut,
    Fut: Future<Output = Result<Vec<TreeNode>, LoadError>> + 'static,
{
    fn load_children(
        &self,
        id: &NodeId,
    ) -> LocalBoxFuture<'static, Result<Vec<TreeNode>, LoadError>> {
        self(id.clone()).boxed_local()
    }
}

/// Receives child-load failures.
pub trait ErrorSink {
    fn report(&mut self, id: &NodeId, error: &LoadError);
}

impl<F> ErrorSink for F
where
    F: FnMut(&NodeId, &LoadError),
{
    fn report(&mut self, id: &NodeId, error: &LoadError) {
        self(id, error)
    }
}

/// A sink that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&mut self, id: &NodeId, error: &LoadError) {
        tracing::warn!(%id, error = %crate::error::error_chain(error), "child load failed");
    }
}

/// What a finished load hands back to [`super::TreeModel::complete_load`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub id: NodeId,
    pub result: Result<Vec<TreeNode>, LoadError>,
}

/// An in-flight child load. Resolves to a [`LoadOutcome`] tagged with the node id.
///
/// Dropping it abandons the load; the node stays flagged as loading until a result is applied.
pub struct PendingLoad {
    id: NodeId,
    future: LocalBoxFuture<'static, Result<Vec<TreeNode>, LoadError>>,
}

impl PendingLoad {
    pub(crate) fn new(
        id: NodeId,
        future: LocalBoxFuture<'static, Result<Vec<TreeNode>, LoadError>>,
    ) -> Self {
        Self { id, future }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }
}

impl std::fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLoad").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Future for PendingLoad {
    type Output = LoadOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<LoadOutcome> {
        let result = futures::ready!(self.future.as_mut().poll(cx));
        Poll::Ready(LoadOutcome {
            id: self.id.clone(),
            result,
        })
    }
}
