use crate::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("callback on node {node:?} re-entered while running; event dropped")]
    Reentrant { node: NodeId },
    #[error("node {node:?} no longer exists")]
    StaleNode { node: NodeId },
}
