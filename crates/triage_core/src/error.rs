use thiserror::Error;

use crate::ModuleId;

/// A workflow step requested from a state that does not allow it.
///
/// State is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("ioc submission modal is not open")]
    ModalNotOpen,
    #[error("ioc submission to {module} is already in flight")]
    IocInFlight { module: ModuleId },
    #[error("submission to {module} is already in flight")]
    AlreadySending { module: ModuleId },
}
