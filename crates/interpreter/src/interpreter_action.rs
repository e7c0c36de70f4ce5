use crate::{CallInputs, CreateInputs, InterpreterResult};
use alloc::boxed::Box;

/// The action an interpreter run hands back to the driver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpreterAction {
    /// A CALL, CALLCODE, DELEGATECALL or STATICCALL instruction was executed.
    Call { inputs: Box<CallInputs> },
    /// A CREATE or CREATE2 instruction was executed.
    Create { inputs: Box<CreateInputs> },
    /// The interpreter finished execution.
    Return { result: InterpreterResult },
    /// No action: the frame halted without producing anything.
    #[default]
    None,
}

impl InterpreterAction {
    /// Returns `true` if the action is a call.
    pub fn is_call(&self) -> bool {
        matches!(self, InterpreterAction::Call { .. })
    }

    /// Returns `true` if the action is a create.
    pub fn is_create(&self) -> bool {
        matches!(self, InterpreterAction::Create { .. })
    }

    /// Returns `true` if the action is a return.
    pub fn is_return(&self) -> bool {
        matches!(self, InterpreterAction::Return { .. })
    }

    /// Returns `true` if the action is none.
    pub fn is_none(&self) -> bool {
        matches!(self, InterpreterAction::None)
    }

    /// Returns `true` if the action is some.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Returns the result of a return action, if any.
    pub fn into_result_return(self) -> Option<InterpreterResult> {
        match self {
            InterpreterAction::Return { result } => Some(result),
            _ => None,
        }
    }
}
