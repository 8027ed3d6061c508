use thiserror::Error;

use crate::core::types::WorkflowStep;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Approval failed: {0}")]
    ApprovalFailure(String),

    #[error("Pool resolution failed: {0}")]
    ResolutionFailure(String),

    #[error("Deposit failed: {0}")]
    DepositFailure(String),

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error("Borrow failed: {0}")]
    BorrowFailure(String),

    #[error("Repay failed: {0}")]
    RepayFailure(String),

    #[error("Swap deadline {deadline} expired: transaction landed at {landed_at}")]
    DeadlineExpired { deadline: u64, landed_at: u64 },

    #[error("Swap failed: {0}")]
    SwapFailure(String),

    #[error("Math overflow")]
    MathOverflow,

    #[error("Workflow aborted at step {step}: {source}")]
    Aborted {
        step: WorkflowStep,
        #[source]
        source: Box<FlowError>,
    },
}

impl FlowError {
    /// Wrap an error with the workflow step it surfaced in.
    ///
    /// Errors that are already step-attributed pass through unchanged so
    /// nested orchestration never double-wraps.
    pub fn at_step(self, step: WorkflowStep) -> Self {
        match self {
            FlowError::Aborted { .. } => self,
            other => FlowError::Aborted {
                step,
                source: Box::new(other),
            },
        }
    }

    /// The step a workflow aborted at, if this is an abort.
    pub fn aborted_step(&self) -> Option<WorkflowStep> {
        match self {
            FlowError::Aborted { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
