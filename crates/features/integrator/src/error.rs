use std::borrow::Cow;

/// Errors raised while advancing a simulation or writing its trajectory.
#[ctiprd_derive::ctiprd_error]
pub enum IntegratorError {
    #[error("Integrator kernel error{}: {source}", format_context(.context))]
    Kernel { source: ctiprd_kernel::error::KernelError, context: Option<Cow<'static, str>> },

    #[error("Force evaluation failed{}: {source}", format_context(.context))]
    Forces { source: ctiprd_forces::ForceError, context: Option<Cow<'static, str>> },

    #[error("Reaction step failed{}: {source}", format_context(.context))]
    Reactions { source: ctiprd_reactions::ReactionError, context: Option<Cow<'static, str>> },

    #[error("Trajectory worker error{}: {source}", format_context(.context))]
    Pool { source: ctiprd_kernel::pool::PoolError, context: Option<Cow<'static, str>> },

    /// A step size or step count is not usable.
    #[error("Invalid step{}: {message}", format_context(.context))]
    InvalidStep { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Trajectory serialization error{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Trajectory I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal integrator error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
