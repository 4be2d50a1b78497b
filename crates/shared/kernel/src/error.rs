use std::borrow::Cow;

/// Errors raised while building or running the simulation kernel.
#[ctiprd_derive::ctiprd_error]
pub enum KernelError {
    /// A system description is inconsistent (dimension, box, rates, ...).
    #[error("Invalid system{}: {message}", format_context(.context))]
    InvalidSystem { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A particle type name does not exist in the system.
    #[error("Unknown particle type{}: '{message}'", format_context(.context))]
    UnknownType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A rate conversion has no solution for the given parameters.
    #[error("Rate conversion failed{}: {message}", format_context(.context))]
    Rate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A parallel loop failed on the worker pool.
    #[error("Worker pool error{}: {source}", format_context(.context))]
    Pool { source: ctiprd_pool::PoolError, context: Option<Cow<'static, str>> },

    #[error("Internal kernel error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
