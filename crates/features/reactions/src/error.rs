use std::borrow::Cow;

/// Errors raised while proposing or applying reaction events.
#[ctiprd_derive::ctiprd_error]
pub enum ReactionError {
    #[error("Reaction kernel error{}: {source}", format_context(.context))]
    Kernel { source: ctiprd_kernel::error::KernelError, context: Option<Cow<'static, str>> },

    /// A parallel proposal job failed.
    #[error("Reaction worker error{}: {source}", format_context(.context))]
    Pool { source: ctiprd_kernel::pool::PoolError, context: Option<Cow<'static, str>> },

    #[error("Internal reaction error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
