use std::borrow::Cow;

/// Errors raised while building or evaluating a force field.
#[ctiprd_derive::ctiprd_error]
pub enum ForceError {
    /// Neighbor list construction or a parallel particle loop failed.
    #[error("Force kernel error{}: {source}", format_context(.context))]
    Kernel { source: ctiprd_kernel::error::KernelError, context: Option<Cow<'static, str>> },

    #[error("Internal force field error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
