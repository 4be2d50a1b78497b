use std::borrow::Cow;

#[ctiprd_derive::ctiprd_error]
pub enum SystemsError {
    /// No preset is registered under the requested name.
    #[error("Unknown system preset{}: '{message}'", format_context(.context))]
    UnknownPreset { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A preset's microscopic rates do not reproduce its macroscopic rates.
    #[error("Rate mismatch{}: {message}", format_context(.context))]
    RateMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("System compilation failed{}: {source}", format_context(.context))]
    Kernel { source: ctiprd_kernel::error::KernelError, context: Option<Cow<'static, str>> },

    #[error("Internal systems error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
