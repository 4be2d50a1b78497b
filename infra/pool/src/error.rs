use std::borrow::Cow;

/// Errors raised by the worker pool.
#[ctiprd_derive::ctiprd_error]
pub enum PoolError {
    /// The OS refused to start a worker thread.
    #[error("Failed to spawn worker{}: {source}", format_context(.context))]
    Spawn { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// A task or scoped job panicked; the payload message is preserved.
    #[error("Task panicked{}: {message}", format_context(.context))]
    TaskPanicked { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The pool was shut down before the task could report back.
    #[error("Pool disconnected{}: {message}", format_context(.context))]
    Disconnected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal pool error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> Cow<'static, str> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Cow::Borrowed(s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Cow::Owned(s.clone())
    } else {
        Cow::Borrowed("non-string panic payload")
    }
}
