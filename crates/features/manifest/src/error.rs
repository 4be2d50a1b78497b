use std::borrow::Cow;

/// A specialized [`ManifestError`] enum of this crate.
#[ctiprd_derive::ctiprd_error]
pub enum ManifestError {
    /// TOML syntax or shape errors.
    #[error("Manifest parse error{}: {source}", format_context(.context))]
    Parse { source: toml::de::Error, context: Option<Cow<'static, str>> },

    /// Reading a manifest file failed.
    #[error("Manifest I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// A requirement is not of the form `<name>/<version>`.
    #[error("Invalid requirement{}: '{message}'", format_context(.context))]
    InvalidRequirement { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The same library is required twice.
    #[error("Duplicate requirement{}: '{message}'", format_context(.context))]
    DuplicateRequirement { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Manifest validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal manifest error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
