//! What went wrong, independent of where.

use strum_macros::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Nothing more specific applies.
    Unexpected,
    /// A value names something this build cannot do, e.g. an unknown diagram dialect.
    Unsupported,
    /// Startup configuration does not make sense.
    ConfigInvalid,
    /// A request parameter is malformed.
    InvalidArgument,

    /// The registry snapshot is not valid JSON of the expected shape.
    InvalidFormat,

    FileNotFound,
    PermissionDenied,
    IoFailed,

    /// The renderer program could not be started.
    RendererUnavailable,
    /// The renderer started but did not produce a complete image.
    RenderFailed,
    /// The page template could not be loaded or rendered.
    TemplateFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Whether the caller, rather than this process, is at fault.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, ErrorKind::InvalidArgument | ErrorKind::FileNotFound)
    }
}
