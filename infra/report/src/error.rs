use std::borrow::Cow;

/// Errors that can occur while installing the report hooks.
#[beacon_derive::beacon_error]
pub enum ReportError {
    /// The global error/panic hooks were already installed for this process.
    #[error("Report hook installation error{}: {message}", format_context(.context))]
    Install { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Invalid configuration supplied to the report hook builder.
    #[error("Invalid report hook configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
