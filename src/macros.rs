//! Macros for capturing build metadata.
//!
//! `env!` expands in the crate that invokes the macro, so the metadata names
//! the application being built rather than this library.

/// Capture the calling crate's package name and version as a [`BuildInfo`].
///
/// [`BuildInfo`]: crate::core::BuildInfo
///
/// # Examples
///
/// ```
/// use newrelic_log_formatter::build_info;
/// use newrelic_log_formatter::prelude::*;
///
/// let config = FormatterConfig::new().with_build_info(build_info!());
/// assert!(!config.build_info.version.is_empty());
///
/// let tagged = build_info!("deployment" => "canary");
/// assert_eq!(tagged.extras, [("deployment".to_string(), "canary".to_string())]);
/// ```
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::core::BuildInfo::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::build_info!()$(.with_extra($key, $value))+
    };
}
