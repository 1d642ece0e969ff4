//! Optional Tracy instrumentation.
//!
//! Enabled with the `profiling` feature. Without it, [`profile_scope!`] expands to
//! nothing.

#[cfg(feature = "profiling")]
pub use tracy_client;

/// Profile the enclosing scope under a static name.
///
/// ```ignore
/// fn prepare() {
///     profile_scope!("prepare_frame");
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! profile_scope {
    ($name:literal) => {
        #[cfg(feature = "profiling")]
        let _profile_span = $crate::profiling::tracy_client::span!($name);
    };
}
