//! Logging shims
//!
//! Forwards to `defmt` or `tracing` depending on the enabled feature and
//! compiles to nothing when neither is enabled. Format strings must stick
//! to `{}` / `{:?}` so they are valid for both backends.

#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::trace!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::debug!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::info!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::warn!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($( & $x ),*);
    }};
}
