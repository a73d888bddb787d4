//! Convenience macros that pin events to the negotiation tracing targets.
//!
//! Each macro forwards its arguments unchanged to `tracing::debug!`, so field
//! syntax such as `identifier = %id` works as usual.

/// Emit a version codec trace.
///
/// # Example
/// ```ignore
/// trace_codec!(input, "rejected malformed version");
/// ```
#[macro_export]
macro_rules! trace_codec {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "connver::codec", $($arg)*);
    };
}

/// Emit a version negotiation trace.
///
/// # Example
/// ```ignore
/// trace_negotiate!(picked = %version, "negotiated connection version");
/// ```
#[macro_export]
macro_rules! trace_negotiate {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "connver::negotiate", $($arg)*);
    };
}

/// Emit a feature-set verification trace.
///
/// # Example
/// ```ignore
/// trace_verify!(proposed = %proposed, "refused proposed feature set");
/// ```
#[macro_export]
macro_rules! trace_verify {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "connver::verify", $($arg)*);
    };
}

/// Emit a handshake message trace.
///
/// # Example
/// ```ignore
/// trace_handshake!(msg_type = msg.msg_type(), "message failed validation");
/// ```
#[macro_export]
macro_rules! trace_handshake {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "connver::handshake", $($arg)*);
    };
}
