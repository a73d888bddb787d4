//! Default connection version advertised when no configuration overrides it.

/// Identifier of the default connection version.
pub const DEFAULT_IDENTIFIER: &str = "1";

/// Features carried by the default connection version, in advertised order.
pub const DEFAULT_FEATURES: [&str; 2] = ["ORDERED", "UNORDERED"];

/// Canonical string form of the default connection version.
pub const DEFAULT_CONNECTION_VERSION: &str = "(1,[ORDERED,UNORDERED])";
