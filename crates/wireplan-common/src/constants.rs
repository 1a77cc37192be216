//! Workspace-wide constants.

/// Reserved profile that is always active.
pub const DEFAULT_PROFILE: &str = "default";

/// Method name under which constructor injects are recorded.
pub const CONSTRUCTOR_METHOD: &str = "__construct";

/// Pseudo method name under which property injects are recorded.
pub const PROPERTY_METHOD: &str = "";

/// Default directory for cached container definitions, relative to the
/// project root.
pub const DEFAULT_CACHE_DIR: &str = ".wireplan/cache";

/// File extension of cached container definitions.
pub const CACHE_FILE_EXTENSION: &str = "json";

/// Name of the built-in environment parameter store.
pub const ENV_PARAMETER_STORE: &str = "env";

/// Scalar and pseudo type keywords recognized by the type system.
pub const SCALAR_TYPE_NAMES: [&str; 12] = [
    "int", "string", "bool", "float", "array", "mixed", "void", "never", "null", "object", "self",
    "static",
];

/// Application name used in log fields and cache documents.
pub const APP_NAME: &str = "wireplan";
