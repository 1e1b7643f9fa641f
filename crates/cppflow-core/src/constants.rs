//! Constants used across the cppflow workspace.

/// The filename for cppflow's optional configuration.
pub const CONFIG_FILE: &str = "cppflow.toml";

/// Default locations, relative to the project root.
pub const DEFAULT_TEST_DIR: &str = "test";
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Test sources are named `<name>.cpp` and registered as `<name>_unit`.
pub const DEFAULT_SOURCE_EXTENSION: &str = ".cpp";
pub const DEFAULT_TARGET_SUFFIX: &str = "_unit";

/// External toolchain programs.
pub const DEFAULT_CONFIGURE_PROGRAM: &str = "cmake";
pub const DEFAULT_BUILD_PROGRAM: &str = "cmake";
pub const DEFAULT_TEST_PROGRAM: &str = "ctest";
pub const DEFAULT_BUILD_CONFIG: &str = "Debug";

/// Label of the sentinel row that runs every test.
pub const ALL_LABEL: &str = "All";
