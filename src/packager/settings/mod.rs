//! Configuration for packaging runs.
//!
//! [`Settings`] is assembled by [`SettingsBuilder`] from built-in defaults,
//! an optional TOML [`SettingsFile`] and command line flags.

mod builder;
mod core;
mod file;

pub use builder::SettingsBuilder;
pub use core::{DependencySettings, GeneratorSettings, PackageOptions, Settings};
pub use file::SettingsFile;

/// Product name used as the artifact prefix.
pub const DEFAULT_PRODUCT_NAME: &str = "NAP";

/// Base name of the CMake build directory.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Directory receiving the install output of every configuration.
pub const DEFAULT_STAGING_DIR: &str = "packaging";

/// Intermediate directory used to nest the Windows zip.
pub const DEFAULT_ARCHIVING_DIR: &str = "archiving";

/// Working-tree build-info record, relative to the source root.
pub const DEFAULT_BUILD_INFO_FILE: &str = "cmake/buildInfo.json";

/// Packaged build-info copy, relative to the staging directory.
pub const DEFAULT_PACKAGED_BUILD_INFO_FILE: &str = "cmake/buildinfo.json";

/// Output directories removed by a clean run, next to the build directories.
pub const DEFAULT_CLEAN_DIRS: &[&str] = &["lib", "bin"];

/// apt packages required to build on Linux.
pub const DEFAULT_LINUX_DEPENDENCIES: &[&str] = &[
    "cmake",
    "build-essential",
    "python3-dev",
    "libsdl2-dev",
    "libglew-dev",
    "libassimp-dev",
    "libfreeimage-dev",
    "ffmpeg",
    "libavcodec-dev",
    "libavformat-dev",
    "libavutil-dev",
    "patchelf",
];

/// Homebrew formulae required to build on macOS.
pub const DEFAULT_MACOS_DEPENDENCIES: &[&str] = &[
    "cmake", "sdl2", "glew", "assimp", "ffmpeg", "mpg123", "qt", "python3",
];

pub const DEFAULT_MACOS_GENERATOR: &str = "Xcode";

pub const DEFAULT_WINDOWS_GENERATOR: &str = "Visual Studio 14 2015 Win64";

/// Extra configure definitions passed on Windows only.
pub const DEFAULT_WINDOWS_FLAGS: &[&str] = &["-DPYBIND11_PYTHON_VERSION=3.5"];
