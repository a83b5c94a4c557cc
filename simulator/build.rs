//! Build script for touch-panel-simulator
//!
//! On Windows, links against the SDL2 import library in `vendor/sdl2/` and
//! places `SDL2.dll` next to the built binary. Other platforms use the
//! system SDL2.

use std::path::{Path, PathBuf};
use std::{env, fs};

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        return;
    };
    let Some(root) = manifest_dir.parent() else {
        return;
    };
    let sdl2_dir = root.join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", sdl2_dir.display());

    if !sdl2_dir.exists() {
        println!("cargo:warning=SDL2 not found in {}", sdl2_dir.display());
        return;
    }
    println!("cargo:rustc-link-search=native={}", sdl2_dir.display());

    if let Some(profile_dir) = env::var_os("OUT_DIR").and_then(|out| profile_dir(Path::new(&out))) {
        let dst = profile_dir.join("SDL2.dll");
        if !dst.exists()
            && let Err(e) = fs::copy(sdl2_dir.join("SDL2.dll"), &dst)
        {
            println!("cargo:warning=Could not copy SDL2.dll: {e}");
        }
    }
}

/// `target/<profile>` for an `OUT_DIR` of `target/<profile>/build/<pkg>/out`.
fn profile_dir(out_dir: &Path) -> Option<PathBuf> {
    out_dir
        .ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
        .map(Path::to_path_buf)
}
