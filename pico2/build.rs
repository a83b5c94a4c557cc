//! Build script for touch-panel-pico2
//!
//! Copies `memory.x` into `OUT_DIR` so the linker finds it, and adds the
//! cortex-m-rt and defmt linker scripts.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::env;

fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    File::create(out.join("memory.x"))
        .and_then(|mut f| f.write_all(include_bytes!("memory.x")))
        .expect("failed to write memory.x");
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    // Only link the embedded scripts for the RP2350 target
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() == "arm" {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
