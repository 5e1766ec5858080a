//! Purpose: Emit link directives for the native nfd library when `system` is enabled.
//! Role: Cargo build-script; resolves library name, search path and link kind from env.
//! Invariants: Without the `system` feature nothing is linked (fake backends only).
//! Invariants: `cargo:rerun-if-env-changed` covers every variable read here.
//! Invariants: Static linking adds the platform libraries nfd itself depends on.
use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=NFD_LIB_DIR");
    println!("cargo:rerun-if-env-changed=NFD_LIB_NAME");
    println!("cargo:rerun-if-env-changed=NFD_STATIC");

    if env::var_os("CARGO_FEATURE_SYSTEM").is_none() {
        return;
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    if let Some(dir) = env::var_os("NFD_LIB_DIR") {
        let dir = PathBuf::from(dir);
        if !dir.is_dir() {
            panic!(
                "NFD_LIB_DIR `{}` is not a directory.\n\
                 Fix: point NFD_LIB_DIR at the directory containing the nfd library, or unset it \
                 to use the system search path.",
                dir.display()
            );
        }
        println!("cargo:rustc-link-search=native={}", dir.display());
    }

    let lib_name = env::var("NFD_LIB_NAME").unwrap_or_else(|_| "nfd".to_string());
    if link_statically() {
        println!("cargo:rustc-link-lib=static={lib_name}");
        link_platform_deps(&target_os);
    } else {
        println!("cargo:rustc-link-lib=dylib={lib_name}");
    }
}

fn link_statically() -> bool {
    matches!(
        env::var("NFD_STATIC").as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn link_platform_deps(target_os: &str) {
    match target_os {
        "windows" => {
            for lib in ["ole32", "uuid", "shell32"] {
                println!("cargo:rustc-link-lib=dylib={lib}");
            }
        }
        "macos" => {
            for framework in ["AppKit", "UniformTypeIdentifiers"] {
                println!("cargo:rustc-link-lib=framework={framework}");
            }
        }
        _ => {
            for lib in ["gtk-3", "gdk-3", "gobject-2.0", "glib-2.0"] {
                println!("cargo:rustc-link-lib=dylib={lib}");
            }
        }
    }
}
