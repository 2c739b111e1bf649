use std::env;
use std::path::PathBuf;

/// Environment variable pointing at the unpacked X-Plane SDK.
const SDK_ENV: &str = "XPLM_SDK";

fn main() {
    println!("cargo:rerun-if-env-changed={SDK_ENV}");

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    match target_os.as_str() {
        // XPLM symbols are resolved against the host process at load time.
        "macos" => println!("cargo:rustc-cdylib-link-arg=-Wl,-undefined,dynamic_lookup"),
        "windows" => {
            if let Some(sdk) = env::var_os(SDK_ENV) {
                let libs = PathBuf::from(sdk).join("Libraries").join("Win");
                println!("cargo:rustc-link-search=native={}", libs.display());
            }
            println!("cargo:rustc-link-lib=dylib=XPLM_64");
        }
        _ => {}
    }
}
