use std::env;
use std::fs;
use std::path::PathBuf;

#[allow(dead_code)]
#[path = "src/version.rs"]
mod version;

use version::RpmVersion;

fn env_var(name: &str) -> Option<String> {
    println!("cargo:rerun-if-env-changed={}", name);
    match env::var(name) {
        Ok(value) => Some(value),
        Err(env::VarError::NotPresent) => None,
        Err(env::VarError::NotUnicode(value)) => {
            panic!("{} is not valid UTF-8: {:?}", name, value)
        }
    }
}

fn configured_version() -> RpmVersion {
    let base = env_var("RPM_VERSION");
    let major = env_var("RPM_VERSION_MAJOR");
    let minor = env_var("RPM_VERSION_MINOR");
    let patch = env_var("RPM_VERSION_PATCH");
    RpmVersion::configure(
        base.as_deref(),
        major.as_deref(),
        minor.as_deref(),
        patch.as_deref(),
    )
    .unwrap_or_else(|e| {
        panic!(
            "bad RPM version (RPM_VERSION={:?} RPM_VERSION_MAJOR={:?} \
             RPM_VERSION_MINOR={:?} RPM_VERSION_PATCH={:?}): {}",
            base, major, minor, patch, e
        )
    })
}

fn main() {
    let version = configured_version();
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::write(
        out_dir.join("configured_version.rs"),
        format!(
            "RpmVersion::new({}, {}, {})\n",
            version.major, version.minor, version.patch
        ),
    )
    .unwrap();
    println!("cargo:rustc-check-cfg=cfg(rpm_legacy_spec_layout)");
    println!("cargo:rerun-if-changed=layout.c");
    if !version.has_legacy_spec_layout() {
        // Nothing to measure, and no RPM headers are needed.
        return;
    }
    let include = env_var("RPM_INCLUDE_DIR").unwrap_or_else(|| "/usr/include".to_owned());
    cc::Build::new()
        .file("layout.c")
        .include(include)
        .define("VERSION_MAJOR", Some(&*version.major.to_string()))
        .define("VERSION_MINOR", Some(&*version.minor.to_string()))
        .define("VERSION_PATCH", Some(&*version.patch.to_string()))
        .compile("rpm-spec-layout-shim");
    println!("cargo:rustc-cfg=rpm_legacy_spec_layout");
}
