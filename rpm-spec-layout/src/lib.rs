//! Layout probe for the spec structures of the RPM C library.
//!
//! Before RPM 4.9.0, `<rpm/rpmspec.h>` declared `struct rpmSpec_s` and
//! `struct Package_s`, and code that pokes at those structures directly has
//! to agree with the compiler about their layout.  This crate reports the
//! size of each structure and the offsets of the members such code uses.
//!
//! The RPM version is taken from the build environment (`RPM_VERSION`, or
//! `RPM_VERSION_MAJOR`, `RPM_VERSION_MINOR`, and `RPM_VERSION_PATCH`).  Only
//! when it is below 4.9.0 is anything measured; otherwise, and when no
//! version was given, every query reports “not applicable”.
//!
//! The `sizeof_*` and `offset_*` functions keep the C calling convention of
//! returning `-1` for “not applicable” and `-2` for “does not fit in a C
//! `int`”.  [`Probe`] offers the same queries with a typed [`Error`].

#![forbid(improper_ctypes)]
#![deny(warnings)]

use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_int;

#[cfg(rpm_legacy_spec_layout)]
mod ffi;
mod layout;
mod version;
pub use layout::{Layout, Probe, Structure};
pub use version::{ParseVersionError, RpmVersion, VERSION_SENTINEL};

/// The RPM version this crate was configured for
pub const CONFIGURED_VERSION: RpmVersion =
    include!(concat!(env!("OUT_DIR"), "/configured_version.rs"));

/// Errors from a layout query
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The RPM version is not below 4.9.0, or was not configured
    UnsupportedVersion,
    /// No member of that name is known
    UnknownField,
    /// The reported offset is not inside the structure
    FieldOutOfBounds,
    /// The value does not fit in a C `int`
    Overflow,
}

impl Error {
    /// The sentinel a C caller sees for this error
    pub fn code(self) -> c_int {
        match self {
            Error::UnsupportedVersion | Error::UnknownField | Error::FieldOutOfBounds => -1,
            Error::Overflow => -2,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::UnsupportedVersion => "RPM version does not expose the spec structures",
            Error::UnknownField => "unknown structure member",
            Error::FieldOutOfBounds => "member offset lies outside the structure",
            Error::Overflow => "value does not fit in a C int",
        })
    }
}

impl std::error::Error for Error {}

impl From<std::num::TryFromIntError> for Error {
    fn from(_e: std::num::TryFromIntError) -> Error {
        Error::Overflow
    }
}

/// Whether this build measured the spec structures
pub fn legacy_layout_available() -> bool {
    cfg!(rpm_legacy_spec_layout)
}

/// Size of `struct rpmSpec_s`, `-1` if unavailable, `-2` on overflow
pub fn sizeof_spec_s() -> c_int {
    Probe::system().size_code(Structure::Spec)
}

/// Offset of `member` in `struct rpmSpec_s`.  `-1` if the member is unknown
/// or the layout is unavailable, `-2` on overflow.
pub fn offset_spec_s(member: &CStr) -> c_int {
    Probe::system().offset_code(Structure::Spec, member)
}

/// Size of `struct Package_s`, `-1` if unavailable, `-2` on overflow
pub fn sizeof_package_s() -> c_int {
    Probe::system().size_code(Structure::Package)
}

/// Offset of `member` in `struct Package_s`, with the same conventions as
/// [`offset_spec_s`]
pub fn offset_package_s(member: &CStr) -> c_int {
    Probe::system().offset_code(Structure::Package, member)
}
