use crate::version::RpmVersion;
use crate::Error;
use std::convert::TryFrom;
use std::ffi::CStr;
use std::os::raw::c_int;

/// A structure from `<rpm/rpmspec.h>` whose layout can be queried
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Structure {
    /// `struct rpmSpec_s`
    Spec,
    /// `struct Package_s`
    Package,
}

impl Structure {
    pub const ALL: [Structure; 2] = [Structure::Spec, Structure::Package];

    /// The C name of the structure
    pub fn c_name(self) -> &'static str {
        match self {
            Structure::Spec => "struct rpmSpec_s",
            Structure::Package => "struct Package_s",
        }
    }

    /// Names of the members whose offsets can be queried
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Structure::Spec => &["specFile", "lbufPtr", "sources", "packages"],
            Structure::Package => &["header", "next"],
        }
    }

    /// Look up a structure by its short name (`spec`, `package`) or its C
    /// tag (`rpmSpec_s`, `Package_s`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "spec" | "rpmSpec_s" => Some(Structure::Spec),
            "package" | "Package_s" => Some(Structure::Package),
            _ => None,
        }
    }
}

/// The measured layout of one structure: its size and a table from member
/// name to byte offset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    size: usize,
    offsets: Vec<(&'static str, usize)>,
}

impl Layout {
    pub fn new(size: usize, offsets: Vec<(&'static str, usize)>) -> Self {
        Self { size, offsets }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of `field`, which must match a member name exactly.  An offset
    /// that does not lie inside the structure is reported as
    /// [`Error::FieldOutOfBounds`].
    pub fn offset_of(&self, field: &str) -> Result<usize, Error> {
        let &(_, offset) = self
            .offsets
            .iter()
            .find(|&&(name, _)| name == field)
            .ok_or(Error::UnknownField)?;
        if offset >= self.size {
            return Err(Error::FieldOutOfBounds);
        }
        Ok(offset)
    }
}

/// Structure layouts for one RPM version.  Nothing is measured unless the
/// version passes [`RpmVersion::has_legacy_spec_layout`].
#[derive(Clone, Debug)]
pub struct Probe {
    version: RpmVersion,
    spec: Option<Layout>,
    package: Option<Layout>,
}

impl Probe {
    /// Build a probe for `version`, calling `measure` once per structure if
    /// the version gate passes.
    pub fn new<F: FnMut(Structure) -> Layout>(version: RpmVersion, mut measure: F) -> Self {
        if !version.has_legacy_spec_layout() {
            return Self::unmeasured(version);
        }
        Self {
            version,
            spec: Some(measure(Structure::Spec)),
            package: Some(measure(Structure::Package)),
        }
    }

    /// A probe that has no layouts; every query fails with
    /// [`Error::UnsupportedVersion`].
    pub fn unmeasured(version: RpmVersion) -> Self {
        Self {
            version,
            spec: None,
            package: None,
        }
    }

    /// The probe for the RPM version this crate was built against.  Layouts
    /// are measured on first use.
    pub fn system() -> &'static Probe {
        use std::sync::OnceLock;
        static SYSTEM_PROBE: OnceLock<Probe> = OnceLock::new();
        SYSTEM_PROBE.get_or_init(|| {
            #[cfg(rpm_legacy_spec_layout)]
            let probe = Probe::new(crate::CONFIGURED_VERSION, crate::ffi::measure);
            #[cfg(not(rpm_legacy_spec_layout))]
            let probe = Probe::unmeasured(crate::CONFIGURED_VERSION);
            if probe.spec.is_some() {
                log::debug!(
                    "RPM {} exposes the spec structures, layouts measured",
                    probe.version
                );
            } else {
                log::debug!(
                    "RPM {} is not below {}, layouts unavailable",
                    probe.version,
                    RpmVersion::LEGACY_SPEC_LAYOUT_CEILING
                );
            }
            probe
        })
    }

    pub fn version(&self) -> RpmVersion {
        self.version
    }

    pub fn layout(&self, structure: Structure) -> Result<&Layout, Error> {
        match structure {
            Structure::Spec => self.spec.as_ref(),
            Structure::Package => self.package.as_ref(),
        }
        .ok_or(Error::UnsupportedVersion)
    }

    pub fn size(&self, structure: Structure) -> Result<usize, Error> {
        Ok(self.layout(structure)?.size())
    }

    pub fn offset_of(&self, structure: Structure, field: &str) -> Result<usize, Error> {
        let layout = self.layout(structure)?;
        layout.offset_of(field).map_err(|e| {
            log::trace!("{}: no member {:?}: {}", structure.c_name(), field, e);
            e
        })
    }

    /// Size of `structure` as a C integer, or a negative sentinel
    pub fn size_code(&self, structure: Structure) -> c_int {
        to_code(self.size(structure))
    }

    /// Offset of `member` in `structure` as a C integer, or a negative
    /// sentinel.  A name that is not UTF-8 can never match.
    pub fn offset_code(&self, structure: Structure, member: &CStr) -> c_int {
        let result = match member.to_str() {
            Ok(field) => self.offset_of(structure, field),
            Err(_) => self.layout(structure).and(Err(Error::UnknownField)),
        };
        to_code(result)
    }
}

fn to_code(value: Result<usize, Error>) -> c_int {
    match value.and_then(|v| Ok(c_int::try_from(v)?)) {
        Ok(v) => v,
        Err(e) => {
            if e == Error::Overflow {
                log::debug!("value does not fit in a C int");
            }
            e.code()
        }
    }
}
