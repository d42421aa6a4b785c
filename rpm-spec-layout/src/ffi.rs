//! FFI code for the C layout shim.  Only compiled when the configured RPM
//! version still declares the spec structures publicly.
use crate::layout::{Layout, Structure};
use std::os::raw::c_uint;

extern "C" {
    fn rpm_spec_layout_spec_size() -> usize;
    fn rpm_spec_layout_spec_offset(field: c_uint) -> usize;
    fn rpm_spec_layout_package_size() -> usize;
    fn rpm_spec_layout_package_offset(field: c_uint) -> usize;
}

/// Measure `structure` as the C compiler lays it out.
pub fn measure(structure: Structure) -> Layout {
    // SAFETY: the shim functions take no pointers and are defined for every
    // input; unknown indices return `(size_t)-1`.
    let size = match structure {
        Structure::Spec => unsafe { rpm_spec_layout_spec_size() },
        Structure::Package => unsafe { rpm_spec_layout_package_size() },
    };
    let offset = |field: c_uint| match structure {
        Structure::Spec => unsafe { rpm_spec_layout_spec_offset(field) },
        Structure::Package => unsafe { rpm_spec_layout_package_offset(field) },
    };
    let offsets = structure
        .fields()
        .iter()
        .enumerate()
        .map(|(i, &name)| (name, offset(i as c_uint)))
        .collect();
    Layout::new(size, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_inside_its_structure() {
        for &structure in Structure::ALL.iter() {
            let layout = measure(structure);
            assert!(layout.size() > 0);
            for &name in structure.fields() {
                assert!(layout.offset_of(name).unwrap() < layout.size());
            }
        }
    }

    #[test]
    fn shim_rejects_bad_index() {
        assert_eq!(unsafe { rpm_spec_layout_spec_offset(4) }, usize::MAX);
        assert_eq!(unsafe { rpm_spec_layout_package_offset(2) }, usize::MAX);
    }
}
