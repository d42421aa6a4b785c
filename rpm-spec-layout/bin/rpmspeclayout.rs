use rpm_spec_layout::{Probe, Structure};
use std::ffi::CString;

fn usage(success: bool) -> i32 {
    const USAGE: &'static str = "Usage: rpmspeclayout [STRUCTURE [MEMBER...]]\n\n\
                                 With no arguments, report every known member of every structure.\n\n\
                                 STRUCTURE is one of: spec (struct rpmSpec_s), package (struct Package_s)\n\n\
                                 Each value is a byte count, -1 if not applicable, or -2 on overflow.";
    if success {
        println!("{}", USAGE);
        0
    } else {
        eprintln!("{}", USAGE);
        1
    }
}

fn report(probe: &Probe, structure: Structure, members: &[String]) -> i32 {
    println!("{}: size {}", structure.c_name(), probe.size_code(structure));
    for member in members {
        let code = match CString::new(member.as_bytes()) {
            Ok(name) => probe.offset_code(structure, &name),
            Err(_) => {
                eprintln!("Member name contains a NUL byte: {:?}", member);
                return 1;
            }
        };
        println!("  {}: offset {}", member, code);
    }
    0
}

fn known_members(structure: Structure) -> Vec<String> {
    structure.fields().iter().map(|&s| s.to_owned()).collect()
}

fn report_all(probe: &Probe) -> i32 {
    for &structure in Structure::ALL.iter() {
        let status = report(probe, structure, &known_members(structure));
        if status != 0 {
            return status;
        }
    }
    0
}

fn inner_main() -> i32 {
    env_logger::init();
    let mut args = std::env::args();
    if args.next().is_none() {
        return usage(false);
    }
    let args: Vec<String> = args.collect();
    let probe = Probe::system();
    match args.first().map(|s| &**s) {
        None => {
            println!(
                "RPM version {} ({} layouts)",
                probe.version(),
                if rpm_spec_layout::legacy_layout_available() {
                    "measured"
                } else {
                    "no"
                }
            );
            report_all(probe)
        }
        Some("--help") => usage(true),
        Some(name) => match Structure::from_name(name) {
            Some(structure) => {
                let members = if args.len() > 1 {
                    args[1..].to_vec()
                } else {
                    known_members(structure)
                };
                report(probe, structure, &members)
            }
            None => {
                eprintln!("Unknown structure {:?}", name);
                usage(false)
            }
        },
    }
}

fn main() {
    std::process::exit(inner_main())
}
