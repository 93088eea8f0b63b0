use std::env;
use std::process::Command;

// Instruction sets the vectorized kernels can be compiled for.
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    cfg_flag: &'static str,
    // Tokens the host reports when the feature is present.
    linux_flags: &'static [&'static str],
    macos_key: &'static str,
    // `None` when the host could not be inspected.
    detected: Option<bool>,
}

impl CpuFeature {
    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse3",
                cfg_flag: "sse",
                // /proc/cpuinfo lists SSE3 as "pni".
                linux_flags: &["pni", "sse3"],
                macos_key: "hw.optional.sse3: 1",
                detected: None,
            },
            CpuFeature {
                name: "avx",
                cfg_flag: "avx",
                linux_flags: &["avx"],
                macos_key: "hw.optional.avx1_0: 1",
                detected: None,
            },
        ]
    }

    // A feature is compiled in unless the host positively lacks it. The kernels
    // check the running CPU again before entering vectorized code.
    fn enabled(&self) -> bool {
        self.detected.unwrap_or(true)
    }
}

trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") else {
            return;
        };

        let flags: Vec<String> = cpuinfo
            .lines()
            .find(|line| line.starts_with("flags"))
            .map(|line| {
                line.split_whitespace()
                    .map(|token| token.to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        if flags.is_empty() {
            return;
        }

        for feature in features.iter_mut() {
            let present = feature
                .linux_flags
                .iter()
                .any(|flag| flags.iter().any(|token| token == flag));
            feature.detected = Some(present);
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let Ok(output) = Command::new("sysctl").args(["-a"]).output() else {
            return;
        };

        let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();
        for feature in features.iter_mut() {
            feature.detected = Some(contents.contains(feature.macos_key));
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        for detector in Self::cpu_features_detectors() {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    fn apply(features: &[CpuFeature], x86_target: bool) {
        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(avx)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");

        let mut applied = Vec::new();
        if x86_target {
            for feature in features.iter().filter(|feature| feature.enabled()) {
                println!("cargo:rustc-cfg={}", feature.cfg_flag);
                applied.push(feature.name);
            }
        }

        if applied.is_empty() {
            println!("cargo:rustc-cfg=fallback");
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let x86_target = arch == "x86" || arch == "x86_64";

    let mut features = CpuFeature::features();

    // Host inspection only says something about the target for native builds.
    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();
    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    // Features the target is compiled with are available regardless of the host.
    let target_features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
    for feature in features.iter_mut() {
        if target_features.split(',').any(|f| f == feature.name) {
            feature.detected = Some(true);
        }
    }

    PlatformDetector::apply(&features, x86_target);
}
