//! CPU feature detection

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::__cpuid;

use serde::Serialize;

use crate::vectors::wide::{LaneWidths, SIMD_BYTES};

/// SIMD features of the host CPU, detected at runtime.
///
/// The hardware-width vectors are sized at compile time, so a binary built
/// without `-C target-cpu=native` can use fewer lanes than the host offers;
/// `print_report` shows both.
#[derive(Debug, Clone, Serialize)]
pub struct CpuCapabilities {
    pub vendor: String,
    pub model: String,
    pub has_sse2: bool,
    pub has_avx: bool,
    pub has_avx2: bool,
    pub has_fma: bool,
    pub has_avx512: bool,
    pub has_neon: bool,
    pub core_count: usize,
}

impl CpuCapabilities {
    pub fn detect() -> Self {
        let mut caps = Self {
            vendor: Self::get_vendor(),
            model: Self::get_model(),
            has_sse2: false,
            has_avx: false,
            has_avx2: false,
            has_fma: false,
            has_avx512: false,
            has_neon: false,
            core_count: num_cpus::get(),
        };

        #[cfg(target_arch = "x86_64")]
        {
            caps.has_sse2 = is_x86_feature_detected!("sse2");
            caps.has_avx = is_x86_feature_detected!("avx");
            caps.has_avx2 = is_x86_feature_detected!("avx2");
            caps.has_fma = is_x86_feature_detected!("fma");
            caps.has_avx512 = is_x86_feature_detected!("avx512f");
        }

        #[cfg(target_arch = "aarch64")]
        {
            // NEON is mandatory on aarch64
            caps.has_neon = true;
        }

        caps
    }

    /// Widest vector register the host supports, in bits.
    pub fn simd_register_bits(&self) -> usize {
        if self.has_avx512 {
            512
        } else if self.has_avx {
            256
        } else if self.has_sse2 || self.has_neon {
            128
        } else {
            64
        }
    }

    /// True when the compiled lane width is narrower than the host allows.
    pub fn lanes_underused(&self) -> bool {
        SIMD_BYTES * 8 < self.simd_register_bits()
    }

    #[cfg(target_arch = "x86_64")]
    fn get_vendor() -> String {
        // SAFETY: cpuid leaf 0 is available on every x86_64 CPU
        let r = unsafe { __cpuid(0) };
        let mut bytes = Vec::with_capacity(12);
        for reg in [r.ebx, r.edx, r.ecx] {
            bytes.extend_from_slice(&reg.to_le_bytes());
        }
        String::from_utf8_lossy(&bytes).trim().to_string()
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn get_vendor() -> String {
        #[cfg(target_os = "macos")]
        {
            if let Some(brand) = sysctl_string("machdep.cpu.brand_string") {
                if brand.contains("Apple") {
                    return "Apple".into();
                }
                if let Some(first) = brand.split_whitespace().next() {
                    return first.into();
                }
            }
        }
        "Unknown".into()
    }

    #[cfg(target_arch = "x86_64")]
    fn get_model() -> String {
        // SAFETY: extended leaf 0x80000000 reports the highest supported leaf
        let max_leaf = unsafe { __cpuid(0x8000_0000) }.eax;
        if max_leaf < 0x8000_0004 {
            return "Unknown".into();
        }

        let mut bytes = Vec::with_capacity(48);
        for leaf in 0x8000_0002u32..=0x8000_0004u32 {
            // SAFETY: leaf checked against max_leaf above
            let r = unsafe { __cpuid(leaf) };
            for reg in [r.eax, r.ebx, r.ecx, r.edx] {
                bytes.extend_from_slice(&reg.to_le_bytes());
            }
        }
        String::from_utf8_lossy(&bytes)
            .trim_matches(char::from(0))
            .trim()
            .to_string()
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn get_model() -> String {
        #[cfg(target_os = "macos")]
        {
            if let Some(brand) = sysctl_string("machdep.cpu.brand_string") {
                return brand;
            }
            if let Some(model) = sysctl_string("hw.model") {
                return format!("Apple {}", model);
            }
        }
        "Unknown".into()
    }

    pub fn print_report(&self) {
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        let lanes = LaneWidths::current();

        println!("CPU Capabilities:");
        println!("  Vendor:     {}", if self.vendor.is_empty() { "Unknown" } else { &self.vendor });
        println!("  Model:      {}", if self.model.is_empty() { "Unknown" } else { &self.model });
        println!("  Cores:      {}", self.core_count);
        if cfg!(target_arch = "aarch64") {
            println!("  NEON:       {}", yes_no(self.has_neon));
        } else {
            println!("  SSE2:       {}", yes_no(self.has_sse2));
            println!("  AVX:        {}", yes_no(self.has_avx));
            println!("  AVX2:       {}", yes_no(self.has_avx2));
            println!("  FMA:        {}", yes_no(self.has_fma));
            println!("  AVX-512:    {}", yes_no(self.has_avx512));
        }
        println!("  Host SIMD:  {} bits", self.simd_register_bits());
        println!("  Built SIMD: {} bits", SIMD_BYTES * 8);
        println!(
            "  HwVector:   {} floats, {} doubles, {} ints",
            lanes.floats, lanes.doubles, lanes.ints
        );
        if self.lanes_underused() {
            println!("  Note: rebuild with RUSTFLAGS=\"-C target-cpu=native\" to use the full width");
        }
    }
}

impl Default for CpuCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(target_os = "macos")]
fn sysctl_string(key: &str) -> Option<String> {
    let output = std::process::Command::new("sysctl").args(["-n", key]).output().ok()?;
    let s = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!s.is_empty()).then_some(s)
}
