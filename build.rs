extern crate rustc_version;
use cfg_aliases::cfg_aliases;
use rustc_version::{version, Version};

fn main() {
    // core::hint::black_box is only stable from 1.66 on.
    if let Ok(v) = version() {
        if v >= Version::new(1, 66, 0) {
            println!("cargo:rustc-cfg=hint_black_box");
        }
    }

    cfg_aliases! {
        asm_barrier: { any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "arm",
            target_arch = "aarch64",
            target_arch = "riscv64"
        ) },
    }
}
