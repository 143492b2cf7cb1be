use std::env;

fn main() {
    // Expose the crate version under the name shared by the butterfly tools
    if let Ok(version) = env::var("CARGO_PKG_VERSION") {
        println!("cargo:rustc-env=BUTTERFLY_VERSION={}", version);
    }

    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=assets/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
