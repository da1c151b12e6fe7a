use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=LANLGEOMAG_LIB_DIR");
    println!("cargo:rerun-if-changed=data/igrf_dipole.dat");

    // only link the native library when the OP77 backend is requested
    if env::var_os("CARGO_FEATURE_LANLGEOMAG").is_none() {
        return;
    }
    if let Some(dir) = env::var_os("LANLGEOMAG_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
    println!("cargo:rustc-link-lib=LanlGeoMag");
}
