fn main() {
    // The pinned source directory can be baked in at build time
    println!("cargo:rerun-if-env-changed=DIRENV_RELOAD_SOURCE_DIR");
}
