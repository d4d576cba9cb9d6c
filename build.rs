use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PICODRIVE_DIR");

    // Sem a feature `picodrive` o adapter é Rust puro e não linka nada
    if env::var_os("CARGO_FEATURE_PICODRIVE").is_none() {
        return;
    }

    build_picodrive_glue();
}

#[cfg(feature = "picodrive")]
fn build_picodrive_glue() {
    // PICODRIVE_DIR aponta para a árvore do PicoDrive já compilada
    // (headers em `pico/`, biblioteca estática `libpicodrive.a` na raiz).
    let pico_dir = env::var("PICODRIVE_DIR").unwrap_or_else(|_| "picodrive".to_string());

    println!("cargo:rerun-if-changed=csrc/pico_glue.c");

    cc::Build::new()
        .file("csrc/pico_glue.c")
        .include(&pico_dir)
        .warnings(false)
        .compile("pico_glue");

    println!("cargo:rustc-link-search=native={}", pico_dir);
    println!("cargo:rustc-link-lib=static=picodrive");
}

#[cfg(not(feature = "picodrive"))]
fn build_picodrive_glue() {}
