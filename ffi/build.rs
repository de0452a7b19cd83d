fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let result = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("CHECKOUT_FFI_H")
        .generate();

    match result {
        Ok(bindings) => {
            let include_dir = format!("{crate_dir}/include");
            if let Err(e) = std::fs::create_dir_all(&include_dir) {
                println!("cargo:warning=cannot create {include_dir}: {e}");
                return;
            }
            bindings.write_to_file(format!("{include_dir}/checkout.h"));
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
