fn main() {
    // CGS*/SLS* window-server introspection lives in the private SkyLight
    // framework; nothing in the public SDK exports these symbols.
    println!("cargo:rustc-link-search=framework=/System/Library/PrivateFrameworks");
    println!("cargo:rustc-link-lib=framework=SkyLight");
}
