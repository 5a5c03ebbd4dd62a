fn main() {
    // Re-run if the window/capability config changes
    println!("cargo:rerun-if-changed=tauri.conf.json");
    println!("cargo:rerun-if-changed=capabilities");

    tauri_build::build()
}
