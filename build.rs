fn main() {
    // Recompile when the baked-in timer configuration override changes.
    println!("cargo:rerun-if-env-changed=POMODORO_CONFIG_JSON");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
