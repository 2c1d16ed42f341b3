fn main() {
    // Only the ESP-IDF build needs the toolchain environment forwarded.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
