//! Retrieves information about the version of the engine from Git and the build
//! environment. The generated `shadow.rs` is included by `lib.rs` and can be
//! accessed at runtime by the engine.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
