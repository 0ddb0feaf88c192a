//! Xiangqi (Chinese chess) rules engine with a greedy automated player.
//!
//! The crate is split into layers:
//!
//! - [`rules`]: coordinates, pieces, the board and move legality.
//! - [`evaluation`]: material values of the pieces.
//! - [`search`]: the automated player picking the most valuable capture.
//! - [`session`]: a game in progress, the interface for presentation layers.
//! - [`Engine`]: a line-based text protocol driving a session.

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![deny(clippy::perf)]

pub mod evaluation;
pub mod rules;
pub mod search;
pub mod session;

mod engine;
pub use engine::Engine;
pub use session::GameSession;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version on engine startup.
pub fn print_engine_info() {
    println!("Xiangqi engine {}", engine_version());
}
