//! # Lode Forge Application (Binary)
//!
//! Main executable entry point.

fn main() -> anyhow::Result<()> {
    lode_forge_app::main()
}
