//! Bundled style packs (compiled into binary)
//!
//! Each pack is a TOML document with one `[palettes.<phase>]` table per phase.
//! Packs are data: adding a pack means adding a file here and a `StylePack`
//! variant, nothing else.

mod muted;
mod slate;
mod vivid;

pub use muted::PACK as MUTED;
pub use slate::PACK as SLATE;
pub use vivid::PACK as VIVID;
