// src/extractors/mod.rs
pub mod entry;
pub mod mentions;
pub mod page_meta;
pub mod section;
pub mod sections;

// Re-export key extraction types for convenience
pub use entry::{Entry, EntryValue, Payload, TitleRule, UNPARSED_SENTINEL};
pub use mentions::{Mention, MentionContext};
pub use page_meta::Highlights;
pub use section::{HeadingMatch, SectionBlocks};
pub use sections::{ChampionChanges, ItemChanges, OtherSections, SectionEntries, SectionValue};
