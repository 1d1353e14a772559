//! Parsers for sloth's input files.
//!
//! Option files (`options.sloth`, `<prefix>.sloth` and the global config
//! file) share one line-oriented section format. The reader here only
//! produces sections and entries; the overlay module gives them meaning.
//!
//! # Usage
//!
//! ```ignore
//! use sloth::parser::SlothFile;
//!
//! let file = SlothFile::load(Path::new("textures/metal_src/options.sloth"))?;
//! if let Some(options) = file.section("options") {
//!     for entry in &options.entries {
//!         println!("{} = {}", entry.key, entry.raw());
//!     }
//! }
//! ```

mod sloth;

pub use sloth::{parse_int_token, Entry, Section, SlothFile};
