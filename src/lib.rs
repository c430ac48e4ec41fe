//! Find file paths in markdown and MDX text and resolve them to files on disk.
//!
//! The engine is two pure pieces: [`patterns`] finds candidate path tokens
//! in a line, [`resolver`] turns a token into an absolute path. [`links`]
//! composes them with an existence check for the two host operations,
//! scanning a document for links and resolving the token under a cursor.
//! The remaining modules make up the command-line host.

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
mod info;
pub mod links;
pub mod patterns;
pub mod resolver;
pub mod scanner;
pub mod toggle;
pub mod types;

pub use error::Error;
pub use links::{Cursor, resolve_token_at_cursor, scan_document, scan_line_for_links};
pub use patterns::{PatternSet, TokenPattern};
pub use resolver::{FileSystem, RealFs, ResolutionContext, ResolveOptions, Strategy, resolve};
pub use toggle::LinkToggle;
pub use types::{DocumentLink, LinkRange, Resolution, RootRule, TokenMatch};
