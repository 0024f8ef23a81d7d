//! Advisory quality checks for inkpaste documents
//!
//!     The checker walks the structural tree produced by inkpaste-parser and reports problems
//!     an author usually wants to fix before pasting into a publishing platform: insecure
//!     links, heading jumps, missing alternative text, images that point at local files and
//!     embedded HTML that the platform is likely to mangle.
//!
//!     Issues are advisory. They are collected alongside rendering and never stop it.
//!
//! Usage
//!
//!     let issues = check_source("# Title\n\n[x](http://example.com)\n", &CheckOptions::default());
//!     for issue in &issues {
//!         println!("{}", issue);
//!     }

pub mod checker;
pub mod issue;

pub use checker::{check_document, check_source, CheckOptions};
pub use issue::{IssueKind, QualityIssue};
