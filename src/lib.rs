//! `cccc` is a set of libraries for reading and writing the CCCC multigroup
//! cross section interchange files
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of the core crates
#[doc(inline)]
pub use cccc_record as record;

#[doc(inline)]
pub use cccc_scatter as scatter;

#[doc(inline)]
pub use cccc_utils as utils;

// Re-exports of the format crates
#[cfg(feature = "compxs")]
#[cfg_attr(docsrs, doc(cfg(feature = "compxs")))]
#[doc(inline)]
pub use cccc_compxs as compxs;

#[cfg(feature = "isotxs")]
#[cfg_attr(docsrs, doc(cfg(feature = "isotxs")))]
#[doc(inline)]
pub use cccc_isotxs as isotxs;
