//! Local filesystem walker
//!
//! This module finds candidate files below the scan root. Loading and
//! naming happen later, in [`crate::consolidate`].
//!
//! # Traversal
//!
//! ```text
//! root/                 dirs visited depth first, files before sub-dirs
//! ├── a.csv        ──►  Candidate { file_name: "a.csv", sub_path: "" }
//! ├── notes.txt         (no supported extension)
//! └── 2023/
//!     └── a.csv    ──►  Candidate { file_name: "a.csv", sub_path: "/2023" }
//! ```

pub mod scan;

pub use scan::{scan, Candidate, ScanResult};
