//! Table naming
//!
//! A table takes the bare name of its source file. When more than one loaded
//! file shares that name, each gets its root-relative directory appended:
//!
//! ```text
//! root/sales.csv           -> "sales.csv"
//! root/2023/sales.csv      -> "sales.csv/2023"
//! root/2024/q1/sales.csv   -> "sales.csv/2024/q1"
//! ```
//!
//! Names are compared case-insensitively because SQLite identifiers are.
//! File names and directories that differ only in case can still produce
//! the same identifier; [`NameRegistry`] gives the later table a numbered
//! name instead of letting it replace the earlier one.

use crate::walker::Candidate;
use std::collections::{HashMap, HashSet};

/// Key under which two file names would collide as SQLite identifiers
pub fn collision_key(file_name: &str) -> String {
    file_name.to_lowercase()
}

/// Table name for a file, suffixed with its sub-path when the name is shared
pub fn table_name(file_name: &str, sub_path: &str, shared: bool) -> String {
    if shared {
        format!("{}{}", file_name, sub_path)
    } else {
        file_name.to_string()
    }
}

/// Table names already used in the current run
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, or `name.1`, `name.2`, ... when it is already used
    pub fn claim(&mut self, name: String) -> String {
        if self.taken.insert(collision_key(&name)) {
            return name;
        }

        let mut suffix = 1;
        loop {
            let numbered = format!("{}.{}", name, suffix);
            if self.taken.insert(collision_key(&numbered)) {
                return numbered;
            }
            suffix += 1;
        }
    }
}

/// Quote a name for use as an SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Group candidates sharing a file name, in order of first appearance
pub fn group_by_name(candidates: Vec<Candidate>) -> Vec<Vec<Candidate>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Candidate>> = Vec::new();

    for candidate in candidates {
        let key = collision_key(&candidate.file_name);
        match index.get(&key) {
            Some(&position) => groups[position].push(candidate),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![candidate]);
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::FileKind;
    use std::path::PathBuf;

    fn candidate(file_name: &str, sub_path: &str) -> Candidate {
        Candidate {
            file_name: file_name.to_string(),
            path: PathBuf::from(format!("/root{}/{}", sub_path, file_name)),
            sub_path: sub_path.to_string(),
            kind: FileKind::from_file_name(file_name).unwrap(),
        }
    }

    #[test]
    fn test_table_name() {
        assert_eq!(table_name("sales.csv", "/2023", false), "sales.csv");
        assert_eq!(table_name("sales.csv", "/2023", true), "sales.csv/2023");
        assert_eq!(table_name("sales.csv", "", true), "sales.csv");
    }

    #[test]
    fn test_registry_numbers_case_clashes() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("Data.csv".into()), "Data.csv");
        assert_eq!(names.claim("data.csv".into()), "data.csv.1");
        assert_eq!(names.claim("DATA.CSV".into()), "DATA.CSV.2");
        assert_eq!(names.claim("data.csv/A".into()), "data.csv/A");
        assert_eq!(names.claim("data.csv/a".into()), "data.csv/a.1");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("a b.csv"), "\"a b.csv\"");
        assert_eq!(quote_identifier("say \"hi\".json"), "\"say \"\"hi\"\".json\"");
    }

    #[test]
    fn test_grouping_preserves_order() {
        let groups = group_by_name(vec![
            candidate("a.csv", ""),
            candidate("b.json", ""),
            candidate("a.csv", "/x"),
            candidate("A.CSV.json", "/y"),
            candidate("B.json", "/z"),
        ]);

        let shape: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.iter().map(|c| c.sub_path.as_str()).collect())
            .collect();
        assert_eq!(shape, vec![vec!["", "/x"], vec!["", "/z"], vec!["/y"]]);
    }
}
