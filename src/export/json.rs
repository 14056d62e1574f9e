//! JSON interchange form of the AST.
//!
//! Field names are the snake_case names of the AST structs and never change
//! between versions of the tool. Options and sub-questions may be omitted
//! from hand-written input; they default to empty.

use crate::dsl::Paper;

pub fn to_json(paper: &Paper) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(paper)
}

pub fn from_json(json: &str) -> Result<Paper, serde_json::Error> {
    serde_json::from_str(json)
}
