//! Treeviz formatter for syntax trees
//!
//! Treeviz prints one line per node, nesting encoded as indentation with 2 white spaces per
//! level. The starting node is printed first, unindented; everything below it comes from a
//! single cursor walk, so the output order is document order.
//!
//! So the format is :
//! <line number?><indentation>(per level) <kind> (truncated to 30 characters)<range?>
//!
//! Example:
//!
//!     program
//!       call
//!         name
//!         arguments
//!       comment
//!
//! Parameters
//!     show-linum: prefix every line with the 1-based line its node starts on
//!     show-ranges: append the node's source range

use crate::cursor::{Cursor, SyntaxNode};
use crate::walk::Descendants;
use std::collections::HashMap;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn flag(params: &HashMap<String, String>, name: &str) -> bool {
    params.get(name).map(|v| v != "false").unwrap_or(false)
}

fn format_line<N: SyntaxNode>(
    node: &N,
    depth: usize,
    show_linum: bool,
    show_ranges: bool,
) -> String {
    let linum_prefix = if show_linum {
        format!("{:02} ", node.range().from.line + 1)
    } else {
        String::new()
    };
    let range_suffix = if show_ranges {
        format!(" [{}]", node.range())
    } else {
        String::new()
    };
    format!(
        "{}{}{}{}\n",
        linum_prefix,
        "  ".repeat(depth),
        truncate(node.kind(), 30),
        range_suffix
    )
}

pub fn to_treeviz_str<C>(cursor: &mut C) -> String
where
    C: Cursor + ?Sized,
    C::Node: SyntaxNode,
{
    to_treeviz_str_with_params(cursor, &HashMap::new())
}

pub fn to_treeviz_str_with_params<C>(cursor: &mut C, params: &HashMap<String, String>) -> String
where
    C: Cursor + ?Sized,
    C::Node: SyntaxNode,
{
    let show_linum = flag(params, "show-linum");
    let show_ranges = flag(params, "show-ranges");

    let mut output = format_line(&cursor.node(), 0, show_linum, show_ranges);
    let mut descendants = Descendants::new(cursor);
    while let Some(node) = descendants.next() {
        output.push_str(&format_line(
            &node,
            descendants.depth(),
            show_linum,
            show_ranges,
        ));
    }
    output
}
