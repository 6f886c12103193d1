//! Testing utilities
//!
//!     Trees in tests are written as s-expressions instead of builder chains, and grammars
//!     come from the JSON fixtures under `tests/fixtures/grammars`, so every test reads the
//!     same vetted inputs.
//!
//! Tree Fixtures
//!
//!     A parenthesized group is a node with children, a bare word is a childless node:
//!
//!         (program (call name (arguments number)) comment)
//!
//!     [sexp_tree] builds the arena tree, [visited_kinds] walks a cursor and returns the kinds
//!     in visit order, which is the shape most walk assertions take.

use crate::cursor::{Cursor, SyntaxNode};
use crate::error::TreeBuildError;
use crate::grammar::Grammar;
use crate::tree::{Tree, TreeBuilder};
use crate::walk::walk_all;
use logos::{Lexer, Logos};
use std::path::PathBuf;

/// Tokens of the s-expression tree notation
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
enum SexpToken<'a> {
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[regex(r"[^() \t\r\n]+", |lex| lex.slice())]
    Word(&'a str),
}

fn next_token<'s>(
    lexer: &mut Lexer<'s, SexpToken<'s>>,
) -> Option<Result<SexpToken<'s>, TreeBuildError>> {
    let token = lexer.next()?;
    Some(token.map_err(|()| TreeBuildError::UnexpectedInput {
        offset: lexer.span().start,
    }))
}

/// Build an arena tree from an s-expression
pub fn sexp_tree(source: &str) -> Result<Tree, TreeBuildError> {
    let mut builder = TreeBuilder::new();
    let mut lexer = SexpToken::lexer(source);
    while let Some(token) = next_token(&mut lexer) {
        builder = match token? {
            SexpToken::Open => match next_token(&mut lexer).transpose()? {
                Some(SexpToken::Word(kind)) => builder.start_node(kind),
                _ => return Err(TreeBuildError::MissingKind),
            },
            SexpToken::Close => builder.finish_node(),
            SexpToken::Word(kind) => builder.token(kind),
        };
    }
    builder.finish()
}

/// Walk `cursor` and collect the kind of every visited node
pub fn visited_kinds<C>(cursor: &mut C) -> Vec<String>
where
    C: Cursor + ?Sized,
    C::Node: SyntaxNode,
{
    let mut kinds = Vec::new();
    walk_all(cursor, |node| kinds.push(node.kind().to_string()));
    kinds
}

/// Path of a grammar fixture by name
pub fn grammar_fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/grammars")
        .join(format!("{}.json", name))
}

/// Load a grammar fixture, panicking with the fixture name if it is missing or malformed
pub fn grammar_fixture(name: &str) -> Grammar {
    let path = grammar_fixture_path(name);
    let source = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read fixture {}: {}", path.display(), err));
    Grammar::from_json(&source)
        .unwrap_or_else(|err| panic!("fixture {} is not a valid grammar: {}", name, err))
}
