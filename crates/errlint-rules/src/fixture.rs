//! Minimal source-to-tree parser for rule tests.
//!
//! Builds [`Tree`]s with exact byte spans for the expression subset the
//! tests exercise: call chains, bracket indexing, `<<`, index assignment,
//! and primitive literals. Fixtures are trusted input; anything outside
//! the subset panics.

use errlint_core::{NodeId, Span, Tree, TreeBuilder};
use std::collections::HashSet;

/// Parses `source` with no known local variables: a bare identifier is an
/// implicit-self call, as a real parser would produce without scope info.
pub(crate) fn parse(source: &str) -> Tree {
    parse_with_locals(source, &[])
}

/// Parses `source` treating the given identifiers as local variable reads.
pub(crate) fn parse_with_locals(source: &str, locals: &[&str]) -> Tree {
    Parser {
        source,
        pos: 0,
        builder: TreeBuilder::new(),
        locals: locals.iter().map(ToString::to_string).collect(),
    }
    .parse_program()
}

struct Parser<'s> {
    source: &'s str,
    pos: usize,
    builder: TreeBuilder,
    locals: HashSet<String>,
}

/// A parsed expression plus the pieces needed to rewrite `a[k] = v` into
/// an `[]=` call.
struct Expr {
    id: NodeId,
    span: Span,
    index: Option<(NodeId, NodeId)>,
}

impl Expr {
    fn plain(id: NodeId, span: Span) -> Self {
        Self {
            id,
            span,
            index: None,
        }
    }
}

impl<'s> Parser<'s> {
    fn parse_program(mut self) -> Tree {
        let mut statements = Vec::new();
        loop {
            self.skip_blank();
            if self.at_end() {
                break;
            }
            statements.push(self.parse_expr().id);
        }
        let span = Span::new(0, self.source.len());
        let root = self.builder.program(statements, span);
        self.builder.finish(root)
    }

    fn parse_expr(&mut self) -> Expr {
        let lhs = self.parse_postfix();
        self.skip_ws();
        if self.eat_str("<<") {
            self.skip_ws();
            let rhs = self.parse_expr();
            let span = Span::new(lhs.span.start, rhs.span.end);
            let id = self.builder.call(Some(lhs.id), "<<", vec![rhs.id], span);
            return Expr::plain(id, span);
        }
        if self.peek() == Some(b'=') && self.peek_at(1) != Some(b'=') {
            self.pos += 1;
            self.skip_ws();
            let rhs = self.parse_expr();
            let (receiver, key) = lhs
                .index
                .expect("assignment target must be an index expression");
            let span = Span::new(lhs.span.start, rhs.span.end);
            let id = self.builder.call(Some(receiver), "[]=", vec![key, rhs.id], span);
            return Expr::plain(id, span);
        }
        lhs
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match self.peek() {
                Some(b'.') => {
                    self.pos += 1;
                    let name = self.read_ident();
                    assert!(!name.is_empty(), "expected method name after `.`");
                    let args = if self.peek() == Some(b'(') {
                        self.parse_paren_args()
                    } else {
                        Vec::new()
                    };
                    let span = Span::new(expr.span.start, self.pos);
                    let id = self.builder.call(Some(expr.id), name, args, span);
                    expr = Expr::plain(id, span);
                }
                Some(b'[') => {
                    self.pos += 1;
                    self.skip_ws();
                    let key = self.parse_expr();
                    self.skip_ws();
                    assert!(self.eat(b']'), "expected `]`");
                    let span = Span::new(expr.span.start, self.pos);
                    let receiver = expr.id;
                    let id = self.builder.call(Some(receiver), "[]", vec![key.id], span);
                    expr = Expr {
                        id,
                        span,
                        index: Some((receiver, key.id)),
                    };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(b':') => {
                self.pos += 1;
                let name = self.read_ident();
                assert!(!name.is_empty(), "expected symbol name after `:`");
                let span = Span::new(start, self.pos);
                Expr::plain(self.builder.symbol(name, span), span)
            }
            Some(b'\'') => {
                self.pos += 1;
                let text_start = self.pos;
                while self.peek() != Some(b'\'') {
                    assert!(!self.at_end(), "unterminated string literal");
                    self.pos += 1;
                }
                let source = self.source;
                let text = &source[text_start..self.pos];
                self.pos += 1;
                let span = Span::new(start, self.pos);
                Expr::plain(self.builder.string(text, span), span)
            }
            Some(b'0'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
                let source = self.source;
                let text = &source[start..self.pos];
                let span = Span::new(start, self.pos);
                Expr::plain(self.builder.int(text, span), span)
            }
            Some(b'@') => {
                self.pos += 1;
                let name = self.read_ident();
                assert!(!name.is_empty(), "expected identifier after `@`");
                let source = self.source;
                let span = Span::new(start, self.pos);
                Expr::plain(self.builder.ivar(&source[start..self.pos], span), span)
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let name = self.read_ident();
                let span = Span::new(start, self.pos);
                match name {
                    "nil" => Expr::plain(self.builder.nil(span), span),
                    "self" => Expr::plain(self.builder.self_read(span), span),
                    _ if self.locals.contains(name) => {
                        Expr::plain(self.builder.lvar(name, span), span)
                    }
                    _ if name.starts_with(|c: char| c.is_ascii_uppercase()) => {
                        Expr::plain(self.builder.constant(name, span), span)
                    }
                    _ => {
                        // Implicit-self call, as a scope-less parse yields.
                        let args = if self.peek() == Some(b'(') {
                            self.parse_paren_args()
                        } else {
                            Vec::new()
                        };
                        let span = Span::new(start, self.pos);
                        Expr::plain(self.builder.call(None, name, args, span), span)
                    }
                }
            }
            other => panic!("unexpected input at byte {start}: {other:?}"),
        }
    }

    fn parse_paren_args(&mut self) -> Vec<NodeId> {
        assert!(self.eat(b'('), "expected `(`");
        self.skip_ws();
        let mut args = Vec::new();
        if self.peek() != Some(b')') {
            loop {
                args.push(self.parse_expr().id);
                self.skip_ws();
                if self.eat(b',') {
                    self.skip_ws();
                } else {
                    break;
                }
            }
        }
        assert!(self.eat(b')'), "expected `)`");
        args
    }

    fn read_ident(&mut self) -> &'s str {
        let source = self.source;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        if matches!(self.peek(), Some(b'!' | b'?')) {
            self.pos += 1;
        }
        &source[start..self.pos]
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    fn skip_blank(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + ahead).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, token: &str) -> bool {
        if self.source.as_bytes()[self.pos..].starts_with(token.as_bytes()) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errlint_core::NodeKind;

    #[test]
    fn parses_index_append_chain_with_exact_spans() {
        let source = "user.errors[:name] << 'msg'";
        let tree = parse_with_locals(source, &["user"]);
        let program = tree.node(tree.root());
        assert_eq!(program.kind(), NodeKind::Program);
        assert_eq!(program.args().len(), 1);

        let append = tree.node(program.args()[0]);
        assert_eq!(append.name(), Some("<<"));
        assert_eq!(append.span(), Span::new(0, 27));

        let index = tree.node(append.receiver().expect("receiver"));
        assert_eq!(index.name(), Some("[]"));
        assert_eq!(index.span(), Span::new(0, 18));

        let errors = tree.node(index.receiver().expect("receiver"));
        assert_eq!(errors.name(), Some("errors"));
        assert_eq!(errors.span(), Span::new(0, 11));

        let user = tree.node(errors.receiver().expect("receiver"));
        assert_eq!(user.kind(), NodeKind::LocalVarRead);

        let key = tree.node(index.args()[0]);
        assert_eq!(key.kind(), NodeKind::Symbol);
        assert_eq!(key.span(), Span::new(12, 17));

        let value = tree.node(append.args()[0]);
        assert_eq!(value.kind(), NodeKind::StringLit);
        assert_eq!(value.span(), Span::new(22, 27));
    }

    #[test]
    fn rewrites_index_assignment_into_index_set_call() {
        let source = "user.errors[:name] = msgs";
        let tree = parse_with_locals(source, &["user"]);
        let assign = tree.node(tree.node(tree.root()).args()[0]);
        assert_eq!(assign.name(), Some("[]="));
        assert_eq!(assign.span(), Span::new(0, 25));

        let receiver = tree.node(assign.receiver().expect("receiver"));
        assert_eq!(receiver.name(), Some("errors"));
        assert_eq!(assign.args().len(), 2);
        assert_eq!(tree.node(assign.args()[0]).kind(), NodeKind::Symbol);
        assert_eq!(tree.node(assign.args()[1]).kind(), NodeKind::Call);
    }

    #[test]
    fn bare_identifier_is_an_implicit_self_call() {
        let tree = parse("errors[:name]");
        let index = tree.node(tree.node(tree.root()).args()[0]);
        let errors = tree.node(index.receiver().expect("receiver"));
        assert_eq!(errors.kind(), NodeKind::Call);
        assert!(errors.receiver().is_none());
    }

    #[test]
    fn parses_parenthesized_arguments_and_statements() {
        let source = "user.save\nuser.errors.add(:name, 'bad')";
        let tree = parse_with_locals(source, &["user"]);
        let program = tree.node(tree.root());
        assert_eq!(program.args().len(), 2);

        let add = tree.node(program.args()[1]);
        assert_eq!(add.name(), Some("add"));
        assert_eq!(add.args().len(), 2);
        assert_eq!(add.span(), Span::new(10, 39));
    }

    #[test]
    fn parses_constants_ivars_and_bang_methods() {
        let tree = parse("@user.errors[:name].sort!\nUser.count");
        let program = tree.node(tree.root());

        let sort = tree.node(program.args()[0]);
        assert_eq!(sort.name(), Some("sort!"));
        let index = tree.node(sort.receiver().expect("receiver"));
        let errors = tree.node(index.receiver().expect("receiver"));
        let ivar = tree.node(errors.receiver().expect("receiver"));
        assert_eq!(ivar.kind(), NodeKind::InstanceVarRead);
        assert_eq!(ivar.name(), Some("@user"));

        let count = tree.node(program.args()[1]);
        let constant = tree.node(count.receiver().expect("receiver"));
        assert_eq!(constant.kind(), NodeKind::ConstRead);
    }
}
