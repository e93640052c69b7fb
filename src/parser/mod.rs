//! Token stream -> AST, per spec §4.2: Pratt precedence for expressions,
//! recursive descent for statements and blocks. Never aborts; unparseable
//! constructs are recorded as diagnostics and the parser resynchronises at
//! the next statement terminator, `end`, closing bracket, or end-of-input.

pub mod precedence;

use crate::ast::{
    AssignTarget, BinaryOp, ElsifBlock, FieldDecl, MethodDef, Node, Parameter, TypeAnnotation,
    UnaryOp,
};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::intern::{Interner, Symbol};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use precedence::Precedence;

pub struct Parser<'i> {
    lexer: Lexer<'i>,
    cur: Token,
    peek: Token,
    peek2: Token,
    diagnostics: Vec<Diagnostic>,
}

/// Convenience entry point: lex and parse `source` in one call, per spec
/// §4.2's `parse(lexer) -> (Program, diagnostics)` contract.
pub fn parse(source: &str, interner: &mut Interner) -> (Node, Vec<Diagnostic>) {
    let lexer = Lexer::new(source, interner);
    Parser::new(lexer).parse_program()
}

/// The `BinaryOp` a compound-assignment token desugars to, or `None` if
/// `kind` isn't one of `+= -= *= /= %=`.
fn compound_assign_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::PlusAssign => Some(BinaryOp::Add),
        TokenKind::MinusAssign => Some(BinaryOp::Sub),
        TokenKind::AsteriskAssign => Some(BinaryOp::Mul),
        TokenKind::SlashAssign => Some(BinaryOp::Div),
        TokenKind::PercentAssign => Some(BinaryOp::Mod),
        _ => None,
    }
}

impl<'i> Parser<'i> {
    pub fn new(mut lexer: Lexer<'i>) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        let peek2 = lexer.next_token();
        let diagnostics = lexer.take_diagnostics();
        Parser { lexer, cur, peek, peek2, diagnostics }
    }

    pub fn parse_program(mut self) -> (Node, Vec<Diagnostic>) {
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !self.cur_is(TokenKind::Eof) {
            statements.push(self.parse_statement());
            self.skip_semicolons();
        }
        (Node::Program { statements }, self.diagnostics)
    }

    // -- token stream plumbing -------------------------------------------

    fn advance(&mut self) {
        self.cur = self.peek;
        self.peek = self.peek2;
        self.peek2 = self.lexer.next_token();
        self.diagnostics.extend(self.lexer.take_diagnostics());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn peek2_is(&self, kind: TokenKind) -> bool {
        self.peek2.kind == kind
    }

    fn skip_semicolons(&mut self) {
        while self.cur_is(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Consume `cur` if it matches `kind`, else record an `UnexpectedToken`
    /// diagnostic and leave the cursor where it is (the caller decides how
    /// to recover).
    fn expect_cur(&mut self, kind: TokenKind) -> bool {
        if self.cur_is(kind) {
            self.advance();
            true
        } else {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnexpectedToken { expected: kind, found: self.cur.kind },
                self.cur.line,
                self.cur.column,
            ));
            false
        }
    }

    fn expect_end(&mut self) {
        if self.cur_is(TokenKind::End) {
            self.advance();
        } else {
            self.diagnostics.push(Diagnostic::new(DiagnosticKind::MissingEnd, self.cur.line, self.cur.column));
        }
    }

    fn expect_closing(&mut self, kind: TokenKind) {
        if self.cur_is(kind) {
            self.advance();
        } else {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingClosingBracket(kind),
                self.cur.line,
                self.cur.column,
            ));
        }
    }

    /// Skip forward to the next synchronising token (a statement
    /// terminator, `end`, a closing bracket, or end-of-input), per spec
    /// §4.2's state machine.
    fn synchronize(&mut self) {
        while !matches!(
            self.cur.kind,
            TokenKind::Semicolon
                | TokenKind::End
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::Eof
        ) {
            self.advance();
        }
        if self.cur_is(TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn parse_block(&mut self, terminators: &[TokenKind]) -> Vec<Node> {
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !terminators.contains(&self.cur.kind) && !self.cur_is(TokenKind::Eof) {
            statements.push(self.parse_statement());
            self.skip_semicolons();
        }
        statements
    }

    // -- statements --------------------------------------------------------

    fn parse_statement(&mut self) -> Node {
        match self.cur.kind {
            TokenKind::Def => self.parse_func_def(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Puts => self.parse_print_stmt(),
            TokenKind::Require => self.parse_require_stmt(),
            TokenKind::Class => self.parse_class_def(),
            TokenKind::Type => self.parse_type_decl(),
            TokenKind::Let | TokenKind::Var => {
                self.advance();
                self.parse_var_decl()
            }
            TokenKind::Identifier if self.peek_is(TokenKind::Colon) => self.parse_var_decl(),
            TokenKind::Identifier if self.peek_is(TokenKind::Assign) => self.parse_identifier_assignment(),
            TokenKind::Identifier if compound_assign_op(self.peek.kind).is_some() => {
                self.parse_identifier_compound_assignment()
            }
            TokenKind::At if self.peek_is(TokenKind::Identifier) && self.peek2_is(TokenKind::Assign) => {
                self.parse_instance_var_assignment()
            }
            TokenKind::At
                if self.peek_is(TokenKind::Identifier)
                    && compound_assign_op(self.peek2.kind).is_some() =>
            {
                self.parse_instance_var_compound_assignment()
            }
            _ => {
                let expr = self.parse_expression(Precedence::Lowest);
                if self.cur_is(TokenKind::Illegal) {
                    let msg = self.lexer.interner().resolve(self.cur.literal).to_string();
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::IllegalCharacter(msg),
                        self.cur.line,
                        self.cur.column,
                    ));
                    self.synchronize();
                }
                expr
            }
        }
    }

    /// `IDENT (':' type)? ('=' expr)?`, with an optional leading `let`/`var`
    /// already consumed by the caller.
    fn parse_var_decl(&mut self) -> Node {
        let name = self.cur.literal;
        self.expect_cur(TokenKind::Identifier);
        let type_annotation = if self.cur_is(TokenKind::Colon) {
            self.advance();
            Some(self.parse_type_annotation())
        } else {
            None
        };
        let value = if self.cur_is(TokenKind::Assign) {
            self.advance();
            Some(Box::new(self.parse_expression(Precedence::Lowest)))
        } else {
            None
        };
        Node::VariableDecl { name, type_annotation, value }
    }

    fn parse_identifier_assignment(&mut self) -> Node {
        let name = self.cur.literal;
        self.advance(); // identifier
        self.advance(); // '='
        let value = Box::new(self.parse_expression(Precedence::Lowest));
        Node::Assignment { name: AssignTarget::Identifier(name), value }
    }

    fn parse_instance_var_assignment(&mut self) -> Node {
        self.advance(); // '@'
        let name = self.cur.literal;
        self.advance(); // identifier
        self.advance(); // '='
        let value = Box::new(self.parse_expression(Precedence::Lowest));
        Node::Assignment { name: AssignTarget::InstanceVar(name), value }
    }

    /// `IDENT op= expr` desugars to `IDENT = IDENT op expr`.
    fn parse_identifier_compound_assignment(&mut self) -> Node {
        let name = self.cur.literal;
        self.advance(); // identifier
        let op = compound_assign_op(self.cur.kind).expect("caller checked compound_assign_op");
        self.advance(); // 'op='
        let rhs = self.parse_expression(Precedence::Lowest);
        let value = Box::new(Node::BinaryExpr {
            left: Box::new(Node::Identifier(name)),
            op,
            right: Box::new(rhs),
        });
        Node::Assignment { name: AssignTarget::Identifier(name), value }
    }

    /// `@IDENT op= expr` desugars to `@IDENT = @IDENT op expr`.
    fn parse_instance_var_compound_assignment(&mut self) -> Node {
        self.advance(); // '@'
        let name = self.cur.literal;
        self.advance(); // identifier
        let op = compound_assign_op(self.cur.kind).expect("caller checked compound_assign_op");
        self.advance(); // 'op='
        let rhs = self.parse_expression(Precedence::Lowest);
        let value = Box::new(Node::BinaryExpr {
            left: Box::new(Node::InstanceVar(name)),
            op,
            right: Box::new(rhs),
        });
        Node::Assignment { name: AssignTarget::InstanceVar(name), value }
    }

    fn parse_if_stmt(&mut self) -> Node {
        self.advance(); // 'if'
        let condition = Box::new(self.parse_expression(Precedence::Lowest));
        self.expect_cur(TokenKind::Do);
        let consequence = self.parse_block(&[TokenKind::Elsif, TokenKind::Else, TokenKind::End]);

        let mut elsif_blocks = Vec::new();
        while self.cur_is(TokenKind::Elsif) {
            self.advance();
            let econd = Box::new(self.parse_expression(Precedence::Lowest));
            self.expect_cur(TokenKind::Do);
            let econs = self.parse_block(&[TokenKind::Elsif, TokenKind::Else, TokenKind::End]);
            elsif_blocks.push(ElsifBlock { condition: econd, consequence: econs });
        }

        let alternative = if self.cur_is(TokenKind::Else) {
            self.advance();
            Some(self.parse_block(&[TokenKind::End]))
        } else {
            None
        };

        self.expect_end();
        Node::IfStmt { condition, consequence, elsif_blocks, alternative }
    }

    fn parse_while_stmt(&mut self) -> Node {
        self.advance(); // 'while'
        let condition = Box::new(self.parse_expression(Precedence::Lowest));
        if self.cur_is(TokenKind::Do) {
            self.advance();
        }
        let body = self.parse_block(&[TokenKind::End]);
        self.expect_end();
        Node::WhileStmt { condition, body }
    }

    fn parse_for_stmt(&mut self) -> Node {
        self.advance(); // 'for'
        let iterator = self.cur.literal;
        self.expect_cur(TokenKind::Identifier);
        self.expect_cur(TokenKind::In);
        let iterable = Box::new(self.parse_expression(Precedence::Lowest));
        self.expect_cur(TokenKind::Do);
        let body = self.parse_block(&[TokenKind::End]);
        self.expect_end();
        Node::ForStmt { iterator, iterable, body }
    }

    fn parse_return_stmt(&mut self) -> Node {
        self.advance(); // 'return'
        let value = if self.at_statement_boundary() {
            None
        } else {
            Some(Box::new(self.parse_expression(Precedence::Lowest)))
        };
        Node::ReturnStmt { value }
    }

    fn at_statement_boundary(&self) -> bool {
        matches!(
            self.cur.kind,
            TokenKind::Semicolon | TokenKind::End | TokenKind::Else | TokenKind::Elsif | TokenKind::Eof
        )
    }

    fn parse_print_stmt(&mut self) -> Node {
        self.advance(); // 'puts'
        let value = Box::new(self.parse_expression(Precedence::Lowest));
        Node::PrintStmt { value }
    }

    fn parse_require_stmt(&mut self) -> Node {
        self.advance(); // 'require'
        let path = if self.cur_is(TokenKind::String) {
            let s = self.lexer.interner().resolve(self.cur.literal).to_string();
            self.advance();
            s
        } else {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::ExpectedExpression(self.cur.kind),
                self.cur.line,
                self.cur.column,
            ));
            String::new()
        };
        Node::RequireStmt { path }
    }

    fn parse_type_decl(&mut self) -> Node {
        self.advance(); // 'type'
        let name = self.cur.literal;
        self.expect_cur(TokenKind::Identifier);
        self.expect_cur(TokenKind::Assign);
        let type_value = self.parse_type_annotation();
        Node::TypeDeclaration { name, type_value }
    }

    fn parse_func_def(&mut self) -> Node {
        self.advance(); // 'def'
        let name = if self.cur_is(TokenKind::Identifier) {
            let n = self.cur.literal;
            self.advance();
            Some(n)
        } else {
            None
        };
        self.expect_cur(TokenKind::LParen);
        let parameters = self.parse_params();
        self.expect_closing(TokenKind::RParen);
        let return_type = if self.cur_is(TokenKind::Colon) {
            self.advance();
            Some(self.parse_type_annotation())
        } else {
            None
        };
        self.expect_cur(TokenKind::Do);
        let body = self.parse_block(&[TokenKind::End]);
        self.expect_end();
        Node::FunctionDef { name, parameters, return_type, body }
    }

    fn parse_params(&mut self) -> Vec<Parameter> {
        let mut params = Vec::new();
        if self.cur_is(TokenKind::RParen) {
            return params;
        }
        loop {
            if !self.cur_is(TokenKind::Identifier) {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ExpectedExpression(self.cur.kind),
                    self.cur.line,
                    self.cur.column,
                ));
                break;
            }
            let name = self.cur.literal;
            self.advance();
            let type_annotation = if self.cur_is(TokenKind::Colon) {
                self.advance();
                Some(self.parse_type_annotation())
            } else {
                None
            };
            params.push(Parameter { name, type_annotation });
            if self.cur_is(TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        params
    }

    fn parse_class_def(&mut self) -> Node {
        self.advance(); // 'class'
        let name = self.cur.literal;
        self.expect_cur(TokenKind::Identifier);
        let parent = if self.cur_is(TokenKind::Inherits) {
            self.advance();
            let p = self.cur.literal;
            self.expect_cur(TokenKind::Identifier);
            Some(p)
        } else {
            None
        };
        self.expect_cur(TokenKind::Do);

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        self.skip_semicolons();
        while !self.cur_is(TokenKind::End) && !self.cur_is(TokenKind::Eof) {
            if self.cur_is(TokenKind::Def) {
                methods.push(self.parse_method_def());
            } else if self.cur_is(TokenKind::Identifier) {
                let fname = self.cur.literal;
                self.advance();
                let type_annotation = if self.cur_is(TokenKind::Colon) {
                    self.advance();
                    Some(self.parse_type_annotation())
                } else {
                    None
                };
                fields.push(FieldDecl { name: fname, type_annotation });
            } else {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnexpectedToken { expected: TokenKind::Identifier, found: self.cur.kind },
                    self.cur.line,
                    self.cur.column,
                ));
                self.synchronize();
            }
            self.skip_semicolons();
        }
        self.expect_end();
        // Generic class instantiation (`Box<Int>.new(42)`) is left
        // unimplemented here; see the open question on class semantics.
        Node::ClassDef { name, parent, fields, methods, type_params: Vec::new() }
    }

    fn parse_method_def(&mut self) -> MethodDef {
        self.advance(); // 'def'
        let name = if self.cur_is(TokenKind::Identifier) {
            let n = self.cur.literal;
            self.advance();
            n
        } else {
            Symbol::EMPTY
        };
        self.expect_cur(TokenKind::LParen);
        let parameters = self.parse_params();
        self.expect_closing(TokenKind::RParen);
        let return_type = if self.cur_is(TokenKind::Colon) {
            self.advance();
            Some(self.parse_type_annotation())
        } else {
            None
        };
        self.expect_cur(TokenKind::Do);
        let body = self.parse_block(&[TokenKind::End]);
        self.expect_end();
        MethodDef { name, parameters, return_type, body }
    }

    // -- type annotations ---------------------------------------------------

    /// `type := IDENT ('<' type (',' type)* '>')? ('|' type)?`. The lexer
    /// only produces a `||` token (spec §3 never lists a bare `|`), so the
    /// union separator here is `TokenKind::Or` rather than a single pipe.
    fn parse_type_annotation(&mut self) -> TypeAnnotation {
        let base = self.parse_type_annotation_base();
        if self.cur_is(TokenKind::Or) {
            self.advance();
            let rhs = self.parse_type_annotation();
            let union_name = self.lexer.interner_mut().intern("union");
            return TypeAnnotation { type_name: union_name, type_params: vec![base, rhs] };
        }
        base
    }

    fn parse_type_annotation_base(&mut self) -> TypeAnnotation {
        if !self.cur_is(TokenKind::Identifier) {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::MalformedAnnotation,
                self.cur.line,
                self.cur.column,
            ));
            return TypeAnnotation { type_name: Symbol::EMPTY, type_params: Vec::new() };
        }
        let type_name = self.cur.literal;
        self.advance();
        let mut type_params = Vec::new();
        if self.cur_is(TokenKind::Lt) {
            self.advance();
            loop {
                type_params.push(self.parse_type_annotation());
                if self.cur_is(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
            if self.cur_is(TokenKind::Gt) {
                self.advance();
            } else {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedAnnotation,
                    self.cur.line,
                    self.cur.column,
                ));
            }
        }
        TypeAnnotation { type_name, type_params }
    }

    // -- expressions (Pratt) ------------------------------------------------

    fn parse_expression(&mut self, precedence: Precedence) -> Node {
        let mut left = self.parse_prefix();
        while precedence < Precedence::of(self.cur.kind) {
            left = self.parse_infix(left);
        }
        left
    }

    fn parse_prefix(&mut self) -> Node {
        match self.cur.kind {
            TokenKind::Int => self.parse_int_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::String => self.parse_string_literal(),
            TokenKind::True => {
                self.advance();
                Node::BoolLiteral(true)
            }
            TokenKind::False => {
                self.advance();
                Node::BoolLiteral(false)
            }
            TokenKind::Nil => {
                self.advance();
                Node::NilLiteral
            }
            TokenKind::SelfKw => {
                self.advance();
                Node::SelfExpr
            }
            TokenKind::Identifier | TokenKind::Puts => {
                let sym = self.cur.literal;
                self.advance();
                Node::Identifier(sym)
            }
            TokenKind::At => {
                self.advance();
                let sym = self.cur.literal;
                self.expect_cur(TokenKind::Identifier);
                Node::InstanceVar(sym)
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression(Precedence::Lowest);
                self.expect_closing(TokenKind::RParen);
                expr
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::Minus => {
                self.advance();
                let right = Box::new(self.parse_expression(Precedence::Prefix));
                Node::UnaryExpr { op: UnaryOp::Neg, right }
            }
            TokenKind::Bang => {
                self.advance();
                let right = Box::new(self.parse_expression(Precedence::Prefix));
                Node::UnaryExpr { op: UnaryOp::Not, right }
            }
            TokenKind::Def => self.parse_func_def(),
            TokenKind::Type => self.parse_type_decl(),
            TokenKind::New => self.parse_class_inst(),
            other => {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ExpectedExpression(other),
                    self.cur.line,
                    self.cur.column,
                ));
                self.advance();
                Node::NilLiteral
            }
        }
    }

    fn parse_int_literal(&mut self) -> Node {
        let text = self.lexer.interner().resolve(self.cur.literal).to_string();
        self.advance();
        Node::IntegerLiteral(text.parse().unwrap_or(0))
    }

    fn parse_float_literal(&mut self) -> Node {
        let text = self.lexer.interner().resolve(self.cur.literal).to_string();
        self.advance();
        Node::FloatLiteral(text.parse().unwrap_or(0.0))
    }

    fn parse_string_literal(&mut self) -> Node {
        let text = self.lexer.interner().resolve(self.cur.literal).to_string();
        self.advance();
        Node::StringLiteral(text)
    }

    fn parse_array_literal(&mut self) -> Node {
        self.advance(); // '['
        let mut elements = Vec::new();
        if !self.cur_is(TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression(Precedence::Lowest));
                if self.cur_is(TokenKind::Comma) {
                    self.advance();
                    if self.cur_is(TokenKind::RBracket) {
                        break; // trailing comma
                    }
                    continue;
                }
                break;
            }
        }
        self.expect_closing(TokenKind::RBracket);
        Node::ArrayLiteral { elements }
    }

    fn parse_class_inst(&mut self) -> Node {
        self.advance(); // 'new'
        let class = self.cur.literal;
        self.expect_cur(TokenKind::Identifier);
        let args = if self.cur_is(TokenKind::LParen) {
            self.advance();
            let a = self.parse_call_args();
            self.expect_closing(TokenKind::RParen);
            a
        } else {
            Vec::new()
        };
        Node::ClassInst { class, args }
    }

    fn parse_infix(&mut self, left: Node) -> Node {
        match self.cur.kind {
            TokenKind::LParen => self.parse_call_expr(left),
            TokenKind::LBracket => self.parse_index_expr(left),
            TokenKind::Dot => self.parse_dot_expr(left),
            TokenKind::Pow => {
                self.advance();
                // Right-associative: bind the RHS down to Product so a
                // following `**` keeps nesting to the right.
                let right = Box::new(self.parse_expression(Precedence::Product));
                Node::BinaryExpr { left: Box::new(left), op: BinaryOp::Pow, right }
            }
            kind => {
                let op = binary_op_for(kind);
                let prec = Precedence::of(kind);
                self.advance();
                let right = Box::new(self.parse_expression(prec));
                Node::BinaryExpr { left: Box::new(left), op, right }
            }
        }
    }

    fn parse_call_expr(&mut self, function: Node) -> Node {
        self.advance(); // '('
        let args = self.parse_call_args();
        self.expect_closing(TokenKind::RParen);
        Node::CallExpr { function: Box::new(function), args }
    }

    fn parse_call_args(&mut self) -> Vec<Node> {
        let mut args = Vec::new();
        if self.cur_is(TokenKind::RParen) {
            return args;
        }
        loop {
            args.push(self.parse_expression(Precedence::Lowest));
            if self.cur_is(TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        args
    }

    fn parse_index_expr(&mut self, array: Node) -> Node {
        self.advance(); // '['
        let index = self.parse_expression(Precedence::Lowest);
        self.expect_closing(TokenKind::RBracket);
        Node::IndexExpr { array: Box::new(array), index: Box::new(index) }
    }

    fn parse_dot_expr(&mut self, object: Node) -> Node {
        self.advance(); // '.'
        let name = if self.cur_is(TokenKind::Identifier) || self.cur_is(TokenKind::New) {
            let n = self.cur.literal;
            self.advance();
            n
        } else {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::ExpectedExpression(self.cur.kind),
                self.cur.line,
                self.cur.column,
            ));
            Symbol::EMPTY
        };
        if self.cur_is(TokenKind::LParen) {
            self.advance();
            let args = self.parse_call_args();
            self.expect_closing(TokenKind::RParen);
            Node::MethodCall { object: Box::new(object), method: name, args }
        } else {
            Node::DotExpr { object: Box::new(object), property: name }
        }
    }
}

fn binary_op_for(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Asterisk => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Pow => BinaryOp::Pow,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => unreachable!("binary_op_for called on non-operator token {:?}", kind),
    }
}
